//! Transport address model.
//!
//! Directive addresses are opaque to the factory. Engines that want to
//! check them parse them into an [`Endpoint`] here.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Transport endpoint address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// TCP transport: `tcp://host:port`, where host may be `*` on bind
    Tcp {
        /// Host name, IP literal, or `*`
        host: String,
        /// Port number
        port: u16,
    },
    /// IPC transport (Unix domain socket): `ipc:///path/to/socket`
    Ipc(PathBuf),
    /// In-process transport: `inproc://name`
    Inproc(String),
}

impl Endpoint {
    /// Parse an endpoint from a string.
    ///
    /// Supported formats:
    /// - `tcp://127.0.0.1:5555`
    /// - `tcp://*:5555` (all interfaces)
    /// - `tcp://[::1]:5555` (IPv6)
    /// - `ipc:///tmp/socket.sock`
    /// - `inproc://name`
    ///
    /// # Examples
    ///
    /// ```
    /// use zsock_core::endpoint::Endpoint;
    ///
    /// let endpoint = Endpoint::parse("tcp://*:5555").unwrap();
    /// assert!(matches!(endpoint, Endpoint::Tcp { port: 5555, .. }));
    ///
    /// let endpoint = Endpoint::parse("inproc://my-endpoint").unwrap();
    /// assert_eq!(endpoint, Endpoint::Inproc("my-endpoint".into()));
    /// ```
    pub fn parse(s: &str) -> Result<Self, EndpointError> {
        s.parse()
    }
}

fn parse_tcp(addr: &str) -> Result<Endpoint, EndpointError> {
    let invalid = || EndpointError::InvalidTcpAddress(addr.to_string());

    let (host, port) = addr.rsplit_once(':').ok_or_else(invalid)?;
    let host = match host.strip_prefix('[') {
        Some(v6) => v6.strip_suffix(']').ok_or_else(invalid)?,
        None => host,
    };
    if host.is_empty() || host.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let port = port.parse::<u16>().map_err(|_| invalid())?;

    Ok(Endpoint::Tcp {
        host: host.to_string(),
        port,
    })
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(addr) = s.strip_prefix("tcp://") {
            parse_tcp(addr)
        } else if let Some(path) = s.strip_prefix("ipc://") {
            if path.is_empty() {
                Err(EndpointError::InvalidIpcPath(s.to_string()))
            } else {
                Ok(Endpoint::Ipc(PathBuf::from(path)))
            }
        } else if let Some(name) = s.strip_prefix("inproc://") {
            if name.is_empty() {
                Err(EndpointError::InvalidInprocName(
                    "inproc name cannot be empty".to_string(),
                ))
            } else {
                Ok(Endpoint::Inproc(name.to_string()))
            }
        } else {
            Err(EndpointError::InvalidScheme(s.to_string()))
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp { host, port } if host.contains(':') => {
                write!(f, "tcp://[{host}]:{port}")
            }
            Endpoint::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            Endpoint::Ipc(path) => write!(f, "ipc://{}", path.display()),
            Endpoint::Inproc(name) => write!(f, "inproc://{name}"),
        }
    }
}

/// Errors that can occur when parsing endpoints.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("Invalid scheme in endpoint: {0} (expected tcp://, ipc://, or inproc://)")]
    InvalidScheme(String),

    #[error("Invalid TCP address: {0}")]
    InvalidTcpAddress(String),

    #[error("Invalid IPC path: {0}")]
    InvalidIpcPath(String),

    #[error("Invalid inproc name: {0}")]
    InvalidInprocName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tcp_ipv4() {
        let endpoint = Endpoint::parse("tcp://127.0.0.1:5555").unwrap();
        assert!(matches!(endpoint, Endpoint::Tcp { .. }));
        assert_eq!(endpoint.to_string(), "tcp://127.0.0.1:5555");
    }

    #[test]
    fn test_parse_tcp_wildcard_and_hostname() {
        let endpoint = Endpoint::parse("tcp://*:5555").unwrap();
        assert_eq!(
            endpoint,
            Endpoint::Tcp {
                host: "*".into(),
                port: 5555
            }
        );
        assert!(matches!(
            Endpoint::parse("tcp://broker.local:7000").unwrap(),
            Endpoint::Tcp { port: 7000, .. }
        ));
    }

    #[test]
    fn test_parse_tcp_ipv6() {
        let endpoint = Endpoint::parse("tcp://[::1]:5555").unwrap();
        assert!(matches!(endpoint, Endpoint::Tcp { .. }));
        assert_eq!(endpoint.to_string(), "tcp://[::1]:5555");
    }

    #[test]
    fn test_parse_ipc() {
        let endpoint = Endpoint::parse("ipc:///tmp/test.sock").unwrap();
        assert_eq!(endpoint, Endpoint::Ipc(PathBuf::from("/tmp/test.sock")));
        assert_eq!(endpoint.to_string(), "ipc:///tmp/test.sock");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = Endpoint::parse("http://127.0.0.1:5555");
        assert!(matches!(result, Err(EndpointError::InvalidScheme(_))));
    }

    #[test]
    fn test_invalid_tcp_address() {
        for addr in ["tcp://invalid:port", "tcp://:5555", "tcp://host", "tcp://[::1:80"] {
            let result = Endpoint::parse(addr);
            assert!(matches!(result, Err(EndpointError::InvalidTcpAddress(_))), "{addr}");
        }
    }

    #[test]
    fn test_parse_inproc() {
        let endpoint = Endpoint::parse("inproc://my-endpoint").unwrap();
        assert_eq!(endpoint, Endpoint::Inproc("my-endpoint".into()));
        assert_eq!(endpoint.to_string(), "inproc://my-endpoint");
    }

    #[test]
    fn test_invalid_inproc_empty() {
        let result = Endpoint::parse("inproc://");
        assert!(matches!(result, Err(EndpointError::InvalidInprocName(_))));
    }
}
