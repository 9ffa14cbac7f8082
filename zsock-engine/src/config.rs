//! Local engine configuration
//!
//! Options controlling how the in-process engine allocates handles and
//! treats directive addresses.

/// Engine configuration options.
///
/// # Examples
///
/// ```
/// use zsock_engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_max_handles(64)
///     .with_address_validation(false);
/// assert_eq!(config.max_handles, Some(64));
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Live handle ceiling
    ///
    /// - `None`: unlimited (default)
    /// - `Some(n)`: allocation fails with `HandleLimit` once `n` handles are live
    pub max_handles: Option<usize>,

    /// Address validation
    ///
    /// - `true` (default): addresses must be `tcp://host:port`, `ipc://path`
    ///   or `inproc://name`, and bind conflicts are detected on the
    ///   normalized form
    /// - `false`: addresses are opaque strings compared verbatim
    pub validate_addresses: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_handles: None,
            validate_addresses: true,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the live handle ceiling.
    pub fn with_max_handles(mut self, max: usize) -> Self {
        self.max_handles = Some(max);
        self
    }

    /// Enable or disable address validation.
    pub fn with_address_validation(mut self, enabled: bool) -> Self {
        self.validate_addresses = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_handles, None);
        assert!(config.validate_addresses);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_max_handles(2)
            .with_address_validation(false);
        assert_eq!(config.max_handles, Some(2));
        assert!(!config.validate_addresses);
    }
}
