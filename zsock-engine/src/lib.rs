//! # zsock Engine
//!
//! In-process implementation of the zsock transport-engine contract.
//!
//! `LocalEngine` hands out [`NativeHandle`](zsock_core::engine::NativeHandle)s,
//! applies bind/connect directives in order, detects bind conflicts, keeps
//! SUB subscription lists, and frees everything when a handle drops. It
//! does not frame or move messages.

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod engine;
mod registry;

pub use config::EngineConfig;
pub use engine::LocalEngine;
