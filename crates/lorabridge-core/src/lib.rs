//! Core types shared by the LoRaBridge crates.
//!
//! Provides:
//! - Error and result types
//! - Decoder and logging configuration
//! - The API version registry negotiated between the network server
//!   and the key management facade

pub mod config;
pub mod error;
pub mod logging;
pub mod version;

pub use config::{DecoderConfig, LogConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use version::{ApiVersion, KnownVersion};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
