//! Docker Descriptor Core - Foundational Types
//!
//! Error types and export configuration shared by the descriptor model.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ExportConfig, LineEnding};
pub use error::{DescriptorError, Result};

/// Docker descriptor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
