//! Core types used throughout the library.

pub mod config;
pub mod message;
pub mod request;
pub mod streaming;

// Re-export commonly used types
pub use config::*;
pub use message::*;
pub use request::*;
pub use streaming::*;
