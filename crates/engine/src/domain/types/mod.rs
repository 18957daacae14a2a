// Re-export all types so callers can use `domain::types::X`.

pub use self::core::*;
pub use request::*;
pub use config::*;

// Module declarations
mod core;
mod request;
mod config;
