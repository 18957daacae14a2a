pub mod error;
pub mod service;
pub mod types;
pub mod verify;
