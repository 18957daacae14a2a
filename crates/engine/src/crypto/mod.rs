pub mod envelope_signer;
pub mod signer;

#[cfg(feature = "openssl")]
pub mod wss;
