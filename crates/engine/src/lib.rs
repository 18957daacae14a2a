// crates/engine/src/lib.rs

//! Public facade for the @firma DSS client.
//! Exposes a stable API and re-exports types for consumers (services, FFI).

pub mod adapters;
pub mod crypto;
pub mod domain;

// High-level helpers for the common one-shot path.
// Each call builds a client from `config`, sends one request and drops it.

/// Verify `signature` against the configured @firma platform.
pub fn verify_signature(
    config: ClientConfig,
    signature: &[u8],
    format: SignatureFormat,
) -> DssResult<VerificationResult> {
    adapters::afirma::AfirmaClient::new(config)?.verify(signature, format)
}

/// Ask the platform to upgrade `signature` to `upgrade_format`
/// (see [`upgrade_forms`]) and return the upgraded bytes.
pub fn upgrade_signature(
    config: ClientConfig,
    signature: &[u8],
    format: SignatureFormat,
    upgrade_format: &str,
) -> DssResult<Vec<u8>> {
    adapters::afirma::AfirmaClient::new(config)?.upgrade(signature, format, upgrade_format)
}

// Re-exports for convenience
pub use adapters::afirma::{
    AfirmaClient, HttpResponse, HttpTransport, ReqwestTransport, SoapEnvelope,
};
pub use crypto::envelope_signer::EnvelopeSigner;
pub use crypto::signer::Signer;
#[cfg(feature = "openssl")]
pub use crypto::wss::WsSecuritySigner;
pub use domain::error::{DssError, DssResult, TransportError};
pub use domain::service::SignatureService;
pub use domain::types::{
    upgrade_forms, ClientConfig, ClientDefaults, LimitsConfig, SignatureFormat, SignaturePayload,
    VerificationRequest,
};
pub use domain::verify::{ResultMajor, ReturnedDocument, UpdatedSignature, VerificationResult};
