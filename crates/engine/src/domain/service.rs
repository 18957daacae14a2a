// crates/engine/src/domain/service.rs

use super::error::DssResult;
use super::types::SignatureFormat;
use super::verify::VerificationResult;

/// Trait implemented by signature validation backends (@firma DSS today).
pub trait SignatureService {
    /// Verify `signature` and succeed only when the backend deems it valid.
    fn verify(&self, signature: &[u8], format: SignatureFormat) -> DssResult<VerificationResult>;

    /// Ask the backend for an upgraded (long-term) form of `signature`.
    fn upgrade(
        &self,
        signature: &[u8],
        format: SignatureFormat,
        upgrade_format: &str,
    ) -> DssResult<Vec<u8>>;
}
