use afirma_dss::crypto::signer::Signer;
use afirma_dss::domain::error::DssError;
use afirma_dss::domain::types as dt;
use afirma_dss::{upgrade_signature, verify_signature};

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("{message}")]
    Generic { message: String },
    /// The platform answered, but not with the result the operation requires.
    #[error("{result_major}: {message}")]
    VerificationFailed { result_major: String, message: String },
}

impl From<DssError> for FfiError {
    fn from(e: DssError) -> Self {
        match e {
            DssError::VerificationFailed { result_major, message } => FfiError::VerificationFailed {
                result_major,
                message: message.unwrap_or_default(),
            },
            other => FfiError::Generic { message: other.to_string() },
        }
    }
}

// ===== FFI types mirroring the public Rust API (FFI-friendly) =====

#[derive(uniffi::Enum, Debug, Clone, Copy)]
pub enum FfiSignatureFormat { XAdES, PAdES }

impl From<FfiSignatureFormat> for dt::SignatureFormat {
    fn from(v: FfiSignatureFormat) -> Self {
        match v { FfiSignatureFormat::XAdES => dt::SignatureFormat::XAdES, FfiSignatureFormat::PAdES => dt::SignatureFormat::PAdES }
    }
}

#[derive(uniffi::Record, Debug, Clone, Copy)]
pub struct FfiLimitsConfig {
    pub max_response_size: u64,
}

impl TryFrom<FfiLimitsConfig> for dt::LimitsConfig {
    type Error = FfiError;
    fn try_from(v: FfiLimitsConfig) -> Result<Self, Self::Error> {
        let max_response_size = usize::try_from(v.max_response_size).map_err(|_| FfiError::Generic {
            message: format!("max_response_size {} exceeds this platform's address space", v.max_response_size),
        })?;
        Ok(dt::LimitsConfig { max_response_size })
    }
}

impl FfiLimitsConfig {
    pub fn defaults() -> Self {
        let d = dt::LimitsConfig::defaults();
        Self { max_response_size: d.max_response_size as u64 }
    }
}

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiClientConfig {
    pub application_id: String,
    pub endpoint: String,
    pub signer_uri: Option<String>, // local:/env:/pkcs12: URI; None sends unsigned envelopes
    pub allow_insecure_http: bool,
    pub limits: FfiLimitsConfig,
}

impl TryFrom<FfiClientConfig> for dt::ClientConfig {
    type Error = FfiError;
    fn try_from(v: FfiClientConfig) -> Result<Self, Self::Error> {
        let endpoint = v.endpoint.parse().map_err(|e| FfiError::Generic { message: format!("Invalid endpoint: {e}") })?;
        let signer = v
            .signer_uri
            .map(|uri| uri.parse::<Signer>())
            .transpose()
            .map_err(|e| FfiError::Generic { message: format!("Invalid signer: {e}") })?;
        Ok(dt::ClientConfig {
            application_id: v.application_id,
            endpoint,
            signer,
            allow_insecure_http: v.allow_insecure_http,
            limits: v.limits.try_into()?,
        })
    }
}

// ===== Verification result mappings =====

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiVerificationResult {
    pub result_major: String,
    pub result_minor: Option<String>,
    pub result_message: Option<String>,
}

impl From<afirma_dss::domain::verify::VerificationResult> for FfiVerificationResult {
    fn from(v: afirma_dss::domain::verify::VerificationResult) -> Self {
        FfiVerificationResult {
            result_major: v.result_major.as_uri(),
            result_minor: v.result_minor,
            result_message: v.result_message,
        }
    }
}

// ===== High-level API, mirroring Rust surface =====

#[uniffi::export]
pub fn verify_signature_ffi(
    cfg: FfiClientConfig,
    signature: Vec<u8>,
    format: FfiSignatureFormat,
) -> Result<FfiVerificationResult, FfiError> {
    let cfg: dt::ClientConfig = cfg.try_into()?;
    let res = verify_signature(cfg, &signature, format.into()).map_err(FfiError::from)?;
    Ok(res.into())
}

#[uniffi::export]
pub fn upgrade_signature_ffi(
    cfg: FfiClientConfig,
    signature: Vec<u8>,
    format: FfiSignatureFormat,
    upgrade_format: String,
) -> Result<Vec<u8>, FfiError> {
    let cfg: dt::ClientConfig = cfg.try_into()?;
    upgrade_signature(cfg, &signature, format.into(), &upgrade_format).map_err(FfiError::from)
}

#[uniffi::export]
pub fn default_limits_ffi() -> FfiLimitsConfig {
    FfiLimitsConfig::defaults()
}

uniffi::setup_scaffolding!();

#[cfg(test)]
mod tests {
    use super::*;

    fn config(signer_uri: Option<&str>) -> FfiClientConfig {
        FfiClientConfig {
            application_id: "app".into(),
            endpoint: "https://afirma.example/afirmaws/services/DSSAfirmaVerify".into(),
            signer_uri: signer_uri.map(str::to_string),
            allow_insecure_http: false,
            limits: FfiLimitsConfig::defaults(),
        }
    }

    #[test]
    fn converts_config() {
        let cfg: dt::ClientConfig = config(Some("env:CERT,KEY")).try_into().unwrap();
        assert_eq!(cfg.application_id, "app");
        assert!(matches!(cfg.signer, Some(Signer::Env { .. })));
        assert_eq!(cfg.limits.max_response_size, dt::LimitsConfig::defaults().max_response_size);
    }

    #[test]
    fn limits_convert_within_platform_width() {
        let limits: dt::LimitsConfig = FfiLimitsConfig { max_response_size: 4096 }.try_into().unwrap();
        assert_eq!(limits.max_response_size, 4096);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn rejects_limit_wider_than_usize() {
        let mut cfg = config(None);
        cfg.limits.max_response_size = u64::from(u32::MAX) + 1;
        let res: Result<dt::ClientConfig, _> = cfg.try_into();
        assert!(matches!(res, Err(FfiError::Generic { .. })));
    }

    #[test]
    fn rejects_bad_signer_uri() {
        let res: Result<dt::ClientConfig, _> = config(Some("vault:x")).try_into();
        assert!(matches!(res, Err(FfiError::Generic { .. })));
    }

    #[test]
    fn maps_verification_failure() {
        let err = FfiError::from(DssError::VerificationFailed {
            result_major: "urn:oasis:names:tc:dss:1.0:resultmajor:RequesterError".into(),
            message: None,
        });
        match err {
            FfiError::VerificationFailed { result_major, message } => {
                assert!(result_major.ends_with("RequesterError"));
                assert!(message.is_empty());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
