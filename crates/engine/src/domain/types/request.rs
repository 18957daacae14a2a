use super::config::ClientDefaults;
use super::core::SignaturePayload;

/// A DSS `VerifyRequest`, built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub application_id: String,
    pub payload: SignaturePayload,
    /// `Some` turns a plain verification into verify+upgrade.
    pub return_updated_signature: Option<String>,
    pub ignore_grace_period: bool,
}

impl VerificationRequest {
    pub fn verify(application_id: impl Into<String>, payload: SignaturePayload) -> Self {
        Self {
            application_id: application_id.into(),
            payload,
            return_updated_signature: None,
            ignore_grace_period: ClientDefaults::IGNORE_GRACE_PERIOD,
        }
    }

    pub fn upgrade(
        application_id: impl Into<String>,
        payload: SignaturePayload,
        upgrade_format: impl Into<String>,
    ) -> Self {
        Self {
            return_updated_signature: Some(upgrade_format.into()),
            ..Self::verify(application_id, payload)
        }
    }
}
