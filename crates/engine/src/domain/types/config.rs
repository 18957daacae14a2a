use url::Url;

use crate::adapters::afirma::validate_endpoint_url;
use crate::crypto::signer::Signer;
use crate::domain::error::{DssError, DssResult};

/// Centralized defaults for the DSS client.
/// All opinionated defaults should be defined here for consistency.
pub struct ClientDefaults;

impl ClientDefaults {
    // Protocol defaults
    pub const INPUT_DOCUMENT_ID: &'static str = "ID_DOCUMENTO";
    pub const PADES_MIME_TYPE: &'static str = "application/pdf";
    pub const CONTENT_TYPE: &'static str = "text/xml; charset=utf-8";
    pub const IGNORE_GRACE_PERIOD: bool = true;

    // Security defaults
    pub const ALLOW_INSECURE_HTTP: bool = false; // Secure default: HTTPS only
    pub const SIGNER: Option<Signer> = None; // Unsigned envelopes unless configured

    // Environment keys read by `ClientConfig::from_env`
    pub const ENV_ENDPOINT: &'static str = "DSS_AFIRMA_VERIFY_URL";
    pub const ENV_APPLICATION_ID: &'static str = "DSS_AFIRMA_APPLICATION_ID";
    pub const ENV_SIGNER: &'static str = "DSS_AFIRMA_SIGNER";
    pub const ENV_ALLOW_HTTP: &'static str = "DSS_AFIRMA_ALLOW_HTTP";
}

/// Configurable per-call limits.
#[derive(Debug, Clone, Copy)]
pub struct LimitsConfig {
    /// Max size accepted for a response body.
    pub max_response_size: usize,
}

impl LimitsConfig {
    /// Opinionated production defaults.
    pub fn defaults() -> Self {
        Self {
            max_response_size: 64 * 1024 * 1024, // 64 MB, upgraded PDFs included
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Immutable client configuration, supplied once at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application identifier registered with the @firma platform.
    pub application_id: String,
    pub endpoint: Url,
    /// Credentials used to sign outgoing envelopes; `None` sends them unsigned.
    pub signer: Option<Signer>,
    /// Opt-in: allow a plain `http` endpoint.
    pub allow_insecure_http: bool,
    pub limits: LimitsConfig,
}

impl ClientConfig {
    /// Secure opinionated defaults; caller supplies identity, endpoint and signer.
    pub fn secure_default(
        application_id: impl Into<String>,
        endpoint: Url,
        signer: Option<Signer>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            endpoint,
            signer,
            allow_insecure_http: ClientDefaults::ALLOW_INSECURE_HTTP,
            limits: LimitsConfig::defaults(),
        }
    }

    /// Build a configuration from `DSS_AFIRMA_*` environment variables.
    pub fn from_env() -> DssResult<Self> {
        let endpoint = required_env(ClientDefaults::ENV_ENDPOINT)?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| DssError::Config(format!("invalid endpoint URL: {e}")))?;
        let application_id = required_env(ClientDefaults::ENV_APPLICATION_ID)?;
        let signer = match std::env::var(ClientDefaults::ENV_SIGNER) {
            Ok(uri) if !uri.trim().is_empty() => Some(
                uri.parse::<Signer>()
                    .map_err(|e| DssError::Config(format!("invalid signer: {e}")))?,
            ),
            _ => ClientDefaults::SIGNER,
        };
        let allow_insecure_http = std::env::var(ClientDefaults::ENV_ALLOW_HTTP)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(ClientDefaults::ALLOW_INSECURE_HTTP);

        let mut config = Self::secure_default(application_id, endpoint, signer);
        config.allow_insecure_http = allow_insecure_http;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the client must never run with.
    pub fn validate(&self) -> DssResult<()> {
        if self.application_id.trim().is_empty() {
            return Err(DssError::Config("application id must not be empty".into()));
        }
        if self.limits.max_response_size == 0 {
            return Err(DssError::Config("max_response_size must be positive".into()));
        }
        validate_endpoint_url(&self.endpoint, self.allow_insecure_http)
    }
}

fn required_env(key: &str) -> DssResult<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DssError::Config(format!("environment variable not set: {key}"))),
    }
}
