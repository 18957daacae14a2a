// crates/engine/src/domain/error.rs
use thiserror::Error;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of the SOAP/HTTP leg. Never retried by the client.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("HTTP request failed: {0}")]
  Http(#[source] BoxError),

  #[error("HTTP status {0}")]
  Status(u16),

  #[error("SOAP fault {code}: {message}")]
  Fault { code: String, message: String },

  #[error("malformed SOAP envelope: {0}")]
  Envelope(String),

  #[error("response exceeds {limit} bytes")]
  ResponseTooLarge { limit: usize },

  #[error("envelope signing failed: {0}")]
  Signing(String),

  #[error("failed to create async runtime: {0}")]
  Runtime(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DssError {
  #[error("configuration: {0}")]
  Config(String),

  #[error(transparent)]
  Transport(#[from] TransportError),

  #[error("protocol: {0}")]
  Protocol(String),

  /// The server answered with a result code other than the one the
  /// operation requires. `message` is the server's `ResultMessage`, verbatim.
  #[error("verification failed ({result_major}): {}", message.as_deref().unwrap_or("no message"))]
  VerificationFailed {
    result_major: String,
    message: Option<String>,
  },

  #[error("document not found: {0}")]
  DocumentNotFound(String),

  #[error("unsupported result type: {0}")]
  UnsupportedResultType(String),

  #[error("signing credentials: {0}")]
  Signing(String),

  #[error("feature not enabled: {0}")]
  Feature(&'static str),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

impl DssError {
  pub(crate) fn protocol(msg: impl Into<String>) -> Self {
    DssError::Protocol(msg.into())
  }
}

pub type DssResult<T> = Result<T, DssError>;
