// adapters/afirma/engine/mod.rs

use super::http::{HttpTransport, ReqwestTransport};
use super::soap::SoapClient;
use crate::crypto::envelope_signer::EnvelopeSigner;
use crate::domain::error::DssResult;
use crate::domain::service::SignatureService;
use crate::domain::types::{ClientConfig, SignatureFormat};
use crate::domain::verify::VerificationResult;

pub(crate) mod common;
mod upgrade;
mod verify;

pub use upgrade::extract_upgraded_signature;

/// @firma `DSSAfirmaVerify` client.
///
/// Holds only read-only state (configuration, signer, transport), so one
/// instance can serve concurrent calls as long as the transport allows it.
pub struct AfirmaClient<H = ReqwestTransport> {
  config: ClientConfig,
  soap: SoapClient<H>,
  envelope_signer: Option<Box<dyn EnvelopeSigner>>,
}

impl AfirmaClient<ReqwestTransport> {
  pub fn new(config: ClientConfig) -> DssResult<Self> {
    let transport = ReqwestTransport::new(reqwest::Client::default(), config.limits);
    Self::with_transport(config, transport)
  }
}

impl<H: HttpTransport> AfirmaClient<H> {
  /// Validate `config`, load its signer (if any) and bind it to `transport`.
  pub fn with_transport(config: ClientConfig, transport: H) -> DssResult<Self> {
    config.validate()?;
    let envelope_signer = config.signer.as_ref().map(|s| s.resolve()).transpose()?;
    Ok(Self {
      soap: SoapClient::new(transport, config.limits),
      config,
      envelope_signer,
    })
  }

  /// Sign envelopes with a caller-provided capability instead of `config.signer`.
  pub fn with_envelope_signer(mut self, signer: impl EnvelopeSigner + 'static) -> Self {
    self.envelope_signer = Some(Box::new(signer));
    self
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  pub fn transport(&self) -> &H {
    self.soap.transport()
  }

  pub fn signs_envelopes(&self) -> bool {
    self.envelope_signer.is_some()
  }
}

impl<H: HttpTransport> SignatureService for AfirmaClient<H> {
  fn verify(&self, signature: &[u8], format: SignatureFormat) -> DssResult<VerificationResult> {
    verify::verify_signature(self, signature, format)
  }

  fn upgrade(
    &self,
    signature: &[u8],
    format: SignatureFormat,
    upgrade_format: &str,
  ) -> DssResult<Vec<u8>> {
    upgrade::upgrade_signature(self, signature, format, upgrade_format)
  }
}
