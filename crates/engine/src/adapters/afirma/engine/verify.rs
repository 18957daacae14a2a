// adapters/afirma/engine/verify.rs

use super::super::http::HttpTransport;
use super::common::{exchange, require_result};
use super::AfirmaClient;
use crate::domain::error::DssResult;
use crate::domain::types::{SignatureFormat, SignaturePayload, VerificationRequest};
use crate::domain::verify::{ResultMajor, VerificationResult};

/// Plain verification: no upgrade requested, and only the XSS profile's
/// `ValidSignature` counts as success.
pub fn verify_signature<H: HttpTransport>(
  client: &AfirmaClient<H>,
  signature: &[u8],
  format: SignatureFormat,
) -> DssResult<VerificationResult> {
  let payload = SignaturePayload::for_format(signature, format);
  let request = VerificationRequest::verify(client.config.application_id.clone(), payload);
  tracing::debug!(%format, bytes = signature.len(), "verifying signature");

  let response = exchange(client, &request)?;
  require_result(response.result, ResultMajor::ValidSignature)
}
