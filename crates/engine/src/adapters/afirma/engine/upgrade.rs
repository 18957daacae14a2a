// adapters/afirma/engine/upgrade.rs

use super::super::codec::{decode_document_with_signature, decode_updated_signature, VerifyResponse};
use super::super::constants::{ATTR_ID, DOCUMENT, DOCUMENT_WITH_SIGNATURE, NS_DSS, UPDATED_SIGNATURE};
use super::super::http::HttpTransport;
use super::common::{exchange, require_result};
use super::AfirmaClient;
use crate::domain::error::{DssError, DssResult};
use crate::domain::types::{SignatureFormat, SignaturePayload, VerificationRequest};
use crate::domain::verify::{ResultMajor, UpdatedSignature};

pub fn upgrade_signature<H: HttpTransport>(
  client: &AfirmaClient<H>,
  signature: &[u8],
  format: SignatureFormat,
  upgrade_format: &str,
) -> DssResult<Vec<u8>> {
  if upgrade_format.trim().is_empty() {
    return Err(DssError::Config("upgrade format must not be empty".into()));
  }
  let payload = SignaturePayload::for_format(signature, format);
  let request = VerificationRequest::upgrade(
    client.config.application_id.clone(),
    payload,
    upgrade_format,
  );
  tracing::debug!(%format, upgrade_format, bytes = signature.len(), "upgrading signature");

  let response = exchange(client, &request)?;
  require_result(response.result.clone(), ResultMajor::Success)?;
  extract_upgraded_signature(&response)
}

/// Resolve the `UpdatedSignature` output to bytes, following a
/// `SignaturePtr` into the returned `DocumentWithSignature` list.
pub fn extract_upgraded_signature(response: &VerifyResponse) -> DssResult<Vec<u8>> {
  let updated = response.single_output(UPDATED_SIGNATURE)?;
  match decode_updated_signature(updated)? {
    UpdatedSignature::InlineSignature(bytes) => Ok(bytes),
    UpdatedSignature::DocumentReference(id) => {
      // Only the referenced document is decoded.
      let referenced = response.outputs_named(DOCUMENT_WITH_SIGNATURE).find(|element| {
        element.child(NS_DSS, DOCUMENT).and_then(|d| d.attr(ATTR_ID)) == Some(id.as_str())
      });
      match referenced {
        Some(element) => Ok(decode_document_with_signature(element)?.content),
        None => Err(DssError::DocumentNotFound(id)),
      }
    }
  }
}
