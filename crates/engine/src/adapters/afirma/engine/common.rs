// adapters/afirma/engine/common.rs

use tokio::runtime::RuntimeFlavor;

use super::super::codec::{decode_response, encode_request, VerifyResponse};
use super::super::http::HttpTransport;
use super::super::soap::dss_verify_body;
use super::super::xml::XmlElement;
use super::AfirmaClient;
use crate::domain::error::{DssError, DssResult, TransportError};
use crate::domain::types::VerificationRequest;
use crate::domain::verify::{ResultMajor, VerificationResult};

/// Encode, send and decode one `VerifyRequest`.
pub fn exchange<H: HttpTransport>(
  client: &AfirmaClient<H>,
  request: &VerificationRequest,
) -> DssResult<VerifyResponse> {
  let body = dss_verify_body(&encode_request(request))
    .map_err(|e| DssError::protocol(format!("failed to serialize VerifyRequest: {e}")))?;

  let envelope = client.soap.send(
    &client.config.endpoint,
    body,
    client.envelope_signer.as_deref(),
  )?;

  let payload = envelope.payload_text()?;
  let element = XmlElement::parse(payload.trim_start())
    .map_err(|e| DssError::protocol(format!("VerifyResponse is not well-formed XML: {e}")))?;
  decode_response(&element)
}

/// Accept `result` only when its major code is exactly `expected`.
pub fn require_result(
  result: VerificationResult,
  expected: ResultMajor,
) -> DssResult<VerificationResult> {
  if result.result_major == expected {
    tracing::info!(result_major = %result.result_major, "DSS request succeeded");
    return Ok(result);
  }
  tracing::warn!(
    result_major = %result.result_major,
    expected = %expected,
    server_message = result.result_message.as_deref().unwrap_or(""),
    "DSS request rejected"
  );
  Err(DssError::VerificationFailed {
    result_major: result.result_major.as_uri(),
    message: result.result_message,
  })
}

pub fn run_on_current_thread<F, T>(fut: F) -> Result<T, TransportError>
where
  F: std::future::Future<Output = Result<T, TransportError>> + Send,
  T: Send,
{
  if let Ok(handle) = tokio::runtime::Handle::try_current() {
    // block_in_place is only allowed on the multi-thread runtime.
    if handle.runtime_flavor() == RuntimeFlavor::MultiThread {
      return tokio::task::block_in_place(|| handle.block_on(fut));
    }
    // A current-thread runtime cannot be blocked; drive the call on a helper thread.
    return std::thread::scope(|scope| {
      scope
        .spawn(|| block_on_fresh_runtime(fut))
        .join()
        .unwrap_or_else(|_| {
          Err(TransportError::Runtime(std::io::Error::new(
            std::io::ErrorKind::Other,
            "runtime helper thread panicked",
          )))
        })
    });
  }

  block_on_fresh_runtime(fut)
}

/// Create a lightweight current-thread runtime just for this call.
fn block_on_fresh_runtime<F, T>(fut: F) -> Result<T, TransportError>
where
  F: std::future::Future<Output = Result<T, TransportError>>,
{
  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .map_err(TransportError::Runtime)?;
  rt.block_on(fut)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn run_on_current_thread_outside_runtime() {
    let res: Result<u8, TransportError> = run_on_current_thread(async { Ok(7) });
    assert_eq!(res.unwrap(), 7);
  }

  #[test]
  fn run_on_current_thread_inside_multithread_runtime() {
    let rt = tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()
      .expect("build rt");
    let res: Result<(), TransportError> = rt.block_on(async {
      run_on_current_thread(async { Ok(()) })
    });
    assert!(res.is_ok());
  }

  #[test]
  fn run_on_current_thread_inside_current_thread_runtime() {
    let rt = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .expect("build rt");
    let res: Result<u8, TransportError> = rt.block_on(async {
      run_on_current_thread(async {
        tokio::task::yield_now().await;
        Ok(3)
      })
    });
    assert_eq!(res.unwrap(), 3);
  }

  #[test]
  fn run_on_current_thread_propagates_errors() {
    let res: Result<(), TransportError> = run_on_current_thread(async { Err(TransportError::Status(503)) });
    assert!(matches!(res, Err(TransportError::Status(503))));
  }

  #[test]
  fn require_result_distinguishes_success_grades() {
    let ok = VerificationResult {
      result_major: ResultMajor::Success,
      result_minor: None,
      result_message: Some("Proceso realizado correctamente".into()),
    };
    assert!(require_result(ok.clone(), ResultMajor::Success).is_ok());
    match require_result(ok, ResultMajor::ValidSignature) {
      Err(DssError::VerificationFailed { result_major, message }) => {
        assert_eq!(result_major, "urn:oasis:names:tc:dss:1.0:resultmajor:Success");
        assert_eq!(message.as_deref(), Some("Proceso realizado correctamente"));
      }
      other => panic!("unexpected: {other:?}"),
    }
  }
}
