//! HTTP leg of the SOAP exchange.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use url::Url;

use super::constants::SOAP_ACTION;
use super::engine::common::run_on_current_thread;
use crate::domain::error::TransportError;
use crate::domain::types::{ClientDefaults, LimitsConfig};

#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// A single blocking `POST` of an XML body. Implementations must be safe to
/// share between threads; the client adds no locking of its own.
pub trait HttpTransport: Send + Sync {
  fn post_xml(&self, url: &Url, body: Vec<u8>) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
  fn post_xml(&self, url: &Url, body: Vec<u8>) -> Result<HttpResponse, TransportError> {
    (**self).post_xml(url, body)
  }
}

/// `reqwest`-backed transport. Connection pooling, TLS and timeouts are the
/// wrapped client's business.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
  limits: LimitsConfig,
}

impl ReqwestTransport {
  pub fn new(client: reqwest::Client, limits: LimitsConfig) -> Self {
    Self { client, limits }
  }
}

impl Default for ReqwestTransport {
  fn default() -> Self {
    Self::new(reqwest::Client::default(), LimitsConfig::defaults())
  }
}

impl HttpTransport for ReqwestTransport {
  fn post_xml(&self, url: &Url, body: Vec<u8>) -> Result<HttpResponse, TransportError> {
    let limit = self.limits.max_response_size;
    run_on_current_thread(async {
      let mut response = self
        .client
        .post(url.clone())
        .header(CONTENT_TYPE, HeaderValue::from_static(ClientDefaults::CONTENT_TYPE))
        .header("SOAPAction", HeaderValue::from_static(SOAP_ACTION))
        .body(body)
        .send()
        .await
        .map_err(|e| TransportError::Http(Box::new(e)))?;

      let status = response.status().as_u16();
      if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(TransportError::ResponseTooLarge { limit });
      }

      let mut buf = Vec::new();
      while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| TransportError::Http(Box::new(e)))?
      {
        if buf.len() + chunk.len() > limit {
          return Err(TransportError::ResponseTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
      }

      Ok(HttpResponse { status, body: buf })
    })
  }
}
