//! SOAP 1.1 envelope handling and the signed POST round trip.

use url::Url;

use super::constants::*;
use super::http::HttpTransport;
use super::xml::XmlElement;
use crate::crypto::envelope_signer::EnvelopeSigner;
use crate::domain::error::TransportError;
use crate::domain::types::LimitsConfig;

/// A SOAP envelope: header blocks plus the `Body` element itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapEnvelope {
  pub namespace: String,
  pub header: Vec<XmlElement>,
  pub body: XmlElement,
}

impl SoapEnvelope {
  /// Wrap `content` as the single child of a fresh SOAP 1.1 `Body`.
  pub fn wrap(content: XmlElement) -> Self {
    // Body re-declares its own prefix so it serializes identically on its own.
    let body = XmlElement::new(Some(NS_SOAP11), "Body")
      .declare("soapenv", NS_SOAP11)
      .with_child(content);
    Self {
      namespace: NS_SOAP11.to_string(),
      header: Vec::new(),
      body,
    }
  }

  pub fn to_element(&self) -> XmlElement {
    let mut envelope = XmlElement::new(Some(&self.namespace), "Envelope");
    if !self.header.is_empty() {
      let mut header = XmlElement::new(Some(&self.namespace), "Header");
      for block in &self.header {
        header.push_child(block.clone());
      }
      envelope.push_child(header);
    }
    envelope.push_child(self.body.clone());
    envelope
  }

  pub fn to_xml(&self) -> std::io::Result<String> {
    self.to_element().to_xml()
  }

  pub fn parse(xml: &str) -> Result<Self, TransportError> {
    let root = XmlElement::parse(xml.trim_start_matches('\u{feff}').trim_start())
      .map_err(|e| TransportError::Envelope(format!("response is not well-formed XML: {e}")))?;
    let namespace = match root.namespace.as_deref() {
      Some(ns @ (NS_SOAP11 | NS_SOAP12)) if root.local_name() == "Envelope" => ns.to_string(),
      _ => {
        return Err(TransportError::Envelope(format!(
          "expected a SOAP Envelope, found {}",
          root.local_name()
        )))
      }
    };
    let header = root
      .child(&namespace, "Header")
      .map(|h| h.elements().cloned().collect())
      .unwrap_or_default();
    let body = root
      .child(&namespace, "Body")
      .cloned()
      .ok_or_else(|| TransportError::Envelope("envelope has no Body".into()))?;
    Ok(Self { namespace, header, body })
  }

  /// `(code, message)` when the body carries a SOAP Fault.
  pub fn fault(&self) -> Option<(String, String)> {
    let fault = self.body.child(&self.namespace, "Fault")?;
    if self.namespace == NS_SOAP12 {
      let code = fault
        .child(NS_SOAP12, "Code")
        .and_then(|c| c.child(NS_SOAP12, "Value"))
        .map(|v| v.text());
      let reason = fault
        .child(NS_SOAP12, "Reason")
        .and_then(|r| r.child(NS_SOAP12, "Text"))
        .map(|t| t.text());
      return Some((
        code.unwrap_or_default().trim().to_string(),
        reason.unwrap_or_default().trim().to_string(),
      ));
    }
    let text_of = |name: &str| {
      fault
        .elements()
        .find(|e| e.local_name() == name)
        .map(|e| e.text().trim().to_string())
        .unwrap_or_default()
    };
    Some((text_of("faultcode"), text_of("faultstring")))
  }

  /// Text of the first element under `Body` carrying non-whitespace text,
  /// returned verbatim (it is a serialized XML document in its own right).
  pub fn payload_text(&self) -> Result<String, TransportError> {
    self
      .body
      .find(XmlElement::has_text)
      .map(XmlElement::text)
      .ok_or_else(|| TransportError::Envelope("response Body carries no payload".into()))
  }
}

/// `<dss:verify><dssXML>{escaped request}</dssXML></dss:verify>`
pub fn dss_verify_body(request: &XmlElement) -> std::io::Result<XmlElement> {
  let inner = request.to_xml()?;
  Ok(
    XmlElement::new(Some(NS_DSS), VERIFY_OPERATION)
      .with_child(XmlElement::new(None, DSS_XML).with_text(inner)),
  )
}

/// Wraps, optionally signs, posts and parses SOAP messages.
pub struct SoapClient<H> {
  http: H,
  limits: LimitsConfig,
}

impl<H: HttpTransport> SoapClient<H> {
  pub fn new(http: H, limits: LimitsConfig) -> Self {
    Self { http, limits }
  }

  pub fn transport(&self) -> &H {
    &self.http
  }

  pub fn send(
    &self,
    destination: &Url,
    body: XmlElement,
    signer: Option<&dyn EnvelopeSigner>,
  ) -> Result<SoapEnvelope, TransportError> {
    let mut envelope = SoapEnvelope::wrap(body);
    if let Some(signer) = signer {
      envelope = signer.sign_envelope(envelope)?;
    }
    let request_xml = envelope
      .to_xml()
      .map_err(|e| TransportError::Envelope(format!("failed to serialize envelope: {e}")))?;

    tracing::debug!(
      destination = %destination,
      signed = signer.is_some(),
      bytes = request_xml.len(),
      "sending SOAP request"
    );
    tracing::trace!(envelope = %request_xml, "outgoing envelope");

    let response = self.http.post_xml(destination, request_xml.into_bytes())?;
    let status = response.status;
    let success = response.is_success();
    tracing::debug!(status, bytes = response.body.len(), "SOAP response received");

    if response.body.len() > self.limits.max_response_size {
      return Err(TransportError::ResponseTooLarge { limit: self.limits.max_response_size });
    }
    let text = String::from_utf8(response.body)
      .map_err(|_| TransportError::Envelope("response is not valid UTF-8".into()))?;
    tracing::trace!(envelope = %text, "incoming envelope");

    match SoapEnvelope::parse(&text) {
      Ok(parsed) => {
        if let Some((code, message)) = parsed.fault() {
          tracing::warn!(%code, %message, "SOAP fault");
          return Err(TransportError::Fault { code, message });
        }
        if !success {
          return Err(TransportError::Status(status));
        }
        Ok(parsed)
      }
      Err(_) if !success => Err(TransportError::Status(status)),
      Err(e) => Err(e),
    }
  }
}
