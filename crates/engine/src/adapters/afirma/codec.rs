//! DSS 1.0 core + @firma XSS profile codec.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::constants::*;
use super::xml::XmlElement;
use crate::domain::error::{DssError, DssResult};
use crate::domain::types::{ClientDefaults, SignaturePayload, VerificationRequest};
use crate::domain::verify::{ResultMajor, ReturnedDocument, UpdatedSignature, VerificationResult};

/// A decoded `VerifyResponse`. Optional outputs stay untyped until asked for.
#[derive(Debug, Clone)]
pub struct VerifyResponse {
  pub result: VerificationResult,
  pub profile: Option<String>,
  pub optional_outputs: Vec<XmlElement>,
}

impl VerifyResponse {
  pub fn outputs_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
    self.optional_outputs.iter().filter(move |e| e.local_name() == name)
  }

  /// The one optional output called `name`; zero or several is a protocol error.
  pub fn single_output<'a>(&'a self, name: &'a str) -> DssResult<&'a XmlElement> {
    let mut matches = self.outputs_named(name);
    match (matches.next(), matches.next()) {
      (Some(el), None) => Ok(el),
      (None, _) => Err(DssError::protocol(format!("response has no {name} output"))),
      (Some(_), Some(_)) => Err(DssError::protocol(format!("response has more than one {name} output"))),
    }
  }
}

fn dss(name: &str) -> XmlElement {
  XmlElement::new(Some(NS_DSS), name)
}

pub fn encode_request(request: &VerificationRequest) -> XmlElement {
  let mut inputs = dss(OPTIONAL_INPUTS).with_child(
    dss(CLAIMED_IDENTITY).with_child(dss(NAME).with_text(request.application_id.clone())),
  );
  if let Some(form) = &request.return_updated_signature {
    inputs.push_child(dss(RETURN_UPDATED_SIGNATURE).with_attr(ATTR_TYPE, form.clone()));
  }
  if request.ignore_grace_period {
    inputs.push_child(XmlElement::new(Some(NS_AFIRMA_XSS), IGNORE_GRACE_PERIOD));
  }

  let content = match &request.payload {
    SignaturePayload::RawSignature(data) => dss(BASE64_XML).with_text(STANDARD.encode(data)),
    SignaturePayload::Base64Document { mime_type, data } => dss(BASE64_DATA)
      .with_attr(ATTR_MIME_TYPE, mime_type.clone())
      .with_text(STANDARD.encode(data)),
  };
  let document = dss(DOCUMENT)
    .with_attr(ATTR_ID, ClientDefaults::INPUT_DOCUMENT_ID)
    .with_child(content);

  dss(VERIFY_REQUEST)
    .with_child(inputs)
    .with_child(dss(INPUT_DOCUMENTS).with_child(document))
    .with_child(
      dss(SIGNATURE_OBJECT).with_child(
        dss(SIGNATURE_PTR).with_attr(ATTR_WHICH_DOCUMENT, ClientDefaults::INPUT_DOCUMENT_ID),
      ),
    )
}

/// Inverse of [`encode_request`]; used by stub servers and tests.
pub fn decode_request(element: &XmlElement) -> DssResult<VerificationRequest> {
  expect_element(element, VERIFY_REQUEST)?;

  let inputs = required_child(element, OPTIONAL_INPUTS)?;
  let application_id = required_child(required_child(inputs, CLAIMED_IDENTITY)?, NAME)?.text();
  let return_updated_signature = inputs
    .child(NS_DSS, RETURN_UPDATED_SIGNATURE)
    .map(|e| required_attr(e, ATTR_TYPE).map(str::to_string))
    .transpose()?;
  let ignore_grace_period = inputs.child(NS_AFIRMA_XSS, IGNORE_GRACE_PERIOD).is_some();

  let pointer = required_child(required_child(element, SIGNATURE_OBJECT)?, SIGNATURE_PTR)?;
  let which = required_attr(pointer, ATTR_WHICH_DOCUMENT)?;
  let document = required_child(element, INPUT_DOCUMENTS)?
    .elements()
    .find(|d| d.is(NS_DSS, DOCUMENT) && d.attr(ATTR_ID) == Some(which))
    .ok_or_else(|| DssError::protocol(format!("SignaturePtr targets unknown document {which}")))?;

  let payload = match document.elements().next() {
    Some(c) if c.is(NS_DSS, BASE64_XML) => SignaturePayload::RawSignature(decode_base64(c)?),
    Some(c) if c.is(NS_DSS, BASE64_DATA) => SignaturePayload::Base64Document {
      mime_type: c.attr(ATTR_MIME_TYPE).unwrap_or_default().to_string(),
      data: decode_base64(c)?,
    },
    Some(c) => return Err(unexpected(c, "input document content")),
    None => return Err(DssError::protocol("input document is empty")),
  };

  Ok(VerificationRequest {
    application_id,
    payload,
    return_updated_signature,
    ignore_grace_period,
  })
}

pub fn decode_response(element: &XmlElement) -> DssResult<VerifyResponse> {
  expect_element(element, VERIFY_RESPONSE)?;

  let result = required_child(element, RESULT)?;
  let major = required_child(result, RESULT_MAJOR)?.text();
  let result_major = major.trim().parse::<ResultMajor>().unwrap_or_else(|never| match never {});
  let result_minor = result
    .child(NS_DSS, RESULT_MINOR)
    .map(|e| e.text().trim().to_string());
  let result_message = result.child(NS_DSS, RESULT_MESSAGE).map(XmlElement::text);

  let optional_outputs = element
    .child(NS_DSS, OPTIONAL_OUTPUTS)
    .map(|o| o.elements().cloned().collect())
    .unwrap_or_default();

  Ok(VerifyResponse {
    result: VerificationResult {
      result_major,
      result_minor,
      result_message,
    },
    profile: element.attr(ATTR_PROFILE).map(str::to_string),
    optional_outputs,
  })
}

/// Decode an `UpdatedSignature` optional output into its concrete shape.
pub fn decode_updated_signature(element: &XmlElement) -> DssResult<UpdatedSignature> {
  expect_element(element, UPDATED_SIGNATURE)?;
  let object = required_child(element, SIGNATURE_OBJECT)?;
  let inner = object
    .elements()
    .next()
    .ok_or_else(|| DssError::protocol("UpdatedSignature has an empty SignatureObject"))?;

  if inner.is(NS_DSS, BASE64_SIGNATURE) {
    return Ok(UpdatedSignature::InlineSignature(decode_base64(inner)?));
  }
  if inner.is(NS_DSS, SIGNATURE_PTR) {
    let which = required_attr(inner, ATTR_WHICH_DOCUMENT)?;
    return Ok(UpdatedSignature::DocumentReference(which.to_string()));
  }
  if UNSUPPORTED_SIGNATURE_SHAPES.contains(&inner.local_name()) {
    return Err(DssError::UnsupportedResultType(inner.local_name().to_string()));
  }
  Err(unexpected(inner, "SignatureObject content"))
}

/// Decode a `DocumentWithSignature` optional output.
pub fn decode_document_with_signature(element: &XmlElement) -> DssResult<ReturnedDocument> {
  expect_element(element, DOCUMENT_WITH_SIGNATURE)?;
  let document = required_child(element, DOCUMENT)?;
  let id = required_attr(document, ATTR_ID)?.to_string();
  let content = document
    .elements()
    .next()
    .ok_or_else(|| DssError::protocol(format!("document {id} is empty")))?;

  let content = if content.is(NS_DSS, BASE64_XML) || content.is(NS_DSS, BASE64_DATA) {
    decode_base64(content)?
  } else if content.is(NS_DSS, ESCAPED_XML) {
    content.text().into_bytes()
  } else {
    return Err(unexpected(content, "document content"));
  };
  Ok(ReturnedDocument { id, content })
}

fn decode_base64(element: &XmlElement) -> DssResult<Vec<u8>> {
  let text: String = element.text().chars().filter(|c| !c.is_ascii_whitespace()).collect();
  STANDARD
    .decode(text.as_bytes())
    .map_err(|e| DssError::protocol(format!("{} is not valid base64: {e}", element.local_name())))
}

fn expect_element(element: &XmlElement, name: &str) -> DssResult<()> {
  if element.is(NS_DSS, name) {
    Ok(())
  } else {
    Err(unexpected(element, name))
  }
}

fn required_child<'a>(element: &'a XmlElement, name: &str) -> DssResult<&'a XmlElement> {
  element
    .child(NS_DSS, name)
    .ok_or_else(|| DssError::protocol(format!("{} is missing {name}", element.local_name())))
}

fn required_attr<'a>(element: &'a XmlElement, name: &str) -> DssResult<&'a str> {
  element
    .attr(name)
    .ok_or_else(|| DssError::protocol(format!("{} is missing attribute {name}", element.local_name())))
}

fn unexpected(element: &XmlElement, expected: &str) -> DssError {
  DssError::protocol(format!(
    "unexpected element {{{}}}{} where {expected} was expected",
    element.namespace.as_deref().unwrap_or(""),
    element.local_name()
  ))
}
