use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::config::ClientDefaults;
use crate::domain::error::DssError;

/// Signature families the client knows how to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignatureFormat {
    /// XML-based signatures, sent as raw bytes.
    XAdES,
    /// PDF-embedded signatures, sent as a base64 document with a PDF mime type.
    PAdES,
}

impl FromStr for SignatureFormat {
    type Err = DssError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xades" => Ok(SignatureFormat::XAdES),
            "pades" => Ok(SignatureFormat::PAdES),
            _ => Err(DssError::Config(format!("unknown signature format: {s}"))),
        }
    }
}

impl fmt::Display for SignatureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureFormat::XAdES => f.write_str("XAdES"),
            SignatureFormat::PAdES => f.write_str("PAdES"),
        }
    }
}

/// The signature blob as it travels inside the input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignaturePayload {
    RawSignature(Vec<u8>),
    Base64Document { mime_type: String, data: Vec<u8> },
}

impl SignaturePayload {
    /// Wrap caller bytes the way the server expects for `format`.
    pub fn for_format(signature: &[u8], format: SignatureFormat) -> Self {
        match format {
            SignatureFormat::PAdES => SignaturePayload::Base64Document {
                mime_type: ClientDefaults::PADES_MIME_TYPE.to_string(),
                data: signature.to_vec(),
            },
            SignatureFormat::XAdES => SignaturePayload::RawSignature(signature.to_vec()),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            SignaturePayload::RawSignature(data) => data,
            SignaturePayload::Base64Document { data, .. } => data,
        }
    }
}

/// Well-known `ReturnUpdatedSignature` types. Any other string is accepted too.
pub mod upgrade_forms {
    pub const ES_T: &str = "urn:oasis:names:tc:dss:1.0:profiles:AdES:forms:ES-T";
    pub const ES_C: &str = "urn:oasis:names:tc:dss:1.0:profiles:AdES:forms:ES-C";
    pub const ES_X: &str = "urn:oasis:names:tc:dss:1.0:profiles:AdES:forms:ES-X";
    pub const ES_X_L: &str = "urn:oasis:names:tc:dss:1.0:profiles:AdES:forms:ES-X-L";
    pub const ES_A: &str = "urn:oasis:names:tc:dss:1.0:profiles:AdES:forms:ES-A";
    pub const PADES_LTV: &str = "urn:afirma:dss:1.0:profile:XSS:PAdES:1.1.2:forms:LTV";
}
