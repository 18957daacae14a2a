// crates/engine/src/domain/verify.rs
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

const DSS_MAJOR: &str = "urn:oasis:names:tc:dss:1.0:resultmajor:";
const XSS_MAJOR: &str = "urn:afirma:dss:1.0:profile:XSS:resultmajor:";

/// `ResultMajor` code of a DSS response.
///
/// The generic DSS `Success` and the @firma `ValidSignature` are distinct
/// grades: upgrade requires the former, verification the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultMajor {
    Success,
    RequesterError,
    ResponderError,
    Warning,
    ValidSignature,
    InvalidSignature,
    InsufficientInformation,
    Other(String),
}

impl ResultMajor {
    pub fn as_uri(&self) -> String {
        match self {
            ResultMajor::Success => format!("{DSS_MAJOR}Success"),
            ResultMajor::RequesterError => format!("{DSS_MAJOR}RequesterError"),
            ResultMajor::ResponderError => format!("{DSS_MAJOR}ResponderError"),
            ResultMajor::Warning => format!("{DSS_MAJOR}Warning"),
            ResultMajor::ValidSignature => format!("{XSS_MAJOR}ValidSignature"),
            ResultMajor::InvalidSignature => format!("{XSS_MAJOR}InvalidSignature"),
            ResultMajor::InsufficientInformation => format!("{XSS_MAJOR}InsufficientInformation"),
            ResultMajor::Other(uri) => uri.clone(),
        }
    }
}

impl FromStr for ResultMajor {
    type Err = std::convert::Infallible;

    /// Exact, case-sensitive match on the full URI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let known = if let Some(code) = s.strip_prefix(DSS_MAJOR) {
            match code {
                "Success" => Some(ResultMajor::Success),
                "RequesterError" => Some(ResultMajor::RequesterError),
                "ResponderError" => Some(ResultMajor::ResponderError),
                "Warning" => Some(ResultMajor::Warning),
                _ => None,
            }
        } else if let Some(code) = s.strip_prefix(XSS_MAJOR) {
            match code {
                "ValidSignature" => Some(ResultMajor::ValidSignature),
                "InvalidSignature" => Some(ResultMajor::InvalidSignature),
                "InsufficientInformation" => Some(ResultMajor::InsufficientInformation),
                _ => None,
            }
        } else {
            None
        };
        Ok(known.unwrap_or_else(|| ResultMajor::Other(s.to_string())))
    }
}

impl fmt::Display for ResultMajor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_uri())
    }
}

impl Serialize for ResultMajor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_uri())
    }
}

/// Top-level `Result` of a `VerifyResponse`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub result_major: ResultMajor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_minor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_message: Option<String>,
}

/// Where the upgraded signature lives in a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatedSignature {
    /// Returned directly as `Base64Signature`.
    InlineSignature(Vec<u8>),
    /// Returned as a `DocumentWithSignature` keyed by this id.
    DocumentReference(String),
}

/// A `DocumentWithSignature` optional output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnedDocument {
    pub id: String,
    pub content: Vec<u8>,
}
