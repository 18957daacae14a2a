// Namespaces
pub const NS_DSS: &str = "urn:oasis:names:tc:dss:1.0:core:schema";
pub const NS_AFIRMA_XSS: &str = "urn:afirma:dss:1.0:profile:XSS:schema";
pub const NS_DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";
pub const NS_SOAP11: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const NS_SOAP12: &str = "http://www.w3.org/2003/05/soap-envelope";
pub const NS_XML: &str = "http://www.w3.org/XML/1998/namespace";
pub const NS_WSSE: &str =
  "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
pub const NS_WSU: &str =
  "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";

// Preferred prefixes when serializing
pub const KNOWN_PREFIXES: &[(&str, &str)] = &[
  (NS_DSS, "dss"),
  (NS_AFIRMA_XSS, "afxp"),
  (NS_DSIG, "ds"),
  (NS_SOAP11, "soapenv"),
  (NS_SOAP12, "env"),
  (NS_WSSE, "wsse"),
  (NS_WSU, "wsu"),
];

// DSS element names
pub const VERIFY_REQUEST: &str = "VerifyRequest";
pub const VERIFY_RESPONSE: &str = "VerifyResponse";
pub const OPTIONAL_INPUTS: &str = "OptionalInputs";
pub const OPTIONAL_OUTPUTS: &str = "OptionalOutputs";
pub const INPUT_DOCUMENTS: &str = "InputDocuments";
pub const DOCUMENT: &str = "Document";
pub const BASE64_XML: &str = "Base64XML";
pub const BASE64_DATA: &str = "Base64Data";
pub const ESCAPED_XML: &str = "EscapedXML";
pub const INLINE_XML: &str = "InlineXML";
pub const SIGNATURE_OBJECT: &str = "SignatureObject";
pub const SIGNATURE_PTR: &str = "SignaturePtr";
pub const BASE64_SIGNATURE: &str = "Base64Signature";
pub const CLAIMED_IDENTITY: &str = "ClaimedIdentity";
pub const NAME: &str = "Name";
pub const RETURN_UPDATED_SIGNATURE: &str = "ReturnUpdatedSignature";
pub const IGNORE_GRACE_PERIOD: &str = "IgnoreGracePeriod";
pub const RESULT: &str = "Result";
pub const RESULT_MAJOR: &str = "ResultMajor";
pub const RESULT_MINOR: &str = "ResultMinor";
pub const RESULT_MESSAGE: &str = "ResultMessage";
pub const UPDATED_SIGNATURE: &str = "UpdatedSignature";
pub const DOCUMENT_WITH_SIGNATURE: &str = "DocumentWithSignature";

// SignatureObject shapes the client recognizes but cannot return
pub const UNSUPPORTED_SIGNATURE_SHAPES: &[&str] = &["Signature", "Timestamp", "Other"];

// Attributes
pub const ATTR_ID: &str = "ID";
pub const ATTR_WHICH_DOCUMENT: &str = "WhichDocument";
pub const ATTR_TYPE: &str = "Type";
pub const ATTR_MIME_TYPE: &str = "MimeType";
pub const ATTR_PROFILE: &str = "Profile";

// SOAP transport wrapper
pub const VERIFY_OPERATION: &str = "verify";
pub const DSS_XML: &str = "dssXML";
pub const SOAP_ACTION: &str = "\"\"";
