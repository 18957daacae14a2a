#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Mutex;

use afirma_dss as dss;
use afirma_dss::adapters::afirma::{decode_request, XmlElement};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rcgen::{Certificate, CertificateParams, KeyPair};
use tempfile::TempDir;
use url::Url;

pub const NS_DSS: &str = "urn:oasis:names:tc:dss:1.0:core:schema";
pub const NS_SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const VALID_SIGNATURE: &str = "urn:afirma:dss:1.0:profile:XSS:resultmajor:ValidSignature";
pub const INVALID_SIGNATURE: &str = "urn:afirma:dss:1.0:profile:XSS:resultmajor:InvalidSignature";
pub const SUCCESS: &str = "urn:oasis:names:tc:dss:1.0:resultmajor:Success";
pub const REQUESTER_ERROR: &str = "urn:oasis:names:tc:dss:1.0:resultmajor:RequesterError";
pub const ENDPOINT: &str = "https://afirma.test/afirmaws/services/DSSAfirmaVerify";

/// In-process transport: replays canned responses and records request bodies.
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<dss::HttpResponse>>,
    requests: Mutex<Vec<Vec<u8>>>,
}

impl StubTransport {
    pub fn replying(responses: Vec<dss::HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|b| String::from_utf8(b.clone()).expect("utf-8 request"))
            .collect()
    }
}

impl dss::HttpTransport for StubTransport {
    fn post_xml(&self, _url: &Url, body: Vec<u8>) -> Result<dss::HttpResponse, dss::TransportError> {
        self.requests.lock().unwrap().push(body);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(dss::TransportError::Status(599))
    }
}

pub fn config() -> dss::ClientConfig {
    dss::ClientConfig::secure_default("test-app", Url::parse(ENDPOINT).unwrap(), None)
}

pub fn client(responses: Vec<dss::HttpResponse>) -> dss::AfirmaClient<StubTransport> {
    dss::AfirmaClient::with_transport(config(), StubTransport::replying(responses)).expect("client")
}

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

/// A `VerifyResponse` document with the given result and raw optional outputs.
pub fn verify_response(major: &str, message: Option<&str>, outputs: &str) -> String {
    let message = message
        .map(|m| format!("<dss:ResultMessage xml:lang=\"es\">{}</dss:ResultMessage>", xml_escape(m)))
        .unwrap_or_default();
    let outputs = if outputs.is_empty() {
        String::new()
    } else {
        format!("<dss:OptionalOutputs>{outputs}</dss:OptionalOutputs>")
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <dss:VerifyResponse xmlns:dss=\"{NS_DSS}\" Profile=\"urn:afirma:dss:1.0:profile:XSS\">\
         <dss:Result><dss:ResultMajor>{major}</dss:ResultMajor>{message}</dss:Result>\
         {outputs}</dss:VerifyResponse>"
    )
}

/// Wrap a serialized DSS response the way the service does: escaped text inside `verifyReturn`.
pub fn soap_wrap(payload: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <soapenv:Envelope xmlns:soapenv=\"{NS_SOAP}\">\
         <soapenv:Body><verifyResponse xmlns=\"http://afirmaws/services/dss\">\
         <verifyReturn>{}</verifyReturn></verifyResponse></soapenv:Body></soapenv:Envelope>",
        xml_escape(payload)
    )
}

pub fn ok(body: String) -> dss::HttpResponse {
    dss::HttpResponse { status: 200, body: body.into_bytes() }
}

pub fn response(major: &str, message: Option<&str>, outputs: &str) -> dss::HttpResponse {
    ok(soap_wrap(&verify_response(major, message, outputs)))
}

pub fn soap_fault(code: &str, message: &str) -> String {
    format!(
        "<soapenv:Envelope xmlns:soapenv=\"{NS_SOAP}\"><soapenv:Body><soapenv:Fault>\
         <faultcode>{code}</faultcode><faultstring>{message}</faultstring>\
         </soapenv:Fault></soapenv:Body></soapenv:Envelope>"
    )
}

pub fn inline_signature_output(bytes: &[u8]) -> String {
    format!(
        "<dss:UpdatedSignature><dss:SignatureObject><dss:Base64Signature>{}</dss:Base64Signature>\
         </dss:SignatureObject></dss:UpdatedSignature>",
        STANDARD.encode(bytes)
    )
}

pub fn pointer_output(which: &str) -> String {
    format!(
        "<dss:UpdatedSignature><dss:SignatureObject><dss:SignaturePtr WhichDocument=\"{which}\"/>\
         </dss:SignatureObject></dss:UpdatedSignature>"
    )
}

pub fn document_output(id: &str, bytes: &[u8]) -> String {
    format!(
        "<dss:DocumentWithSignature><dss:Document ID=\"{id}\"><dss:Base64Data MimeType=\"application/pdf\">{}</dss:Base64Data>\
         </dss:Document></dss:DocumentWithSignature>",
        STANDARD.encode(bytes)
    )
}

/// Decode the `VerifyRequest` carried by a captured SOAP request.
pub fn captured_request(envelope: &str) -> dss::VerificationRequest {
    let envelope = dss::SoapEnvelope::parse(envelope).expect("request envelope");
    let inner = envelope.payload_text().expect("dssXML payload");
    decode_request(&XmlElement::parse(&inner).expect("inner xml")).expect("VerifyRequest")
}

/// Generate an ES256 self-signed certificate and key in PEM format using rcgen.
pub fn generate_es256_pem_pair() -> (String, String) {
    let alg = &rcgen::PKCS_ECDSA_P256_SHA256;
    let key = KeyPair::generate(alg).expect("keypair");
    let mut params = CertificateParams::new(vec!["dss-client.test".to_string()]);
    params.alg = alg;
    params.key_usages = vec![rcgen::KeyUsagePurpose::DigitalSignature];
    params.key_pair = Some(key);
    let cert = Certificate::from_params(params).expect("cert");
    let cert_pem = cert.serialize_pem().expect("cert pem");
    let key_pem = cert.serialize_private_key_pem();
    (cert_pem, key_pem)
}

/// Configure env vars with generated PEM data and return a signer URI string for env.
/// `tag` keeps concurrently running tests from sharing variables.
pub fn setup_env_signer_vars(tag: &str) -> String {
    let (cert_pem, key_pem) = generate_es256_pem_pair();
    let cert_var = format!("DSS_TEST_CERT_PEM_{tag}");
    let key_var = format!("DSS_TEST_KEY_PEM_{tag}");
    std::env::set_var(&cert_var, cert_pem);
    std::env::set_var(&key_var, key_pem);
    format!("env:{cert_var},{key_var}")
}

/// Write PEM files to a temp dir and return (tempdir, signer URI string for local).
pub fn setup_local_signer_files() -> (TempDir, String) {
    let (cert_pem, key_pem) = generate_es256_pem_pair();
    let dir = tempfile::tempdir().expect("tempdir");
    let cert_path = dir.path().join("cert.pem");
    let key_path = dir.path().join("key.pem");
    std::fs::File::create(&cert_path).and_then(|mut f| f.write_all(cert_pem.as_bytes())).expect("write cert");
    std::fs::File::create(&key_path).and_then(|mut f| f.write_all(key_pem.as_bytes())).expect("write key");
    let uri = format!("local:{},{}", cert_path.display(), key_path.display());
    (dir, uri)
}

/// Text between the first `open` and the matching `close`, both included.
pub fn slice_between<'a>(xml: &'a str, open: &str, close: &str) -> &'a str {
    let start = xml.find(open).expect("open tag");
    let end = xml[start..].find(close).expect("close tag") + start + close.len();
    &xml[start..end]
}

/// Text content of the first `<tag>...</tag>`.
pub fn text_of<'a>(xml: &'a str, tag: &str) -> &'a str {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open).expect("tag") + open.len();
    let end = xml[start..].find(&close).expect("close") + start;
    &xml[start..end]
}

/// Text content of the first `<tag ...>...</tag>`, attributes allowed.
pub fn text_of_open<'a>(xml: &'a str, tag: &str) -> &'a str {
    let element = slice_between(xml, &format!("<{tag}"), &format!("</{tag}>"));
    let start = element.find('>').expect("start tag end") + 1;
    let end = element.len() - tag.len() - 3;
    &element[start..end]
}
