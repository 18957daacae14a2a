//! WS-Security X.509 token profile signer backed by OpenSSL.
//!
//! Produces a `wsse:Security` header with a `BinarySecurityToken` and an
//! enveloped `ds:Signature` over the SOAP `Body` (exclusive C14N, SHA-256).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use openssl::ecdsa::EcdsaSig;
use openssl::hash::MessageDigest;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{Id, PKey, Private};
use openssl::x509::X509;

use super::envelope_signer::EnvelopeSigner;
use super::signer::SigningMaterial;
use crate::adapters::afirma::{SoapEnvelope, XmlElement, NS_DSIG, NS_WSSE, NS_WSU};
use crate::domain::error::{DssError, DssResult, TransportError};

pub const BODY_ID: &str = "id-body";
pub const TOKEN_ID: &str = "X509-token";

const ALG_EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";
const ALG_SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
const ALG_RSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#rsa-sha256";
const ALG_ECDSA_SHA256: &str = "http://www.w3.org/2001/04/xmldsig-more#ecdsa-sha256";
const TOKEN_ENCODING: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";
const TOKEN_VALUE_TYPE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-x509-token-profile-1.0#X509v3";

pub struct WsSecuritySigner {
    cert_der: Vec<u8>,
    key: PKey<Private>,
}

impl WsSecuritySigner {
    /// Pair a certificate with its private key. Mismatched pairs are rejected.
    pub fn new(cert: X509, key: PKey<Private>) -> DssResult<Self> {
        let public = cert.public_key().map_err(signing_error)?;
        if !public.public_eq(&key) {
            return Err(DssError::Signing(
                "private key does not match the certificate".into(),
            ));
        }
        match key.id() {
            Id::RSA | Id::EC => {}
            other => {
                return Err(DssError::Signing(format!(
                    "unsupported key type {other:?}, expected RSA or EC"
                )))
            }
        }
        let cert_der = cert.to_der().map_err(signing_error)?;
        Ok(Self { cert_der, key })
    }

    pub fn from_material(material: &SigningMaterial) -> DssResult<Self> {
        match material {
            SigningMaterial::Pem { cert, key } => {
                let cert = X509::from_pem(cert).map_err(signing_error)?;
                let key = PKey::private_key_from_pem(key).map_err(signing_error)?;
                Self::new(cert, key)
            }
            SigningMaterial::Pkcs12 { der, password } => {
                let parsed = Pkcs12::from_der(der)
                    .and_then(|p| p.parse2(password))
                    .map_err(signing_error)?;
                match (parsed.cert, parsed.pkey) {
                    (Some(cert), Some(key)) => Self::new(cert, key),
                    _ => Err(DssError::Signing(
                        "keystore does not hold a certificate and private key".into(),
                    )),
                }
            }
        }
    }

    pub fn certificate_der(&self) -> &[u8] {
        &self.cert_der
    }

    fn signature_algorithm(&self) -> &'static str {
        if self.key.id() == Id::EC {
            ALG_ECDSA_SHA256
        } else {
            ALG_RSA_SHA256
        }
    }

    fn sign_bytes(&self, data: &[u8]) -> Result<Vec<u8>, openssl::error::ErrorStack> {
        let mut signer = openssl::sign::Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.update(data)?;
        let der = signer.sign_to_vec()?;
        if self.key.id() != Id::EC {
            return Ok(der);
        }
        // XML-DSig wants the raw r||s pair, not the DER sequence
        let field_len = ((self.key.bits() + 7) / 8) as i32;
        let sig = EcdsaSig::from_der(&der)?;
        let mut raw = sig.r().to_vec_padded(field_len)?;
        raw.extend(sig.s().to_vec_padded(field_len)?);
        Ok(raw)
    }

    fn signed_info(&self, digest: &[u8]) -> XmlElement {
        let ds = |name: &str| XmlElement::new(Some(NS_DSIG), name);
        ds("SignedInfo")
            .declare("ds", NS_DSIG)
            .with_child(ds("CanonicalizationMethod").with_attr("Algorithm", ALG_EXC_C14N))
            .with_child(ds("SignatureMethod").with_attr("Algorithm", self.signature_algorithm()))
            .with_child(
                ds("Reference")
                    .with_attr("URI", format!("#{BODY_ID}"))
                    .with_child(
                        ds("Transforms")
                            .with_child(ds("Transform").with_attr("Algorithm", ALG_EXC_C14N)),
                    )
                    .with_child(ds("DigestMethod").with_attr("Algorithm", ALG_SHA256))
                    .with_child(ds("DigestValue").with_text(STANDARD.encode(digest))),
            )
    }
}

impl EnvelopeSigner for WsSecuritySigner {
    fn sign_envelope(&self, mut envelope: SoapEnvelope) -> Result<SoapEnvelope, TransportError> {
        envelope.body.add_declaration("wsu", NS_WSU);
        envelope.body.set_attr(Some(NS_WSU), "Id", BODY_ID);

        let body_c14n = envelope.body.to_xml().map_err(transport_error)?;
        let digest = openssl::sha::sha256(body_c14n.as_bytes());

        let signed_info = self.signed_info(&digest);
        let signed_info_c14n = signed_info.to_xml().map_err(transport_error)?;
        let signature_value = self
            .sign_bytes(signed_info_c14n.as_bytes())
            .map_err(transport_error)?;

        let token = XmlElement::new(Some(NS_WSSE), "BinarySecurityToken")
            .with_ns_attr(NS_WSU, "Id", TOKEN_ID)
            .with_attr("EncodingType", TOKEN_ENCODING)
            .with_attr("ValueType", TOKEN_VALUE_TYPE)
            .with_text(STANDARD.encode(&self.cert_der));

        let key_info = XmlElement::new(Some(NS_DSIG), "KeyInfo").with_child(
            XmlElement::new(Some(NS_WSSE), "SecurityTokenReference").with_child(
                XmlElement::new(Some(NS_WSSE), "Reference")
                    .with_attr("URI", format!("#{TOKEN_ID}"))
                    .with_attr("ValueType", TOKEN_VALUE_TYPE),
            ),
        );

        let signature = XmlElement::new(Some(NS_DSIG), "Signature")
            .with_child(signed_info)
            .with_child(
                XmlElement::new(Some(NS_DSIG), "SignatureValue")
                    .with_text(STANDARD.encode(&signature_value)),
            )
            .with_child(key_info);

        let security = XmlElement::new(Some(NS_WSSE), "Security")
            .with_ns_attr(&envelope.namespace, "mustUnderstand", "1")
            .with_child(token)
            .with_child(signature);

        tracing::debug!(algorithm = self.signature_algorithm(), "signed SOAP body");
        envelope.header.insert(0, security);
        Ok(envelope)
    }
}

fn signing_error(e: openssl::error::ErrorStack) -> DssError {
    DssError::Signing(e.to_string())
}

fn transport_error(e: impl std::fmt::Display) -> TransportError {
    TransportError::Signing(e.to_string())
}
