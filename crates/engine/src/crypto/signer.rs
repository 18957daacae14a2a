//! Signing credential sources for outgoing SOAP envelopes.
//! Supports PEM files, PEM text in env variables and PKCS#12 keystores.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use zeroize::Zeroizing;

use super::envelope_signer::EnvelopeSigner;
use crate::domain::error::{DssError, DssResult};

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Invalid signer URI scheme: expected 'local:', 'env:' or 'pkcs12:'")]
    InvalidScheme,
    #[error("Missing path for '{0}:' signer")]
    MissingPath(&'static str),
    #[error("Missing variable name for '{0}:' signer")]
    MissingEnvVar(&'static str),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Source for the envelope signing certificate and key.
/// Format examples:
/// - local:/path/to/cert.pem,/path/to/private.pem
/// - env:CERT_VAR,KEY_VAR
/// - pkcs12:/path/to/store.p12,PASSWORD_VAR
#[derive(Debug, Clone)]
pub enum Signer {
    Local { cert_path: PathBuf, key_path: PathBuf },
    Env { cert_var: String, key_var: String },
    Pkcs12 { path: PathBuf, password_var: String },
}

impl FromStr for Signer {
    type Err = SignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, value) = s.split_once(':').ok_or(SignerError::InvalidScheme)?;
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != 2 {
            return Err(SignerError::InvalidScheme);
        }

        match scheme {
            "local" => {
                if parts.iter().any(|p| p.is_empty()) {
                    return Err(SignerError::MissingPath("local"));
                }
                Ok(Signer::Local {
                    cert_path: PathBuf::from(parts[0]),
                    key_path: PathBuf::from(parts[1]),
                })
            }
            "env" => {
                if parts.iter().any(|p| p.is_empty()) {
                    return Err(SignerError::MissingEnvVar("env"));
                }
                Ok(Signer::Env {
                    cert_var: parts[0].to_string(),
                    key_var: parts[1].to_string(),
                })
            }
            "pkcs12" => {
                if parts[0].is_empty() {
                    return Err(SignerError::MissingPath("pkcs12"));
                }
                if parts[1].is_empty() {
                    return Err(SignerError::MissingEnvVar("pkcs12"));
                }
                Ok(Signer::Pkcs12 {
                    path: PathBuf::from(parts[0]),
                    password_var: parts[1].to_string(),
                })
            }
            _ => Err(SignerError::InvalidScheme),
        }
    }
}

/// Raw credential bytes, wiped from memory on drop.
pub enum SigningMaterial {
    Pem {
        cert: Vec<u8>,
        key: Zeroizing<Vec<u8>>,
    },
    Pkcs12 {
        der: Zeroizing<Vec<u8>>,
        password: Zeroizing<String>,
    },
}

impl Signer {
    /// Read the credentials this source points at.
    pub fn load(&self) -> DssResult<SigningMaterial> {
        match self {
            Signer::Local {
                cert_path,
                key_path,
            } => {
                let cert = std::fs::read(cert_path).map_err(|e| {
                    DssError::Signing(format!("failed to read {}: {e}", cert_path.display()))
                })?;
                let key = Zeroizing::new(std::fs::read(key_path).map_err(|e| {
                    DssError::Signing(format!("failed to read {}: {e}", key_path.display()))
                })?);
                Ok(SigningMaterial::Pem { cert, key })
            }
            Signer::Env { cert_var, key_var } => {
                let cert = env_secret(cert_var)?;
                let key = env_secret(key_var)?;
                Ok(SigningMaterial::Pem {
                    cert: cert.as_bytes().to_vec(),
                    key: Zeroizing::new(key.as_bytes().to_vec()),
                })
            }
            Signer::Pkcs12 { path, password_var } => {
                let der = Zeroizing::new(std::fs::read(path).map_err(|e| {
                    DssError::Signing(format!("failed to read {}: {e}", path.display()))
                })?);
                let password = env_secret(password_var)?;
                Ok(SigningMaterial::Pkcs12 { der, password })
            }
        }
    }

    /// Resolve into an envelope signer (only available with the openssl feature).
    #[cfg(feature = "openssl")]
    pub fn resolve(&self) -> DssResult<Box<dyn EnvelopeSigner>> {
        let material = self.load()?;
        let signer = super::wss::WsSecuritySigner::from_material(&material)?;
        Ok(Box::new(signer))
    }

    #[cfg(not(feature = "openssl"))]
    pub fn resolve(&self) -> DssResult<Box<dyn EnvelopeSigner>> {
        Err(DssError::Feature("openssl"))
    }
}

fn env_secret(var: &str) -> DssResult<Zeroizing<String>> {
    std::env::var(var)
        .map(Zeroizing::new)
        .map_err(|_| DssError::Signing(SignerError::EnvVarNotFound(var.to_string()).to_string()))
}
