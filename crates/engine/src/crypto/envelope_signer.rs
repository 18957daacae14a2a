//! Envelope signing capability.

use crate::adapters::afirma::SoapEnvelope;
use crate::domain::error::TransportError;

/// Signs an outgoing SOAP envelope as a whole before it is posted.
///
/// The client only decides whether to sign; how is up to the implementation
/// (the built-in WS-Security signer, an HSM
/// bridge, ...).
pub trait EnvelopeSigner: Send + Sync {
    fn sign_envelope(&self, envelope: SoapEnvelope) -> Result<SoapEnvelope, TransportError>;
}

impl<T: EnvelopeSigner + ?Sized> EnvelopeSigner for Box<T> {
    fn sign_envelope(&self, envelope: SoapEnvelope) -> Result<SoapEnvelope, TransportError> {
        (**self).sign_envelope(envelope)
    }
}
