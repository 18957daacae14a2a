mod common;

use afirma_dss as dss;
use dss::adapters::afirma::{dss_verify_body, XmlElement, NS_DSS};
use dss::domain::service::SignatureService;
use dss::domain::types::SignatureFormat;

fn transport_err(err: dss::DssError) -> dss::TransportError {
    match err {
        dss::DssError::Transport(t) => t,
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[test]
fn soap_fault_is_reported_even_with_500() {
    let client = common::client(vec![dss::HttpResponse {
        status: 500,
        body: common::soap_fault("soapenv:Server", "Aplicacion no autorizada").into_bytes(),
    }]);
    let err = transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err());
    match err {
        dss::TransportError::Fault { code, message } => {
            assert_eq!(code, "soapenv:Server");
            assert_eq!(message, "Aplicacion no autorizada");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn soap12_fault_is_understood() {
    let body = "<env:Envelope xmlns:env=\"http://www.w3.org/2003/05/soap-envelope\"><env:Body><env:Fault>\
                <env:Code><env:Value>env:Receiver</env:Value></env:Code>\
                <env:Reason><env:Text xml:lang=\"en\">down for maintenance</env:Text></env:Reason>\
                </env:Fault></env:Body></env:Envelope>";
    let client = common::client(vec![common::ok(body.to_string())]);
    match transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err()) {
        dss::TransportError::Fault { code, message } => {
            assert_eq!(code, "env:Receiver");
            assert_eq!(message, "down for maintenance");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn non_soap_error_body_reports_status() {
    let client = common::client(vec![dss::HttpResponse {
        status: 503,
        body: b"<html>Service Unavailable</html".to_vec(),
    }]);
    let err = transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err());
    assert!(matches!(err, dss::TransportError::Status(503)));
}

#[test]
fn garbage_with_200_is_envelope_error() {
    let client = common::client(vec![common::ok("not xml at all".to_string())]);
    let err = transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err());
    assert!(matches!(err, dss::TransportError::Envelope(_)));
}

#[test]
fn empty_body_is_envelope_error() {
    let body = format!(
        "<soapenv:Envelope xmlns:soapenv=\"{}\"><soapenv:Body>  </soapenv:Body></soapenv:Envelope>",
        common::NS_SOAP
    );
    let client = common::client(vec![common::ok(body)]);
    let err = transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err());
    assert!(matches!(err, dss::TransportError::Envelope(_)));
}

#[test]
fn oversized_response_is_rejected() {
    let mut config = common::config();
    config.limits.max_response_size = 64;
    let client = dss::AfirmaClient::with_transport(
        config,
        common::StubTransport::replying(vec![common::response(common::VALID_SIGNATURE, None, "")]),
    )
    .unwrap();
    let err = transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err());
    assert!(matches!(err, dss::TransportError::ResponseTooLarge { limit: 64 }));
}

#[test]
fn transport_failure_propagates() {
    // no canned response: the stub fails the POST
    let client = common::client(vec![]);
    let err = transport_err(client.verify(b"sig", SignatureFormat::XAdES).unwrap_err());
    assert!(matches!(err, dss::TransportError::Status(599)));
}

#[test]
fn payload_text_is_verbatim() {
    let inner = "  <a>\n  kept  </a>  ";
    let envelope = dss::SoapEnvelope::parse(&common::soap_wrap(inner)).unwrap();
    assert_eq!(envelope.payload_text().unwrap(), inner);
}

#[test]
fn wrap_and_parse_round_trip() {
    let request = XmlElement::new(Some(NS_DSS), "VerifyRequest").with_attr("Profile", "p");
    let body = dss_verify_body(&request).unwrap();
    let envelope = dss::SoapEnvelope::wrap(body);
    assert!(envelope.header.is_empty());

    let xml = envelope.to_xml().unwrap();
    assert!(!xml.contains("Header"));
    let back = dss::SoapEnvelope::parse(&xml).unwrap();
    assert_eq!(back.namespace, common::NS_SOAP);
    let inner = XmlElement::parse(&back.payload_text().unwrap()).unwrap();
    assert_eq!(inner, request);
}

#[test]
fn byte_order_mark_is_tolerated() {
    let xml = format!("\u{feff}\n{}", common::soap_wrap("<x>1</x>"));
    let envelope = dss::SoapEnvelope::parse(&xml).unwrap();
    assert_eq!(envelope.payload_text().unwrap(), "<x>1</x>");
}

#[test]
fn non_envelope_root_is_rejected() {
    assert!(dss::SoapEnvelope::parse("<Envelope/>").is_err());
}
