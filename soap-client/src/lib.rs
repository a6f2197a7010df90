//! Private SOAP client for UPnP device communication
//!
//! This crate provides a minimal SOAP 1.1 client for the control endpoints
//! exposed by Panasonic televisions: the standard UPnP media renderer
//! services and the vendor `p00NetworkControl` remote-key service.

mod error;

pub use error::SoapError;

use std::sync::OnceLock;
use std::time::Duration;
use xmltree::Element;

/// Content type sent with every SOAP request
pub const CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

static SHARED_CLIENT: OnceLock<SoapClient> = OnceLock::new();

/// A minimal SOAP client for UPnP device communication
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self::with_timeouts(Duration::from_secs(5), Duration::from_secs(10))
    }

    /// Create a SOAP client with explicit connect/read timeouts
    pub fn with_timeouts(connect: Duration, read: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
        }
    }

    /// Get the process-wide shared client
    pub fn get() -> &'static SoapClient {
        SHARED_CLIENT.get_or_init(SoapClient::new)
    }

    /// Send a SOAP request to `url` and return the parsed action response element
    ///
    /// The request body is built fresh for every call, so concurrent calls never
    /// share envelope state. The HTTP response is always read to the end, which
    /// hands the connection back to the agent on every exit path.
    pub fn call(
        &self,
        url: &str,
        service_uri: &str,
        action: &str,
        payload: &str,
    ) -> Result<Element, SoapError> {
        let body = build_envelope(service_uri, action, payload);
        let soap_action = soap_action_header(service_uri, action);

        let response = self
            .agent
            .post(url)
            .set("Content-Type", CONTENT_TYPE)
            .set("SOAPAction", &soap_action)
            .send_string(&body);

        let xml_text = match response {
            Ok(response) => response
                .into_string()
                .map_err(|e| SoapError::Network(e.to_string()))?,
            Err(ureq::Error::Status(code, response)) => {
                // UPnP devices report faults with HTTP 500 and a SOAP body
                let text = response.into_string().unwrap_or_default();
                return match Element::parse(text.as_bytes()) {
                    Ok(xml) if is_fault(&xml) => self.extract_response(&xml, action),
                    _ => Err(SoapError::Network(format!("HTTP {} from {}", code, url))),
                };
            }
            Err(e) => return Err(SoapError::Network(e.to_string())),
        };

        let xml = Element::parse(xml_text.as_bytes())
            .map_err(|e| SoapError::Parse(e.to_string()))?;

        self.extract_response(&xml, action)
    }

    fn extract_response(&self, xml: &Element, action: &str) -> Result<Element, SoapError> {
        let body = xml
            .get_child("Body")
            .ok_or_else(|| SoapError::Parse("Missing SOAP Body".to_string()))?;

        // Check for SOAP fault first
        if let Some(fault) = body.get_child("Fault") {
            let error_code = fault
                .get_child("detail")
                .and_then(|d| d.get_child("UPnPError"))
                .and_then(|e| e.get_child("errorCode"))
                .and_then(|c| c.get_text())
                .and_then(|t| t.trim().parse::<u16>().ok())
                .unwrap_or(500);
            return Err(SoapError::Fault(error_code));
        }

        let response_name = format!("{}Response", action);
        body.get_child(response_name.as_str())
            .cloned()
            .ok_or_else(|| SoapError::Parse(format!("Missing {} element", response_name)))
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

fn is_fault(xml: &Element) -> bool {
    xml.get_child("Body")
        .and_then(|body| body.get_child("Fault"))
        .is_some()
}

/// Build a SOAP 1.1 envelope around an action element in `service_uri`
///
/// `payload` is inserted verbatim as the action's children and must already be
/// XML-escaped.
pub fn build_envelope(service_uri: &str, action: &str, payload: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{action} xmlns:u="{service_uri}">{payload}</u:{action}></s:Body></s:Envelope>"#,
        action = action,
        service_uri = service_uri,
        payload = payload
    )
}

/// Value of the `SOAPAction` header, including the surrounding quotes
pub fn soap_action_header(service_uri: &str, action: &str) -> String {
    format!("\"{}#{}\"", service_uri, action)
}
