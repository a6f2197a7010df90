use soap_client::SoapClient;

use crate::action::{parse_state_variables, ActionRequest, StateVariables};
use crate::operations::network_control;
use crate::{KeyCode, Result, Service};

/// Port on which the television serves its remote-control endpoint
pub const DEFAULT_PORT: u16 = 55000;

/// Something able to deliver a remote-control key to a television
///
/// Delivery is best effort: implementations log failures and never report
/// them back to the caller.
pub trait KeySender: Send + Sync {
    fn send_key(&self, host: &str, key: KeyCode);
}

/// A client for executing Panasonic TV actions against actual devices
///
/// This client sits between the stateless [`ActionRequest`] builders and the
/// network. It uses the soap-client crate for the underlying SOAP exchange.
#[derive(Debug, Clone)]
pub struct PanasonicClient {
    soap_client: SoapClient,
}

impl PanasonicClient {
    /// Create a new client using the shared SOAP client
    pub fn new() -> Self {
        Self {
            soap_client: SoapClient::get().clone(),
        }
    }

    /// Create a client with a custom SOAP client
    pub fn with_soap_client(soap_client: SoapClient) -> Self {
        Self { soap_client }
    }

    /// Invoke an action on the control URL of its service
    ///
    /// # Arguments
    /// * `control_url` - Absolute control URL for `request.service`
    /// * `request` - The action and its input arguments
    ///
    /// # Returns
    /// The output arguments of the action keyed by state-variable name
    pub fn invoke(&self, control_url: &str, request: &ActionRequest) -> Result<StateVariables> {
        let service_info = request.service.info();
        let payload = request.build_payload();

        tracing::trace!(
            control_url,
            action = request.action,
            "Invoking UPnP action"
        );

        let response = self.soap_client.call(
            control_url,
            service_info.service_uri,
            request.action,
            &payload,
        )?;

        Ok(parse_state_variables(&response))
    }

    /// Send one remote-control key to `http://{host}/nrc/control_0/`
    ///
    /// `host` may carry a port (`10.0.0.5:55000`). Failures are logged and
    /// swallowed.
    pub fn send_key(&self, host: &str, key: KeyCode) {
        self.send_key_to(&format!("http://{}", host), key);
    }

    /// Send one remote-control key relative to an explicit base URL
    pub fn send_key_to(&self, base_url: &str, key: KeyCode) {
        let url = network_control_url(base_url);
        let request = network_control::send_key(key);

        tracing::debug!(%url, key = key.name(), "Sending remote-control key");

        if let Err(e) = self.invoke(&url, &request) {
            tracing::error!(%url, key = key.name(), error = %e, "Failed to send remote-control key");
        }
    }
}

impl Default for PanasonicClient {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySender for PanasonicClient {
    fn send_key(&self, host: &str, key: KeyCode) {
        PanasonicClient::send_key(self, host, key);
    }
}

/// Remote-control endpoint below a device base URL
pub fn network_control_url(base_url: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        Service::NetworkControl.info().endpoint
    )
}
