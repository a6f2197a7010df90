//! UPnP action invocation for registered devices

use std::collections::HashMap;

use panasonic_api::{ActionRequest, ApiError, PanasonicClient, Service, StateVariables};
use panasonic_discovery::RemoteDevice;
use parking_lot::RwLock;
use url::Url;

use crate::device_registry::RegistryListener;

/// Invokes UPnP actions on devices known by UDN
pub trait UpnpIo: Send + Sync {
    /// Whether the device is currently reachable through this channel
    fn is_registered(&self, udn: &str) -> bool;

    fn invoke_action(&self, udn: &str, request: &ActionRequest) -> panasonic_api::Result<StateVariables>;
}

/// [`UpnpIo`] over SOAP, using the control URLs of each device description
///
/// Devices register themselves by adding this as a listener on a device registry.
#[derive(Debug, Default)]
pub struct SoapUpnpIo {
    client: PanasonicClient,
    devices: RwLock<HashMap<String, RemoteDevice>>,
}

impl SoapUpnpIo {
    pub fn new() -> Self {
        Self::with_client(PanasonicClient::new())
    }

    pub fn with_client(client: PanasonicClient) -> Self {
        Self {
            client,
            devices: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, device: RemoteDevice) {
        tracing::debug!(udn = %device.udn, host = %device.host, "Registering device");
        self.devices.write().insert(device.udn.clone(), device);
    }

    pub fn unregister(&self, udn: &str) {
        if self.devices.write().remove(udn).is_some() {
            tracing::debug!(udn, "Unregistered device");
        }
    }

    /// Absolute control URL of `service` on `device`
    ///
    /// The device description wins; the well-known path is the fallback.
    pub fn control_url(device: &RemoteDevice, service: Service) -> panasonic_api::Result<String> {
        let info = service.info();
        let path = device
            .service(info.service_uri)
            .map(|s| s.control_url.clone())
            .unwrap_or_else(|| format!("/{}", info.endpoint));

        let base = Url::parse(&device.descriptor_url).map_err(|e| {
            ApiError::InvalidParameter(format!("descriptor URL {}: {}", device.descriptor_url, e))
        })?;
        let url = base
            .join(&path)
            .map_err(|e| ApiError::InvalidParameter(format!("control URL {}: {}", path, e)))?;

        Ok(url.to_string())
    }
}

impl UpnpIo for SoapUpnpIo {
    fn is_registered(&self, udn: &str) -> bool {
        self.devices.read().contains_key(udn)
    }

    fn invoke_action(&self, udn: &str, request: &ActionRequest) -> panasonic_api::Result<StateVariables> {
        let url = {
            let devices = self.devices.read();
            let device = devices
                .get(udn)
                .ok_or_else(|| ApiError::NetworkError(format!("Device {} is not registered", udn)))?;
            Self::control_url(device, request.service)?
        };

        self.client.invoke(&url, request)
    }
}

impl RegistryListener for SoapUpnpIo {
    fn remote_device_added(&self, device: &RemoteDevice) {
        self.register(device.clone());
    }

    fn remote_device_removed(&self, device: &RemoteDevice) {
        self.unregister(&device.udn);
    }
}
