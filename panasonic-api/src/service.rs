/// Represents the UPnP services used to control a Panasonic television
///
/// A television exposes several UPnP devices; the standard media renderer
/// carries `RenderingControl` and `AVTransport`, while the vendor
/// `p00RemoteController` device carries `NetworkControl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// RenderingControl service - volume and mute
    RenderingControl,

    /// AVTransport service - current media and now-playing metadata
    AVTransport,

    /// p00NetworkControl service - raw remote-control key injection
    NetworkControl,
}

/// Contains the endpoint and service URI information for a UPnP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// Default HTTP control path, relative to the device base URL.
    /// Control URLs advertised in the device description take precedence.
    pub endpoint: &'static str,

    /// The UPnP service URI used in SOAP requests
    pub service_uri: &'static str,
}

impl Service {
    /// All services known to this crate
    pub const ALL: [Service; 3] = [
        Service::RenderingControl,
        Service::AVTransport,
        Service::NetworkControl,
    ];

    /// Get the name of this service as a string
    pub fn name(&self) -> &'static str {
        match self {
            Service::RenderingControl => "RenderingControl",
            Service::AVTransport => "AVTransport",
            Service::NetworkControl => "p00NetworkControl",
        }
    }

    /// Get the service information (endpoint and URI) for this service
    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::RenderingControl => ServiceInfo {
                endpoint: "dmr/control_0",
                service_uri: "urn:schemas-upnp-org:service:RenderingControl:1",
            },
            Service::AVTransport => ServiceInfo {
                endpoint: "dmr/control_1",
                service_uri: "urn:schemas-upnp-org:service:AVTransport:1",
            },
            Service::NetworkControl => ServiceInfo {
                endpoint: "nrc/control_0/",
                service_uri: "urn:panasonic-com:service:p00NetworkControl:1",
            },
        }
    }

    /// Resolve a `serviceType` URN from a device description
    pub fn from_service_type(service_type: &str) -> Option<Service> {
        Self::ALL
            .into_iter()
            .find(|service| service.info().service_uri == service_type.trim())
    }
}
