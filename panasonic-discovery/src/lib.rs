//! Panasonic television discovery library
//!
//! This crate discovers Panasonic televisions on a local network using SSDP
//! (Simple Service Discovery Protocol) and UPnP device descriptions.
//!
//! # Quick Start
//!
//! ```no_run
//! use panasonic_discovery::get;
//!
//! for device in get() {
//!     println!("Found {} ({}) at {}", device.friendly_name, device.short_type(), device.host);
//! }
//! ```
//!
//! # Discovery results
//!
//! ```no_run
//! use panasonic_discovery::{get, participant};
//!
//! for result in get().iter().filter_map(participant::create_result) {
//!     println!("{} -> {:?}", result.label, result.host());
//! }
//! ```

mod discovery;
mod error;
mod ssdp;
pub mod device;
pub mod participant;

pub use device::ServiceDescription;
pub use discovery::{DiscoveryIterator, SEARCH_TARGETS};
pub use error::{DiscoveryError, Result};
pub use participant::DiscoveryResult;

use std::time::Duration;

/// A UPnP root device found on the network.
///
/// A television exposes several of these (a media renderer and a vendor
/// remote controller), all with the same host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDevice {
    /// Unique device name, e.g. "uuid:4d454930-0100-1000-8001-a81374a6b2c1"
    pub udn: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub model_name: String,
    /// Full device type URN
    pub device_type: String,
    /// Host taken from the description URL
    pub host: String,
    pub port: u16,
    /// URL the description was fetched from; relative control URLs resolve against it
    pub descriptor_url: String,
    pub services: Vec<ServiceDescription>,
}

impl RemoteDevice {
    /// Device type without the URN prefix and version, e.g. "MediaRenderer"
    pub fn short_type(&self) -> &str {
        device::short_device_type(&self.device_type)
    }

    /// UDN without the `uuid:` prefix
    pub fn identifier(&self) -> &str {
        self.udn.strip_prefix("uuid:").unwrap_or(&self.udn)
    }

    pub fn is_panasonic(&self) -> bool {
        device::is_panasonic_manufacturer(&self.manufacturer)
    }

    /// Service entry for a service type URN
    pub fn service(&self, service_type: &str) -> Option<&ServiceDescription> {
        self.services.iter().find(|s| s.service_type == service_type)
    }
}

/// Events emitted during device discovery.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A Panasonic device was found on the network
    Found(RemoteDevice),
}

/// Discover all Panasonic devices on the local network with a default 3-second timeout.
pub fn get() -> Vec<RemoteDevice> {
    get_with_timeout(Duration::from_secs(3))
}

/// Discover all Panasonic devices on the local network with a custom timeout.
///
/// # Arguments
///
/// * `timeout` - Maximum duration to wait for SSDP replies and each HTTP request
pub fn get_with_timeout(timeout: Duration) -> Vec<RemoteDevice> {
    get_iter_with_timeout(timeout)
        .map(|event| match event {
            DeviceEvent::Found(device) => device,
        })
        .collect()
}

/// Get an iterator for discovering Panasonic devices with a default 3-second timeout.
pub fn get_iter() -> DiscoveryIterator {
    get_iter_with_timeout(Duration::from_secs(3))
}

/// Get an iterator for discovering Panasonic devices with a custom timeout.
///
/// If the UDP socket cannot be opened the iterator is empty.
pub fn get_iter_with_timeout(timeout: Duration) -> DiscoveryIterator {
    DiscoveryIterator::new(timeout).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discovery unavailable");
        DiscoveryIterator::empty()
    })
}
