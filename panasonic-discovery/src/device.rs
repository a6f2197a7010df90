//! Device description parsing and validation.
//!
//! This module handles parsing UPnP device description XML and deciding
//! whether a device belongs to a Panasonic television.

use crate::error::{DiscoveryError, Result};
use crate::RemoteDevice;
use serde::Deserialize;

/// Manufacturer string advertised by Panasonic televisions
pub const PANASONIC_MANUFACTURER: &str = "Panasonic";

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
pub struct Root {
    pub device: DeviceDescription,
}

/// Device description parsed from XML.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    #[serde(default)]
    pub model_name: String,
    pub model_number: Option<String>,
    #[serde(rename = "UDN")]
    pub udn: String,
    #[serde(default)]
    pub service_list: ServiceList,
}

/// `<serviceList>` of a device description
#[derive(Debug, Default, Deserialize)]
pub struct ServiceList {
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceDescription>,
}

/// One `<service>` entry of a device description
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub service_type: String,
    pub service_id: String,
    #[serde(rename = "controlURL")]
    pub control_url: String,
}

impl DeviceDescription {
    /// Parse device description from XML.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the XML is malformed or missing required fields.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root: Root = quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))?;

        Ok(root.device)
    }

    /// Convert to the public device type, taking the address from `location`.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidDevice` when no host can be read from the URL.
    pub fn into_remote_device(self, location: &str) -> Result<RemoteDevice> {
        let host = extract_host_from_url(location).ok_or_else(|| {
            DiscoveryError::InvalidDevice(format!("No host in descriptor URL {}", location))
        })?;

        Ok(RemoteDevice {
            udn: self.udn,
            friendly_name: self.friendly_name,
            manufacturer: self.manufacturer,
            model_name: self.model_name,
            device_type: self.device_type,
            host,
            port: extract_port_from_url(location).unwrap_or(80),
            descriptor_url: location.to_string(),
            services: self.service_list.services,
        })
    }

    /// Check if this device was made by Panasonic.
    pub fn is_panasonic_device(&self) -> bool {
        is_panasonic_manufacturer(&self.manufacturer)
    }
}

/// Manufacturer match, ignoring case
pub fn is_panasonic_manufacturer(manufacturer: &str) -> bool {
    manufacturer
        .to_uppercase()
        .contains(&PANASONIC_MANUFACTURER.to_uppercase())
}

/// Fetch a device description over HTTP and convert it.
pub fn fetch_remote_device(
    http_client: &reqwest::blocking::Client,
    location: &str,
) -> Result<RemoteDevice> {
    let response = http_client
        .get(location)
        .send()
        .map_err(|e| DiscoveryError::NetworkError(format!("Failed to fetch device description: {}", e)))?;

    let xml = response
        .text()
        .map_err(|e| DiscoveryError::NetworkError(format!("Failed to read response body: {}", e)))?;

    DeviceDescription::from_xml(&xml)?.into_remote_device(location)
}

/// Short form of a UPnP device type URN.
///
/// `urn:schemas-upnp-org:device:MediaRenderer:1` becomes `MediaRenderer`;
/// anything that is not a device URN is returned unchanged.
pub fn short_device_type(device_type: &str) -> &str {
    let parts: Vec<&str> = device_type.split(':').collect();
    match parts.as_slice() {
        ["urn", _, "device", name, _] => name,
        _ => device_type,
    }
}

/// Extract the host from a URL.
///
/// # Arguments
///
/// * `url` - URL string (e.g., "http://192.168.1.40:55000/nrc/ddd.xml")
///
/// # Returns
///
/// The host portion of the URL, or `None` if the URL is malformed.
pub fn extract_host_from_url(url: &str) -> Option<String> {
    url.split("//")
        .nth(1)?
        .split(|c| c == ':' || c == '/')
        .next()
        .filter(|host| !host.is_empty())
        .map(|s| s.to_string())
}

/// Extract an explicit port from a URL.
pub fn extract_port_from_url(url: &str) -> Option<u16> {
    let authority = url.split("//").nth(1)?.split('/').next()?;
    authority.rsplit_once(':')?.1.parse().ok()
}
