//! Turns discovered devices into television discovery results
//!
//! Only the media renderer root device of a Panasonic set produces a result;
//! the remote controller device of the same set is picked up later by the
//! binding through the device registry.

use std::collections::HashMap;

use crate::RemoteDevice;

/// Thing type under which televisions are reported
pub const THING_TYPE: &str = "panasonictv2:panasonictv";

/// Property carrying the television's host
pub const HOST_NAME: &str = "hostName";

/// Label used when the device has no friendly name
pub const DEFAULT_LABEL: &str = "Panasonic TV";

const MEDIA_RENDERER: &str = "MediaRenderer";

/// A television found on the network, ready to be bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryResult {
    pub thing_id: String,
    pub label: String,
    pub properties: HashMap<String, String>,
}

impl DiscoveryResult {
    /// Host advertised by the device, if present
    pub fn host(&self) -> Option<&str> {
        self.properties.get(HOST_NAME).map(String::as_str)
    }
}

/// Identifier for a device, or `None` if it is not a Panasonic media renderer
///
/// Dashes in the UDN are replaced by underscores.
pub fn thing_id(device: &RemoteDevice) -> Option<String> {
    if !device.is_panasonic() || device.short_type() != MEDIA_RENDERER {
        return None;
    }

    let udn = device.identifier().replace('-', "_");
    tracing::debug!(
        friendly_name = %device.friendly_name,
        model_name = %device.model_name,
        %udn,
        "Discovered a Panasonic TV"
    );
    Some(format!("{}:{}", THING_TYPE, udn))
}

/// Build the discovery result for a device, or `None` if it is not a television
pub fn create_result(device: &RemoteDevice) -> Option<DiscoveryResult> {
    let thing_id = thing_id(device)?;

    let label = if device.friendly_name.trim().is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        device.friendly_name.clone()
    };

    let mut properties = HashMap::new();
    properties.insert(HOST_NAME.to_string(), device.host.clone());

    tracing::debug!(
        model_name = %device.model_name,
        udn = %device.udn,
        "Created a discovery result"
    );

    Some(DiscoveryResult {
        thing_id,
        label,
        properties,
    })
}
