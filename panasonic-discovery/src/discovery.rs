//! Core discovery logic and iterator implementation.
//!
//! The iterator:
//! 1. Sends SSDP M-SEARCH requests for the television's device types
//! 2. Receives and de-duplicates SSDP replies by location
//! 3. Fetches each device description via HTTP
//! 4. Yields the Panasonic devices as events

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use crate::device::{fetch_remote_device, is_panasonic_manufacturer};
use crate::error::{DiscoveryError, Result};
use crate::ssdp::{SsdpClient, SsdpResponse};
use crate::DeviceEvent;

/// Device types searched for: the standard renderer and the vendor remote controller
pub const SEARCH_TARGETS: [&str; 2] = [
    "urn:schemas-upnp-org:device:MediaRenderer:1",
    "urn:panasonic-com:device:p00RemoteController:1",
];

/// Iterator that discovers Panasonic television devices on the local network.
///
/// One television usually answers twice, once per device type; both are
/// yielded as separate [`RemoteDevice`](crate::RemoteDevice)s sharing a host.
///
/// # Examples
///
/// ```no_run
/// use panasonic_discovery::{get_iter, DeviceEvent};
///
/// for event in get_iter() {
///     match event {
///         DeviceEvent::Found(device) => {
///             println!("Found: {} ({})", device.friendly_name, device.short_type());
///         }
///     }
/// }
/// ```
pub struct DiscoveryIterator {
    ssdp_client: Option<SsdpClient>,
    pending: VecDeque<SsdpResponse>,
    seen_locations: HashSet<String>,
    http_client: reqwest::blocking::Client,
}

impl DiscoveryIterator {
    /// Create a new discovery iterator with the specified timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let ssdp_client = SsdpClient::new(timeout)?;
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            ssdp_client: Some(ssdp_client),
            pending: VecDeque::new(),
            seen_locations: HashSet::new(),
            http_client,
        })
    }

    /// An iterator that yields nothing; used when the socket cannot be opened
    pub(crate) fn empty() -> Self {
        Self {
            ssdp_client: None,
            pending: VecDeque::new(),
            seen_locations: HashSet::new(),
            http_client: reqwest::blocking::Client::new(),
        }
    }

    /// Early filter on the SSDP reply before fetching the description
    fn is_candidate(response: &SsdpResponse) -> bool {
        SEARCH_TARGETS.contains(&response.search_target.as_str())
            || response
                .server
                .as_deref()
                .map(is_panasonic_manufacturer)
                .unwrap_or(false)
    }

    fn collect_replies(&mut self) {
        if let Some(client) = self.ssdp_client.take() {
            match client.search(&SEARCH_TARGETS) {
                Ok(replies) => {
                    for reply in replies {
                        match reply {
                            Ok(response) => self.pending.push_back(response),
                            Err(e) => tracing::debug!(error = %e, "SSDP receive failed"),
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "SSDP search failed"),
            }
        }
    }
}

impl Iterator for DiscoveryIterator {
    type Item = DeviceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.collect_replies();

        while let Some(response) = self.pending.pop_front() {
            if !self.seen_locations.insert(response.location.clone()) {
                continue;
            }

            if !Self::is_candidate(&response) {
                continue;
            }

            let device = match fetch_remote_device(&self.http_client, &response.location) {
                Ok(device) => device,
                Err(e) => {
                    tracing::debug!(location = %response.location, error = %e, "Skipping device");
                    continue;
                }
            };

            if !device.is_panasonic() {
                continue;
            }

            tracing::debug!(
                udn = %device.udn,
                host = %device.host,
                device_type = device.short_type(),
                "Discovered Panasonic device"
            );
            return Some(DeviceEvent::Found(device));
        }

        None
    }
}
