//! Boundary to the hosting automation layer
//!
//! The binding reports channel state and thing status through [`StateSink`]
//! and learns about televisions through a [`DiscoveryServiceRegistry`].

use std::sync::Arc;

use panasonic_discovery::DiscoveryResult;

use crate::channel::{Channel, StateValue, StatusDetail, ThingStatus};

/// Receives state and status updates for one bound television
pub trait StateSink: Send + Sync {
    fn update_state(&self, channel: Channel, value: StateValue);

    fn update_status(&self, status: ThingStatus, detail: StatusDetail, message: Option<&str>);
}

/// Notified when discovery results appear or disappear
pub trait DiscoveryListener: Send + Sync {
    fn thing_discovered(&self, source: &str, result: &DiscoveryResult);

    fn thing_removed(&self, source: &str, thing_id: &str);
}

/// Source of discovery events
pub trait DiscoveryServiceRegistry: Send + Sync {
    fn add_discovery_listener(&self, listener: Arc<dyn DiscoveryListener>);

    fn remove_discovery_listener(&self, listener: &Arc<dyn DiscoveryListener>);
}
