//! Capability services: the units of device functionality a binding owns
//!
//! Each service is created for one UPnP device of a television and handles
//! a fixed set of channels. Services report changed values to registered
//! [`ValueReceiver`]s.

mod cache;
mod media_renderer;
mod poller;
mod registry;
mod remote_controller;

pub use cache::StateCache;
pub use media_renderer::MediaRendererService;
pub use registry::{ServiceContext, ServiceDescriptor, ServiceRegistry};
pub use remote_controller::{channel_key_sequence, RemoteControllerService, KEY_DELAY};

use std::sync::Arc;

use parking_lot::RwLock;

use crate::channel::{Channel, Command, StateValue};
use crate::error::Result;
use crate::same_object;

/// Receives values reported by a capability service
pub trait ValueReceiver: Send + Sync {
    fn value_received(&self, channel: Channel, value: StateValue);
}

/// Implementation identity of a capability service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    MediaRenderer,
    RemoteController,
}

impl ServiceKind {
    /// UPnP device type handled by this kind of service
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceKind::MediaRenderer => media_renderer::SERVICE_NAME,
            ServiceKind::RemoteController => remote_controller::SERVICE_NAME,
        }
    }
}

/// Common contract of every capability service
pub trait CapabilityService: Send + Sync {
    fn service_name(&self) -> &'static str {
        self.kind().service_name()
    }

    fn kind(&self) -> ServiceKind;

    /// Channels this service accepts commands for
    fn supported_channels(&self) -> &'static [Channel];

    fn handle_command(&self, channel: Channel, command: &Command) -> Result<()>;

    /// Begin background work; no effect when already running
    fn start(&self);

    /// Cancel background work; no effect when not running
    fn stop(&self);

    /// Forget cached values so the next poll reports everything again
    fn clear_cache(&self);

    fn add_value_listener(&self, listener: Arc<dyn ValueReceiver>);

    fn remove_value_listener(&self, listener: &Arc<dyn ValueReceiver>);
}

/// Registered value receivers of one service
#[derive(Default)]
pub(crate) struct Listeners {
    receivers: RwLock<Vec<Arc<dyn ValueReceiver>>>,
}

impl Listeners {
    pub fn add(&self, listener: Arc<dyn ValueReceiver>) {
        let mut receivers = self.receivers.write();
        if !receivers.iter().any(|r| same_object(r, &listener)) {
            receivers.push(listener);
        }
    }

    pub fn remove(&self, listener: &Arc<dyn ValueReceiver>) {
        self.receivers.write().retain(|r| !same_object(r, listener));
    }

    pub fn notify(&self, channel: Channel, value: StateValue) {
        let receivers = self.receivers.read().clone();
        for receiver in receivers {
            receiver.value_received(channel, value.clone());
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.receivers.read().len()
    }
}
