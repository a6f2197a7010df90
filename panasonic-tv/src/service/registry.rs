//! Table of service implementations keyed by UPnP device type

use std::sync::Arc;
use std::time::Duration;

use panasonic_api::KeySender;

use super::{
    media_renderer, remote_controller, CapabilityService, MediaRendererService,
    RemoteControllerService, ServiceKind,
};
use crate::upnp::UpnpIo;

/// Everything a service needs to talk to one device of a television
#[derive(Clone)]
pub struct ServiceContext {
    pub upnp_io: Arc<dyn UpnpIo>,
    pub key_sender: Arc<dyn KeySender>,
    pub udn: String,
    pub poll_interval: Duration,
    pub host: String,
    pub port: u16,
}

/// Associates a device type with the service that handles it
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub service_type: &'static str,
    pub kind: ServiceKind,
    pub constructor: fn(&ServiceContext) -> Arc<dyn CapabilityService>,
}

fn create_media_renderer(context: &ServiceContext) -> Arc<dyn CapabilityService> {
    Arc::new(MediaRendererService::new(
        Arc::clone(&context.upnp_io),
        context.udn.clone(),
        context.poll_interval,
    ))
}

fn create_remote_controller(context: &ServiceContext) -> Arc<dyn CapabilityService> {
    Arc::new(RemoteControllerService::new(
        Arc::clone(&context.key_sender),
        &context.host,
        context.port,
    ))
}

const DESCRIPTORS: &[ServiceDescriptor] = &[
    ServiceDescriptor {
        service_type: media_renderer::SERVICE_NAME,
        kind: ServiceKind::MediaRenderer,
        constructor: create_media_renderer,
    },
    ServiceDescriptor {
        service_type: remote_controller::SERVICE_NAME,
        kind: ServiceKind::RemoteController,
        constructor: create_remote_controller,
    },
];

/// Creates services for device types the binding understands
///
/// The table is fixed once the registry is built.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    descriptors: Vec<ServiceDescriptor>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::with_descriptors(DESCRIPTORS.to_vec())
    }
}

impl ServiceRegistry {
    /// Registry of the built-in media renderer and remote controller services
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descriptors(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self { descriptors }
    }

    fn descriptor(&self, service_type: &str) -> Option<&ServiceDescriptor> {
        self.descriptors.iter().find(|d| d.service_type == service_type)
    }

    /// Kind of service created for a device type
    pub fn kind_for(&self, service_type: &str) -> Option<ServiceKind> {
        self.descriptor(service_type).map(|d| d.kind)
    }

    /// Create the service for a device type; `None` for unknown types
    pub fn create(
        &self,
        service_type: &str,
        context: &ServiceContext,
    ) -> Option<Arc<dyn CapabilityService>> {
        let descriptor = self.descriptor(service_type)?;
        tracing::debug!(service_type, udn = %context.udn, "Creating service");
        Some((descriptor.constructor)(context))
    }

    pub fn count(&self) -> usize {
        self.descriptors.len()
    }
}
