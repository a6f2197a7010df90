//! Panasonic TV binding
//!
//! Binds a Panasonic television to a home-automation layer: volume, mute and
//! now-playing information are polled from the media renderer, while power,
//! channel selection and raw remote keys are injected through the vendor
//! remote controller.
//!
//! # Architecture
//!
//! ```text
//! discovery result ─┐
//!                   ├→ TvBinding ─→ capability services ─→ UPnP / SOAP
//! device registry ──┘      ↑               │
//!                          └─ values ──────┘ → StateSink
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use panasonic_tv::{
//!     Collaborators, InMemoryDeviceRegistry, PanasonicClient, ServiceRegistry, SoapUpnpIo,
//!     TvBinding, TvConfig,
//! };
//!
//! let devices = Arc::new(InMemoryDeviceRegistry::new());
//! let upnp_io = Arc::new(SoapUpnpIo::new());
//! devices.add_listener(upnp_io.clone());
//!
//! let binding = TvBinding::new(Collaborators {
//!     sink,
//!     device_registry: devices.clone(),
//!     discovery,
//!     upnp_io,
//!     key_sender: Arc::new(PanasonicClient::new()),
//!     service_registry: ServiceRegistry::new(),
//! });
//! binding.initialize(TvConfig::new("192.168.1.40"))?;
//!
//! devices.extend(panasonic_discovery::get_iter());
//! ```

pub mod automation;
pub mod binding;
pub mod channel;
pub mod config;
pub mod device_registry;
pub mod error;
pub mod logging;
pub mod service;
pub mod upnp;

use std::sync::Arc;

pub use automation::{DiscoveryListener, DiscoveryServiceRegistry, StateSink};
pub use binding::{Collaborators, TvBinding};
pub use channel::{Channel, Command, StateValue, StatusDetail, ThingStatus};
pub use config::TvConfig;
pub use device_registry::{DeviceRegistry, InMemoryDeviceRegistry, RegistryListener};
pub use error::{Result, TvError};
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use service::{
    CapabilityService, MediaRendererService, RemoteControllerService, ServiceContext,
    ServiceDescriptor, ServiceKind, ServiceRegistry, StateCache, ValueReceiver,
};
pub use upnp::{SoapUpnpIo, UpnpIo};

pub use panasonic_api::{KeyCode, KeySender, PanasonicClient};
pub use panasonic_discovery::{DiscoveryResult, RemoteDevice};

/// Whether two handles point at the same object, ignoring vtables
pub(crate) fn same_object<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
