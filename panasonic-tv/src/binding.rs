//! Device binding controller - lifecycle of one bound television
//!
//! The binding waits for a discovery result matching its configured host,
//! scans the device registry for that host's UPnP devices and creates one
//! capability service per device type. Values reported by the services are
//! forwarded to the automation layer, and commands from the automation layer
//! are routed to the service that supports the channel.
//!
//! # Example
//!
//! ```rust,ignore
//! use panasonic_tv::{Collaborators, TvBinding, TvConfig};
//!
//! let binding = TvBinding::new(collaborators);
//! binding.initialize(TvConfig::new("192.168.1.40"))?;
//!
//! // later, from the automation layer
//! binding.handle_command("volume", Command::Percent(20))?;
//!
//! binding.dispose();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

use panasonic_api::KeySender;
use panasonic_discovery::{DiscoveryResult, RemoteDevice};
use parking_lot::Mutex;

use crate::automation::{DiscoveryListener, DiscoveryServiceRegistry, StateSink};
use crate::channel::{Channel, Command, StateValue, StatusDetail, ThingStatus};
use crate::config::TvConfig;
use crate::device_registry::{DeviceRegistry, RegistryListener};
use crate::error::{Result, TvError};
use crate::service::{CapabilityService, ServiceContext, ServiceRegistry, ValueReceiver};
use crate::upnp::UpnpIo;

/// External collaborators of a binding
#[derive(Clone)]
pub struct Collaborators {
    pub sink: Arc<dyn StateSink>,
    pub device_registry: Arc<dyn DeviceRegistry>,
    pub discovery: Arc<dyn DiscoveryServiceRegistry>,
    pub upnp_io: Arc<dyn UpnpIo>,
    pub key_sender: Arc<dyn KeySender>,
    pub service_registry: ServiceRegistry,
}

/// Pending one-shot device scan
#[derive(Debug)]
struct ScanHandle {
    cancelled: Arc<AtomicBool>,
}

impl ScanHandle {
    fn cancel(self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Status of the binding and whether it currently accepts device data
#[derive(Debug)]
struct Link {
    status: ThingStatus,
    /// Set on a discovery match, cleared when the services are shut down
    bound: bool,
    disposed: bool,
}

/// Binding of one television to the automation layer
///
/// Always held in an `Arc`; the binding registers itself as a listener with
/// its collaborators.
pub struct TvBinding {
    this: Weak<TvBinding>,
    collaborators: Collaborators,
    config: Mutex<Option<TvConfig>>,
    services: Mutex<Vec<Arc<dyn CapabilityService>>>,
    link: Mutex<Link>,
    discovered_thing: Mutex<Option<String>>,
    scan: Mutex<Option<ScanHandle>>,
}

impl TvBinding {
    pub fn new(collaborators: Collaborators) -> Arc<Self> {
        Arc::new_cyclic(|this| TvBinding {
            this: this.clone(),
            collaborators,
            config: Mutex::new(None),
            services: Mutex::new(Vec::new()),
            link: Mutex::new(Link {
                status: ThingStatus::Offline,
                bound: false,
                disposed: false,
            }),
            discovered_thing: Mutex::new(None),
            scan: Mutex::new(None),
        })
    }

    /// Validate the configuration and start listening for discovery results
    ///
    /// An invalid configuration leaves the binding offline with a
    /// configuration error detail.
    pub fn initialize(&self, config: TvConfig) -> Result<()> {
        tracing::debug!(host = %config.host_name, "Initializing Panasonic TV binding");
        self.set_status(ThingStatus::Offline, StatusDetail::None, None);

        if let Err(e) = config.validate() {
            let message = match &e {
                TvError::Configuration(message) => message.clone(),
                other => other.to_string(),
            };
            tracing::warn!(error = %message, "Invalid configuration");
            self.set_status(
                ThingStatus::Offline,
                StatusDetail::ConfigurationError,
                Some(&message),
            );
            return Err(e);
        }

        *self.config.lock() = Some(config);
        if let Some(listener) = self.discovery_listener() {
            self.collaborators.discovery.add_discovery_listener(listener);
        }
        Ok(())
    }

    /// Route a command from the automation layer to the owning service
    ///
    /// Commands are ignored while offline.
    pub fn handle_command(&self, channel_id: &str, command: Command) -> Result<()> {
        if self.status() != ThingStatus::Online {
            tracing::debug!(channel = channel_id, "Thing is not online, ignoring command");
            return Ok(());
        }

        let service = channel_id.parse::<Channel>().ok().and_then(|channel| {
            self.services
                .lock()
                .iter()
                .find(|s| s.supported_channels().contains(&channel))
                .map(|s| (channel, Arc::clone(s)))
        });

        match service {
            Some((channel, service)) => service.handle_command(channel, &command),
            None => {
                tracing::warn!("Channel '{}' not supported", channel_id);
                Err(TvError::UnroutableCommand(channel_id.to_string()))
            }
        }
    }

    /// A channel was linked in the automation layer
    ///
    /// Re-reports the power state and clears every service cache so the next
    /// poll reports all values again.
    pub fn channel_linked(&self, channel: Channel) {
        tracing::debug!(%channel, "Channel linked");
        let online = self.status() == ThingStatus::Online;
        self.collaborators
            .sink
            .update_state(Channel::Power, StateValue::OnOff(online));

        for service in self.services.lock().iter() {
            service.clear_cache();
        }
    }

    /// Release every resource and go offline; the binding cannot be used afterwards
    pub fn dispose(&self) {
        tracing::debug!("Disposing Panasonic TV binding");
        self.link.lock().disposed = true;

        if let Some(listener) = self.discovery_listener() {
            self.collaborators
                .discovery
                .remove_discovery_listener(&listener);
        }
        self.shutdown();
        self.put_offline();
    }

    pub fn status(&self) -> ThingStatus {
        self.link.lock().status
    }

    pub fn service_count(&self) -> usize {
        self.services.lock().len()
    }

    /// Identifier of the matched discovery result, once discovered
    pub fn discovered_thing_id(&self) -> Option<String> {
        self.discovered_thing.lock().clone()
    }

    fn config(&self) -> Option<TvConfig> {
        self.config.lock().clone()
    }

    /// Bind the service for `device` if it belongs to the configured host
    fn create_service(&self, device: &RemoteDevice) {
        let Some(config) = self.config() else {
            return;
        };
        if device.host != config.host_name {
            return;
        }

        let service_type = device.short_type();
        tracing::debug!(udn = %device.udn, service_type, "Found device for configured host");

        // Held until the binding is online so shutdown drains whatever is created here
        let mut services = self.services.lock();
        if !self.link.lock().bound {
            tracing::debug!(udn = %device.udn, "Binding is not active, ignoring device");
            return;
        }

        if let Some(kind) = self.collaborators.service_registry.kind_for(service_type) {
            match services.iter().find(|s| s.kind() == kind) {
                Some(existing) => {
                    tracing::debug!(service_type, "Service already exists, clearing cache");
                    existing.clear_cache();
                }
                None => {
                    let context = ServiceContext {
                        upnp_io: Arc::clone(&self.collaborators.upnp_io),
                        key_sender: Arc::clone(&self.collaborators.key_sender),
                        udn: device.udn.clone(),
                        poll_interval: config.poll_interval(),
                        host: config.host_name.clone(),
                        port: config.port,
                    };
                    if let Some(service) =
                        self.collaborators.service_registry.create(service_type, &context)
                    {
                        if let Some(receiver) = self.value_receiver() {
                            service.add_value_listener(receiver);
                        }
                        service.start();
                        services.push(service);
                        tracing::debug!(service_type, "Service created and started");
                    }
                }
            }
        } else {
            tracing::debug!(service_type, "No service for device type");
        }

        self.put_online();
    }

    /// Bind every known device of the host, then follow registry additions
    fn scan_devices(&self, cancelled: &AtomicBool) {
        for device in self.collaborators.device_registry.devices() {
            if cancelled.load(Ordering::SeqCst) {
                return;
            }
            self.create_service(&device);
        }

        let _scan = self.scan.lock();
        if cancelled.load(Ordering::SeqCst) {
            return;
        }
        if let Some(listener) = self.registry_listener() {
            self.collaborators.device_registry.add_listener(listener);
        }
    }

    fn schedule_scan(&self) {
        let cancelled = Arc::new(AtomicBool::new(false));
        if let Some(previous) = self.scan.lock().replace(ScanHandle {
            cancelled: Arc::clone(&cancelled),
        }) {
            previous.cancel();
        }

        let weak = self.this.clone();
        let spawned = thread::Builder::new()
            .name("panasonic-tv-scan".to_string())
            .spawn(move || {
                if let Some(binding) = weak.upgrade() {
                    binding.scan_devices(&cancelled);
                }
            });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "Failed to schedule device scan");
        }
    }

    /// Stop all services and detach from the device registry
    ///
    /// Device data arriving afterwards is dropped until the next discovery match.
    fn shutdown(&self) {
        self.link.lock().bound = false;

        if let Some(scan) = self.scan.lock().take() {
            scan.cancel();
        }

        if let Some(listener) = self.registry_listener() {
            self.collaborators.device_registry.remove_listener(&listener);
        }

        let services = std::mem::take(&mut *self.services.lock());
        let receiver = self.value_receiver();
        for service in services {
            tracing::debug!(service = service.service_name(), "Stopping service");
            service.stop();
            if let Some(receiver) = &receiver {
                service.remove_value_listener(receiver);
            }
        }
    }

    fn put_online(&self) {
        let mut link = self.link.lock();
        self.go_online(&mut link);
    }

    /// Online transition; only while bound
    fn go_online(&self, link: &mut Link) {
        if !link.bound || link.status == ThingStatus::Online {
            return;
        }
        link.status = ThingStatus::Online;
        tracing::debug!("Panasonic TV is online");
        self.collaborators
            .sink
            .update_status(ThingStatus::Online, StatusDetail::None, None);
        self.collaborators
            .sink
            .update_state(Channel::Power, StateValue::OnOff(true));
    }

    fn put_offline(&self) {
        let mut link = self.link.lock();
        if link.status == ThingStatus::Offline {
            return;
        }
        link.status = ThingStatus::Offline;
        tracing::debug!("Panasonic TV is offline");
        self.collaborators
            .sink
            .update_status(ThingStatus::Offline, StatusDetail::None, None);
        self.collaborators
            .sink
            .update_state(Channel::Power, StateValue::OnOff(false));
    }

    fn set_status(&self, status: ThingStatus, detail: StatusDetail, message: Option<&str>) {
        let mut link = self.link.lock();
        link.status = status;
        self.collaborators.sink.update_status(status, detail, message);
    }

    fn discovery_listener(&self) -> Option<Arc<dyn DiscoveryListener>> {
        self.this.upgrade().map(|this| this as Arc<dyn DiscoveryListener>)
    }

    fn registry_listener(&self) -> Option<Arc<dyn RegistryListener>> {
        self.this.upgrade().map(|this| this as Arc<dyn RegistryListener>)
    }

    fn value_receiver(&self) -> Option<Arc<dyn ValueReceiver>> {
        self.this.upgrade().map(|this| this as Arc<dyn ValueReceiver>)
    }
}

impl DiscoveryListener for TvBinding {
    fn thing_discovered(&self, source: &str, result: &DiscoveryResult) {
        let Some(config) = self.config() else {
            return;
        };
        if result.host() != Some(config.host_name.as_str()) {
            return;
        }

        {
            let mut link = self.link.lock();
            if link.disposed {
                return;
            }
            link.bound = true;
        }

        tracing::debug!(source, thing_id = %result.thing_id, "Discovered configured Panasonic TV");
        *self.discovered_thing.lock() = Some(result.thing_id.clone());
        self.schedule_scan();
    }

    fn thing_removed(&self, source: &str, thing_id: &str) {
        let matches = self.discovered_thing.lock().as_deref() == Some(thing_id);
        if !matches {
            return;
        }

        tracing::debug!(source, thing_id, "Panasonic TV removed");
        self.shutdown();
        self.put_offline();
    }
}

impl RegistryListener for TvBinding {
    fn remote_device_added(&self, device: &RemoteDevice) {
        self.create_service(device);
    }

    fn remote_device_removed(&self, device: &RemoteDevice) {
        tracing::debug!(udn = %device.udn, "Remote device removed");
    }
}

impl ValueReceiver for TvBinding {
    fn value_received(&self, channel: Channel, value: StateValue) {
        let mut link = self.link.lock();
        if !link.bound {
            tracing::debug!(%channel, "Binding is not active, dropping value");
            return;
        }
        self.collaborators.sink.update_state(channel, value);
        self.go_online(&mut link);
    }
}
