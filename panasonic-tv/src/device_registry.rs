//! Registry of UPnP devices currently known on the network

use std::sync::Arc;

use panasonic_discovery::{DeviceEvent, RemoteDevice};
use parking_lot::RwLock;

use crate::same_object;

/// Notified when remote devices appear or disappear
pub trait RegistryListener: Send + Sync {
    fn remote_device_added(&self, device: &RemoteDevice);

    fn remote_device_removed(&self, device: &RemoteDevice);
}

/// Snapshot of known devices plus add/remove notifications
pub trait DeviceRegistry: Send + Sync {
    fn devices(&self) -> Vec<RemoteDevice>;

    /// Adding a listener that is already registered has no effect
    fn add_listener(&self, listener: Arc<dyn RegistryListener>);

    fn remove_listener(&self, listener: &Arc<dyn RegistryListener>);
}

/// Device registry held in memory, typically fed from SSDP discovery
///
/// ```no_run
/// use panasonic_tv::InMemoryDeviceRegistry;
///
/// let registry = InMemoryDeviceRegistry::new();
/// registry.extend(panasonic_discovery::get_iter());
/// ```
#[derive(Default)]
pub struct InMemoryDeviceRegistry {
    devices: RwLock<Vec<RemoteDevice>>,
    listeners: RwLock<Vec<Arc<dyn RegistryListener>>>,
}

impl InMemoryDeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a device (matched by UDN) and notify listeners
    pub fn add_device(&self, device: RemoteDevice) {
        {
            let mut devices = self.devices.write();
            match devices.iter_mut().find(|d| d.udn == device.udn) {
                Some(existing) => *existing = device.clone(),
                None => devices.push(device.clone()),
            }
        }

        for listener in self.listeners() {
            listener.remote_device_added(&device);
        }
    }

    pub fn remove_device(&self, udn: &str) -> Option<RemoteDevice> {
        let removed = {
            let mut devices = self.devices.write();
            let index = devices.iter().position(|d| d.udn == udn)?;
            devices.remove(index)
        };

        for listener in self.listeners() {
            listener.remote_device_removed(&removed);
        }
        Some(removed)
    }

    /// Add every device found by a discovery run
    pub fn extend(&self, events: impl IntoIterator<Item = DeviceEvent>) {
        for event in events {
            match event {
                DeviceEvent::Found(device) => self.add_device(device),
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn listeners(&self) -> Vec<Arc<dyn RegistryListener>> {
        self.listeners.read().clone()
    }
}

impl DeviceRegistry for InMemoryDeviceRegistry {
    fn devices(&self) -> Vec<RemoteDevice> {
        self.devices.read().clone()
    }

    fn add_listener(&self, listener: Arc<dyn RegistryListener>) {
        let mut listeners = self.listeners.write();
        if !listeners.iter().any(|l| same_object(l, &listener)) {
            listeners.push(listener);
        }
    }

    fn remove_listener(&self, listener: &Arc<dyn RegistryListener>) {
        self.listeners.write().retain(|l| !same_object(l, listener));
    }
}
