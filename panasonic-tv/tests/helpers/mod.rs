//! In-memory collaborators for binding tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use panasonic_api::{ActionRequest, KeyCode, KeySender, StateVariables};
use panasonic_discovery::participant;
use panasonic_tv::{
    Channel, Collaborators, DiscoveryListener, DiscoveryResult, DiscoveryServiceRegistry,
    InMemoryDeviceRegistry, RemoteDevice, ServiceRegistry, StateSink, StateValue, StatusDetail,
    ThingStatus, TvBinding, UpnpIo,
};
use parking_lot::Mutex;

pub const TV_HOST: &str = "10.0.0.5";
pub const RENDERER_UDN: &str = "uuid:4d454930-0100-1000-8001-a81374a6b2c1";
pub const REMOTE_UDN: &str = "uuid:4d454930-0200-1000-8001-a81374a6b2c1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Status(ThingStatus, StatusDetail, Option<String>),
    State(Channel, StateValue),
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: &SinkEvent) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }
}

impl StateSink for RecordingSink {
    fn update_state(&self, channel: Channel, value: StateValue) {
        self.events.lock().push(SinkEvent::State(channel, value));
    }

    fn update_status(&self, status: ThingStatus, detail: StatusDetail, message: Option<&str>) {
        self.events
            .lock()
            .push(SinkEvent::Status(status, detail, message.map(str::to_string)));
    }
}

#[derive(Default)]
pub struct FakeDiscovery {
    listeners: Mutex<Vec<Arc<dyn DiscoveryListener>>>,
}

impl FakeDiscovery {
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn discover(&self, result: &DiscoveryResult) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.thing_discovered("upnp", result);
        }
    }

    pub fn remove(&self, thing_id: &str) {
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener.thing_removed("upnp", thing_id);
        }
    }
}

impl DiscoveryServiceRegistry for FakeDiscovery {
    fn add_discovery_listener(&self, listener: Arc<dyn DiscoveryListener>) {
        self.listeners.lock().push(listener);
    }

    fn remove_discovery_listener(&self, listener: &Arc<dyn DiscoveryListener>) {
        let target = Arc::as_ptr(listener) as *const ();
        self.listeners
            .lock()
            .retain(|l| Arc::as_ptr(l) as *const () != target);
    }
}

/// Media renderer that echoes the last volume set
pub struct FakeTv {
    volume: Mutex<String>,
    calls: Mutex<Vec<String>>,
    registered: HashSet<String>,
}

impl FakeTv {
    pub fn new(volume: u8) -> Self {
        Self {
            volume: Mutex::new(volume.to_string()),
            calls: Mutex::new(Vec::new()),
            registered: [RENDERER_UDN.to_string()].into_iter().collect(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

impl UpnpIo for FakeTv {
    fn is_registered(&self, udn: &str) -> bool {
        self.registered.contains(udn)
    }

    fn invoke_action(
        &self,
        _udn: &str,
        request: &ActionRequest,
    ) -> panasonic_api::Result<StateVariables> {
        self.calls.lock().push(request.action.to_string());

        let mut variables = HashMap::new();
        match request.action {
            "GetVolume" => {
                variables.insert("CurrentVolume".to_string(), Some(self.volume.lock().clone()));
            }
            "SetVolume" => {
                if let Some(volume) = request.argument("DesiredVolume") {
                    *self.volume.lock() = volume.to_string();
                }
            }
            "GetMute" => {
                variables.insert("CurrentMute".to_string(), Some("0".to_string()));
            }
            "GetMediaInfo" => {
                variables.insert("NrTracks".to_string(), Some("1".to_string()));
            }
            _ => {}
        }
        Ok(variables)
    }
}

#[derive(Default)]
pub struct RecordingKeys {
    sent: Mutex<Vec<(String, KeyCode)>>,
}

impl RecordingKeys {
    pub fn sent(&self) -> Vec<(String, KeyCode)> {
        self.sent.lock().clone()
    }
}

impl KeySender for RecordingKeys {
    fn send_key(&self, host: &str, key: KeyCode) {
        self.sent.lock().push((host.to_string(), key));
    }
}

pub fn device(udn: &str, host: &str, device_type: &str) -> RemoteDevice {
    RemoteDevice {
        udn: udn.to_string(),
        friendly_name: "VIERA".to_string(),
        manufacturer: "Panasonic".to_string(),
        model_name: "TX-55".to_string(),
        device_type: device_type.to_string(),
        host: host.to_string(),
        port: 55000,
        descriptor_url: format!("http://{}:55000/ddd.xml", host),
        services: Vec::new(),
    }
}

pub fn renderer_device(host: &str) -> RemoteDevice {
    device(RENDERER_UDN, host, "urn:schemas-upnp-org:device:MediaRenderer:1")
}

pub fn remote_device(host: &str) -> RemoteDevice {
    device(REMOTE_UDN, host, "urn:panasonic-com:device:p00RemoteController:1")
}

/// Discovery result the participant produces for the television's media renderer
pub fn discovery_result(host: &str) -> DiscoveryResult {
    participant::create_result(&renderer_device(host)).expect("media renderer is a television")
}

pub struct Harness {
    pub binding: Arc<TvBinding>,
    pub sink: Arc<RecordingSink>,
    pub discovery: Arc<FakeDiscovery>,
    pub devices: Arc<InMemoryDeviceRegistry>,
    pub tv: Arc<FakeTv>,
    pub keys: Arc<RecordingKeys>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_services(ServiceRegistry::new())
    }

    pub fn with_services(service_registry: ServiceRegistry) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let discovery = Arc::new(FakeDiscovery::default());
        let devices = Arc::new(InMemoryDeviceRegistry::new());
        let tv = Arc::new(FakeTv::new(30));
        let keys = Arc::new(RecordingKeys::default());

        let binding = TvBinding::new(Collaborators {
            sink: sink.clone(),
            device_registry: devices.clone(),
            discovery: discovery.clone(),
            upnp_io: tv.clone(),
            key_sender: keys.clone(),
            service_registry,
        });

        Self {
            binding,
            sink,
            discovery,
            devices,
            tv,
            keys,
        }
    }

    /// Discover the television and wait until the scan has bound it
    pub fn bring_online(&self) {
        self.discovery.discover(&discovery_result(TV_HOST));
        assert!(wait_until(|| self.binding.status() == ThingStatus::Online));
        assert!(wait_until(|| self.devices.listener_count() == 1));
    }
}

/// Poll `condition` until it holds or two seconds pass
pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
