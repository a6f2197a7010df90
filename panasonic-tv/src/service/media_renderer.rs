//! Read/write media renderer service: volume, mute and now-playing
//!
//! Polls `RenderingControl` and `AVTransport` while the device is
//! registered and reports every state variable that changed since the
//! previous poll.

use std::sync::{Arc, Weak};
use std::time::Duration;

use panasonic_api::operations::{av_transport, rendering_control};
use panasonic_api::{ActionRequest, NowPlaying};
use parking_lot::Mutex;

use super::cache::StateCache;
use super::poller::PollHandle;
use super::{CapabilityService, Listeners, ServiceKind, ValueReceiver};
use crate::channel::{Channel, Command, StateValue};
use crate::error::{Result, TvError};
use crate::upnp::UpnpIo;

pub const SERVICE_NAME: &str = "MediaRenderer";

const SUPPORTED_CHANNELS: &[Channel] = &[Channel::Volume, Channel::Mute];

pub struct MediaRendererService {
    inner: Arc<Inner>,
}

struct Inner {
    upnp_io: Arc<dyn UpnpIo>,
    udn: String,
    poll_interval: Duration,
    cache: Mutex<StateCache>,
    listeners: Listeners,
    poller: Mutex<Option<PollHandle>>,
}

impl MediaRendererService {
    pub fn new(upnp_io: Arc<dyn UpnpIo>, udn: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                upnp_io,
                udn: udn.into(),
                poll_interval,
                cache: Mutex::new(StateCache::new()),
                listeners: Listeners::default(),
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn udn(&self) -> &str {
        &self.inner.udn
    }

    pub fn is_running(&self) -> bool {
        self.inner.poller.lock().is_some()
    }

    /// Run one poll cycle on the calling thread
    pub fn poll(&self) {
        self.inner.poll();
    }

    fn set_volume(&self, command: &Command) -> Result<()> {
        let current = self
            .inner
            .cache
            .lock()
            .get(rendering_control::CURRENT_VOLUME)
            .and_then(|v| v.trim().parse::<i64>().ok());

        let max = i64::from(rendering_control::MAX_VOLUME);
        let desired = match command {
            Command::Percent(value) => i64::from(*value),
            Command::Decimal(value) => *value,
            Command::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| TvError::unsupported(Channel::Volume, command))?,
            Command::Increase => current
                .map(|v| (v + 1).min(max))
                .ok_or_else(|| TvError::unsupported(Channel::Volume, command))?,
            Command::Decrease => current
                .map(|v| (v - 1).max(0))
                .ok_or_else(|| TvError::unsupported(Channel::Volume, command))?,
            Command::OnOff(_) => return Err(TvError::unsupported(Channel::Volume, command)),
        };

        let desired = u8::try_from(desired)
            .ok()
            .filter(|v| *v <= rendering_control::MAX_VOLUME)
            .ok_or_else(|| TvError::unsupported(Channel::Volume, command))?;

        self.inner
            .update_resource_state(&rendering_control::set_volume(desired))?;
        self.inner
            .update_resource_state(&rendering_control::get_volume())?;
        Ok(())
    }

    fn set_mute(&self, command: &Command) -> Result<()> {
        let desired = match command {
            Command::OnOff(value) => *value,
            Command::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "on" | "true" => true,
                "off" | "false" => false,
                _ => return Err(TvError::unsupported(Channel::Mute, command)),
            },
            _ => return Err(TvError::unsupported(Channel::Mute, command)),
        };

        self.inner
            .update_resource_state(&rendering_control::set_mute(desired))?;
        self.inner
            .update_resource_state(&rendering_control::get_mute())?;
        Ok(())
    }
}

impl Inner {
    fn poll(&self) {
        if !self.upnp_io.is_registered(&self.udn) {
            tracing::trace!(udn = %self.udn, "Device not registered, skipping poll");
            return;
        }

        let requests = [
            rendering_control::get_volume(),
            rendering_control::get_mute(),
            av_transport::get_media_info(),
        ];
        for request in &requests {
            if let Err(e) = self.update_resource_state(request) {
                tracing::debug!(udn = %self.udn, action = request.action, error = %e, "Poll failed");
                return;
            }
        }
    }

    /// Invoke an action and feed every returned variable through the cache
    fn update_resource_state(&self, request: &ActionRequest) -> panasonic_api::Result<()> {
        let variables = self.upnp_io.invoke_action(&self.udn, request)?;
        for (variable, value) in &variables {
            self.on_value_received(variable, value.as_deref());
        }
        Ok(())
    }

    fn on_value_received(&self, variable: &str, value: Option<&str>) {
        // Held across notification so updates of one variable reach listeners in order
        let mut cache = self.cache.lock();
        if !cache.update(variable, value) {
            tracing::trace!(variable, ?value, "Value hasn't changed, ignoring update");
            return;
        }

        match variable {
            rendering_control::CURRENT_VOLUME => {
                let state = value
                    .and_then(|v| v.trim().parse::<u8>().ok())
                    .map(|v| StateValue::Percent(v.min(rendering_control::MAX_VOLUME)))
                    .unwrap_or(StateValue::Undefined);
                self.listeners.notify(Channel::Volume, state);
            }
            rendering_control::CURRENT_MUTE => {
                let state = value
                    .map(|v| StateValue::OnOff(matches!(v.trim(), "true" | "1")))
                    .unwrap_or(StateValue::Undefined);
                self.listeners.notify(Channel::Mute, state);
            }
            av_transport::CURRENT_URI_METADATA => {
                let Some(didl) = value else {
                    return;
                };
                match NowPlaying::parse(didl) {
                    Ok(now_playing) => self.notify_now_playing(now_playing),
                    Err(e) => tracing::debug!(udn = %self.udn, error = %e, "Ignoring metadata"),
                }
            }
            _ => {}
        }
    }

    fn notify_now_playing(&self, now_playing: NowPlaying) {
        if let Some(number) = now_playing.channel_number {
            self.listeners
                .notify(Channel::Channel, StateValue::Decimal(number));
        }
        if let Some(name) = now_playing.channel_name {
            self.listeners
                .notify(Channel::ChannelName, StateValue::Text(name));
        }
        if let Some(title) = now_playing.program_title {
            self.listeners
                .notify(Channel::ProgramTitle, StateValue::Text(title));
        }
    }
}

impl CapabilityService for MediaRendererService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::MediaRenderer
    }

    fn supported_channels(&self) -> &'static [Channel] {
        SUPPORTED_CHANNELS
    }

    fn handle_command(&self, channel: Channel, command: &Command) -> Result<()> {
        tracing::debug!(%channel, ?command, "Received command");

        match channel {
            Channel::Volume => self.set_volume(command),
            Channel::Mute => self.set_mute(command),
            _ => {
                tracing::warn!(%channel, "Panasonic TV doesn't support transmitting for channel");
                Ok(())
            }
        }
    }

    fn start(&self) {
        let mut poller = self.inner.poller.lock();
        if poller.is_some() {
            return;
        }

        tracing::debug!(udn = %self.inner.udn, interval = ?self.inner.poll_interval, "Start refresh task");
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let spawned = PollHandle::spawn(
            format!("media-renderer-poll-{}", self.inner.udn),
            self.inner.poll_interval,
            move || match weak.upgrade() {
                Some(inner) => {
                    inner.poll();
                    true
                }
                None => false,
            },
        );

        match spawned {
            Ok(handle) => *poller = Some(handle),
            Err(e) => tracing::error!(udn = %self.inner.udn, error = %e, "Failed to start refresh task"),
        }
    }

    fn stop(&self) {
        if let Some(handle) = self.inner.poller.lock().take() {
            tracing::debug!(udn = %self.inner.udn, "Stop refresh task");
            handle.cancel();
        }
    }

    fn clear_cache(&self) {
        self.inner.cache.lock().clear();
    }

    fn add_value_listener(&self, listener: Arc<dyn ValueReceiver>) {
        self.inner.listeners.add(listener);
    }

    fn remove_value_listener(&self, listener: &Arc<dyn ValueReceiver>) {
        self.inner.listeners.remove(listener);
    }
}

impl Drop for MediaRendererService {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panasonic_api::{ApiError, StateVariables};
    use rstest::rstest;
    use std::collections::{HashMap, VecDeque};

    /// Device fake answering from canned responses and recording every call
    #[derive(Default)]
    struct FakeIo {
        registered: bool,
        responses: parking_lot::Mutex<HashMap<&'static str, VecDeque<StateVariables>>>,
        calls: parking_lot::Mutex<Vec<ActionRequest>>,
    }

    impl FakeIo {
        fn registered() -> Self {
            Self {
                registered: true,
                ..Self::default()
            }
        }

        fn respond(&self, action: &'static str, variables: &[(&str, Option<&str>)]) {
            let variables = variables
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect();
            self.responses
                .lock()
                .entry(action)
                .or_default()
                .push_back(variables);
        }

        fn actions(&self) -> Vec<&'static str> {
            self.calls.lock().iter().map(|r| r.action).collect()
        }
    }

    impl UpnpIo for FakeIo {
        fn is_registered(&self, _udn: &str) -> bool {
            self.registered
        }

        fn invoke_action(
            &self,
            _udn: &str,
            request: &ActionRequest,
        ) -> panasonic_api::Result<StateVariables> {
            self.calls.lock().push(request.clone());
            self.responses
                .lock()
                .get_mut(request.action)
                .and_then(|queue| queue.pop_front())
                .ok_or_else(|| ApiError::NetworkError("no response".to_string()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        values: parking_lot::Mutex<Vec<(Channel, StateValue)>>,
    }

    impl ValueReceiver for Recorder {
        fn value_received(&self, channel: Channel, value: StateValue) {
            self.values.lock().push((channel, value));
        }
    }

    fn service_with(io: Arc<FakeIo>) -> (MediaRendererService, Arc<Recorder>) {
        let service = MediaRendererService::new(io, "uuid:renderer", Duration::from_secs(60));
        let recorder = Arc::new(Recorder::default());
        service.add_value_listener(recorder.clone());
        (service, recorder)
    }

    const DIDL: &str = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/"><item><dc:title>News</dc:title><upnp:channelNr>3</upnp:channelNr><upnp:channelName>Channel 3</upnp:channelName></item></DIDL-Lite>"#;

    #[test]
    fn test_poll_reports_all_values_then_only_changes() {
        let io = Arc::new(FakeIo::registered());
        io.respond("GetVolume", &[("CurrentVolume", Some("20"))]);
        io.respond("GetMute", &[("CurrentMute", Some("false"))]);
        io.respond("GetMediaInfo", &[("CurrentURIMetaData", Some(DIDL)), ("NrTracks", Some("1"))]);
        io.respond("GetVolume", &[("CurrentVolume", Some("20"))]);
        io.respond("GetMute", &[("CurrentMute", Some("true"))]);
        io.respond("GetMediaInfo", &[("CurrentURIMetaData", Some(DIDL))]);
        let (service, recorder) = service_with(io.clone());

        service.poll();
        let first = recorder.values.lock().clone();
        assert_eq!(
            first,
            vec![
                (Channel::Volume, StateValue::Percent(20)),
                (Channel::Mute, StateValue::OnOff(false)),
                (Channel::Channel, StateValue::Decimal(3)),
                (Channel::ChannelName, StateValue::Text("Channel 3".to_string())),
                (Channel::ProgramTitle, StateValue::Text("News".to_string())),
            ]
        );

        recorder.values.lock().clear();
        service.poll();
        assert_eq!(
            *recorder.values.lock(),
            vec![(Channel::Mute, StateValue::OnOff(true))]
        );
    }

    #[test]
    fn test_poll_skipped_when_not_registered() {
        let io = Arc::new(FakeIo::default());
        let (service, recorder) = service_with(io.clone());

        service.poll();

        assert!(io.actions().is_empty());
        assert!(recorder.values.lock().is_empty());
    }

    #[test]
    fn test_poll_stops_at_first_failure() {
        let io = Arc::new(FakeIo::registered());
        let (service, _recorder) = service_with(io.clone());

        service.poll();

        assert_eq!(io.actions(), vec!["GetVolume"]);
    }

    #[test]
    fn test_clear_cache_reports_values_again() {
        let io = Arc::new(FakeIo::registered());
        io.respond("GetVolume", &[("CurrentVolume", Some("5"))]);
        io.respond("GetVolume", &[("CurrentVolume", Some("5"))]);
        let (service, recorder) = service_with(io);

        service.inner.update_resource_state(&rendering_control::get_volume()).unwrap();
        service.clear_cache();
        service.inner.update_resource_state(&rendering_control::get_volume()).unwrap();

        assert_eq!(recorder.values.lock().len(), 2);
    }

    #[test]
    fn test_set_volume_issues_set_then_get() {
        let io = Arc::new(FakeIo::registered());
        io.respond("SetVolume", &[]);
        io.respond("GetVolume", &[("CurrentVolume", Some("50"))]);
        let (service, recorder) = service_with(io.clone());

        service
            .handle_command(Channel::Volume, &Command::Percent(50))
            .unwrap();

        assert_eq!(io.actions(), vec!["SetVolume", "GetVolume"]);
        assert_eq!(io.calls.lock()[0].argument("DesiredVolume"), Some("50"));
        assert_eq!(
            *recorder.values.lock(),
            vec![(Channel::Volume, StateValue::Percent(50))]
        );
    }

    #[rstest]
    #[case(Command::Decimal(150))]
    #[case(Command::Percent(101))]
    #[case(Command::Decimal(-1))]
    #[case(Command::Text("loud".to_string()))]
    #[case(Command::OnOff(true))]
    #[case(Command::Increase)]
    fn test_invalid_volume_commands(#[case] command: Command) {
        let io = Arc::new(FakeIo::registered());
        let (service, recorder) = service_with(io.clone());

        let result = service.handle_command(Channel::Volume, &command);

        assert!(matches!(result, Err(TvError::UnsupportedCommand { .. })));
        assert!(io.actions().is_empty());
        assert!(recorder.values.lock().is_empty());
    }

    #[rstest]
    #[case("100", Command::Increase, "100")]
    #[case("40", Command::Increase, "41")]
    #[case("0", Command::Decrease, "0")]
    #[case("40", Command::Decrease, "39")]
    fn test_relative_volume(#[case] cached: &str, #[case] command: Command, #[case] expected: &str) {
        let io = Arc::new(FakeIo::registered());
        io.respond("GetVolume", &[("CurrentVolume", Some(cached))]);
        io.respond("SetVolume", &[]);
        io.respond("GetVolume", &[("CurrentVolume", Some(expected))]);
        let (service, _recorder) = service_with(io.clone());
        service.inner.update_resource_state(&rendering_control::get_volume()).unwrap();

        service.handle_command(Channel::Volume, &command).unwrap();

        assert_eq!(io.calls.lock()[1].argument("DesiredVolume"), Some(expected));
    }

    #[rstest]
    #[case(Command::OnOff(true), "true")]
    #[case(Command::OnOff(false), "false")]
    #[case(Command::Text("ON".to_string()), "true")]
    #[case(Command::Text("off".to_string()), "false")]
    fn test_set_mute(#[case] command: Command, #[case] expected: &str) {
        let io = Arc::new(FakeIo::registered());
        io.respond("SetMute", &[]);
        io.respond("GetMute", &[("CurrentMute", Some(expected))]);
        let (service, _recorder) = service_with(io.clone());

        service.handle_command(Channel::Mute, &command).unwrap();

        assert_eq!(io.actions(), vec!["SetMute", "GetMute"]);
        assert_eq!(io.calls.lock()[0].argument("DesiredMute"), Some(expected));
    }

    #[test]
    fn test_set_mute_rejects_numbers() {
        let io = Arc::new(FakeIo::registered());
        let (service, _recorder) = service_with(io);
        assert!(matches!(
            service.handle_command(Channel::Mute, &Command::Decimal(1)),
            Err(TvError::UnsupportedCommand { .. })
        ));
    }

    #[test]
    fn test_transport_error_propagates_from_command() {
        let io = Arc::new(FakeIo::registered());
        let (service, _recorder) = service_with(io);
        assert!(matches!(
            service.handle_command(Channel::Volume, &Command::Percent(10)),
            Err(TvError::Api(ApiError::NetworkError(_)))
        ));
    }

    #[test]
    fn test_unparsable_metadata_is_skipped() {
        let io = Arc::new(FakeIo::registered());
        io.respond("GetMediaInfo", &[("CurrentURIMetaData", Some("<DIDL-Lite"))]);
        let (service, recorder) = service_with(io);

        service.inner.update_resource_state(&av_transport::get_media_info()).unwrap();

        assert!(recorder.values.lock().is_empty());
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let io = Arc::new(FakeIo::default());
        let (service, _recorder) = service_with(io);

        service.start();
        service.start();
        assert!(service.is_running());
        service.stop();
        service.stop();
        assert!(!service.is_running());
    }

    #[test]
    fn test_listener_registration() {
        let io = Arc::new(FakeIo::registered());
        let (service, recorder) = service_with(io);
        let listener: Arc<dyn ValueReceiver> = recorder;
        service.add_value_listener(listener.clone());
        assert_eq!(service.inner.listeners.len(), 1);
        service.remove_value_listener(&listener);
        assert_eq!(service.inner.listeners.len(), 0);
    }
}
