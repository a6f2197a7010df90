//! Write-only remote controller service
//!
//! Translates power, key-code and channel commands into remote-control key
//! presses. Nothing is polled or cached.

use std::sync::Arc;
use std::time::{Duration, Instant};

use panasonic_api::{KeyCode, KeySender};
use parking_lot::{Condvar, Mutex};

use super::{CapabilityService, Listeners, ServiceKind, ValueReceiver};
use crate::channel::{Channel, Command};
use crate::error::{Result, TvError};

pub const SERVICE_NAME: &str = "p00RemoteController";

/// Pause between keys of a sequence; the television drops presses sent closer together
pub const KEY_DELAY: Duration = Duration::from_millis(300);

const SUPPORTED_CHANNELS: &[Channel] = &[Channel::KeyCode, Channel::Power, Channel::Channel];

pub struct RemoteControllerService {
    key_sender: Arc<dyn KeySender>,
    /// `host:port` of the remote-control endpoint
    target: String,
    key_delay: Duration,
    /// Bumped to abandon any key sequence in progress
    generation: Mutex<u64>,
    wakeup: Condvar,
    listeners: Listeners,
}

impl RemoteControllerService {
    pub fn new(key_sender: Arc<dyn KeySender>, host: &str, port: u16) -> Self {
        Self {
            key_sender,
            target: format!("{}:{}", host, port),
            key_delay: KEY_DELAY,
            generation: Mutex::new(0),
            wakeup: Condvar::new(),
            listeners: Listeners::default(),
        }
    }

    pub fn with_key_delay(mut self, key_delay: Duration) -> Self {
        self.key_delay = key_delay;
        self
    }

    fn send_key_code(&self, key: KeyCode) {
        self.key_sender.send_key(&self.target, key);
    }

    /// Send keys in order with the key delay between consecutive keys
    ///
    /// Returns `false` if [`stop`](CapabilityService::stop) interrupted the
    /// sequence; the remaining keys are not sent.
    fn send_keys(&self, keys: &[KeyCode]) -> bool {
        tracing::debug!(?keys, "Try to send sequence of commands");
        let generation = *self.generation.lock();

        for (index, key) in keys.iter().enumerate() {
            if index > 0 && !self.pause(generation) {
                tracing::debug!(sent = index, total = keys.len(), "Key sequence interrupted");
                return false;
            }
            self.send_key_code(*key);
        }

        tracing::debug!("Command(s) successfully sent");
        true
    }

    /// Wait for the key delay; `false` if interrupted meanwhile
    fn pause(&self, generation: u64) -> bool {
        let deadline = Instant::now() + self.key_delay;
        let mut current = self.generation.lock();
        while *current == generation {
            if self.wakeup.wait_until(&mut current, deadline).timed_out() {
                return *current == generation;
            }
        }
        false
    }

    fn interrupt(&self) {
        *self.generation.lock() += 1;
        self.wakeup.notify_all();
    }

    fn handle_key_code(&self, command: &Command) -> Result<()> {
        let input = match command {
            Command::Text(text) => text.clone(),
            Command::Decimal(value) => value.to_string(),
            _ => {
                tracing::warn!(?command, "Command not supported for channel 'key-code'");
                return Ok(());
            }
        };

        match resolve_key(&input) {
            Some(key) => self.send_key_code(key),
            None => tracing::warn!(command = %input, "Command not supported for channel 'key-code'"),
        }
        Ok(())
    }

    fn handle_channel(&self, command: &Command) -> Result<()> {
        let keys = match command {
            Command::Decimal(value) => channel_key_sequence(*value),
            _ => None,
        }
        .ok_or_else(|| TvError::unsupported(Channel::Channel, command))?;

        self.send_keys(&keys);
        Ok(())
    }
}

/// Key for a key-code command: the key name first, then the digit of that value
fn resolve_key(input: &str) -> Option<KeyCode> {
    KeyCode::from_name(input)
        .or_else(|_| KeyCode::from_name(&format!("D{}", input.trim())))
        .ok()
}

/// Keys that tune the television to `channel`
///
/// Up to four digits (thousands to units) are sent, leading zeros are
/// suppressed but the units digit always is sent, and ENTER ends the
/// sequence. Negative values have no sequence.
pub fn channel_key_sequence(channel: i64) -> Option<Vec<KeyCode>> {
    if channel < 0 {
        return None;
    }

    let digits = [
        channel / 1000 % 10,
        channel / 100 % 10,
        channel / 10 % 10,
        channel % 10,
    ];
    let first = digits[..3]
        .iter()
        .position(|d| *d > 0)
        .unwrap_or(3);

    let mut keys = digits[first..]
        .iter()
        .map(|d| KeyCode::digit(*d as u32).ok())
        .collect::<Option<Vec<_>>>()?;
    keys.push(KeyCode::Enter);
    Some(keys)
}

impl CapabilityService for RemoteControllerService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::RemoteController
    }

    fn supported_channels(&self) -> &'static [Channel] {
        SUPPORTED_CHANNELS
    }

    fn handle_command(&self, channel: Channel, command: &Command) -> Result<()> {
        tracing::debug!(%channel, ?command, "Received command");

        match channel {
            Channel::KeyCode => self.handle_key_code(command),
            // The protocol only has a toggle key
            Channel::Power => {
                self.send_key_code(KeyCode::Power);
                Ok(())
            }
            Channel::Channel => self.handle_channel(command),
            _ => {
                tracing::warn!(%channel, "Panasonic TV doesn't support transmitting for channel");
                Ok(())
            }
        }
    }

    fn start(&self) {}

    fn stop(&self) {
        self.interrupt();
    }

    fn clear_cache(&self) {}

    fn add_value_listener(&self, listener: Arc<dyn ValueReceiver>) {
        self.listeners.add(listener);
    }

    fn remove_value_listener(&self, listener: &Arc<dyn ValueReceiver>) {
        self.listeners.remove(listener);
    }
}
