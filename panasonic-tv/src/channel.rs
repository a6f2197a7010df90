//! Automation-facing channels, commands and state values

use std::fmt;
use std::str::FromStr;

use crate::error::TvError;

/// A channel exposed to the automation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Power,
    Mute,
    Volume,
    /// Numeric channel selection
    Channel,
    ChannelName,
    ProgramTitle,
    /// Raw remote-control key
    KeyCode,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Power,
        Channel::Mute,
        Channel::Volume,
        Channel::Channel,
        Channel::ChannelName,
        Channel::ProgramTitle,
        Channel::KeyCode,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Channel::Power => "power",
            Channel::Mute => "mute",
            Channel::Volume => "volume",
            Channel::Channel => "channel",
            Channel::ChannelName => "channel-name",
            Channel::ProgramTitle => "program-title",
            Channel::KeyCode => "key-code",
        }
    }
}

impl FromStr for Channel {
    type Err = TvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|channel| channel.id() == s)
            .ok_or_else(|| TvError::UnroutableCommand(s.to_string()))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Command sent by the automation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OnOff(bool),
    Decimal(i64),
    Percent(u8),
    Text(String),
    Increase,
    Decrease,
}

/// State pushed to the automation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Percent(u8),
    OnOff(bool),
    Decimal(i64),
    Text(String),
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThingStatus {
    Online,
    Offline,
}

/// Reason attached to a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDetail {
    None,
    ConfigurationError,
}
