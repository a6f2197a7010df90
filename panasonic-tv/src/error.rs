use panasonic_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TvError {
    /// Required configuration is missing or invalid; the binding stays offline
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Command shape or value does not fit the target channel
    #[error("Command '{command}' not supported for channel '{channel}'")]
    UnsupportedCommand { channel: String, command: String },

    /// No active service accepts commands for the channel
    #[error("Channel '{0}' not supported")]
    UnroutableCommand(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

impl TvError {
    pub(crate) fn unsupported(channel: impl ToString, command: impl std::fmt::Debug) -> Self {
        TvError::UnsupportedCommand {
            channel: channel.to_string(),
            command: format!("{:?}", command),
        }
    }
}

pub type Result<T> = std::result::Result<T, TvError>;
