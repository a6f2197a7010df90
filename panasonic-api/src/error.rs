use soap_client::SoapError;
use thiserror::Error;

/// High-level API errors for Panasonic TV operations
///
/// Network, parse and fault variants together make up the transport failures
/// of a device call; `UnknownKey` is raised by the key vocabulary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// Connection refused, timeouts, unreachable host, or an HTTP error status
    /// without a SOAP body.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response parsing error
    ///
    /// The device answered but the body could not be parsed into the expected
    /// envelope or metadata document.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// SOAP fault returned by device
    #[error("SOAP fault: error code {0}")]
    SoapFault(u16),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Key identifier not present in the key vocabulary
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}

impl ApiError {
    /// Whether this error came from talking to the device
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::NetworkError(_) | ApiError::ParseError(_) | ApiError::SoapFault(_)
        )
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<SoapError> for ApiError {
    fn from(error: SoapError) -> Self {
        match error {
            SoapError::Network(msg) => ApiError::NetworkError(msg),
            SoapError::Parse(msg) => ApiError::ParseError(msg),
            SoapError::Fault(code) => ApiError::SoapFault(code),
        }
    }
}
