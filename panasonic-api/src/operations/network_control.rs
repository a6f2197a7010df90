//! p00NetworkControl actions: remote-key injection

use crate::{ActionRequest, KeyCode, Service};

pub const SEND_KEY: &str = "X_SendKey";
pub const KEY_EVENT: &str = "X_KeyEvent";

/// `X_SendKey` with the key's wire string as the single `X_KeyEvent` argument
pub fn send_key(key: KeyCode) -> ActionRequest {
    ActionRequest::new(Service::NetworkControl, SEND_KEY).arg(KEY_EVENT, key.wire_value())
}
