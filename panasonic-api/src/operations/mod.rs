//! Panasonic TV actions organized by service
//!
//! Each function builds the [`ActionRequest`](crate::ActionRequest) for one
//! UPnP action; the client or a UPnP I/O layer then sends it.

pub mod av_transport;
pub mod network_control;
pub mod rendering_control;

/// Instance id used for every media renderer action
pub const INSTANCE_ID: &str = "0";

/// Audio channel addressed by rendering control actions
pub const MASTER_CHANNEL: &str = "Master";
