//! High-level Panasonic TV API for device control
//!
//! This crate provides typed access to the UPnP services of a Panasonic
//! television. It uses the private `soap-client` crate for low-level SOAP
//! communication.
//!
//! # Remote-control keys
//!
//! Keys are injected through the vendor `p00NetworkControl` service:
//!
//! ```rust,no_run
//! use panasonic_api::{KeyCode, PanasonicClient};
//!
//! let client = PanasonicClient::new();
//! client.send_key("192.168.1.40:55000", KeyCode::Power);
//! ```
//!
//! # Media renderer actions
//!
//! Volume, mute and now-playing information come from the standard
//! `RenderingControl` and `AVTransport` services:
//!
//! ```rust,no_run
//! use panasonic_api::operations::rendering_control;
//! use panasonic_api::PanasonicClient;
//!
//! let client = PanasonicClient::new();
//! let variables = client
//!     .invoke("http://192.168.1.40:55000/dmr/control_0", &rendering_control::get_volume())
//!     .unwrap_or_default();
//! println!("{:?}", variables.get("CurrentVolume"));
//! ```

pub mod action;
pub mod client;
pub mod error;
pub mod key_code;
pub mod metadata;
pub mod operations;
pub mod service;

pub use action::{parse_state_variables, ActionRequest, StateVariables};
pub use client::{KeySender, PanasonicClient, DEFAULT_PORT};
pub use error::{ApiError, Result};
pub use key_code::KeyCode;
pub use metadata::NowPlaying;
pub use service::{Service, ServiceInfo};
