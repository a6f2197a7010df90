//! RenderingControl actions: volume and mute

use super::{INSTANCE_ID, MASTER_CHANNEL};
use crate::{ActionRequest, Service};

/// State variable returned by `GetVolume`
pub const CURRENT_VOLUME: &str = "CurrentVolume";
/// State variable returned by `GetMute`
pub const CURRENT_MUTE: &str = "CurrentMute";

/// Highest volume the device accepts
pub const MAX_VOLUME: u8 = 100;

pub fn get_volume() -> ActionRequest {
    ActionRequest::new(Service::RenderingControl, "GetVolume")
        .arg("InstanceID", INSTANCE_ID)
        .arg("Channel", MASTER_CHANNEL)
}

pub fn set_volume(desired_volume: u8) -> ActionRequest {
    ActionRequest::new(Service::RenderingControl, "SetVolume")
        .arg("InstanceID", INSTANCE_ID)
        .arg("Channel", MASTER_CHANNEL)
        .arg("DesiredVolume", desired_volume.to_string())
}

pub fn get_mute() -> ActionRequest {
    ActionRequest::new(Service::RenderingControl, "GetMute")
        .arg("InstanceID", INSTANCE_ID)
        .arg("Channel", MASTER_CHANNEL)
}

pub fn set_mute(desired_mute: bool) -> ActionRequest {
    ActionRequest::new(Service::RenderingControl, "SetMute")
        .arg("InstanceID", INSTANCE_ID)
        .arg("Channel", MASTER_CHANNEL)
        .arg("DesiredMute", desired_mute.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_volume_payload() {
        assert_eq!(
            set_volume(35).build_payload(),
            "<InstanceID>0</InstanceID><Channel>Master</Channel><DesiredVolume>35</DesiredVolume>"
        );
    }

    #[test]
    fn test_set_mute_uses_boolean_literal() {
        assert_eq!(set_mute(true).argument("DesiredMute"), Some("true"));
        assert_eq!(set_mute(false).argument("DesiredMute"), Some("false"));
    }

    #[test]
    fn test_getters_target_rendering_control() {
        for request in [get_volume(), get_mute()] {
            assert_eq!(request.service, Service::RenderingControl);
            assert_eq!(request.argument("Channel"), Some("Master"));
        }
    }
}
