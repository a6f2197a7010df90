//! AVTransport actions: current media information

use super::INSTANCE_ID;
use crate::{ActionRequest, Service};

/// State variable carrying the DIDL-Lite now-playing document
pub const CURRENT_URI_METADATA: &str = "CurrentURIMetaData";

pub fn get_media_info() -> ActionRequest {
    ActionRequest::new(Service::AVTransport, "GetMediaInfo").arg("InstanceID", INSTANCE_ID)
}
