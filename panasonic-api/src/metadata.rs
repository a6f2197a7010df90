//! Now-playing information carried in `CurrentURIMetaData`
//!
//! The television reports the tuned programme as a DIDL-Lite document:
//!
//! ```xml
//! <DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/"
//!            xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">
//!   <item id="0">
//!     <dc:title>Evening News</dc:title>
//!     <upnp:channelNr>12</upnp:channelNr>
//!     <upnp:channelName>BBC One</upnp:channelName>
//!   </item>
//! </DIDL-Lite>
//! ```

use xmltree::{Element, XMLNode};

use crate::{ApiError, Result};

/// Fields extracted from a DIDL-Lite document; each is present only when the
/// document contains the matching element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    /// `upnp:channelNr`
    pub channel_number: Option<i64>,
    /// `upnp:channelName`
    pub channel_name: Option<String>,
    /// `dc:title`
    pub program_title: Option<String>,
}

impl NowPlaying {
    /// Parse a DIDL-Lite document
    ///
    /// Fails with [`ApiError::ParseError`] when the text is not XML or the
    /// channel number is not an integer.
    pub fn parse(didl: &str) -> Result<NowPlaying> {
        let root = Element::parse(didl.as_bytes())
            .map_err(|e| ApiError::ParseError(format!("Invalid DIDL-Lite metadata: {}", e)))?;

        let channel_number = match find_text(&root, "channelNr") {
            Some(text) => Some(text.trim().parse::<i64>().map_err(|_| {
                ApiError::ParseError(format!("Invalid channel number: {}", text))
            })?),
            None => None,
        };

        Ok(NowPlaying {
            channel_number,
            channel_name: find_text(&root, "channelName"),
            program_title: find_text(&root, "title"),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.channel_number.is_none() && self.channel_name.is_none() && self.program_title.is_none()
    }
}

/// Text of the first descendant element with the given local name, in document order
fn find_text(element: &Element, local_name: &str) -> Option<String> {
    for child in element.children.iter().filter_map(XMLNode::as_element) {
        if child.name == local_name {
            return Some(
                child
                    .get_text()
                    .map(|text| text.into_owned())
                    .unwrap_or_default(),
            );
        }
        if let Some(text) = find_text(child, local_name) {
            return Some(text);
        }
    }
    None
}
