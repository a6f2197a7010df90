//! Generic UPnP action requests and their state-variable results

use std::collections::HashMap;

use quick_xml::escape::escape;
use xmltree::{Element, XMLNode};

use crate::service::Service;

/// Output arguments of an action, keyed by state-variable name.
///
/// A variable the device returned without text is kept as `None`.
pub type StateVariables = HashMap<String, Option<String>>;

/// One UPnP action invocation: service, action name and ordered input arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub service: Service,
    pub action: &'static str,
    pub arguments: Vec<(&'static str, String)>,
}

impl ActionRequest {
    pub fn new(service: Service, action: &'static str) -> Self {
        Self {
            service,
            action,
            arguments: Vec::new(),
        }
    }

    /// Append an input argument; order is preserved in the envelope
    pub fn arg(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.arguments.push((name, value.into()));
        self
    }

    /// Look up an input argument by name
    pub fn argument(&self, name: &str) -> Option<&str> {
        self.arguments
            .iter()
            .find(|(arg, _)| *arg == name)
            .map(|(_, value)| value.as_str())
    }

    /// XML for the action's children, with argument values escaped
    pub fn build_payload(&self) -> String {
        self.arguments
            .iter()
            .map(|(name, value)| format!("<{name}>{}</{name}>", escape(value.as_str())))
            .collect()
    }
}

/// Collect the child elements of an `<Action>Response` element into variables
pub fn parse_state_variables(response: &Element) -> StateVariables {
    response
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .map(|child| {
            let value = child
                .get_text()
                .map(|text| text.into_owned())
                .filter(|text| !text.is_empty());
            (child.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_keeps_argument_order() {
        let request = ActionRequest::new(Service::RenderingControl, "SetVolume")
            .arg("InstanceID", "0")
            .arg("Channel", "Master")
            .arg("DesiredVolume", "42");

        assert_eq!(
            request.build_payload(),
            "<InstanceID>0</InstanceID><Channel>Master</Channel><DesiredVolume>42</DesiredVolume>"
        );
        assert_eq!(request.argument("DesiredVolume"), Some("42"));
        assert_eq!(request.argument("Missing"), None);
    }

    #[test]
    fn test_payload_escapes_values() {
        let request = ActionRequest::new(Service::AVTransport, "X").arg("Value", "a<b&c");
        assert_eq!(request.build_payload(), "<Value>a&lt;b&amp;c</Value>");
    }

    #[test]
    fn test_parse_state_variables() {
        let xml = r#"
            <u:GetMediaInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1">
                <NrTracks>1</NrTracks>
                <CurrentURI>http://tv/stream</CurrentURI>
                <CurrentURIMetaData>&lt;DIDL-Lite&gt;&lt;/DIDL-Lite&gt;</CurrentURIMetaData>
                <NextURI></NextURI>
            </u:GetMediaInfoResponse>
        "#;
        let element = Element::parse(xml.as_bytes()).unwrap();
        let variables = parse_state_variables(&element);

        assert_eq!(variables.len(), 4);
        assert_eq!(variables["NrTracks"].as_deref(), Some("1"));
        assert_eq!(
            variables["CurrentURIMetaData"].as_deref(),
            Some("<DIDL-Lite></DIDL-Lite>")
        );
        assert_eq!(variables["NextURI"], None);
    }
}
