use mockito::Matcher;
use panasonic_api::operations::{av_transport, rendering_control};
use panasonic_api::{ApiError, KeyCode, NowPlaying, PanasonicClient};

fn response_envelope(service: &str, action: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body><u:{action}Response xmlns:u="urn:schemas-upnp-org:service:{service}:1">{body}</u:{action}Response></s:Body>
</s:Envelope>"#
    )
}

#[test]
fn test_send_key_posts_x_send_key_envelope() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/nrc/control_0/")
        .match_header("Content-Type", "text/xml; charset=\"utf-8\"")
        .match_header(
            "SOAPAction",
            "\"urn:panasonic-com:service:p00NetworkControl:1#X_SendKey\"",
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"<u:X_SendKey xmlns:u="urn:panasonic-com:service:p00NetworkControl:1">"#.to_string()),
            Matcher::Regex("<X_KeyEvent>NRC_POWER-ONOFF</X_KeyEvent>".to_string()),
        ]))
        .with_status(200)
        .with_body(response_envelope("p00NetworkControl", "X_SendKey", ""))
        .expect(1)
        .create();

    PanasonicClient::new().send_key_to(&server.url(), KeyCode::Power);

    mock.assert();
}

#[test]
fn test_send_key_swallows_device_fault() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/nrc/control_0/")
        .with_status(500)
        .with_body(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring><detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0"><errorCode>401</errorCode></UPnPError></detail></s:Fault></s:Body></s:Envelope>"#,
        )
        .create();

    PanasonicClient::new().send_key_to(&server.url(), KeyCode::Enter);

    mock.assert();
}

#[test]
fn test_invoke_get_volume_returns_state_variables() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/dmr/control_0")
        .match_header(
            "SOAPAction",
            "\"urn:schemas-upnp-org:service:RenderingControl:1#GetVolume\"",
        )
        .match_body(Matcher::Regex(
            "<InstanceID>0</InstanceID><Channel>Master</Channel>".to_string(),
        ))
        .with_status(200)
        .with_body(response_envelope(
            "RenderingControl",
            "GetVolume",
            "<CurrentVolume>27</CurrentVolume>",
        ))
        .create();

    let url = format!("{}/dmr/control_0", server.url());
    let variables = PanasonicClient::new()
        .invoke(&url, &rendering_control::get_volume())
        .unwrap();

    mock.assert();
    assert_eq!(variables["CurrentVolume"].as_deref(), Some("27"));
}

#[test]
fn test_invoke_get_media_info_yields_parsable_metadata() {
    let didl = "&lt;DIDL-Lite xmlns:dc=&quot;http://purl.org/dc/elements/1.1/&quot; xmlns:upnp=&quot;urn:schemas-upnp-org:metadata-1-0/upnp/&quot;&gt;&lt;item&gt;&lt;dc:title&gt;Quiz&lt;/dc:title&gt;&lt;upnp:channelNr&gt;5&lt;/upnp:channelNr&gt;&lt;upnp:channelName&gt;Five&lt;/upnp:channelName&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;";
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/dmr/control_1")
        .with_status(200)
        .with_body(response_envelope(
            "AVTransport",
            "GetMediaInfo",
            &format!("<NrTracks>1</NrTracks><CurrentURIMetaData>{didl}</CurrentURIMetaData>"),
        ))
        .create();

    let url = format!("{}/dmr/control_1", server.url());
    let variables = PanasonicClient::new()
        .invoke(&url, &av_transport::get_media_info())
        .unwrap();

    let metadata = variables["CurrentURIMetaData"].as_deref().unwrap();
    let now_playing = NowPlaying::parse(metadata).unwrap();
    assert_eq!(now_playing.channel_number, Some(5));
    assert_eq!(now_playing.channel_name.as_deref(), Some("Five"));
    assert_eq!(now_playing.program_title.as_deref(), Some("Quiz"));
}

#[test]
fn test_invoke_maps_fault_code() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/dmr/control_0")
        .with_status(500)
        .with_body(
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><detail><UPnPError><errorCode>402</errorCode></UPnPError></detail></s:Fault></s:Body></s:Envelope>"#,
        )
        .create();

    let url = format!("{}/dmr/control_0", server.url());
    let result = PanasonicClient::new().invoke(&url, &rendering_control::set_volume(10));

    assert!(matches!(result, Err(ApiError::SoapFault(402))));
}
