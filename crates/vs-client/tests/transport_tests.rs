//! Integration tests for the HTTP transport against a fake device

use std::time::{Duration, Instant};

use vs_client::testing::{FakeDevice, TruncatingDevice};
use vs_client::{DeviceTransport, HttpTransport, WAPI_CONTENT_TYPE};
use vs_core::{CommandError, Credentials, Intent};

fn transport() -> HttpTransport {
    HttpTransport::new(Credentials::new("admin", "password")).unwrap()
}

#[tokio::test]
async fn test_send_posts_command_verbatim_with_auth() {
    let device = FakeDevice::start().await.unwrap();
    let command = Intent::SwitchHost {
        encoder: "10.0.0.5".parse().unwrap(),
    }
    .encode();
    device.respond_to(
        command.clone(),
        "CMD=START&UNIT.ID=ALL&API.STATUS=SUCCESS&CMD=END",
    );

    let response = transport()
        .send(&device.address(), &command)
        .await
        .unwrap();
    assert_eq!(response.get("API.STATUS"), Some("SUCCESS"));

    let received = device.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, command);
    assert_eq!(
        received[0].authorization.as_deref(),
        Some("Basic YWRtaW46cGFzc3dvcmQ=")
    );
    assert_eq!(received[0].content_type.as_deref(), Some(WAPI_CONTENT_TYPE));
}

#[tokio::test]
async fn test_send_returns_parsed_fields() {
    let device = FakeDevice::start().await.unwrap();
    let command = Intent::QueryDeviceInfo.encode();
    device.respond_to(
        command.clone(),
        "UNIT.MODEL=VS-2000&UNIT.FIRMWARE=3.4.1&IP.ADDRESS=10.0.0.20&API.STATUS=SUCCESS&",
    );

    let response = transport()
        .send(&device.address(), &command)
        .await
        .unwrap();
    assert_eq!(response.get("UNIT.MODEL"), Some("VS-2000"));
    assert_eq!(response.get("UNIT.FIRMWARE"), Some("3.4.1"));
    assert_eq!(response.get("IP.ADDRESS"), Some("10.0.0.20"));
    assert_eq!(response.len(), 4);
}

#[tokio::test]
async fn test_failure_status_is_protocol_error_with_raw_body() {
    let device = FakeDevice::start_with_fallback("API.STATUS=FAILURE: busy").await.unwrap();

    let err = transport()
        .send(&device.address(), "CMD=START&CMD=END")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CommandError::Protocol {
            body: "API.STATUS=FAILURE: busy".to_string()
        }
    );
}

#[tokio::test]
async fn test_missing_status_is_protocol_error() {
    let device = FakeDevice::start_with_fallback("STREAM.HOST=10.0.0.5").await.unwrap();

    let err = transport()
        .send(&device.address(), "CMD=START&CMD=END")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "protocol");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then close it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = transport().send(&address, "CMD=START&CMD=END").await.unwrap_err();
    assert!(matches!(err, CommandError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn test_truncated_body_is_body_read_error() {
    let device = TruncatingDevice::start().await.unwrap();

    let err = transport()
        .send(&device.address(), "CMD=START&CMD=END")
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::BodyRead(_)), "{:?}", err);
    assert_eq!(err.kind(), "body_read");
}

#[tokio::test]
async fn test_empty_address_is_request_build_error() {
    let err = transport().send("", "CMD=START&CMD=END").await.unwrap_err();
    assert!(matches!(err, CommandError::RequestBuild(_)), "{:?}", err);
}

#[tokio::test]
async fn test_invalid_address_is_request_build_error() {
    let err = transport().send("bad host", "CMD=START&CMD=END").await.unwrap_err();
    assert!(matches!(err, CommandError::RequestBuild(_)), "{:?}", err);
}

#[tokio::test]
async fn test_slow_device_times_out() {
    let device = FakeDevice::start().await.unwrap();
    device.set_delay(Duration::from_secs(3));

    let transport =
        HttpTransport::with_timeout(Credentials::default(), Duration::from_millis(200)).unwrap();

    let started = Instant::now();
    let err = transport
        .send(&device.address(), "CMD=START&CMD=END")
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::Transport(_)), "{:?}", err);
    assert!(started.elapsed() < Duration::from_secs(2));
}
