mod common;

use std::io::Write;
use std::time::Duration;

use common::{recording_reporter, FakeTransport};
use model_host::kernel::error::LoadError;
use model_host::kernel::loader::{LoadedBuffer, ResourceLoader, ResponseMode};
use model_host::kernel::telemetry::TelemetryEvent;
use model_host::kernel::telemetry::TelemetryReporter;
use model_host::{FileHandle, LoadOrigin};

#[tokio::test]
async fn test_network_success() {
    let (telemetry, recorder) = recording_reporter();
    let loader = ResourceLoader::new(FakeTransport::new().ok("http://x/model.bin", &[0x01, 0x02]), telemetry);

    let result = loader.load(LoadOrigin::network("http://x/model.bin")).await;

    assert_eq!(
        result,
        Ok(LoadedBuffer { bytes: vec![0x01, 0x02], name: "model.bin".to_string() })
    );
    assert!(recorder.is_empty(), "Success should not report telemetry");
}

#[tokio::test]
async fn test_network_not_found_reports_once() {
    let (telemetry, recorder) = recording_reporter();
    let loader = ResourceLoader::new(FakeTransport::new().status("http://x/model.bin", 404, b""), telemetry);

    let result = loader.load(LoadOrigin::network("http://x/model.bin")).await;

    let err = result.unwrap_err();
    assert_eq!(err, LoadError::Retrieval { status_code: Some(404) });
    assert_eq!(err.to_string(), "request failed");

    let events = recorder.events();
    assert_eq!(events.len(), 1, "Exactly one exception per failure");
    match &events[0] {
        TelemetryEvent::Exception { fatal, description, .. } => {
            assert!(!fatal);
            assert!(description.contains("404"));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    let (telemetry, recorder) = recording_reporter();
    let loader = ResourceLoader::new(FakeTransport::new(), telemetry);

    let err = loader.load(LoadOrigin::network("http://unreachable/a.pb")).await.unwrap_err();

    assert_eq!(err.status_code(), None);
    assert_eq!(recorder.snapshot().exception_stats.non_fatal, 1);
}

#[tokio::test]
async fn test_response_mode_follows_suffix() {
    let transport = FakeTransport::new()
        .ok("http://x/graph.pb", b"\x08\x01")
        .ok("http://x/labels.txt", b"cat\ndog");
    let loader = ResourceLoader::new(transport, TelemetryReporter::disabled())
        .with_binary_suffixes([".pb", ".onnx"]);

    assert_eq!(loader.response_mode("http://x/a.onnx?download=1"), ResponseMode::Binary);
    assert_eq!(loader.response_mode("http://x/a.json"), ResponseMode::Text);

    loader.load(LoadOrigin::network("http://x/graph.pb")).await.unwrap();
    let text = loader.load(LoadOrigin::network("http://x/labels.txt")).await.unwrap();
    assert_eq!(text.bytes, b"cat\ndog".to_vec());
}

#[tokio::test]
async fn test_concurrent_loads_do_not_cross() {
    let transport = FakeTransport::new()
        .delayed("http://x/slow.onnx", &[0xAA; 3], Duration::from_millis(50))
        .ok("http://x/fast.onnx", &[0xBB]);
    let loader = ResourceLoader::new(transport, TelemetryReporter::disabled());

    let slow = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load(LoadOrigin::network("http://x/slow.onnx")).await }
    });
    let fast = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load(LoadOrigin::network("http://x/fast.onnx")).await }
    });

    let fast = fast.await.unwrap().unwrap();
    let slow = slow.await.unwrap().unwrap();

    assert_eq!((fast.name.as_str(), fast.bytes), ("fast.onnx", vec![0xBB]));
    assert_eq!((slow.name.as_str(), slow.bytes), ("slow.onnx", vec![0xAA; 3]));
}

#[tokio::test]
async fn test_local_file_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"\x00\x01onnx").unwrap();

    let (telemetry, recorder) = recording_reporter();
    let loader = ResourceLoader::new(FakeTransport::new(), telemetry);

    let handle = FileHandle::with_name(file.path(), "squeezenet.onnx");
    let buffer = loader.load(LoadOrigin::local(handle)).await.unwrap();

    assert_eq!(buffer.name, "squeezenet.onnx");
    assert_eq!(buffer.bytes, b"\x00\x01onnx".to_vec());
    assert!(recorder.is_empty());
}

#[tokio::test]
async fn test_local_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (telemetry, recorder) = recording_reporter();
    let loader = ResourceLoader::new(FakeTransport::new(), telemetry);

    let handle = FileHandle::new(dir.path().join("gone.pb"));
    let err = loader.load(LoadOrigin::local(handle)).await.unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }));
    assert_eq!(err.status_code(), None);
    assert_eq!(recorder.len(), 1);
}
