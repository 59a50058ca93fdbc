//! Integration tests for locating a workspace and dispatching to its editor

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use bridge_core::log::{self, LogHub, LogLevel};
use bridge_core::{ChannelLogger, ConsoleLogger, ErrorCode, LogRecord, PackageJsonDetector};
use bridge_peer::test_utils::{OpenRequest, SpyPeerFactory};
use bridge_peer::PEER_UNREACHABLE_HINT;
use editor_bridge::{open_file_at_location, report_failure, FileTarget};

/// Helper to create `<tmp>/ws/app` as a React Native project with
/// `src/index.js` inside it. Returns the app directory.
fn create_workspace(tmp: &TempDir) -> PathBuf {
    let app = tmp.path().join("ws").join("app");
    fs::create_dir_all(app.join("src")).unwrap();
    fs::write(
        app.join("package.json"),
        r#"{
  "name": "app",
  "dependencies": {
    "react": "18.2.0",
    "react-native": "0.72.0"
  }
}
"#,
    )
    .unwrap();
    fs::write(app.join("src").join("index.js"), "export default {};\n").unwrap();
    app
}

fn spy_hub(threshold: LogLevel) -> (LogHub, UnboundedReceiver<LogRecord>) {
    let (logger, rx) = ChannelLogger::new();
    (LogHub::new(Arc::new(logger), threshold), rx)
}

fn drain(rx: &mut UnboundedReceiver<LogRecord>) -> Vec<LogRecord> {
    let mut records = Vec::new();
    while let Ok(record) = rx.try_recv() {
        records.push(record);
    }
    records
}

fn target(path: &Path, suffix: &str) -> FileTarget {
    FileTarget::parse_in(&format!("{}{}", path.display(), suffix), Path::new("/")).unwrap()
}

#[tokio::test]
async fn test_resolves_root_and_dispatches_line() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);
    let file = app.join("src").join("index.js");

    let factory = SpyPeerFactory::new();
    let (hub, _rx) = spy_hub(LogLevel::Info);

    let root = open_file_at_location(
        &target(&file, ":42"),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap();

    assert_eq!(root, app);
    assert_eq!(
        factory.requests(),
        vec![OpenRequest {
            project_root: app.clone(),
            file: file.clone(),
            line: 42,
        }]
    );
}

#[tokio::test]
async fn test_missing_line_dispatches_line_one() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);
    let file = app.join("src").join("index.js");

    let factory = SpyPeerFactory::new();
    let (hub, _rx) = spy_hub(LogLevel::Info);

    open_file_at_location(
        &target(&file, ""),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap();

    assert_eq!(factory.requests()[0].line, 1);
}

#[tokio::test]
async fn test_nested_package_without_dependency_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);
    let nested = app.join("src").join("utils");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("package.json"),
        r#"{"name": "utils", "dependencies": {}}"#,
    )
    .unwrap();

    let factory = SpyPeerFactory::new();
    let (hub, _rx) = spy_hub(LogLevel::Info);

    let root = open_file_at_location(
        &target(&nested.join("strings.js"), ":8"),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap();

    assert_eq!(root, app);
}

#[tokio::test]
async fn test_peer_failure_reports_command_failed_with_cause() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);
    let file = app.join("src").join("index.js");

    let factory = SpyPeerFactory::failing("connection refused");
    let (hub, mut rx) = spy_hub(LogLevel::Info);

    let err = open_file_at_location(
        &target(&file, ":42"),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::CommandFailed);
    assert_eq!(err.to_string(), PEER_UNREACHABLE_HINT);
    assert!(err.has_code(ErrorCode::PeerConnectionFailed));
    assert!(err.render_chain().contains("connection refused"));

    // Start was reported, End was not.
    let records = drain(&mut rx);
    assert_eq!(
        records,
        vec![LogRecord::Message {
            message: "Executing command: openFileAtLocation".to_string(),
            format: true
        }]
    );
}

#[tokio::test]
async fn test_failure_report_shows_chain_once() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);

    let factory = SpyPeerFactory::failing("connection refused");
    let (hub, mut rx) = spy_hub(LogLevel::Info);

    let err = open_file_at_location(
        &target(&app.join("src").join("index.js"), ":3"),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap_err();
    drain(&mut rx);

    let report = report_failure(err, &hub);

    // The hub shows the outermost message only.
    assert_eq!(
        drain(&mut rx),
        vec![LogRecord::Error {
            display: PEER_UNREACHABLE_HINT.to_string(),
            log_stack: false
        }]
    );
    // The report keeps the full chain.
    assert_eq!(report.to_string(), PEER_UNREACHABLE_HINT);
    let frames: Vec<String> = report.chain().map(|e| e.to_string()).collect();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2], "connection refused");
}

#[tokio::test]
async fn test_no_workspace_reports_not_found_without_dispatch() {
    let tmp = TempDir::new().unwrap();
    let loose = tmp.path().join("loose");
    fs::create_dir_all(&loose).unwrap();

    let factory = SpyPeerFactory::new();
    let (hub, _rx) = spy_hub(LogLevel::Info);

    // A dependency nobody on this machine will have as a project marker.
    let detector = PackageJsonDetector::new("editor-bridge-test-marker-dependency");
    let err = open_file_at_location(&target(&loose.join("a.js"), ""), &detector, &factory, &hub)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::WorkspaceNotFound);
    assert!(err.to_string().contains("a.js"));
    assert!(factory.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_manifest_reports_not_found() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);
    fs::write(app.join("src").join("package.json"), "{ broken").unwrap();

    let factory = SpyPeerFactory::new();
    let (hub, _rx) = spy_hub(LogLevel::Info);

    let err = open_file_at_location(
        &target(&app.join("src").join("index.js"), ""),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.codes(),
        vec![ErrorCode::WorkspaceNotFound, ErrorCode::ProjectDetectionFailed]
    );
    assert!(factory.requests().is_empty());
}

#[tokio::test]
async fn test_status_and_debug_messages_reported() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);

    let factory = SpyPeerFactory::new();
    let (hub, mut rx) = spy_hub(LogLevel::Debug);

    open_file_at_location(
        &target(&app.join("src").join("index.js"), ":2"),
        &PackageJsonDetector::default(),
        &factory,
        &hub,
    )
    .await
    .unwrap();

    let records = drain(&mut rx);
    assert_eq!(records.len(), 3);
    assert_eq!(
        records[0],
        LogRecord::Message {
            message: "Executing command: openFileAtLocation".to_string(),
            format: true
        }
    );
    assert!(matches!(
        &records[1],
        LogRecord::Internal { level: LogLevel::Debug, message } if message.contains("Resolved project root")
    ));
    assert_eq!(
        records[2],
        LogRecord::Message {
            message: "Finished executing: openFileAtLocation".to_string(),
            format: true
        }
    );
}

#[tokio::test]
#[serial]
async fn test_global_hub_receives_status() {
    let tmp = TempDir::new().unwrap();
    let app = create_workspace(&tmp);

    let (logger, mut rx) = ChannelLogger::new();
    log::set_global_logger(Arc::new(logger));

    open_file_at_location(
        &target(&app.join("src").join("index.js"), ""),
        &PackageJsonDetector::default(),
        &SpyPeerFactory::new(),
        log::global(),
    )
    .await
    .unwrap();

    let messages: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter(|r| matches!(r, LogRecord::Message { .. }))
        .collect();
    assert_eq!(messages.len(), 2);

    log::set_global_logger(Arc::new(ConsoleLogger::new()));
}

#[cfg(unix)]
mod socket {
    use super::*;
    use bridge_peer::test_utils::{FakeEditorServer, Reply};
    use bridge_peer::{socket_path_for_root, ExtensionMessage, SocketPeerFactory};
    use std::time::Duration;

    #[tokio::test]
    async fn test_end_to_end_over_socket() {
        let tmp = TempDir::new().unwrap();
        let app = create_workspace(&tmp);
        let file = app.join("src").join("index.js");

        let sockets = TempDir::new().unwrap();
        let server =
            FakeEditorServer::start(&socket_path_for_root(sockets.path(), &app), Reply::Ok)
                .unwrap();
        let factory = SocketPeerFactory::new(sockets.path(), Duration::from_secs(5));
        let (hub, _rx) = spy_hub(LogLevel::Info);

        open_file_at_location(
            &target(&file, ":42"),
            &PackageJsonDetector::default(),
            &factory,
            &hub,
        )
        .await
        .unwrap();

        assert_eq!(
            server.received().await,
            vec![ExtensionMessage::OpenFileAtLocation { file, line: 42 }]
        );
    }

    #[tokio::test]
    async fn test_editor_not_running() {
        let tmp = TempDir::new().unwrap();
        let app = create_workspace(&tmp);

        let sockets = TempDir::new().unwrap();
        let factory = SocketPeerFactory::new(sockets.path(), Duration::from_secs(5));
        let (hub, _rx) = spy_hub(LogLevel::Info);

        let err = open_file_at_location(
            &target(&app.join("src").join("index.js"), ":1"),
            &PackageJsonDetector::default(),
            &factory,
            &hub,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.codes(),
            vec![ErrorCode::CommandFailed, ErrorCode::PeerConnectionFailed]
        );
        assert!(err.render_chain().contains("Failed to connect to editor"));
    }
}
