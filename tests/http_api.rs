//! End-to-end tests of the HTTP API.
//!
//! Each test binds the real router on an ephemeral port and talks to it with
//! reqwest. Scripts live in temporary directories; tests that need to observe
//! or break the launch steps use a recording `ProcessHost`.
//!
//! Run with: cargo test --test http_api

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use deploy_hook::{create_router, AppState, Launcher, OsProcessHost, ProcessHost};
use serde_json::{json, Value};

/// Counts launch steps and optionally fails one of them.
#[derive(Default)]
struct RecordingHost {
    chmods: AtomicUsize,
    spawns: AtomicUsize,
    chmod_error: Option<&'static str>,
    spawn_error: Option<&'static str>,
}

impl RecordingHost {
    fn chmods(&self) -> usize {
        self.chmods.load(Ordering::SeqCst)
    }

    fn spawns(&self) -> usize {
        self.spawns.load(Ordering::SeqCst)
    }
}

impl ProcessHost for RecordingHost {
    fn make_executable(&self, _path: &Path) -> io::Result<()> {
        self.chmods.fetch_add(1, Ordering::SeqCst);
        match self.chmod_error {
            Some(msg) => Err(io::Error::new(io::ErrorKind::PermissionDenied, msg)),
            None => Ok(()),
        }
    }

    fn spawn_detached(&self, _path: &Path) -> io::Result<()> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        match self.spawn_error {
            Some(msg) => Err(io::Error::other(msg)),
            None => Ok(()),
        }
    }
}

/// Serve the router on 127.0.0.1 with an OS-assigned port and return its base URL.
async fn spawn_app(launcher: Launcher) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(launcher));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn write_script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("deploy.sh");
    std::fs::write(&path, body).unwrap();
    path
}

async fn post_webhook(base: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/webhook", base))
        .body(r#"{"ref":"refs/heads/main"}"#)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn health_is_always_ok() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(Launcher::with_os(dir.path().join("deploy.sh"))).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let response = client.get(format!("{}/health", base)).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }
}

#[tokio::test]
async fn webhook_without_script_is_500_and_spawns_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(RecordingHost::default());
    let base = spawn_app(Launcher::new(dir.path().join("deploy.sh"), host.clone())).await;

    let (status, body) = post_webhook(&base).await;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({"status": "error", "message": "deploy.sh script not found"})
    );
    assert_eq!(host.chmods(), 0);
    assert_eq!(host.spawns(), 0);
}

#[tokio::test]
async fn webhook_accepts_and_launches() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(RecordingHost::default());
    let script = write_script(&dir, "#!/bin/sh\nexit 0\n");
    let base = spawn_app(Launcher::new(script, host.clone())).await;

    let (status, body) = post_webhook(&base).await;
    assert_eq!(status, 202);
    assert_eq!(
        body,
        json!({"status": "success", "message": "Deployment script started"})
    );
    assert_eq!(host.spawns(), 1);
}

#[tokio::test]
async fn webhook_chmod_failure_reports_detail_and_skips_launch() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(RecordingHost {
        chmod_error: Some("operation not permitted on deploy.sh"),
        ..Default::default()
    });
    let script = write_script(&dir, "#!/bin/sh\nexit 0\n");
    let base = spawn_app(Launcher::new(script, host.clone())).await;

    let (status, body) = post_webhook(&base).await;
    assert_eq!(status, 500);
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Failed to make script executable: operation not permitted on deploy.sh"
    );
    assert_eq!(host.chmods(), 1);
    assert_eq!(host.spawns(), 0);
}

#[tokio::test]
async fn webhook_spawn_failure_is_generic_error() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(RecordingHost {
        spawn_error: Some("exec format error"),
        ..Default::default()
    });
    let script = write_script(&dir, "#!/bin/sh\nexit 0\n");
    let base = spawn_app(Launcher::new(script, host.clone())).await;

    let (status, body) = post_webhook(&base).await;
    assert_eq!(status, 500);
    assert_eq!(
        body,
        json!({"status": "error", "message": "An error occurred: exec format error"})
    );
    assert_eq!(host.chmods(), 1);
    assert_eq!(host.spawns(), 1);
}

#[tokio::test]
async fn repeated_webhooks_each_launch() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(RecordingHost::default());
    let script = write_script(&dir, "#!/bin/sh\nexit 0\n");
    let base = spawn_app(Launcher::new(script, host.clone())).await;

    for _ in 0..3 {
        let (status, _) = post_webhook(&base).await;
        assert_eq!(status, 202);
    }
    assert_eq!(host.spawns(), 3);
}

#[tokio::test]
async fn webhook_rejects_other_methods() {
    let dir = tempfile::tempdir().unwrap();
    let host = Arc::new(RecordingHost::default());
    let script = write_script(&dir, "#!/bin/sh\nexit 0\n");
    let base = spawn_app(Launcher::new(script, host.clone())).await;

    let response = reqwest::Client::new()
        .get(format!("{}/webhook", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 405);
    let allow = response.headers().get("allow").unwrap().to_str().unwrap();
    assert!(allow.contains("POST"), "unexpected Allow header: {}", allow);
    assert_eq!(host.chmods(), 0);
    assert_eq!(host.spawns(), 0);
}

#[tokio::test]
async fn unknown_path_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let base = spawn_app(Launcher::with_os(dir.path().join("deploy.sh"))).await;

    let response = reqwest::Client::new()
        .post(format!("{}/deploy", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "error", "message": "Not found"}));
}

#[cfg(unix)]
#[tokio::test]
async fn response_does_not_wait_for_slow_script() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("finished");
    let script = write_script(
        &dir,
        &format!("#!/bin/sh\nsleep 2\ntouch '{}'\n", marker.display()),
    );
    let base = spawn_app(Launcher::new(script.clone(), Arc::new(OsProcessHost))).await;

    let start = Instant::now();
    let (status, body) = post_webhook(&base).await;
    let elapsed = start.elapsed();

    assert_eq!(status, 202);
    assert_eq!(body["status"], "success");
    assert!(
        elapsed < Duration::from_millis(1500),
        "webhook took {:?}",
        elapsed
    );
    assert!(!marker.exists());

    let mode = std::fs::metadata(&script).unwrap().permissions().mode();
    assert_eq!(mode & 0o111, 0o111);

    // The script keeps running after the response and eventually finishes
    let deadline = Instant::now() + Duration::from_secs(10);
    while !marker.exists() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(marker.exists(), "deployment script never completed");
}

#[cfg(unix)]
#[tokio::test]
async fn unlaunchable_script_reports_launch_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory passes the existence check but cannot be executed
    let script = dir.path().join("deploy.sh");
    std::fs::create_dir(&script).unwrap();
    let base = spawn_app(Launcher::with_os(script)).await;

    let (status, body) = post_webhook(&base).await;
    assert_eq!(status, 500);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(
        message.starts_with("An error occurred: "),
        "unexpected message: {}",
        message
    );
}
