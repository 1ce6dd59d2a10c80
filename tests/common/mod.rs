//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use service_boot::config::ConfigStore;
use service_boot::http::HttpServer;
use service_boot::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// A complete YAML document whose fields all derive from `name` and `port`.
pub fn config_yaml(name: &str, port: u16) -> String {
    format!(
        "server:\n  name: {name}\n  port: {port}\n  mode: release\n  host: 127.0.0.1\n\
         database:\n  host: db.internal\n  database: {name}_db\n  password: secret\n\
         cache:\n  db: 1\n\
         log:\n  level: info\n"
    )
}

/// Replace `path` atomically so readers and watchers never see a half-written file.
pub fn write_atomic(path: &Path, content: &str) {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).unwrap();
    fs::rename(&tmp, path).unwrap();
}

pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    write_atomic(&path, content);
    path
}

/// Serve `routes` on an ephemeral port.
pub async fn start_server(store: Arc<ConfigStore>, routes: Router) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_routes(store, routes);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll `check` until it holds or `timeout` elapses.
pub async fn eventually<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    check()
}
