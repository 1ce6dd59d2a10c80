//! Hot reload behaviour of the configuration store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use service_boot::config::{ConfigError, ConfigStore, ConfigWatcher, EnvSource};

mod common;

#[test]
fn snapshot_after_initialize_matches_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));

    let store = ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap();
    let snapshot = store.snapshot();

    assert_eq!(snapshot.server.name, "alpha");
    assert_eq!(snapshot.server.port, 9001);
    assert_eq!(snapshot.server.host, "127.0.0.1");
    assert_eq!(snapshot.database.database, "alpha_db");
    assert_eq!(snapshot.database.password, "secret");
    assert_eq!(snapshot.cache.db, 1);
    assert_eq!(store.generation(), 1);
    assert_eq!(store.path(), Some(path.as_path()));
}

#[test]
fn initialize_fails_on_missing_or_malformed_file() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("absent.yaml");
    assert!(matches!(
        ConfigStore::initialize_with_env(&missing, EnvSource::Empty),
        Err(ConfigError::Io { .. })
    ));

    let path = common::write_config(dir.path(), "server: [oops");
    assert!(matches!(
        ConfigStore::initialize_with_env(&path, EnvSource::Empty),
        Err(ConfigError::Parse { .. })
    ));

    let path = common::write_config(dir.path(), "");
    assert!(matches!(
        ConfigStore::initialize_with_env(&path, EnvSource::Empty),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn env_overrides_apply_on_initialize_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let env = EnvSource::Fixed(vec![("APP_SERVER_PORT".into(), "9500".into())]);

    let store = ConfigStore::initialize_with_env(&path, env).unwrap();
    assert_eq!(store.server().port, 9500);

    common::write_atomic(&path, &common::config_yaml("beta", 9002));
    store.reload().unwrap();
    assert_eq!(store.server().name, "beta");
    assert_eq!(store.server().port, 9500);
}

#[test]
fn reload_replaces_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let store = ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap();
    let old = store.snapshot();

    common::write_atomic(&path, &common::config_yaml("beta", 9002));
    let new = store.reload().unwrap();

    assert_eq!(new.server.name, "beta");
    assert_eq!(store.snapshot().server.port, 9002);
    assert_eq!(store.generation(), 2);
    // Snapshots already handed out are untouched.
    assert_eq!(old.server.name, "alpha");
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let store = ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap();
    let before = store.snapshot();

    common::write_atomic(&path, "server:\n  port: [not, a, port\n");
    assert!(matches!(store.reload(), Err(ConfigError::Parse { .. })));
    assert_eq!(*store.snapshot(), *before);

    common::write_atomic(&path, "log:\n  level: chatty\n");
    assert!(matches!(store.reload(), Err(ConfigError::Validation(_))));
    assert_eq!(*store.snapshot(), *before);

    assert_eq!(store.generation(), 1);
}

#[test]
fn truncated_file_does_not_publish_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let store = ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap();
    let before = store.snapshot();

    // Plain truncate-then-write, the way a non-atomic editor save looks midway.
    std::fs::write(&path, "").unwrap();
    assert!(matches!(store.reload(), Err(ConfigError::Parse { .. })));

    std::fs::write(&path, "\n   \n").unwrap();
    assert!(matches!(store.reload(), Err(ConfigError::Parse { .. })));

    assert_eq!(*store.snapshot(), *before);
    assert_eq!(store.database().database, "alpha_db");
    assert_eq!(store.generation(), 1);

    std::fs::write(&path, common::config_yaml("beta", 9002)).unwrap();
    assert_eq!(store.reload().unwrap().server.name, "beta");
    assert_eq!(store.generation(), 2);
}

#[test]
fn concurrent_readers_never_see_a_torn_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let store = Arc::new(ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut reads = 0u64;
                while !done.load(Ordering::Relaxed) {
                    let snapshot = store.snapshot();
                    let observed = (
                        snapshot.server.name.as_str(),
                        snapshot.server.port,
                        snapshot.database.database.as_str(),
                    );
                    assert!(
                        observed == ("alpha", 9001, "alpha_db") || observed == ("beta", 9002, "beta_db"),
                        "torn snapshot: {observed:?}"
                    );
                    reads += 1;
                }
                reads
            })
        })
        .collect();

    for i in 0..50 {
        let (name, port) = if i % 2 == 0 { ("beta", 9002) } else { ("alpha", 9001) };
        common::write_atomic(&path, &common::config_yaml(name, port));
        store.reload().unwrap();
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(store.generation(), 51);
}

#[tokio::test]
async fn watcher_reloads_on_file_change() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let store = Arc::new(ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap());

    let _watcher = ConfigWatcher::new(store.clone()).run().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    common::write_atomic(&path, &common::config_yaml("beta", 9002));

    let reloaded = common::eventually(Duration::from_secs(10), || store.server().name == "beta").await;
    assert!(reloaded, "watcher did not pick up the change");
    assert_eq!(store.server().port, 9002);
}

#[tokio::test]
async fn watcher_keeps_config_when_file_goes_bad() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_config(dir.path(), &common::config_yaml("alpha", 9001));
    let store = Arc::new(ConfigStore::initialize_with_env(&path, EnvSource::Empty).unwrap());

    let _watcher = ConfigWatcher::new(store.clone()).run().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    common::write_atomic(&path, "server: {port: ");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(store.server().name, "alpha");

    common::write_atomic(&path, &common::config_yaml("gamma", 9003));
    let reloaded = common::eventually(Duration::from_secs(10), || store.server().name == "gamma").await;
    assert!(reloaded);
}
