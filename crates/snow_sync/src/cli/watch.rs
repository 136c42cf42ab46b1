//! Watch command handler
//!
//! Polls the sync directory in the foreground and pushes every script whose
//! modification time moved since the previous poll. Runs until interrupted.

use std::thread;
use std::time::Duration;

use snow_sync_core::error::Result;
use snow_sync_core::fs::FileSystem;
use snow_sync_core::notify::LogNotifier;
use snow_sync_core::transport::Transport;
use snow_sync_core::watch::ChangeDetector;
use snow_sync_core::{SyncEngine, SyncReport};

use crate::cli::util::{ConfigFile, open_engine, print_report};

pub fn handle_watch(config_file: &ConfigFile, interval: u64) -> bool {
    let mut engine = match open_engine(config_file) {
        Ok(engine) => engine.with_notifier(LogNotifier),
        Err(e) => {
            eprintln!("✗ {}", e);
            return false;
        }
    };

    if let Err(e) = engine.validate() {
        eprintln!("✗ {}", e);
        return false;
    }

    let mut detector = ChangeDetector::new();
    if let Err(e) = detector.poll(engine.store()) {
        eprintln!("✗ {}", e);
        return false;
    }

    println!(
        "Watching {} (every {}s, Ctrl-C to stop)",
        engine.store().root().display(),
        interval
    );
    let interval = Duration::from_secs(interval.max(1));

    loop {
        thread::sleep(interval);
        match push_changes(&mut engine, &mut detector) {
            Ok(Some(report)) => {
                print_report("Pushed", &report);
            }
            Ok(None) => {}
            Err(e) => log::error!("ERROR: {}", e),
        }
    }
}

/// One poll: push whatever changed, if anything.
fn push_changes<FS: FileSystem, T: Transport>(
    engine: &mut SyncEngine<FS, T>,
    detector: &mut ChangeDetector,
) -> Result<Option<SyncReport>> {
    let changed = detector.poll(engine.store())?;
    if changed.is_empty() {
        return Ok(None);
    }
    log::debug!("{} changed script(s)", changed.len());
    Ok(Some(engine.push(&changed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_sync_core::config::{Config, TableEntry};
    use snow_sync_core::error::RemoteError;
    use snow_sync_core::fs::RealFileSystem;
    use snow_sync_core::transport::{HttpRequest, HttpResponse};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct RecordingTransport {
        urls: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, RemoteError> {
            self.urls.lock().unwrap().push(request.url.clone());
            Ok(HttpResponse::new(200, r#"{"result":{}}"#))
        }
    }

    #[test]
    fn test_push_changes_only_after_edit() {
        let dir = TempDir::new().unwrap();
        let config = Config::new("./", "https://test.com/api/now/table/", "u", "p").with_table(
            "script_include",
            TableEntry::new("TestClass", "sys_script_include", "xxxxxx-sysid-xxxxxx", "script"),
        );
        let transport = RecordingTransport::default();
        let mut engine = SyncEngine::new(config, RealFileSystem, transport.clone())
            .with_sync_dir(dir.path().join("sync"));
        let script = engine
            .store()
            .write_script("script_include", "TestClass", "a")
            .unwrap();

        let mut detector = ChangeDetector::new();
        assert!(push_changes(&mut engine, &mut detector).unwrap().is_none());
        assert!(push_changes(&mut engine, &mut detector).unwrap().is_none());

        thread::sleep(Duration::from_millis(1100));
        std::fs::write(&script, "b").unwrap();

        let report = push_changes(&mut engine, &mut detector).unwrap().unwrap();
        assert_eq!(report.succeeded, vec!["script_include/test_class.js"]);
        assert_eq!(
            *transport.urls.lock().unwrap(),
            vec!["https://test.com/api/now/table/sys_script_include/xxxxxx-sysid-xxxxxx"]
        );
    }
}
