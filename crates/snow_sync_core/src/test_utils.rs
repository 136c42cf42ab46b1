//! Test utilities for snow_sync_core
//!
//! This module provides shared testing infrastructure: a mock filesystem and a
//! scripted HTTP transport that records every request it receives.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::RemoteError;
use crate::fs::FileSystem;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

#[derive(Default)]
struct MockFsState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    mtimes: HashMap<PathBuf, i64>,
    clock: i64,
}

/// A mock filesystem for testing.
///
/// Uses `Arc<Mutex<..>>` so clones share the same underlying storage.
/// Every write bumps a logical clock which is reported as the file's
/// modification time.
#[derive(Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockFsState>>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the mock filesystem (builder pattern).
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write_file(Path::new(path), content).unwrap();
        self
    }

    /// Get the content of a file (for test assertions).
    pub fn get_content(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(&PathBuf::from(path))
            .cloned()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "File not found"))
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let now = state.clock;
        state.files.insert(path.to_path_buf(), content.to_string());
        state.mtimes.insert(path.to_path_buf(), now);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        let children = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn modified_time(&self, path: &Path) -> Option<i64> {
        self.state.lock().unwrap().mtimes.get(path).copied()
    }
}

/// A transport that answers from a queue of canned responses.
///
/// GET and PATCH responses are queued separately. When a queue is empty the
/// transport answers `200 {"result":{}}`. Requests are recorded in order.
#[derive(Clone, Default)]
pub struct MockTransport {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    gets: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
    patches: Arc<Mutex<VecDeque<Result<HttpResponse, String>>>>,
}

impl MockTransport {
    /// Create a transport with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful GET response body.
    pub fn with_get(self, body: &str) -> Self {
        self.gets
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(200, body)));
        self
    }

    /// Queue a GET response with an explicit status.
    pub fn with_get_status(self, status: u16, body: &str) -> Self {
        self.gets
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a GET that fails at the transport level.
    pub fn with_get_failure(self, message: &str) -> Self {
        self.gets
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Queue a PATCH response with an explicit status.
    pub fn with_patch_status(self, status: u16, body: &str) -> Self {
        self.patches
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a PATCH that fails at the transport level.
    pub fn with_patch_failure(self, message: &str) -> Self {
        self.patches
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RemoteError> {
        self.requests.lock().unwrap().push(request.clone());
        let queue = match request.method {
            Method::Get => &self.gets,
            Method::Patch => &self.patches,
        };
        match queue.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(RemoteError::Transport(message)),
            None => Ok(HttpResponse::new(200, r#"{"result":{}}"#)),
        }
    }
}
