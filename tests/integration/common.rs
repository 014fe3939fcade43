//! Shared fixtures for integration tests

use async_trait::async_trait;
use link_archiver::config::Config;
use link_archiver::{ContentFetcher, FetchError, FetchedContent};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

/// Fake fetcher that records every request
///
/// URLs listed in `failing` return a network error; every other URL returns
/// a small page. An optional delay simulates slow servers.
#[derive(Default)]
pub struct FakeFetcher {
    requests: Mutex<Vec<String>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentFetcher for FakeFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedContent, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(url) {
            return Err(FetchError::Network("connection refused".to_string()));
        }

        Ok(FetchedContent {
            title: format!("Page at {}", url),
            body: format!("<p>Content of {}</p>", url),
        })
    }
}

/// Input and output directories for one test
pub struct Workspace {
    pub input: TempDir,
    pub output: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            input: TempDir::new().expect("Failed to create input dir"),
            output: TempDir::new().expect("Failed to create output dir"),
        }
    }

    pub fn config(&self) -> Config {
        Config::new(self.input.path(), self.output.path())
    }

    /// Writes a document relative to the input root, creating parent dirs
    pub fn write_doc(&self, relative: &str, content: &str) {
        let path = self.input.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create doc dir");
        }
        std::fs::write(path, content).expect("Failed to write doc");
    }

    pub fn output_path(&self) -> &Path {
        self.output.path()
    }

    /// Names of archive entry directories, sorted
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output.path())
            .expect("Failed to list output dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
