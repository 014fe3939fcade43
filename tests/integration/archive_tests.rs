//! End-to-end pipeline tests with a fake fetcher

use crate::common::{FakeFetcher, Workspace};
use async_trait::async_trait;
use link_archiver::storage::{read_entry, CACHE_FILE_NAME, ENTRY_FILE_NAME, STAGING_PREFIX};
use link_archiver::{
    identify, ArchiveError, ArchiveWriter, Archiver, CheckedLinks, ContentFetcher, FetchError,
    FetchedContent, LinkOutcome, Metadata,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Fetcher that plants a regular file where the entry for `squat_url` would
/// go, as if another process wrote to the output directory mid-run
struct SquattingFetcher {
    output: PathBuf,
    squat_url: String,
}

#[async_trait]
impl ContentFetcher for SquattingFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedContent, FetchError> {
        if url == self.squat_url {
            let id = identify(url).unwrap();
            std::fs::write(self.output.join(id.as_str()), "squatter").unwrap();
        }
        Ok(FetchedContent {
            title: "Title".to_string(),
            body: "<p>body</p>".to_string(),
        })
    }
}

#[tokio::test]
async fn test_second_run_fetches_nothing() {
    let ws = Workspace::new();
    ws.write_doc(
        "notes/rust.md",
        "Read [the book](https://doc.rust-lang.org/book/) and [std](https://doc.rust-lang.org/std/).",
    );
    ws.write_doc("todo.markdown", "- [ ] check [crates](https://crates.io/)");

    let first = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), first.clone())
        .run()
        .await
        .expect("First run failed");
    assert_eq!(first.request_count(), 3);
    assert_eq!(stats.count(LinkOutcome::Archived), 3);

    let second = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), second.clone())
        .run()
        .await
        .expect("Second run failed");

    assert_eq!(second.request_count(), 0);
    assert_eq!(stats.count(LinkOutcome::SkippedCached), 3);
    assert_eq!(stats.fetch_attempts(), 0);
}

#[tokio::test]
async fn test_same_link_in_two_documents_archived_once() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "See [example](https://example.com).");
    ws.write_doc("b.md", "Also [example again](https://example.com).");

    let fetcher = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(fetcher.requests(), vec!["https://example.com"]);
    assert_eq!(stats.count(LinkOutcome::Archived), 1);
    assert_eq!(stats.count(LinkOutcome::SkippedCached), 1);

    let id = identify("https://example.com").unwrap();
    assert_eq!(ws.entry_names(), vec![id.to_string()]);
}

#[tokio::test]
async fn test_entry_on_disk_repairs_missing_cache() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "x [kept](https://example.com/kept)");

    // An earlier run wrote the entry but crashed before flushing the cache
    let id = identify("https://example.com/kept").unwrap();
    ArchiveWriter::new(ws.output_path())
        .write(
            &id,
            &Metadata::now("https://example.com/kept", "Kept"),
            "<p>old</p>",
        )
        .unwrap();
    assert!(!ws.output_path().join(CACHE_FILE_NAME).exists());

    let fetcher = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(fetcher.request_count(), 0);
    assert_eq!(stats.count(LinkOutcome::SkippedOnDisk), 1);

    let cache = CheckedLinks::load(ws.output_path()).unwrap();
    assert!(cache.contains(&id));

    let (_, body) = read_entry(ws.output_path(), &id).unwrap();
    assert_eq!(body, "<p>old</p>");
}

#[tokio::test]
async fn test_failed_fetch_not_retried() {
    let ws = Workspace::new();
    ws.write_doc(
        "a.md",
        "x [down](https://down.example/page) y [up](https://up.example/page)",
    );

    let fetcher = Arc::new(FakeFetcher::failing(&["https://down.example/page"]));
    let stats = Archiver::new(ws.config(), fetcher)
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.count(LinkOutcome::FetchFailed), 1);
    assert_eq!(stats.count(LinkOutcome::Archived), 1);

    let down = identify("https://down.example/page").unwrap();
    let up = identify("https://up.example/page").unwrap();
    assert!(!ws.output_path().join(down.as_str()).exists());
    assert!(ws.output_path().join(up.as_str()).exists());

    let cache = CheckedLinks::load(ws.output_path()).unwrap();
    assert!(cache.contains(&down));
    assert!(cache.contains(&up));

    let retry = Arc::new(FakeFetcher::new());
    Archiver::new(ws.config(), retry.clone())
        .run()
        .await
        .expect("Second run failed");
    assert_eq!(retry.request_count(), 0);
}

#[tokio::test]
async fn test_cache_file_sorted_one_id_per_line() {
    let ws = Workspace::new();
    ws.write_doc(
        "a.md",
        "x [z](https://zzz.example/) y [a](https://aaa.example/) z [m](https://mmm.example/)",
    );

    Archiver::new(ws.config(), Arc::new(FakeFetcher::new()))
        .run()
        .await
        .expect("Run failed");

    let content = std::fs::read_to_string(ws.output_path().join(CACHE_FILE_NAME)).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    let mut sorted = lines.clone();
    sorted.sort();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines, sorted);
    assert!(lines[0].starts_with("aaa.example_"));
}

#[tokio::test]
async fn test_malformed_link_skipped_run_continues() {
    let ws = Workspace::new();
    ws.write_doc(
        "a.md",
        "x [bad](http://[not-an-ip/page) y [good](https://example.com/good)",
    );

    let fetcher = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.count(LinkOutcome::Malformed), 1);
    assert_eq!(stats.count(LinkOutcome::Archived), 1);
    assert_eq!(fetcher.requests(), vec!["https://example.com/good"]);
}

#[tokio::test]
async fn test_image_links_and_other_files_ignored() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "x ![diagram](https://example.com/diagram.png)");
    ws.write_doc("notes.txt", "x [link](https://example.com/txt)");

    let fetcher = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.documents_scanned, 1);
    assert_eq!(stats.links_discovered, 0);
    assert_eq!(fetcher.request_count(), 0);
    assert!(ws.entry_names().is_empty());
}

#[tokio::test]
async fn test_entry_metadata_written() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "x [post](https://blog.example/post?id=7)");

    Archiver::new(ws.config(), Arc::new(FakeFetcher::new()))
        .run()
        .await
        .expect("Run failed");

    let id = identify("https://blog.example/post?id=7").unwrap();
    let entry_file = ws.output_path().join(id.as_str()).join(ENTRY_FILE_NAME);
    let raw = std::fs::read_to_string(&entry_file).unwrap();
    assert!(raw.starts_with("---\n"));

    let (metadata, body) = read_entry(ws.output_path(), &id).unwrap();
    assert_eq!(metadata.url, "https://blog.example/post?id=7");
    assert_eq!(metadata.title, "Page at https://blog.example/post?id=7");
    assert_eq!(body, "<p>Content of https://blog.example/post?id=7</p>");
}

#[tokio::test]
async fn test_leftover_staging_removed() {
    let ws = Workspace::new();
    let id = identify("https://example.com/crashed").unwrap();
    let staging = ws
        .output_path()
        .join(format!("{}{}", STAGING_PREFIX, id));
    std::fs::create_dir(&staging).unwrap();
    std::fs::write(staging.join(ENTRY_FILE_NAME), "---\nurl: partial").unwrap();

    ws.write_doc("a.md", "x [crashed](https://example.com/crashed)");

    let fetcher = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.staging_removed, 1);
    assert_eq!(fetcher.request_count(), 1);
    assert!(!staging.exists());
    assert_eq!(ws.entry_names(), vec![id.to_string()]);
}

#[tokio::test]
async fn test_concurrent_fetches_archive_each_link_once() {
    let ws = Workspace::new();
    let mut doc = String::from("Links:\n");
    for i in 0..12 {
        doc.push_str(&format!("- [page {i}](https://example.com/page/{i})\n"));
    }
    // Repeat a few links in a second document
    ws.write_doc("a.md", &doc);
    ws.write_doc(
        "b.md",
        "x [again](https://example.com/page/3) y [again](https://example.com/page/7)",
    );

    let mut config = ws.config();
    config.fetcher.max_concurrent_fetches = 4;

    let fetcher = Arc::new(FakeFetcher::with_delay(Duration::from_millis(20)));
    let stats = Archiver::new(config, fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(fetcher.request_count(), 12);
    assert_eq!(stats.count(LinkOutcome::Archived), 12);
    assert_eq!(stats.count(LinkOutcome::SkippedCached), 2);
    assert_eq!(ws.entry_names().len(), 12);
}

#[tokio::test]
async fn test_slow_fetch_times_out_as_failure() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "x [slow](https://slow.example/)");

    let mut config = ws.config();
    config.fetcher.timeout_secs = 1;

    let fetcher = Arc::new(FakeFetcher::with_delay(Duration::from_secs(3)));
    let stats = Archiver::new(config, fetcher)
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.count(LinkOutcome::FetchFailed), 1);
    assert!(ws.entry_names().is_empty());

    let cache = CheckedLinks::load(ws.output_path()).unwrap();
    assert!(cache.contains(&identify("https://slow.example/").unwrap()));
}

#[cfg(unix)]
#[tokio::test]
async fn test_non_utf8_document_name_scanned() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let ws = Workspace::new();
    let name = OsStr::from_bytes(b"caf\xe9.md");
    std::fs::write(
        ws.input.path().join(name),
        "x [a](https://example.com/a)",
    )
    .unwrap();

    let fetcher = Arc::new(FakeFetcher::new());
    let stats = Archiver::new(ws.config(), fetcher.clone())
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.documents_scanned, 1);
    assert_eq!(stats.count(LinkOutcome::Archived), 1);
    assert_eq!(fetcher.requests(), vec!["https://example.com/a"]);
}

#[tokio::test]
async fn test_write_failure_aborts_without_flush() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "x [ok](https://example.com/ok)");
    ws.write_doc("b.md", "x [taken](https://example.com/taken)");

    let fetcher = Arc::new(SquattingFetcher {
        output: ws.output_path().to_path_buf(),
        squat_url: "https://example.com/taken".to_string(),
    });
    let result = Archiver::new(ws.config(), fetcher).run().await;

    assert!(matches!(result, Err(ArchiveError::Write(_))));
    assert!(!ws.output_path().join(CACHE_FILE_NAME).exists());

    // The entry written before the failure is still complete on disk
    let ok = identify("https://example.com/ok").unwrap();
    let (metadata, _) = read_entry(ws.output_path(), &ok).unwrap();
    assert_eq!(metadata.url, "https://example.com/ok");
}

#[tokio::test]
async fn test_cache_flush_failure_is_fatal() {
    let ws = Workspace::new();
    ws.write_doc("a.md", "x [ok](https://example.com/ok)");

    // A directory where the temporary cache file must be created
    std::fs::create_dir(ws.output_path().join(format!("{}.tmp", CACHE_FILE_NAME))).unwrap();

    let result = Archiver::new(ws.config(), Arc::new(FakeFetcher::new()))
        .run()
        .await;

    assert!(matches!(result, Err(ArchiveError::Cache(_))));
    assert!(!ws.output_path().join(CACHE_FILE_NAME).exists());
}

#[tokio::test]
async fn test_stray_staging_file_does_not_block_link() {
    let ws = Workspace::new();
    let id = identify("https://example.com/stray").unwrap();
    let stray = ws
        .output_path()
        .join(format!("{}{}", STAGING_PREFIX, id));
    std::fs::write(&stray, "partial").unwrap();

    ws.write_doc("a.md", "x [stray](https://example.com/stray)");

    let stats = Archiver::new(ws.config(), Arc::new(FakeFetcher::new()))
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.staging_removed, 1);
    assert_eq!(stats.count(LinkOutcome::Archived), 1);
    assert!(!stray.exists());
}
