/*!
 * Common test utilities for the srtsync test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use srtsync::subtitle_processor::{SubtitleCollection, SubtitleEntry};

/// Three cues, LF line endings, one of them spanning two lines
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains
multiple lines.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a collection from (on, off, text) triples
pub fn collection_of(cues: &[(u32, u32, &str)]) -> SubtitleCollection {
    SubtitleCollection::from_entries(
        cues.iter()
            .map(|&(on, off, text)| SubtitleEntry::new(on, off, format!("{}\n", text)))
            .collect(),
    )
}

/// On-times of every cue, in order
pub fn start_times(collection: &SubtitleCollection) -> Vec<u32> {
    collection.entries().iter().map(|e| e.start_time_ms).collect()
}

/// (on, off) of every cue, in order
pub fn time_pairs(collection: &SubtitleCollection) -> Vec<(u32, u32)> {
    collection.entries().iter().map(|e| (e.start_time_ms, e.end_time_ms)).collect()
}
