#![warn(missing_docs)]
//! Deterministic testing surfaces for chunk lighting (per-chunk record stream, metrics, goldens).

mod metrics;
mod snapshot;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use metrics::*;
pub use snapshot::*;

/// One generated chunk as captured by headless tests.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkLightRecord {
    /// Chunk coordinates `[x, y, z]`.
    pub chunk: [i32; 3],
    /// Scenario or fixture label.
    pub label: String,
    /// Queue entries processed across both propagated channels.
    pub nodes_processed: usize,
    /// Light digest (hex string) for deterministic comparisons.
    pub digest: String,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
    written: usize,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file, written: 0 })
    }

    /// Append a record to the log.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of records appended so far.
    pub fn written(&self) -> usize {
        self.written
    }
}
