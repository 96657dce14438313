use std::path::{Path, PathBuf};

use crate::io::domain::image_writer::ImageWriter;
use crate::shared::constants::{SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX};
use crate::shared::frame::Frame;

/// Saves frames as `captured_<n>.jpg` with a strictly increasing counter.
///
/// The counter seeds past any `captured_*.jpg` already in the directory,
/// so neither earlier runs nor the current one are ever overwritten.
pub struct SnapshotWriter {
    dir: PathBuf,
    writer: Box<dyn ImageWriter>,
    next_index: u32,
}

impl SnapshotWriter {
    pub fn new(dir: &Path, writer: Box<dyn ImageWriter>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            writer,
            next_index: next_free_index(dir),
        }
    }

    /// Writes the frame and returns the path it landed at.
    pub fn save(&mut self, frame: &Frame) -> Result<PathBuf, Box<dyn std::error::Error>> {
        // Re-check existence in case files appeared after construction.
        let mut path = self.path_for(self.next_index);
        while path.exists() {
            self.next_index += 1;
            path = self.path_for(self.next_index);
        }

        self.writer.write(&path, frame)?;
        log::info!("saved snapshot {}", path.display());
        self.next_index += 1;
        Ok(path)
    }

    fn path_for(&self, index: u32) -> PathBuf {
        self.dir
            .join(format!("{SNAPSHOT_PREFIX}{index}.{SNAPSHOT_EXTENSION}"))
    }
}

/// First index with no `captured_<n>.jpg` at or above any existing one.
fn next_free_index(dir: &Path) -> u32 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    let mut next = 0u32;
    for entry in entries.flatten() {
        if let Some(index) = parse_snapshot_index(&entry.file_name().to_string_lossy()) {
            next = next.max(index + 1);
        }
    }
    next
}

fn parse_snapshot_index(name: &str) -> Option<u32> {
    let stem = name.strip_prefix(SNAPSHOT_PREFIX)?;
    let digits = stem.strip_suffix(&format!(".{SNAPSHOT_EXTENSION}"))?;
    digits.parse().ok()
}
