//! Handoff artifacts written during a run.
//!
//! Two pretty-printed UTF-8 JSON files in the data directory, overwritten on
//! every run: the raw listing before detail extraction and the collected
//! records before reporting.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::model::{ListingEntry, MovieRecord};

pub const LISTING_FILE: &str = "now_playing.json";
pub const RECORDS_FILE: &str = "movies_enriched.json";

/// Writes artifacts under one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write_listing(&self, entries: &[ListingEntry]) -> Result<PathBuf> {
        self.write_json(LISTING_FILE, entries)
    }

    pub fn write_records(&self, records: &[MovieRecord]) -> Result<PathBuf> {
        self.write_json(RECORDS_FILE, records)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json)?;
        debug!(path = %path.display(), "artifact written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReleaseYear;

    #[test]
    fn listing_is_written_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path().join("nested/data"));
        let path = data
            .write_listing(&[ListingEntry::new("Heat", "https://cinema.example/e/1")])
            .unwrap();

        assert_eq!(path, dir.path().join("nested/data").join(LISTING_FILE));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"));
        let back: Vec<ListingEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(back[0].detail_url, "https://cinema.example/e/1");
    }

    #[test]
    fn records_overwrite_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataDir::new(dir.path());

        let mut first = MovieRecord::new("Heat", "u1");
        first.release_year = ReleaseYear::Known(1995);
        data.write_records(&[first.clone(), first]).unwrap();
        let path = data.write_records(&[MovieRecord::new("Up", "u2")]).unwrap();

        let back: Vec<MovieRecord> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].title, "Up");
        assert_eq!(back[0].release_year, ReleaseYear::Unknown);
    }
}
