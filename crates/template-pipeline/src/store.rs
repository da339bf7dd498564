//! Keyed template store
//!
//! A store is an ordered list of named 1-D or 2-D records saved as one JSON
//! document. Names may repeat; lookups return the first match. Files are only
//! written through [`StoreWriter`], whose [`finish`](StoreWriter::finish)
//! flushes and syncs before returning, so a store opened afterwards is always
//! complete.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use template_histogram::{Histogram1D, Histogram2D};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Record {
    Hist1d(Histogram1D),
    Hist2d(Histogram2D),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub name: String,
    pub record: Record,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    records: Vec<NamedRecord>,
}

/// Records read back from a finished store
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    records: Vec<NamedRecord>,
}

impl TemplateStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let doc: StoreDocument = serde_json::from_reader(BufReader::new(file))?;
        debug!("Opened {} with {} records", path.as_ref().display(), doc.records.len());
        Ok(Self {
            records: doc.records,
        })
    }

    pub fn records(&self) -> &[NamedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record names in stored order, repeats included
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// First record stored under `name`
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.record)
    }

    /// Every record stored under `name`
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records
            .iter()
            .filter(move |r| r.name == name)
            .map(|r| &r.record)
    }

    pub fn get_1d(&self, name: &str) -> Result<&Histogram1D> {
        match self.get(name) {
            Some(Record::Hist1d(h)) => Ok(h),
            Some(Record::Hist2d(_)) => Err(Error::InvalidInput(format!(
                "record '{name}' is 2-D, expected 1-D"
            ))),
            None => Err(Error::MissingRecord(name.to_string())),
        }
    }

    pub fn get_2d(&self, name: &str) -> Result<&Histogram2D> {
        match self.get(name) {
            Some(Record::Hist2d(h)) => Ok(h),
            Some(Record::Hist1d(_)) => Err(Error::InvalidInput(format!(
                "record '{name}' is 1-D, expected 2-D"
            ))),
            None => Err(Error::MissingRecord(name.to_string())),
        }
    }
}

/// Buffers records and writes them out in one go
///
/// The target file is created (and truncated) immediately.
#[derive(Debug)]
pub struct StoreWriter {
    path: PathBuf,
    file: File,
    records: Vec<NamedRecord>,
}

impl StoreWriter {
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file,
            records: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_1d(&mut self, name: impl Into<String>, hist: Histogram1D) {
        self.records.push(NamedRecord {
            name: name.into(),
            record: Record::Hist1d(hist),
        });
    }

    pub fn write_2d(&mut self, name: impl Into<String>, hist: Histogram2D) {
        self.records.push(NamedRecord {
            name: name.into(),
            record: Record::Hist2d(hist),
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serialize, flush and sync, returning the written store
    pub fn finish(self) -> Result<TemplateStore> {
        let doc = StoreDocument {
            records: self.records,
        };
        let mut writer = BufWriter::new(self.file);
        serde_json::to_writer_pretty(&mut writer, &doc)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        debug!("Wrote {} records to {}", doc.records.len(), self.path.display());
        Ok(TemplateStore {
            records: doc.records,
        })
    }
}
