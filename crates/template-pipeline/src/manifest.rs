//! Cross-section manifest
//!
//! One row per sample file, after a header line:
//!
//! ```text
//! path, cross_section, uncertainty, component
//! /data/BW1_pure.csv, 0.0125, 0.0003, pure:1
//! /data/BW1_phi_0_BW2_phi_0.csv, 0.031, , interference:12:0
//! ```
//!
//! Columns are matched by position; `uncertainty` and `component` may be
//! left empty or omitted.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use template_interference::SampleKey;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: PathBuf,
    pub cross_section: f64,
    #[serde(default)]
    pub uncertainty: Option<f64>,
    #[serde(default)]
    pub component: Option<SampleKey>,
}

impl ManifestEntry {
    /// File name of the sample, used in log messages
    pub fn sample_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in csv.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            let entry: ManifestEntry = record.deserialize(None)?;
            if !(entry.cross_section.is_finite() && entry.cross_section >= 0.0) {
                return Err(Error::InvalidInput(format!(
                    "cross section of {} must be a non-negative number",
                    entry.sample_name()
                )));
            }
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries by sample key; every row needs a component and keys must be unique
    pub fn keyed(&self) -> Result<BTreeMap<SampleKey, &ManifestEntry>> {
        let mut keyed = BTreeMap::new();
        for entry in &self.entries {
            let key = entry.component.ok_or_else(|| {
                Error::InvalidInput(format!(
                    "manifest entry {} has no component",
                    entry.sample_name()
                ))
            })?;
            if keyed.insert(key, entry).is_some() {
                return Err(Error::InvalidInput(format!(
                    "component {key} appears more than once in the manifest"
                )));
            }
        }
        Ok(keyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use template_interference::{InterferencePair, Phase, Resonance};

    #[test]
    fn test_parse_full_rows() {
        let text = "path,cross_section,uncertainty,component\n\
                    /d/BW1.csv, 0.5, 0.01, pure:1\n\
                    /d/BW13.csv, 1.25, , interference:13:pi/2\n";
        let manifest = Manifest::from_reader(text.as_bytes()).unwrap();
        assert_eq!(manifest.len(), 2);

        let first = &manifest.entries()[0];
        assert_eq!(first.path, PathBuf::from("/d/BW1.csv"));
        assert_eq!(first.uncertainty, Some(0.01));
        assert_eq!(first.component, Some(SampleKey::Pure(Resonance::One)));

        let second = &manifest.entries()[1];
        assert_eq!(second.uncertainty, None);
        let pair = InterferencePair::new(Resonance::One, Resonance::Three, Phase::HalfPi).unwrap();
        assert_eq!(second.component, Some(SampleKey::Interference(pair)));
        assert_eq!(second.sample_name(), "BW13.csv");
    }

    #[test]
    fn test_short_rows_and_header_text() {
        // The header line is skipped whatever it says
        let text = "file name, xsec\n/d/a.csv, 2.0\n\n/d/b.csv, 3.0\n";
        let manifest = Manifest::from_reader(text.as_bytes()).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.entries()[1].cross_section, 3.0);
        assert!(manifest.entries()[1].component.is_none());
    }

    #[test]
    fn test_keyed_rejects_missing_and_duplicate_components() {
        let text = "path,cross_section\n/d/a.csv, 2.0\n";
        let manifest = Manifest::from_reader(text.as_bytes()).unwrap();
        assert!(manifest.keyed().is_err());

        let text = "path,cross_section,uncertainty,component\n\
                    /d/a.csv,1,,pure:2\n\
                    /d/b.csv,1,,pure:2\n";
        let manifest = Manifest::from_reader(text.as_bytes()).unwrap();
        assert!(manifest.keyed().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_bad_rows() {
        assert!(Manifest::from_reader("p,c\n/d/a.csv, lots\n".as_bytes()).is_err());
        assert!(Manifest::from_reader("p,c\n/d/a.csv, -1\n".as_bytes()).is_err());
        assert!(Manifest::from_reader("p,c,u,k\n/d/a.csv,1,,pure:7\n".as_bytes()).is_err());
    }
}
