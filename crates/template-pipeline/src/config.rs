//! Batch configuration
//!
//! Every field has a default matching the usual four-lepton mass setup, so a
//! JSON file only needs to name what differs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use template_histogram::{BinEdges, SignalRegion, SignalRegionLayout};
use template_unroll::Unroller;

use crate::error::{Error, Result};

/// How the observable axis is binned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinningMode {
    /// `n_bins` equal-width bins over `range`
    #[default]
    Uniform,
    /// Extra bins inside the configured signal region
    SignalRegion,
}

/// Observable-axis binning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningConfig {
    pub mode: BinningMode,
    pub n_bins: usize,
    pub range: (f64, f64),
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            mode: BinningMode::Uniform,
            n_bins: 40,
            range: (6.0, 9.0),
        }
    }
}

/// Sub-range of the observable that gets finer bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRegionConfig {
    pub low: f64,
    pub high: f64,
    pub n_bins_region: usize,
}

/// Binning of the discriminant (second) axis of 2-D templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscriminantConfig {
    pub column: String,
    pub n_bins: usize,
    pub range: (f64, f64),
}

impl Default for DiscriminantConfig {
    fn default() -> Self {
        Self {
            column: "D_0minus".to_string(),
            n_bins: 10,
            range: (0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnrollConfig {
    pub fill_fraction: f64,
    pub background_marker: String,
    /// 2-D records to unroll, in order
    pub keys: Vec<String>,
}

impl Default for UnrollConfig {
    fn default() -> Self {
        Self {
            fill_fraction: template_unroll::DEFAULT_FILL_FRACTION,
            background_marker: template_unroll::DEFAULT_BACKGROUND_MARKER.to_string(),
            keys: vec![
                "ggH_0PM".to_string(),
                "ggH_0M".to_string(),
                "bkg_ggzz".to_string(),
            ],
        }
    }
}

/// External datacard scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacardConfig {
    pub interpreter: String,
    pub make_input_script: PathBuf,
    pub datacard_script: PathBuf,
    /// Directory the scripts are run from
    pub working_dir: Option<PathBuf>,
    /// Remove files already in the input/output folders
    pub clean: bool,
    /// Let the scripts write to stdout
    pub verbose: bool,
}

impl Default for DatacardConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            make_input_script: PathBuf::from("MakeInputRoot_OnShell.py"),
            datacard_script: PathBuf::from("DatacardMaker_OnShell.py"),
            working_dir: None,
            clean: true,
            verbose: false,
        }
    }
}

/// Settings for one template batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub output_dir: PathBuf,
    /// Store file stem, without extension
    pub name: String,
    /// Column holding the observable
    pub observable: String,
    /// Prefix of interference record names
    pub record_prefix: String,
    pub binning: BinningConfig,
    pub signal_region: Option<SignalRegionConfig>,
    pub discriminant: DiscriminantConfig,
    pub unroll: UnrollConfig,
    pub datacard: DatacardConfig,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            name: "Mass_Template".to_string(),
            observable: "M4L".to_string(),
            record_prefix: template_interference::DEFAULT_PREFIX.to_string(),
            binning: BinningConfig::default(),
            signal_region: None,
            discriminant: DiscriminantConfig::default(),
            unroll: UnrollConfig::default(),
            datacard: DatacardConfig::default(),
        }
    }
}

fn check_range(range: (f64, f64), what: &str) -> Result<()> {
    if !(range.0.is_finite() && range.1.is_finite() && range.0 < range.1) {
        return Err(Error::Config(format!(
            "{what} range ({}, {}) must be finite with low < high",
            range.0, range.1
        )));
    }
    Ok(())
}

impl TemplateConfig {
    /// Read and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Config("store name must not be empty".to_string()));
        }
        if self.binning.n_bins == 0 {
            return Err(Error::Config("n_bins must be positive".to_string()));
        }
        check_range(self.binning.range, "observable")?;
        check_range(self.discriminant.range, "discriminant")?;
        if self.discriminant.n_bins == 0 {
            return Err(Error::Config("discriminant n_bins must be positive".to_string()));
        }

        match (&self.binning.mode, &self.signal_region) {
            (BinningMode::SignalRegion, None) => {
                return Err(Error::Config(
                    "signal_region binning needs a signal_region section".to_string(),
                ))
            }
            (BinningMode::SignalRegion, Some(sr)) => {
                if sr.n_bins_region == 0 || sr.n_bins_region > self.binning.n_bins {
                    return Err(Error::Config(format!(
                        "n_bins_region must be in 1..={}, got {}",
                        self.binning.n_bins, sr.n_bins_region
                    )));
                }
                let (low, high) = self.binning.range;
                if !(low <= sr.low && sr.low < sr.high && sr.high <= high) {
                    return Err(Error::Config(format!(
                        "signal region ({}, {}) must lie inside ({low}, {high})",
                        sr.low, sr.high
                    )));
                }
            }
            (BinningMode::Uniform, _) => {}
        }

        if !(self.unroll.fill_fraction.is_finite() && self.unroll.fill_fraction >= 0.0) {
            return Err(Error::Config("fill_fraction must be a non-negative number".to_string()));
        }
        Ok(())
    }

    /// Where the batch store is written
    pub fn store_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.name))
    }

    /// Where the unrolled store is written
    pub fn unrolled_store_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_unrolled.json", self.name))
    }

    /// Uniform observable edges
    pub fn uniform_edges(&self) -> Result<BinEdges> {
        Ok(BinEdges::uniform(self.binning.n_bins, self.binning.range)?)
    }

    /// Signal-region layout; fails unless a signal region is configured
    pub fn layout(&self) -> Result<SignalRegionLayout> {
        let sr = self.signal_region.as_ref().ok_or_else(|| {
            Error::Config("no signal_region configured".to_string())
        })?;
        let region = SignalRegion::new(sr.low, sr.high)?;
        Ok(SignalRegionLayout::new(
            sr.n_bins_region,
            self.binning.n_bins,
            self.binning.range,
            Some(region),
        )?)
    }

    pub fn discriminant_edges(&self) -> Result<BinEdges> {
        Ok(BinEdges::uniform(self.discriminant.n_bins, self.discriminant.range)?)
    }

    pub fn unroller(&self) -> Unroller {
        Unroller::new()
            .with_fill_fraction(self.unroll.fill_fraction)
            .with_background_marker(self.unroll.background_marker.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = TemplateConfig::default();
        config.validate().unwrap();
        assert_eq!(config.uniform_edges().unwrap().num_bins(), 40);
        assert!(config.store_path().ends_with("Mass_Template.json"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "name": "Interf",
            "binning": { "mode": "signal_region", "n_bins": 60 },
            "signal_region": { "low": 7.0, "high": 8.0, "n_bins_region": 30 }
        }"#;
        let config: TemplateConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.binning.range, (6.0, 9.0));
        assert_eq!(config.observable, "M4L");
        assert_eq!(config.layout().unwrap().edges().num_bins(), 60);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = TemplateConfig::default();
        config.binning.mode = BinningMode::SignalRegion;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.signal_region = Some(SignalRegionConfig {
            low: 5.0,
            high: 8.0,
            n_bins_region: 10,
        });
        assert!(config.validate().is_err());

        let mut config = TemplateConfig::default();
        config.binning.range = (9.0, 6.0);
        assert!(config.validate().is_err());

        let mut config = TemplateConfig::default();
        config.unroll.fill_fraction = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layout_requires_region() {
        assert!(TemplateConfig::default().layout().is_err());
    }
}
