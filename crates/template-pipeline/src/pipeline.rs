//! End-to-end batch drivers
//!
//! Each driver loads samples through a [`SampleSource`], builds the templates
//! of one batch on shared edges and writes them to a single store.

use std::path::{Path, PathBuf};

use template_histogram::{
    BackgroundSet, BatchNormalizer, BatchNormalizer2D, BinEdges, Histogram1D, Histogram2D, Sample,
    SignalRegionLayout,
};
use template_interference::{
    overall_interference, Decomposer, Decomposition, InterferenceInputs, InterferencePair,
    MixedInput, Overlay, PureInput, SampleKey,
};
use template_unroll::Unroller;
use tracing::{debug, info, instrument, warn};

use crate::config::{BinningMode, TemplateConfig};
use crate::datacard::{DatacardPaths, DatacardRunner};
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::source::SampleSource;
use crate::store::{StoreWriter, TemplateStore};

/// Record name of the summed background
pub const BACKGROUND_KEY: &str = "bkg_ggzz";
/// Record name of the SM hypothesis
pub const SM_KEY: &str = "ggH_0PM";
/// Record name of the alternative hypothesis
pub const ALT_KEY: &str = "ggH_0M";

/// A background sample file and its target area
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSpec {
    pub name: String,
    pub path: PathBuf,
    pub area: f64,
}

impl BackgroundSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, area: f64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            area,
        }
    }

    /// Name taken from the file stem up to its first underscore
    ///
    /// `/data/qqzz_2018.csv` is called `qqzz`.
    pub fn from_path(path: impl Into<PathBuf>, area: f64) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().split('_').next().unwrap_or_default().to_string())
            .unwrap_or_default();
        Self { name, path, area }
    }
}

/// A signal sample file and its target area
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSpec {
    pub path: PathBuf,
    pub area: f64,
}

impl SignalSpec {
    pub fn new(path: impl Into<PathBuf>, area: f64) -> Self {
        Self {
            path: path.into(),
            area,
        }
    }
}

/// What a batch wrote
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub store_path: PathBuf,
    pub store: TemplateStore,
}

/// Interference batch output plus the numbers behind it
#[derive(Debug, Clone)]
pub struct InterferenceReport {
    pub batch: BatchReport,
    pub decomposition: Decomposition,
    /// Empty unless all six pairs were present
    pub overlays: Vec<Overlay>,
}

/// Observable binning resolved from the config
enum Binning {
    Uniform(BinEdges),
    SignalRegion(SignalRegionLayout),
}

impl Binning {
    fn from_config(config: &TemplateConfig) -> Result<Self> {
        Ok(match config.binning.mode {
            BinningMode::Uniform => Binning::Uniform(config.uniform_edges()?),
            BinningMode::SignalRegion => Binning::SignalRegion(config.layout()?),
        })
    }

    fn edges(&self) -> &BinEdges {
        match self {
            Binning::Uniform(edges) => edges,
            Binning::SignalRegion(layout) => layout.edges(),
        }
    }

    /// Signal template; signal-region binning renormalizes to the plain sum
    fn signal(&self, sample: &Sample) -> Result<Histogram1D> {
        Ok(match self {
            Binning::Uniform(edges) => BatchNormalizer::new(edges.clone()).normalize(sample)?,
            Binning::SignalRegion(layout) => {
                layout.resample(sample.values(), sample.target_area())?
            }
        })
    }

    fn signal_2d(&self, sample: &Sample, y_edges: &BinEdges) -> Result<Histogram2D> {
        Ok(match self {
            Binning::Uniform(edges) => {
                BatchNormalizer2D::new(edges.clone(), y_edges.clone()).normalize(sample)?
            }
            Binning::SignalRegion(layout) => layout.resample_2d(
                sample.values(),
                sample.require_discriminant()?,
                y_edges,
                sample.target_area(),
            )?,
        })
    }

    /// Backgrounds are always scaled to their absolute area
    fn backgrounds(&self, set: &BackgroundSet) -> Result<Histogram1D> {
        let combined = match self {
            Binning::Uniform(edges) => set.scale_and_add(edges, true)?,
            Binning::SignalRegion(layout) => set.scale_and_add_layout(layout, true)?,
        };
        Ok(combined.total)
    }

    fn backgrounds_2d(&self, set: &BackgroundSet, y_edges: &BinEdges) -> Result<Histogram2D> {
        let combined = match self {
            Binning::Uniform(edges) => set.scale_and_add_2d(edges, y_edges, true)?,
            Binning::SignalRegion(layout) => set.scale_and_add_layout_2d(layout, y_edges, true)?,
        };
        Ok(combined.total)
    }
}

/// Runs template batches for one configuration
#[derive(Debug, Clone)]
pub struct TemplatePipeline<S> {
    config: TemplateConfig,
    source: S,
}

impl<S: SampleSource> TemplatePipeline<S> {
    pub fn new(config: TemplateConfig, source: S) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    fn load_sample(&self, name: &str, path: &Path, area: f64, with_discriminant: bool) -> Result<Sample> {
        let values = self.source.load(path, &self.config.observable)?;
        let sample = Sample::new(name, values, area);
        if with_discriminant {
            let discriminant = self.source.load(path, &self.config.discriminant.column)?;
            Ok(sample.with_discriminant(discriminant)?)
        } else {
            Ok(sample)
        }
    }

    /// Load every background, with discriminant values for 2-D batches
    pub fn load_backgrounds(&self, specs: &[BackgroundSpec], with_discriminant: bool) -> Result<BackgroundSet> {
        let samples = specs
            .iter()
            .map(|spec| self.load_sample(&spec.name, &spec.path, spec.area, with_discriminant))
            .collect::<Result<Vec<_>>>()?;
        Ok(BackgroundSet::from_samples(samples)?)
    }

    /// Interference inputs from a keyed manifest; `areas` are the pure targets for resonances 1..=3
    pub fn interference_inputs(&self, manifest: &Manifest, areas: [f64; 3]) -> Result<InterferenceInputs> {
        let mut inputs = InterferenceInputs::new();
        for (key, entry) in manifest.keyed()? {
            let values = self.source.load(&entry.path, &self.config.observable)?;
            debug!("Loaded {} values for {} from {}", values.len(), key.id(), entry.sample_name());
            match key {
                SampleKey::Pure(r) => {
                    let area = areas[usize::from(r.number() - 1)];
                    inputs.insert_pure(r, PureInput::new(values, entry.cross_section, area));
                }
                SampleKey::Interference(pair) => {
                    inputs.insert_mixed(pair, MixedInput::new(values, entry.cross_section));
                }
            }
        }
        Ok(inputs)
    }

    /// 1-D three-resonance interference batch
    ///
    /// Writes the pure and split interference records and then the summed
    /// background under [`BACKGROUND_KEY`].
    #[instrument(skip(self, manifest, backgrounds), fields(store = %self.config.name))]
    pub fn interference_1d(
        &self,
        manifest: &Manifest,
        areas: [f64; 3],
        backgrounds: &[BackgroundSpec],
    ) -> Result<InterferenceReport> {
        let binning = Binning::from_config(&self.config)?;
        let inputs = self.interference_inputs(manifest, areas)?;
        let background_set = self.load_backgrounds(backgrounds, false)?;

        let decomposition = Decomposer::new(binning.edges().clone())
            .with_prefix(self.config.record_prefix.clone())
            .decompose(&inputs)?;
        let background = binning.backgrounds(&background_set)?;

        let complete = InterferencePair::all()
            .iter()
            .all(|pair| inputs.mixed(pair).is_some());
        let overlays = if complete {
            overall_interference(&decomposition)?
        } else {
            warn!("Skipping overlays, not every interference pair was supplied");
            Vec::new()
        };

        let store_path = self.config.store_path();
        let mut writer = StoreWriter::create(&store_path)?;
        for (name, hist) in decomposition.records() {
            writer.write_1d(name.clone(), hist.clone());
        }
        writer.write_1d(BACKGROUND_KEY, background);
        let store = writer.finish()?;

        info!("Interference batch wrote {} records to {}", store.len(), store_path.display());
        Ok(InterferenceReport {
            batch: BatchReport { store_path, store },
            decomposition,
            overlays,
        })
    }

    /// 1-D hypothesis-separation batch: SM and alternative signal plus background
    #[instrument(skip(self, sm, alt, backgrounds), fields(store = %self.config.name))]
    pub fn significance_1d(
        &self,
        sm: &SignalSpec,
        alt: &SignalSpec,
        backgrounds: &[BackgroundSpec],
    ) -> Result<BatchReport> {
        let binning = Binning::from_config(&self.config)?;
        let sm_sample = self.load_sample(SM_KEY, &sm.path, sm.area, false)?;
        let alt_sample = self.load_sample(ALT_KEY, &alt.path, alt.area, false)?;
        let background_set = self.load_backgrounds(backgrounds, false)?;

        let store_path = self.config.store_path();
        let mut writer = StoreWriter::create(&store_path)?;
        writer.write_1d(SM_KEY, binning.signal(&sm_sample)?);
        writer.write_1d(ALT_KEY, binning.signal(&alt_sample)?);
        writer.write_1d(BACKGROUND_KEY, binning.backgrounds(&background_set)?);
        let store = writer.finish()?;

        info!("Significance batch wrote {}", store_path.display());
        Ok(BatchReport { store_path, store })
    }

    /// 2-D (observable, discriminant) batch of the three standard templates
    #[instrument(skip(self, sm, alt, backgrounds), fields(store = %self.config.name))]
    pub fn templates_2d(
        &self,
        sm: &SignalSpec,
        alt: &SignalSpec,
        backgrounds: &[BackgroundSpec],
    ) -> Result<BatchReport> {
        let binning = Binning::from_config(&self.config)?;
        let y_edges = self.config.discriminant_edges()?;
        let sm_sample = self.load_sample(SM_KEY, &sm.path, sm.area, true)?;
        let alt_sample = self.load_sample(ALT_KEY, &alt.path, alt.area, true)?;
        let background_set = self.load_backgrounds(backgrounds, true)?;

        let store_path = self.config.store_path();
        let mut writer = StoreWriter::create(&store_path)?;
        writer.write_2d(SM_KEY, binning.signal_2d(&sm_sample, &y_edges)?);
        writer.write_2d(ALT_KEY, binning.signal_2d(&alt_sample, &y_edges)?);
        writer.write_2d(BACKGROUND_KEY, binning.backgrounds_2d(&background_set, &y_edges)?);
        let store = writer.finish()?;

        info!("2-D batch wrote {}", store_path.display());
        Ok(BatchReport { store_path, store })
    }

    /// Unroll the configured 2-D records of `input` into the unrolled store
    pub fn unroll(&self, input: &Path) -> Result<BatchReport> {
        let store_path = self.config.unrolled_store_path();
        let keys: Vec<&str> = self.config.unroll.keys.iter().map(String::as_str).collect();
        let store = unroll_store(input, &store_path, &keys, &self.config.unroller())?;
        Ok(BatchReport { store_path, store })
    }

    /// Hand a finished store to the datacard scripts
    pub fn make_datacards(&self, store: &Path) -> Result<DatacardPaths> {
        DatacardRunner::new(self.config.datacard.clone()).run(store)
    }
}

/// Unroll the named 2-D records of a finished store into a new store
///
/// Only components with positive integral are written. Names missing from
/// `input` fail before anything is written.
#[instrument(skip(unroller))]
pub fn unroll_store(
    input: &Path,
    output: &Path,
    names: &[&str],
    unroller: &Unroller,
) -> Result<TemplateStore> {
    let source = TemplateStore::open(input)?;
    let templates = names
        .iter()
        .map(|&name| source.get_2d(name).map(|h| (name, h)))
        .collect::<Result<Vec<_>>>()?;

    let mut writer = StoreWriter::create(output)?;
    for (name, hist) in templates {
        let outcome = unroller.unroll(name, hist)?;
        if outcome.has_negative {
            debug!("{} has negative bins, naming rule {:?}", name, outcome.rule);
        }
        for (component, unrolled) in outcome.written() {
            writer.write_1d(component, unrolled);
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemorySource;

    #[test]
    fn test_background_name_from_path() {
        let spec = BackgroundSpec::from_path("/data/qqzz_2018_M4L.csv", 2.0);
        assert_eq!(spec.name, "qqzz");
        assert_eq!(BackgroundSpec::from_path("ggzz.csv", 1.0).name, "ggzz");
    }

    #[test]
    fn test_significance_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = TemplateConfig {
            output_dir: dir.path().to_path_buf(),
            name: "sig".to_string(),
            binning: crate::config::BinningConfig {
                n_bins: 3,
                ..Default::default()
            },
            ..Default::default()
        };
        let source = InMemorySource::new()
            .with("sm.csv", "M4L", vec![6.5, 7.5, 7.5, 8.5])
            .with("alt.csv", "M4L", vec![7.5])
            .with("qqzz.csv", "M4L", vec![6.5, 8.5]);
        let pipeline = TemplatePipeline::new(config, source).unwrap();

        let report = pipeline
            .significance_1d(
                &SignalSpec::new("sm.csv", 4.0),
                &SignalSpec::new("alt.csv", 4.0),
                &[BackgroundSpec::from_path("qqzz.csv", 2.0)],
            )
            .unwrap();

        assert_eq!(report.store.names(), ["ggH_0PM", "ggH_0M", "bkg_ggzz"]);
        let reopened = TemplateStore::open(&report.store_path).unwrap();
        assert_eq!(reopened.get_1d("ggH_0PM").unwrap().counts(), &[1.0, 2.0, 1.0]);
        assert_eq!(reopened.get_1d("ggH_0M").unwrap().counts(), &[0.0, 4.0, 0.0]);
        assert_eq!(reopened.get_1d("bkg_ggzz").unwrap().counts(), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unroll_store_missing_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        StoreWriter::create(&input).unwrap().finish().unwrap();

        let err = unroll_store(&input, &dir.path().join("out.json"), &["ggH_0PM"], &Unroller::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingRecord(_)));
        assert!(err.is_invalid_argument());
    }
}
