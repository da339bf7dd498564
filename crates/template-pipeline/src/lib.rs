//! Batch layer for signed histogram templates
//!
//! Ties the template crates to files on disk:
//!
//! - [`TemplateConfig`]: JSON configuration with defaults for every field
//! - [`Manifest`]: cross-section manifest mapping sample files to [`SampleKey`]s
//! - [`SampleSource`]: loading numeric columns ([`CsvColumnSource`], [`InMemorySource`])
//! - [`TemplatePipeline`]: the interference, significance and 2-D batches
//! - [`TemplateStore`] / [`StoreWriter`]: the keyed output store
//! - [`unroll_store`]: 2-D store to unrolled 1-D store
//! - [`DatacardRunner`]: hand-off to the external datacard scripts
//!
//! [`SampleKey`]: template_interference::SampleKey

pub mod config;
pub mod datacard;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod source;
pub mod store;

pub use config::{
    BinningConfig, BinningMode, DatacardConfig, DiscriminantConfig, SignalRegionConfig,
    TemplateConfig, UnrollConfig,
};
pub use datacard::{DatacardPaths, DatacardRunner};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestEntry};
pub use pipeline::{
    unroll_store, BackgroundSpec, BatchReport, InterferenceReport, SignalSpec, TemplatePipeline,
    ALT_KEY, BACKGROUND_KEY, SM_KEY,
};
pub use source::{CsvColumnSource, InMemorySource, SampleSource};
pub use store::{NamedRecord, Record, StoreWriter, TemplateStore};
