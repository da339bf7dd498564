//! Signed histogram templates for resonance interference fits
//!
//! Re-exports the workspace crates:
//!
//! - [`common`]: error type and the signed-area scaler
//! - [`histogram`]: binning, normalization and background sums
//! - [`interference`]: pure / interference decomposition of resonance samples
//! - [`unroll`]: 2-D to 1-D unrolling with signed-component naming
//! - [`pipeline`]: configuration, manifests, stores and batch drivers
//!
//! ```
//! use signed_templates::prelude::*;
//!
//! let hist = Histogram1D::new(vec![2.0, -2.0], BinEdges::uniform(2, (6.0, 9.0))?)?;
//! let (pos, neg) = hist.split_signed();
//! assert_eq!(pos.counts(), &[2.0, 0.0]);
//! assert_eq!(neg.counts(), &[0.0, 2.0]);
//! # Ok::<(), signed_templates::common::Error>(())
//! ```

pub use template_core as common;
pub use template_histogram as histogram;
pub use template_interference as interference;
pub use template_pipeline as pipeline;
pub use template_unroll as unroll;

/// The types most batches need
pub mod prelude {
    pub use template_histogram::{
        BackgroundSet, BatchNormalizer, BatchNormalizer2D, BinEdges, Histogram1D, Histogram2D,
        HistogramOps, Sample, SignalRegion, SignalRegionLayout,
    };
    pub use template_interference::{
        Decomposer, InterferenceInputs, InterferencePair, MixedInput, Phase, PureInput, Resonance,
        SampleKey,
    };
    pub use template_pipeline::{
        BackgroundSpec, CsvColumnSource, Manifest, SignalSpec, StoreWriter, TemplateConfig,
        TemplatePipeline, TemplateStore,
    };
    pub use template_unroll::{NamingRule, Unroller};
}
