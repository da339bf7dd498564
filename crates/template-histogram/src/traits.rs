//! Core traits for histogram building

use crate::types::{BinEdges, Histogram1D};
use template_core::Result;

/// Trait for binning raw sample data into a histogram
pub trait HistogramBuilder {
    /// Bin a sample into raw (unscaled) counts
    fn build(&self, sample: &[f64]) -> Result<Histogram1D>;

    /// The edges every histogram from this builder will have, if fixed up front
    fn edges(&self) -> Option<&BinEdges> {
        None
    }

    /// Get the target number of bins (if known)
    fn target_bins(&self) -> Option<usize> {
        self.edges().map(BinEdges::num_bins)
    }
}
