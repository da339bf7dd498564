//! Histogram building strategies over fixed edges

use crate::traits::HistogramBuilder;
use crate::types::{BinEdges, Histogram1D, Histogram2D};
use template_core::{Error, Result};

/// Count how many values land in each bin of `edges`
///
/// Values outside the edges, and NaN, are dropped.
pub fn fill_counts(sample: &[f64], edges: &BinEdges) -> Vec<f64> {
    let mut counts = vec![0.0; edges.num_bins()];
    for &value in sample {
        if let Some(bin) = edges.find_bin(value) {
            counts[bin] += 1.0;
        }
    }
    counts
}

/// Fixed-width histogram builder
///
/// Creates a histogram with a specified number of equal-width bins over a
/// fixed range, independent of where the data falls.
#[derive(Debug, Clone)]
pub struct FixedWidthBuilder {
    edges: BinEdges,
}

impl FixedWidthBuilder {
    /// Create a new fixed-width histogram builder
    pub fn new(num_bins: usize, range: (f64, f64)) -> Result<Self> {
        Ok(Self {
            edges: BinEdges::uniform(num_bins, range)?,
        })
    }
}

impl HistogramBuilder for FixedWidthBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram1D> {
        Histogram1D::new(fill_counts(sample, &self.edges), self.edges.clone())
    }

    fn edges(&self) -> Option<&BinEdges> {
        Some(&self.edges)
    }
}

/// Builder over arbitrary, caller-chosen edges
#[derive(Debug, Clone)]
pub struct VariableWidthBuilder {
    edges: BinEdges,
}

impl VariableWidthBuilder {
    pub fn new(edges: BinEdges) -> Self {
        Self { edges }
    }
}

impl HistogramBuilder for VariableWidthBuilder {
    fn build(&self, sample: &[f64]) -> Result<Histogram1D> {
        Histogram1D::new(fill_counts(sample, &self.edges), self.edges.clone())
    }

    fn edges(&self) -> Option<&BinEdges> {
        Some(&self.edges)
    }
}

/// Builder for paired `(x, y)` observations on a fixed grid
#[derive(Debug, Clone)]
pub struct GridBuilder {
    x_edges: BinEdges,
    y_edges: BinEdges,
}

impl GridBuilder {
    pub fn new(x_edges: BinEdges, y_edges: BinEdges) -> Self {
        Self { x_edges, y_edges }
    }

    pub fn x_edges(&self) -> &BinEdges {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &BinEdges {
        &self.y_edges
    }

    /// Bin paired observations; an entry is kept only if both coordinates fall in range
    pub fn build(&self, x: &[f64], y: &[f64]) -> Result<Histogram2D> {
        if x.len() != y.len() {
            return Err(Error::size_mismatch(x.len(), y.len(), "paired 2-D samples"));
        }

        let mut hist = Histogram2D::zeros(self.x_edges.clone(), self.y_edges.clone());
        let ny = self.y_edges.num_bins();
        let counts = hist.counts_mut();
        for (&xv, &yv) in x.iter().zip(y) {
            if let (Some(ix), Some(iy)) = (self.x_edges.find_bin(xv), self.y_edges.find_bin(yv)) {
                counts[ix * ny + iy] += 1.0;
            }
        }
        Ok(hist)
    }
}
