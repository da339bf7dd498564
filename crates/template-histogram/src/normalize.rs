//! Area normalization of raw samples
//!
//! A template is a histogram whose absolute area equals a requested value.
//! Normalization bins the raw observations and then applies the
//! sign-preserving scaler from `template-core`.
//!
//! Batches that must stay summable fix their edges once and normalize every
//! sample against them:
//!
//! ```rust
//! use template_histogram::{BatchNormalizer, BinEdges, Sample};
//!
//! let edges = BinEdges::uniform(3, (6.0, 9.0)).unwrap();
//! let batch = BatchNormalizer::new(edges);
//!
//! let a = batch.normalize(&Sample::new("a", vec![6.1, 7.5, 7.6], 3.0)).unwrap();
//! let b = batch.normalize(&Sample::new("b", vec![8.2], 1.0)).unwrap();
//! assert_eq!(a.edges(), b.edges());
//! assert_eq!(a.counts(), &[1.0, 2.0, 0.0]);
//! assert_eq!(b.counts(), &[0.0, 0.0, 1.0]);
//! ```

use crate::builders::{fill_counts, GridBuilder};
use crate::sample::Sample;
use crate::types::{BinEdges, BinSpec, Histogram1D, Histogram2D};
use template_core::{Error, Result};

/// Binning of one axis: a bin spec plus the range uniform bins span
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub bins: BinSpec,
    pub range: (f64, f64),
}

impl AxisSpec {
    pub fn new(bins: impl Into<BinSpec>, range: (f64, f64)) -> Self {
        Self {
            bins: bins.into(),
            range,
        }
    }

    pub fn resolve(&self) -> Result<BinEdges> {
        self.bins.resolve(self.range)
    }
}

/// Bin `sample` with `bins` over `range` and scale to `target_area`
///
/// `BinSpec::Edges` reuses the edges verbatim and ignores `range`.
pub fn normalize(
    sample: &[f64],
    target_area: f64,
    bins: &BinSpec,
    range: (f64, f64),
) -> Result<Histogram1D> {
    let edges = bins.resolve(range)?;
    Histogram1D::new(fill_counts(sample, &edges), edges)?.scaled_to(target_area)
}

/// 2-D variant of [`normalize`]
///
/// Both the second sample and the second axis are required; a missing one is
/// an invalid argument.
pub fn normalize_2d(
    x: &[f64],
    y: Option<&[f64]>,
    target_area: f64,
    x_axis: &AxisSpec,
    y_axis: Option<&AxisSpec>,
) -> Result<Histogram2D> {
    let y = y.ok_or_else(|| {
        Error::InvalidArgument("2-D normalization needs a second sample".to_string())
    })?;
    let y_axis = y_axis.ok_or_else(|| {
        Error::InvalidArgument("2-D normalization needs a range for the second axis".to_string())
    })?;

    let builder = GridBuilder::new(x_axis.resolve()?, y_axis.resolve()?);
    builder.build(x, y)?.scaled_to(target_area)
}

/// Normalizes every sample of a batch against edges chosen once
#[derive(Debug, Clone)]
pub struct BatchNormalizer {
    edges: BinEdges,
}

impl BatchNormalizer {
    pub fn new(edges: BinEdges) -> Self {
        Self { edges }
    }

    /// Choose uniform edges for the batch
    pub fn uniform(num_bins: usize, range: (f64, f64)) -> Result<Self> {
        Ok(Self::new(BinEdges::uniform(num_bins, range)?))
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// Raw counts of `values` on the batch edges
    pub fn histogram(&self, values: &[f64]) -> Result<Histogram1D> {
        Histogram1D::new(fill_counts(values, &self.edges), self.edges.clone())
    }

    /// Raw counts scaled to an absolute area of `area`
    pub fn normalize_values(&self, values: &[f64], area: f64) -> Result<Histogram1D> {
        self.histogram(values)?.scaled_to(area)
    }

    /// Template for `sample` at its own target area
    pub fn normalize(&self, sample: &Sample) -> Result<Histogram1D> {
        self.normalize_values(sample.values(), sample.target_area())
            .map_err(|e| match e {
                Error::DivisionByZero(_) => Error::empty_histogram(sample.name()),
                other => other,
            })
    }
}

/// 2-D counterpart of [`BatchNormalizer`]
#[derive(Debug, Clone)]
pub struct BatchNormalizer2D {
    grid: GridBuilder,
}

impl BatchNormalizer2D {
    pub fn new(x_edges: BinEdges, y_edges: BinEdges) -> Self {
        Self {
            grid: GridBuilder::new(x_edges, y_edges),
        }
    }

    pub fn x_edges(&self) -> &BinEdges {
        self.grid.x_edges()
    }

    pub fn y_edges(&self) -> &BinEdges {
        self.grid.y_edges()
    }

    pub fn histogram(&self, x: &[f64], y: &[f64]) -> Result<Histogram2D> {
        self.grid.build(x, y)
    }

    /// Template for `sample` (values against discriminant) at its target area
    pub fn normalize(&self, sample: &Sample) -> Result<Histogram2D> {
        let discriminant = sample.require_discriminant()?;
        self.grid
            .build(sample.values(), discriminant)?
            .scaled_to(sample.target_area())
            .map_err(|e| match e {
                Error::DivisionByZero(_) => Error::empty_histogram(sample.name()),
                other => other,
            })
    }
}
