//! Core types for histogram template representation

use std::fmt;

use serde::{Deserialize, Serialize};
use template_core::{Error, Result};

/// Strictly increasing bin edges shared by every histogram of a batch
///
/// Bins are half-open `[e_i, e_{i+1})` except the last one, which also
/// includes its right edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct BinEdges(Vec<f64>);

impl BinEdges {
    /// Validate an explicit edge sequence
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::InvalidArgument(format!(
                "bin edges need at least 2 values, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::non_finite("bin edges"));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::InvalidArgument(
                "bin edges must be strictly increasing".to_string(),
            ));
        }
        Ok(Self(edges))
    }

    /// `num_bins` equal-width bins over `range`
    pub fn uniform(num_bins: usize, range: (f64, f64)) -> Result<Self> {
        let (low, high) = range;
        if num_bins == 0 {
            return Err(Error::InvalidArgument(
                "number of bins must be positive".to_string(),
            ));
        }
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::invalid_range(low, high, "histogram"));
        }

        let step = (high - low) / num_bins as f64;
        let mut edges: Vec<f64> = (0..num_bins).map(|i| low + i as f64 * step).collect();
        // Pin the last edge so the range end is represented exactly
        edges.push(high);
        Self::new(edges)
    }

    /// Number of bins (one less than the number of edges)
    pub fn num_bins(&self) -> usize {
        self.0.len() - 1
    }

    /// Lower edge of the first bin
    pub fn low(&self) -> f64 {
        self.0[0]
    }

    /// Upper edge of the last bin
    pub fn high(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// Width of bin `i`
    pub fn width(&self, i: usize) -> f64 {
        self.0[i + 1] - self.0[i]
    }

    /// Edge values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Find the bin holding `value`; out-of-range and non-finite values have none
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < self.low() || value > self.high() {
            return None;
        }
        // Last bin includes its right edge
        if value == self.high() {
            return Some(self.num_bins() - 1);
        }
        Some(self.0.partition_point(|&e| e <= value) - 1)
    }
}

impl TryFrom<Vec<f64>> for BinEdges {
    type Error = Error;

    fn try_from(edges: Vec<f64>) -> Result<Self> {
        Self::new(edges)
    }
}

impl From<BinEdges> for Vec<f64> {
    fn from(edges: BinEdges) -> Self {
        edges.0
    }
}

/// How a normalization call chooses its binning
#[derive(Debug, Clone, PartialEq)]
pub enum BinSpec {
    /// Uniform bins over the call's range
    Count(usize),
    /// Reuse existing edges verbatim; the call's range is ignored
    Edges(BinEdges),
}

impl BinSpec {
    /// Resolve to concrete edges over `range`
    pub fn resolve(&self, range: (f64, f64)) -> Result<BinEdges> {
        match self {
            Self::Count(n) => BinEdges::uniform(*n, range),
            Self::Edges(edges) => Ok(edges.clone()),
        }
    }
}

impl From<usize> for BinSpec {
    fn from(n: usize) -> Self {
        Self::Count(n)
    }
}

impl From<BinEdges> for BinSpec {
    fn from(edges: BinEdges) -> Self {
        Self::Edges(edges)
    }
}

#[derive(Deserialize)]
struct RawHistogram1D {
    counts: Vec<f64>,
    edges: BinEdges,
    #[serde(default)]
    errors: Option<Vec<f64>>,
}

/// A 1-D histogram record: signed bin counts paired with their edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram1D")]
pub struct Histogram1D {
    counts: Vec<f64>,
    edges: BinEdges,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<f64>>,
}

impl Histogram1D {
    /// Pair counts with edges; `edges` must describe exactly `counts.len()` bins
    pub fn new(counts: Vec<f64>, edges: BinEdges) -> Result<Self> {
        if edges.num_bins() != counts.len() {
            return Err(Error::size_mismatch(
                edges.num_bins(),
                counts.len(),
                "histogram counts",
            ));
        }
        Ok(Self {
            counts,
            edges,
            errors: None,
        })
    }

    /// Empty histogram over `edges`
    pub fn zeros(edges: BinEdges) -> Self {
        Self {
            counts: vec![0.0; edges.num_bins()],
            edges,
            errors: None,
        }
    }

    /// Attach per-bin error estimates
    pub fn with_errors(mut self, errors: Vec<f64>) -> Result<Self> {
        if errors.len() != self.counts.len() {
            return Err(Error::size_mismatch(
                self.counts.len(),
                errors.len(),
                "histogram errors",
            ));
        }
        self.errors = Some(errors);
        Ok(self)
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    pub fn errors(&self) -> Option<&[f64]> {
        self.errors.as_deref()
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Plain signed sum of the counts
    pub fn integral(&self) -> f64 {
        template_core::signed_sum(&self.counts)
    }

    /// Sum of absolute counts
    pub fn abs_integral(&self) -> f64 {
        template_core::abs_sum(&self.counts)
    }

    pub fn any_nonzero(&self) -> bool {
        template_core::any_nonzero(&self.counts)
    }

    /// Sign-preserving rescale to an absolute area of `target_area`
    pub fn scaled_to(&self, target_area: f64) -> Result<Self> {
        Ok(Self {
            counts: template_core::scale(&self.counts, target_area)?,
            edges: self.edges.clone(),
            errors: None,
        })
    }

    /// Rescale so the plain signed sum equals `target_area`
    pub fn rescaled_to_sum(&self, target_area: f64) -> Result<Self> {
        Ok(Self {
            counts: template_core::rescale_to_sum(&self.counts, target_area)?,
            edges: self.edges.clone(),
            errors: None,
        })
    }

    /// New histogram on the same edges with every count replaced by `f(count)`
    pub fn map_counts<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            counts: self.counts.iter().map(|&c| f(c)).collect(),
            edges: self.edges.clone(),
            errors: None,
        }
    }

    /// Decompose into `(counts, edges)`
    pub fn into_parts(self) -> (Vec<f64>, BinEdges) {
        (self.counts, self.edges)
    }
}

impl TryFrom<RawHistogram1D> for Histogram1D {
    type Error = Error;

    fn try_from(raw: RawHistogram1D) -> Result<Self> {
        let hist = Self::new(raw.counts, raw.edges)?;
        match raw.errors {
            Some(errors) => hist.with_errors(errors),
            None => Ok(hist),
        }
    }
}

impl fmt::Display for Histogram1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram1D({} bins, range=[{:.3}, {:.3}], integral={:.3})",
            self.len(),
            self.edges.low(),
            self.edges.high(),
            self.integral()
        )
    }
}

#[derive(Deserialize)]
struct RawHistogram2D {
    counts: Vec<f64>,
    x_edges: BinEdges,
    y_edges: BinEdges,
}

/// A 2-D histogram record, counts stored x-major (`counts[x * ny + y]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram2D")]
pub struct Histogram2D {
    counts: Vec<f64>,
    x_edges: BinEdges,
    y_edges: BinEdges,
}

impl Histogram2D {
    pub fn new(counts: Vec<f64>, x_edges: BinEdges, y_edges: BinEdges) -> Result<Self> {
        let expected = x_edges.num_bins() * y_edges.num_bins();
        if counts.len() != expected {
            return Err(Error::size_mismatch(expected, counts.len(), "2-D histogram counts"));
        }
        Ok(Self {
            counts,
            x_edges,
            y_edges,
        })
    }

    /// Build from per-x rows, each holding `ny` values
    pub fn from_rows(rows: &[Vec<f64>], x_edges: BinEdges, y_edges: BinEdges) -> Result<Self> {
        if rows.len() != x_edges.num_bins() {
            return Err(Error::size_mismatch(x_edges.num_bins(), rows.len(), "2-D histogram rows"));
        }
        let counts: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(counts, x_edges, y_edges)
    }

    pub fn zeros(x_edges: BinEdges, y_edges: BinEdges) -> Self {
        Self {
            counts: vec![0.0; x_edges.num_bins() * y_edges.num_bins()],
            x_edges,
            y_edges,
        }
    }

    pub fn nx(&self) -> usize {
        self.x_edges.num_bins()
    }

    pub fn ny(&self) -> usize {
        self.y_edges.num_bins()
    }

    pub fn x_edges(&self) -> &BinEdges {
        &self.x_edges
    }

    pub fn y_edges(&self) -> &BinEdges {
        &self.y_edges
    }

    /// Flat x-major counts
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// Content of bin `(x, y)`, both 0-based
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.counts[x * self.ny() + y]
    }

    pub(crate) fn counts_mut(&mut self) -> &mut [f64] {
        &mut self.counts
    }

    /// New histogram with every bin replaced by `f(x, y, content)`
    pub fn map_bins<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, usize, f64) -> f64,
    {
        let ny = self.ny();
        let counts = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| f(i / ny, i % ny, c))
            .collect();
        Self {
            counts,
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        }
    }

    pub fn integral(&self) -> f64 {
        template_core::signed_sum(&self.counts)
    }

    pub fn abs_integral(&self) -> f64 {
        template_core::abs_sum(&self.counts)
    }

    pub fn any_nonzero(&self) -> bool {
        template_core::any_nonzero(&self.counts)
    }

    /// Sign-preserving rescale to an absolute area of `target_area`
    pub fn scaled_to(&self, target_area: f64) -> Result<Self> {
        Ok(Self {
            counts: template_core::scale(&self.counts, target_area)?,
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        })
    }

    /// Rescale so the plain signed sum equals `target_area`
    pub fn rescaled_to_sum(&self, target_area: f64) -> Result<Self> {
        Ok(Self {
            counts: template_core::rescale_to_sum(&self.counts, target_area)?,
            x_edges: self.x_edges.clone(),
            y_edges: self.y_edges.clone(),
        })
    }
}

impl TryFrom<RawHistogram2D> for Histogram2D {
    type Error = Error;

    fn try_from(raw: RawHistogram2D) -> Result<Self> {
        Self::new(raw.counts, raw.x_edges, raw.y_edges)
    }
}

impl fmt::Display for Histogram2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram2D({}x{} bins, integral={:.3})",
            self.nx(),
            self.ny(),
            self.integral()
        )
    }
}
