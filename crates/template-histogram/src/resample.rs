//! Signal-region oversampled binning
//!
//! The overall range is cut into three contiguous segments:
//!
//! ```text
//! [overall_low, signal_low)  [signal_low, signal_high]  (signal_high, overall_high]
//!         n_low bins               n_region bins               n_high bins
//! ```
//!
//! The side segments share the bins left over from the signal region in
//! proportion to their widths. Rounding leftovers go to the signal region so
//! the total bin count is always exactly what the caller asked for.
//!
//! Unlike area normalization, the combined histogram is renormalized by its
//! plain signed sum rather than its absolute sum.

use crate::sample::Sample;
use crate::types::{BinEdges, Histogram1D, Histogram2D};
use template_core::{Error, Result};
use tracing::debug;

/// The finely binned sub-interval of the overall range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRegion {
    low: f64,
    high: f64,
}

impl SignalRegion {
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(Error::invalid_range(low, high, "signal region"));
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether the region lies inside `range` (touching the ends is allowed)
    pub fn is_within(&self, range: (f64, f64)) -> bool {
        range.0 <= self.low && self.high <= range.1
    }
}

/// Bin counts per segment after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinAllocation {
    pub low: usize,
    pub region: usize,
    pub high: usize,
}

impl BinAllocation {
    /// Share `n_total - n_region` bins between the side segments by width
    ///
    /// `prefactor = floor((n_total - n_region) / (w_low + w_high))`, each side
    /// gets `floor(width * prefactor)`, and whatever rounding leaves over is
    /// added to the signal region.
    pub fn compute(
        n_region: usize,
        n_total: usize,
        overall: (f64, f64),
        region: SignalRegion,
    ) -> Result<Self> {
        if n_total == 0 {
            return Err(Error::InvalidArgument(
                "total number of bins must be positive".to_string(),
            ));
        }
        if n_region == 0 {
            return Err(Error::InvalidArgument(
                "signal region needs at least one bin".to_string(),
            ));
        }
        if n_region > n_total {
            return Err(Error::InvalidArgument(format!(
                "signal region bins ({n_region}) exceed total bins ({n_total})"
            )));
        }

        let width_low = region.low - overall.0;
        let width_high = overall.1 - region.high;
        let side_width = width_low + width_high;

        let (low, high) = if side_width > 0.0 {
            let prefactor = ((n_total - n_region) as f64 / side_width).floor();
            (
                (width_low * prefactor).floor() as usize,
                (width_high * prefactor).floor() as usize,
            )
        } else {
            (0, 0)
        };

        let mut region_bins = n_region;
        if region_bins + low + high != n_total {
            region_bins += n_total - n_region - low - high;
        }

        Ok(Self {
            low,
            region: region_bins,
            high,
        })
    }

    pub fn total(&self) -> usize {
        self.low + self.region + self.high
    }
}

/// How a segment treats values sitting exactly on its outer edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interval {
    ClosedOpen,
    Closed,
    OpenClosed,
}

#[derive(Debug, Clone)]
struct Segment {
    edges: BinEdges,
    interval: Interval,
    offset: usize,
}

impl Segment {
    fn bin_of(&self, value: f64) -> Option<usize> {
        let bin = self.edges.find_bin(value)?;
        let excluded = match self.interval {
            Interval::ClosedOpen => value == self.edges.high(),
            Interval::Closed => false,
            Interval::OpenClosed => value == self.edges.low(),
        };
        (!excluded).then_some(self.offset + bin)
    }
}

/// Resolved three-segment binning, computed once and reused for a batch
#[derive(Debug, Clone)]
pub struct SignalRegionLayout {
    overall: (f64, f64),
    region: SignalRegion,
    allocation: BinAllocation,
    segments: Vec<Segment>,
    edges: BinEdges,
}

impl SignalRegionLayout {
    /// Lay out `n_total` bins over `overall` with about `n_region` of them in `region`
    ///
    /// Fails if no signal region is configured or it is not inside `overall`.
    pub fn new(
        n_region: usize,
        n_total: usize,
        overall: (f64, f64),
        region: Option<SignalRegion>,
    ) -> Result<Self> {
        let region = region.ok_or_else(|| {
            Error::InvalidArgument("signal region is not set".to_string())
        })?;
        if !(overall.0.is_finite() && overall.1.is_finite() && overall.0 < overall.1) {
            return Err(Error::invalid_range(overall.0, overall.1, "overall"));
        }
        if !region.is_within(overall) {
            return Err(Error::InvalidArgument(format!(
                "signal region ({}, {}) is outside the overall range ({}, {})",
                region.low, region.high, overall.0, overall.1
            )));
        }

        let allocation = BinAllocation::compute(n_region, n_total, overall, region)?;
        if allocation.region != n_region {
            debug!(
                requested = n_region,
                assigned = allocation.region,
                "signal region absorbed rounding remainder"
            );
        }

        let pieces = [
            (allocation.low, (overall.0, region.low), Interval::ClosedOpen),
            (allocation.region, (region.low, region.high), Interval::Closed),
            (allocation.high, (region.high, overall.1), Interval::OpenClosed),
        ];

        let mut segments = Vec::with_capacity(3);
        let mut combined: Vec<f64> = Vec::with_capacity(n_total + 1);
        let mut offset = 0;
        for (num_bins, range, interval) in pieces {
            // Segments without bins contribute nothing
            if num_bins == 0 {
                continue;
            }
            let edges = BinEdges::uniform(num_bins, range)?;
            let skip = usize::from(combined.last() == Some(&edges.low()));
            combined.extend_from_slice(&edges.as_slice()[skip..]);
            segments.push(Segment {
                edges,
                interval,
                offset,
            });
            offset += num_bins;
        }

        Ok(Self {
            overall,
            region,
            allocation,
            segments,
            edges: BinEdges::new(combined)?,
        })
    }

    pub fn overall(&self) -> (f64, f64) {
        self.overall
    }

    pub fn region(&self) -> SignalRegion {
        self.region
    }

    pub fn allocation(&self) -> BinAllocation {
        self.allocation
    }

    /// Combined edges of all segments
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    fn bin_of(&self, value: f64) -> Option<usize> {
        self.segments.iter().find_map(|s| s.bin_of(value))
    }

    /// Raw combined counts, before renormalization
    pub fn histogram(&self, values: &[f64]) -> Result<Histogram1D> {
        let mut counts = vec![0.0; self.edges.num_bins()];
        for &value in values {
            if let Some(bin) = self.bin_of(value) {
                counts[bin] += 1.0;
            }
        }
        Histogram1D::new(counts, self.edges.clone())
    }

    /// Combined histogram renormalized so its plain sum is `target_area`
    pub fn resample(&self, values: &[f64], target_area: f64) -> Result<Histogram1D> {
        self.histogram(values)?.rescaled_to_sum(target_area)
    }

    /// Raw 2-D counts: oversampled first axis, fixed `y_edges` on the second
    pub fn histogram_2d(&self, x: &[f64], y: &[f64], y_edges: &BinEdges) -> Result<Histogram2D> {
        if x.len() != y.len() {
            return Err(Error::size_mismatch(x.len(), y.len(), "paired 2-D samples"));
        }
        let ny = y_edges.num_bins();
        let mut counts = vec![0.0; self.edges.num_bins() * ny];
        for (&xv, &yv) in x.iter().zip(y) {
            if let (Some(ix), Some(iy)) = (self.bin_of(xv), y_edges.find_bin(yv)) {
                counts[ix * ny + iy] += 1.0;
            }
        }
        Histogram2D::new(counts, self.edges.clone(), y_edges.clone())
    }

    /// 2-D histogram renormalized so its plain sum is `target_area`
    pub fn resample_2d(
        &self,
        x: &[f64],
        y: &[f64],
        y_edges: &BinEdges,
        target_area: f64,
    ) -> Result<Histogram2D> {
        self.histogram_2d(x, y, y_edges)?.rescaled_to_sum(target_area)
    }

    /// Resample every sample of a batch at its own target area
    pub fn resample_batch(&self, samples: &[Sample]) -> Result<Vec<Histogram1D>> {
        samples
            .iter()
            .map(|s| self.resample(s.values(), s.target_area()))
            .collect()
    }

    /// 2-D batch; every sample must carry discriminant values
    pub fn resample_batch_2d(
        &self,
        samples: &[Sample],
        y_edges: &BinEdges,
    ) -> Result<Vec<Histogram2D>> {
        let discriminants = samples
            .iter()
            .map(Sample::require_discriminant)
            .collect::<Result<Vec<_>>>()?;

        samples
            .iter()
            .zip(discriminants)
            .map(|(s, d)| self.resample_2d(s.values(), d, y_edges, s.target_area()))
            .collect()
    }
}

/// One-shot signal-region resampling of a single sample
pub fn resample(
    sample: &[f64],
    target_area: f64,
    n_bins_region: usize,
    n_bins_total: usize,
    overall_range: (f64, f64),
    signal_region: Option<SignalRegion>,
) -> Result<Histogram1D> {
    SignalRegionLayout::new(n_bins_region, n_bins_total, overall_range, signal_region)?
        .resample(sample, target_area)
}

/// One-shot 2-D resampling; the second axis gets `n_bins_y` uniform bins over `y_range`
#[allow(clippy::too_many_arguments)]
pub fn resample_2d(
    sample: &[f64],
    discriminant: Option<&[f64]>,
    target_area: f64,
    n_bins_region: usize,
    n_bins_total: usize,
    overall_range: (f64, f64),
    signal_region: Option<SignalRegion>,
    (n_bins_y, y_range): (usize, (f64, f64)),
) -> Result<Histogram2D> {
    let discriminant = discriminant.ok_or_else(|| {
        Error::InvalidArgument("2-D resampling needs discriminant values".to_string())
    })?;
    let layout = SignalRegionLayout::new(n_bins_region, n_bins_total, overall_range, signal_region)?;
    let y_edges = BinEdges::uniform(n_bins_y, y_range)?;
    layout.resample_2d(sample, discriminant, &y_edges, target_area)
}
