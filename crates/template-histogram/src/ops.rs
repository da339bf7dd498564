//! Operations on histograms sharing the same edges

use crate::types::{Histogram1D, Histogram2D};
use template_core::{Error, Result};

/// Bin-wise arithmetic and the signed split
pub trait HistogramOps: Sized {
    /// Bin-by-bin sum; edges must match
    fn add(&self, other: &Self) -> Result<Self>;

    /// Bin-by-bin difference; edges must match
    fn subtract(&self, other: &Self) -> Result<Self>;

    /// Split into non-negative `(pos, neg)` with `pos - neg == self`
    ///
    /// `pos[i] = max(h[i], 0)` and `neg[i] = max(-h[i], 0)`, so at most one of
    /// the two is nonzero in any bin.
    fn split_signed(&self) -> (Self, Self);
}

fn combine(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

impl HistogramOps for Histogram1D {
    fn add(&self, other: &Self) -> Result<Self> {
        check_edges_1d(self, other)?;
        Histogram1D::new(combine(self.counts(), other.counts(), |a, b| a + b), self.edges().clone())
    }

    fn subtract(&self, other: &Self) -> Result<Self> {
        check_edges_1d(self, other)?;
        Histogram1D::new(combine(self.counts(), other.counts(), |a, b| a - b), self.edges().clone())
    }

    fn split_signed(&self) -> (Self, Self) {
        (self.map_counts(|c| c.max(0.0)), self.map_counts(|c| (-c).max(0.0)))
    }
}

impl HistogramOps for Histogram2D {
    fn add(&self, other: &Self) -> Result<Self> {
        check_edges_2d(self, other)?;
        let theirs = other.counts();
        let ny = self.ny();
        Ok(self.map_bins(|x, y, c| c + theirs[x * ny + y]))
    }

    fn subtract(&self, other: &Self) -> Result<Self> {
        check_edges_2d(self, other)?;
        let theirs = other.counts();
        let ny = self.ny();
        Ok(self.map_bins(|x, y, c| c - theirs[x * ny + y]))
    }

    fn split_signed(&self) -> (Self, Self) {
        (self.map_bins(|_, _, c| c.max(0.0)), self.map_bins(|_, _, c| (-c).max(0.0)))
    }
}

fn check_edges_1d(a: &Histogram1D, b: &Histogram1D) -> Result<()> {
    if a.edges() != b.edges() {
        return Err(Error::InvalidArgument(
            "histograms must share bin edges".to_string(),
        ));
    }
    Ok(())
}

fn check_edges_2d(a: &Histogram2D, b: &Histogram2D) -> Result<()> {
    if a.x_edges() != b.x_edges() || a.y_edges() != b.y_edges() {
        return Err(Error::InvalidArgument(
            "2-D histograms must share bin edges".to_string(),
        ));
    }
    Ok(())
}

/// Sum a non-empty sequence of histograms that share edges
pub fn sum_all<'a, H, I>(histograms: I) -> Result<H>
where
    H: HistogramOps + Clone + 'a,
    I: IntoIterator<Item = &'a H>,
{
    let mut iter = histograms.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| Error::InvalidArgument("nothing to sum".to_string()))?;
    iter.try_fold(first.clone(), |acc, h| acc.add(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinEdges;
    use proptest::prelude::*;

    fn hist(counts: Vec<f64>) -> Histogram1D {
        let edges = BinEdges::uniform(counts.len(), (0.0, 1.0)).unwrap();
        Histogram1D::new(counts, edges).unwrap()
    }

    #[test]
    fn test_add_and_subtract() {
        let a = hist(vec![1.0, 2.0, 3.0]);
        let b = hist(vec![0.5, 2.5, -1.0]);
        assert_eq!(a.add(&b).unwrap().counts(), &[1.5, 4.5, 2.0]);
        assert_eq!(a.subtract(&b).unwrap().counts(), &[0.5, -0.5, 4.0]);
    }

    #[test]
    fn test_mismatched_edges_rejected() {
        let a = hist(vec![1.0, 2.0]);
        let b = hist(vec![1.0, 2.0, 3.0]);
        assert!(a.add(&b).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_split_signed() {
        let (pos, neg) = hist(vec![2.0, -3.0, 0.0]).split_signed();
        assert_eq!(pos.counts(), &[2.0, 0.0, 0.0]);
        assert_eq!(neg.counts(), &[0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_sum_all() {
        let parts = [hist(vec![1.0, 0.0]), hist(vec![0.0, 2.0]), hist(vec![1.0, 1.0])];
        assert_eq!(sum_all(&parts).unwrap().counts(), &[2.0, 3.0]);
        assert!(sum_all::<Histogram1D, _>(&[]).is_err());
    }

    #[test]
    fn test_split_signed_2d() {
        let x = BinEdges::uniform(2, (0.0, 1.0)).unwrap();
        let y = BinEdges::uniform(1, (0.0, 1.0)).unwrap();
        let h = Histogram2D::new(vec![-1.0, 4.0], x, y).unwrap();
        let (pos, neg) = h.split_signed();
        assert_eq!(pos.counts(), &[0.0, 4.0]);
        assert_eq!(neg.counts(), &[1.0, 0.0]);
        assert_eq!(pos.subtract(&neg).unwrap(), h);
    }

    proptest! {
        #[test]
        fn prop_split_recombines(counts in prop::collection::vec(-100.0..100.0f64, 1..40)) {
            let h = hist(counts.clone());
            let (pos, neg) = h.split_signed();
            for i in 0..counts.len() {
                prop_assert_eq!(pos.counts()[i] - neg.counts()[i], counts[i]);
                prop_assert_eq!(pos.counts()[i].min(neg.counts()[i]), 0.0);
                prop_assert!(pos.counts()[i] >= 0.0 && neg.counts()[i] >= 0.0);
            }
        }
    }
}
