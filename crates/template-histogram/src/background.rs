//! Background batches summed into one template

use crate::normalize::{BatchNormalizer, BatchNormalizer2D};
use crate::ops::HistogramOps;
use crate::resample::SignalRegionLayout;
use crate::sample::Sample;
use crate::types::{BinEdges, Histogram1D, Histogram2D};
use template_core::{Error, Result};

/// Named background samples, each with its own target area
#[derive(Debug, Clone)]
pub struct BackgroundSet {
    samples: Vec<Sample>,
}

/// Summed background plus the per-sample histograms that went into it
#[derive(Debug, Clone)]
pub struct CombinedBackground<H> {
    pub total: H,
    pub components: Vec<(String, H)>,
}

impl BackgroundSet {
    /// Zip parallel name/sample/area lists (and optional discriminants) into a set
    ///
    /// Every list must have the same length.
    pub fn new(
        names: Vec<String>,
        samples: Vec<Vec<f64>>,
        areas: Vec<f64>,
        discriminants: Option<Vec<Vec<f64>>>,
    ) -> Result<Self> {
        if samples.len() != names.len() {
            return Err(Error::size_mismatch(names.len(), samples.len(), "background samples"));
        }
        if areas.len() != names.len() {
            return Err(Error::size_mismatch(names.len(), areas.len(), "background areas"));
        }
        if let Some(d) = &discriminants {
            if d.len() != names.len() {
                return Err(Error::size_mismatch(
                    names.len(),
                    d.len(),
                    "background discriminants",
                ));
            }
        }
        if names.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one background is required".to_string(),
            ));
        }

        let mut discriminants = discriminants.map(Vec::into_iter);
        let samples = names
            .into_iter()
            .zip(samples)
            .zip(areas)
            .map(|((name, values), area)| {
                let sample = Sample::new(name, values, area);
                match discriminants.as_mut().and_then(Iterator::next) {
                    Some(d) => sample.with_discriminant(d),
                    None => Ok(sample),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { samples })
    }

    /// Build from already assembled samples
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidArgument(
                "at least one background is required".to_string(),
            ));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Bin every sample with `build`, optionally scale it to its area, and sum
    fn combine<H, B, S>(
        &self,
        zero: H,
        scale_to_area: bool,
        build: B,
        scale: S,
    ) -> Result<CombinedBackground<H>>
    where
        H: HistogramOps,
        B: Fn(&Sample) -> Result<H>,
        S: Fn(&H, f64) -> Result<H>,
    {
        let mut components = Vec::with_capacity(self.samples.len());
        let mut total = zero;

        for sample in &self.samples {
            let raw = build(sample)?;
            let hist = if scale_to_area {
                scale(&raw, sample.target_area()).map_err(|e| match e {
                    Error::DivisionByZero(_) => Error::empty_histogram(sample.name()),
                    other => other,
                })?
            } else {
                raw
            };
            total = total.add(&hist)?;
            components.push((sample.name().to_string(), hist));
        }

        Ok(CombinedBackground { total, components })
    }

    /// Bin every background on `edges` and sum them
    ///
    /// With `scale_to_area` each background is first normalized to its own
    /// area; otherwise raw counts are added.
    pub fn scale_and_add(
        &self,
        edges: &BinEdges,
        scale_to_area: bool,
    ) -> Result<CombinedBackground<Histogram1D>> {
        let batch = BatchNormalizer::new(edges.clone());
        self.combine(
            Histogram1D::zeros(edges.clone()),
            scale_to_area,
            |s| batch.histogram(s.values()),
            Histogram1D::scaled_to,
        )
    }

    /// 2-D counterpart of [`scale_and_add`](Self::scale_and_add); needs discriminants
    pub fn scale_and_add_2d(
        &self,
        x_edges: &BinEdges,
        y_edges: &BinEdges,
        scale_to_area: bool,
    ) -> Result<CombinedBackground<Histogram2D>> {
        let batch = BatchNormalizer2D::new(x_edges.clone(), y_edges.clone());
        self.combine(
            Histogram2D::zeros(x_edges.clone(), y_edges.clone()),
            scale_to_area,
            |s| batch.histogram(s.values(), s.require_discriminant()?),
            Histogram2D::scaled_to,
        )
    }

    /// Like [`scale_and_add`](Self::scale_and_add) but binned with a signal-region layout
    ///
    /// Backgrounds keep the absolute-area scaling; only signals are
    /// renormalized to the plain sum.
    pub fn scale_and_add_layout(
        &self,
        layout: &SignalRegionLayout,
        scale_to_area: bool,
    ) -> Result<CombinedBackground<Histogram1D>> {
        self.combine(
            Histogram1D::zeros(layout.edges().clone()),
            scale_to_area,
            |s| layout.histogram(s.values()),
            Histogram1D::scaled_to,
        )
    }

    /// 2-D signal-region variant; `y_edges` bin the discriminant
    pub fn scale_and_add_layout_2d(
        &self,
        layout: &SignalRegionLayout,
        y_edges: &BinEdges,
        scale_to_area: bool,
    ) -> Result<CombinedBackground<Histogram2D>> {
        self.combine(
            Histogram2D::zeros(layout.edges().clone(), y_edges.clone()),
            scale_to_area,
            |s| layout.histogram_2d(s.values(), s.require_discriminant()?, y_edges),
            Histogram2D::scaled_to,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mismatched_lists() {
        let err = BackgroundSet::new(
            names(&["qqzz", "ggzz"]),
            vec![vec![6.5]],
            vec![1.0, 2.0],
            None,
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = BackgroundSet::new(names(&["qqzz"]), vec![vec![6.5]], vec![], None).unwrap_err();
        assert!(err.is_invalid_argument());

        let err = BackgroundSet::new(
            names(&["qqzz"]),
            vec![vec![6.5]],
            vec![1.0],
            Some(vec![]),
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_scale_and_add() {
        let set = BackgroundSet::new(
            names(&["qqzz", "ggzz"]),
            vec![vec![6.5, 6.5, 8.5], vec![7.5]],
            vec![3.0, 2.0],
            None,
        )
        .unwrap();
        let edges = BinEdges::uniform(3, (6.0, 9.0)).unwrap();

        let combined = set.scale_and_add(&edges, true).unwrap();
        assert_eq!(combined.total.counts(), &[2.0, 2.0, 1.0]);
        assert_relative_eq!(combined.total.integral(), 5.0);
        assert_eq!(combined.components[1].0, "ggzz");

        let raw = set.scale_and_add(&edges, false).unwrap();
        assert_eq!(raw.total.counts(), &[2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_layout_sum_matches_uniform_sum() {
        // Region (7, 8) with 1 of 3 bins lays out the same edges as 3 uniform bins
        let layout = SignalRegionLayout::new(
            1,
            3,
            (6.0, 9.0),
            Some(crate::resample::SignalRegion::new(7.0, 8.0).unwrap()),
        )
        .unwrap();
        let set = BackgroundSet::new(
            names(&["qqzz", "ggzz"]),
            vec![vec![6.5, 6.5, 8.5], vec![7.5]],
            vec![3.0, 2.0],
            None,
        )
        .unwrap();

        let combined = set.scale_and_add_layout(&layout, true).unwrap();
        assert_eq!(combined.total.counts(), &[2.0, 2.0, 1.0]);
        assert_eq!(combined.components.len(), 2);

        let empty = BackgroundSet::new(names(&["zz"]), vec![vec![5.0]], vec![1.0], None).unwrap();
        let err = empty.scale_and_add_layout(&layout, true).unwrap_err();
        assert!(err.to_string().contains("zz"));
    }

    #[test]
    fn test_layout_sum_2d() {
        let layout = SignalRegionLayout::new(
            1,
            2,
            (6.0, 8.0),
            Some(crate::resample::SignalRegion::new(7.0, 8.0).unwrap()),
        )
        .unwrap();
        let y = BinEdges::uniform(2, (0.0, 1.0)).unwrap();
        let set = BackgroundSet::new(
            names(&["qqzz"]),
            vec![vec![6.5, 7.5]],
            vec![4.0],
            Some(vec![vec![0.1, 0.9]]),
        )
        .unwrap();

        let combined = set.scale_and_add_layout_2d(&layout, &y, true).unwrap();
        assert_eq!(combined.total.counts(), &[2.0, 0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_scale_and_add_2d_needs_discriminants() {
        let x = BinEdges::uniform(2, (6.0, 8.0)).unwrap();
        let y = BinEdges::uniform(2, (0.0, 1.0)).unwrap();

        let without = BackgroundSet::new(names(&["qqzz"]), vec![vec![6.5]], vec![1.0], None).unwrap();
        assert!(without.scale_and_add_2d(&x, &y, true).is_err());

        let with = BackgroundSet::new(
            names(&["qqzz", "ggzz"]),
            vec![vec![6.5, 7.5], vec![7.5]],
            vec![2.0, 1.0],
            Some(vec![vec![0.1, 0.9], vec![0.9]]),
        )
        .unwrap();
        let combined = with.scale_and_add_2d(&x, &y, true).unwrap();
        assert_eq!(combined.total.counts(), &[1.0, 0.0, 0.0, 2.0]);
    }
}
