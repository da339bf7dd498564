//! Flattening 2-D templates into 1-D positive and negative components
//!
//! Bins are visited with y as the outer loop and x as the inner loop, so the
//! unrolled index of bin `(x, y)` is `k = y * nx + x`. Every step returns a new
//! histogram; the input is never modified.

use template_core::Result;
use template_histogram::{BinEdges, Histogram1D, Histogram2D};
use tracing::debug;

use crate::naming::{classify, component_names, ComponentNames, NamingRule};

/// Fraction of the integral spread over empty background bins
pub const DEFAULT_FILL_FRACTION: f64 = 0.1;

/// Substring identifying background templates
pub const DEFAULT_BACKGROUND_MARKER: &str = "bkg";

/// `(x, y)` pairs in unrolling order
pub fn traversal(nx: usize, ny: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..ny).flat_map(move |y| (0..nx).map(move |x| (x, y)))
}

/// What a first pass over a 2-D template finds
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Empty bins in unrolling order
    pub empty: Vec<(usize, usize)>,
    pub has_negative: bool,
}

pub fn scan(hist: &Histogram2D) -> Scan {
    let mut empty = Vec::new();
    let mut has_negative = false;
    for (x, y) in traversal(hist.nx(), hist.ny()) {
        let content = hist.get(x, y);
        if content == 0.0 {
            empty.push((x, y));
        }
        if content < 0.0 {
            has_negative = true;
        }
    }
    Scan {
        empty,
        has_negative,
    }
}

/// Replace empty bins with `fraction * integral / (nx * ny)`
///
/// The integral is taken once from `hist`, so every empty bin gets the same
/// floor value.
pub fn fill_empty(hist: &Histogram2D, fraction: f64) -> Histogram2D {
    let floor = fraction * hist.integral() / (hist.nx() * hist.ny()) as f64;
    hist.map_bins(|_, _, c| if c == 0.0 { floor } else { c })
}

/// Set every negative bin to zero
pub fn clamp_negative(hist: &Histogram2D) -> Histogram2D {
    hist.map_bins(|x, y, c| {
        if c < 0.0 {
            debug!("Clamping negative bin ({}, {}) = {}", x, y, c);
            0.0
        } else {
            c
        }
    })
}

fn unit_edges(n: usize) -> Result<BinEdges> {
    BinEdges::new((0..=n).map(|k| k as f64).collect())
}

/// Unrolled `(pos, neg)` records on unit-width edges `0..nx*ny`
///
/// Negative content goes to `neg` as its magnitude, everything else to `pos`.
/// Each record carries `sqrt(content)` as its per-bin error.
pub fn flatten(hist: &Histogram2D) -> Result<(Histogram1D, Histogram1D)> {
    let n = hist.nx() * hist.ny();
    let mut pos = vec![0.0; n];
    let mut neg = vec![0.0; n];

    for (k, (x, y)) in traversal(hist.nx(), hist.ny()).enumerate() {
        let content = hist.get(x, y);
        if content < 0.0 {
            neg[k] += -content;
        } else {
            pos[k] += content;
        }
    }

    let pos_err = pos.iter().map(|c| c.sqrt()).collect();
    let neg_err = neg.iter().map(|c| c.sqrt()).collect();
    let edges = unit_edges(n)?;
    Ok((
        Histogram1D::new(pos, edges.clone())?.with_errors(pos_err)?,
        Histogram1D::new(neg, edges)?.with_errors(neg_err)?,
    ))
}

/// Result of unrolling one named 2-D template
#[derive(Debug, Clone)]
pub struct UnrollOutcome {
    pub names: ComponentNames,
    pub rule: NamingRule,
    pub positive: Histogram1D,
    pub negative: Histogram1D,
    /// The 2-D source after filling (and clamping, under [`NamingRule::KeepAndClamp`])
    pub source: Histogram2D,
    pub has_negative: bool,
}

impl UnrollOutcome {
    /// Components with positive integral, positive first
    pub fn written(&self) -> Vec<(String, Histogram1D)> {
        let mut out = Vec::with_capacity(2);
        for (name, hist, label) in [
            (&self.names.positive, &self.positive, "positive"),
            (&self.names.negative, &self.negative, "negative"),
        ] {
            if hist.integral() > 0.0 {
                out.push((name.clone(), hist.clone()));
            } else {
                debug!("Dropping empty {} component of {}", label, name);
            }
        }
        out
    }
}

/// Unrolls templates, padding empty background bins
#[derive(Debug, Clone)]
pub struct Unroller {
    fill_fraction: f64,
    background_marker: String,
}

impl Default for Unroller {
    fn default() -> Self {
        Self {
            fill_fraction: DEFAULT_FILL_FRACTION,
            background_marker: DEFAULT_BACKGROUND_MARKER.to_string(),
        }
    }
}

impl Unroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_fraction(mut self, fraction: f64) -> Self {
        self.fill_fraction = fraction;
        self
    }

    pub fn with_background_marker(mut self, marker: impl Into<String>) -> Self {
        self.background_marker = marker.into();
        self
    }

    pub fn is_background(&self, name: &str) -> bool {
        name.contains(self.background_marker.as_str())
    }

    /// Unroll the 2-D template `hist` stored under `name`
    ///
    /// When the naming rule clamps, the clamped source is refilled from its
    /// own integral, which already includes the first-pass floor values. The
    /// unrolled components are taken before the clamp.
    pub fn unroll(&self, name: &str, hist: &Histogram2D) -> Result<UnrollOutcome> {
        let background = self.is_background(name);
        let first = scan(hist);

        let filled = if background && !first.empty.is_empty() {
            debug!("{}: filling {} empty bins", name, first.empty.len());
            fill_empty(hist, self.fill_fraction)
        } else {
            hist.clone()
        };

        let (positive, negative) = flatten(&filled)?;
        let rule = classify(name, first.has_negative);

        let source = if rule == NamingRule::KeepAndClamp {
            let clamped = clamp_negative(&filled);
            if background {
                fill_empty(&clamped, self.fill_fraction)
            } else {
                clamped
            }
        } else {
            filled
        };

        Ok(UnrollOutcome {
            names: component_names(name, rule),
            rule,
            positive,
            negative,
            source,
            has_negative: first.has_negative,
        })
    }
}
