//! Decomposition of mixed samples into signed interference templates
//!
//! Every sample is first weighted to its cross section. The interference of
//! a pair is what remains of the mixed histogram after both contributing pure
//! histograms are subtracted, rescaled to the geometric mean of the two pure
//! target areas and split into non-negative `pos`/`neg` parts.

use std::collections::BTreeMap;

use template_core::{Error, Result};
use template_histogram::{BatchNormalizer, BinEdges, Histogram1D, HistogramOps};
use tracing::{debug, instrument};

use crate::hypothesis::{InterferencePair, Resonance};

/// Record name prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "ggH_0PM";

/// A pure-hypothesis sample with its weighting and requested area
#[derive(Debug, Clone)]
pub struct PureInput {
    pub values: Vec<f64>,
    pub cross_section: f64,
    pub area: f64,
}

impl PureInput {
    pub fn new(values: Vec<f64>, cross_section: f64, area: f64) -> Self {
        Self {
            values,
            cross_section,
            area,
        }
    }
}

/// A mixed sample of two resonances
#[derive(Debug, Clone)]
pub struct MixedInput {
    pub values: Vec<f64>,
    pub cross_section: f64,
}

impl MixedInput {
    pub fn new(values: Vec<f64>, cross_section: f64) -> Self {
        Self {
            values,
            cross_section,
        }
    }
}

/// Keyed inputs of one interference batch
#[derive(Debug, Clone, Default)]
pub struct InterferenceInputs {
    pures: BTreeMap<Resonance, PureInput>,
    mixed: BTreeMap<InterferencePair, MixedInput>,
}

impl InterferenceInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pure(mut self, resonance: Resonance, input: PureInput) -> Self {
        self.insert_pure(resonance, input);
        self
    }

    pub fn with_mixed(mut self, pair: InterferencePair, input: MixedInput) -> Self {
        self.insert_mixed(pair, input);
        self
    }

    /// Add or replace a pure sample
    pub fn insert_pure(&mut self, resonance: Resonance, input: PureInput) -> Option<PureInput> {
        self.pures.insert(resonance, input)
    }

    /// Add or replace a mixed sample
    pub fn insert_mixed(&mut self, pair: InterferencePair, input: MixedInput) -> Option<MixedInput> {
        self.mixed.insert(pair, input)
    }

    pub fn pure(&self, resonance: Resonance) -> Option<&PureInput> {
        self.pures.get(&resonance)
    }

    pub fn mixed(&self, pair: &InterferencePair) -> Option<&MixedInput> {
        self.mixed.get(pair)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &InterferencePair> {
        self.mixed.keys()
    }

    /// Every pair must have both of its pure samples
    pub fn validate(&self) -> Result<()> {
        for pair in self.mixed.keys() {
            for resonance in [pair.first(), pair.second()] {
                if !self.pures.contains_key(&resonance) {
                    return Err(Error::InvalidArgument(format!(
                        "interference {} needs pure sample {}",
                        pair.id(),
                        resonance.id()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Templates produced for one batch
#[derive(Debug, Clone)]
pub struct Decomposition {
    edges: BinEdges,
    pures: BTreeMap<Resonance, Histogram1D>,
    interference: BTreeMap<InterferencePair, Histogram1D>,
    records: Vec<(String, Histogram1D)>,
}

impl Decomposition {
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// Area-scaled pure template; absent when the sample had no content
    pub fn pure(&self, resonance: Resonance) -> Option<&Histogram1D> {
        self.pures.get(&resonance)
    }

    pub fn pures(&self) -> impl Iterator<Item = (&Resonance, &Histogram1D)> {
        self.pures.iter()
    }

    /// Signed interference before the split (all zero if nothing remained)
    pub fn interference(&self, pair: &InterferencePair) -> Option<&Histogram1D> {
        self.interference.get(pair)
    }

    /// Named output records in write order
    pub fn records(&self) -> &[(String, Histogram1D)] {
        &self.records
    }

    pub fn into_records(self) -> Vec<(String, Histogram1D)> {
        self.records
    }
}

/// Residual bins within this many epsilons of their inputs' magnitude count as zero
const CANCELLATION_EPSILONS: f64 = 64.0;

/// Zero residual bins that are only rounding left over from the subtraction
///
/// A bin is cleared when `|r| <= k * eps * (|mixed| + |pure_a| + |pure_b|)`.
fn cancel_rounding(residual: &Histogram1D, inputs: [&Histogram1D; 3]) -> Result<Histogram1D> {
    let [mixed, a, b] = inputs;
    let counts = residual
        .counts()
        .iter()
        .zip(mixed.counts())
        .zip(a.counts().iter().zip(b.counts()))
        .map(|((&r, &m), (&pa, &pb))| {
            let magnitude = m.abs() + pa.abs() + pb.abs();
            if r.abs() <= CANCELLATION_EPSILONS * f64::EPSILON * magnitude {
                0.0
            } else {
                r
            }
        })
        .collect();
    Histogram1D::new(counts, residual.edges().clone())
}

/// Builds pure and interference templates on fixed edges
#[derive(Debug, Clone)]
pub struct Decomposer {
    batch: BatchNormalizer,
    prefix: String,
}

impl Decomposer {
    pub fn new(edges: BinEdges) -> Self {
        Self {
            batch: BatchNormalizer::new(edges),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Uniform edges over `range`
    pub fn uniform(num_bins: usize, range: (f64, f64)) -> Result<Self> {
        Ok(Self::new(BinEdges::uniform(num_bins, range)?))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn edges(&self) -> &BinEdges {
        self.batch.edges()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Histogram `values` and weight them to `cross_section`
    ///
    /// A histogram without entries stays all zero instead of failing.
    fn weighted(&self, values: &[f64], cross_section: f64) -> Result<Histogram1D> {
        let raw = self.batch.histogram(values)?;
        if raw.any_nonzero() {
            raw.scaled_to(cross_section)
        } else {
            Ok(raw)
        }
    }

    #[instrument(skip(self, inputs), fields(prefix = %self.prefix, pairs = inputs.mixed.len()))]
    pub fn decompose(&self, inputs: &InterferenceInputs) -> Result<Decomposition> {
        inputs.validate()?;

        let mut records = Vec::new();
        let mut weighted_pures = BTreeMap::new();
        let mut pures = BTreeMap::new();

        for (&resonance, input) in &inputs.pures {
            let weighted = self.weighted(&input.values, input.cross_section)?;
            if weighted.any_nonzero() {
                let template = weighted.scaled_to(input.area)?;
                records.push((format!("{}_{}", self.prefix, resonance.id()), template.clone()));
                pures.insert(resonance, template);
            } else {
                debug!("Pure sample {} has no content in range, not written", resonance.id());
            }
            weighted_pures.insert(resonance, weighted);
        }

        let mut interference = BTreeMap::new();
        for (pair, input) in &inputs.mixed {
            let (a, b) = pair.resonances();
            let (pure_a, pure_b) = match (
                weighted_pures.get(&a),
                weighted_pures.get(&b),
                inputs.pures.get(&a),
                inputs.pures.get(&b),
            ) {
                (Some(ha), Some(hb), Some(ia), Some(ib)) => ((ha, ia.area), (hb, ib.area)),
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "interference {} is missing a pure sample",
                        pair.id()
                    )))
                }
            };

            let mixed = self.weighted(&input.values, input.cross_section)?;
            let residual = cancel_rounding(
                &mixed.subtract(pure_a.0)?.subtract(pure_b.0)?,
                [&mixed, pure_a.0, pure_b.0],
            )?;

            let signed = if residual.any_nonzero() {
                residual.scaled_to((pure_a.1 * pure_b.1).sqrt())?
            } else {
                debug!("Interference {} vanishes after subtraction", pair.id());
                residual
            };

            let (pos, neg) = signed.split_signed();
            for (suffix, part) in [("pos", pos), ("neg", neg)] {
                if part.any_nonzero() {
                    records.push((format!("{}_{}_{}", self.prefix, pair.id(), suffix), part));
                }
            }
            interference.insert(*pair, signed);
        }

        debug!(
            "Decomposed {} pure and {} mixed samples into {} records",
            inputs.pures.len(),
            inputs.mixed.len(),
            records.len()
        );

        Ok(Decomposition {
            edges: self.edges().clone(),
            pures,
            interference,
            records,
        })
    }
}
