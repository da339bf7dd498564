//! Overall-interference overlays
//!
//! For each choice of one phase per resonance pair, the pure templates and the
//! three chosen signed interference templates are summed into the overall
//! shape. Only the numbers are produced here.

use template_core::{Error, Result};
use template_histogram::{sum_all, Histogram1D};

use crate::decomposer::Decomposition;
use crate::hypothesis::{InterferencePair, Phase, Resonance};

/// One phase combination: its terms and their sum
#[derive(Debug, Clone)]
pub struct Overlay {
    /// `<id12>_<id13>_<id23>`
    pub label: String,
    pub terms: Vec<(String, Histogram1D)>,
    pub overall: Histogram1D,
}

/// All eight overlays, pair 12 phase outermost and pair 23 innermost
///
/// Every pair must have been decomposed.
pub fn overall_interference(decomposition: &Decomposition) -> Result<Vec<Overlay>> {
    let pures: Vec<(String, Histogram1D)> = decomposition
        .pures()
        .map(|(r, h)| (r.id(), h.clone()))
        .collect();

    let lookup = |a: Resonance, b: Resonance, phase: Phase| -> Result<(String, Histogram1D)> {
        let pair = InterferencePair::new(a, b, phase)?;
        decomposition
            .interference(&pair)
            .map(|h| (pair.id(), h.clone()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!("no interference template for {}", pair.id()))
            })
    };

    let mut overlays = Vec::with_capacity(8);
    for p12 in Phase::ALL {
        for p13 in Phase::ALL {
            for p23 in Phase::ALL {
                let chosen = [
                    lookup(Resonance::One, Resonance::Two, p12)?,
                    lookup(Resonance::One, Resonance::Three, p13)?,
                    lookup(Resonance::Two, Resonance::Three, p23)?,
                ];
                let label = format!("{}_{}_{}", chosen[0].0, chosen[1].0, chosen[2].0);

                let mut terms = pures.clone();
                terms.extend(chosen);
                let overall = sum_all(terms.iter().map(|(_, h)| h))?;

                overlays.push(Overlay {
                    label,
                    terms,
                    overall,
                });
            }
        }
    }
    Ok(overlays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposer::{Decomposer, InterferenceInputs, MixedInput, PureInput};

    fn full_inputs() -> InterferenceInputs {
        let mut inputs = InterferenceInputs::new();
        for r in Resonance::ALL {
            inputs.insert_pure(r, PureInput::new(vec![0.5, 1.5], 1.0, 1.0));
        }
        for pair in InterferencePair::all() {
            inputs.insert_mixed(pair, MixedInput::new(vec![0.5, 0.5, 1.5], 2.0));
        }
        inputs
    }

    #[test]
    fn test_eight_labelled_overlays() {
        let decomposition = Decomposer::uniform(2, (0.0, 2.0))
            .unwrap()
            .decompose(&full_inputs())
            .unwrap();
        let overlays = overall_interference(&decomposition).unwrap();

        assert_eq!(overlays.len(), 8);
        assert_eq!(overlays[0].label, "BW12_0_0_BW13_0_0_BW23_0_0");
        assert_eq!(overlays[7].label, "BW12_05_0_BW13_0_05_BW23_0_05");
        for overlay in &overlays {
            assert_eq!(overlay.terms.len(), 6);
        }

        // Pures are [0.5, 0.5] each and every interference is [0.5, -0.5]
        let overall = overlays[3].overall.counts();
        assert!((overall[0] - 3.0).abs() < 1e-12);
        assert!((overall[1] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_pair_is_reported() {
        let mut inputs = InterferenceInputs::new();
        for r in Resonance::ALL {
            inputs.insert_pure(r, PureInput::new(vec![0.5], 1.0, 1.0));
        }
        let decomposition = Decomposer::uniform(2, (0.0, 2.0))
            .unwrap()
            .decompose(&inputs)
            .unwrap();
        assert!(overall_interference(&decomposition).is_err());
    }
}
