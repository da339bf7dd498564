//! Interference templates for three mixed resonances
//!
//! Takes pure samples of up to three resonances and mixed samples of each
//! pair (at phase 0 and pi/2) and produces:
//!
//! - area-scaled pure templates `<prefix>_BWn_0_0`
//! - the signed interference of each pair, split into non-negative
//!   `<prefix>_<pair>_pos` and `<prefix>_<pair>_neg` records
//! - numeric overlays of pures plus interference for every phase choice
//!
//! ```rust
//! use template_interference::{
//!     Decomposer, InterferenceInputs, InterferencePair, MixedInput, Phase, PureInput, Resonance,
//! };
//!
//! let pair = InterferencePair::new(Resonance::One, Resonance::Two, Phase::Zero).unwrap();
//! let inputs = InterferenceInputs::new()
//!     .with_pure(Resonance::One, PureInput::new(vec![0.5, 1.5], 1.0, 4.0))
//!     .with_pure(Resonance::Two, PureInput::new(vec![0.5, 1.5], 1.0, 1.0))
//!     .with_mixed(pair, MixedInput::new(vec![0.5, 0.5], 2.0));
//!
//! let decomposition = Decomposer::uniform(2, (0.0, 2.0)).unwrap().decompose(&inputs).unwrap();
//! let names: Vec<&str> = decomposition.records().iter().map(|(n, _)| n.as_str()).collect();
//! assert_eq!(
//!     names,
//!     ["ggH_0PM_BW1_0_0", "ggH_0PM_BW2_0_0", "ggH_0PM_BW12_0_0_pos", "ggH_0PM_BW12_0_0_neg"]
//! );
//! ```

pub mod decomposer;
pub mod hypothesis;
pub mod overlay;

pub use decomposer::{
    Decomposer, Decomposition, InterferenceInputs, MixedInput, PureInput, DEFAULT_PREFIX,
};
pub use hypothesis::{InterferencePair, Phase, Resonance, SampleKey};
pub use overlay::{overall_interference, Overlay};

pub use template_core::{Error, Result};
