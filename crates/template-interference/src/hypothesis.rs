//! Structured keys for pure and mixed hypothesis samples
//!
//! Samples are identified by what they contain rather than by file names:
//! a pure sample belongs to one [`Resonance`], a mixed sample to an
//! [`InterferencePair`] with a relative [`Phase`]. Both render to the textual
//! ids used for output record names (`BW1_0_0`, `BW13_0_05`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use template_core::{Error, Result};

/// One of the three Breit-Wigner resonances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resonance {
    One,
    Two,
    Three,
}

impl Resonance {
    pub const ALL: [Resonance; 3] = [Resonance::One, Resonance::Two, Resonance::Three];

    /// 1-based resonance number
    pub fn number(self) -> u8 {
        match self {
            Resonance::One => 1,
            Resonance::Two => 2,
            Resonance::Three => 3,
        }
    }

    pub fn from_number(n: u8) -> Result<Self> {
        match n {
            1 => Ok(Resonance::One),
            2 => Ok(Resonance::Two),
            3 => Ok(Resonance::Three),
            _ => Err(Error::InvalidArgument(format!(
                "resonance number must be 1, 2 or 3, got {n}"
            ))),
        }
    }

    /// Id of the pure sample, e.g. `BW2_0_0`
    pub fn id(self) -> String {
        format!("BW{}_0_0", self.number())
    }
}

/// Relative phase between the two resonances of a mixed sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Zero,
    HalfPi,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Zero, Phase::HalfPi];

    fn token(self) -> &'static str {
        match self {
            Phase::Zero => "0",
            Phase::HalfPi => "05",
        }
    }
}

impl FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(Phase::Zero),
            "pi/2" | "pi_over_2" | "05" | "0.5pi" => Ok(Phase::HalfPi),
            other => Err(Error::InvalidArgument(format!("unknown phase '{other}'"))),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Zero => write!(f, "0"),
            Phase::HalfPi => write!(f, "pi/2"),
        }
    }
}

/// Two distinct resonances mixed at a given phase
///
/// The resonances are stored in ascending order, so `(3, 1)` and `(1, 3)`
/// name the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterferencePair {
    first: Resonance,
    second: Resonance,
    phase: Phase,
}

impl InterferencePair {
    pub fn new(a: Resonance, b: Resonance, phase: Phase) -> Result<Self> {
        if a == b {
            return Err(Error::InvalidArgument(format!(
                "interference needs two different resonances, got {} twice",
                a.number()
            )));
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            first,
            second,
            phase,
        })
    }

    /// The six pairs in output order: 12, 13, 23, each at phase 0 then pi/2
    pub fn all() -> [InterferencePair; 6] {
        use Resonance::*;
        let pair = |first, second, phase| InterferencePair {
            first,
            second,
            phase,
        };
        [
            pair(One, Two, Phase::Zero),
            pair(One, Two, Phase::HalfPi),
            pair(One, Three, Phase::Zero),
            pair(One, Three, Phase::HalfPi),
            pair(Two, Three, Phase::Zero),
            pair(Two, Three, Phase::HalfPi),
        ]
    }

    pub fn first(&self) -> Resonance {
        self.first
    }

    pub fn second(&self) -> Resonance {
        self.second
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn resonances(&self) -> (Resonance, Resonance) {
        (self.first, self.second)
    }

    /// Output id, e.g. `BW12_05_0` or `BW13_0_05`
    ///
    /// A half-pi phase is carried by the first resonance of pair 12 and by
    /// the second resonance of pairs 13 and 23.
    pub fn id(&self) -> String {
        let (a, b) = (self.first.number(), self.second.number());
        let on_first = self.first == Resonance::One && self.second == Resonance::Two;
        let (pa, pb) = if on_first {
            (self.phase.token(), Phase::Zero.token())
        } else {
            (Phase::Zero.token(), self.phase.token())
        };
        format!("BW{a}{b}_{pa}_{pb}")
    }
}

/// Key of any sample entering an interference batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SampleKey {
    Pure(Resonance),
    Interference(InterferencePair),
}

impl SampleKey {
    /// Output id of the sample (`BW1_0_0`, `BW12_05_0`, ...)
    pub fn id(&self) -> String {
        match self {
            SampleKey::Pure(r) => r.id(),
            SampleKey::Interference(p) => p.id(),
        }
    }

    /// Every key of a complete three-resonance batch
    pub fn all() -> Vec<SampleKey> {
        Resonance::ALL
            .into_iter()
            .map(SampleKey::Pure)
            .chain(InterferencePair::all().into_iter().map(SampleKey::Interference))
            .collect()
    }
}

fn parse_resonance(s: &str) -> Result<Resonance> {
    let n = s
        .trim()
        .parse::<u8>()
        .map_err(|_| Error::InvalidArgument(format!("'{s}' is not a resonance number")))?;
    Resonance::from_number(n)
}

impl FromStr for SampleKey {
    type Err = Error;

    /// Parses `pure:<n>`, `interference:<ab>:<phase>` or an output id such as
    /// `BW13_0_05`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            ["pure", n] => Ok(SampleKey::Pure(parse_resonance(n)?)),
            ["interference", pair, phase] => {
                let digits: Vec<char> = pair.trim().chars().collect();
                if digits.len() != 2 {
                    return Err(Error::InvalidArgument(format!(
                        "interference pair must be two resonance numbers, got '{pair}'"
                    )));
                }
                let a = parse_resonance(&digits[0].to_string())?;
                let b = parse_resonance(&digits[1].to_string())?;
                Ok(SampleKey::Interference(InterferencePair::new(
                    a,
                    b,
                    phase.parse()?,
                )?))
            }
            [id] if id.starts_with("BW") => SampleKey::all()
                .into_iter()
                .find(|key| key.id() == *id)
                .ok_or_else(|| Error::InvalidArgument(format!("unknown sample id '{id}'"))),
            _ => Err(Error::InvalidArgument(format!("unrecognised sample key '{s}'"))),
        }
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleKey::Pure(r) => write!(f, "pure:{}", r.number()),
            SampleKey::Interference(p) => write!(
                f,
                "interference:{}{}:{}",
                p.first.number(),
                p.second.number(),
                p.phase
            ),
        }
    }
}

impl TryFrom<String> for SampleKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SampleKey> for String {
    fn from(key: SampleKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_ids() {
        let ids: Vec<String> = InterferencePair::all().iter().map(|p| p.id()).collect();
        assert_eq!(
            ids,
            ["BW12_0_0", "BW12_05_0", "BW13_0_0", "BW13_0_05", "BW23_0_0", "BW23_0_05"]
        );
    }

    #[test]
    fn test_pair_order_is_normalized() {
        let a = InterferencePair::new(Resonance::Three, Resonance::One, Phase::HalfPi).unwrap();
        let b = InterferencePair::new(Resonance::One, Resonance::Three, Phase::HalfPi).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.resonances(), (Resonance::One, Resonance::Three));
        assert!(InterferencePair::new(Resonance::Two, Resonance::Two, Phase::Zero).is_err());
    }

    #[test]
    fn test_parse_manifest_components() {
        assert_eq!("pure:1".parse::<SampleKey>().unwrap(), SampleKey::Pure(Resonance::One));

        let key: SampleKey = "interference:13:pi/2".parse().unwrap();
        assert_eq!(key.id(), "BW13_0_05");

        let key: SampleKey = "interference:21:0".parse().unwrap();
        assert_eq!(key.id(), "BW12_0_0");

        let key: SampleKey = "BW12_05_0".parse().unwrap();
        assert_eq!(key.to_string(), "interference:12:pi/2");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["pure:4", "interference:11:0", "interference:12:pi", "BW99_0_0", "mixed"] {
            assert!(bad.parse::<SampleKey>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for key in SampleKey::all() {
            assert_eq!(key.to_string().parse::<SampleKey>().unwrap(), key);
        }
        assert_eq!(SampleKey::all().len(), 9);
    }
}
