//! Output names for unrolled components

/// Names that mark a template as a normalization-bearing hypothesis
pub const HYPOTHESIS_MARKERS: [&str; 6] = ["bkg", "Data", "0PH", "0PM", "L1", "0M"];

/// Substrings that mark a shape variation (`..._up_...`, `..._dn_...`)
pub const SHAPE_VARIATION_MARKERS: [&str; 3] = ["up", "dn", "down"];

/// Name of the observed-data record expected by the fit
pub const DATA_OBS: &str = "data_obs";

/// How the unrolled components of one template are named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingRule {
    /// Negative bins in a known hypothesis: keep the name, clamp the source
    KeepAndClamp,
    /// Distinct `_positive` / `_negative` names
    SplitSuffix,
    /// Same name for both, with the `0Xff_` spelling mapped to `0Mff_`
    Rename,
}

/// Names of the positive and negative components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNames {
    pub positive: String,
    pub negative: String,
}

fn has_hypothesis_marker(name: &str) -> bool {
    HYPOTHESIS_MARKERS.iter().any(|m| name.contains(m))
}

fn is_shape_variation(name: &str) -> bool {
    SHAPE_VARIATION_MARKERS.iter().any(|m| name.contains(m))
}

/// Pick the rule for `name` given whether its 2-D source had negative bins
pub fn classify(name: &str, has_negative: bool) -> NamingRule {
    let known = has_hypothesis_marker(name);
    if has_negative && known {
        NamingRule::KeepAndClamp
    } else if has_negative || !known {
        NamingRule::SplitSuffix
    } else {
        NamingRule::Rename
    }
}

/// Append `word` as a suffix, or as the third `_` token for shape variations
///
/// `signal_up_variation` becomes `signal_up_positive_variation`.
fn with_component_word(name: &str, word: &str) -> String {
    if is_shape_variation(name) {
        let mut tokens: Vec<&str> = name.split('_').collect();
        let at = tokens.len().min(2);
        tokens.insert(at, word);
        tokens.join("_")
    } else {
        format!("{name}_{word}")
    }
}

/// Component names for `name` under `rule`
///
/// Anything naming data ends up as [`DATA_OBS`] regardless of the rule.
pub fn component_names(name: &str, rule: NamingRule) -> ComponentNames {
    let (positive, negative) = match rule {
        NamingRule::KeepAndClamp => (name.to_string(), name.to_string()),
        NamingRule::SplitSuffix => (
            with_component_word(name, "positive"),
            with_component_word(name, "negative"),
        ),
        NamingRule::Rename => {
            let renamed = name.replace("0Xff_", "0Mff_");
            (renamed.clone(), renamed)
        }
    };

    if negative.contains("data") || negative.contains("Data") {
        return ComponentNames {
            positive: DATA_OBS.to_string(),
            negative: DATA_OBS.to_string(),
        };
    }
    ComponentNames { positive, negative }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(name: &str, has_negative: bool) -> (String, String) {
        let n = component_names(name, classify(name, has_negative));
        (n.positive, n.negative)
    }

    #[test]
    fn test_background_with_negative_keeps_name() {
        assert_eq!(classify("bkg_ggzz", true), NamingRule::KeepAndClamp);
        assert_eq!(names("bkg_ggzz", true), ("bkg_ggzz".into(), "bkg_ggzz".into()));
    }

    #[test]
    fn test_shape_variation_gets_inner_suffix() {
        assert_eq!(
            names("signal_up_variation", true),
            (
                "signal_up_positive_variation".into(),
                "signal_up_negative_variation".into()
            )
        );
        assert_eq!(
            names("interf_dn", false),
            ("interf_dn_positive".into(), "interf_dn_negative".into())
        );
        assert_eq!(names("up", false), ("up_positive".into(), "up_negative".into()));
    }

    #[test]
    fn test_unknown_template_gets_plain_suffix() {
        assert_eq!(classify("interf_12", false), NamingRule::SplitSuffix);
        assert_eq!(
            names("interf_12", false),
            ("interf_12_positive".into(), "interf_12_negative".into())
        );
    }

    #[test]
    fn test_known_template_without_negatives_is_renamed() {
        assert_eq!(classify("ggH_0PM", false), NamingRule::Rename);
        assert_eq!(names("ggH_0PM", false), ("ggH_0PM".into(), "ggH_0PM".into()));
        assert_eq!(
            names("ggH_0Xff_0PM", false),
            ("ggH_0Mff_0PM".into(), "ggH_0Mff_0PM".into())
        );
    }

    #[test]
    fn test_data_becomes_data_obs() {
        assert_eq!(names("Data", false), ("data_obs".into(), "data_obs".into()));
        assert_eq!(names("data_2018", false), ("data_obs".into(), "data_obs".into()));
    }
}
