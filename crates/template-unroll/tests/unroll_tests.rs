//! Unrolling whole template sets the way the fit inputs are prepared

use approx::assert_relative_eq;
use proptest::prelude::*;
use template_histogram::{BinEdges, Histogram2D};
use template_unroll::{traversal, NamingRule, Unroller};

fn template(nx: usize, ny: usize, counts: Vec<f64>) -> Histogram2D {
    Histogram2D::new(
        counts,
        BinEdges::uniform(nx, (6.0, 9.0)).unwrap(),
        BinEdges::uniform(ny, (0.0, 1.0)).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_standard_template_set() {
    let unroller = Unroller::new();
    let set = [
        ("ggH_0PM", template(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
        ("ggH_0M", template(2, 3, vec![0.5, 0.0, 0.5, 0.0, 0.5, 0.0])),
        ("bkg_ggzz", template(2, 3, vec![3.0, 0.0, 1.0, 1.0, 0.0, 1.0])),
    ];

    let mut written = Vec::new();
    for (name, hist) in &set {
        written.extend(unroller.unroll(name, hist).unwrap().written());
    }

    let names: Vec<&str> = written.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["ggH_0PM", "ggH_0M", "bkg_ggzz"]);

    // Background floor is 0.1 * 6 / 6 in both empty bins
    let bkg = written[2].1.counts();
    let expected = [3.0, 1.0, 0.1, 0.1, 1.0, 1.0];
    for (got, want) in bkg.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-12);
    }
    // Signal keeps its empty bins
    assert_eq!(written[1].1.counts(), &[0.5, 0.0, 0.0, 0.5, 0.5, 0.0]);
}

#[test]
fn test_signed_shape_variation() {
    let outcome = Unroller::new()
        .unroll("signal_up_variation", &template(1, 2, vec![2.0, -1.0]))
        .unwrap();
    assert_eq!(outcome.rule, NamingRule::SplitSuffix);

    let written = outcome.written();
    assert_eq!(written[0].0, "signal_up_positive_variation");
    assert_eq!(written[1].0, "signal_up_negative_variation");
    assert_eq!(written[1].1.counts(), &[0.0, 1.0]);
}

#[test]
fn test_source_left_untouched() {
    let hist = template(2, 2, vec![5.0, 0.0, 0.0, -3.0]);
    let before = hist.clone();
    let _ = Unroller::new().unroll("bkg_ggzz", &hist).unwrap();
    assert_eq!(hist, before);
}

proptest! {
    #[test]
    fn prop_every_bin_lands_once(
        nx in 1usize..8,
        ny in 1usize..8,
        seed in prop::collection::vec(-5.0..5.0f64, 64),
    ) {
        let counts: Vec<f64> = seed.into_iter().take(nx * ny).collect();
        let hist = template(nx, ny, counts);
        let outcome = Unroller::new().unroll("interf_12", &hist).unwrap();

        prop_assert_eq!(outcome.positive.len(), nx * ny);
        prop_assert_eq!(outcome.negative.len(), nx * ny);
        for (k, (x, y)) in traversal(nx, ny).enumerate() {
            let content = hist.get(x, y);
            prop_assert_eq!(outcome.positive.counts()[k] - outcome.negative.counts()[k], content);
        }
    }
}
