//! Batch-level binning behaviour on synthetic mass spectra

use approx::assert_relative_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, Uniform};
use template_histogram::{
    BackgroundSet, BatchNormalizer, BinEdges, HistogramOps, Sample, SignalRegion,
    SignalRegionLayout,
};

fn peak(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Normal::new(7.5, 0.3).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

fn flat(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dist = Uniform::new(6.0, 9.0);
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

#[test]
fn test_batch_templates_are_summable() {
    let batch = BatchNormalizer::uniform(30, (6.0, 9.0)).unwrap();
    let signal = batch.normalize(&Sample::new("ggH_0PM", peak(1, 5000), 2.0)).unwrap();
    let background = batch.normalize(&Sample::new("bkg_qqzz", flat(2, 5000), 10.0)).unwrap();

    let total = signal.add(&background).unwrap();
    assert_eq!(total.edges(), batch.edges());
    assert_relative_eq!(total.integral(), 12.0, epsilon = 1e-9);
}

#[test]
fn test_signal_region_gets_finer_bins() {
    let region = SignalRegion::new(7.0, 8.0).unwrap();
    let layout = SignalRegionLayout::new(40, 60, (6.0, 9.0), Some(region)).unwrap();
    let edges = layout.edges();

    assert_eq!(edges.num_bins(), 60);
    let alloc = layout.allocation();
    assert_eq!(alloc.low + alloc.region + alloc.high, 60);

    // Widest bin inside the region is narrower than any bin outside it
    let inside_max = (alloc.low..alloc.low + alloc.region)
        .map(|i| edges.width(i))
        .fold(0.0, f64::max);
    let outside_min = (0..alloc.low)
        .chain(alloc.low + alloc.region..60)
        .map(|i| edges.width(i))
        .fold(f64::INFINITY, f64::min);
    assert!(inside_max < outside_min);

    let hist = layout.resample(&peak(3, 2000), 1.5).unwrap();
    assert_relative_eq!(hist.integral(), 1.5, epsilon = 1e-12);
}

#[test]
fn test_resample_batch_matches_single_calls() {
    let region = SignalRegion::new(7.2, 7.8).unwrap();
    let layout = SignalRegionLayout::new(12, 24, (6.0, 9.0), Some(region)).unwrap();
    let samples = vec![
        Sample::new("ggH_0PM", peak(4, 1000), 1.0),
        Sample::new("ggH_0M", peak(5, 1000), 0.5),
    ];

    let batch = layout.resample_batch(&samples).unwrap();
    for (hist, sample) in batch.iter().zip(&samples) {
        let single = layout.resample(sample.values(), sample.target_area()).unwrap();
        assert_eq!(hist, &single);
    }
}

#[test]
fn test_backgrounds_on_shared_edges() {
    let edges = BinEdges::uniform(15, (6.0, 9.0)).unwrap();
    let set = BackgroundSet::new(
        vec!["bkg_qqzz".to_string(), "bkg_ggzz".to_string(), "bkg_zjets".to_string()],
        vec![flat(6, 3000), flat(7, 800), flat(8, 200)],
        vec![20.0, 3.0, 1.0],
        None,
    )
    .unwrap();

    let combined = set.scale_and_add(&edges, true).unwrap();
    assert_eq!(combined.components.len(), 3);
    assert_relative_eq!(combined.total.integral(), 24.0, epsilon = 1e-9);
    for (_, component) in &combined.components {
        assert_eq!(component.edges(), &edges);
    }
}
