//! Whole workflows across the workspace crates

use approx::assert_relative_eq;
use signed_templates::pipeline::{unroll_store, Record};
use signed_templates::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_negative_background_unrolls_into_duplicate_names() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("Template2D.json");
    let output = dir.path().join("Template2D_unrolled.json");

    let x = BinEdges::uniform(2, (6.0, 9.0))?;
    let y = BinEdges::uniform(2, (0.0, 1.0))?;
    let mut writer = StoreWriter::create(&input)?;
    writer.write_2d(
        "bkg_ggzz",
        Histogram2D::from_rows(&[vec![5.0, 0.0], vec![0.0, -3.0]], x, y)?,
    );
    writer.finish()?;

    let store = unroll_store(&input, &output, &["bkg_ggzz"], &Unroller::new())?;
    assert_eq!(store.names(), ["bkg_ggzz", "bkg_ggzz"]);

    let reopened = TemplateStore::open(&output)?;
    let components: Vec<&[f64]> = reopened
        .get_all("bkg_ggzz")
        .map(|record| match record {
            Record::Hist1d(h) => h.counts(),
            Record::Hist2d(_) => panic!("unrolled records are 1-D"),
        })
        .collect();
    assert_eq!(components, [&[5.0, 0.05, 0.05, 0.0][..], &[0.0, 0.0, 0.0, 3.0][..]]);

    // Lookup by name sees the positive component
    assert_eq!(reopened.get_1d("bkg_ggzz")?.counts(), components[0]);
    Ok(())
}

#[test]
fn test_interference_batch_in_memory() -> anyhow::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let config = TemplateConfig {
        output_dir: dir.path().to_path_buf(),
        name: "Interf".to_string(),
        ..Default::default()
    };

    // Pure peaks at 7 and 8, mixture with an excess between them
    let bw1: Vec<f64> = (0..30).map(|i| 6.9 + 0.005 * f64::from(i)).collect();
    let bw2: Vec<f64> = (0..30).map(|i| 7.9 + 0.005 * f64::from(i)).collect();
    let mixed: Vec<f64> = bw1
        .iter()
        .chain(&bw2)
        .copied()
        .chain((0..30).map(|i| 7.4 + 0.005 * f64::from(i)))
        .collect();

    let manifest = Manifest::from_reader(
        "path,cross_section,uncertainty,component\n\
         bw1.csv,1.0,,pure:1\n\
         bw2.csv,1.0,,pure:2\n\
         bw12.csv,3.0,,interference:12:0\n"
            .as_bytes(),
    )?;
    let source = signed_templates::pipeline::InMemorySource::new()
        .with("bw1.csv", "M4L", bw1)
        .with("bw2.csv", "M4L", bw2)
        .with("bw12.csv", "M4L", mixed)
        .with("qqzz.csv", "M4L", vec![6.5, 8.5]);

    let pipeline = TemplatePipeline::new(config, source)?;
    let report = pipeline.interference_1d(
        &manifest,
        [4.0, 1.0, 1.0],
        &[BackgroundSpec::from_path("qqzz.csv", 1.0)],
    )?;

    let pair = InterferencePair::new(Resonance::One, Resonance::Two, Phase::Zero)?;
    let signed = report
        .decomposition
        .interference(&pair)
        .expect("pair 12 was supplied");
    // Only positive content survives the subtraction, scaled to sqrt(4 * 1)
    assert_relative_eq!(signed.abs_integral(), 2.0, epsilon = 1e-9);
    assert_eq!(
        report.batch.store.names(),
        ["ggH_0PM_BW1_0_0", "ggH_0PM_BW2_0_0", "ggH_0PM_BW12_0_0_pos", "bkg_ggzz"]
    );
    Ok(())
}
