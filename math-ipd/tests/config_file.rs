//! The shipped example configuration loads and drives a sweep

use math_em_ipd::{GradientStrategy, IpdConfig, SweepPlan, run_sweep};
use std::path::PathBuf;

fn example_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/half_wave_1ghz.json")
}

#[test]
fn test_example_config_loads() {
    let config = IpdConfig::from_file(example_config()).unwrap();
    assert_eq!(config.frequencies.generate_frequencies(), vec![1.0e9]);
    assert_eq!(config.target.to_grid().unwrap().shape(), (31, 31, 3));

    let strategies = config.derivatives.strategies();
    assert_eq!(strategies.len(), 8);
    assert_eq!(strategies[0], GradientStrategy::Automatic);
}

#[test]
fn test_example_config_runs_coarsened() {
    let mut config = IpdConfig::from_file(example_config()).unwrap();
    config.target.nx = 9;
    config.target.ny = 9;
    config.derivatives.steps = Some(vec![1e-4]);

    let source = config.antenna.to_source().unwrap();
    let plan = SweepPlan {
        grid: config.target.to_grid().unwrap(),
        frequencies: config.frequencies.generate_frequencies(),
        strategies: config.derivatives.strategies(),
        options: config.estimator_options(),
    };
    let records = run_sweep(source.as_ref(), &plan).unwrap();

    // (AD + one FD step) x three standoffs
    assert_eq!(records.len(), 6);
    for record in records.iter().filter(|r| r.delta.is_some()) {
        let error = record.relative_error.unwrap();
        assert!(error < 1e-3, "δ = {:?}: {error:e}", record.delta);
    }
}
