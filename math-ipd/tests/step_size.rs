//! Truncation vs round-off trade-off of central differences

use math_em_ipd::study::{ad_rmse, delta_sweep, fd_rmse_curve, optimal_delta, sample_points};
use math_em_ipd::{Precision, run_step_size_study};

const SAMPLES: usize = 201;

#[test]
fn test_sweep_layout() {
    let deltas = delta_sweep();
    assert_eq!(deltas.len(), 56);
    assert!(deltas.windows(2).all(|w| w[0] < w[1]));
    assert!((deltas[0] - 0.25e-15).abs() < 1e-30);
    assert!((deltas[55] - 1e-2).abs() < 1e-16);
}

#[test]
fn test_double_precision_curve_is_u_shaped() {
    let deltas = delta_sweep();
    let curve = fd_rmse_curve::<f64>(&deltas, &sample_points(SAMPLES)).unwrap();
    assert_eq!(curve.len(), deltas.len());
    assert!(curve.iter().all(|p| p.rmse.is_finite()));

    let best = optimal_delta(&curve).unwrap();
    let argmin = curve.iter().position(|p| p.delta == best.delta).unwrap();
    assert!(argmin > 0 && argmin < curve.len() - 1, "argmin at an end: {argmin}");

    let first = curve.first().unwrap().rmse;
    let last = curve.last().unwrap().rmse;
    assert!(first >= 100.0 * best.rmse, "round-off end {first:e} vs min {:e}", best.rmse);
    assert!(last >= 100.0 * best.rmse, "truncation end {last:e} vs min {:e}", best.rmse);

    // Truncation regime: halving the step keeps improving.
    let coarse: Vec<_> = curve.iter().filter(|p| p.delta >= 1e-4).collect();
    assert!(coarse.windows(2).all(|w| w[0].rmse < w[1].rmse));
}

#[test]
fn test_dual_numbers_are_exact() {
    let error = ad_rmse(&sample_points(SAMPLES)).unwrap();
    assert!(error < 1e-9, "AD RMSE {error:e}");
}

#[test]
fn test_dual_numbers_beat_best_step() {
    let study = run_step_size_study(Precision::Double, SAMPLES).unwrap();
    let best = study.optimal.unwrap();
    assert!(study.ad_rmse < best.rmse);
    assert_eq!(study.samples, SAMPLES);
    assert_eq!(study.precision, Precision::Double);
}

#[test]
fn test_single_precision_moves_optimum_up() {
    let single = run_step_size_study(Precision::Single, SAMPLES).unwrap();
    let double = run_step_size_study(Precision::Double, SAMPLES).unwrap();

    let single_best = single.optimal.unwrap();
    let double_best = double.optimal.unwrap();
    assert!(
        single_best.delta > double_best.delta,
        "f32 optimum {:e} vs f64 optimum {:e}",
        single_best.delta,
        double_best.delta
    );
    assert!(single_best.rmse > double_best.rmse);
}
