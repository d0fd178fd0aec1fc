use cardinality_sketches::trials::{relative_error, TrialConfig};
use cardinality_sketches::{run_trials, CardinalitySketch, HyperLogLog};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use test_case::test_case;

/// Mean HyperLogLog error over 50 resampled inputs stays within three standard errors.
#[test_case(1024, 5_000; "m1024 n5000")]
#[test_case(256, 1_500; "m256 n1500")]
#[test_case(64, 300; "m64 n300")]
fn test_hyperloglog_mean_error(m: usize, n: usize) {
    let bound = 3.0 * 1.04 / (m as f64).sqrt();
    let mut rng = StdRng::seed_from_u64(42);
    let mut total = 0.0;
    let trials = 50;
    for _ in 0..trials {
        let mut sketch: HyperLogLog = HyperLogLog::new(m).unwrap();
        for value in index::sample(&mut rng, n * 100, n).into_iter() {
            sketch.add(&value);
        }
        total += relative_error(sketch.estimate(), n);
    }
    let mean = total / trials as f64;
    assert!(mean < bound, "mean error {mean} exceeds {bound}");
}

#[test]
fn test_trial_sweep_errors_are_bounded() {
    let config = TrialConfig::new(vec![256])
        .with_cardinalities(vec![2_000, 20_000])
        .with_runs(10);
    let points = run_trials(&config).unwrap();
    assert_eq!(points.len(), 2);
    for point in points {
        assert!(point.hyperloglog_error < 3.0 * 1.04 / 16.0, "{point:?}");
        assert!(point.loglog_error < 3.0 * 1.30 / 16.0, "{point:?}");
    }
}
