//! Two-sided 95% critical values of Student's t-distribution, as used by the sampling phase of
//! the activity tracker.

/// Indexed by the sample size minus one; a single sample has no usable critical value.
const INDIVIDUAL_VALUES: [f64; 41] = [
    999.99, // 0
    12.706, 4.303, 3.182, 2.776, 2.571, // 1..=5
    2.447, 2.365, 2.306, 2.262, 2.228, // 6..=10
    2.201, 2.179, 2.160, 2.145, 2.131, // 11..=15
    2.120, 2.110, 2.101, 2.093, 2.086, // 16..=20
    2.080, 2.074, 2.069, 2.064, 2.060, // 21..=25
    2.056, 2.052, 2.048, 2.045, 2.042, // 26..=30
    2.040, 2.037, 2.035, 2.032, 2.030, // 31..=35
    2.028, 2.026, 2.024, 2.023, 2.021, // 36..=40
];

/// Buckets for larger samples, as (largest sample size in the bucket, critical value).
const BUCKETED_VALUES: [(u32, f64); 9] = [
    (60, 2.021),
    (80, 2.000),
    (100, 1.990),
    (120, 1.984),
    (140, 1.980),
    (160, 1.977),
    (180, 1.975),
    (200, 1.973),
    (250, 1.972),
];

/// Used for every sample larger than the last bucket.
const LIMIT_VALUE: f64 = 1.969;

/// The critical value used for a sample of `num_samples` observations.
///
/// Sample sizes 1 to 40 are looked up individually; larger samples use the value of the bucket
/// containing them.
pub(crate) fn t_value(num_samples: u32) -> f64 {
    crate::propel_assert_simple!(num_samples > 0, "a sample contains at least one observation");

    match num_samples {
        0 => INDIVIDUAL_VALUES[0],
        1..=40 => INDIVIDUAL_VALUES[(num_samples - 1) as usize],
        _ => BUCKETED_VALUES
            .iter()
            .find(|(upper, _)| num_samples <= *upper)
            .map(|(_, value)| *value)
            .unwrap_or(LIMIT_VALUE),
    }
}
