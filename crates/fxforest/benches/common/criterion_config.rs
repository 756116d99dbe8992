use std::time::Duration;

use criterion::Criterion;

/// Baseline Criterion configuration for prediction benchmarks.
///
/// Single-row calls take well under a microsecond, so short measurement
/// windows with many samples are enough for stable numbers.
pub fn default_criterion() -> Criterion {
    Criterion::default()
        // Allows `--bench` command-line overrides.
        .configure_from_args()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50)
}

/// Config for batch groups, where one iteration processes many rows.
pub fn batch_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(10))
        .sample_size(20)
}
