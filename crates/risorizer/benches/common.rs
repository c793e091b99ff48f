#![allow(dead_code)]
use std::time::Duration;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const SAMPLE_SIZE: usize = 15;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in processed items; a zero count still reports one so criterion can divide.
pub fn items(count: usize) -> Throughput {
    Throughput::Elements(count.max(1) as u64)
}

/// Deterministic RNG per benchmark parameter.
pub fn seeded(salt: u64, parameter: f64) -> StdRng {
    StdRng::seed_from_u64(salt ^ parameter.to_bits())
}
