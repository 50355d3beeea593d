//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// `cycles` periods of a sine at `freq_hz`, sampled `samples_per_cycle`
/// times per period
pub fn sine(freq_hz: f64, cycles: usize, samples_per_cycle: usize) -> (Vec<f64>, Vec<f64>) {
    let n = cycles * samples_per_cycle;
    let dt = 1.0 / (freq_hz * samples_per_cycle as f64);
    let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
    let voltage = time
        .iter()
        .map(|t| (2.0 * std::f64::consts::PI * freq_hz * t).sin())
        .collect();
    (time, voltage)
}
