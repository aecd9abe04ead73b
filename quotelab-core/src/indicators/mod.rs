//! Indicators computed over close-price series.

pub mod sma;

pub use sma::Sma;

/// Short moving-average window drawn on every chart.
pub const SHORT_MA_PERIOD: usize = 20;

/// Long moving-average window drawn on every chart.
pub const LONG_MA_PERIOD: usize = 50;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
