//! Zero-crossing frequency estimation
//!
//! Estimates the fundamental frequency of a sampled, roughly symmetric
//! periodic signal:
//!
//! 1. Remove the DC bias by subtracting the mean
//! 2. Find every index where the sign of the centred signal changes
//! 3. Average the time between consecutive crossings; a full period spans two
//!
//! The estimate never fails. Inputs it cannot measure map to a
//! [`FrequencyEstimate`] sentinel, so callers can always display a label.

use std::fmt;

/// Label of a flat or noise dominated signal
pub const LABEL_DC_OR_NOISE: &str = "DC / Ruido";

/// Label of a zero estimated period
pub const LABEL_ZERO_PERIOD: &str = "Error";

/// Label of an input that cannot be measured at all
pub const LABEL_UNAVAILABLE: &str = "--";

/// Outcome of a frequency estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrequencyEstimate {
    /// Estimated frequency in Hz
    Measured(f64),
    /// Fewer than two zero crossings
    DcOrNoise,
    /// Crossing timestamps average to a zero period
    ZeroPeriod,
    /// Empty, mismatched or non-finite input
    Unavailable,
}

impl FrequencyEstimate {
    /// Frequency in Hz, if one was measured
    pub fn hertz(&self) -> Option<f64> {
        match self {
            FrequencyEstimate::Measured(hz) => Some(*hz),
            _ => None,
        }
    }

    /// Check if a frequency was measured
    pub fn is_measured(&self) -> bool {
        matches!(self, FrequencyEstimate::Measured(_))
    }
}

impl fmt::Display for FrequencyEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyEstimate::Measured(hz) => f.write_str(&format_frequency(*hz)),
            FrequencyEstimate::DcOrNoise => f.write_str(LABEL_DC_OR_NOISE),
            FrequencyEstimate::ZeroPeriod => f.write_str(LABEL_ZERO_PERIOD),
            FrequencyEstimate::Unavailable => f.write_str(LABEL_UNAVAILABLE),
        }
    }
}

/// Format a frequency with the largest fitting unit
pub fn format_frequency(hz: f64) -> String {
    if hz >= 1_000_000.0 {
        format!("{:.3} MHz", hz / 1_000_000.0)
    } else if hz >= 1_000.0 {
        format!("{:.3} kHz", hz / 1_000.0)
    } else {
        format!("{:.2} Hz", hz)
    }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Indices `i` where the sign of `centered[i]` differs from `centered[i + 1]`
pub fn zero_crossings(centered: &[f64]) -> Vec<usize> {
    centered
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| sign(pair[0]) != sign(pair[1]))
        .map(|(i, _)| i)
        .collect()
}

/// Estimate the fundamental frequency of a sampled signal
pub fn estimate_frequency(time: &[f64], voltage: &[f64]) -> FrequencyEstimate {
    if voltage.is_empty() || time.len() != voltage.len() {
        return FrequencyEstimate::Unavailable;
    }
    if time.iter().chain(voltage).any(|v| !v.is_finite()) {
        return FrequencyEstimate::Unavailable;
    }

    let mean = voltage.iter().sum::<f64>() / voltage.len() as f64;
    let centered: Vec<f64> = voltage.iter().map(|v| v - mean).collect();

    let crossings = zero_crossings(&centered);
    if crossings.len() < 2 {
        return FrequencyEstimate::DcOrNoise;
    }

    let crossing_times: Vec<f64> = crossings.iter().map(|&i| time[i]).collect();
    let intervals = crossing_times.windows(2).map(|w| w[1] - w[0]);
    let mean_interval = intervals.sum::<f64>() / (crossing_times.len() - 1) as f64;
    let period = mean_interval * 2.0;

    if period == 0.0 {
        return FrequencyEstimate::ZeroPeriod;
    }
    if !period.is_finite() || period < 0.0 {
        return FrequencyEstimate::Unavailable;
    }

    FrequencyEstimate::Measured(1.0 / period)
}

/// Estimate and format in one step
pub fn frequency_label(time: &[f64], voltage: &[f64]) -> String {
    estimate_frequency(time, voltage).to_string()
}
