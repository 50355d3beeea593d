//! Analysis module for derived waveform measurements
//!
//! This module provides:
//! - Zero-crossing estimation of the fundamental frequency
//! - Human readable frequency labels with sentinel outcomes

pub mod frequency;

pub use frequency::{estimate_frequency, format_frequency, frequency_label, FrequencyEstimate};
