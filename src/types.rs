//! Core data types for ScopeView
//!
//! This module contains the fundamental data structures shared by the
//! parser, the frequency estimator, the session layer and the front end.
//!
//! # Main Types
//!
//! - [`WaveformMetadata`] - Acquisition settings read from an export header
//! - [`WaveformSeries`] - Time/voltage samples of one channel plus its metadata
//! - [`CsvLayout`] - Which of the two vendor CSV layouts a series came from
//! - [`Channel`] - Identifier of one of the two display channels
//!
//! A series is produced once and then only read. Display offsets and zoom
//! are applied to copies by [`crate::view`].

use serde::{Deserialize, Serialize};

/// Default seconds per sample when the export does not state one
pub const DEFAULT_SAMPLING_PERIOD: f64 = 1e-4;

/// Default volts per division
pub const DEFAULT_VERTICAL_SCALE: f64 = 1.0;

/// Default vertical position in volts
pub const DEFAULT_VERTICAL_POSITION: f64 = 0.0;

/// Default vertical unit label
pub const DEFAULT_VERTICAL_UNITS: &str = "V";

/// Maximum number of points to render per line for performance
pub const MAX_RENDER_POINTS: usize = 4000;

fn default_sampling_period() -> f64 {
    DEFAULT_SAMPLING_PERIOD
}

fn default_vertical_scale() -> f64 {
    DEFAULT_VERTICAL_SCALE
}

fn default_vertical_units() -> String {
    DEFAULT_VERTICAL_UNITS.to_string()
}

/// Acquisition settings of a single channel export
///
/// Every field is always populated: values missing from the file (or from a
/// session JSON map) fall back to the `DEFAULT_*` constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformMetadata {
    /// Seconds per sample
    #[serde(default = "default_sampling_period")]
    pub sampling_period: f64,

    /// Volts per display division
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f64,

    /// Vertical position in volts
    #[serde(default)]
    pub vertical_position: f64,

    /// Unit label of the vertical axis
    #[serde(default = "default_vertical_units")]
    pub vertical_units: String,
}

impl Default for WaveformMetadata {
    fn default() -> Self {
        Self {
            sampling_period: DEFAULT_SAMPLING_PERIOD,
            vertical_scale: DEFAULT_VERTICAL_SCALE,
            vertical_position: DEFAULT_VERTICAL_POSITION,
            vertical_units: DEFAULT_VERTICAL_UNITS.to_string(),
        }
    }
}

/// The two CSV layouts exported by the instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CsvLayout {
    /// One raw ADC sample per line, uniform sample clock
    #[default]
    SingleColumn,
    /// Semicolon separated rows carrying explicit time and voltage columns
    MultiColumn,
}

impl CsvLayout {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CsvLayout::SingleColumn => "Single column",
            CsvLayout::MultiColumn => "Multi column",
        }
    }
}

/// One of the two display channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Ch1,
    Ch2,
}

impl Channel {
    /// Both channels in display order
    pub fn all() -> &'static [Channel] {
        &[Channel::Ch1, Channel::Ch2]
    }

    /// Short label used in the UI and in exports
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Ch1 => "CH1",
            Channel::Ch2 => "CH2",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Time/voltage samples of one channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaveformSeries {
    /// Sample timestamps in seconds
    pub time: Vec<f64>,
    /// Sample values in volts
    pub voltage: Vec<f64>,
    /// Acquisition settings
    pub metadata: WaveformMetadata,
    /// Layout the samples were read from
    pub layout: CsvLayout,
}

impl WaveformSeries {
    /// Create a series from paired arrays
    ///
    /// Returns `None` when the arrays differ in length.
    pub fn new(
        time: Vec<f64>,
        voltage: Vec<f64>,
        metadata: WaveformMetadata,
        layout: CsvLayout,
    ) -> Option<Self> {
        if time.len() != voltage.len() {
            return None;
        }
        Some(Self {
            time,
            voltage,
            metadata,
            layout,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check if the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Timestamp of the last sample, used as the time base of the display
    pub fn duration(&self) -> Option<f64> {
        self.time.last().copied()
    }

    /// Get data points for plotting (time, voltage pairs)
    pub fn as_plot_points(&self) -> Vec<[f64; 2]> {
        self.time
            .iter()
            .zip(self.voltage.iter())
            .map(|(&t, &v)| [t, v])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults() {
        let meta = WaveformMetadata::default();
        assert_eq!(meta.sampling_period, 1e-4);
        assert_eq!(meta.vertical_scale, 1.0);
        assert_eq!(meta.vertical_position, 0.0);
        assert_eq!(meta.vertical_units, "V");
    }

    #[test]
    fn test_partial_metadata_json() {
        let meta: WaveformMetadata =
            serde_json::from_str(r#"{"vertical_scale": 0.5, "extra": 1}"#).unwrap();
        assert_eq!(meta.vertical_scale, 0.5);
        assert_eq!(meta.sampling_period, DEFAULT_SAMPLING_PERIOD);
        assert_eq!(meta.vertical_units, "V");
    }

    #[test]
    fn test_series_length_check() {
        let meta = WaveformMetadata::default();
        assert!(WaveformSeries::new(vec![0.0, 1.0], vec![0.0], meta.clone(), CsvLayout::MultiColumn)
            .is_none());

        let series =
            WaveformSeries::new(vec![0.0, 1.0], vec![2.0, 3.0], meta, CsvLayout::MultiColumn)
                .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.duration(), Some(1.0));
        assert_eq!(series.as_plot_points(), vec![[0.0, 2.0], [1.0, 3.0]]);
    }

    #[test]
    fn test_empty_series() {
        let series = WaveformSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.duration(), None);
    }

    #[test]
    fn test_channel_labels() {
        assert_eq!(Channel::Ch1.to_string(), "CH1");
        assert_eq!(Channel::all().len(), 2);
    }
}
