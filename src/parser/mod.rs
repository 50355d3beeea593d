//! Oscilloscope CSV export parser
//!
//! Reads the line-oriented CSV dumps written by the instrument and turns
//! them into a [`WaveformSeries`]. Two layouts are recognized:
//!
//! - **Single column**: a metadata header, a `Waveform Data` marker, then one
//!   raw ADC sample per line. Samples are converted to volts with
//!   `raw * vertical_scale * 4 / 100` and timestamped with a uniform clock of
//!   `sampling_period`.
//! - **Multi column**: a header naming a time column and `Ch1 (V)` /
//!   `Ch2 (V)`, followed by `;` separated rows whose fields 3 and 4 hold time
//!   and voltage.
//!
//! Header markers are matched through the table in [`markers`].
//!
//! # Missing data marker
//!
//! [`DataMarkerPolicy::Lenient`] (the default) starts reading samples at the
//! first line, or the second one if the first contains letters.
//! [`DataMarkerPolicy::Strict`] rejects the file instead.
//!
//! Rows that do not parse are skipped; a damaged file still yields every
//! recoverable sample.

pub mod markers;

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{CsvLayout, WaveformMetadata, WaveformSeries};
use markers::{MarkerField, MarkerValue, DATA_MARKER};

/// Volts per raw ADC count per volt/div of the single column layout
pub const ADC_VOLTS_PER_DIV: f64 = 4.0;

/// Raw count divisor of the single column layout
pub const ADC_COUNT_DIVISOR: f64 = 100.0;

/// Minimum number of `;` fields of a multi column data row
pub const MULTI_COLUMN_MIN_FIELDS: usize = 5;

/// Field index of the time column in multi column rows
pub const TIME_FIELD: usize = 3;

/// Field index of the voltage column in multi column rows
pub const VOLTAGE_FIELD: usize = 4;

static SAMPLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[0-9]+\.?[0-9]*([Ee][+-]?[0-9]+)?$").expect("sample pattern is valid")
});

static ALPHABETIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z]").expect("alphabetic pattern is valid"));

/// Result type of the parser
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Behavior when the export has no `Waveform Data` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DataMarkerPolicy {
    /// Guess where the samples start
    #[default]
    Lenient,
    /// Fail with [`ParseError::MissingDataMarker`]
    Strict,
}

impl DataMarkerPolicy {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DataMarkerPolicy::Lenient => "Lenient",
            DataMarkerPolicy::Strict => "Strict",
        }
    }

    /// Get all policies
    pub fn all() -> &'static [DataMarkerPolicy] {
        &[DataMarkerPolicy::Lenient, DataMarkerPolicy::Strict]
    }
}

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParserConfig {
    #[serde(default)]
    pub data_marker_policy: DataMarkerPolicy,
}

impl ParserConfig {
    /// Configuration that rejects exports without a data marker
    pub fn strict() -> Self {
        Self {
            data_marker_policy: DataMarkerPolicy::Strict,
        }
    }
}

/// Metadata values collected during the header scan
#[derive(Debug, Default)]
struct HeaderScan {
    sampling_period: Option<f64>,
    vertical_scale: Option<f64>,
    vertical_position: Option<f64>,
    vertical_units: Option<String>,
    layout: CsvLayout,
    data_start: Option<usize>,
}

impl HeaderScan {
    fn apply(&mut self, field: MarkerField, value: MarkerValue) {
        match (field, value) {
            (MarkerField::SamplingPeriod, MarkerValue::Number(v)) => {
                self.sampling_period = positive(field, v).or(self.sampling_period)
            }
            (MarkerField::VerticalScale, MarkerValue::Number(v)) => {
                self.vertical_scale = positive(field, v).or(self.vertical_scale)
            }
            (MarkerField::VerticalPosition, MarkerValue::Number(v)) => {
                self.vertical_position = v.or(self.vertical_position)
            }
            (MarkerField::VerticalUnits, MarkerValue::Text(units)) => {
                if !units.is_empty() {
                    self.vertical_units = Some(units);
                }
            }
            (MarkerField::LayoutHeader, MarkerValue::ChannelColumns(true)) => {
                self.layout = CsvLayout::MultiColumn;
            }
            _ => {}
        }
    }

    fn metadata(&self) -> WaveformMetadata {
        let defaults = WaveformMetadata::default();
        WaveformMetadata {
            sampling_period: self.sampling_period.unwrap_or(defaults.sampling_period),
            vertical_scale: self.vertical_scale.unwrap_or(defaults.vertical_scale),
            vertical_position: self.vertical_position.unwrap_or(defaults.vertical_position),
            vertical_units: self
                .vertical_units
                .clone()
                .unwrap_or(defaults.vertical_units),
        }
    }
}

fn scan_header<S: AsRef<str>>(lines: &[S]) -> HeaderScan {
    let mut scan = HeaderScan::default();

    for (index, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let Some(found) = markers::classify_line(line) else {
            continue;
        };

        if found.field == MarkerField::DataStart {
            scan.data_start = Some(index + 1);
            break;
        }

        if found.value == MarkerValue::Number(None) {
            tracing::debug!("Marker {:?} without a numeric value: {:?}", found.field, line);
        }
        scan.apply(found.field, found.value);
    }

    scan
}

/// Sampling period and vertical scale must be strictly positive
fn positive(field: MarkerField, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v <= 0.0 => {
            tracing::debug!("Ignoring non-positive {:?} value {}", field, v);
            None
        }
        other => other,
    }
}

/// Where samples start when the data marker is missing
fn fallback_data_start<S: AsRef<str>>(lines: &[S]) -> usize {
    match lines.first() {
        Some(first) if ALPHABETIC.is_match(first.as_ref()) => 1,
        _ => 0,
    }
}

/// Parse the lines of an export
pub fn parse_lines<S: AsRef<str>>(lines: &[S], config: &ParserConfig) -> ParseResult<WaveformSeries> {
    let scan = scan_header(lines);

    let data_start = match (scan.data_start, config.data_marker_policy) {
        (Some(start), _) => start,
        (None, DataMarkerPolicy::Strict) => {
            return Err(ParseError::MissingDataMarker {
                marker: DATA_MARKER,
            })
        }
        (None, DataMarkerPolicy::Lenient) => {
            let start = fallback_data_start(lines);
            tracing::warn!(
                "No '{}' marker found, reading samples from line {}",
                DATA_MARKER,
                start
            );
            start
        }
    };

    let metadata = scan.metadata();
    let data = lines.get(data_start..).unwrap_or(&[]);

    let series = match scan.layout {
        CsvLayout::MultiColumn => parse_multi_column(data, metadata),
        CsvLayout::SingleColumn => parse_single_column(data, metadata),
    };

    tracing::debug!(
        "Parsed {} samples ({})",
        series.len(),
        series.layout.display_name()
    );
    Ok(series)
}

/// Parse an export held in memory
pub fn parse_str(text: &str, config: &ParserConfig) -> ParseResult<WaveformSeries> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().collect();
    parse_lines(&lines, config)
}

/// Read and parse an export from disk
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
pub fn parse_file(path: impl AsRef<Path>, config: &ParserConfig) -> ParseResult<WaveformSeries> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    tracing::info!("Parsing waveform export {:?}", path);
    parse_str(&text, config)
}

/// Read and parse an export with the default lenient configuration
pub fn parse_csv(path: impl AsRef<Path>) -> ParseResult<WaveformSeries> {
    parse_file(path, &ParserConfig::default())
}

fn parse_multi_column<S: AsRef<str>>(data: &[S], metadata: WaveformMetadata) -> WaveformSeries {
    let mut time = Vec::with_capacity(data.len());
    let mut voltage = Vec::with_capacity(data.len());
    let mut skipped = 0usize;

    for raw in data {
        match parse_multi_column_row(raw.as_ref()) {
            Some((t, v)) => {
                time.push(t);
                voltage.push(v);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} malformed multi column rows", skipped);
    }
    if time.windows(2).any(|w| w[1] < w[0]) {
        tracing::warn!("Time column is not monotonic; keeping file order");
    }

    WaveformSeries {
        time,
        voltage,
        metadata,
        layout: CsvLayout::MultiColumn,
    }
}

fn parse_multi_column_row(line: &str) -> Option<(f64, f64)> {
    let fields: Vec<&str> = line.trim().split(';').collect();
    if fields.len() < MULTI_COLUMN_MIN_FIELDS {
        return None;
    }
    let t = fields[TIME_FIELD].trim().parse::<f64>().ok()?;
    let v = fields[VOLTAGE_FIELD].trim().parse::<f64>().ok()?;
    Some((t, v))
}

fn parse_single_column<S: AsRef<str>>(data: &[S], metadata: WaveformMetadata) -> WaveformSeries {
    let raw_samples: Vec<f64> = data
        .iter()
        .filter_map(|raw| parse_raw_sample(raw.as_ref()))
        .collect();

    let scale = metadata.vertical_scale;
    let period = metadata.sampling_period;

    let voltage = raw_samples
        .iter()
        .map(|&raw| raw * scale * ADC_VOLTS_PER_DIV / ADC_COUNT_DIVISOR)
        .collect();
    let time = (0..raw_samples.len()).map(|i| i as f64 * period).collect();

    WaveformSeries {
        time,
        voltage,
        metadata,
        layout: CsvLayout::SingleColumn,
    }
}

fn parse_raw_sample(line: &str) -> Option<f64> {
    let cleaned = line.trim().replace(',', "");
    if !SAMPLE_PATTERN.is_match(&cleaned) {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn test_single_column_scaling() {
        let text = "Vertical Scale,2.0\nSampling Period,1e-3\nWaveform Data,\n10\n-5\n";
        let series = parse_str(text, &lenient()).unwrap();

        assert_eq!(series.layout, CsvLayout::SingleColumn);
        assert_eq!(series.voltage, vec![0.8, -0.4]);
        assert_eq!(series.time, vec![0.0, 1e-3]);
        assert_eq!(series.metadata.vertical_scale, 2.0);
    }

    #[test]
    fn test_single_column_skips_non_numeric() {
        let text = "Waveform Data\n1\nabc\n\n2.5\n+3\n.5\n1e3\n";
        let series = parse_str(text, &lenient()).unwrap();
        // "+3" and ".5" are not accepted by the sample pattern
        assert_eq!(series.len(), 3);
        assert_eq!(series.voltage[2], 1e3 * 4.0 / 100.0);
    }

    #[test]
    fn test_single_column_strips_commas() {
        let series = parse_str("Waveform Data\n12,\n-7,\n", &lenient()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.voltage[0], 12.0 * 4.0 / 100.0);
    }

    #[test]
    fn test_multi_column_rows() {
        let text = "\
Vertical Units,V
Index;Date;Clock;Tiempo(s);Ch1 (V)
Waveform Data
0;x;y;0.000;1.5
1;x;y;0.001
2;x;y;bad;1.0
3;x;y; 0.002 ; -1.5
";
        let series = parse_str(text, &lenient()).unwrap();
        assert_eq!(series.layout, CsvLayout::MultiColumn);
        assert_eq!(series.time, vec![0.0, 0.002]);
        assert_eq!(series.voltage, vec![1.5, -1.5]);
    }

    #[test]
    fn test_defaults_when_markers_missing() {
        let series = parse_str("Waveform Data\n1\n2\n", &lenient()).unwrap();
        assert_eq!(series.metadata, WaveformMetadata::default());
    }

    #[test]
    fn test_empty_data_section() {
        let series = parse_str("Vertical Scale,1\nWaveform Data\n", &lenient()).unwrap();
        assert!(series.is_empty());
        assert!(series.voltage.is_empty());
    }

    #[test]
    fn test_strict_requires_marker() {
        let err = parse_str("1\n2\n3\n", &ParserConfig::strict()).unwrap_err();
        assert!(matches!(err, ParseError::MissingDataMarker { .. }));
    }

    #[test]
    fn test_lenient_fallback_skips_header_line() {
        let series = parse_str("value\n1\n2\n", &lenient()).unwrap();
        assert_eq!(series.len(), 2);

        let series = parse_str("1\n2\n", &lenient()).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_lenient_empty_input() {
        let series = parse_str("", &lenient()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.metadata, WaveformMetadata::default());
    }

    #[test]
    fn test_unparsable_metadata_keeps_default() {
        let series = parse_str("Vertical Scale,n/a\nWaveform Data\n10\n", &lenient()).unwrap();
        assert_eq!(series.metadata.vertical_scale, 1.0);
    }

    #[test]
    fn test_non_finite_metadata_keeps_default() {
        for value in ["NaN", "inf", "-inf"] {
            let text = format!("Sampling Period,{value}\nVertical Scale,{value}\nWaveform Data\n10\n20\n");
            let series = parse_str(&text, &lenient()).unwrap();
            assert_eq!(series.metadata.sampling_period, 1e-4, "{value}");
            assert_eq!(series.metadata.vertical_scale, 1.0, "{value}");
            assert!(series.time.iter().all(|t| t.is_finite()));
        }
    }

    #[test]
    fn test_non_positive_metadata_keeps_default() {
        let text = "Sampling Period,0\nVertical Scale,-2\nWaveform Data\n10\n20\n";
        let series = parse_str(text, &lenient()).unwrap();
        assert_eq!(series.metadata.sampling_period, 1e-4);
        assert_eq!(series.metadata.vertical_scale, 1.0);
        assert_eq!(series.time, vec![0.0, 1e-4]);
    }

    #[test]
    fn test_negative_vertical_position_is_kept() {
        let series = parse_str("Vertical Position,-1.5\nWaveform Data\n10\n", &lenient()).unwrap();
        assert_eq!(series.metadata.vertical_position, -1.5);
    }

    #[test]
    fn test_header_scan_stops_at_data_marker() {
        let text = "Waveform Data\nVertical Scale,5.0\n10\n";
        let series = parse_str(text, &lenient()).unwrap();
        assert_eq!(series.metadata.vertical_scale, 1.0);
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_byte_order_mark() {
        let series = parse_str("\u{feff}Vertical Scale,2\nWaveform Data\n10\n", &lenient()).unwrap();
        assert_eq!(series.metadata.vertical_scale, 2.0);
    }
}
