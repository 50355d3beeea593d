//! Integration tests for parsing oscilloscope exports

mod common;

use common::assert_float_eq;
use common::builders::{square_counts, ExportBuilder};
use proptest::prelude::*;
use scopeview_rs::error::ParseError;
use scopeview_rs::{
    estimate_frequency, parse_csv, parse_file, parse_str, CsvLayout, ParserConfig,
    WaveformMetadata,
};

#[test]
fn test_single_column_scaling() {
    let text = ExportBuilder::single_column()
        .vertical_scale(2.0)
        .samples(std::iter::repeat(10).take(100))
        .build();

    let series = parse_str(&text, &ParserConfig::default()).unwrap();
    assert_eq!(series.len(), 100);
    assert_eq!(series.layout, CsvLayout::SingleColumn);
    for v in &series.voltage {
        assert_float_eq(*v, 0.8, 1e-12);
    }
}

#[test]
fn test_defaults_when_no_metadata() {
    let text = ExportBuilder::single_column().samples([1, 2, 3]).build();
    let series = parse_str(&text, &ParserConfig::default()).unwrap();

    assert_eq!(
        series.metadata,
        WaveformMetadata {
            sampling_period: 1e-4,
            vertical_scale: 1.0,
            vertical_position: 0.0,
            vertical_units: "V".to_string(),
        }
    );
    assert_eq!(series.time, vec![0.0, 1e-4, 2e-4]);
}

#[test]
fn test_synthesized_time_uses_sampling_period() {
    let text = ExportBuilder::single_column()
        .sampling_period(2e-6)
        .samples([0, 0, 0, 0])
        .build();
    let series = parse_str(&text, &ParserConfig::default()).unwrap();
    assert_float_eq(series.time[3], 6e-6, 1e-18);
    assert_eq!(series.duration(), Some(series.time[3]));
}

#[test]
fn test_single_column_skips_non_numeric_lines() {
    let text = ExportBuilder::single_column()
        .samples([5])
        .raw_row("")
        .raw_row("abc")
        .raw_row("1,024")
        .raw_row("-3.5e1")
        .raw_row("12 34")
        .build();
    let series = parse_str(&text, &ParserConfig::default()).unwrap();
    let expected: Vec<f64> = [5.0, 1024.0, -35.0]
        .iter()
        .map(|raw| raw * 4.0 / 100.0)
        .collect();
    assert_eq!(series.voltage, expected);
}

#[test]
fn test_multi_column_fields_verbatim() {
    let text = ExportBuilder::multi_column()
        .sampling_period(1e-3)
        .points([(0.0, 1.25), (0.001, -0.5)])
        .raw_row("1;2;3")
        .raw_row("x;y;z;bad;1.0")
        .points([(0.002, 3.0)])
        .build();

    let series = parse_str(&text, &ParserConfig::default()).unwrap();
    assert_eq!(series.layout, CsvLayout::MultiColumn);
    assert_eq!(series.time, vec![0.0, 0.001, 0.002]);
    assert_eq!(series.voltage, vec![1.25, -0.5, 3.0]);
    assert_eq!(series.metadata.sampling_period, 1e-3);
}

#[test]
fn test_strict_policy_requires_marker() {
    let text = ExportBuilder::single_column()
        .without_data_marker()
        .samples([1, 2])
        .build();

    let err = parse_str(&text, &ParserConfig::strict()).unwrap_err();
    assert!(matches!(err, ParseError::MissingDataMarker { .. }));

    let series = parse_str(&text, &ParserConfig::default()).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn test_lenient_skips_alphabetic_first_line() {
    let text = "Raw Samples\n7\n8\n";
    let series = parse_str(text, &ParserConfig::default()).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn test_case_insensitive_markers() {
    let text = "VERTICAL SCALE,0.5\nwaveform data\n100\n";
    let series = parse_str(text, &ParserConfig::default()).unwrap();
    assert_eq!(series.metadata.vertical_scale, 0.5);
    assert_float_eq(series.voltage[0], 2.0, 1e-12);
}

#[test]
fn test_parse_file_and_estimate() {
    let dir = tempfile::tempdir().unwrap();
    let path = ExportBuilder::single_column()
        .sampling_period(2e-6)
        .vertical_scale(0.5)
        .vertical_units("mV")
        .samples(square_counts(25, 5, 400))
        .write_to(dir.path(), "A0001CH1.CSV");

    let series = parse_csv(&path).unwrap();
    assert_eq!(series.metadata.vertical_units, "mV");
    assert_eq!(series.len(), 400);
    assert_eq!(
        estimate_frequency(&series.time, &series.voltage).to_string(),
        "50.000 kHz"
    );
}

#[test]
fn test_parse_file_bom_and_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bom.csv");
    let mut bytes = "\u{feff}Waveform Data\n1\n".as_bytes().to_vec();
    bytes.extend_from_slice(&[0xff, b'\n', b'2', b'\n']);
    std::fs::write(&path, bytes).unwrap();

    let series = parse_file(&path, &ParserConfig::strict()).unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_csv(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
}

proptest! {
    #[test]
    fn prop_single_column_lengths_match(samples in prop::collection::vec(-2048i64..2048, 0..300)) {
        let text = ExportBuilder::single_column().samples(samples.clone()).build();
        let series = parse_str(&text, &ParserConfig::default()).unwrap();
        prop_assert_eq!(series.time.len(), samples.len());
        prop_assert_eq!(series.voltage.len(), samples.len());
    }

    #[test]
    fn prop_multi_column_preserves_order(
        points in prop::collection::vec((-1e3f64..1e3, -50f64..50.0), 0..200)
    ) {
        let text = ExportBuilder::multi_column().points(points.clone()).build();
        let series = parse_str(&text, &ParserConfig::default()).unwrap();
        let time: Vec<f64> = points.iter().map(|p| p.0).collect();
        let voltage: Vec<f64> = points.iter().map(|p| p.1).collect();
        prop_assert_eq!(series.time, time);
        prop_assert_eq!(series.voltage, voltage);
    }
}
