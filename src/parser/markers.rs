//! Table-driven marker matching for export headers
//!
//! Each non-blank header line is tested against [`MARKER_TABLE`] in order
//! and classified by the first rule whose pattern occurs anywhere in the
//! line. Patterns are case-insensitive and allow any amount of whitespace
//! between the words of a marker.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// What a matched marker line contributes to the parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerField {
    SamplingPeriod,
    VerticalScale,
    VerticalPosition,
    VerticalUnits,
    /// Column header of the semicolon layout
    LayoutHeader,
    /// Start of the sample section
    DataStart,
}

/// How the value of a marker line is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRule {
    /// First whitespace token after removing the marker, `;` and `,`
    FirstNumber,
    /// Second comma field after removing the marker and `;`, else the first
    CommaField,
    /// Whether the line names a `Ch1 (V)` / `Ch2 (V)` column
    ChannelColumns,
    /// The marker carries no value
    Flag,
}

/// One entry of the marker table
#[derive(Debug, Clone, Copy)]
pub struct MarkerRule {
    /// Human readable marker name
    pub name: &'static str,
    /// Regex source, matched case-insensitively
    pub pattern: &'static str,
    pub field: MarkerField,
    pub value: ValueRule,
}

/// Marker text of the data section
pub const DATA_MARKER: &str = "Waveform Data";

/// Header markers in match priority order
pub const MARKER_TABLE: &[MarkerRule] = &[
    MarkerRule {
        name: "Sampling Period",
        pattern: r"sampling\s*period",
        field: MarkerField::SamplingPeriod,
        value: ValueRule::FirstNumber,
    },
    MarkerRule {
        name: "Vertical Scale",
        pattern: r"vertical\s*scale",
        field: MarkerField::VerticalScale,
        value: ValueRule::FirstNumber,
    },
    MarkerRule {
        name: "Vertical Position",
        pattern: r"vertical\s*position",
        field: MarkerField::VerticalPosition,
        value: ValueRule::FirstNumber,
    },
    MarkerRule {
        name: "Vertical Units",
        pattern: r"vertical\s*units",
        field: MarkerField::VerticalUnits,
        value: ValueRule::CommaField,
    },
    MarkerRule {
        name: "Time column header",
        pattern: r"tiempo\s*\(\s*s\s*\)|time",
        field: MarkerField::LayoutHeader,
        value: ValueRule::ChannelColumns,
    },
    MarkerRule {
        name: DATA_MARKER,
        pattern: r"waveform\s*data",
        field: MarkerField::DataStart,
        value: ValueRule::Flag,
    },
];

static CHANNEL_COLUMN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"ch\s*[12]\s*\(\s*v\s*\)")
        .case_insensitive(true)
        .build()
        .expect("channel column pattern is valid")
});

struct CompiledRule {
    rule: &'static MarkerRule,
    regex: Regex,
}

static COMPILED_TABLE: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    MARKER_TABLE
        .iter()
        .map(|rule| CompiledRule {
            rule,
            regex: RegexBuilder::new(rule.pattern)
                .case_insensitive(true)
                .build()
                .expect("marker table patterns are valid"),
        })
        .collect()
});

/// Value carried by a classified line
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerValue {
    Number(Option<f64>),
    Text(String),
    ChannelColumns(bool),
    Flag,
}

/// A header line matched by a marker rule
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerMatch {
    pub field: MarkerField,
    pub value: MarkerValue,
}

/// Classify a trimmed, non-blank line against the marker table
pub fn classify_line(line: &str) -> Option<MarkerMatch> {
    let compiled = COMPILED_TABLE.iter().find(|c| c.regex.is_match(line))?;
    let remainder = compiled.regex.replace_all(line, "");

    let value = match compiled.rule.value {
        ValueRule::FirstNumber => MarkerValue::Number(first_number(&remainder)),
        ValueRule::CommaField => MarkerValue::Text(comma_field(&remainder)),
        ValueRule::ChannelColumns => MarkerValue::ChannelColumns(CHANNEL_COLUMN.is_match(line)),
        ValueRule::Flag => MarkerValue::Flag,
    };

    Some(MarkerMatch {
        field: compiled.rule.field,
        value,
    })
}

fn first_number(remainder: &str) -> Option<f64> {
    let cleaned = remainder.replace(';', "").replace(',', " ");
    cleaned
        .split_whitespace()
        .next()?
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
}

fn comma_field(remainder: &str) -> String {
    let cleaned = remainder.replace(';', "");
    let parts: Vec<&str> = cleaned.split(',').collect();
    let field = if parts.len() > 1 { parts[1] } else { parts[0] };
    field.trim().to_string()
}
