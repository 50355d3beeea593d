//! Builders for oscilloscope export files

use std::path::{Path, PathBuf};

/// Builder for export text in either layout
pub struct ExportBuilder {
    header: Vec<String>,
    data_marker: bool,
    multi_column: bool,
    rows: Vec<String>,
}

impl ExportBuilder {
    /// Single-column export of raw ADC counts
    pub fn single_column() -> Self {
        Self {
            header: Vec::new(),
            data_marker: true,
            multi_column: false,
            rows: Vec::new(),
        }
    }

    /// Multi-column export with explicit time and voltage columns
    pub fn multi_column() -> Self {
        Self {
            multi_column: true,
            ..Self::single_column()
        }
    }

    pub fn sampling_period(self, period: f64) -> Self {
        self.header_line(format!("Sampling Period,{:e}", period))
    }

    pub fn vertical_scale(self, scale: f64) -> Self {
        self.header_line(format!("Vertical Scale,{}", scale))
    }

    pub fn vertical_units(self, units: &str) -> Self {
        self.header_line(format!("Vertical Units,{}", units))
    }

    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    pub fn without_data_marker(mut self) -> Self {
        self.data_marker = false;
        self
    }

    /// Raw sample rows for a single-column export
    pub fn samples<I: IntoIterator<Item = i64>>(mut self, samples: I) -> Self {
        self.rows
            .extend(samples.into_iter().map(|s| s.to_string()));
        self
    }

    /// `(time, voltage)` rows for a multi-column export
    pub fn points<I: IntoIterator<Item = (f64, f64)>>(mut self, points: I) -> Self {
        self.rows.extend(
            points
                .into_iter()
                .enumerate()
                .map(|(i, (t, v))| format!("{};0;0;{};{}", i, t, v)),
        );
        self
    }

    /// Append a row verbatim
    pub fn raw_row(mut self, row: impl Into<String>) -> Self {
        self.rows.push(row.into());
        self
    }

    pub fn build(&self) -> String {
        let mut lines = self.header.clone();
        if self.multi_column {
            lines.push("Index;Source;Mode;Tiempo(s);Ch1 (V)".to_string());
        }
        if self.data_marker {
            lines.push("Waveform Data".to_string());
        }
        lines.extend(self.rows.iter().cloned());
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Write the export to `dir/name`
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).expect("write export fixture");
        path
    }
}

/// Raw counts of a square wave alternating every `half_period` samples
pub fn square_counts(amplitude: i64, half_period: usize, n: usize) -> Vec<i64> {
    (0..n)
        .map(|i| if (i / half_period) % 2 == 0 { amplitude } else { -amplitude })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_layout() {
        let text = ExportBuilder::single_column()
            .sampling_period(2e-6)
            .samples([1, -1])
            .build();
        assert_eq!(text, "Sampling Period,2e-6\nWaveform Data\n1\n-1\n");
    }

    #[test]
    fn test_multi_column_rows() {
        let text = ExportBuilder::multi_column().points([(0.5, 1.5)]).build();
        assert!(text.contains("Tiempo(s)"));
        assert!(text.ends_with("0;0;0;0.5;1.5\n"));
    }
}
