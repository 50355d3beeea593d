//! Point export for spreadsheet and GeoGebra import
//!
//! Writes the displayed traces (offsets applied) as comma-separated text:
//!
//! ```text
//! Tiempo(s),CH1_Volt(V),CH2_Volt(V)
//! 0.000000,1.2500,-0.4000
//! ```
//!
//! Timestamps come from CH1 when loaded, else CH2. A CH2 shorter than the
//! time base is padded with zeros; longer CH2 data is cut to the base length.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::types::{Channel, WaveformSeries};
use crate::view::ViewSettings;

pub const TIME_HEADER: &str = "Tiempo(s)";
pub const CH1_HEADER: &str = "CH1_Volt(V)";
pub const CH2_HEADER: &str = "CH2_Volt(V)";

/// Traces and offsets to export
#[derive(Debug, Clone, Copy)]
pub struct ExportInput<'a> {
    pub ch1: Option<&'a WaveformSeries>,
    pub ch2: Option<&'a WaveformSeries>,
    pub view: &'a ViewSettings,
}

impl<'a> ExportInput<'a> {
    pub fn new(
        ch1: Option<&'a WaveformSeries>,
        ch2: Option<&'a WaveformSeries>,
        view: &'a ViewSettings,
    ) -> Self {
        Self { ch1, ch2, view }
    }

    fn header(&self) -> String {
        let mut headers = vec![TIME_HEADER];
        if self.ch1.is_some() {
            headers.push(CH1_HEADER);
        }
        if self.ch2.is_some() {
            headers.push(CH2_HEADER);
        }
        headers.join(",")
    }
}

/// Write the export text, returning the number of data rows
pub fn write_points<W: Write>(mut writer: W, input: &ExportInput<'_>) -> Result<usize, ExportError> {
    let base = input.ch1.or(input.ch2).ok_or(ExportError::NothingToExport)?;
    let view = input.view;
    let ch1_offset = view.position_offset(Channel::Ch1);
    let ch2_offset = view.position_offset(Channel::Ch2);

    writeln!(writer, "{}", input.header())?;

    for (i, t) in base.time.iter().enumerate() {
        let mut row = format!("{:.6}", t + view.time_trace_offset);
        if let Some(ch1) = input.ch1 {
            row.push_str(&format!(",{:.4}", ch1.voltage[i] + ch1_offset));
        }
        if let Some(ch2) = input.ch2 {
            let v = ch2.voltage.get(i).map_or(0.0, |v| v + ch2_offset);
            row.push_str(&format!(",{:.4}", v));
        }
        writeln!(writer, "{}", row)?;
    }

    writer.flush()?;
    Ok(base.len())
}

/// Export the traces to a file
pub fn export_points(path: impl AsRef<Path>, input: &ExportInput<'_>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    if input.ch1.is_none() && input.ch2.is_none() {
        return Err(ExportError::NothingToExport);
    }
    let writer = BufWriter::new(File::create(path)?);
    let rows = write_points(writer, input)?;
    tracing::info!("Exported {} points to {:?}", rows, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CsvLayout, WaveformMetadata};

    fn series(time: &[f64], voltage: &[f64]) -> WaveformSeries {
        WaveformSeries::new(
            time.to_vec(),
            voltage.to_vec(),
            WaveformMetadata::default(),
            CsvLayout::MultiColumn,
        )
        .unwrap()
    }

    fn render(input: &ExportInput<'_>) -> String {
        let mut out = Vec::new();
        write_points(&mut out, input).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_both_channels_with_padding() {
        let ch1 = series(&[0.0, 0.001, 0.002], &[1.0, 2.0, 3.0]);
        let ch2 = series(&[0.0, 0.001], &[-1.0, -2.0]);
        let view = ViewSettings::default();
        let text = render(&ExportInput::new(Some(&ch1), Some(&ch2), &view));
        assert_eq!(
            text,
            "Tiempo(s),CH1_Volt(V),CH2_Volt(V)\n\
             0.000000,1.0000,-1.0000\n\
             0.001000,2.0000,-2.0000\n\
             0.002000,3.0000,0.0000\n"
        );
    }

    #[test]
    fn test_offsets_applied() {
        let ch2 = series(&[0.5], &[1.0]);
        let view = ViewSettings {
            time_trace_offset: 0.25,
            ch2_pos_offset: -0.5,
            ..Default::default()
        };
        let text = render(&ExportInput::new(None, Some(&ch2), &view));
        assert_eq!(text, "Tiempo(s),CH2_Volt(V)\n0.750000,0.5000\n");
    }

    #[test]
    fn test_nothing_to_export() {
        let view = ViewSettings::default();
        let input = ExportInput::new(None, None, &view);
        assert!(matches!(
            write_points(Vec::new(), &input),
            Err(ExportError::NothingToExport)
        ));
    }
}
