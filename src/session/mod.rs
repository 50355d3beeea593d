//! Session save and restore
//!
//! A session stores the view settings together with the time/voltage
//! arrays and metadata of each loaded channel, so a measurement can be
//! reopened without the original CSV exports.
//!
//! Restoring a session rebuilds [`WaveformSeries`] values from the stored
//! arrays and recomputes each channel's frequency label; labels are never
//! stored.

pub mod types;

pub use types::{ChannelRecord, SessionFile};

use std::path::Path;

use crate::analysis::frequency_label;
use crate::error::SessionError;
use crate::types::{Channel, WaveformSeries};
use crate::view::ViewSettings;

/// A channel rebuilt from a session
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredChannel {
    pub series: WaveformSeries,
    pub frequency: String,
}

/// Everything needed to reopen a saved session
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSession {
    pub view: ViewSettings,
    pub ch1: Option<RestoredChannel>,
    pub ch2: Option<RestoredChannel>,
}

impl RestoredSession {
    /// Rebuild channels and frequency labels from a session file
    pub fn from_file(session: SessionFile) -> Result<Self, SessionError> {
        let restore = |record: Option<ChannelRecord>, channel: Channel| {
            record
                .map(|r| {
                    let series = r.into_series(channel)?;
                    let frequency = frequency_label(&series.time, &series.voltage);
                    Ok::<_, SessionError>(RestoredChannel { series, frequency })
                })
                .transpose()
        };

        Ok(Self {
            ch1: restore(session.ch1, Channel::Ch1)?,
            ch2: restore(session.ch2, Channel::Ch2)?,
            view: session.config,
        })
    }
}

/// Write the current view and channels to `path`
pub fn save_session(
    path: impl AsRef<Path>,
    view: &ViewSettings,
    ch1: Option<&WaveformSeries>,
    ch2: Option<&WaveformSeries>,
) -> Result<(), SessionError> {
    let path = path.as_ref();
    SessionFile::capture(view, ch1, ch2).save(path)?;
    tracing::info!("Saved session to {:?}", path);
    Ok(())
}

/// Load and rebuild a session from `path`
pub fn load_session(path: impl AsRef<Path>) -> Result<RestoredSession, SessionError> {
    let path = path.as_ref();
    let session = SessionFile::load(path)?;
    tracing::info!("Loaded session from {:?}", path);
    RestoredSession::from_file(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CsvLayout, WaveformMetadata};

    #[test]
    fn test_restore_recomputes_frequency() {
        let time: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let voltage = vec![1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0];
        let series =
            WaveformSeries::new(time, voltage, WaveformMetadata::default(), CsvLayout::MultiColumn)
                .unwrap();

        let file = SessionFile::capture(&ViewSettings::default(), None, Some(&series));
        let restored = RestoredSession::from_file(file).unwrap();

        assert!(restored.ch1.is_none());
        let ch2 = restored.ch2.unwrap();
        assert_eq!(ch2.series, series);
        assert_eq!(ch2.frequency, "0.25 Hz");
    }

    #[test]
    fn test_restore_rejects_mismatch() {
        let file = SessionFile {
            ch1: Some(ChannelRecord {
                time: vec![0.0],
                voltage: vec![],
                metadata: WaveformMetadata::default(),
            }),
            ..Default::default()
        };
        assert!(RestoredSession::from_file(file).is_err());
    }
}
