//! Session data types

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SessionError;
use crate::types::{Channel, CsvLayout, WaveformMetadata, WaveformSeries};
use crate::view::ViewSettings;

/// One channel of a saved session
///
/// Key names follow the session files written by earlier releases of the
/// tool (`tiempo`, `voltaje`, `metadatos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Sample timestamps in seconds
    #[serde(rename = "tiempo", default)]
    pub time: Vec<f64>,
    /// Sample values in volts
    #[serde(rename = "voltaje", default)]
    pub voltage: Vec<f64>,
    /// Acquisition settings; missing keys take their defaults
    #[serde(rename = "metadatos", default)]
    pub metadata: WaveformMetadata,
}

impl ChannelRecord {
    /// Snapshot a parsed series
    pub fn from_series(series: &WaveformSeries) -> Self {
        Self {
            time: series.time.clone(),
            voltage: series.voltage.clone(),
            metadata: series.metadata.clone(),
        }
    }

    /// Rebuild a series from the stored arrays
    ///
    /// Stored timestamps are explicit, so the series is tagged
    /// [`CsvLayout::MultiColumn`].
    pub fn into_series(self, channel: Channel) -> Result<WaveformSeries, SessionError> {
        let (time_len, voltage_len) = (self.time.len(), self.voltage.len());
        WaveformSeries::new(self.time, self.voltage, self.metadata, CsvLayout::MultiColumn).ok_or(
            SessionError::LengthMismatch {
                channel: channel.label().to_string(),
                time: time_len,
                voltage: voltage_len,
            },
        )
    }
}

/// A complete saved session: view settings plus up to two channels
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionFile {
    /// Display parameters
    #[serde(default)]
    pub config: ViewSettings,
    #[serde(default)]
    pub ch1: Option<ChannelRecord>,
    #[serde(default)]
    pub ch2: Option<ChannelRecord>,
    /// When the session was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SessionFile {
    /// Capture the current view and channels
    pub fn capture(
        config: &ViewSettings,
        ch1: Option<&WaveformSeries>,
        ch2: Option<&WaveformSeries>,
    ) -> Self {
        Self {
            config: config.clone(),
            ch1: ch1.map(ChannelRecord::from_series),
            ch2: ch2.map(ChannelRecord::from_series),
            saved_at: Some(chrono::Utc::now()),
        }
    }

    /// Record of a channel, if saved
    pub fn channel(&self, channel: Channel) -> Option<&ChannelRecord> {
        match channel {
            Channel::Ch1 => self.ch1.as_ref(),
            Channel::Ch2 => self.ch2.as_ref(),
        }
    }

    /// Check if any channel data is present
    pub fn has_data(&self) -> bool {
        self.ch1.is_some() || self.ch2.is_some()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse session JSON
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save session to a file (JSON format)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load session from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
