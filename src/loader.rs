//! Loading exports into display channels
//!
//! Two ways of bringing data in:
//!
//! - a single export file, placed in the first free channel slot
//! - an acquisition folder holding a `...CH1.CSV` / `...CH2.CSV` pair, where
//!   each file loads independently so a damaged CH2 does not block CH1
//!
//! Each loaded channel carries its frequency label, computed once at load.

use std::path::{Path, PathBuf};

use crate::analysis::frequency_label;
use crate::error::{ParseError, Result, ResultExt, ScopeViewError};
use crate::parser::{parse_file, ParserConfig};
use crate::types::{Channel, WaveformSeries};

/// File name suffix of the first channel in an acquisition folder
pub const CH1_SUFFIX: &str = "CH1.CSV";

/// File name suffix of the second channel in an acquisition folder
pub const CH2_SUFFIX: &str = "CH2.CSV";

/// A parsed channel ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedChannel {
    pub source: Option<PathBuf>,
    pub series: WaveformSeries,
    /// Cached frequency label
    pub frequency: String,
}

impl LoadedChannel {
    /// Wrap a series, computing its frequency label
    pub fn from_series(series: WaveformSeries, source: Option<PathBuf>) -> Self {
        let frequency = frequency_label(&series.time, &series.voltage);
        Self {
            source,
            series,
            frequency,
        }
    }
}

/// Parse one export file
pub fn load_channel(path: impl AsRef<Path>, config: &ParserConfig) -> Result<LoadedChannel> {
    let path = path.as_ref();
    let series = parse_file(path, config).with_context(|| format!("Loading {:?}", path))?;
    let channel = LoadedChannel::from_series(series, Some(path.to_path_buf()));
    tracing::info!(
        "Loaded {} samples from {:?} ({})",
        channel.series.len(),
        path,
        channel.frequency
    );
    Ok(channel)
}

/// Channel files found in an acquisition folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPair {
    pub ch1: Option<PathBuf>,
    pub ch2: Option<PathBuf>,
}

impl ChannelPair {
    pub fn is_empty(&self) -> bool {
        self.ch1.is_none() && self.ch2.is_none()
    }
}

/// Find the CH1/CH2 exports in a folder, matching suffixes case-insensitively
///
/// When several files share a suffix the last one in directory order wins.
pub fn find_channel_pair(dir: impl AsRef<Path>) -> Result<ChannelPair> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| ParseError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut pair = ChannelPair::default();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_uppercase()) else {
            continue;
        };
        if name.ends_with(CH1_SUFFIX) {
            pair.ch1 = Some(path);
        } else if name.ends_with(CH2_SUFFIX) {
            pair.ch2 = Some(path);
        }
    }
    Ok(pair)
}

/// Outcome of loading an acquisition folder
#[derive(Debug)]
pub struct DirectoryLoad {
    /// `None` when the folder has no file for the channel
    pub ch1: Option<Result<LoadedChannel>>,
    pub ch2: Option<Result<LoadedChannel>>,
}

/// Load both channel files of an acquisition folder
pub fn load_directory(dir: impl AsRef<Path>, config: &ParserConfig) -> Result<DirectoryLoad> {
    let pair = find_channel_pair(&dir)?;
    if pair.is_empty() {
        tracing::warn!("No channel exports found in {:?}", dir.as_ref());
    }

    let load = |path: Option<PathBuf>| {
        path.map(|p| {
            load_channel(&p, config).inspect_err(|e| tracing::warn!("{}", e))
        })
    };

    Ok(DirectoryLoad {
        ch1: load(pair.ch1),
        ch2: load(pair.ch2),
    })
}

/// The two display channel slots
#[derive(Debug, Clone, Default)]
pub struct ChannelSlots {
    pub ch1: Option<LoadedChannel>,
    pub ch2: Option<LoadedChannel>,
}

impl ChannelSlots {
    /// Place a channel in CH1 if free, otherwise in CH2
    ///
    /// Returns the slot used. An occupied CH2 is replaced.
    pub fn assign(&mut self, channel: LoadedChannel) -> Channel {
        if self.ch1.is_none() {
            self.ch1 = Some(channel);
            Channel::Ch1
        } else {
            self.ch2 = Some(channel);
            Channel::Ch2
        }
    }

    pub fn get(&self, channel: Channel) -> Option<&LoadedChannel> {
        match channel {
            Channel::Ch1 => self.ch1.as_ref(),
            Channel::Ch2 => self.ch2.as_ref(),
        }
    }

    pub fn set(&mut self, channel: Channel, loaded: Option<LoadedChannel>) {
        match channel {
            Channel::Ch1 => self.ch1 = loaded,
            Channel::Ch2 => self.ch2 = loaded,
        }
    }

    pub fn series(&self, channel: Channel) -> Option<&WaveformSeries> {
        self.get(channel).map(|c| &c.series)
    }

    pub fn clear(&mut self) {
        self.ch1 = None;
        self.ch2 = None;
    }

    pub fn has_data(&self) -> bool {
        self.ch1.is_some() || self.ch2.is_some()
    }

    /// Time base of the display: last timestamp of CH1, else of CH2
    pub fn time_base(&self) -> Option<f64> {
        crate::view::time_base(self.series(Channel::Ch1), self.series(Channel::Ch2))
    }

    /// Replace both slots with the outcome of a folder load
    ///
    /// Failed channels are left empty; their errors are returned.
    pub fn replace_from(&mut self, load: DirectoryLoad) -> Vec<(Channel, ScopeViewError)> {
        self.clear();
        let mut errors = Vec::new();
        for (channel, outcome) in [(Channel::Ch1, load.ch1), (Channel::Ch2, load.ch2)] {
            match outcome {
                Some(Ok(loaded)) => self.set(channel, Some(loaded)),
                Some(Err(e)) => errors.push((channel, e)),
                None => {}
            }
        }
        errors
    }
}
