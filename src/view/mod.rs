//! Display transforms for the two-channel plot
//!
//! All view state (zoom, offsets, common scale, visibility) lives in an
//! explicit [`ViewSettings`] value. The functions here are pure: they take a
//! series and the settings and return new plot coordinates, leaving the
//! parsed data untouched.
//!
//! # Axis Model
//!
//! - **Time axis**: the full record (time of the last sample of CH1, else
//!   CH2) is shown at `time_zoom = 1`; larger zoom narrows the window around
//!   `base / 2 + axis_time_offset`.
//! - **Voltage axes**: 10 V at `zoom = 1`, divided by the channel zoom and
//!   centred on `grid_offset_y`. With `common_scale` CH2 follows CH1.

pub mod cursor;
pub mod knob;

pub use cursor::{interpolate, CursorState};
pub use knob::Knob;

use serde::{Deserialize, Serialize};

use crate::types::{Channel, WaveformSeries};

/// Voltage span of a channel axis at unit zoom
pub const FULL_SCALE_VOLTS: f64 = 10.0;

/// Lower bound applied to the time zoom
pub const MIN_TIME_ZOOM: f64 = 0.001;

/// Zoom range of the channel and time knobs
pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 10.0;

/// Time window shown when no channel is loaded
pub const EMPTY_TIME_WINDOW: (f64, f64) = (0.0, 1.0);

fn default_one() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// User-chosen display parameters
///
/// Field names double as the `config` keys of a saved session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default = "default_one")]
    pub ch1_zoom: f64,
    #[serde(default = "default_one")]
    pub ch2_zoom: f64,
    #[serde(default)]
    pub ch1_pos_offset: f64,
    #[serde(default)]
    pub ch2_pos_offset: f64,
    #[serde(default = "default_one")]
    pub time_zoom: f64,
    /// Vertical offset of the grid centre line
    #[serde(default)]
    pub grid_offset_y: f64,
    /// Shift applied to every trace timestamp
    #[serde(default)]
    pub time_trace_offset: f64,
    /// Shift of the visible time window
    #[serde(default)]
    pub axis_time_offset: f64,
    /// Time of the pinned cursor
    #[serde(default)]
    pub cursor_t_paused: f64,
    /// CH2 uses the CH1 voltage scale
    #[serde(default)]
    pub common_scale: bool,
    #[serde(default = "default_true")]
    pub ch1_visible: bool,
    #[serde(default = "default_true")]
    pub ch2_visible: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            ch1_zoom: 1.0,
            ch2_zoom: 1.0,
            ch1_pos_offset: 0.0,
            ch2_pos_offset: 0.0,
            time_zoom: 1.0,
            grid_offset_y: 0.0,
            time_trace_offset: 0.0,
            axis_time_offset: 0.0,
            cursor_t_paused: 0.0,
            common_scale: false,
            ch1_visible: true,
            ch2_visible: true,
        }
    }
}

impl ViewSettings {
    /// Restore every parameter to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zoom factor of a channel
    pub fn zoom(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Ch1 => self.ch1_zoom,
            Channel::Ch2 => self.ch2_zoom,
        }
    }

    /// Set a channel zoom, clamped to the knob range
    ///
    /// In common-scale mode both channels take the new value.
    pub fn set_zoom(&mut self, channel: Channel, zoom: f64) {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        match channel {
            Channel::Ch1 => self.ch1_zoom = zoom,
            Channel::Ch2 => self.ch2_zoom = zoom,
        }
        if self.common_scale {
            self.ch1_zoom = zoom;
            self.ch2_zoom = zoom;
        }
    }

    /// Set the time zoom, clamped to the knob range
    pub fn set_time_zoom(&mut self, zoom: f64) {
        self.time_zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Vertical position offset of a channel
    pub fn position_offset(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Ch1 => self.ch1_pos_offset,
            Channel::Ch2 => self.ch2_pos_offset,
        }
    }

    pub fn set_position_offset(&mut self, channel: Channel, offset: f64) {
        match channel {
            Channel::Ch1 => self.ch1_pos_offset = offset,
            Channel::Ch2 => self.ch2_pos_offset = offset,
        }
    }

    pub fn is_visible(&self, channel: Channel) -> bool {
        match channel {
            Channel::Ch1 => self.ch1_visible,
            Channel::Ch2 => self.ch2_visible,
        }
    }

    pub fn set_visible(&mut self, channel: Channel, visible: bool) {
        match channel {
            Channel::Ch1 => self.ch1_visible = visible,
            Channel::Ch2 => self.ch2_visible = visible,
        }
    }

    /// Visible time range for a record whose last sample is at `base_time`
    pub fn time_window(&self, base_time: Option<f64>) -> (f64, f64) {
        let Some(base) = base_time else {
            return EMPTY_TIME_WINDOW;
        };
        let zoom = self.time_zoom.max(MIN_TIME_ZOOM);
        let window = base / zoom;
        let center = base / 2.0 + self.axis_time_offset;
        (center - window / 2.0, center + window / 2.0)
    }

    /// Voltage range of a channel axis
    pub fn y_limits(&self, channel: Channel) -> (f64, f64) {
        let zoom = if self.common_scale {
            self.ch1_zoom
        } else {
            self.zoom(channel)
        };
        let span = FULL_SCALE_VOLTS / zoom.max(MIN_ZOOM);
        (
            -span / 2.0 + self.grid_offset_y,
            span / 2.0 + self.grid_offset_y,
        )
    }

    /// Plot coordinates of a series with the trace and channel offsets applied
    pub fn display_trace(&self, series: &WaveformSeries, channel: Channel) -> Vec<[f64; 2]> {
        let dt = self.time_trace_offset;
        let dv = self.position_offset(channel);
        series
            .time
            .iter()
            .zip(series.voltage.iter())
            .map(|(&t, &v)| [t + dt, v + dv])
            .collect()
    }

    /// Map a value on a channel axis onto the CH1 axis
    ///
    /// The plot has a single vertical axis; CH2 is rescaled so that its own
    /// [`y_limits`](Self::y_limits) line up with those of CH1.
    pub fn to_primary_axis(&self, channel: Channel, value: f64) -> f64 {
        let (lo, hi) = self.y_limits(Channel::Ch1);
        let (clo, chi) = self.y_limits(channel);
        lo + (value - clo) * (hi - lo) / (chi - clo)
    }

    /// Trace value under the cursor at time `t`, as shown on screen
    ///
    /// Hidden channels have no readout.
    pub fn cursor_readout(&self, series: &WaveformSeries, channel: Channel, t: f64) -> Option<f64> {
        if !self.is_visible(channel) {
            return None;
        }
        let shifted = t - self.time_trace_offset;
        interpolate(shifted, &series.time, &series.voltage).map(|v| v + self.position_offset(channel))
    }
}

/// Time base of the display: last timestamp of CH1, else of CH2
pub fn time_base(ch1: Option<&WaveformSeries>, ch2: Option<&WaveformSeries>) -> Option<f64> {
    ch1.and_then(|s| s.duration())
        .or_else(|| ch2.and_then(|s| s.duration()))
}

/// Reduce a trace to at most `max_points` while keeping its envelope
///
/// Each bucket contributes its minimum and maximum in time order.
pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points || points.is_empty() {
        return points.to_vec();
    }
    if max_points < 2 {
        return points[..max_points].to_vec();
    }

    let bucket_size = points.len() / (max_points / 2).max(1);
    let mut result = Vec::with_capacity(max_points + 2);

    result.push(points[0]);

    for bucket in points[1..points.len().saturating_sub(1)].chunks(bucket_size.max(1)) {
        let (min_pt, max_pt) = bucket.iter().fold((bucket[0], bucket[0]), |(min, max), pt| {
            (
                if pt[1] < min[1] { *pt } else { min },
                if pt[1] > max[1] { *pt } else { max },
            )
        });
        if min_pt[0] < max_pt[0] {
            result.push(min_pt);
            result.push(max_pt);
        } else {
            result.push(max_pt);
            result.push(min_pt);
        }
    }

    if let Some(last) = points.last() {
        result.push(*last);
    }

    result
}
