//! Rotary control model
//!
//! A knob turns pointer drag or wheel steps into bounded value changes. The
//! front end draws it; this type only holds the numbers.

/// Wheel notch expressed in drag units
pub const SCROLL_STEP: f64 = 5.0;

/// Sensitivity of the volts/div and time/div knobs
pub const ZOOM_SENSITIVITY: f64 = 0.05;

/// Sensitivity of the grid offset knob
pub const GRID_SENSITIVITY: f64 = 0.1;

/// Position sensitivity before any channel is loaded
pub const DEFAULT_POSITION_SENSITIVITY: f64 = 0.1;

/// Time offset sensitivity before any channel is loaded
pub const DEFAULT_TIME_SENSITIVITY: f64 = 0.01;

/// Bounded, step-driven control value
#[derive(Debug, Clone, PartialEq)]
pub struct Knob {
    pub value: f64,
    /// Value change per drag unit
    pub sensitivity: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Knob {
    /// Unbounded knob
    pub fn new(value: f64, sensitivity: f64) -> Self {
        Self {
            value,
            sensitivity,
            min: None,
            max: None,
        }
    }

    /// Knob clamped to `[min, max]`
    pub fn bounded(value: f64, sensitivity: f64, min: f64, max: f64) -> Self {
        let mut knob = Self {
            value,
            sensitivity,
            min: Some(min),
            max: Some(max),
        };
        knob.value = knob.clamp(value);
        knob
    }

    fn clamp(&self, value: f64) -> f64 {
        let value = self.min.map_or(value, |min| value.max(min));
        self.max.map_or(value, |max| value.min(max))
    }

    /// Volts/div or time/div knob over the zoom range
    pub fn zoom(value: f64) -> Self {
        Self::bounded(
            value,
            ZOOM_SENSITIVITY,
            crate::view::MIN_ZOOM,
            crate::view::MAX_ZOOM,
        )
    }

    /// Apply a drag of `delta` units, returning the actual change
    pub fn step(&mut self, delta: f64) -> f64 {
        let new_value = self.clamp(self.value + delta * self.sensitivity);
        let change = new_value - self.value;
        self.value = new_value;
        change
    }

    /// Apply one wheel notch
    pub fn scroll(&mut self, up: bool) -> f64 {
        self.step(if up { SCROLL_STEP } else { -SCROLL_STEP })
    }

    /// Set an explicit value, returning the actual change
    pub fn set(&mut self, value: f64) -> f64 {
        let new_value = self.clamp(value);
        let change = new_value - self.value;
        self.value = new_value;
        change
    }
}

/// Position knob sensitivity for a channel with the given volts/div
pub fn position_sensitivity(vertical_scale: f64) -> f64 {
    vertical_scale / 10.0
}

/// Time offset knob sensitivity for a record of the given length
pub fn time_sensitivity(time_base: f64) -> f64 {
    time_base / 200.0
}
