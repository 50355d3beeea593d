//! Vertical time cursor with an optional pinned position

use crate::types::Channel;

/// Piecewise-linear interpolation of `ys` over increasing `xs`
///
/// Values outside the sampled range clamp to the first/last sample.
/// Returns `None` for empty input or a NaN query.
pub fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 || x.is_nan() {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);

    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[n - 1] {
        return Some(ys[n - 1]);
    }

    let idx = xs.partition_point(|&v| v <= x);
    let (x0, x1) = (xs[idx - 1], xs[idx]);
    let (y0, y1) = (ys[idx - 1], ys[idx]);
    if x1 == x0 {
        return Some(y0);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

/// Cursor position tracking
///
/// While unpinned the cursor follows the pointer. Pinning freezes it at the
/// last pointer time; the pinned time can then be edited numerically.
#[derive(Debug, Clone, Default)]
pub struct CursorState {
    /// Pointer time over the plot, if hovering
    pub hover_time: Option<f64>,
    /// Frozen cursor time
    pub pinned_time: f64,
    pinned: bool,
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Release a pinned cursor, keeping the last pinned time
    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// Toggle the pinned state
    ///
    /// Pinning with no data loaded pins at `0.0`.
    pub fn toggle_pin(&mut self, has_data: bool) {
        self.pinned = !self.pinned;
        if self.pinned {
            self.pinned_time = if has_data {
                self.hover_time.unwrap_or(self.pinned_time)
            } else {
                0.0
            };
        }
    }

    /// Set the pinned time from user text
    ///
    /// Returns `false` and leaves the cursor unchanged when the text is not a
    /// number.
    pub fn set_pinned_text(&mut self, text: &str) -> bool {
        match text.trim().parse::<f64>() {
            Ok(t) if t.is_finite() => {
                self.pinned_time = t;
                true
            }
            _ => false,
        }
    }

    /// Time the cursor currently marks
    pub fn time(&self) -> Option<f64> {
        if self.pinned {
            Some(self.pinned_time)
        } else {
            self.hover_time
        }
    }

    /// Time readout label
    pub fn time_label(&self) -> String {
        match self.time() {
            Some(t) => format!("T: {:.6} s", t),
            None => "T: --".to_string(),
        }
    }
}

/// Channel readout label for a cursor value
pub fn readout_label(channel: Channel, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}: {:.3} V", channel.label(), v),
        None => format!("{}: --", channel.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_inside() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 0.0];
        assert_eq!(interpolate(0.5, &xs, &ys), Some(5.0));
        assert_eq!(interpolate(1.0, &xs, &ys), Some(10.0));
        assert_eq!(interpolate(1.25, &xs, &ys), Some(7.5));
    }

    #[test]
    fn test_interpolate_clamps() {
        let xs = [1.0, 2.0];
        let ys = [3.0, 4.0];
        assert_eq!(interpolate(-5.0, &xs, &ys), Some(3.0));
        assert_eq!(interpolate(9.0, &xs, &ys), Some(4.0));
    }

    #[test]
    fn test_interpolate_degenerate() {
        assert_eq!(interpolate(0.0, &[], &[]), None);
        assert_eq!(interpolate(f64::NAN, &[0.0], &[1.0]), None);
        assert_eq!(interpolate(3.0, &[0.0], &[1.0]), Some(1.0));
    }

    #[test]
    fn test_pin_follows_hover() {
        let mut cursor = CursorState::new();
        cursor.hover_time = Some(0.25);
        cursor.toggle_pin(true);
        assert!(cursor.is_pinned());
        assert_eq!(cursor.time(), Some(0.25));

        cursor.hover_time = Some(0.75);
        assert_eq!(cursor.time(), Some(0.25));

        cursor.toggle_pin(true);
        assert_eq!(cursor.time(), Some(0.75));
    }

    #[test]
    fn test_pin_without_data() {
        let mut cursor = CursorState::new();
        cursor.hover_time = Some(0.25);
        cursor.toggle_pin(false);
        assert_eq!(cursor.time(), Some(0.0));
    }

    #[test]
    fn test_unpin() {
        let mut cursor = CursorState::new();
        cursor.hover_time = Some(0.25);
        cursor.toggle_pin(true);
        cursor.unpin();
        assert!(!cursor.is_pinned());
        assert_eq!(cursor.pinned_time, 0.25);
        cursor.unpin();
        assert!(!cursor.is_pinned());
    }

    #[test]
    fn test_pinned_text() {
        let mut cursor = CursorState::new();
        assert!(cursor.set_pinned_text(" 0.001 "));
        assert_eq!(cursor.pinned_time, 0.001);
        assert!(!cursor.set_pinned_text("abc"));
        assert_eq!(cursor.pinned_time, 0.001);
    }

    #[test]
    fn test_labels() {
        let cursor = CursorState::new();
        assert_eq!(cursor.time_label(), "T: --");
        assert_eq!(readout_label(Channel::Ch1, Some(1.23456)), "CH1: 1.235 V");
        assert_eq!(readout_label(Channel::Ch2, None), "CH2: --");
    }
}
