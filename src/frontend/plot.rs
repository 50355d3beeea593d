//! Two-channel scope plot
//!
//! egui_plot has a single vertical axis, so CH2 is rescaled onto the CH1
//! axis with [`ViewSettings::to_primary_axis`]. Bounds are always set from
//! the view settings; the plot's own pan and zoom are disabled in favour of
//! the knobs.

use egui::{Color32, Ui};
use egui_plot::{Corner, HLine, Legend, Line, Plot, PlotBounds, PlotPoints, VLine};

use crate::loader::ChannelSlots;
use crate::types::{Channel, MAX_RENDER_POINTS};
use crate::view::{decimate_points, CursorState, ViewSettings};

pub const CH1_COLOR: Color32 = Color32::from_rgb(0x00, 0xcc, 0xff);
pub const CH2_COLOR: Color32 = Color32::from_rgb(0xff, 0xcc, 0x00);
pub const OVERLAY_COLOR: Color32 = Color32::from_rgb(0xd0, 0x20, 0x90);
const CURSOR_COLOR: Color32 = Color32::from_rgb(0xff, 0x55, 0x55);
const PINNED_CURSOR_COLOR: Color32 = Color32::from_rgb(0x00, 0xff, 0x66);
const CENTER_LINE_COLOR: Color32 = Color32::from_rgba_premultiplied(0x80, 0x80, 0x80, 0x60);

/// Plot colour of a channel
pub fn channel_color(channel: Channel) -> Color32 {
    match channel {
        Channel::Ch1 => CH1_COLOR,
        Channel::Ch2 => CH2_COLOR,
    }
}

/// Everything the plot draws in one frame
pub struct PlotInput<'a> {
    pub channels: &'a ChannelSlots,
    pub view: &'a ViewSettings,
    pub cursor: &'a CursorState,
    /// Math overlay points, already on the CH1 axis
    pub overlay: Option<&'a [[f64; 2]]>,
}

/// Visible time range for the current channels
pub fn visible_window(channels: &ChannelSlots, view: &ViewSettings) -> (f64, f64) {
    view.time_window(channels.time_base())
}

/// Render the plot, returning the pointer time when hovered
pub fn render_scope_plot(ui: &mut Ui, input: &PlotInput<'_>) -> Option<f64> {
    let view = input.view;
    let (t_min, t_max) = visible_window(input.channels, view);
    let (y_min, y_max) = view.y_limits(Channel::Ch1);

    let plot = Plot::new("scope_plot")
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show_axes(true)
        .show_grid(true)
        .x_axis_label("Tiempo (s)")
        .y_axis_label("CH1 (V)")
        .legend(Legend::default().position(Corner::RightTop));

    let response = plot.show(ui, |plot_ui| {
        plot_ui.set_plot_bounds(PlotBounds::from_min_max([t_min, y_min], [t_max, y_max]));

        plot_ui.hline(
            HLine::new("center", view.grid_offset_y)
                .color(CENTER_LINE_COLOR)
                .width(1.0),
        );

        for &channel in Channel::all() {
            let Some(loaded) = input.channels.get(channel) else {
                continue;
            };
            if !view.is_visible(channel) {
                continue;
            }

            let mut points = view.display_trace(&loaded.series, channel);
            if channel != Channel::Ch1 {
                for p in &mut points {
                    p[1] = view.to_primary_axis(channel, p[1]);
                }
            }
            let points = decimate_points(&points, MAX_RENDER_POINTS);

            plot_ui.line(
                Line::new(
                    format!("{} ({})", channel.label(), loaded.frequency),
                    PlotPoints::from(points),
                )
                .color(channel_color(channel))
                .width(1.0),
            );
        }

        if let Some(points) = input.overlay {
            if !points.is_empty() {
                plot_ui.line(
                    Line::new("f(x)", PlotPoints::from(points.to_vec()))
                        .color(OVERLAY_COLOR)
                        .width(2.0),
                );
            }
        }

        if let Some(t) = input.cursor.time() {
            let color = if input.cursor.is_pinned() {
                PINNED_CURSOR_COLOR
            } else {
                CURSOR_COLOR
            };
            plot_ui.vline(VLine::new("cursor", t).color(color).width(1.0));
        }

        plot_ui.pointer_coordinate().map(|p| p.x)
    });

    response.inner
}
