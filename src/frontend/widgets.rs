//! Custom widgets
//!
//! - [`KnobWidget`] - rotary control driving a [`Knob`]
//! - [`ChannelBadge`] - coloured channel name

use egui::{Color32, Pos2, Response, RichText, Sense, Stroke, Ui, Vec2, Widget};

use crate::view::Knob;

/// Diameter of a knob in points
const KNOB_SIZE: f32 = 44.0;

/// Indicator travel of a bounded knob, in degrees either side of top
const BOUNDED_SWEEP_DEG: f64 = 135.0;

/// Indicator rotation per drag unit of an unbounded knob
const DEGREES_PER_STEP: f64 = 3.0;

/// Rotary control: vertical drag or mouse wheel turns it, the value field
/// below accepts typed input
pub struct KnobWidget<'a> {
    knob: &'a mut Knob,
    label: &'a str,
    color: Color32,
    decimals: usize,
}

impl<'a> KnobWidget<'a> {
    pub fn new(knob: &'a mut Knob, label: &'a str) -> Self {
        Self {
            knob,
            label,
            color: Color32::GRAY,
            decimals: 2,
        }
    }

    pub fn color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Indicator angle in radians, measured clockwise from the top
    fn indicator_angle(knob: &Knob) -> f32 {
        let degrees = match (knob.min, knob.max) {
            (Some(min), Some(max)) if max > min => {
                let t = (knob.value - min) / (max - min);
                -BOUNDED_SWEEP_DEG + t * 2.0 * BOUNDED_SWEEP_DEG
            }
            _ if knob.sensitivity > 0.0 => {
                (knob.value / knob.sensitivity * DEGREES_PER_STEP) % 360.0
            }
            _ => 0.0,
        };
        degrees.to_radians() as f32
    }
}

impl Widget for KnobWidget<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let KnobWidget {
            knob,
            label,
            color,
            decimals,
        } = self;

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(label).small());

            let (rect, mut response) =
                ui.allocate_exact_size(Vec2::splat(KNOB_SIZE), Sense::click_and_drag());

            if response.dragged() {
                let dy = -response.drag_delta().y as f64;
                if dy != 0.0 && knob.step(dy) != 0.0 {
                    response.mark_changed();
                }
            }
            if response.hovered() {
                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 && knob.scroll(scroll > 0.0) != 0.0 {
                    response.mark_changed();
                }
            }

            if ui.is_rect_visible(rect) {
                let painter = ui.painter();
                let center = rect.center();
                let radius = rect.width() / 2.0 - 2.0;
                let stroke_color = if response.hovered() || response.dragged() {
                    color
                } else {
                    color.gamma_multiply(0.7)
                };
                painter.circle(
                    center,
                    radius,
                    ui.visuals().extreme_bg_color,
                    Stroke::new(1.5, stroke_color),
                );

                let angle = Self::indicator_angle(knob);
                let tip = Pos2::new(
                    center.x + angle.sin() * radius * 0.8,
                    center.y - angle.cos() * radius * 0.8,
                );
                painter.line_segment([center, tip], Stroke::new(2.5, color));
            }

            let mut value = knob.value;
            let field = ui.add(
                egui::DragValue::new(&mut value)
                    .speed(knob.sensitivity)
                    .max_decimals(decimals),
            );
            if field.changed() && knob.set(value) != 0.0 {
                response.mark_changed();
            }

            response.union(field)
        })
        .inner
    }
}

/// Coloured channel label
pub struct ChannelBadge {
    text: String,
    color: Color32,
}

impl ChannelBadge {
    pub fn new(text: impl Into<String>, color: Color32) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

impl Widget for ChannelBadge {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.horizontal(|ui| {
            ui.colored_label(self.color, "●");
            ui.label(RichText::new(self.text).strong().color(self.color));
        })
        .response
    }
}
