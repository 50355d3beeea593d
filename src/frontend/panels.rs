//! Control panel: channel knobs, time base, cursor readout and math overlay

use egui::{Color32, RichText, Ui};

use super::plot::{channel_color, OVERLAY_COLOR};
use super::state::AppAction;
use super::widgets::{ChannelBadge, KnobWidget};
use crate::loader::ChannelSlots;
use crate::types::Channel;
use crate::view::knob::{
    position_sensitivity, time_sensitivity, DEFAULT_POSITION_SENSITIVITY,
    DEFAULT_TIME_SENSITIVITY, GRID_SENSITIVITY,
};
use crate::view::{cursor::readout_label, CursorState, Knob, ViewSettings};

/// State the control panel reads and edits
pub struct ControlContext<'a> {
    pub view: &'a mut ViewSettings,
    pub channels: &'a ChannelSlots,
    pub cursor: &'a CursorState,
    /// Text field of the pinned cursor time
    pub pinned_text: &'a mut String,
    /// Text field of the overlay formula
    pub formula: &'a mut String,
    pub overlay_error: Option<&'a str>,
}

/// Render the whole control panel
pub fn render_controls(ui: &mut Ui, ctx: &mut ControlContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    render_general(ui, ctx, &mut actions);
    ui.separator();
    for &channel in Channel::all() {
        render_channel(ui, ctx, channel, &mut actions);
        ui.separator();
    }
    render_horizontal(ui, ctx);
    ui.separator();
    render_cursor(ui, ctx, &mut actions);
    ui.separator();
    render_math(ui, ctx, &mut actions);

    actions
}

fn render_general(ui: &mut Ui, ctx: &mut ControlContext<'_>, actions: &mut Vec<AppAction>) {
    ui.heading("General");
    ui.horizontal(|ui| {
        let mut grid = Knob::new(ctx.view.grid_offset_y, GRID_SENSITIVITY);
        if ui
            .add(KnobWidget::new(&mut grid, "OFFSET Y").decimals(1))
            .changed()
        {
            ctx.view.grid_offset_y = grid.value;
        }

        ui.vertical(|ui| {
            if ui
                .checkbox(&mut ctx.view.common_scale, "Escala común")
                .changed()
                && ctx.view.common_scale
            {
                let zoom = ctx.view.ch1_zoom;
                ctx.view.set_zoom(Channel::Ch1, zoom);
            }
            if ui.button("Reset vista").clicked() {
                actions.push(AppAction::ResetView);
            }
        });
    });
}

fn render_channel(
    ui: &mut Ui,
    ctx: &mut ControlContext<'_>,
    channel: Channel,
    actions: &mut Vec<AppAction>,
) {
    let color = channel_color(channel);
    let channels = ctx.channels;
    let loaded = channels.get(channel);

    ui.horizontal(|ui| {
        ui.add(ChannelBadge::new(channel.label(), color));
        let mut visible = ctx.view.is_visible(channel);
        if ui.checkbox(&mut visible, "Visible").changed() {
            ctx.view.set_visible(channel, visible);
        }
        if loaded.is_some() && ui.small_button("✖").on_hover_text("Quitar canal").clicked() {
            actions.push(AppAction::ClearChannel(channel));
        }
    });

    match loaded {
        Some(loaded) => {
            if let Some(name) = loaded.source.as_ref().and_then(|p| p.file_name()) {
                ui.label(RichText::new(name.to_string_lossy()).small().weak());
            }
            ui.label(RichText::new(format!("Frecuencia: {}", loaded.frequency)).strong());
            let meta = &loaded.series.metadata;
            ui.label(
                RichText::new(format!(
                    "{} pts · {} {}/div · {}",
                    loaded.series.len(),
                    meta.vertical_scale,
                    meta.vertical_units,
                    loaded.series.layout.display_name()
                ))
                .small(),
            );
        }
        None => {
            ui.label(RichText::new("Sin datos").weak());
        }
    }

    let pos_sensitivity = loaded
        .map(|l| position_sensitivity(l.series.metadata.vertical_scale))
        .unwrap_or(DEFAULT_POSITION_SENSITIVITY);

    ui.horizontal(|ui| {
        let mut pos = Knob::new(ctx.view.position_offset(channel), pos_sensitivity);
        if ui
            .add(KnobWidget::new(&mut pos, "POSICIÓN V").color(color))
            .changed()
        {
            ctx.view.set_position_offset(channel, pos.value);
        }

        let mut scale = Knob::zoom(ctx.view.zoom(channel));
        if ui
            .add(KnobWidget::new(&mut scale, "VOLTS/DIV").color(color))
            .changed()
        {
            ctx.view.set_zoom(channel, scale.value);
        }
    });
}

fn render_horizontal(ui: &mut Ui, ctx: &mut ControlContext<'_>) {
    ui.heading("Horizontal");

    let sensitivity = ctx
        .channels
        .time_base()
        .map(time_sensitivity)
        .unwrap_or(DEFAULT_TIME_SENSITIVITY);

    ui.horizontal(|ui| {
        let mut trace = Knob::new(ctx.view.time_trace_offset, sensitivity);
        if ui.add(KnobWidget::new(&mut trace, "POSICIÓN X")).changed() {
            ctx.view.time_trace_offset = trace.value;
        }

        let mut axis = Knob::new(ctx.view.axis_time_offset, sensitivity);
        if ui.add(KnobWidget::new(&mut axis, "OFFSET T")).changed() {
            ctx.view.axis_time_offset = axis.value;
        }

        let mut time = Knob::zoom(ctx.view.time_zoom);
        if ui
            .add(KnobWidget::new(&mut time, "TIME/DIV").decimals(3))
            .changed()
        {
            ctx.view.set_time_zoom(time.value);
        }
    });
}

fn render_cursor(ui: &mut Ui, ctx: &mut ControlContext<'_>, actions: &mut Vec<AppAction>) {
    ui.heading("Cursor");
    let cursor = ctx.cursor;

    ui.label(RichText::new(cursor.time_label()).monospace());
    for &channel in Channel::all() {
        let value = match (cursor.time(), ctx.channels.series(channel)) {
            (Some(t), Some(series)) => ctx.view.cursor_readout(series, channel, t),
            _ => None,
        };
        ui.colored_label(
            channel_color(channel),
            RichText::new(readout_label(channel, value)).monospace(),
        );
    }

    ui.horizontal(|ui| {
        let text = if cursor.is_pinned() { "Soltar (P)" } else { "Fijar (P)" };
        if ui.button(text).clicked() {
            actions.push(AppAction::TogglePin);
        }

        ui.label("t =");
        let response = ui.add_enabled(
            cursor.is_pinned(),
            egui::TextEdit::singleline(ctx.pinned_text).desired_width(90.0),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.push(AppAction::SetPinnedTime(ctx.pinned_text.clone()));
        }
    });
}

fn render_math(ui: &mut Ui, ctx: &mut ControlContext<'_>, actions: &mut Vec<AppAction>) {
    ui.heading("Función f(x)");
    ui.label(RichText::new("sin cos tan sqrt exp log ln abs power pi").small().weak());

    ui.horizontal(|ui| {
        ui.colored_label(OVERLAY_COLOR, "f(x) =");
        let response = ui.add(
            egui::TextEdit::singleline(ctx.formula)
                .hint_text("2*sin(2*pi*50*x)")
                .desired_width(160.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if submitted || ui.button("Aplicar").clicked() {
            actions.push(AppAction::SetFormula(ctx.formula.clone()));
        }
    });

    if let Some(err) = ctx.overlay_error {
        ui.colored_label(Color32::LIGHT_RED, RichText::new(err).small());
    }
}
