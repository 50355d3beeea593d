//! Status bar: per-channel acquisition summary and the last message

use egui::{Color32, RichText, Ui};

use super::plot::channel_color;
use super::state::StatusMessage;
use crate::loader::ChannelSlots;
use crate::types::Channel;

/// Render the status bar
pub fn render_status_bar(ui: &mut Ui, channels: &ChannelSlots, status: &StatusMessage) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        for &channel in Channel::all() {
            let text = match channels.get(channel) {
                Some(loaded) => format!(
                    "{}: {} · Δt {:.3e} s",
                    channel.label(),
                    loaded.frequency,
                    loaded.series.metadata.sampling_period
                ),
                None => format!("{}: --", channel.label()),
            };
            ui.colored_label(channel_color(channel), RichText::new(text).small());
            ui.separator();
        }

        if let Some(text) = status.text() {
            let color = if status.is_error() {
                Color32::LIGHT_RED
            } else {
                Color32::GRAY
            };
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.colored_label(color, RichText::new(text).small());
            });
        }
    });
}
