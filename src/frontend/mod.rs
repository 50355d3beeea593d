//! Front end for egui
//!
//! # Layout
//!
//! - menu bar: file loading, sessions, point export, parser and view options
//! - left panel: knobs, cursor readout and math overlay ([`panels`])
//! - centre: the two-channel plot ([`plot`])
//! - bottom: status bar ([`status_bar`])
//!
//! Panels never touch files or parse anything; they emit [`AppAction`]s
//! which [`ScopeApp::handle_action`] applies.

pub mod panels;
pub mod plot;
pub mod state;
pub mod status_bar;
pub mod widgets;

pub use state::{action_for_path, AppAction, StatusMessage};

use std::path::{Path, PathBuf};

use crate::config::{AppState, RecentKind};
use crate::export::{export_points, ExportInput};
use crate::loader::{load_channel, load_directory, ChannelSlots, LoadedChannel};
use crate::overlay::{MathOverlay, OVERLAY_SAMPLES};
use crate::parser::DataMarkerPolicy;
use crate::session::{load_session, save_session};
use crate::types::Channel;
use crate::view::{CursorState, ViewSettings};

use panels::{render_controls, ControlContext};
use plot::{render_scope_plot, visible_window, PlotInput};
use status_bar::render_status_bar;

/// Overlay points cached for one time window
struct OverlayCache {
    window: (f64, f64),
    points: Vec<[f64; 2]>,
}

/// Main application state
pub struct ScopeApp {
    app_state: AppState,
    /// Where preferences are written; `None` disables persistence
    state_path: Option<PathBuf>,
    channels: ChannelSlots,
    view: ViewSettings,
    cursor: CursorState,
    pinned_text: String,
    formula: String,
    overlay: Option<MathOverlay>,
    overlay_cache: Option<OverlayCache>,
    overlay_error: Option<String>,
    status: StatusMessage,
}

impl ScopeApp {
    /// Create the app, applying any startup actions (e.g. paths from the
    /// command line)
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        app_state: AppState,
        startup: Vec<AppAction>,
    ) -> Self {
        let mut app = Self::with_state(app_state, crate::config::app_state_path());
        for action in startup {
            app.handle_action(action);
        }
        app
    }

    fn with_state(app_state: AppState, state_path: Option<PathBuf>) -> Self {
        Self {
            app_state,
            state_path,
            channels: ChannelSlots::default(),
            view: ViewSettings::default(),
            cursor: CursorState::new(),
            pinned_text: format!("{:.6}", 0.0),
            formula: String::new(),
            overlay: None,
            overlay_cache: None,
            overlay_error: None,
            status: StatusMessage::None,
        }
    }

    /// Apply one action
    pub fn handle_action(&mut self, action: AppAction) {
        tracing::debug!("Action: {:?}", action);
        match action {
            AppAction::OpenCsv(path) => self.open_csv(&path),
            AppAction::OpenFolder(dir) => self.open_folder(&dir),
            AppAction::SaveSession(path) => {
                let result = save_session(
                    &path,
                    &self.view,
                    self.channels.series(Channel::Ch1),
                    self.channels.series(Channel::Ch2),
                );
                match result {
                    Ok(()) => {
                        self.status = StatusMessage::info(format!("Sesión guardada en {}", path.display()));
                        self.remember(&path, RecentKind::Session);
                    }
                    Err(e) => self.report_error("Error al guardar sesión", e),
                }
            }
            AppAction::LoadSession(path) => self.load_session(&path),
            AppAction::ExportPoints(path) => {
                let input = ExportInput::new(
                    self.channels.series(Channel::Ch1),
                    self.channels.series(Channel::Ch2),
                    &self.view,
                );
                match export_points(&path, &input) {
                    Ok(rows) => {
                        self.status = StatusMessage::info(format!(
                            "{} puntos exportados a {}",
                            rows,
                            path.display()
                        ));
                    }
                    Err(e) => self.report_error("Error de exportación", e),
                }
            }
            AppAction::ClearChannel(channel) => {
                self.channels.set(channel, None);
                self.overlay_cache = None;
            }
            AppAction::ResetView => {
                self.view.reset();
                self.overlay_cache = None;
            }
            AppAction::TogglePin => {
                self.cursor.toggle_pin(self.channels.has_data());
                if self.cursor.is_pinned() {
                    self.view.cursor_t_paused = self.cursor.pinned_time;
                    self.pinned_text = format!("{:.6}", self.cursor.pinned_time);
                }
            }
            AppAction::SetPinnedTime(text) => {
                if self.cursor.set_pinned_text(&text) {
                    self.view.cursor_t_paused = self.cursor.pinned_time;
                } else {
                    self.status = StatusMessage::error(format!("Tiempo inválido: '{}'", text.trim()));
                    self.pinned_text = format!("{:.6}", self.cursor.pinned_time);
                }
            }
            AppAction::SetFormula(formula) => self.set_formula(&formula),
            AppAction::SetParserPolicy(policy) => {
                self.app_state.parser.data_marker_policy = policy;
                self.persist_app_state();
            }
            AppAction::SetDarkMode(dark) => {
                self.app_state.dark_mode = dark;
                self.persist_app_state();
            }
        }
    }

    fn open_csv(&mut self, path: &Path) {
        match load_channel(path, &self.app_state.parser) {
            Ok(loaded) => {
                let frequency = loaded.frequency.clone();
                let slot = self.channels.assign(loaded);
                self.status = StatusMessage::info(format!(
                    "{} cargado en {} ({})",
                    file_name(path),
                    slot,
                    frequency
                ));
                self.overlay_cache = None;
                self.remember(path, RecentKind::Csv);
            }
            Err(e) => {
                if !path.exists() {
                    self.app_state.remove_recent(path);
                    self.persist_app_state();
                }
                self.report_error("Error al cargar", e);
            }
        }
    }

    fn open_folder(&mut self, dir: &Path) {
        let load = match load_directory(dir, &self.app_state.parser) {
            Ok(load) => load,
            Err(e) => {
                self.report_error("Error al abrir carpeta", e);
                return;
            }
        };

        let errors = self.channels.replace_from(load);
        self.overlay_cache = None;
        self.remember(dir, RecentKind::Folder);

        if let Some((channel, err)) = errors.into_iter().next() {
            self.status = StatusMessage::error(format!("{}: {}", channel, err));
        } else if self.channels.has_data() {
            self.status = StatusMessage::info(format!("Carpeta cargada: {}", dir.display()));
        } else {
            self.status = StatusMessage::error(format!(
                "No se encontraron archivos CH1/CH2 en {}",
                dir.display()
            ));
        }
    }

    fn load_session(&mut self, path: &Path) {
        match load_session(path) {
            Ok(restored) => {
                let to_loaded = |c: crate::session::RestoredChannel| LoadedChannel {
                    source: None,
                    series: c.series,
                    frequency: c.frequency,
                };
                self.channels.ch1 = restored.ch1.map(to_loaded);
                self.channels.ch2 = restored.ch2.map(to_loaded);
                self.view = restored.view;
                self.cursor.unpin();
                self.cursor.pinned_time = self.view.cursor_t_paused;
                self.pinned_text = format!("{:.6}", self.cursor.pinned_time);
                self.overlay_cache = None;
                self.status = StatusMessage::info(format!("Sesión cargada: {}", path.display()));
                self.remember(path, RecentKind::Session);
            }
            Err(e) => self.report_error("Error al cargar sesión", e),
        }
    }

    fn set_formula(&mut self, formula: &str) {
        self.overlay_cache = None;
        match MathOverlay::compile(formula) {
            Ok(overlay) => {
                self.overlay = overlay;
                self.overlay_error = None;
            }
            Err(e) => {
                self.overlay = None;
                self.overlay_error = Some(e.to_string());
            }
        }
    }

    /// Overlay points for the current window, evaluated once per window
    fn overlay_points(&mut self) -> Option<&[[f64; 2]]> {
        let overlay = self.overlay.as_ref()?;
        let window = visible_window(&self.channels, &self.view);

        let stale = self
            .overlay_cache
            .as_ref()
            .is_none_or(|cache| cache.window != window);
        if stale {
            match overlay.evaluate(window.0, window.1, OVERLAY_SAMPLES) {
                Ok(points) => {
                    self.overlay_error = None;
                    self.overlay_cache = Some(OverlayCache { window, points });
                }
                Err(e) => {
                    self.overlay_error = Some(e.to_string());
                    self.overlay_cache = Some(OverlayCache {
                        window,
                        points: Vec::new(),
                    });
                }
            }
        }
        self.overlay_cache.as_ref().map(|c| c.points.as_slice())
    }

    fn remember(&mut self, path: &Path, kind: RecentKind) {
        self.app_state.add_recent(path, kind);
        self.persist_app_state();
    }

    fn persist_app_state(&self) {
        let Some(path) = &self.state_path else {
            return;
        };
        if let Err(e) = self.app_state.save_to(path) {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }

    fn report_error(&mut self, what: &str, err: impl std::fmt::Display) {
        tracing::error!("{}: {}", what, err);
        self.status = StatusMessage::error(format!("{}: {}", what, err));
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new();
        match &self.app_state.last_directory {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        use egui::Key;

        let mut actions = Vec::new();
        if ctx.wants_keyboard_input() {
            return actions;
        }

        let (toggle_pin, open) = ctx.input(|i| {
            (
                i.key_pressed(Key::P) && !i.modifiers.any(),
                i.key_pressed(Key::O) && i.modifiers.command_only(),
            )
        });

        if toggle_pin {
            actions.push(AppAction::TogglePin);
        }
        if open {
            if let Some(path) = self.pick_csv() {
                actions.push(AppAction::OpenCsv(path));
            }
        }
        actions
    }

    fn pick_csv(&self) -> Option<PathBuf> {
        self.file_dialog()
            .add_filter("CSV", &["csv", "CSV"])
            .set_title("Abrir CSV")
            .pick_file()
    }

    fn render_menu(&self, ui: &mut egui::Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.menu_button("Archivo", |ui| {
            if ui.button("Abrir CSV...").clicked() {
                if let Some(path) = self.pick_csv() {
                    actions.push(AppAction::OpenCsv(path));
                }
                ui.close();
            }
            if ui.button("Abrir carpeta CH1/CH2...").clicked() {
                if let Some(dir) = self.file_dialog().set_title("Abrir carpeta").pick_folder() {
                    actions.push(AppAction::OpenFolder(dir));
                }
                ui.close();
            }

            ui.menu_button("Recientes", |ui| {
                if self.app_state.recent_files.is_empty() {
                    ui.label(egui::RichText::new("(vacío)").weak());
                }
                for recent in &self.app_state.recent_files {
                    if ui
                        .button(recent.display_name())
                        .on_hover_text(recent.path.display().to_string())
                        .clicked()
                    {
                        actions.push(match recent.kind {
                            RecentKind::Csv => AppAction::OpenCsv(recent.path.clone()),
                            RecentKind::Folder => AppAction::OpenFolder(recent.path.clone()),
                            RecentKind::Session => AppAction::LoadSession(recent.path.clone()),
                        });
                        ui.close();
                    }
                }
            });

            ui.separator();

            let has_data = self.channels.has_data();
            if ui
                .add_enabled(has_data, egui::Button::new("Guardar sesión..."))
                .clicked()
            {
                if let Some(path) = self
                    .file_dialog()
                    .add_filter("Sesión JSON", &["json"])
                    .set_file_name("sesion.json")
                    .save_file()
                {
                    actions.push(AppAction::SaveSession(path));
                }
                ui.close();
            }
            if ui.button("Cargar sesión...").clicked() {
                if let Some(path) = self
                    .file_dialog()
                    .add_filter("Sesión JSON", &["json"])
                    .pick_file()
                {
                    actions.push(AppAction::LoadSession(path));
                }
                ui.close();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Exportar puntos (GeoGebra)..."))
                .clicked()
            {
                if let Some(path) = self
                    .file_dialog()
                    .add_filter("Texto / GeoGebra", &["txt"])
                    .add_filter("CSV", &["csv"])
                    .set_file_name("puntos.txt")
                    .save_file()
                {
                    actions.push(AppAction::ExportPoints(path));
                }
                ui.close();
            }

            ui.separator();
            if ui.button("Salir").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Ver", |ui| {
            if ui.button("Reset vista").clicked() {
                actions.push(AppAction::ResetView);
                ui.close();
            }
            let mut dark = self.app_state.dark_mode;
            if ui.checkbox(&mut dark, "Modo oscuro").changed() {
                actions.push(AppAction::SetDarkMode(dark));
            }
        });

        ui.menu_button("Lectura", |ui| {
            let mut policy = self.app_state.parser.data_marker_policy;
            for &option in DataMarkerPolicy::all() {
                if ui
                    .radio_value(&mut policy, option, option.display_name())
                    .changed()
                {
                    actions.push(AppAction::SetParserPolicy(option));
                }
            }
        });

        actions
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = self.handle_keyboard_shortcuts(ctx);

        ctx.set_visuals(if self.app_state.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                actions.extend(self.render_menu(ui));
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            render_status_bar(ui, &self.channels, &self.status);
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let mut control = ControlContext {
                        view: &mut self.view,
                        channels: &self.channels,
                        cursor: &self.cursor,
                        pinned_text: &mut self.pinned_text,
                        formula: &mut self.formula,
                        overlay_error: self.overlay_error.as_deref(),
                    };
                    actions.extend(render_controls(ui, &mut control));
                });
            });

        // Overlay evaluation needs `&mut self`, so the points are copied out
        // before the plot borrows the rest of the state.
        let overlay = self.overlay_points().map(|p| p.to_vec());

        egui::CentralPanel::default().show(ctx, |ui| {
            let input = PlotInput {
                channels: &self.channels,
                view: &self.view,
                cursor: &self.cursor,
                overlay: overlay.as_deref(),
            };
            let hover = render_scope_plot(ui, &input);
            self.cursor.hover_time = hover;
        });

        for action in actions {
            self.handle_action(action);
        }
    }
}
