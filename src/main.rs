//! ScopeView - Main Entry Point
//!
//! Paths given on the command line are opened at startup: folders as a
//! CH1/CH2 pair, `.json` files as sessions, anything else as a single export.

use scopeview_rs::{config::AppState, frontend::action_for_path, ScopeApp};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,scopeview_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ScopeView");

    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing();

    let startup: Vec<_> = std::env::args_os()
        .skip(1)
        .map(PathBuf::from)
        .map(action_for_path)
        .collect();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("ScopeView"),
        ..Default::default()
    };

    eframe::run_native(
        "ScopeView",
        native_options,
        Box::new(|cc| {
            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.window_shadow.offset = [0, 0];
            cc.egui_ctx.set_style(style);

            Ok(Box::new(ScopeApp::new(cc, app_state, startup)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run UI: {}", e))?;

    tracing::info!("Shutting down");
    Ok(())
}
