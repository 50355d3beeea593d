//! # ScopeView-RS: Oscilloscope CSV Viewer
//!
//! Reads the CSV exports of bench oscilloscopes, estimates the frequency of
//! each channel and shows up to two channels on an oscilloscope-style plot.
//!
//! ## Architecture
//!
//! - **Parser**: turns an export (metadata header plus samples) into a
//!   [`WaveformSeries`], in single-column ADC or multi-column layout
//! - **Analysis**: zero-crossing frequency estimation
//! - **View**: pure display transforms (zoom, offsets, cursor readout)
//! - **Session / Export**: JSON sessions and GeoGebra point export
//! - **Frontend**: eframe/egui with egui_plot, Rhai-evaluated math overlay
//!
//! ## Configuration
//!
//! Preferences (recent files, parser policy, colour scheme) are stored in the
//! platform data directory under `dev.scopeview.scopeview-rs`.
//!
//! ## Example
//!
//! ```no_run
//! use scopeview_rs::{estimate_frequency, parse_csv};
//!
//! let series = parse_csv("ALL0001/A0001CH1.CSV")?;
//! let estimate = estimate_frequency(&series.time, &series.voltage);
//! println!("{} samples, {}", series.len(), estimate);
//! # Ok::<(), scopeview_rs::ScopeViewError>(())
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod frontend;
pub mod loader;
pub mod overlay;
pub mod parser;
pub mod session;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use analysis::{estimate_frequency, format_frequency, frequency_label, FrequencyEstimate};
pub use app::ScopeApp;
pub use config::AppState;
pub use error::{Result, ScopeViewError};
pub use parser::{parse_csv, parse_file, parse_str, DataMarkerPolicy, ParserConfig};
pub use types::{Channel, CsvLayout, WaveformMetadata, WaveformSeries};
pub use view::ViewSettings;
