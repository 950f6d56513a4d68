//! A "coming soon" landing page with an email waitlist.
//!
//! Serves the landing page on `/` and collects emails on `POST /api/waitlist`.

pub mod app;
pub mod client;
pub mod config;
pub mod database;
mod error;
mod templ_manager;
pub mod web;

// re-exports
pub use app::{serve, App, AppState};
pub use error::{Error, Result};
pub use templ_manager::TemplateManager;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Compact human readable logs, `RUST_LOG` overrides the default `debug` level.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .compact()
        .init();
}

/// One JSON object per line, `RUST_LOG` overrides the default `info` level.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}
