//! Tracing subscriber bootstrap.
//!
//! Logs go to stderr as bunyan-style JSON lines so stdout stays free for the report.

use std::sync::Once;

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INIT: Once = Once::new();

/// Installs the global subscriber. Filtering follows `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; only the first call has any effect.
pub fn init_tracing(app_name: &str) {
    let name = app_name.to_string();
    INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let formatting_layer = BunyanFormattingLayer::new(name, std::io::stderr);

        let result = Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(formatting_layer)
            .try_init();

        if let Err(e) = result {
            eprintln!("tracing subscriber already installed: {}", e);
        }
    });
}
