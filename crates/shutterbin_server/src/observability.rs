//! Tracing subscriber initialization.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing stack for the server process.
///
/// The filter comes from `RUST_LOG`, falling back to `info`. Call once at
/// startup; a second call panics, so tests that need a subscriber should use
/// their own.
pub fn init_observability() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Observability initialized"
    );
}
