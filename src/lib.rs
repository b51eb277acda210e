pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod analytics;
pub mod certificate;
pub mod engine;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

static APPLICATION_NAME: &str = "makerworks";

/// Tracing setup for embedding applications and tests. The engine never
/// installs a subscriber by itself.
pub fn init_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .try_init();

    tracing::debug!("tracing initialized.");
}
