use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    engine: EngineTuning,
    analytics: AnalyticsTuning,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    stale_write_retries: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalyticsTuning {
    max_concurrent_fetches: usize,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            stale_write_retries: 3,
        }
    }
}

impl Default for AnalyticsTuning {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
        }
    }
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let text = read_config(use_local)?;
                    let config: Self = toml::from_str(&text)?;
                    Ok(config)
                };

                // a library must not exit its host: no config file means
                // built-in defaults
                match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(error::ConfigError::ConfigNotFound) => {
                        tracing::debug!("no config file found, using defaults");
                        Config::default()
                    }
                    Err(e) => {
                        crate::error::log_error(&e);
                        Config::default()
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn engine(&self) -> &EngineTuning {
        &self.engine
    }

    #[inline]
    pub fn analytics(&self) -> &AnalyticsTuning {
        &self.analytics
    }
}

impl EngineTuning {
    #[inline]
    pub fn stale_write_retries(&self) -> u32 {
        self.stale_write_retries
    }
}

impl AnalyticsTuning {
    #[inline]
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }
}
