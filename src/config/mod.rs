//! Tries to create an `AppConfig` from config files and the environment.
//! Layers `config/base.toml`, the environment specific file and `APP_` prefixed env variables
//! with `figment`.
//! Gets initialized with `OnceLock` so it only needs to get initialized once.

mod data;
mod error;

use std::{path::Path, sync::OnceLock};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

pub use data::{AppConfig, DbConfig, Environment, NetConfig, PageConfig, SslRequire};
pub use error::{ConfigError, ConfigResult};

/// Allocates a static `OnceLock` containing `AppConfig`.
/// This ensures configuration only gets initialized the first time we call this function.
/// Every other caller gets a &'static ref to AppConfig.
/// Panics if anything goes wrong.
pub fn get_or_init_config() -> &'static AppConfig {
    static CONFIG_INIT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG_INIT.get_or_init(|| {
        info!("{:<20} - Initializing the configuration", "get_or_init_config");
        load_config().unwrap_or_else(|er| panic!("Fatal Error: Building config: {er}"))
    })
}

/// Reads `APP_ENVIRONMENT` (defaults to `local`) and builds the `AppConfig` from the `config`
/// directory in the current working directory.
pub fn load_config() -> ConfigResult<AppConfig> {
    let config_dir = std::env::current_dir()?.join("config");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;

    let mut config = build_config(&config_dir, &environment)?;

    // Setup DbConfig for production
    if matches!(environment, Environment::Production) {
        let production_db = std::env::var("DATABASE_URL").map_err(ConfigError::MissingDbUrl)?;
        let migrate_on_startup = config.db_config.migrate_on_startup;
        config.db_config = DbConfig::try_from(production_db.as_str())?;
        config.db_config.migrate_on_startup = migrate_on_startup;
    }

    Ok(config)
}

/// Merges the base file, the environment file and the `APP_` environment variables, later
/// sources take precedence. Nested keys are separated by `__`, e.g. `APP_NET_CONFIG__APP_PORT`.
pub fn build_config(config_dir: &Path, environment: &Environment) -> ConfigResult<AppConfig> {
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    let config = Figment::new()
        .merge(Toml::file(config_dir.join("base.toml")))
        .merge(Toml::file(config_dir.join(environment_filename)))
        .merge(Env::prefixed("APP_").split("__"))
        .extract()?;

    Ok(config)
}
