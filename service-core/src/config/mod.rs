use crate::error::AppError;
use serde::Deserialize;

/// Settings shared by every service binary. Values come from an optional
/// `configuration` file overlaid with `APP__*` environment variables;
/// service-specific settings layer on top in each service's own config.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let sources = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(sources.try_deserialize()?)
    }
}
