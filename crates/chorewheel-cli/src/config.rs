use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_database")]
    pub database: String,
    /// Household used when --household is not given
    #[serde(default)]
    pub household: Option<String>,
}

fn default_database() -> String {
    "chorewheel.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            household: None,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("CHOREWHEEL_"))
            .extract()
    }
}
