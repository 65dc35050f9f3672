use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Port the API listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Base URL of the API, used by the terminal front end
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Where the terminal front end writes its log
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "sqlite://clients.db".to_string()
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_file() -> String {
    "client-ledger.log".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build a Config from an explicit set of variables instead of the process environment
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(vars)?)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    dotenv().ok();

    let config = Config::load()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(Vec::new()).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.database_url(), "sqlite://clients.db");
        assert_eq!(config.api_url(), "http://localhost:3000");
        assert_eq!(config.log_file, "client-ledger.log");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_vars(vars(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "sqlite://other.db"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url(), "sqlite://other.db");
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
