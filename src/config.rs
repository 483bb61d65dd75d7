use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_storage")]
    pub storage: StorageKind,
    #[serde(default)]
    pub pg_dsn: Option<String>,
    #[serde(default)]
    pub seed_demo_data: bool,
}

const fn default_port() -> u16 {
    8080
}

const fn default_storage() -> StorageKind {
    StorageKind::Postgres
}

impl Config {
    fn validate(self) -> Result<Self, Box<dyn std::error::Error>> {
        if self.storage == StorageKind::Postgres
            && self.pg_dsn.as_deref().is_none_or(|dsn| dsn.trim().is_empty())
        {
            return Err("pg_dsn is required when storage is 'postgres'".into());
        }
        Ok(self)
    }
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let port = match env::var("PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?,
        Err(_) => default_port(),
    };

    let storage = match env::var("STORAGE").as_deref() {
        Ok("memory") => StorageKind::Memory,
        Ok("postgres") | Err(_) => StorageKind::Postgres,
        Ok(other) => return Err(format!("Unknown STORAGE '{other}'").into()),
    };

    let seed_demo_data = env::var("SEED_DEMO_DATA")
        .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    Ok(Config {
        port,
        storage,
        pg_dsn: env::var("PG_DSN").ok(),
        seed_demo_data,
    })
}

fn parse_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&contents)?;
    config.validate()
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("RETRO_BOARD_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return parse_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return parse_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return parse_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env()?.validate().map_err(|e| {
        format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_defaults_fill_missing_fields() {
        let config: Config = serde_yaml::from_str("storage: memory\n").unwrap();
        let config = config.validate().unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn client_config_is_not_mistaken_for_server_config() {
        let parsed = serde_yaml::from_str::<Config>(
            "base_url: http://localhost:8080\npoll_interval: 30s\n",
        );

        assert!(parsed.is_err());
    }

    #[test]
    fn postgres_storage_requires_dsn() {
        let config: Config = serde_yaml::from_str("port: 9000\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config =
            serde_yaml::from_str("pg_dsn: postgres://retro@localhost/retro\nseed_demo_data: true\n")
                .unwrap();
        let config = config.validate().unwrap();
        assert_eq!(config.storage, StorageKind::Postgres);
        assert!(config.seed_demo_data);
    }
}
