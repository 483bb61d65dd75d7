use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_notice_ttl", with = "humantime_serde")]
    pub notice_ttl: Duration,
    /// Author for new notes; notes are posted as "Anonymous" when unset.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Board opened on start; the first board is used when unset.
    #[serde(default)]
    pub board_id: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_poll_interval() -> Duration {
    Duration::from_secs(30)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_notice_ttl() -> Duration {
    Duration::from_secs(10)
}

impl Config {
    fn validate(self) -> Result<Self, Box<dyn std::error::Error>> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!("base_url '{}' must start with http:// or https://", self.base_url).into());
        }
        if self.poll_interval.is_zero() {
            return Err("poll_interval must be greater than zero".into());
        }
        Ok(self)
    }
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let poll_interval = match env::var("RETRO_POLL_SECS") {
        Ok(secs) => Duration::from_secs(
            secs.parse::<u64>()
                .map_err(|e| format!("Failed to parse RETRO_POLL_SECS: {e}"))?,
        ),
        Err(_) => default_poll_interval(),
    };

    Ok(Config {
        base_url: env::var("RETRO_BASE_URL").unwrap_or_else(|_| default_base_url()),
        poll_interval,
        request_timeout: default_request_timeout(),
        notice_ttl: default_notice_ttl(),
        user_name: env::var("RETRO_USER").ok(),
        board_id: env::var("RETRO_BOARD_ID").ok(),
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
        env::var("RETRO_CLIENT_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

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
    tracing::info!("No config file found, loading configuration from environment variables");
    load_from_env()?.validate()
}
