use crate::helper::notification_helpers::EmailConfig;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub web: WebConfig,
    pub data_path: String,
    pub templates_path: String,
    pub public_path: String,
    pub allowed_origins: String,
    pub log_level: String,
    /// Base URL printed into QR codes when the request does not pass `?url=`.
    #[serde(default)]
    pub public_base_url: Option<String>,
    // Filled from EMAIL_USER / EMAIL_PASS after deserialization.
    #[serde(skip)]
    pub email: Option<EmailConfig>,
}

impl Config {
    /// Loads settings from an optional `.env` file, `config/default.toml` if present, and the
    /// process environment, in increasing order of precedence.
    pub fn from_env(env_path: Option<&Path>) -> Result<Self, config::ConfigError> {
        match env_path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    config::ConfigError::Message(format!(
                        "FATAL: Failed to load .env file from '{}'. Error: {}",
                        path.display(),
                        e
                    ))
                })?;
            }
            None => {
                dotenvy::dotenv().ok();
            }
        }

        let mut builder = config::Config::builder()
            .set_default("web.host", "0.0.0.0")?
            .set_default("web.port", 3000_i64)?
            .set_default("data_path", "./data")?
            .set_default("templates_path", "templates")?
            .set_default("public_path", "public")?
            .set_default("allowed_origins", "")?
            .set_default("log_level", "info")?
            .add_source(config::File::with_name("config/default").required(false));

        if let Ok(port) = env::var("PORT") {
            let port = port.trim().parse::<u16>().map_err(|_| {
                config::ConfigError::Message(format!("FATAL: 'PORT' must be a port number, got '{}'.", port))
            })?;
            builder = builder.set_override("web.port", i64::from(port))?;
        }

        let overrides = [
            ("HOST", "web.host"),
            ("DATA_PATH", "data_path"),
            ("TEMPLATES_PATH", "templates_path"),
            ("PUBLIC_PATH", "public_path"),
            ("ALLOWED_ORIGINS", "allowed_origins"),
            ("LOG_LEVEL", "log_level"),
            ("PUBLIC_BASE_URL", "public_base_url"),
        ];
        for (var, key) in overrides {
            if let Ok(value) = env::var(var) {
                if !value.trim().is_empty() {
                    builder = builder.set_override(key, value.trim().to_string())?;
                }
            }
        }

        let mut config: Config = builder.build()?.try_deserialize()?;
        if let Some(base) = config.public_base_url.as_mut() {
            *base = base.trim_end_matches('/').to_string();
        }
        config.email = EmailConfig::from_env();
        Ok(config)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_path)
    }

    /// Glob handed to Tera.
    pub fn templates_glob(&self) -> String {
        format!("{}/**/*.html", self.templates_path.trim_end_matches('/'))
    }
}
