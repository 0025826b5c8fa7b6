use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_MAIL_SENDER_NAME: &str = "Your Company";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_FILE: &str = "logs/mediclarity.log";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the MediClarity server.
///
/// Built once at start-up and shared read-only with every handler through
/// [`crate::api::AppState`].
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// API key for the chat-completion provider.
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub openai_base_url: String,
    /// Model identifier used for report summaries.
    pub openai_model: String,
    /// API key for the mail-sending provider.
    pub mail_api_key: String,
    /// Endpoint accepting outbound messages.
    pub mail_api_url: String,
    /// Address acknowledgement emails are sent from.
    pub mail_sender: String,
    /// Display name paired with `mail_sender` in the `From` header.
    pub mail_sender_name: String,
    /// The single browser origin allowed to call the API.
    pub cors_origin: String,
    /// Directory holding transient uploads.
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size for uploads.
    pub upload_limit_bytes: usize,
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// File receiving a copy of every log line.
    pub log_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| load_env(&lookup, key);
        let optional = |key: &str| load_env_optional(&lookup, key);

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_base_url: optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            mail_api_key: required("MAIL_API_KEY")?,
            mail_api_url: optional("MAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_MAIL_API_URL.to_string()),
            mail_sender: required("MAIL_SENDER")?,
            mail_sender_name: optional("MAIL_SENDER_NAME")
                .unwrap_or_else(|| DEFAULT_MAIL_SENDER_NAME.to_string()),
            cors_origin: optional("CORS_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            upload_dir: optional("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            upload_limit_bytes: optional("UPLOAD_LIMIT_BYTES")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("UPLOAD_LIMIT_BYTES".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES),
            port: optional("PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
            log_file: optional("MEDICLARITY_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

fn load_env<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    load_env_optional(lookup, key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Load `.env` (when present) and build the shared configuration.
///
/// Runs before tracing is installed, so callers log the outcome with [`log_summary`].
pub fn load_config() -> Result<Arc<Config>, ConfigError> {
    dotenvy::dotenv().ok();
    Ok(Arc::new(Config::from_env()?))
}

/// Record the non-secret settings in effect.
pub fn log_summary(config: &Config) {
    tracing::debug!(
        openai_base_url = %config.openai_base_url,
        openai_model = %config.openai_model,
        mail_api_url = %config.mail_api_url,
        cors_origin = %config.cors_origin,
        upload_dir = %config.upload_dir.display(),
        port = config.port,
        log_file = %config.log_file.display(),
        "Loaded configuration"
    );
}
