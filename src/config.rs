use shuttle_runtime::SecretStore;
use std::time::Duration;

pub const DEFAULT_AI_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";
pub const DEFAULT_AI_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub webhook: WebhookConfig,
    pub storage: StorageConfig,
    pub generator: GeneratorConfig,
}

#[derive(Clone, Debug)]
pub struct TelegramConfig(pub String);

#[derive(Clone, Debug, Default)]
pub struct WebhookConfig {
    pub secret: Option<String>,
    /// Externally reachable base URL. Derived from the request when absent.
    pub public_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct StorageConfig {
    pub redis_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub fn is_enabled(&self) -> bool {
        self.account_id.is_some() && self.api_token.is_some()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            model: DEFAULT_AI_MODEL.to_string(),
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

pub fn build_config(secret_store: &SecretStore) -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| secret_store.get(key))
}

impl AppConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Building AppConfig...");
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = optional("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        let redis_url = match (
            optional("UPSTASH_REDIS_HOST"),
            optional("UPSTASH_REDIS_PORT"),
            optional("UPSTASH_REDIS_PASSWORD"),
        ) {
            (Some(host), Some(port), Some(password)) => {
                port.parse::<u16>().map_err(|_| ConfigError::Invalid {
                    key: "UPSTASH_REDIS_PORT",
                    value: port.clone(),
                })?;
                Some(format!("rediss://default:{}@{}:{}", password, host, port))
            }
            (None, None, None) => None,
            _ => return Err(ConfigError::Missing("UPSTASH_REDIS_HOST/PORT/PASSWORD (all three or none)")),
        };

        let timeout = match optional("AI_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "AI_TIMEOUT_SECS",
                value: raw.clone(),
            })?,
            None => DEFAULT_AI_TIMEOUT_SECS,
        };

        let public_url = optional("PUBLIC_URL").map(|u| u.trim_end_matches('/').to_string());
        if let Some(url) = &public_url {
            url::Url::parse(url).map_err(|_| ConfigError::Invalid {
                key: "PUBLIC_URL",
                value: url.clone(),
            })?;
        }

        let config = AppConfig {
            telegram: TelegramConfig(token),
            webhook: WebhookConfig {
                secret: optional("WEBHOOK_SECRET"),
                public_url,
            },
            storage: StorageConfig { redis_url },
            generator: GeneratorConfig {
                account_id: optional("AI_ACCOUNT_ID"),
                api_token: optional("AI_API_TOKEN"),
                model: optional("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
                base_url: optional("AI_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_AI_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout),
            },
        };
        info!("AppConfig built");

        Ok(config)
    }

    #[cfg(test)]
    pub fn new_test_config() -> Self {
        Self {
            telegram: TelegramConfig("1234567890:test-token".to_string()),
            webhook: WebhookConfig {
                secret: Some("test-secret".to_string()),
                public_url: Some("https://bot.example.com".to_string()),
            },
            storage: StorageConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}
