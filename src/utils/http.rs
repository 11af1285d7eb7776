use reqwest::Client;
use std::time::Duration;
use teloxide::Bot;

use crate::error::{BotError, BotResult};

pub const DEFAULT_USER_AGENT: &str = "IQMasterBot/1.0";

/// Bot backed by teloxide's own reqwest client, tuned with our timeouts.
pub fn create_telegram_bot(token: String) -> BotResult<Bot> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|e| BotError::Other(anyhow::anyhow!("Failed to build Telegram client: {}", e)))?;

    Ok(Bot::with_client(token, client))
}

/// Plain client for raw Bot API calls such as `setWebhook`.
pub fn create_api_client() -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(DEFAULT_USER_AGENT);

    build_client(builder)
}

pub fn create_generator_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(DEFAULT_USER_AGENT);

    build_client(builder)
}

pub fn build_client(builder: reqwest::ClientBuilder) -> Result<Client, reqwest::Error> {
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_bot_keeps_token() {
        let bot = create_telegram_bot("1234567890:test-token".to_string()).unwrap();
        assert_eq!(bot.token(), "1234567890:test-token");
    }
}
