use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{GeneratorError, QuestionGenerator};
use crate::{config::GeneratorConfig, utils::http};

/// Workers AI `ai/run` REST endpoint.
#[derive(Clone)]
pub struct WorkersAiClient {
    client: Client,
    url: String,
    token: String,
}

#[derive(Serialize)]
struct RunRequest<'a> {
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct RunResponse {
    #[serde(default)]
    success: bool,
    result: Option<RunResult>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Deserialize)]
struct RunResult {
    response: Option<Value>,
}

#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

impl WorkersAiClient {
    /// `None` when the account id or token is not configured.
    pub fn from_config(config: &GeneratorConfig) -> Result<Option<Self>, reqwest::Error> {
        let (Some(account_id), Some(token)) = (&config.account_id, &config.api_token) else {
            return Ok(None);
        };

        let client = http::create_generator_client(config.timeout)?;

        Ok(Some(Self {
            client,
            url: run_url(&config.base_url, account_id, &config.model),
            token: token.clone(),
        }))
    }
}

fn run_url(base_url: &str, account_id: &str, model: &str) -> String {
    format!(
        "{}/accounts/{}/ai/run/{}",
        base_url.trim_end_matches('/'),
        account_id,
        model.trim_start_matches('/')
    )
}

fn extract_text(body: RunResponse) -> Result<String, GeneratorError> {
    if !body.success {
        let reason = body
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GeneratorError::Api(if reason.is_empty() {
            "request was not successful".to_string()
        } else {
            reason
        }));
    }

    match body.result.and_then(|r| r.response) {
        Some(Value::String(text)) => Ok(text),
        // JSON-mode models hand back the object itself
        Some(Value::Null) | None => Err(GeneratorError::Api("empty response".to_string())),
        Some(other) => Ok(other.to_string()),
    }
}

#[async_trait]
impl QuestionGenerator for WorkersAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let request = RunRequest {
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body: RunResponse = response.json().await?;
        debug!("Workers AI responded with {}", status);

        extract_text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> RunResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_run_url() {
        assert_eq!(
            run_url("https://api.cloudflare.com/client/v4/", "acc", "@cf/meta/llama-3.1-8b-instruct"),
            "https://api.cloudflare.com/client/v4/accounts/acc/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
    }

    #[test]
    fn test_from_config_without_credentials() {
        let config = GeneratorConfig::default();
        assert!(WorkersAiClient::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_extract_text_response() {
        let text = extract_text(body(r#"{"success":true,"result":{"response":"{\"question\":\"Q\"}"}}"#)).unwrap();
        assert_eq!(text, r#"{"question":"Q"}"#);
    }

    #[test]
    fn test_extract_object_response() {
        let text = extract_text(body(r#"{"success":true,"result":{"response":{"question":"Q"}}}"#)).unwrap();
        assert_eq!(text, r#"{"question":"Q"}"#);
    }

    #[test]
    fn test_extract_failure() {
        let err = extract_text(body(r#"{"success":false,"errors":[{"code":7000,"message":"No route"}]}"#)).unwrap_err();
        assert!(matches!(err, GeneratorError::Api(ref m) if m == "No route"));

        let err = extract_text(body(r#"{"success":true,"result":{}}"#)).unwrap_err();
        assert!(matches!(err, GeneratorError::Api(_)));
    }
}
