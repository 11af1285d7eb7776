use std::ops::ControlFlow;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use reqwest::Client;
use serde_json::json;
use teloxide::{
    dispatching::UpdateHandler,
    dptree,
    types::{Me, Update},
    Bot,
};

use crate::state::AppState;

pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";
const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Everything a webhook request needs. Cloned into each request by axum.
#[derive(Clone)]
pub struct ServerState {
    pub bot: Bot,
    pub me: Me,
    pub handler: UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>>,
    pub app_state: AppState,
    pub client: Client,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/webhook", post(handle_webhook))
        .route("/set-webhook", get(handle_set_webhook))
        .with_state(state)
}

pub async fn handle_root() -> &'static str {
    "IQ Master Bot is running!"
}

fn is_authorized(expected: Option<&str>, headers: &HeaderMap) -> bool {
    match expected {
        Some(secret) => headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == secret),
        None => true,
    }
}

pub async fn handle_webhook(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    if !is_authorized(state.app_state.config.webhook.secret.as_deref(), &headers) {
        warn!("Webhook call with a missing or wrong secret token");
        return (StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            error!("Failed to parse update: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error");
        }
    };

    let update_id = update.id;
    let deps = dptree::deps![state.bot.clone(), state.me.clone(), state.app_state.clone(), update];

    match state.handler.dispatch(deps).await {
        ControlFlow::Break(Ok(())) => (StatusCode::OK, "OK"),
        ControlFlow::Break(Err(e)) => {
            error!("Handler failed for update {:?}: {}", update_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error")
        }
        ControlFlow::Continue(_) => {
            debug!("Update {:?} not handled", update_id);
            (StatusCode::OK, "OK")
        }
    }
}

/// `<base>/webhook`, with the base taken from config or from the request headers.
fn webhook_url(public_url: Option<&str>, headers: &HeaderMap) -> Option<String> {
    if let Some(base) = public_url {
        return Some(format!("{}/webhook", base.trim_end_matches('/')));
    }

    let host = headers.get("host").and_then(|v| v.to_str().ok())?;
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");

    Some(format!("{}://{}/webhook", proto, host))
}

pub async fn handle_set_webhook(State(state): State<ServerState>, headers: HeaderMap) -> (StatusCode, String) {
    let config = &state.app_state.config;

    let Some(url) = webhook_url(config.webhook.public_url.as_deref(), &headers) else {
        return (StatusCode::BAD_REQUEST, "Cannot determine public URL".to_string());
    };

    let mut payload = json!({ "url": url });
    if let Some(secret) = &config.webhook.secret {
        payload["secret_token"] = json!(secret);
    }

    info!("Registering webhook at {}", url);

    let response = state
        .client
        .post(format!("{}/bot{}/setWebhook", TELEGRAM_API_URL, config.telegram.0))
        .json(&payload)
        .send()
        .await;

    match response {
        Ok(response) => match response.text().await {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => {
                error!("Failed to read setWebhook response: {}", e);
                (StatusCode::BAD_GATEWAY, "Error".to_string())
            }
        },
        Err(e) => {
            error!("setWebhook request failed: {}", e);
            (StatusCode::BAD_GATEWAY, "Error".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::test_server_state;
    use axum::http::HeaderValue;
    use teloxide::types::{UpdateId, UpdateKind};
    use teloxide_tests::MockCallbackQuery;

    fn secret_headers(secret: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SECRET_TOKEN_HEADER, HeaderValue::from_str(secret).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_root() {
        assert_eq!(handle_root().await, "IQ Master Bot is running!");
    }

    #[tokio::test]
    async fn test_webhook_rejects_wrong_secret() {
        let state = test_server_state();

        let (status, body) = handle_webhook(State(state.clone()), HeaderMap::new(), Bytes::from_static(b"{}")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "Unauthorized");

        let (status, _) = handle_webhook(State(state), secret_headers("nope"), Bytes::from_static(b"{}")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_malformed_body() {
        let (status, body) = handle_webhook(
            State(test_server_state()),
            secret_headers("test-secret"),
            Bytes::from_static(b"not json"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error");
    }

    #[tokio::test]
    async fn test_webhook_ignores_unhandled_update_kinds() {
        let body = br#"{"update_id": 42, "some_future_update": {"id": 1}}"#;

        let (status, body) = handle_webhook(
            State(test_server_state()),
            secret_headers("test-secret"),
            Bytes::from_static(body),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_webhook_survives_delivery_failure() {
        let state = test_server_state();
        let query = MockCallbackQuery::new().data("test_quick").build();
        let user_id = query.from.id.to_string();
        let update = Update {
            id: UpdateId(7),
            kind: UpdateKind::CallbackQuery(query),
        };
        let body = Bytes::from(serde_json::to_vec(&update).unwrap());

        let (status, text) = handle_webhook(State(state.clone()), secret_headers("test-secret"), body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "OK");

        let quiz = &state.app_state.service_registry.quiz;
        let session = quiz.get_session(&user_id).await.unwrap().unwrap();
        assert_eq!(session.current_question_index, 1);
        assert!(session.current_question.is_some());
    }

    #[test]
    fn test_webhook_url_prefers_config() {
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("internal:8000"));

        assert_eq!(
            webhook_url(Some("https://bot.example.com/"), &headers).as_deref(),
            Some("https://bot.example.com/webhook")
        );
        assert_eq!(
            webhook_url(None, &headers).as_deref(),
            Some("https://internal:8000/webhook")
        );

        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
        assert_eq!(webhook_url(None, &headers).as_deref(), Some("http://internal:8000/webhook"));
        assert_eq!(webhook_url(None, &HeaderMap::new()), None);
    }

    #[test]
    fn test_no_secret_configured_allows_all() {
        assert!(is_authorized(None, &HeaderMap::new()));
        assert!(is_authorized(Some("s"), &secret_headers("s")));
        assert!(!is_authorized(Some("s"), &HeaderMap::new()));
    }
}
