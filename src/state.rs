use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::BotResult,
    service::{
        generator::{DisabledGenerator, QuestionGenerator, WorkersAiClient},
        ServiceRegistry,
    },
    storage::StorageManager,
};

/// Shared by the webhook server and injected into every handler as a dptree dependency.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service_registry: ServiceRegistry,
}

impl AppState {
    pub async fn new(config: AppConfig) -> BotResult<Self> {
        let storage = StorageManager::init(&config.storage).await?;

        let generator: Arc<dyn QuestionGenerator> = if config.generator.is_enabled() {
            match WorkersAiClient::from_config(&config.generator)? {
                Some(client) => {
                    info!("Question generation via Workers AI ({})", config.generator.model);
                    Arc::new(client)
                }
                None => Arc::new(DisabledGenerator),
            }
        } else {
            warn!("AI_ACCOUNT_ID/AI_API_TOKEN not set, questions come from the fallback pool only");
            Arc::new(DisabledGenerator)
        };

        Ok(Self::with_parts(config, storage, generator))
    }

    pub fn with_parts(config: AppConfig, storage: StorageManager, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            service_registry: ServiceRegistry::new(storage, generator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::TestType;

    #[tokio::test]
    async fn test_without_ai_credentials_questions_come_from_fallback() {
        let config = AppConfig::new_test_config();
        assert!(!config.generator.is_enabled());

        let state = AppState::new(config).await.unwrap();
        let presented = state
            .service_registry
            .quiz
            .start_test("1", TestType::Quick)
            .await
            .unwrap();

        assert_eq!(presented.question.options.len(), 4);
        assert!(!presented.question.explanation.is_empty());
    }
}
