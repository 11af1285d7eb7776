mod fallback;
mod parse;
mod workers_ai;

pub use fallback::fallback_question;
pub use parse::parse_question;
pub use workers_ai::WorkersAiClient;

use async_trait::async_trait;

use crate::quiz::{Category, Difficulty, Question};

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Api error: {0}")]
    Api(String),
    #[error("Generator is not configured")]
    Unavailable,
}

/// Text-completion backend. Returns whatever the model produced; callers must
/// not assume it is valid JSON.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Used when no inference credentials are configured: every question comes from the fallback pool.
pub struct DisabledGenerator;

#[async_trait]
impl QuestionGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::Unavailable)
    }
}

pub fn build_prompt(difficulty: Difficulty, category: Category) -> String {
    format!(
        r#"Generate a challenging IQ question for {difficulty} difficulty level in the category of {category}.

Requirements:
- Create an original, thought-provoking question
- Provide exactly 4 multiple choice options
- Include a clear explanation of the correct answer
- Make it appropriate for {difficulty} level
- Focus on {category}

Respond with JSON only, no other text:
{{
  "question": "The actual question text",
  "options": ["Option A", "Option B", "Option C", "Option D"],
  "correctAnswer": 0,
  "explanation": "Detailed explanation of why this is correct",
  "difficulty": "{difficulty}",
  "category": "{category}"
}}"#,
        difficulty = difficulty,
        category = category.label(),
    )
}

/// Always yields a usable question: generator or parse failures fall back to the static pool.
pub async fn generate_question(
    generator: &dyn QuestionGenerator,
    difficulty: Difficulty,
    category: Category,
) -> Question {
    let prompt = build_prompt(difficulty, category);

    match generator.generate(&prompt).await {
        Ok(raw) => match parse_question(&raw, difficulty, category) {
            Ok(question) => question,
            Err(e) => {
                warn!("Generated question rejected ({}), using fallback", e);
                fallback_question(difficulty, category)
            }
        },
        Err(GeneratorError::Unavailable) => {
            debug!("Generator unavailable, using fallback");
            fallback_question(difficulty, category)
        }
        Err(e) => {
            warn!("Question generation failed ({}), using fallback", e);
            fallback_question(difficulty, category)
        }
    }
}
