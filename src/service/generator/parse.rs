use serde::Deserialize;
use serde_json::Value;

use crate::quiz::{Category, Difficulty, Question, OPTION_COUNT};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("no JSON object in response")]
    NoJson,
    #[error("malformed JSON: {0}")]
    Malformed(String),
    #[error("invalid question: {0}")]
    Invalid(&'static str),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<Value>,
    #[serde(default)]
    correct_answer: Value,
    #[serde(default)]
    explanation: String,
}

/// Outermost `{...}` of the text; models like to wrap JSON in prose or code fences.
fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Accepts `2`, `"2"` or `"C"`.
fn answer_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<usize>() {
                return Some(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ ('A'..='D' | 'a'..='d')), None) => Some(c.to_ascii_uppercase() as usize - 'A' as usize),
                _ => None,
            }
        }
        _ => None,
    }
}

pub fn parse_question(raw: &str, difficulty: Difficulty, category: Category) -> Result<Question, ParseError> {
    let json = extract_json(raw).ok_or(ParseError::NoJson)?;
    let parsed: RawQuestion = serde_json::from_str(json).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let question = parsed.question.trim().to_string();
    if question.is_empty() {
        return Err(ParseError::Invalid("empty question"));
    }

    let options: Vec<String> = parsed.options.iter().map(option_text).collect();
    if options.len() != OPTION_COUNT {
        return Err(ParseError::Invalid("expected exactly 4 options"));
    }
    if options.iter().any(String::is_empty) {
        return Err(ParseError::Invalid("empty option"));
    }

    let correct_answer = answer_index(&parsed.correct_answer)
        .filter(|i| *i < OPTION_COUNT)
        .ok_or(ParseError::Invalid("correct answer out of range"))?;

    let explanation = match parsed.explanation.trim() {
        "" => format!("The correct answer is {}.", options[correct_answer]),
        text => text.to_string(),
    };

    Ok(Question {
        question,
        options,
        correct_answer,
        difficulty,
        category: category.label().to_string(),
        explanation,
    })
}
