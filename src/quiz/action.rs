use std::fmt;
use std::str::FromStr;

use super::{Difficulty, TestType};

/// Typed form of an inline button's `callback_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    StartTest(TestType),
    Answer { option: usize, question: Option<u32> },
    NextQuestion,
    EndTest,
    SetDifficulty(Difficulty),
    DifficultyMenu,
    TestsMenu,
    Stats,
    Leaderboard,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized callback data: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for CallbackAction {
    type Err = UnknownAction;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownAction(data.to_string());

        match data {
            "next_question" => return Ok(CallbackAction::NextQuestion),
            "end_test" => return Ok(CallbackAction::EndTest),
            "difficulty_menu" => return Ok(CallbackAction::DifficultyMenu),
            "tests_menu" => return Ok(CallbackAction::TestsMenu),
            "stats" => return Ok(CallbackAction::Stats),
            "leaderboard" => return Ok(CallbackAction::Leaderboard),
            _ => {}
        }

        // Both `answer_1_3` and `difficulty:easy:3` styles are in the wild.
        let mut tokens = data.splitn(3, ['_', ':']);
        let head = tokens.next().unwrap_or_default();
        let arg = tokens.next().ok_or_else(unknown)?;
        let rest = tokens.next();

        match head {
            "test" => arg.parse().map(CallbackAction::StartTest).map_err(|_| unknown()),
            "difficulty" => arg.parse().map(CallbackAction::SetDifficulty).map_err(|_| unknown()),
            "answer" => {
                let option = arg.parse::<usize>().map_err(|_| unknown())?;
                // Older buttons carried an encoded payload here instead of a number.
                let question = rest.and_then(|r| r.parse::<u32>().ok());
                Ok(CallbackAction::Answer { option, question })
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::StartTest(t) => write!(f, "test_{}", t),
            CallbackAction::Answer {
                option,
                question: Some(q),
            } => write!(f, "answer_{}_{}", option, q),
            CallbackAction::Answer { option, question: None } => write!(f, "answer_{}", option),
            CallbackAction::NextQuestion => f.write_str("next_question"),
            CallbackAction::EndTest => f.write_str("end_test"),
            CallbackAction::SetDifficulty(d) => write!(f, "difficulty_{}", d),
            CallbackAction::DifficultyMenu => f.write_str("difficulty_menu"),
            CallbackAction::TestsMenu => f.write_str("tests_menu"),
            CallbackAction::Stats => f.write_str("stats"),
            CallbackAction::Leaderboard => f.write_str("leaderboard"),
        }
    }
}
