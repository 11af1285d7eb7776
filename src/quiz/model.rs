use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Named configuration selecting question count and topic focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Quick,
    Standard,
    Full,
    Math,
    Verbal,
    Logic,
    Spatial,
    Random,
}

impl TestType {
    pub const ALL: [TestType; 8] = [
        TestType::Quick,
        TestType::Standard,
        TestType::Full,
        TestType::Math,
        TestType::Verbal,
        TestType::Logic,
        TestType::Spatial,
        TestType::Random,
    ];

    pub fn total_questions(&self) -> u32 {
        match self {
            TestType::Quick => 10,
            TestType::Standard => 25,
            TestType::Full => 50,
            TestType::Math | TestType::Verbal | TestType::Logic | TestType::Spatial => 20,
            TestType::Random => 1,
        }
    }

    /// Fixed topic for subject tests, `None` for mixed tests.
    pub fn focus(&self) -> Option<Category> {
        match self {
            TestType::Math => Some(Category::Mathematical),
            TestType::Verbal => Some(Category::Verbal),
            TestType::Logic => Some(Category::Logical),
            TestType::Spatial => Some(Category::Spatial),
            _ => None,
        }
    }

    pub fn pick_category(&self) -> Category {
        self.focus().unwrap_or_else(Category::random)
    }

    pub fn is_single_shot(&self) -> bool {
        matches!(self, TestType::Random)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestType::Quick => "quick",
            TestType::Standard => "standard",
            TestType::Full => "full",
            TestType::Math => "math",
            TestType::Verbal => "verbal",
            TestType::Logic => "logic",
            TestType::Spatial => "spatial",
            TestType::Random => "random",
        };
        f.write_str(s)
    }
}

impl FromStr for TestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestType::ALL
            .into_iter()
            .find(|t| t.to_string() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown test type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(s)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Mathematical,
    Pattern,
    Verbal,
    Logical,
    Spatial,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Mathematical,
        Category::Pattern,
        Category::Verbal,
        Category::Logical,
        Category::Spatial,
    ];

    pub fn random() -> Self {
        *Category::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&Category::Logical)
    }

    /// Label used both in prompts and on screen.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Mathematical => "mathematical reasoning",
            Category::Pattern => "pattern recognition",
            Category::Verbal => "verbal intelligence",
            Category::Logical => "logical thinking",
            Category::Spatial => "spatial reasoning",
        }
    }
}

pub const OPTION_COUNT: usize = 4;

/// A multiple-choice question. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
    pub category: String,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }

    pub fn correct_option(&self) -> &str {
        self.options
            .get(self.correct_answer)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Letter shown on buttons: 0 -> A, 1 -> B, ...
    pub fn option_letter(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }
}
