use rand::seq::SliceRandom;

use crate::quiz::{Category, Difficulty, Question};

struct FallbackEntry {
    question: &'static str,
    options: [&'static str; 4],
    correct_answer: usize,
    explanation: &'static str,
    category: Category,
}

static POOL: [FallbackEntry; 5] = [
    FallbackEntry {
        question: "If 2 + 2 = 4, and 3 + 3 = 6, what is 4 + 4?",
        options: ["6", "7", "8", "9"],
        correct_answer: 2,
        explanation: "Following the pattern, 4 + 4 = 8.",
        category: Category::Mathematical,
    },
    FallbackEntry {
        question: "Which number comes next in the sequence 2, 6, 12, 20, 30, ...?",
        options: ["36", "40", "42", "44"],
        correct_answer: 2,
        explanation: "The differences grow by 2 each time (4, 6, 8, 10, 12), so 30 + 12 = 42.",
        category: Category::Pattern,
    },
    FallbackEntry {
        question: "Book is to reading as fork is to ...",
        options: ["drawing", "writing", "eating", "stirring"],
        correct_answer: 2,
        explanation: "A book is used for reading, a fork is used for eating.",
        category: Category::Verbal,
    },
    FallbackEntry {
        question: "All bloops are razzies and all razzies are lazzies. Are all bloops definitely lazzies?",
        options: ["Yes", "No", "Only some", "Cannot be determined"],
        correct_answer: 0,
        explanation: "Bloops are a subset of razzies, which are a subset of lazzies, so every bloop is a lazzie.",
        category: Category::Logical,
    },
    FallbackEntry {
        question: "A cube is painted on all sides and cut into 27 equal smaller cubes. How many small cubes have exactly two painted faces?",
        options: ["6", "8", "12", "24"],
        correct_answer: 2,
        explanation: "Two-face cubes sit on the edges but not the corners: one per edge, and a cube has 12 edges.",
        category: Category::Spatial,
    },
];

/// An entry of the static pool for `category`, stamped with the requested
/// difficulty. Any entry will do when the category has none.
pub fn fallback_question(difficulty: Difficulty, category: Category) -> Question {
    let mut rng = rand::thread_rng();
    let matching: Vec<&FallbackEntry> = POOL.iter().filter(|e| e.category == category).collect();

    let entry = match matching.choose(&mut rng) {
        Some(entry) => *entry,
        None => POOL.choose(&mut rng).unwrap_or(&POOL[0]),
    };

    Question {
        question: entry.question.to_string(),
        options: entry.options.iter().map(|o| o.to_string()).collect(),
        correct_answer: entry.correct_answer,
        difficulty,
        category: entry.category.label().to_string(),
        explanation: entry.explanation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_entries_are_well_formed() {
        for entry in &POOL {
            assert!(entry.correct_answer < entry.options.len());
            assert!(!entry.question.is_empty());
            assert!(!entry.explanation.is_empty());
        }
    }

    #[test]
    fn test_fallback_matches_category() {
        for category in Category::ALL {
            let question = fallback_question(Difficulty::Easy, category);
            assert_eq!(question.category, category.label());
        }
    }

    #[test]
    fn test_fallback_keeps_difficulty() {
        for _ in 0..20 {
            let question = fallback_question(Difficulty::Hard, Category::random());
            assert_eq!(question.difficulty, Difficulty::Hard);
            assert_eq!(question.options.len(), 4);
            assert!(question.correct_answer < 4);
        }
    }
}
