use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::quiz::{CallbackAction, Difficulty, Question, TestType};

fn button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.to_string())
}

pub fn get_main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![button(t!("buttons.main_menu.tests"), CallbackAction::TestsMenu)],
        vec![button(
            t!("buttons.main_menu.random"),
            CallbackAction::StartTest(TestType::Random),
        )],
        vec![
            button(t!("buttons.main_menu.stats"), CallbackAction::Stats),
            button(t!("buttons.main_menu.leaderboard"), CallbackAction::Leaderboard),
        ],
        vec![button(t!("buttons.main_menu.difficulty"), CallbackAction::DifficultyMenu)],
    ])
}

/// Two test types per row.
pub fn get_tests_menu_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = TestType::ALL
        .into_iter()
        .map(|test_type| {
            button(
                t!(format!("buttons.tests.{}", test_type)),
                CallbackAction::StartTest(test_type),
            )
        })
        .collect();

    InlineKeyboardMarkup::new(buttons.chunks(2).map(|row| row.to_vec()))
}

/// One button per option, carrying the question number so stale taps can be detected.
pub fn get_answer_keyboard(question: &Question, number: u32, single_shot: bool) -> InlineKeyboardMarkup {
    let letters: Vec<InlineKeyboardButton> = (0..question.options.len())
        .map(|option| {
            button(
                Question::option_letter(option).to_string(),
                CallbackAction::Answer {
                    option,
                    question: Some(number),
                },
            )
        })
        .collect();

    let mut keyboard = vec![letters];

    if !single_shot {
        keyboard.push(vec![button(t!("buttons.end_test"), CallbackAction::EndTest)]);
    }

    InlineKeyboardMarkup::new(keyboard)
}

pub fn get_after_answer_keyboard(single_shot: bool) -> InlineKeyboardMarkup {
    if single_shot {
        return InlineKeyboardMarkup::new([
            vec![button(
                t!("buttons.another_random"),
                CallbackAction::StartTest(TestType::Random),
            )],
            vec![
                button(t!("buttons.new_test"), CallbackAction::TestsMenu),
                button(t!("buttons.stats"), CallbackAction::Stats),
            ],
        ]);
    }

    InlineKeyboardMarkup::new([
        vec![button(t!("buttons.next_question"), CallbackAction::NextQuestion)],
        vec![button(t!("buttons.end_test"), CallbackAction::EndTest)],
    ])
}

pub fn get_report_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([
        vec![button(t!("buttons.new_test"), CallbackAction::TestsMenu)],
        vec![
            button(t!("buttons.stats"), CallbackAction::Stats),
            button(t!("buttons.leaderboard"), CallbackAction::Leaderboard),
        ],
    ])
}

pub fn get_difficulty_keyboard(current: Difficulty) -> InlineKeyboardMarkup {
    let buttons = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard].map(|difficulty| {
        let mut text = t!(format!("buttons.difficulty.{}", difficulty)).to_string();
        if difficulty == current {
            text.push_str(" ✓");
        }
        vec![button(text, CallbackAction::SetDifficulty(difficulty))]
    });

    InlineKeyboardMarkup::new(buttons)
}

pub fn get_tests_menu_button_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[button(t!("buttons.new_test"), CallbackAction::TestsMenu)]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_answer_keyboard_carries_question_number() {
        let question = Question {
            question: "?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 1,
            difficulty: Difficulty::Medium,
            category: "pattern recognition".to_string(),
            explanation: String::new(),
        };

        let data = callback_data(&get_answer_keyboard(&question, 7, false));
        assert_eq!(data, vec!["answer_0_7", "answer_1_7", "answer_2_7", "answer_3_7", "end_test"]);

        let data = callback_data(&get_answer_keyboard(&question, 1, true));
        assert!(!data.contains(&"end_test".to_string()));
    }

    #[test]
    fn test_tests_menu_lists_every_type() {
        let data = callback_data(&get_tests_menu_keyboard());
        assert_eq!(data.len(), TestType::ALL.len());
        assert!(data.contains(&"test_quick".to_string()));
        assert!(data.contains(&"test_random".to_string()));
    }

    #[test]
    fn test_after_answer_variants() {
        assert_eq!(
            callback_data(&get_after_answer_keyboard(false)),
            vec!["next_question", "end_test"]
        );
        assert_eq!(
            callback_data(&get_after_answer_keyboard(true)),
            vec!["test_random", "tests_menu", "stats"]
        );
    }
}
