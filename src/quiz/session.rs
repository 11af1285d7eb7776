use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Difficulty, Question, QuizReport, TestType};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("No question is awaiting an answer")]
    NoPendingQuestion,
    #[error("Answer is for question {given}, current question is {current}")]
    StaleQuestion { given: u32, current: u32 },
    #[error("Option {0} does not exist")]
    InvalidOption(usize),
}

/// One user's in-progress test. Lives in the store under `session:<user id>`
/// and is replaced wholesale on every start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub test_type: TestType,
    pub difficulty: Difficulty,
    pub current_question_index: u32,
    pub score: u32,
    pub questions_answered: u32,
    pub total_questions: u32,
    pub start_time: DateTime<Utc>,
    pub current_question: Option<Question>,
}

/// What `advance` asks the caller to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Generate a new question and hand it to [`QuizSession::present`].
    NeedQuestion,
    /// The current question is still unanswered; show it again.
    Pending { number: u32, question: Question },
    /// All questions were asked.
    Completed(QuizReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question: Question,
    pub number: u32,
    pub selected: usize,
    pub correct: bool,
    /// Every question of the session has been answered.
    pub finished: bool,
}

impl QuizSession {
    pub fn start(test_type: TestType, difficulty: Difficulty, now: DateTime<Utc>) -> Self {
        Self {
            test_type,
            difficulty,
            current_question_index: 0,
            score: 0,
            questions_answered: 0,
            total_questions: test_type.total_questions(),
            start_time: now,
            current_question: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_question_index >= self.total_questions
    }

    pub fn advance(&self) -> Step {
        if let Some(question) = &self.current_question {
            return Step::Pending {
                number: self.current_question_index,
                question: question.clone(),
            };
        }

        if self.is_complete() {
            Step::Completed(self.report())
        } else {
            Step::NeedQuestion
        }
    }

    /// Stores `question` as the one awaiting an answer and returns its 1-based number.
    pub fn present(&mut self, question: Question) -> u32 {
        self.current_question = Some(question);
        self.current_question_index += 1;
        self.current_question_index
    }

    /// Scores `selected` against the pending question. `number` is the question
    /// number carried by the button, when it has one.
    pub fn answer(&mut self, selected: usize, number: Option<u32>) -> Result<AnswerOutcome, SessionError> {
        let question = self.current_question.as_ref().ok_or(SessionError::NoPendingQuestion)?;

        if let Some(given) = number {
            if given != self.current_question_index {
                return Err(SessionError::StaleQuestion {
                    given,
                    current: self.current_question_index,
                });
            }
        }

        if selected >= question.options.len() {
            return Err(SessionError::InvalidOption(selected));
        }

        let correct = question.is_correct(selected);
        if correct {
            self.score += 1;
        }
        self.questions_answered += 1;

        let question = self.current_question.take().ok_or(SessionError::NoPendingQuestion)?;

        Ok(AnswerOutcome {
            question,
            number: self.current_question_index,
            selected,
            correct,
            finished: self.questions_answered >= self.total_questions,
        })
    }

    pub fn report(&self) -> QuizReport {
        QuizReport::new(self.score, self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::PerformanceTier;

    fn question(correct: usize) -> Question {
        Question {
            question: "Which number comes next: 2, 4, 8, 16?".to_string(),
            options: vec!["18".into(), "24".into(), "32".into(), "64".into()],
            correct_answer: correct,
            difficulty: Difficulty::Medium,
            category: "pattern recognition".to_string(),
            explanation: "Each term doubles.".to_string(),
        }
    }

    #[test]
    fn test_start_sets_totals_from_test_type() {
        let now = Utc::now();
        let session = QuizSession::start(TestType::Quick, Difficulty::Easy, now);

        assert_eq!(session.total_questions, 10);
        assert_eq!(session.current_question_index, 0);
        assert_eq!(session.score, 0);
        assert_eq!(session.questions_answered, 0);
        assert_eq!(session.start_time, now);
        assert!(session.current_question.is_none());

        assert_eq!(QuizSession::start(TestType::Standard, Difficulty::Easy, now).total_questions, 25);
        assert_eq!(QuizSession::start(TestType::Full, Difficulty::Easy, now).total_questions, 50);
        assert_eq!(QuizSession::start(TestType::Verbal, Difficulty::Easy, now).total_questions, 20);
    }

    #[test]
    fn test_correct_answer_increments_score() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        assert_eq!(session.advance(), Step::NeedQuestion);

        let number = session.present(question(2));
        assert_eq!(number, 1);

        let outcome = session.answer(2, Some(1)).unwrap();
        assert!(outcome.correct);
        assert!(!outcome.finished);
        assert_eq!(session.score, 1);
        assert_eq!(session.questions_answered, 1);
        assert!(session.current_question.is_none());
    }

    #[test]
    fn test_wrong_answer_keeps_score() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        session.present(question(2));

        let outcome = session.answer(0, None).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.selected, 0);
        assert_eq!(session.score, 0);
        assert_eq!(session.questions_answered, 1);
    }

    #[test]
    fn test_second_answer_is_rejected() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        session.present(question(1));
        session.answer(1, Some(1)).unwrap();

        assert_eq!(session.answer(1, Some(1)), Err(SessionError::NoPendingQuestion));
        assert_eq!(session.score, 1);
        assert_eq!(session.questions_answered, 1);
    }

    #[test]
    fn test_stale_button_is_rejected() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        session.present(question(1));
        session.answer(1, Some(1)).unwrap();
        session.present(question(0));

        assert_eq!(
            session.answer(0, Some(1)),
            Err(SessionError::StaleQuestion { given: 1, current: 2 })
        );
        assert_eq!(session.questions_answered, 1);
    }

    #[test]
    fn test_out_of_range_option_is_rejected() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        session.present(question(1));

        assert_eq!(session.answer(4, None), Err(SessionError::InvalidOption(4)));
        assert!(session.current_question.is_some());
    }

    #[test]
    fn test_advance_with_pending_question_repeats_it() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        session.present(question(3));

        match session.advance() {
            Step::Pending { number, question: q } => {
                assert_eq!(number, 1);
                assert_eq!(q.correct_answer, 3);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_full_run_completes_with_report() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());

        for i in 0..10 {
            assert_eq!(session.advance(), Step::NeedQuestion);
            session.present(question(0));
            let selected = if i < 8 { 0 } else { 1 };
            let outcome = session.answer(selected, Some(i + 1)).unwrap();
            assert_eq!(outcome.finished, i == 9);
            assert!(session.questions_answered <= session.current_question_index);
            assert!(session.current_question_index <= session.total_questions);
        }

        match session.advance() {
            Step::Completed(report) => {
                assert_eq!(report.percentage, 80);
                assert_eq!(report.estimated_iq, 130);
                assert_eq!(report.tier, PerformanceTier::Excellent);
            }
            other => panic!("unexpected step: {:?}", other),
        }
    }

    #[test]
    fn test_restart_does_not_carry_pending_question() {
        let mut session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        session.present(question(0));

        let session = QuizSession::start(TestType::Quick, Difficulty::Medium, Utc::now());
        assert!(session.current_question.is_none());
        assert_eq!(session.current_question_index, 0);
    }

    #[test]
    fn test_session_json_roundtrip() {
        let mut session = QuizSession::start(TestType::Logic, Difficulty::Hard, Utc::now());
        session.present(question(2));

        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"currentQuestionIndex\":1"));
        assert!(json.contains("\"testType\":\"logic\""));

        let restored: QuizSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }
}
