use std::sync::Arc;

use chrono::Utc;

use crate::{
    quiz::{AnswerOutcome, QuizReport, QuizSession, SessionError, Step, TestType, UserStats},
    service::{
        generator::{generate_question, QuestionGenerator},
        user::UserService,
        ServiceError,
    },
    storage::StorageManager,
};

const SESSION_PREFIX: &str = "session";

/// A question that was just put in front of the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Presented {
    pub test_type: TestType,
    pub number: u32,
    pub total: u32,
    pub question: crate::quiz::Question,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Question(Presented),
    Completed {
        test_type: TestType,
        report: QuizReport,
        stats: UserStats,
    },
    NoSession,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerResult {
    Answered {
        test_type: TestType,
        outcome: AnswerOutcome,
        score: u32,
        total: u32,
        /// Aggregate after this answer, streak included.
        stats: UserStats,
        /// Set when this answer completed the test.
        report: Option<QuizReport>,
    },
    NoSession,
    Rejected(SessionError),
}

/// Drives quiz sessions: one per user, kept under `session:<user id>`.
#[derive(Clone)]
pub struct QuizService {
    storage: StorageManager,
    users: UserService,
    generator: Arc<dyn QuestionGenerator>,
}

impl QuizService {
    pub fn new(storage: StorageManager, users: UserService, generator: Arc<dyn QuestionGenerator>) -> Self {
        info!("Initializing QuizService...");
        Self {
            storage,
            users,
            generator,
        }
    }

    pub async fn get_session(&self, telegram_user_id: &str) -> Result<Option<QuizSession>, ServiceError> {
        Ok(self.storage.get_or_discard(SESSION_PREFIX, telegram_user_id).await?)
    }

    async fn save_session(&self, telegram_user_id: &str, session: &QuizSession) -> Result<(), ServiceError> {
        Ok(self.storage.set(SESSION_PREFIX, telegram_user_id, session).await?)
    }

    async fn delete_session(&self, telegram_user_id: &str) -> Result<(), ServiceError> {
        Ok(self.storage.del(SESSION_PREFIX, telegram_user_id).await?)
    }

    /// Replaces any existing session and presents the first question.
    pub async fn start_test(&self, telegram_user_id: &str, test_type: TestType) -> Result<Presented, ServiceError> {
        let difficulty = self.users.get_difficulty(telegram_user_id).await?;
        let mut session = QuizSession::start(test_type, difficulty, Utc::now());

        info!(
            "User {} starting {} test ({} questions, {})",
            telegram_user_id, test_type, session.total_questions, difficulty
        );

        let presented = self.present_next(&mut session).await;
        self.save_session(telegram_user_id, &session).await?;

        Ok(presented)
    }

    pub async fn next_question(&self, telegram_user_id: &str) -> Result<Advance, ServiceError> {
        let Some(mut session) = self.get_session(telegram_user_id).await? else {
            return Ok(Advance::NoSession);
        };

        match session.advance() {
            Step::Pending { number, question } => Ok(Advance::Question(Presented {
                test_type: session.test_type,
                number,
                total: session.total_questions,
                question,
            })),
            Step::NeedQuestion => {
                let presented = self.present_next(&mut session).await;
                self.save_session(telegram_user_id, &session).await?;
                Ok(Advance::Question(presented))
            }
            Step::Completed(report) => {
                let stats = self.complete(telegram_user_id, &session, &report).await?;

                Ok(Advance::Completed {
                    test_type: session.test_type,
                    report,
                    stats,
                })
            }
        }
    }

    pub async fn answer(
        &self,
        telegram_user_id: &str,
        option: usize,
        question: Option<u32>,
    ) -> Result<AnswerResult, ServiceError> {
        let Some(mut session) = self.get_session(telegram_user_id).await? else {
            return Ok(AnswerResult::NoSession);
        };

        let outcome = match session.answer(option, question) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("Answer from user {} rejected: {}", telegram_user_id, e);
                return Ok(AnswerResult::Rejected(e));
            }
        };

        let (stats, report) = if session.test_type.is_single_shot() {
            self.delete_session(telegram_user_id).await?;
            let stats = self.users.record_single_answer(telegram_user_id, outcome.correct).await?;
            (stats, None)
        } else if outcome.finished {
            self.users.record_streak(telegram_user_id, outcome.correct).await?;
            let report = session.report();
            let stats = self.complete(telegram_user_id, &session, &report).await?;
            (stats, Some(report))
        } else {
            self.save_session(telegram_user_id, &session).await?;
            let stats = self.users.record_streak(telegram_user_id, outcome.correct).await?;
            (stats, None)
        };

        Ok(AnswerResult::Answered {
            test_type: session.test_type,
            outcome,
            score: session.score,
            total: session.total_questions,
            stats,
            report,
        })
    }

    /// Deletes the session and records the finished test.
    async fn complete(
        &self,
        telegram_user_id: &str,
        session: &QuizSession,
        report: &QuizReport,
    ) -> Result<UserStats, ServiceError> {
        self.delete_session(telegram_user_id).await?;

        let stats = if session.test_type.is_single_shot() {
            self.users.get_stats(telegram_user_id).await?
        } else {
            self.users.record_test(telegram_user_id, report).await?
        };

        info!(
            "User {} completed {} test: {}/{} ({}%)",
            telegram_user_id, session.test_type, report.score, report.total_questions, report.percentage
        );

        Ok(stats)
    }

    /// Abandons the session without touching stats. Returns what was abandoned.
    pub async fn end_test(&self, telegram_user_id: &str) -> Result<Option<QuizSession>, ServiceError> {
        let session = self.get_session(telegram_user_id).await?;
        if session.is_some() {
            self.delete_session(telegram_user_id).await?;
            info!("User {} ended their test early", telegram_user_id);
        }
        Ok(session)
    }

    async fn present_next(&self, session: &mut QuizSession) -> Presented {
        let category = session.test_type.pick_category();
        let question = generate_question(self.generator.as_ref(), session.difficulty, category).await;
        let number = session.present(question.clone());

        Presented {
            test_type: session.test_type,
            number,
            total: session.total_questions,
            question,
        }
    }
}
