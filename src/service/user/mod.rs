mod model;

pub use model::*;

use chrono::Utc;

use crate::{
    quiz::{Difficulty, QuizReport, UserStats},
    service::ServiceError,
    storage::StorageManager,
};

const PROFILE_PREFIX: &str = "profile";
const STATS_PREFIX: &str = "stats";
const LEADERBOARD_KEY: &str = "leaderboard";

/// Durable per-user records: profile, stats and the shared leaderboard.
#[derive(Clone)]
pub struct UserService {
    storage: StorageManager,
}

impl UserService {
    pub fn new(storage: StorageManager) -> Self {
        info!("Initializing UserService...");
        Self { storage }
    }

    pub async fn get_profile(&self, telegram_user_id: &str) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.storage.get_or_discard(PROFILE_PREFIX, telegram_user_id).await?)
    }

    /// Creates the profile on first contact, otherwise refreshes names and activity.
    pub async fn touch_profile(
        &self,
        telegram_user_id: &str,
        username: Option<&str>,
        first_name: &str,
    ) -> Result<UserProfile, ServiceError> {
        let now = Utc::now();

        let profile = match self.get_profile(telegram_user_id).await? {
            Some(mut profile) => {
                profile.username = username.map(str::to_string);
                profile.first_name = first_name.to_string();
                profile.last_active_at = now;
                profile
            }
            None => {
                info!("Creating profile for user {}", telegram_user_id);
                UserProfile {
                    telegram_user_id: telegram_user_id.to_string(),
                    username: username.map(str::to_string),
                    first_name: first_name.to_string(),
                    difficulty: Difficulty::default(),
                    created_at: now,
                    last_active_at: now,
                }
            }
        };

        self.storage.set(PROFILE_PREFIX, telegram_user_id, &profile).await?;
        Ok(profile)
    }

    pub async fn get_difficulty(&self, telegram_user_id: &str) -> Result<Difficulty, ServiceError> {
        Ok(self
            .get_profile(telegram_user_id)
            .await?
            .map(|p| p.difficulty)
            .unwrap_or_default())
    }

    pub async fn set_difficulty(
        &self,
        telegram_user_id: &str,
        difficulty: Difficulty,
    ) -> Result<Option<UserProfile>, ServiceError> {
        let Some(mut profile) = self.get_profile(telegram_user_id).await? else {
            warn!("No profile for user {}, difficulty not saved", telegram_user_id);
            return Ok(None);
        };

        profile.difficulty = difficulty;
        profile.last_active_at = Utc::now();
        self.storage.set(PROFILE_PREFIX, telegram_user_id, &profile).await?;

        Ok(Some(profile))
    }

    pub async fn get_stats(&self, telegram_user_id: &str) -> Result<UserStats, ServiceError> {
        Ok(self
            .storage
            .get::<UserStats>(STATS_PREFIX, telegram_user_id)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_stats(&self, telegram_user_id: &str, stats: &UserStats) -> Result<(), ServiceError> {
        Ok(self.storage.set(STATS_PREFIX, telegram_user_id, stats).await?)
    }

    pub async fn record_streak(&self, telegram_user_id: &str, correct: bool) -> Result<UserStats, ServiceError> {
        let stats = self.get_stats(telegram_user_id).await?.with_streak(correct);
        self.save_stats(telegram_user_id, &stats).await?;
        Ok(stats)
    }

    /// Folds a completed test into the stats and the leaderboard.
    pub async fn record_test(&self, telegram_user_id: &str, report: &QuizReport) -> Result<UserStats, ServiceError> {
        let now = Utc::now();

        let stats = self
            .get_stats(telegram_user_id)
            .await?
            .with_test(report.score, report.total_questions, now);
        self.save_stats(telegram_user_id, &stats).await?;

        let name = match self.get_profile(telegram_user_id).await? {
            Some(profile) => profile.display_name(),
            None => telegram_user_id.to_string(),
        };

        let entry = LeaderboardEntry {
            telegram_user_id: telegram_user_id.to_string(),
            name,
            estimated_iq: report.estimated_iq,
            percentage: report.percentage,
            recorded_at: now,
        };
        let board = insert_entry(self.get_leaderboard().await?, entry);
        self.storage.set(LEADERBOARD_KEY, "", &board).await?;

        Ok(stats)
    }

    /// Folds a stand-alone answer (random question) into the stats, streak included.
    pub async fn record_single_answer(&self, telegram_user_id: &str, correct: bool) -> Result<UserStats, ServiceError> {
        let stats = self
            .get_stats(telegram_user_id)
            .await?
            .with_streak(correct)
            .with_answer(correct, Utc::now());
        self.save_stats(telegram_user_id, &stats).await?;
        Ok(stats)
    }

    pub async fn get_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        Ok(self
            .storage
            .get::<Vec<LeaderboardEntry>>(LEADERBOARD_KEY, "")
            .await?
            .unwrap_or_default())
    }
}
