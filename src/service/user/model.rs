use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::Difficulty;

pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub telegram_user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        crate::utils::display_name(self.username.as_deref(), &self.first_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub telegram_user_id: String,
    pub name: String,
    pub estimated_iq: i32,
    pub percentage: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Inserts `entry`, keeping one entry per user (their best), sorted best-first
/// and truncated to [`LEADERBOARD_SIZE`].
pub fn insert_entry(mut board: Vec<LeaderboardEntry>, entry: LeaderboardEntry) -> Vec<LeaderboardEntry> {
    match board.iter_mut().find(|e| e.telegram_user_id == entry.telegram_user_id) {
        Some(existing) => {
            existing.name = entry.name.clone();
            if (entry.estimated_iq, entry.percentage) > (existing.estimated_iq, existing.percentage) {
                *existing = entry;
            }
        }
        None => board.push(entry),
    }

    board.sort_by(|a, b| {
        b.estimated_iq
            .cmp(&a.estimated_iq)
            .then(b.percentage.cmp(&a.percentage))
            .then(a.recorded_at.cmp(&b.recorded_at))
    });
    board.truncate(LEADERBOARD_SIZE);
    board
}
