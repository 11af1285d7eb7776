use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_IQ: i32 = 70;
pub const MAX_IQ: i32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Exceptional,
    Excellent,
    VeryGood,
    Good,
    Average,
    NeedsImprovement,
}

impl PerformanceTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => PerformanceTier::Exceptional,
            80..=89 => PerformanceTier::Excellent,
            70..=79 => PerformanceTier::VeryGood,
            60..=69 => PerformanceTier::Good,
            50..=59 => PerformanceTier::Average,
            _ => PerformanceTier::NeedsImprovement,
        }
    }

    /// Locale key suffix, e.g. `tiers.very_good`.
    pub fn key(&self) -> &'static str {
        match self {
            PerformanceTier::Exceptional => "exceptional",
            PerformanceTier::Excellent => "excellent",
            PerformanceTier::VeryGood => "very_good",
            PerformanceTier::Good => "good",
            PerformanceTier::Average => "average",
            PerformanceTier::NeedsImprovement => "needs_improvement",
        }
    }
}

/// `round(part / total * 100)`, 0 when `total` is 0.
pub fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = f64::from(part.min(total)) / f64::from(total);
    (ratio * 100.0).round() as u32
}

/// Longer tests are trusted more, so the deviation from 100 is stretched.
fn scaling_factor(total_questions: u32) -> f64 {
    if total_questions > 25 {
        1.2
    } else if total_questions > 10 {
        1.1
    } else {
        1.0
    }
}

pub fn estimate_iq(percentage: u32, total_questions: u32) -> i32 {
    let deviation = (f64::from(percentage) - 50.0) / 50.0;
    let raw = (100.0 + deviation * 50.0 * scaling_factor(total_questions)).round() as i32;
    raw.clamp(MIN_IQ, MAX_IQ)
}

/// Terminal report of a finished test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizReport {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub estimated_iq: i32,
    pub tier: PerformanceTier,
}

impl QuizReport {
    pub fn new(score: u32, total_questions: u32) -> Self {
        let percentage = percentage(score, total_questions);
        Self {
            score,
            total_questions,
            percentage,
            estimated_iq: estimate_iq(percentage, total_questions),
            tier: PerformanceTier::from_percentage(percentage),
        }
    }
}

/// Durable per-user aggregate. Never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_tests: u32,
    pub total_questions_answered: u32,
    pub correct_answers: u32,
    pub average_score: u32,
    pub best_score: u32,
    pub last_test_date: Option<DateTime<Utc>>,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl UserStats {
    /// Folds a completed test into the aggregate.
    pub fn with_test(&self, score: u32, total_questions: u32, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.total_tests += 1;
        next.total_questions_answered += total_questions;
        next.correct_answers += score.min(total_questions);
        next.best_score = next.best_score.max(percentage(score, total_questions));
        next.last_test_date = Some(now);
        next.recompute_average();
        next
    }

    /// Folds a single stand-alone answer (random question) into the aggregate.
    pub fn with_answer(&self, correct: bool, now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.total_questions_answered += 1;
        if correct {
            next.correct_answers += 1;
        }
        next.last_test_date = Some(now);
        next.recompute_average();
        next
    }

    pub fn with_streak(&self, correct: bool) -> Self {
        let mut next = self.clone();
        if correct {
            next.current_streak += 1;
            next.best_streak = next.best_streak.max(next.current_streak);
        } else {
            next.current_streak = 0;
        }
        next
    }

    pub fn has_history(&self) -> bool {
        self.total_questions_answered > 0
    }

    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_percentage(self.average_score)
    }

    fn recompute_average(&mut self) {
        self.average_score = if self.total_questions_answered > 0 {
            percentage(self.correct_answers, self.total_questions_answered)
        } else {
            0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounding_and_bounds() {
        assert_eq!(percentage(8, 10), 80);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 25), 0);
        assert_eq!(percentage(50, 50), 100);
        assert_eq!(percentage(3, 0), 0);

        for total in 1..=50 {
            for score in 0..=total {
                let p = percentage(score, total);
                assert!(p <= 100);
                let expected = (score as f64 / total as f64 * 100.0).round() as u32;
                assert_eq!(p, expected);
            }
        }
    }

    #[test]
    fn test_estimated_iq_scenario() {
        let report = QuizReport::new(8, 10);
        assert_eq!(report.percentage, 80);
        assert_eq!(report.tier, PerformanceTier::Excellent);
        assert_eq!(report.estimated_iq, 130);
    }

    #[test]
    fn test_estimated_iq_scaling() {
        assert_eq!(estimate_iq(100, 10), 150);
        assert_eq!(estimate_iq(100, 20), 155);
        assert_eq!(estimate_iq(100, 50), 160);
        assert_eq!(estimate_iq(0, 10), 70);
        assert_eq!(estimate_iq(0, 50), 70);
        assert_eq!(estimate_iq(50, 50), 100);
    }

    #[test]
    fn test_estimated_iq_monotonic_and_clamped() {
        for total in [1, 10, 20, 25, 50] {
            let mut previous = i32::MIN;
            for p in 0..=100 {
                let iq = estimate_iq(p, total);
                assert!((MIN_IQ..=MAX_IQ).contains(&iq));
                assert!(iq >= previous);
                previous = iq;
            }
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(PerformanceTier::from_percentage(100), PerformanceTier::Exceptional);
        assert_eq!(PerformanceTier::from_percentage(90), PerformanceTier::Exceptional);
        assert_eq!(PerformanceTier::from_percentage(89), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_percentage(80), PerformanceTier::Excellent);
        assert_eq!(PerformanceTier::from_percentage(79), PerformanceTier::VeryGood);
        assert_eq!(PerformanceTier::from_percentage(60), PerformanceTier::Good);
        assert_eq!(PerformanceTier::from_percentage(50), PerformanceTier::Average);
        assert_eq!(PerformanceTier::from_percentage(49), PerformanceTier::NeedsImprovement);
        assert_eq!(PerformanceTier::from_percentage(0), PerformanceTier::NeedsImprovement);
    }

    #[test]
    fn test_with_test_is_pure() {
        let now = Utc::now();
        let existing = UserStats::default();

        let a = existing.with_test(8, 10, now);
        let b = existing.with_test(8, 10, now);
        assert_eq!(a, b);
        assert_eq!(existing, UserStats::default());

        assert_eq!(a.total_tests, 1);
        assert_eq!(a.total_questions_answered, 10);
        assert_eq!(a.correct_answers, 8);
        assert_eq!(a.average_score, 80);
        assert_eq!(a.best_score, 80);
        assert_eq!(a.last_test_date, Some(now));
    }

    #[test]
    fn test_average_recomputed_not_drifting() {
        let now = Utc::now();
        let stats = UserStats::default()
            .with_test(7, 10, now)
            .with_answer(true, now)
            .with_test(13, 25, now)
            .with_answer(false, now)
            .with_test(1, 3, now);

        assert_eq!(stats.total_questions_answered, 40);
        assert_eq!(stats.correct_answers, 22);
        assert_eq!(stats.average_score, percentage(22, 40));
        assert_eq!(stats.best_score, 70);
        assert_eq!(stats.total_tests, 3);
    }

    #[test]
    fn test_with_answer_does_not_count_as_test() {
        let stats = UserStats::default().with_answer(true, Utc::now());
        assert_eq!(stats.total_tests, 0);
        assert_eq!(stats.best_score, 0);
        assert_eq!(stats.average_score, 100);
    }

    #[test]
    fn test_streaks() {
        let stats = UserStats::default()
            .with_streak(true)
            .with_streak(true)
            .with_streak(true)
            .with_streak(false)
            .with_streak(true);

        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 3);
    }

    #[test]
    fn test_empty_stats_have_no_history() {
        let stats = UserStats::default();
        assert!(!stats.has_history());
        assert_eq!(stats.average_score, 0);
    }

    #[test]
    fn test_stats_deserialize_with_missing_fields() {
        let stats: UserStats = serde_json::from_str(r#"{"totalTests":2,"correctAnswers":5}"#).unwrap();
        assert_eq!(stats.total_tests, 2);
        assert_eq!(stats.correct_answers, 5);
        assert_eq!(stats.current_streak, 0);
    }
}
