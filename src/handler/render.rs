//! Message bodies. Everything is HTML; dynamic text goes through [`escape`].

use teloxide::utils::html::escape;

use crate::{
    quiz::{percentage, Difficulty, PerformanceTier, Question, QuizReport, QuizSession, UserStats},
    service::{LeaderboardEntry, Presented},
    utils::progress_bar,
};

const RANK_MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

pub fn difficulty_label(difficulty: Difficulty) -> String {
    t!(format!("difficulty.{}", difficulty)).to_string()
}

pub fn tier_label(tier: PerformanceTier) -> String {
    t!(format!("tiers.{}", tier.key())).to_string()
}

fn options_list(question: &Question) -> String {
    question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("<b>{}.</b> {}", Question::option_letter(i), escape(option)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn welcome(first_name: &str) -> String {
    t!("commands.start", first_name = escape(first_name)).to_string()
}

pub fn tests_menu(difficulty: Difficulty) -> String {
    t!("commands.test", difficulty = difficulty_label(difficulty)).to_string()
}

pub fn question(presented: &Presented) -> String {
    let q = &presented.question;
    let key = if presented.test_type.is_single_shot() {
        "quiz.random_question"
    } else {
        "quiz.question"
    };

    t!(
        key,
        number = presented.number,
        total = presented.total,
        difficulty = difficulty_label(q.difficulty),
        category = escape(&q.category),
        question = escape(&q.question),
        options = options_list(q)
    )
    .to_string()
}

/// Verdict, explanation and running score after an answer. `progress` is
/// `(score, answered, total)` inside a test, `None` for a single question.
pub fn answer_result(
    question: &Question,
    correct: bool,
    progress: Option<(u32, u32, u32)>,
    stats: &UserStats,
) -> String {
    let mut lines = Vec::new();

    if correct {
        lines.push(t!("quiz.correct").to_string());
    } else {
        lines.push(
            t!(
                "quiz.incorrect",
                letter = Question::option_letter(question.correct_answer),
                answer = escape(question.correct_option())
            )
            .to_string(),
        );
    }

    if !question.explanation.is_empty() {
        lines.push(t!("quiz.explanation", explanation = escape(&question.explanation)).to_string());
    }

    lines.push(String::new());

    match progress {
        Some((score, answered, total)) => lines.push(
            t!(
                "quiz.progress",
                score = score,
                answered = answered,
                total = total
            )
            .to_string(),
        ),
        None => lines.push(
            t!(
                "quiz.random_total",
                correct = stats.correct_answers,
                answered = stats.total_questions_answered,
                average = stats.average_score
            )
            .to_string(),
        ),
    }

    if stats.current_streak > 1 {
        lines.push(t!("quiz.streak", streak = stats.current_streak).to_string());
    }

    lines.join("\n")
}

pub fn report(report: &QuizReport) -> String {
    t!(
        "quiz.completed",
        score = report.score,
        total = report.total_questions,
        percentage = report.percentage,
        bar = progress_bar(report.percentage),
        iq = report.estimated_iq,
        tier = tier_label(report.tier)
    )
    .to_string()
}

/// Partial score of an abandoned session, over the questions answered so far.
pub fn ended(session: &QuizSession) -> String {
    t!(
        "quiz.ended",
        answered = session.questions_answered,
        total = session.total_questions,
        score = session.score,
        percentage = percentage(session.score, session.questions_answered)
    )
    .to_string()
}

pub fn stats(name: &str, stats: &UserStats, difficulty: Difficulty) -> String {
    if !stats.has_history() {
        return t!("stats.empty").to_string();
    }

    let last = match stats.last_test_date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => t!("stats.never").to_string(),
    };

    t!(
        "stats.summary",
        name = escape(name),
        tier = tier_label(stats.tier()),
        bar = progress_bar(stats.average_score),
        tests = stats.total_tests,
        answered = stats.total_questions_answered,
        correct = stats.correct_answers,
        average = stats.average_score,
        best = stats.best_score,
        streak = stats.current_streak,
        best_streak = stats.best_streak,
        last = last,
        difficulty = difficulty_label(difficulty)
    )
    .to_string()
}

pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return t!("leaderboard.empty").to_string();
    }

    let mut lines = vec![t!("leaderboard.title").to_string(), String::new()];

    for (i, entry) in entries.iter().enumerate() {
        let rank = match RANK_MEDALS.get(i) {
            Some(medal) => medal.to_string(),
            None => format!("{}.", i + 1),
        };

        lines.push(
            t!(
                "leaderboard.entry",
                rank = rank,
                name = escape(&entry.name),
                iq = entry.estimated_iq,
                percentage = entry.percentage
            )
            .to_string(),
        );
    }

    lines.join("\n")
}

pub fn difficulty_menu(current: Difficulty) -> String {
    t!("difficulty.menu", difficulty = difficulty_label(current)).to_string()
}

pub fn difficulty_set(difficulty: Difficulty) -> String {
    t!("difficulty.set", difficulty = difficulty_label(difficulty)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::TestType;
    use chrono::Utc;

    fn sample_question() -> Question {
        Question {
            question: "Is 3 < 5 & 5 > 4?".to_string(),
            options: vec!["Yes".into(), "No".into(), "<maybe>".into(), "Both".into()],
            correct_answer: 0,
            difficulty: Difficulty::Easy,
            category: "logical thinking".to_string(),
            explanation: "Both comparisons hold.".to_string(),
        }
    }

    #[test]
    fn test_question_is_escaped() {
        let text = question(&Presented {
            test_type: TestType::Quick,
            number: 3,
            total: 10,
            question: sample_question(),
        });

        assert!(text.contains("Question 3/10"));
        assert!(text.contains("Is 3 &lt; 5 &amp; 5 &gt; 4?"));
        assert!(text.contains("<b>C.</b> &lt;maybe&gt;"));
        assert!(text.contains("Easy"));
    }

    #[test]
    fn test_random_question_header() {
        let text = question(&Presented {
            test_type: TestType::Random,
            number: 1,
            total: 1,
            question: sample_question(),
        });
        assert!(text.contains("Random question"));
    }

    #[test]
    fn test_answer_result() {
        let q = sample_question();
        let stats = UserStats {
            current_streak: 3,
            ..Default::default()
        };

        let right = answer_result(&q, true, Some((4, 5, 10)), &stats);
        assert!(right.contains("Correct!"));
        assert!(right.contains("Score: 4/5"));
        assert!(right.contains("Streak: 3"));

        let wrong = answer_result(&q, false, Some((4, 6, 10)), &UserStats::default());
        assert!(wrong.contains("A. Yes"));
        assert!(!wrong.contains("Streak"));
    }

    #[test]
    fn test_report() {
        let text = report(&QuizReport::new(8, 10));
        assert!(text.contains("8/10"));
        assert!(text.contains("80%"));
        assert!(text.contains("130"));
        assert!(text.contains("Excellent"));
    }

    #[test]
    fn test_ended_uses_answered_count() {
        let mut session = QuizSession::start(TestType::Standard, Difficulty::Medium, Utc::now());
        session.score = 3;
        session.questions_answered = 4;

        let text = ended(&session);
        assert!(text.contains("4 of 25"));
        assert!(text.contains("75%"));
    }

    #[test]
    fn test_stats_without_history() {
        let text = stats("Ann", &UserStats::default(), Difficulty::Medium);
        assert!(text.contains("no statistics yet"));
    }

    #[test]
    fn test_leaderboard_ranks() {
        let entries: Vec<LeaderboardEntry> = (0..4)
            .map(|i| LeaderboardEntry {
                telegram_user_id: i.to_string(),
                name: format!("<p{}>", i),
                estimated_iq: 140 - i,
                percentage: 90,
                recorded_at: Utc::now(),
            })
            .collect();

        let text = leaderboard(&entries);
        assert!(text.contains("🥇 &lt;p0&gt;"));
        assert!(text.contains("4. &lt;p3&gt;"));
        assert!(leaderboard(&[]).contains("Nobody"));
    }
}
