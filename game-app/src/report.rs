//! Plain-text rendering for the scoreboard binary.

use game_core::ordinal;
use game_types::{Leaderboard, PlayerStatistics};
use std::fmt::Write;

use crate::summary::GameSummary;

pub fn render_leaderboard(leaderboard: &Leaderboard, size: usize) -> String {
    let mut out = String::new();
    let scope = leaderboard
        .game_type
        .map(|game_type| game_type.as_str())
        .unwrap_or("All Games");
    let _ = writeln!(out, "{} leaderboard ({})", leaderboard.timeframe, scope);

    if leaderboard.entries.is_empty() {
        out.push_str("No scores recorded yet.\n");
        return out;
    }

    for entry in leaderboard.entries.iter().take(size) {
        let _ = writeln!(
            out,
            "{:>5}  {:<20} {:>7} pts  {:>3} games  best {:>5}  lvl {} {}",
            ordinal(entry.rank),
            entry.player_name,
            entry.total_score,
            entry.games_played,
            entry.best_score,
            entry.level.level,
            entry.level.title
        );
    }
    out
}

pub fn render_statistics(player_name: &str, stats: &PlayerStatistics) -> String {
    let mut out = String::new();
    let level = &stats.level;
    let _ = writeln!(out, "{} - level {} {}", player_name, level.level, level.title);
    let _ = writeln!(
        out,
        "  experience {} ({:.0}% to next level, {} needed)",
        level.total_experience,
        level.progress() * 100.0,
        level.experience_remaining()
    );
    let _ = writeln!(
        out,
        "  games {}  total {}  average {:.1}  best {}",
        stats.total_games_played, stats.total_score, stats.average_score, stats.best_score
    );
    let _ = writeln!(
        out,
        "  streak {} days (longest {})  time played {:.0}s",
        stats.current_streak, stats.longest_streak, stats.total_time_spent_secs
    );

    if let Some(quiz) = &stats.quiz_stats {
        let _ = writeln!(
            out,
            "  quizzes {}  average {:.1}  best {}",
            quiz.total_quizzes, quiz.average_score, quiz.best_score
        );
        for (category, category_stats) in &quiz.category_stats {
            let _ = writeln!(
                out,
                "    {:<14} {} played  {:.0}% correct",
                category.as_str(),
                category_stats.quizzes_played,
                category_stats.accuracy() * 100.0
            );
        }
    }

    if let Some(puzzles) = &stats.puzzle_stats {
        let _ = writeln!(
            out,
            "  puzzles solved {}  average {:.1}  best {}",
            puzzles.total_puzzles_solved, puzzles.average_score, puzzles.best_score
        );
        for (puzzle_type, type_stats) in &puzzles.type_stats {
            let _ = writeln!(
                out,
                "    {:<16} {} solved  best time {:.0}s",
                puzzle_type.as_str(),
                type_stats.puzzles_solved,
                type_stats.best_time_secs
            );
        }
    }

    if !stats.achievements.is_empty() {
        out.push_str("  achievements:\n");
        for achievement in &stats.achievements {
            let _ = writeln!(out, "    {} ({})", achievement.title, achievement.rarity);
        }
    }
    out
}

pub fn render_summary(summary: &GameSummary) -> String {
    let mut out = String::new();
    let entry = &summary.entry;
    let _ = writeln!(
        out,
        "{} finished: {} points in {}",
        entry.game_type,
        entry.score,
        entry.formatted_time()
    );
    if summary.is_new_record() {
        let _ = writeln!(
            out,
            "New personal best! (+{}, {:.0}%)",
            summary.comparison.improvement, summary.comparison.percentage_improvement
        );
    }
    for achievement in &summary.unlocked {
        let _ = writeln!(
            out,
            "Achievement unlocked: {} - {}",
            achievement.title, achievement.description
        );
    }
    let _ = writeln!(out, "Level {} {}", summary.level.level, summary.level.title);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use game_core::StatisticsAggregator;
    use game_types::{GameType, LeaderboardTimeframe, ScoreEntry};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn entry(player: &str, score: i32) -> ScoreEntry {
        ScoreEntry {
            id: Uuid::new_v4(),
            player_name: player.to_string(),
            score,
            game_type: GameType::Quiz,
            difficulty: "Easy".to_string(),
            date: Utc::now(),
            time_spent_secs: 30.0,
            achievements: Vec::new(),
            details: None,
        }
    }

    #[test]
    fn test_leaderboard_rendering() {
        let entries = vec![entry("Ada", 300), entry("Grace", 500), entry("Linus", 100)];
        let leaderboard = StatisticsAggregator::leaderboard(
            &entries,
            &HashMap::new(),
            None,
            LeaderboardTimeframe::AllTime,
            Utc::now(),
        );

        let text = render_leaderboard(&leaderboard, 2);
        assert!(text.starts_with("All Time leaderboard (All Games)"));
        assert!(text.contains("1st"));
        assert!(text.contains("Grace"));
        assert!(text.contains("2nd"));
        assert!(!text.contains("Linus"));
    }

    #[test]
    fn test_empty_leaderboard() {
        let leaderboard = StatisticsAggregator::leaderboard(
            &[],
            &HashMap::new(),
            Some(GameType::Puzzle),
            LeaderboardTimeframe::Daily,
            Utc::now(),
        );
        let text = render_leaderboard(&leaderboard, 10);
        assert!(text.contains("Daily leaderboard (Puzzle)"));
        assert!(text.contains("No scores recorded yet."));
    }

    #[test]
    fn test_statistics_rendering() {
        let stats = StatisticsAggregator::aggregate(&[entry("Ada", 400)], &[]);
        let text = render_statistics("Ada", &stats);
        assert!(text.starts_with("Ada - level 2 Novice"));
        assert!(text.contains("games 1  total 400"));
    }
}
