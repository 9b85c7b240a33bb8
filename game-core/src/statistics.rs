use chrono::{DateTime, Duration, NaiveDate, Utc};
use game_types::{
    Achievement, CategoryStats, GameType, Leaderboard, LeaderboardEntry, LeaderboardTimeframe,
    PlayerStatistics, PuzzleDifficulty, PuzzleDifficultyStats, PuzzleStatistics, PuzzleType,
    PuzzleTypeStats, QuizCategory, QuizStatistics, ScoreComparison, ScoreDetails, ScoreEntry,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::leveling::{calculate_level, total_experience};

fn average(total: i32, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(count)
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

/// Sum of scores, clamped at the `i32` bounds.
fn score_total<'a>(entries: impl IntoIterator<Item = &'a ScoreEntry>) -> i32 {
    entries
        .into_iter()
        .fold(0i32, |total, entry| total.saturating_add(entry.score))
}

fn count(entries: &[&ScoreEntry]) -> u32 {
    u32::try_from(entries.len()).unwrap_or(u32::MAX)
}

/// English ordinal suffix for a rank: 1st, 2nd, 3rd, 4th, 11th, 21st.
pub fn ordinal_suffix(rank: u32) -> &'static str {
    if (11..=13).contains(&(rank % 100)) {
        return "th";
    }
    match rank % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

pub fn ordinal(rank: u32) -> String {
    format!("{}{}", rank, ordinal_suffix(rank))
}

/// Derives statistics from the score log. Nothing computed here is stored.
pub struct StatisticsAggregator;

impl StatisticsAggregator {
    pub fn aggregate(entries: &[ScoreEntry], achievements: &[Achievement]) -> PlayerStatistics {
        Self::aggregate_at(entries, achievements, Utc::now())
    }

    /// Player statistics with streaks measured relative to `now`.
    pub fn aggregate_at(
        entries: &[ScoreEntry],
        achievements: &[Achievement],
        now: DateTime<Utc>,
    ) -> PlayerStatistics {
        let all: Vec<&ScoreEntry> = entries.iter().collect();
        let games = count(&all);
        let total_score = score_total(entries);
        let (current_streak, longest_streak) = Self::streaks(entries, now.date_naive());

        PlayerStatistics {
            total_games_played: games,
            total_score,
            total_time_spent_secs: entries.iter().map(|entry| entry.time_spent_secs).sum(),
            average_score: average(total_score, games),
            best_score: entries.iter().map(|entry| entry.score).max().unwrap_or(0),
            current_streak,
            longest_streak,
            achievements: achievements.to_vec(),
            level: calculate_level(total_experience(total_score, achievements)),
            quiz_stats: Self::quiz_statistics(entries),
            puzzle_stats: Self::puzzle_statistics(entries),
        }
    }

    /// Quiz rollup, `None` when the log holds no quiz entries.
    pub fn quiz_statistics(entries: &[ScoreEntry]) -> Option<QuizStatistics> {
        let quizzes: Vec<&ScoreEntry> = entries
            .iter()
            .filter(|entry| entry.game_type == GameType::Quiz)
            .collect();
        if quizzes.is_empty() {
            return None;
        }

        let mut per_category: BTreeMap<QuizCategory, (CategoryStats, i32)> = BTreeMap::new();
        for entry in &quizzes {
            if let Some(ScoreDetails::Quiz {
                category: Some(category),
                questions_answered,
                correct_answers,
            }) = &entry.details
            {
                let (stats, score) = per_category.entry(*category).or_default();
                stats.quizzes_played += 1;
                stats.questions_answered =
                    stats.questions_answered.saturating_add(*questions_answered);
                stats.correct_answers =
                    stats.correct_answers.saturating_add(*correct_answers);
                *score = score.saturating_add(entry.score);
            }
        }

        let category_stats = per_category
            .into_iter()
            .map(|(category, (mut stats, score))| {
                stats.average_score = average(score, stats.quizzes_played);
                (category, stats)
            })
            .collect();

        let total_score = score_total(quizzes.iter().copied());
        Some(QuizStatistics {
            total_quizzes: count(&quizzes),
            total_score,
            average_score: average(total_score, count(&quizzes)),
            best_score: quizzes.iter().map(|entry| entry.score).max().unwrap_or(0),
            total_time_spent_secs: quizzes.iter().map(|entry| entry.time_spent_secs).sum(),
            category_stats,
        })
    }

    /// Puzzle rollup, `None` when the log holds no puzzle entries. Entries
    /// without details count as solved in the totals only.
    pub fn puzzle_statistics(entries: &[ScoreEntry]) -> Option<PuzzleStatistics> {
        let puzzles: Vec<&ScoreEntry> = entries
            .iter()
            .filter(|entry| entry.game_type == GameType::Puzzle)
            .collect();
        if puzzles.is_empty() {
            return None;
        }

        let mut per_type: BTreeMap<PuzzleType, (PuzzleTypeStats, u32)> = BTreeMap::new();
        let mut per_difficulty: BTreeMap<PuzzleDifficulty, PuzzleDifficultyStats> = BTreeMap::new();
        let mut solved_total = 0;

        for entry in &puzzles {
            let details = match &entry.details {
                Some(ScoreDetails::Puzzle {
                    puzzle_type,
                    completed,
                }) => Some((*puzzle_type, *completed)),
                _ => None,
            };
            let completed = details.is_none_or(|(_, completed)| completed);
            if completed {
                solved_total += 1;
            }

            let Some((puzzle_type, completed)) = details else {
                continue;
            };

            let (stats, played) = per_type.entry(puzzle_type).or_default();
            *played += 1;
            stats.total_score = stats.total_score.saturating_add(entry.score);
            if completed {
                stats.puzzles_solved += 1;
                if stats.best_time_secs == 0.0 || entry.time_spent_secs < stats.best_time_secs {
                    stats.best_time_secs = entry.time_spent_secs;
                }
            }

            if let Ok(difficulty) = entry.difficulty.parse::<PuzzleDifficulty>() {
                let stats = per_difficulty.entry(difficulty).or_default();
                stats.puzzles_played += 1;
                stats.total_score = stats.total_score.saturating_add(entry.score);
                if completed {
                    stats.puzzles_solved += 1;
                }
            }
        }

        let type_stats = per_type
            .into_iter()
            .map(|(puzzle_type, (mut stats, played))| {
                stats.average_score = average(stats.total_score, played);
                (puzzle_type, stats)
            })
            .collect();

        let difficulty_stats = per_difficulty
            .into_iter()
            .map(|(difficulty, mut stats)| {
                stats.average_score = average(stats.total_score, stats.puzzles_played);
                stats.completion_rate = ratio(stats.puzzles_solved, stats.puzzles_played);
                (difficulty, stats)
            })
            .collect();

        let total_score = score_total(puzzles.iter().copied());
        Some(PuzzleStatistics {
            total_puzzles_solved: solved_total,
            total_score,
            average_score: average(total_score, count(&puzzles)),
            best_score: puzzles.iter().map(|entry| entry.score).max().unwrap_or(0),
            total_time_spent_secs: puzzles.iter().map(|entry| entry.time_spent_secs).sum(),
            type_stats,
            difficulty_stats,
        })
    }

    /// Current and longest runs of consecutive UTC days with at least one game.
    /// The current run only counts if its last day is `today` or yesterday.
    pub fn streaks(entries: &[ScoreEntry], today: NaiveDate) -> (u32, u32) {
        let days: BTreeSet<NaiveDate> = entries.iter().map(|entry| entry.date.date_naive()).collect();

        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;
        for day in &days {
            run = match previous {
                Some(prev) if prev.succ_opt() == Some(*day) => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(*day);
        }

        let current = match previous {
            Some(last) if last == today || last.succ_opt() == Some(today) => run,
            _ => 0,
        };
        (current, longest)
    }

    /// Rank players by total score over the entries inside the timeframe.
    /// Players with equal totals keep the order they first appear in `entries`.
    pub fn leaderboard(
        entries: &[ScoreEntry],
        achievements_by_player: &HashMap<String, Vec<Achievement>>,
        game_type: Option<GameType>,
        timeframe: LeaderboardTimeframe,
        now: DateTime<Utc>,
    ) -> Leaderboard {
        let cutoff = timeframe.days().map(|days| now - Duration::days(days));

        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<&ScoreEntry>> = HashMap::new();
        for entry in entries {
            if game_type.is_some_and(|game_type| entry.game_type != game_type) {
                continue;
            }
            if cutoff.is_some_and(|cutoff| entry.date < cutoff) {
                continue;
            }
            let player = entry.player_name.as_str();
            grouped
                .entry(player)
                .or_insert_with(|| {
                    order.push(player);
                    Vec::new()
                })
                .push(entry);
        }

        let mut rows: Vec<LeaderboardEntry> = order
            .into_iter()
            .map(|player| {
                let games = grouped.get(player).map(Vec::as_slice).unwrap_or_default();
                let achievements = achievements_by_player
                    .get(player)
                    .cloned()
                    .unwrap_or_default();
                let total_score = score_total(games.iter().copied());

                LeaderboardEntry {
                    rank: 0,
                    player_name: player.to_string(),
                    total_score,
                    games_played: count(games),
                    average_score: average(total_score, count(games)),
                    best_score: games.iter().map(|entry| entry.score).max().unwrap_or(0),
                    total_time_spent_secs: games.iter().map(|entry| entry.time_spent_secs).sum(),
                    level: calculate_level(total_experience(total_score, &achievements)),
                    achievements,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        for (position, row) in rows.iter_mut().enumerate() {
            row.rank = u32::try_from(position + 1).unwrap_or(u32::MAX);
        }

        Leaderboard {
            entries: rows,
            game_type,
            timeframe,
            last_updated: now,
        }
    }

    /// Compare a new score with the best among `previous` entries.
    pub fn score_comparison(previous: &[ScoreEntry], current_score: i32) -> ScoreComparison {
        let previous_best = previous.iter().map(|entry| entry.score).max().unwrap_or(0);
        ScoreComparison::new(current_score, previous_best)
    }
}
