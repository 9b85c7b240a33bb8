use game_types::{Achievement, PlayerLevel};

/// Experience needed per squared level (`level² × 100`).
pub const EXPERIENCE_PER_LEVEL_UNIT: i32 = 100;

/// Total experience: cumulative score plus achievement rarity points.
pub fn total_experience(total_score: i32, achievements: &[Achievement]) -> i32 {
    let achievement_points = achievements
        .iter()
        .fold(0i32, |total, achievement| total.saturating_add(achievement.rarity.points()));
    total_score.saturating_add(achievement_points)
}

/// Experience threshold at which `level` begins.
pub fn level_threshold(level: u32) -> i32 {
    let level = i64::from(level);
    i32::try_from(level * level * i64::from(EXPERIENCE_PER_LEVEL_UNIT)).unwrap_or(i32::MAX)
}

/// `level = ⌊√(experience / 100)⌋`, never below 1.
pub fn calculate_level(total_experience: i32) -> PlayerLevel {
    // ⌊√(x/100)⌋ == ⌊√x⌋ / 10 for non-negative x
    let experience = u32::try_from(total_experience).unwrap_or(0);
    let level = (experience.isqrt() / 10).max(1);

    let current_threshold = level_threshold(level);
    let next_threshold = level_threshold(level + 1);

    PlayerLevel {
        level,
        title: title_for_level(level).to_string(),
        // Players below the level-1 threshold show no progress rather than negative progress
        experience_points: total_experience.saturating_sub(current_threshold).max(0),
        experience_to_next: next_threshold - current_threshold,
        total_experience,
    }
}

pub fn title_for_level(level: u32) -> &'static str {
    match level {
        0..=5 => "Novice",
        6..=10 => "Apprentice",
        11..=20 => "Scholar",
        21..=35 => "Expert",
        36..=50 => "Master",
        51..=75 => "Grandmaster",
        76..=100 => "Legend",
        _ => "Mythic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_experience() {
        let level = calculate_level(900);
        assert_eq!(level.level, 3);
        assert_eq!(level.title, "Novice");
        assert_eq!(level.experience_points, 0);
        assert_eq!(level.experience_to_next, 700);
    }

    #[test]
    fn test_level_is_clamped_to_one() {
        for experience in [0, 50, 99, 399, -20] {
            assert_eq!(calculate_level(experience).level, 1, "experience {experience}");
        }
        assert_eq!(calculate_level(400).level, 2);
        assert_eq!(calculate_level(0).experience_points, 0);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(calculate_level(3_599).level, 5);
        assert_eq!(calculate_level(3_600).level, 6);
        assert_eq!(calculate_level(3_600).title, "Apprentice");
        assert_eq!(calculate_level(1_000_000).level, 100);
        assert_eq!(calculate_level(1_000_000).title, "Legend");
        assert_eq!(calculate_level(1_020_100).title, "Mythic");
    }

    #[test]
    fn test_titles() {
        assert_eq!(title_for_level(11), "Scholar");
        assert_eq!(title_for_level(35), "Expert");
        assert_eq!(title_for_level(36), "Master");
        assert_eq!(title_for_level(51), "Grandmaster");
    }
}
