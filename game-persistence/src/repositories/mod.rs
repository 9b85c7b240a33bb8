pub mod achievement_repository;
pub mod score_repository;

pub use achievement_repository::AchievementRepository;
pub use score_repository::ScoreRepository;
