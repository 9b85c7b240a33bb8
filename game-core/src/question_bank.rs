use anyhow::{Context, Result};
use game_types::{QuestionId, QuizCategory, QuizDifficulty, QuizQuestion};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::Path;
use tracing::info;

/// Static pool of questions a quiz draws from. Every question in a bank has
/// passed `QuizQuestion::validate`.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<QuizQuestion>,
}

impl QuestionBank {
    /// The built-in seed questions, three per category.
    pub fn seeded() -> Self {
        Self {
            questions: seed_questions(),
        }
    }

    pub fn from_questions(questions: Vec<QuizQuestion>) -> Result<Self> {
        for question in &questions {
            question.validate()?;
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let questions: Vec<QuizQuestion> =
            serde_json::from_str(json).context("Failed to parse question bank JSON")?;
        Self::from_questions(questions)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read question bank {}", path.display()))?;
        let bank = Self::from_json(&json)?;
        info!("Loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Questions passing both optional filters, in bank order.
    pub fn filtered(
        &self,
        category: Option<QuizCategory>,
        difficulty: Option<QuizDifficulty>,
    ) -> Vec<QuizQuestion> {
        self.questions
            .iter()
            .filter(|q| category.is_none_or(|category| q.category == category))
            .filter(|q| difficulty.is_none_or(|difficulty| q.difficulty == difficulty))
            .cloned()
            .collect()
    }

    pub fn by_category(&self, category: QuizCategory) -> Vec<QuizQuestion> {
        self.filtered(Some(category), None)
    }

    pub fn by_difficulty(&self, difficulty: QuizDifficulty) -> Vec<QuizQuestion> {
        self.filtered(None, Some(difficulty))
    }

    pub fn random_question_with_rng<R: Rng + ?Sized>(
        &self,
        excluding: &[QuestionId],
        rng: &mut R,
    ) -> Option<QuizQuestion> {
        let candidates: Vec<&QuizQuestion> = self
            .questions
            .iter()
            .filter(|question| !excluding.contains(&question.id))
            .collect();
        candidates.choose(rng).map(|question| (*question).clone())
    }

    pub fn random_question(&self, excluding: &[QuestionId]) -> Option<QuizQuestion> {
        self.random_question_with_rng(excluding, &mut rand::thread_rng())
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::seeded()
    }
}

fn seed_questions() -> Vec<QuizQuestion> {
    use QuizCategory::*;
    use QuizDifficulty::{Easy, Hard, Medium};

    vec![
        QuizQuestion::new(
            "What is the chemical symbol for gold?",
            ["Go", "Gd", "Au", "Ag"],
            2,
            Science,
            Easy,
            "Au comes from the Latin word 'aurum' meaning gold.",
        ),
        QuizQuestion::new(
            "Which planet is known as the Red Planet?",
            ["Venus", "Mars", "Jupiter", "Saturn"],
            1,
            Science,
            Easy,
            "Mars appears red due to iron oxide (rust) on its surface.",
        ),
        QuizQuestion::new(
            "What is the speed of light in a vacuum?",
            ["299,792,458 m/s", "300,000,000 m/s", "299,000,000 m/s", "301,000,000 m/s"],
            0,
            Science,
            Hard,
            "The exact speed of light in a vacuum is 299,792,458 meters per second.",
        ),
        QuizQuestion::new(
            "In which year did World War II end?",
            ["1944", "1945", "1946", "1947"],
            1,
            History,
            Easy,
            "World War II ended in 1945 with the surrender of Japan in September.",
        ),
        QuizQuestion::new(
            "Who was the first person to walk on the moon?",
            ["Buzz Aldrin", "Neil Armstrong", "John Glenn", "Alan Shepard"],
            1,
            History,
            Easy,
            "Neil Armstrong was the first person to walk on the moon on July 20, 1969.",
        ),
        QuizQuestion::new(
            "Which ancient wonder of the world was located in Alexandria?",
            ["Hanging Gardens", "Lighthouse of Alexandria", "Colossus of Rhodes", "Temple of Artemis"],
            1,
            History,
            Medium,
            "The Lighthouse of Alexandria was one of the Seven Wonders of the Ancient World.",
        ),
        QuizQuestion::new(
            "What is the capital of Australia?",
            ["Sydney", "Melbourne", "Canberra", "Perth"],
            2,
            Geography,
            Medium,
            "Canberra is the capital city of Australia, not Sydney or Melbourne.",
        ),
        QuizQuestion::new(
            "Which is the longest river in the world?",
            ["Amazon", "Nile", "Mississippi", "Yangtze"],
            1,
            Geography,
            Easy,
            "The Nile River is the longest river in the world at approximately 6,650 km.",
        ),
        QuizQuestion::new(
            "Mount Everest is located on the border of which two countries?",
            ["India and China", "Nepal and China", "Nepal and India", "Bhutan and China"],
            1,
            Geography,
            Medium,
            "Mount Everest is located on the border between Nepal and China (Tibet).",
        ),
        QuizQuestion::new(
            "Who founded Apple Inc.?",
            ["Bill Gates", "Steve Jobs and Steve Wozniak", "Mark Zuckerberg", "Larry Page"],
            1,
            Technology,
            Easy,
            "Apple Inc. was founded by Steve Jobs, Steve Wozniak, and Ronald Wayne in 1976.",
        ),
        QuizQuestion::new(
            "What does 'HTTP' stand for?",
            [
                "HyperText Transfer Protocol",
                "High Tech Transfer Protocol",
                "HyperText Transport Protocol",
                "High Transfer Text Protocol",
            ],
            0,
            Technology,
            Medium,
            "HTTP stands for HyperText Transfer Protocol, used for web communication.",
        ),
        QuizQuestion::new(
            "Which programming language was developed by Apple for iOS development?",
            ["Objective-C", "Swift", "Java", "Python"],
            1,
            Technology,
            Medium,
            "Swift was developed by Apple specifically for iOS, macOS, and other Apple platform development.",
        ),
        QuizQuestion::new(
            "How many players are on a basketball team on the court at one time?",
            ["4", "5", "6", "7"],
            1,
            Sports,
            Easy,
            "Each basketball team has 5 players on the court at any given time.",
        ),
        QuizQuestion::new(
            "In which sport would you perform a slam dunk?",
            ["Volleyball", "Tennis", "Basketball", "Baseball"],
            2,
            Sports,
            Easy,
            "A slam dunk is a basketball move where a player jumps and scores by putting the ball directly through the hoop.",
        ),
        QuizQuestion::new(
            "Which country has won the most FIFA World Cups?",
            ["Germany", "Argentina", "Brazil", "Italy"],
            2,
            Sports,
            Medium,
            "Brazil has won the FIFA World Cup 5 times, more than any other country.",
        ),
        QuizQuestion::new(
            "Which movie won the Academy Award for Best Picture in 2020?",
            ["1917", "Joker", "Parasite", "Once Upon a Time in Hollywood"],
            2,
            Entertainment,
            Medium,
            "Parasite won the Academy Award for Best Picture in 2020, making history as the first non-English film to win.",
        ),
        QuizQuestion::new(
            "Who composed the music for the movie 'Star Wars'?",
            ["Hans Zimmer", "John Williams", "Danny Elfman", "Alan Silvestri"],
            1,
            Entertainment,
            Easy,
            "John Williams composed the iconic music for the Star Wars saga.",
        ),
        QuizQuestion::new(
            "Which streaming service produced 'Stranger Things'?",
            ["Amazon Prime", "Hulu", "Netflix", "Disney+"],
            2,
            Entertainment,
            Easy,
            "Stranger Things is a Netflix original series that premiered in 2016.",
        ),
        QuizQuestion::new(
            "Who wrote the novel '1984'?",
            ["Aldous Huxley", "George Orwell", "Ray Bradbury", "Kurt Vonnegut"],
            1,
            Literature,
            Medium,
            "George Orwell wrote the dystopian novel '1984', published in 1949.",
        ),
        QuizQuestion::new(
            "In which Shakespeare play does the character Hamlet appear?",
            ["Macbeth", "Romeo and Juliet", "Hamlet", "Othello"],
            2,
            Literature,
            Easy,
            "Hamlet is the protagonist of Shakespeare's tragedy 'Hamlet, Prince of Denmark'.",
        ),
        QuizQuestion::new(
            "Who wrote 'Pride and Prejudice'?",
            ["Charlotte Brontë", "Emily Brontë", "Jane Austen", "Virginia Woolf"],
            2,
            Literature,
            Easy,
            "Jane Austen wrote 'Pride and Prejudice', published in 1813.",
        ),
        QuizQuestion::new(
            "Who painted the Mona Lisa?",
            ["Michelangelo", "Leonardo da Vinci", "Raphael", "Donatello"],
            1,
            Art,
            Easy,
            "Leonardo da Vinci painted the Mona Lisa between 1503 and 1519.",
        ),
        QuizQuestion::new(
            "Which art movement was Pablo Picasso associated with?",
            ["Impressionism", "Cubism", "Surrealism", "Abstract Expressionism"],
            1,
            Art,
            Medium,
            "Pablo Picasso was one of the founders of the Cubism art movement.",
        ),
        QuizQuestion::new(
            "In which museum is the Mona Lisa displayed?",
            ["British Museum", "Metropolitan Museum", "Louvre Museum", "Uffizi Gallery"],
            2,
            Art,
            Medium,
            "The Mona Lisa is displayed in the Louvre Museum in Paris, France.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_bank_is_valid() {
        let bank = QuestionBank::seeded();
        assert_eq!(bank.len(), 24);
        assert!(bank.questions().iter().all(|q| q.validate().is_ok()));
        for category in QuizCategory::ALL {
            assert_eq!(bank.by_category(category).len(), 3, "{category}");
        }
    }

    #[test]
    fn test_filters_combine() {
        let bank = QuestionBank::seeded();
        assert_eq!(
            bank.filtered(Some(QuizCategory::Science), Some(QuizDifficulty::Easy)).len(),
            2
        );
        assert_eq!(
            bank.filtered(Some(QuizCategory::Science), Some(QuizDifficulty::Medium)).len(),
            0
        );
        assert_eq!(bank.by_difficulty(QuizDifficulty::Hard).len(), 1);
        assert_eq!(bank.filtered(None, None).len(), 24);
    }

    #[test]
    fn test_random_question_excludes() {
        let bank = QuestionBank::seeded();
        let all_but_one: Vec<QuestionId> = bank.questions()[1..].iter().map(|q| q.id).collect();
        let picked = bank.random_question(&all_but_one).unwrap();
        assert_eq!(picked.id, bank.questions()[0].id);

        let everything: Vec<QuestionId> = bank.questions().iter().map(|q| q.id).collect();
        assert!(bank.random_question(&everything).is_none());
    }

    #[test]
    fn test_json_bank_is_validated() {
        let json = r#"[
            {
                "question": "2 + 2?",
                "options": ["3", "4", "5", "6"],
                "correct_answer_index": 1,
                "category": "Science",
                "difficulty": "Easy",
                "explanation": "Basic arithmetic."
            }
        ]"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 1);

        let broken = json.replace("\"correct_answer_index\": 1", "\"correct_answer_index\": 7");
        assert!(QuestionBank::from_json(&broken).is_err());
        assert!(QuestionBank::from_json("not json").is_err());
    }

    #[test]
    fn test_load_reads_file_and_names_missing_path() {
        let path = std::env::temp_dir().join(format!("bank-{}.json", uuid::Uuid::new_v4()));
        let bank = QuestionBank::from_questions(QuestionBank::seeded().questions()[..2].to_vec())
            .unwrap();
        std::fs::write(&path, serde_json::to_string(bank.questions()).unwrap()).unwrap();

        let loaded = QuestionBank::load(&path).unwrap();
        assert_eq!(loaded.questions(), bank.questions());

        std::fs::remove_file(&path).unwrap();
        let err = QuestionBank::load(&path).unwrap_err();
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}
