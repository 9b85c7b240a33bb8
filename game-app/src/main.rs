use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use game_app::{Config, GameApp, records, report};
use game_core::{GameStore, SystemClock};
use game_persistence::DatabaseManager;
use game_types::{
    GameType, IgnoreReason, LeaderboardTimeframe, MoveOutcome, QuizCategory, QuizDifficulty,
    SessionStatus,
};

#[derive(Parser)]
#[command(name = "quiztrek", about = "Quiz and puzzle scoreboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank players by total score
    Leaderboard {
        #[arg(long)]
        game_type: Option<GameType>,
        #[arg(long, default_value = "all-time")]
        timeframe: LeaderboardTimeframe,
    },
    /// Show statistics and level for a player
    Stats {
        /// Defaults to PLAYER_NAME
        #[arg(long)]
        player: Option<String>,
    },
    /// Delete every score entry and achievement
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Play a quiz in the terminal
    Quiz {
        #[arg(long)]
        category: Option<QuizCategory>,
        #[arg(long)]
        difficulty: Option<QuizDifficulty>,
        #[arg(long)]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let database = DatabaseManager::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let store = Arc::new(database.store());

    match cli.command {
        Command::Leaderboard {
            game_type,
            timeframe,
        } => {
            let leaderboard =
                records::leaderboard(store.as_ref(), game_type, timeframe, Utc::now()).await?;
            print!(
                "{}",
                report::render_leaderboard(&leaderboard, config.leaderboard_size)
            );
        }
        Command::Stats { player } => {
            let player = player.unwrap_or_else(|| config.player_name.clone());
            let stats = records::player_statistics(store.as_ref(), &player, Utc::now()).await?;
            print!("{}", report::render_statistics(&player, &stats));
        }
        Command::Reset { yes } => {
            if !yes {
                println!("Refusing to delete all data without --yes");
                return Ok(());
            }
            store.reset_all_data().await?;
            println!("All scores and achievements deleted.");
        }
        Command::Quiz {
            category,
            difficulty,
            count,
        } => {
            let app = GameApp::new(
                config.controller_settings(),
                config.question_bank()?,
                store,
                Arc::new(SystemClock::new()),
            );
            play_quiz(
                &app,
                category,
                difficulty,
                count.unwrap_or(config.quiz_question_count),
                config.quiz_time_limit_secs,
            )
            .await?;
        }
    }
    Ok(())
}

async fn play_quiz(
    app: &GameApp,
    category: Option<QuizCategory>,
    difficulty: Option<QuizDifficulty>,
    count: usize,
    time_limit_secs: Option<u32>,
) -> Result<()> {
    let quiz = &app.quiz;
    let started = quiz
        .start_quiz(category, difficulty, count, time_limit_secs)
        .await;
    if started.question_count == 0 {
        println!("No questions match that selection.");
        quiz.exit_quiz().await?;
        return Ok(());
    }
    info!("{} is playing {} questions", quiz.player_name(), started.question_count);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if let Some(summary) = quiz.enforce_time_limit().await? {
            println!("Time is up!");
            print!("{}", report::render_summary(&summary));
            return Ok(());
        }

        let snapshot = quiz.snapshot().await?;
        let Some(question) = snapshot.current_question else {
            break;
        };
        println!(
            "\nQuestion {}/{} ({}, {})",
            snapshot.question_index + 1,
            snapshot.question_count,
            question.category,
            question.difficulty
        );
        println!("{}", question.question);
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}) {}", index + 1, option);
        }

        let Some(line) = lines.next_line().await? else {
            quiz.exit_quiz().await?;
            println!("Quiz abandoned.");
            return Ok(());
        };
        let Some(choice) = line.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            println!("Enter a number between 1 and {}", question.options.len());
            continue;
        };

        let outcome = quiz.submit_answer(choice).await?;
        if outcome == MoveOutcome::ignored(IgnoreReason::SessionCompleted) {
            println!("Time is up!");
            print!("{}", report::render_summary(&quiz.finish_quiz().await?));
            return Ok(());
        }
        if !outcome.is_accepted() {
            println!("Enter a number between 1 and {}", question.options.len());
            continue;
        }
        if choice == question.correct_answer_index {
            println!("Correct! (+{})", outcome.points_awarded());
        } else {
            println!(
                "Wrong: {}. {}",
                question.options[question.correct_answer_index], question.explanation
            );
        }

        if let Some(summary) = quiz.next_question().await? {
            print!("\n{}", report::render_summary(&summary));
            return Ok(());
        }
    }

    let snapshot = quiz.snapshot().await?;
    if snapshot.status == SessionStatus::Active {
        let summary = quiz.finish_quiz().await?;
        print!("\n{}", report::render_summary(&summary));
    }
    Ok(())
}
