use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::{debug, warn};
use std::path::PathBuf;

mod cli;
mod libshinchoku;

use crate::libshinchoku::config::{session_token, Settings};
use crate::libshinchoku::error::Error;
use crate::libshinchoku::fetch::CatalogSource;
use crate::libshinchoku::manager::QuestionsManager;
use crate::libshinchoku::progress::DEFAULT_SKIP_REASON;
use crate::libshinchoku::question::Difficulty;

#[derive(Parser, Debug)]
#[command(name = "進捗 (Shinchoku)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "FILE", default_value = "solveProgress.json", global = true)]
    progress: PathBuf,
    #[arg(long, value_name = "FILE", default_value = "config.toml", global = true)]
    config: PathBuf,
    #[arg(long, value_name = "DIR", default_value = "questions", global = true)]
    questions_dir: PathBuf,
    /// Only questions asked by these companies (repeatable).
    #[arg(short, long = "company", value_name = "COMPANY", global = true)]
    companies: Vec<String>,
    /// Download a fresh catalog instead of using the cached one.
    #[arg(long, default_value = "false", global = true)]
    scrape: bool,
    #[arg(short, long, default_value = "error", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the next questions to attempt.
    Next {
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
    /// List questions matching the given attributes.
    List {
        #[arg(short, long, value_name = "DIFFICULTY")]
        difficulty: Vec<Difficulty>,
        #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
        solved: Option<bool>,
        #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
        skipped: Option<bool>,
        /// Include questions outside the topics of interest.
        #[arg(long, default_value = "false")]
        all_topics: bool,
    },
    /// Show how many questions are solved per difficulty.
    Stats,
    /// Show how many questions carry each topic.
    Topics,
    /// Mark questions as solved.
    Solve {
        #[arg(required = true)]
        ids: Vec<u32>,
    },
    /// Mark questions as skipped.
    Skip {
        #[arg(required = true)]
        ids: Vec<u32>,
        #[arg(short, long, default_value = DEFAULT_SKIP_REASON)]
        reason: String,
    },
    /// Go through the next questions one by one.
    Review {
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.clone())).init();

    let mut manager = QuestionsManager::new(&args.progress)?;
    let settings = Settings::load(&args.config)?;
    let source = CatalogSource::new(&args.questions_dir);

    let token = if args.scrape { session_token() } else { None };
    match source.get_questions(&args.companies, args.scrape, token.as_deref())? {
        Some(questions) => {
            manager.add_questions_from_value(questions)?;
        }
        None => println!(
            "{}",
            format!(
                "{:?} not found. Run again with --scrape to download the questions.",
                source.cache_file(&args.companies)
            )
            .yellow()
        ),
    }
    manager.set_topics_match_by_interested_topics(&settings.interested_topics);
    if manager.is_empty() {
        warn!("[Setup] The question catalog is empty.");
    } else {
        cli::print_interest_notice(&args.config, &settings.interested_topics);
    }
    debug!(
        "[Setup] {} questions loaded, {} in the queue.",
        manager.len(),
        manager.num_topics_match_questions()
    );

    match args.command {
        Commands::Next { count } => cli::print_next(&manager, count),
        Commands::List {
            difficulty,
            solved,
            skipped,
            all_topics,
        } => cli::print_list(
            &manager,
            &cli::list_filter(difficulty, solved, skipped, all_topics),
        ),
        Commands::Stats => cli::print_stats(&manager),
        Commands::Topics => cli::print_topics(&manager, &settings.interested_topics),
        Commands::Solve { ids } => cli::mark_solved(&mut manager, &ids)?,
        Commands::Skip { ids, reason } => cli::mark_skipped(&mut manager, &ids, &reason)?,
        Commands::Review { count } => cli::review_loop(&mut manager, count)?,
    }

    Ok(())
}
