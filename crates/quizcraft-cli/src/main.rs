//! The `quizcraft` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizcraft", version, about = "Multiple-choice quiz authoring and attempts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example quiz
    Init,

    /// Validate quiz TOML files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Publish a quiz file to the store
    Publish {
        /// Path to quiz file
        #[arg(long)]
        quiz: PathBuf,

        /// Author recorded on the quiz (defaults to config `default_author`)
        #[arg(long)]
        author: Option<String>,

        /// Hide the quiz from public listings
        #[arg(long)]
        private: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List published quizzes
    List {
        /// Only quizzes by this author (includes private ones)
        #[arg(long)]
        author: Option<String>,

        /// Case-insensitive search over title and description
        #[arg(long)]
        search: Option<String>,

        /// Include private quizzes
        #[arg(long)]
        all: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete a published quiz
    Delete {
        /// Quiz id
        #[arg(long)]
        id: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take a quiz and record the attempt
    Take {
        /// Quiz id
        #[arg(long)]
        id: String,

        /// User id recorded on the attempt
        #[arg(long)]
        user: String,

        /// Display name (defaults to the user id)
        #[arg(long)]
        name: Option<String>,

        /// Answers as zero-based option indices (e.g. "0,2,1"); interactive when omitted
        #[arg(long)]
        answers: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the best (or most recent) attempts
    Leaderboard {
        /// Rows to show (defaults to config `leaderboard_size`)
        #[arg(long)]
        limit: Option<usize>,

        /// Order by completion time instead of score
        #[arg(long)]
        recent: bool,

        /// Only attempts on this quiz
        #[arg(long)]
        quiz: Option<String>,

        /// Only attempts by this user id
        #[arg(long)]
        user: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizcraft=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Publish {
            quiz,
            author,
            private,
            config,
        } => commands::publish::execute(quiz, author, private, config).await,
        Commands::List {
            author,
            search,
            all,
            format,
            config,
        } => commands::list::execute(author, search, all, format, config).await,
        Commands::Delete { id, config } => commands::delete::execute(id, config).await,
        Commands::Take {
            id,
            user,
            name,
            answers,
            config,
        } => commands::take::execute(id, user, name, answers, config).await,
        Commands::Leaderboard {
            limit,
            recent,
            quiz,
            user,
            format,
            config,
        } => commands::leaderboard::execute(limit, recent, quiz, user, format, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
