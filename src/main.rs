mod catalog;
mod config;
mod error;
mod llm;
mod routes;
mod services;
mod state;
mod store;
mod tts;
mod view;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, DEFAULT_DATA_DIR, ServerConfig};
use crate::llm::LlmClient;
use crate::llm::types::LlmError;
use crate::services::community::CommunityRoom;
use crate::services::conversation::ConversationPractice;
use crate::store::models::{ChatKind, Goal, Message, Persona};
use crate::store::{FileStore, Repository, StoreError};
use crate::tts::TtsUrlBuilder;
use crate::view::{Screen, SyncIndicator, ViewController, ViewError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("AI is not configured: {0}")]
    Llm(#[from] LlmError),
    #[error("unsupported language '{0}' (see `vaani languages`)")]
    UnknownLanguage(String),
    #[error("no lesson '{lesson}' for language '{lang}'")]
    UnknownLesson { lang: String, lesson: String },
    #[error("finish onboarding first (`vaani start`, then `vaani onboard`)")]
    NotOnboarded,
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "vaani", about = "Language-learning tutor: API gateway and terminal client")]
struct Cli {
    /// Directory holding the learner's local records.
    #[arg(long, env = "VAANI_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP gateway.
    Serve {
        /// Overrides `PORT`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show screen, settings, stats and last sync.
    Status,
    /// Leave the landing screen and begin onboarding.
    Start,
    /// Finish onboarding with the learner's choices.
    Onboard {
        #[arg(long)]
        persona: Persona,
        #[arg(long)]
        goal: Goal,
        /// Language code (en, hi, es, fr, de).
        #[arg(long)]
        language: String,
    },
    /// Move to another screen.
    Navigate { screen: Screen },
    /// Toggle light/dark theme.
    Theme,
    /// List supported study languages.
    Languages,
    /// Switch the study language.
    Language { code: String },
    /// Print progress stats.
    Stats,
    /// Talk to the tutor. Without a message, reads one turn per stdin line.
    Chat { message: Option<String> },
    /// End the conversation: review it and record confidence.
    Review,
    /// Print a stored chat log for the active language.
    History {
        /// Show the community room instead of the tutor log.
        #[arg(long)]
        community: bool,
    },
    /// Read the community room, or post to it.
    Community { message: Option<String> },
    /// List lesson units for the active language.
    Lessons,
    /// Show a lesson; with `--answers`, grade its questions.
    Lesson {
        id: String,
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },
    /// Show the quiz; with `--answers`, grade it.
    Quiz {
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },
    /// Erase every local record.
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    config::load_dotenv();
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Serve { .. }));

    if let Command::Serve { port } = cli.command {
        return run_serve(port).await;
    }

    let repo = Repository::new(Arc::new(FileStore::open(&cli.data_dir)?));
    let mut view = ViewController::load(repo);

    match cli.command {
        Command::Serve { .. } => Ok(()),
        Command::Status => run_status(&view),
        Command::Start => {
            view.start_learning()?;
            saved(&view, "onboarding started")
        }
        Command::Onboard { persona, goal, language } => {
            let language = catalog::language(&language).ok_or(CliError::UnknownLanguage(language))?;
            if view.screen() != Screen::Onboarding {
                view.start_learning()?;
            }
            view.complete_onboarding(persona, goal, language)?;
            saved(&view, "onboarding complete")
        }
        Command::Navigate { screen } => {
            view.navigate(screen)?;
            saved(&view, "navigated")
        }
        Command::Theme => {
            view.toggle_theme()?;
            saved(&view, "theme toggled")
        }
        Command::Languages => print_json(&catalog::languages()),
        Command::Language { code } => {
            let language = catalog::language(&code).ok_or(CliError::UnknownLanguage(code))?;
            view.select_language(language)?;
            saved(&view, "language selected")
        }
        Command::Stats => print_json(view.stats()),
        Command::Chat { message } => run_chat(&view, message).await,
        Command::Review => run_review(&view).await,
        Command::History { community } => {
            let kind = if community { ChatKind::Community } else { ChatKind::Tutor };
            let messages = view.repository().history(kind, &view.language().code);
            print_transcript(&messages);
            Ok(())
        }
        Command::Community { message } => run_community(&view, message),
        Command::Lessons => print_json(&catalog::lesson_units(&view.language().code)),
        Command::Lesson { id, answers } => run_lesson(&view, &id, &answers),
        Command::Quiz { answers } => run_quiz(&view, &answers),
        Command::Reset => {
            view.reload()?;
            println!("all local records erased");
            Ok(())
        }
    }
}

fn init_tracing(serving: bool) {
    let fallback = if serving { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

// =============================================================================
// GATEWAY
// =============================================================================

async fn run_serve(port: Option<u16>) -> Result<(), CliError> {
    let config = ServerConfig::from_env()?;
    let port = port.unwrap_or(config.port);

    // AI features are optional: without a key only TTS keeps working.
    let llm: Option<Arc<dyn llm::LlmChat>> = match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI features disabled");
            None
        }
    };

    let tts = TtsUrlBuilder::new(config.tts_host).slow(config.tts_slow);
    let state = state::AppState::new(llm, tts);
    let app = routes::app(state, config.body_limit_bytes);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

    tracing::info!(%port, "vaani gateway listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

// =============================================================================
// CLIENT COMMANDS
// =============================================================================

/// Indicator lit by this process's own settings writes.
fn sync_indicator(view: &ViewController) -> SyncIndicator {
    let mut indicator = SyncIndicator::default();
    if let Some(at) = view.settings_written_at() {
        indicator.mark(at);
    }
    indicator
}

fn run_status(view: &ViewController) -> Result<(), CliError> {
    let repo = view.repository();
    let last_sync = repo
        .last_sync()
        .and_then(|at| at.format(&time::format_description::well_known::Rfc3339).ok())
        .unwrap_or_else(|| "Never".to_string());
    print_json(&json!({
        "screen": view.screen(),
        "settings": view.settings(),
        "stats": view.stats(),
        "lastSync": last_sync,
    }))
}

fn saved(view: &ViewController, what: &str) -> Result<(), CliError> {
    let syncing = sync_indicator(view).is_syncing(Instant::now());
    println!("{what}: now on {} ({})", view.screen(), if syncing { "syncing" } else { "saved" });
    Ok(())
}

fn require_onboarded(view: &ViewController) -> Result<(), CliError> {
    if view.settings().has_completed_onboarding { Ok(()) } else { Err(CliError::NotOnboarded) }
}

async fn run_chat(view: &ViewController, message: Option<String>) -> Result<(), CliError> {
    require_onboarded(view)?;
    let llm = LlmClient::from_env()?;
    let mut practice = ConversationPractice::open(view.repository().clone(), view.settings())?;
    let language = practice.language();
    println!("{} {} practice", language.flag, language.name);
    print_transcript(practice.messages());

    if let Some(message) = message {
        if let Some(reply) = practice.send(&llm, &message).await? {
            println!("tutor: {}", reply.content);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        if let Some(reply) = practice.send(&llm, &line).await? {
            println!("tutor: {}", reply.content);
        }
    }
    Ok(())
}

async fn run_review(view: &ViewController) -> Result<(), CliError> {
    require_onboarded(view)?;
    let llm = LlmClient::from_env()?;
    let practice = ConversationPractice::open(view.repository().clone(), view.settings())?;
    let (review, stats) = practice.end(&llm).await?;
    print_json(&json!({ "review": review, "stats": stats }))
}

fn run_community(view: &ViewController, message: Option<String>) -> Result<(), CliError> {
    require_onboarded(view)?;
    let mut room = CommunityRoom::open(view.repository().clone(), view.language().clone())?;
    match message {
        Some(text) => {
            if let Some(reply) = room.post(&text)? {
                println!("{}: {}", reply.author.as_deref().unwrap_or("peer"), reply.content);
            }
        }
        None => print_transcript(room.messages()),
    }
    Ok(())
}

fn run_lesson(view: &ViewController, id: &str, answers: &[usize]) -> Result<(), CliError> {
    let lang = &view.language().code;
    let lesson = catalog::lesson(lang, id)
        .ok_or_else(|| CliError::UnknownLesson { lang: lang.clone(), lesson: id.to_string() })?;
    if answers.is_empty() {
        return print_json(lesson);
    }
    print_json(&catalog::grade(lesson.questions, answers))
}

fn run_quiz(view: &ViewController, answers: &[usize]) -> Result<(), CliError> {
    let questions = catalog::quiz_questions(&view.language().code);
    if answers.is_empty() {
        return print_json(&questions);
    }
    let score = catalog::grade(questions, answers);
    print_json(&json!({ "correct": score.correct, "total": score.total, "percent": score.percent() }))
}

fn print_transcript(messages: &[Message]) {
    for msg in messages {
        let who = msg.author.as_deref().unwrap_or(match msg.role {
            store::models::MessageRole::User => "you",
            store::models::MessageRole::Model => "tutor",
            store::models::MessageRole::Peer => "peer",
        });
        println!("[{}] {who}: {}", msg.timestamp.time(), msg.content);
    }
}

fn print_json(value: &(impl Serialize + ?Sized)) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
