use std::fmt;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use anatomize_core::content::summary;
use anatomize_core::model::{ActivityState, ProgressAction, Region};
use services::{AnswerOutcome, AppServices, ChatSession, RejectReason, RelayConfig, SendOutcome};

mod render;

use render::{Transcript, progress_row, question_block};

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Parser)]
#[command(name = "anatomize", version)]
#[command(about = "Study anatomy by region: summaries, quizzes and a tutor chat")]
struct Cli {
    /// SQLite database URL or file path.
    #[arg(
        long,
        global = true,
        env = "ANATOMIZE_DB_URL",
        default_value = "sqlite://anatomize.sqlite3"
    )]
    db: String,

    /// Base URL of the tutoring relay.
    #[arg(long, global = true, env = "ANATOMIZE_RELAY_URL")]
    relay_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show completion for every region (default).
    Progress,
    /// Read a region's summary and mark it as read.
    Summary { region: Region },
    /// Chat with the tutor. Without a message, reads lines from stdin.
    Chat {
        region: Region,
        message: Option<String>,
    },
    /// Answer questions until you type `q`.
    Quiz { region: Region },
    /// Reset a region's activities. With no flags, resets all of them.
    Reset {
        region: Region,
        #[arg(long)]
        summary: bool,
        #[arg(long)]
        quiz: bool,
        #[arg(long)]
        chat: bool,
    },
    /// Check that the relay is reachable.
    Health,
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.db.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw: cli.db }.into());
    }
    let db_url = normalize_sqlite_url(cli.db);
    prepare_sqlite_file(&db_url)?;

    let relay = RelayConfig::from_env()
        .with_base_url(cli.relay_url)
        .resolve();
    let services = AppServices::new_sqlite(&db_url, relay).await?;

    let result = match cli.command.unwrap_or(Command::Progress) {
        Command::Progress => show_progress(&services).await,
        Command::Summary { region } => read_summary(&services, region).await,
        Command::Chat { region, message } => chat(&services, region, message).await,
        Command::Quiz { region } => quiz(&services, region).await,
        Command::Reset {
            region,
            summary,
            quiz,
            chat,
        } => {
            let all = !(summary || quiz || chat);
            reset(&services, region, all || summary, all || quiz, all || chat).await
        }
        Command::Health => {
            services.relay().health().await?;
            println!("relay ok");
            Ok(())
        }
    };

    services.shutdown().await;
    result
}

async fn show_progress(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let state = services.progress().state().await;
    for (region, progress) in state.regions() {
        println!("{}", progress_row(region, progress));
    }
    Ok(())
}

async fn read_summary(
    services: &AppServices,
    region: Region,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}\n\n{}\n", region.label(), summary(region));
    let transition = services
        .progress()
        .dispatch(ProgressAction::MarkSummaryRead(region))
        .await;
    if transition.is_changed() {
        println!("Marked {} summary as read.", region.label());
    }
    Ok(())
}

async fn reset(
    services: &AppServices,
    region: Region,
    summary: bool,
    quiz: bool,
    chat: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let progress = services.progress();
    if summary {
        progress.dispatch(ProgressAction::ResetSummary(region)).await;
    }
    if quiz {
        progress.dispatch(ProgressAction::ResetQuiz(region)).await;
    }
    if chat {
        services.chat_history().clear(region).await?;
    }
    println!("{}", progress_row(region, &progress.progress(region).await));
    Ok(())
}

async fn chat(
    services: &AppServices,
    region: Region,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = services.chat_session(region);
    session.load_history().await;

    let mut transcript = Transcript::default();
    let mut stdout = io::stdout();
    transcript.render(&session.view(), &mut stdout)?;

    if let Some(message) = message {
        send_and_follow(&session, &message, &mut transcript).await?;
        session.close().await;
        session.settle().await;
        return Ok(());
    }

    println!("(type /away or /back to simulate leaving the app, /quit to stop)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/away" => services.activity().set(ActivityState::Background),
            "/back" => {
                let mut updates = session.subscribe();
                let parked = updates.borrow().retry_pending;
                services.activity().set(ActivityState::Active);
                if parked {
                    updates.wait_for(|view| !view.retry_pending).await?;
                }
                follow(&session, &mut transcript).await?;
                let draft = session.view().input;
                if !draft.is_empty() {
                    send_and_follow(&session, &draft, &mut transcript).await?;
                }
            }
            text => send_and_follow(&session, text, &mut transcript).await?,
        }
    }

    session.close().await;
    Ok(())
}

async fn send_and_follow(
    session: &ChatSession,
    text: &str,
    transcript: &mut Transcript,
) -> io::Result<()> {
    match session.send(text).await {
        SendOutcome::Accepted => follow(session, transcript).await,
        SendOutcome::Rejected(RejectReason::Busy) => {
            session.set_input(text).await;
            eprintln!("(kept as a draft until the current reply lands)");
            Ok(())
        }
        SendOutcome::Rejected(reason) => {
            eprintln!("not sent: {reason:?}");
            Ok(())
        }
    }
}

/// Print view updates until the exchange is over or parked for later.
async fn follow(session: &ChatSession, transcript: &mut Transcript) -> io::Result<()> {
    let mut stdout = io::stdout();
    let mut updates = session.subscribe();
    loop {
        let view = updates.borrow_and_update().clone();
        transcript.render(&view, &mut stdout)?;
        if view.retry_pending {
            println!("(reply pending until the app is back in the foreground)");
            return Ok(());
        }
        if !view.sending || updates.changed().await.is_err() {
            return Ok(());
        }
    }
}

async fn quiz(services: &AppServices, region: Region) -> Result<(), Box<dyn std::error::Error>> {
    let quiz = services.quiz_session(region).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let question = quiz.current();
        print!("\n{}> ", question_block(&question));
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            break;
        }
        let option = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| question.options().get(index).cloned())
            .unwrap_or_else(|| choice.to_string());

        match quiz.select_answer(&option).await {
            AnswerOutcome::Ignored => {
                println!("Pick one of the listed options.");
                continue;
            }
            AnswerOutcome::Answered {
                feedback,
                celebrate,
                ..
            } => {
                println!("{feedback}");
                if celebrate {
                    println!("*** {} quiz mastered! ***", region.label());
                }
            }
        }

        if !quiz.next_question() {
            quiz.prefetch_ready().await;
            quiz.next_question();
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();
    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
