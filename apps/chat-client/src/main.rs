//! # Garage Chat
//!
//! Terminal client for the repair chatbot. Enforces the daily usage limit
//! locally before anything is sent to the server.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use garage_core::chat::DAILY_LIMIT;

mod governor;
mod session;
mod usage_store;

use governor::{Outcome, governed_ask};
use session::ChatSession;
use usage_store::UsageStore;

#[derive(Parser)]
#[command(name = "garage-chat")]
#[command(about = "自動車整備AIアシスタント - Garage forum chatbot client", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the forum API
    #[arg(long, env = "CHAT_API_URL", default_value = "http://127.0.0.1:8080")]
    api_url: String,

    /// File holding today's usage count
    #[arg(long, env = "CHATBOT_USAGE_FILE", default_value = ".garage-chat-usage.json")]
    usage_file: PathBuf,

    /// Access token from /api/auth/login; links chat logs to your account
    #[arg(long, env = "CHAT_API_TOKEN")]
    token: Option<String>,

    /// Subcommand (interactive session when omitted)
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single question and exit
    Ask {
        /// The question
        message: String,
    },
    /// Show how many questions remain today
    Usage,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = UsageStore::new(&cli.usage_file);

    match cli.command {
        Some(Command::Usage) => {
            let today = Local::now().date_naive();
            let usage = store.load();
            println!(
                "本日の利用回数: {}/{}（残り{}回）",
                usage.used_on(today),
                DAILY_LIMIT,
                usage.remaining(today)
            );
            Ok(())
        }
        Some(Command::Ask { message }) => {
            let mut session = ChatSession::new(&cli.api_url, cli.token)?;
            turn(&mut session, &store, &message).await
        }
        None => repl(ChatSession::new(&cli.api_url, cli.token)?, &store).await,
    }
}

/// One governed round trip, printed for the terminal.
async fn turn(session: &mut ChatSession, store: &UsageStore, message: &str) -> Result<()> {
    let today = Local::now().date_naive();

    match governed_ask(session, store, today, message).await? {
        Outcome::Limited => {
            println!("本日の利用上限（{DAILY_LIMIT}回）に達しました。明日またご利用ください。");
        }
        Outcome::Answered { reply, remaining } => {
            println!("\nAI: {}\n", reply.response);
            if reply.source == "fallback" {
                println!("（オフライン回答）");
            }
            println!("残り{remaining}回");
        }
    }
    Ok(())
}

async fn repl(mut session: ChatSession, store: &UsageStore) -> Result<()> {
    println!("自動車整備AIアシスタントです。質問を入力してください（終了: exit）");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let message = line.trim();

        match message {
            "" => continue,
            "exit" | "quit" => break,
            _ => {
                if let Err(e) = turn(&mut session, store, message).await {
                    println!("エラー: {e}");
                }
            }
        }
    }

    Ok(())
}
