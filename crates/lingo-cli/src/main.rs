use anyhow::Result;
use clap::{Parser, Subcommand};
use lingo_core::translation::Lang;
use std::path::PathBuf;

mod commands;
mod context;
mod logging;

use context::AppContext;

#[derive(Parser)]
#[command(name = "lingo")]
#[command(about = "Lingo CLI - activation and translation backend tools", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the lingo config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the lingo data directory
    #[arg(long, global = true, env = "LINGO_HOME")]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange an activation code for a token
    Activate {
        code: String,
        /// Chat-account user id sent with the code
        #[arg(long, default_value_t = 0)]
        user_id: i64,
    },
    /// Show the stored authorization
    Status,
    /// Clear the stored authorization
    Logout,
    /// Translate text with the stored authorization
    Translate {
        text: String,
        /// Source language (en, zh, zh-CN); detected when omitted
        #[arg(long)]
        from: Option<Lang>,
        /// Target language; the other one when omitted
        #[arg(long)]
        to: Option<Lang>,
    },
    /// Show which direction a text would be translated in
    Classify { text: String },
    /// Ask the backend whether a user is already activated
    Check {
        #[arg(long)]
        user_id: i64,
    },
    /// Probe the backend health endpoint
    Health,
    /// List the languages the backend supports
    Languages,
    /// Print the effective configuration
    Config {
        /// Write a default config.toml if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logs_dir = lingo_infrastructure::LingoPaths::new(cli.data_dir.clone())
        .logs_dir()
        .ok();
    let _log_guard = logging::init_logging(cli.verbose, logs_dir.as_deref());

    let ctx = AppContext::load(cli.data_dir, cli.config)?;

    match cli.command {
        Commands::Activate { code, user_id } => commands::session::activate(&ctx, &code, user_id).await?,
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Translate { text, from, to } => {
            commands::translate::translate(&ctx, &text, from, to).await?
        }
        Commands::Classify { text } => commands::translate::classify_text(&ctx, &text)?,
        Commands::Check { user_id } => commands::session::check(&ctx, user_id).await?,
        Commands::Health => commands::backend::health(&ctx).await?,
        Commands::Languages => commands::backend::languages(&ctx).await?,
        Commands::Config { init } => commands::config::show(&ctx, init)?,
    }

    Ok(())
}
