// ABOUTME: Entry point for hookdesk: a terminal chat and file-upload client for webhook workflows.
// ABOUTME: Parses CLI args, loads config, sets up logging, and launches the app.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use hookdesk::app::App;
use hookdesk::config::{CHAT_URL_ENV, Config, Overrides, UPLOAD_URL_ENV};
use hookdesk::logging;

#[derive(Parser, Debug)]
#[command(name = "hookdesk", version, about = "Chat with a workflow webhook and upload files to it")]
struct Cli {
    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chat webhook URL
    #[arg(long, env = CHAT_URL_ENV)]
    chat_url: Option<String>,

    /// Upload webhook URL
    #[arg(long, env = UPLOAD_URL_ENV)]
    upload_url: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Files to upload on startup
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    config.apply(Overrides {
        chat_url: cli.chat_url,
        upload_url: cli.upload_url,
    });
    let endpoints = config.endpoints().context("invalid configuration")?;

    let log_path = cli.log_file.unwrap_or_else(Config::log_path);
    logging::init(&log_path, cli.verbose)?;

    App::new(config, endpoints)
        .with_initial_files(cli.files)
        .run()
        .await
}
