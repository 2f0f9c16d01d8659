//! Sentiment CLI - terminal client for a sentiment classification API

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use sentiment_client::client::{HttpSentimentApi, MockApi, SentimentApi};
use sentiment_client::config::ClientConfig;
use sentiment_client::connectivity::ConnectivityMonitor;
use sentiment_client::console::{print_history, ConsolePresenter};
use sentiment_client::controller::{AnalysisController, SubmitPolicy};
use sentiment_client::error::{FixSuggestion, SentimentError};
use sentiment_client::history::{FileStorage, HistoryStore};
use sentiment_client::presenter::{ChannelPresenter, Presenter};
use sentiment_client::tui;

#[derive(Parser)]
#[command(name = "sentiment")]
#[command(about = "Sentiment - classify short texts against a sentiment API")]
#[command(version)]
struct Cli {
    /// Config file (default: <config_dir>/sentiment-client/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the sentiment service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// History record location
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,

    /// Submit even while the API looks unreachable
    #[arg(long, global = true)]
    no_gate: bool,

    /// Use the built-in mock service instead of HTTP
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Interactive dashboard (default)
    Tui,

    /// Analyze one text and print the result
    Analyze {
        /// Text to classify (at least 5 characters)
        text: String,
    },

    /// Probe the API once
    Health,

    /// Print the stored history, newest first
    History,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Tui);

    init_tracing(matches!(command, Commands::Tui));

    let result = match load_config(&cli) {
        Ok(config) => run(command, config, cli.mock).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(suggestion) = e
                .downcast_ref::<SentimentError>()
                .and_then(|e| e.fix_suggestion())
            {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            std::process::exit(1);
        }
    }
}

/// One-shot commands log to stderr; the TUI logs to a file
fn init_tracing(tui: bool) {
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter("warn"))
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    let dir = ClientConfig::data_dir();
    let file = std::fs::create_dir_all(&dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("sentiment.log"))
    });

    // Without a log file the TUI runs unlogged rather than drawing over itself
    if let Ok(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter("info"))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }
}

/// Flags > env > config file > defaults
fn load_config(cli: &Cli) -> Result<ClientConfig, SentimentError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    }
    .with_env();

    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(path) = &cli.history_file {
        config.history_file = Some(path.clone());
    }
    if cli.no_gate {
        config.gate_on_connectivity = false;
    }

    tracing::debug!(api_url = %config.api_url, gate = config.gate_on_connectivity, "Config loaded");
    Ok(config)
}

fn build_api(config: &ClientConfig, mock: bool) -> Result<Arc<dyn SentimentApi>, SentimentError> {
    let api: Arc<dyn SentimentApi> = if mock {
        Arc::new(MockApi::new().with_latency(Duration::from_millis(600)))
    } else {
        Arc::new(HttpSentimentApi::new(config)?)
    };
    tracing::info!(api = api.name(), url = %config.api_url, "Sentiment client starting");
    Ok(api)
}

fn load_history(config: &ClientConfig) -> HistoryStore {
    HistoryStore::load(Box::new(FileStorage::for_history_file(
        &config.history_path(),
    )))
}

/// Returns whether the command succeeded
async fn run(command: Commands, config: ClientConfig, mock: bool) -> anyhow::Result<bool> {
    match command {
        Commands::History => {
            print_history(&load_history(&config).snapshot());
            Ok(true)
        }
        Commands::Tui => run_tui(build_api(&config, mock)?, config).await,
        Commands::Analyze { text } => analyze(build_api(&config, mock)?, config, &text).await,
        Commands::Health => {
            let api = build_api(&config, mock)?;
            let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::new());
            let monitor = ConnectivityMonitor::new(api, presenter, config.probe_interval());
            Ok(monitor.probe().await.is_connected())
        }
    }
}

async fn analyze(api: Arc<dyn SentimentApi>, config: ClientConfig, text: &str) -> anyhow::Result<bool> {
    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::new());
    let monitor = ConnectivityMonitor::new(api.clone(), presenter.clone(), config.probe_interval());
    monitor.probe().await;

    let controller = AnalysisController::new(api, presenter, load_history(&config), monitor.subscribe())
        .with_policy(SubmitPolicy {
            gate_on_connectivity: config.gate_on_connectivity,
        });

    let outcome = controller.submit(text).await;
    if let Some(suggestion) = outcome.error().and_then(|e| e.fix_suggestion()) {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
    Ok(outcome.is_completed())
}

async fn run_tui(api: Arc<dyn SentimentApi>, config: ClientConfig) -> anyhow::Result<bool> {
    let (presenter, updates) = ChannelPresenter::new();
    let presenter: Arc<dyn Presenter> = Arc::new(presenter);

    let monitor = ConnectivityMonitor::new(api.clone(), presenter.clone(), config.probe_interval());
    let connectivity = monitor.subscribe();
    let probes = monitor.spawn();

    let controller = Arc::new(
        AnalysisController::new(api, presenter, load_history(&config), connectivity).with_policy(
            SubmitPolicy {
                gate_on_connectivity: config.gate_on_connectivity,
            },
        ),
    );

    let result = tui::run(controller, updates).await;
    probes.abort();
    result.map(|()| true)
}
