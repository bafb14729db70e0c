// ghloc command line.
// Shows the LOC panel for a repository URL or browses the LOC tree in a terminal UI.

mod app;
mod state;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ghloc::cache::paths;
use ghloc::config::Config;
use ghloc::page::{self, EventBus, PageEvent, PageIntegration};
use ghloc::{AppContext, GhlocError, RepositoryLocator, Result};

use app::App;

#[derive(Parser)]
#[command(name = "ghloc", about = "Lines of code for repository pages", version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// LOC service base URL
    #[arg(long, global = true, env = "GHLOC_SERVICE_URL")]
    service_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the LOC panel for a repository page
    Show {
        /// Repository page URL, e.g. https://github.com/owner/repo/tree/main/src
        url: String,

        /// Branch shown by the branch selector
        #[arg(long)]
        branch: Option<String>,

        /// Path shown by the path breadcrumb, e.g. "src/lib.rs"
        #[arg(long)]
        path: Option<String>,

        /// Print the breakdown for the path as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the LOC tree of a repository interactively
    Browse {
        /// Repository page URL
        url: String,

        /// Branch to start on
        #[arg(long)]
        branch: Option<String>,
    },
}

/// Initialize tracing, writing to `log_file` when given and to stderr otherwise.
fn init_tracing(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

fn locate(url: &str, branch: Option<&str>) -> Result<RepositoryLocator> {
    page::locate(&page::repository_page(url, branch, None))
        .ok_or_else(|| GhlocError::NotARepository(url.to_string()))
}

async fn show(
    config: Config,
    url: &str,
    branch: Option<&str>,
    path: Option<&str>,
    json: bool,
) -> Result<()> {
    let ctx = AppContext::init(config)?;
    let mut doc = page::repository_page(url, branch, path);
    let locator =
        page::locate(&doc).ok_or_else(|| GhlocError::NotARepository(url.to_string()))?;
    debug!(key = %locator.cache_key(), path = ?locator.path_segments, "Resolved page");

    if json {
        let root = ctx.locs(&locator.cache_key()).await?;
        let node = root.descend(&locator.path_segments)?;
        println!("{}", serde_json::to_string_pretty(node)?);
        return Ok(());
    }

    let integration = PageIntegration::new(ctx);
    let mut bus = EventBus::new();
    integration.register(&mut bus);

    for event in [PageEvent::DomChanged, PageEvent::TriggerActivated] {
        if let Some(e) = bus.emit(event, &mut doc).await.into_iter().next() {
            return Err(e);
        }
    }

    let text = page::panel_text(&doc)
        .ok_or_else(|| GhlocError::Other("no LOC panel was rendered".to_string()))?;
    print!("{}", text);
    Ok(())
}

fn browse(config: Config, url: &str, branch: Option<&str>) -> Result<()> {
    let locator = locate(url, branch)?;
    let ctx = AppContext::init(config)?;
    info!(key = %locator.cache_key(), "Starting browser");

    let mut terminal = ratatui::init();
    let result = App::new(ctx, locator).run(&mut terminal);
    ratatui::restore();
    result?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.service_url {
        config.service_url = url;
    }

    match cli.command {
        Command::Show {
            url,
            branch,
            path,
            json,
        } => {
            init_tracing(&cli.log_level, None)?;
            show(config, &url, branch.as_deref(), path.as_deref(), json).await
        }
        Command::Browse { url, branch } => {
            // The terminal is owned by the UI, so logs go to a file
            init_tracing(&cli.log_level, Some(&paths::log_path(&config.cache_dir()?)))?;
            browse(config, &url, branch.as_deref())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ghloc: {}", e);
            ExitCode::FAILURE
        }
    }
}
