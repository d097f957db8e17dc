//! Threadbar - terminal thread header and agent selector

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use threadbar::agent::AgentSummary;
use threadbar::api::{
    AgentQuery, BrowserNavigator, HttpClient, Navigator, RecordingNavigator, Services,
};
use threadbar::app::ThreadContext;
use threadbar::config::Config;
use threadbar::{App, paths};

/// Terminal thread header and agent selector
#[derive(Parser)]
#[command(name = "threadbar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Thread to open
    #[arg(long, default_value = "new")]
    thread_id: String,

    /// Project the thread belongs to
    #[arg(long)]
    project_id: Option<String>,

    /// Current project name, shown until the backend answers
    #[arg(long, default_value = "Project")]
    project_name: String,

    /// Preselected agent id
    #[arg(long)]
    agent: Option<String>,

    /// Backend API base URL
    #[arg(long, env = "THREADBAR_API_URL")]
    api_url: Option<String>,

    /// Web frontend base URL
    #[arg(long, env = "THREADBAR_WEB_URL")]
    web_url: Option<String>,

    /// Always use the compact layout
    #[arg(long)]
    compact: bool,

    /// Show the debug badge
    #[arg(long)]
    debug: bool,

    /// Config file to load instead of the default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the agent list as JSON and exit
    Agents,
}

fn main() -> Result<()> {
    let log_path = paths::log_path();
    if let Err(e) = std::fs::write(&log_path, "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }

    // Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);

    if debug_level > 0 {
        let level = match debug_level {
            1 => tracing::Level::WARN,
            2 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        };

        let log_dir = log_path
            .parent()
            .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
        let file_appender = tracing_appender::rolling::never(log_dir, "threadbar.log");
        tracing_subscriber::fmt()
            .with_writer(file_appender)
            .with_max_level(level)
            .with_ansi(false)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Agents) => cmd_agents(&config),
        None => {
            let navigator: Box<dyn Navigator> = if config.open_browser {
                Box::new(BrowserNavigator::new(&config.web_url))
            } else {
                Box::new(RecordingNavigator::new())
            };
            let services = Services::from_http(HttpClient::from_config(&config), navigator);
            let thread = ThreadContext {
                thread_id: cli.thread_id,
                project_id: cli.project_id,
                project_name: cli.project_name,
                agent_id: cli.agent,
            };

            let mut app = App::new(config, thread, services);
            app.header = std::mem::take(&mut app.header)
                .with_compact(cli.compact)
                .with_debug(cli.debug || debug_level > 0);

            threadbar::tui::run(app)
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };
    if let Some(api_url) = &cli.api_url {
        config.api_url.clone_from(api_url);
    }
    if let Some(web_url) = &cli.web_url {
        config.web_url.clone_from(web_url);
    }
    Ok(config)
}

fn cmd_agents(config: &Config) -> Result<()> {
    let client = HttpClient::from_config(config);
    let response = client
        .fetch_agents(&config.agents)
        .context("Failed to load agents")?;
    let summaries: Vec<AgentSummary> = response.agents.iter().map(AgentSummary::from).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
