mod cmd_config;
mod cmd_fetch;
mod cmd_layout;
mod settings_file;
mod tui;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use cmd_config::ConfigCmd;

#[derive(Parser)]
#[command(name = "contrib-graph", version, about = "GitHub contributions calendar in the terminal")]
struct Cli {
    /// GitHub token (defaults to $GITHUB_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    /// GitHub API base URL
    #[arg(long, global = true, default_value = contrib_github::DEFAULT_API_URL)]
    api_url: String,
    /// Settings file (defaults to <data dir>/contrib-graph/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive calendar view
    Show,
    /// Load once and print the summary
    Fetch {
        /// Year to load (defaults to the configured year)
        #[arg(long)]
        year: Option<i32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print cell geometry for a viewport
    Layout {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Number of week columns
        #[arg(long, default_value_t = 53)]
        weeks: usize,
        #[arg(long)]
        no_header: bool,
        #[arg(long)]
        no_footer: bool,
        /// Hide the month label row
        #[arg(long)]
        no_labels: bool,
        #[arg(long)]
        no_day_labels: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage widget settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

/// Install the tracing subscriber. `RUST_LOG` overrides `default_directive`.
fn init_logging(log_file: Option<&Path>, default_directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Anything on stderr would tear the interactive view.
    let default_directive = match (&cli.cmd, &cli.log_file) {
        (Command::Show, None) => "off",
        (_, Some(_)) => "info",
        _ => "warn",
    };
    init_logging(cli.log_file.as_deref(), default_directive)?;

    let config_path = cli.config.clone().unwrap_or_else(settings_file::default_path);
    let api = cmd_fetch::ApiOptions {
        token: cli.token.or_else(|| std::env::var("GITHUB_TOKEN").ok()),
        api_url: cli.api_url,
    };

    match cli.cmd {
        Command::Show => tui::run(&config_path, &api),
        Command::Fetch { year, json } => cmd_fetch::execute(&config_path, &api, year, json),
        Command::Layout {
            width,
            height,
            weeks,
            no_header,
            no_footer,
            no_labels,
            no_day_labels,
            json,
        } => {
            let flags = contrib_core::LayoutFlags {
                show_header: !no_header,
                show_footer: !no_footer,
                show_labels: !no_labels,
                show_day_labels: !no_day_labels,
            };
            cmd_layout::execute(width, height, weeks, flags, json)
        }
        Command::Config { cmd } => cmd_config::run(cmd, &config_path),
    }
}
