mod config;
mod terminal;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use desk_logging::{desk_info, desk_warn, LogDestination};
use log::LevelFilter;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "watchdesk")]
#[command(version, about = "Configure and review website-change watches")]
struct Args {
    /// Configuration file (RON)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Watch store root URL
    #[arg(long)]
    backend_url: Option<String>,

    /// Conversational assistant endpoint
    #[arg(long)]
    assistant_url: Option<String>,

    /// Where log lines go
    #[arg(long, value_enum)]
    log: Option<LogArg>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Route to open first, e.g. /watch/3/timeline
    #[arg(long)]
    route: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (mut config, config_error) = AppConfig::load_or_default(&args.config);
    apply_overrides(&mut config, &args);

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    desk_logging::initialize(config.log, level, config.log_file.as_deref());
    if let Some(err) = config_error {
        desk_warn!("Using default configuration: {err}");
    }
    desk_info!("Watch store at {}", config.backend_url);

    terminal::run(&config)
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(url) = &args.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(url) = &args.assistant_url {
        config.assistant_url = Some(url.clone());
    }
    if let Some(log) = args.log {
        config.log = log.into();
    }
    if let Some(route) = &args.route {
        config.start_route = Some(route.clone());
    }
}
