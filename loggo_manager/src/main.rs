use colored::*;
use loggo_manager::config::{HostConfig, DEFAULT_LOG_FILTER};
use loggo_manager::context::SystemContext;
use loggo_manager::launcher;
use loggo_manager::plugins::{CancelSignal, CommandRegistry};
use loggo_manager::{LoggoError, LoggoResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let config = HostConfig::from_env();
    init_tracing(&config.log_filter);

    let code = match run(&config) {
        Ok(code) => code,
        // clap renders help, version and usage errors itself
        Err(LoggoError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}

fn run(config: &HostConfig) -> LoggoResult<i32> {
    let registry = CommandRegistry::builtin();
    let launcher = launcher::initialize(SystemContext::new(config), &registry)?;

    let cancel = CancelSignal::new();
    if let Err(e) = cancel.install_handler() {
        tracing::warn!("Failed to install interrupt handler: {}", e);
    }

    launcher.run(std::env::args_os(), &cancel, &mut io::stdout())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}
