//! Secret Garden Entry Point
//!
//! Opens the journal in the terminal, or runs a headless subcommand.
//!
//! Usage:
//!   secret-garden [OPTIONS] [COMMAND]
//!
//! Options:
//!   -c, --config <FILE>     Configuration file (default: <config dir>/secret-garden/garden.toml)
//!   -d, --data-dir <DIR>    Directory holding the garden's data
//!       --no-drafts         Do not save or restore drafts
//!   -l, --log-level <LEVEL> Log level (default: info)
//!
//! The terminal surface logs to `<data dir>/secret-garden.log`; subcommands
//! log to stderr. `RUST_LOG` overrides the log level in both cases.

use std::fs;
use std::io::{self, IsTerminal};
use std::panic;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use garden_core::{default_config_path, load_config_from_path, GardenConfig};
use secret_garden_tui::cli::{run_command, Args};
use secret_garden_tui::App;

/// Log file inside the data directory
const LOG_FILE_NAME: &str = "secret-garden.log";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "secret_garden={level},secret_garden_tui={level},garden_core={level}"
        ))
    })
}

/// Log to stderr for headless subcommands
fn init_stderr_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Log to a file so nothing is drawn over the alternate screen
fn init_file_logging(config: &GardenConfig, level: &str) -> Result<()> {
    fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory: {}",
            config.data_dir.display()
        )
    })?;
    let path = config.data_dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter(level))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path)
        .context("Failed to load configuration")?;
    args.overrides().apply(&mut config);

    if let Some(command) = &args.command {
        init_stderr_logging(&args.log_level);
        tracing::debug!(source = %config.source(), "Configuration loaded");
        return run_command(command, &config, &mut io::stdout().lock());
    }

    // Check if we have a TTY before attempting initialization
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("❌ Error: secret-garden requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        eprintln!();
        eprintln!("The headless commands work without one:");
        eprintln!("  secret-garden export | import <PATH> | stats | list");
        std::process::exit(1);
    }

    init_file_logging(&config, &args.log_level)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.data_dir.display(),
        source = %config.source(),
        "Secret Garden starting"
    );

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let mut app = App::new(config);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if result.is_ok() {
        println!("\n\x1b[35mSecret Garden:\x1b[0m {}\n", app.goodbye());
    }
    tracing::info!("Secret Garden closed");

    // Propagate any errors
    result
}
