//! Dashboard Tour - Main entry point
//!
//! Opens the terminal dashboard and runs the guided tour over it, or manages
//! the tour's saved state from the command line.

use anyhow::{Context, Result};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use dashtour::app::App;
use dashtour::cli::{Cli, Commands, RunArgs};
use dashtour::styles::{TOUR_STYLESHEET, theme_tokens};
use dashtour::{JsonFileStore, TourConfig, TourScript};

const LOG_FILE: &str = "dashtour.log";

/// Initialize logging. Stdout belongs to the terminal UI, so records go to a
/// file in the temp directory.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let path = std::env::temp_dir().join(LOG_FILE);

    match File::create(&path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(e) => eprintln!("Warning: logging disabled, cannot create {:?}: {}", path, e),
    }
}

/// Main application entry point
fn main() -> Result<()> {
    init_logging();
    info!("Dashboard Tour starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match cli.command {
        Some(Commands::Run(args)) => run_tui(&args)?,
        Some(Commands::Reset { state, config }) => reset_state(&state, config.as_deref())?,
        Some(Commands::Status { state, config }) => show_status(&state, config.as_deref())?,
        Some(Commands::Validate { script }) => validate_script(&script),
        Some(Commands::Styles) => print_styles(),
        None => {
            info!("No command specified, launching dashboard");
            run_tui(&RunArgs::default())?;
        }
    }

    Ok(())
}

fn load_script(path: Option<&Path>) -> Result<TourScript> {
    let script = match path {
        Some(path) => TourScript::load_from_file(path)?,
        None => TourScript::default(),
    };
    script.validate()?;
    Ok(script)
}

fn load_config(path: Option<&Path>) -> Result<TourConfig> {
    let config = match path {
        Some(path) => TourConfig::load_from_file(path)?,
        None => TourConfig::terminal(),
    };
    config.validate()?;
    Ok(config)
}

/// Run the dashboard with the tour
fn run_tui(args: &RunArgs) -> Result<()> {
    let script = load_script(args.script.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let store = JsonFileStore::open(&args.state)
        .with_context(|| format!("Failed to open state file {:?}", args.state))?;

    debug!("Initializing terminal for TUI mode");
    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), crossterm::terminal::EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let result = Terminal::new(backend)
        .context("Failed to create terminal")
        .and_then(|mut terminal| {
            let size = terminal.size().context("Failed to read terminal size")?;
            let mut app = App::new(
                script,
                config,
                &args.path,
                Box::new(store),
                (size.width, size.height),
            );
            app.run(&mut terminal)
        });

    // Cleanup terminal (always attempt cleanup, even if app failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), crossterm::terminal::LeaveAlternateScreen);

    if let Err(e) = &result {
        error!(error = %e, "Dashboard exited with an error");
    }
    result
}

fn reset_state(state: &Path, config: Option<&Path>) -> Result<()> {
    let flag = load_config(config)?.completion_flag();
    let mut store = JsonFileStore::open(state)
        .with_context(|| format!("Failed to open state file {:?}", state))?;
    flag.clear(&mut store)?;
    info!(?state, key = flag.key(), "Completion flag cleared");
    println!("✓ Tour reset; it will be offered again on the dashboard");
    Ok(())
}

fn show_status(state: &Path, config: Option<&Path>) -> Result<()> {
    let flag = load_config(config)?.completion_flag();
    let store = JsonFileStore::open(state)
        .with_context(|| format!("Failed to open state file {:?}", state))?;
    if flag.is_set(&store) {
        println!("Tour completed ({} is set in {:?})", flag.key(), state);
    } else {
        println!("Tour not completed yet");
    }
    Ok(())
}

fn validate_script(path: &Path) {
    info!("Validating tour script: {:?}", path);
    match load_script(Some(path)) {
        Ok(script) => {
            info!("Tour script validation successful");
            println!("✓ Tour script is valid: {} steps", script.len());
        }
        Err(e) => {
            error!("Tour script validation failed: {:#}", e);
            eprintln!("✗ Tour script validation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn print_styles() {
    println!("{}", TOUR_STYLESHEET.trim());
    println!();
    for token in theme_tokens(TOUR_STYLESHEET) {
        match token.fallback {
            Some(fallback) => println!("{}: {}", token.name, fallback),
            None => println!("{}: (no fallback)", token.name),
        }
    }
}
