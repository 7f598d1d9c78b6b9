use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn};
use notedeck_core::{
    crypto::EncryptionKey,
    export::{self, ExportFormat, ImportFormat},
    storage::Store,
    validation,
};
use notedeck_tui::{config, App, Config, Event, EventHandler};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "notedeck", about = "Terminal notes kept as plain files")]
struct Args {
    /// Workspace owner; defaults to the login name
    #[arg(short, long)]
    user: Option<String>,

    /// Directory holding every user's workspace
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Config file to load
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write every note to a file or directory
    Export {
        /// json, markdown, tar, tar.gz or zip
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Add notes from a markdown directory or a JSON export
    Import {
        /// markdown or json
        #[arg(short, long, default_value = "markdown")]
        format: ImportFormat,
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = config::load_config(&config_path)?;
    if let Some(data) = &args.data {
        config.data.base_dir = data.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config, args.command.is_some())?;
    info!("NoteDeck starting with config {}", config_path.display());

    let username = args
        .user
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "default".to_string());
    validation::validate_username(&username)?;
    let store = open_store(&config, &username)?;

    match args.command {
        Some(Command::Export { format, output }) => {
            let count = export::export_all(&store, format, &output)?;
            info!("user={} action=export format={} count={}", username, format, count);
            println!("Exported {} notes to {}", count, output.display());
        }
        Some(Command::Import { format, input }) => {
            let report = export::import_all(&store, format, &input)?;
            info!(
                "user={} action=import imported={} skipped={}",
                username, report.imported, report.skipped
            );
            println!("Imported {} notes, skipped {}", report.imported, report.skipped);
        }
        None => run_session(store, &username, &config)?,
    }

    Ok(())
}

fn init_logging(config: &Config, batch: bool) -> Result<()> {
    let level = LevelFilter::from_str(&config.logging.level)
        .map_err(|_| anyhow!("Unknown log level '{}'", config.logging.level))?;
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Some(parent) = config.logging.file.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.logging.file)
        .with_context(|| format!("Failed to open log file {}", config.logging.file.display()))?;

    // The terminal belongs to the TUI; only batch commands log to stderr
    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![WriteLogger::new(level, log_config.clone(), log_file)];
    if batch {
        loggers.push(TermLogger::new(
            LevelFilter::Warn.min(level),
            log_config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    CombinedLogger::init(loggers).context("Logger already initialized")?;
    Ok(())
}

fn open_store(config: &Config, username: &str) -> Result<Store> {
    let root = config.workspace_dir(username);
    let store = Store::open(&root)
        .with_context(|| format!("Failed to open workspace {}", root.display()))?;

    if !config.data.enable_encryption {
        return Ok(store);
    }
    match std::env::var(&config.data.passphrase_env) {
        Ok(passphrase) if !passphrase.is_empty() => {
            info!("user={} action=unlock", username);
            Ok(store.with_key(EncryptionKey::from_passphrase(username, &passphrase)))
        }
        _ => {
            warn!(
                "Encryption is enabled but {} is not set; encrypted notes stay locked",
                config.data.passphrase_env
            );
            Ok(store)
        }
    }
}

fn run_session(store: Store, username: &str, config: &Config) -> Result<()> {
    let mut app = App::new(store, username)?;
    app.show_sidebar = config.ui.show_sidebar;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_handler = EventHandler::new(config.ui.tick_rate_ms);
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let result = run_app(&mut terminal, &mut app, &event_handler);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("user={} action=session error={:#}", username, err);
    }
    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|f| notedeck_tui::ui::render(f, app))?;

        match event_handler.next()? {
            Event::Key(key) => notedeck_tui::handle_key_event(key, app),
            Event::Resize(width, height) => app.resize(width, height),
            Event::Tick => app.tick(),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
