//! tickrs - a terminal dashboard that flags stocks near their 52-week extremes.

mod api;
mod app;
mod cli;
mod config;
mod export;
mod logging;
mod models;
mod signals;
mod tickers;
mod ui;

use anyhow::{Context, Result};
use api::{QuoteProvider, YahooFinanceClient};
use app::{App, MIN_REFRESH_INTERVAL, Settings};
use cli::{Args, ExportFormat};
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use logging::LogTarget;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tickers::TickerSet;
use tracing::{debug, info};

/// Ticker file used when nothing else is configured.
const DEFAULT_TICKERS_FILE: &str = "tickers.txt";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    logging::init(
        &LogTarget::resolve(args.log_file.as_deref(), !args.once),
        args.verbose,
    )?;

    let config = if let Some(ref path) = args.config {
        Config::load(path)?
    } else {
        Config::load_or_default()
    };

    let source = TickerSource::resolve(&args, &TickerEnv::from_env(), &config);
    let tickers = source.load()?;

    if tickers.is_empty() {
        eprintln!("Error: No tickers to watch in {}.", source);
        eprintln!("Provide tickers via --tickers, --tickers-from or the config file.");
        eprintln!();
        eprintln!("Example: tickrs --tickers AAPL,MSFT,GOOG");
        eprintln!();
        eprintln!("Or create a config file at {:?}", Config::default_config_path());
        eprintln!();
        eprintln!("Sample config:");
        eprintln!("{}", config::sample_config());
        std::process::exit(1);
    }
    info!(count = tickers.len(), %source, "loaded tickers");

    let delay = args.delay.unwrap_or(config.general.refresh_interval);
    let settings = Settings {
        refresh_interval: Duration::try_from_secs_f64(delay).unwrap_or(MIN_REFRESH_INTERVAL),
        show_header: config.display.show_header,
        show_details: config.display.show_details,
    };

    let client = YahooFinanceClient::new(args.timeout.unwrap_or(config.general.timeout))?;
    let mut app = App::new(tickers, client, &settings);

    if args.once {
        run_once(&mut app, args.export).await
    } else {
        run_interactive(&mut app).await
    }
}

/// Ticker sources that may also come from the environment.
#[derive(Debug, Clone, Default, PartialEq)]
struct TickerEnv {
    tickers: Option<String>,
    tickers_from: Option<PathBuf>,
}

impl TickerEnv {
    fn from_env() -> Self {
        Self {
            tickers: std::env::var(cli::TICKERS_ENV)
                .ok()
                .filter(|v| !v.is_empty()),
            tickers_from: std::env::var_os(cli::TICKERS_FROM_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

/// Where an explicit ticker list was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListOrigin {
    CommandLine,
    Environment,
    Config,
}

/// Where this run's tickers come from.
#[derive(Debug, Clone, PartialEq)]
enum TickerSource {
    List {
        symbols: Vec<String>,
        origin: ListOrigin,
    },
    File(PathBuf),
}

impl TickerSource {
    /// Command line first, then the environment, then the config file, then
    /// `tickers.txt`.
    fn resolve(args: &Args, env: &TickerEnv, config: &Config) -> Self {
        if let Some(ref symbols) = args.tickers {
            return TickerSource::List {
                symbols: symbols.clone(),
                origin: ListOrigin::CommandLine,
            };
        }
        if let Some(ref path) = args.tickers_from {
            return TickerSource::File(path.clone());
        }
        if let Some(ref list) = env.tickers {
            return TickerSource::List {
                symbols: list.split(',').map(String::from).collect(),
                origin: ListOrigin::Environment,
            };
        }
        if let Some(ref path) = env.tickers_from {
            return TickerSource::File(path.clone());
        }
        if !config.tickers.symbols.is_empty() {
            return TickerSource::List {
                symbols: config.tickers.symbols.clone(),
                origin: ListOrigin::Config,
            };
        }
        TickerSource::File(
            config
                .tickers
                .file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TICKERS_FILE)),
        )
    }

    fn load(&self) -> Result<TickerSet> {
        match self {
            TickerSource::List { symbols, .. } => TickerSet::from_list(symbols)
                .with_context(|| format!("Invalid ticker in {}", self)),
            TickerSource::File(path) => Ok(TickerSet::from_file(path)?),
        }
    }
}

impl std::fmt::Display for TickerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TickerSource::List { origin, .. } => match origin {
                ListOrigin::CommandLine => write!(f, "--tickers list"),
                ListOrigin::Environment => write!(f, "{}", cli::TICKERS_ENV),
                ListOrigin::Config => write!(f, "[tickers] symbols of the config file"),
            },
            TickerSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch once, print, exit.
async fn run_once<P: QuoteProvider>(app: &mut App<P>, format: ExportFormat) -> Result<()> {
    app.fetch().await?;
    print!("{}", export::export_rows(&app.rows, format)?);
    Ok(())
}

/// Run in interactive mode with TUI.
async fn run_interactive<P: QuoteProvider>(app: &mut App<P>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Main application loop.
async fn run_app<P: QuoteProvider>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<P>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key_event(app, key.code, key.modifiers);
                }
            }
        }

        if app.should_quit() {
            break;
        }

        if app.needs_refresh() {
            app.status = "Updating...".to_string();
            terminal.draw(|f| ui::render(f, app))?;
            app.refresh().await;
        }
    }

    Ok(())
}

/// Handle keyboard input.
fn handle_key_event<P: QuoteProvider>(app: &mut App<P>, code: KeyCode, modifiers: KeyModifiers) {
    debug!(?code, "key pressed");

    // Close help overlay on any key
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Clear error on any key
    if app.error.is_some() {
        app.error = None;
        return;
    }

    match code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Home | KeyCode::Char('g') => app.select_top(),
        KeyCode::End | KeyCode::Char('G') => app.select_bottom(),
        KeyCode::PageUp => {
            for _ in 0..10 {
                app.select_up();
            }
        }
        KeyCode::PageDown => {
            for _ in 0..10 {
                app.select_down();
            }
        }

        // Display toggles
        KeyCode::Char('d') => app.toggle_details(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.toggle_help(),

        // Update now
        KeyCode::Char('u') | KeyCode::Char(' ') | KeyCode::Char('R') => app.request_refresh(),

        _ => {}
    }
}
