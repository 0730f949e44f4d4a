// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use config::{Config, Environment, File};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

mod app;
mod data;
mod events;
mod source;
mod ui;

use app::App;
use data::ViewModel;
use source::{CycleSource, HttpFetcher, PollHandle, Poller};

/// Default endpoint of the release backend.
const DEFAULT_RELEASES_URL: &str = "http://localhost:8080/api/releases";
/// Default poll interval in seconds.
const DEFAULT_INTERVAL_SECS: u64 = 100;
/// Default per-request HTTP timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "releasewatch")]
#[command(about = "Terminal dashboard for tracking software release and Helm chart freshness")]
struct Args {
    /// Releases endpoint URL
    #[arg(long)]
    releases_url: Option<String>,

    /// Optional Helm releases endpoint URL (polled in addition to the
    /// releases endpoint; payloads are concatenated in this order)
    #[arg(long)]
    helm_url: Option<String>,

    /// Poll interval in seconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fetch once, write the dashboard state to a JSON file, and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

/// Settings file / environment shape. Every field is optional; CLI flags
/// win over file values, which win over the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileSettings {
    releases_url: Option<String>,
    helm_url: Option<String>,
    interval_secs: Option<u64>,
    timeout_secs: Option<u64>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
struct Settings {
    endpoints: Vec<String>,
    interval: Duration,
    timeout: Duration,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut builder = Config::builder();
    if let Some(ref path) = args.config {
        builder = builder.add_source(File::from(path.as_path()));
    }
    let file: FileSettings = builder
        .add_source(Environment::with_prefix("RELEASEWATCH").try_parsing(true))
        .build()?
        .try_deserialize()?;

    let releases_url = args
        .releases_url
        .clone()
        .or(file.releases_url)
        .unwrap_or_else(|| DEFAULT_RELEASES_URL.to_string());
    let helm_url = args.helm_url.clone().or(file.helm_url);

    let mut endpoints = vec![releases_url];
    endpoints.extend(helm_url);

    Ok(Settings {
        endpoints,
        interval: Duration::from_secs(
            args.interval.or(file.interval_secs).unwrap_or(DEFAULT_INTERVAL_SECS),
        ),
        timeout: Duration::from_secs(
            args.timeout.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_once(&settings, export_path);
    }

    run_with_http(&settings)
}

/// Run a single poll cycle and write the dashboard state to a JSON file.
fn export_once(settings: &Settings, export_path: &Path) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    let fetcher = Arc::new(HttpFetcher::new(settings.timeout)?);
    let poller = Poller::new(fetcher, settings.endpoints.clone());

    let payloads = rt.block_on(poller.run_cycle())?;

    let mut view = ViewModel::new();
    view.apply_success(payloads, Local::now());
    app::export_view_model(&view, export_path)?;

    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}

/// Start the poller against the configured endpoints and run the TUI.
fn run_with_http(settings: &Settings) -> Result<()> {
    // The poller runs on a background tokio runtime; the TUI loop stays
    // synchronous and drains outcomes through the cycle channel.
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let fetcher = Arc::new(HttpFetcher::new(settings.timeout)?);
    let poller = Poller::new(fetcher, settings.endpoints.clone());
    let (handle, source) = poller.start(settings.interval);

    run_tui(handle, source)
}

/// Run the TUI around a started poller.
fn run_tui(handle: PollHandle, source: CycleSource) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(handle, source);

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Stop polling before the terminal is torn down
    app.shutdown();

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

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 10;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered =
                    ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5)
                        .intersection(area);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(6),    // Cards
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with the aggregate severity tint
            ui::common::render_header(frame, app, chunks[0]);

            // Render the cards
            ui::cards::render(frame, app, chunks[1]);

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[2]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Cards start right after the one-row header
                    events::handle_mouse_event(app, mouse, 1);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Drain any settled poll cycles
        app.apply_pending();
    }

    Ok(())
}
