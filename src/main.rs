use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use opsboard::{events, fetch_snapshot, ui, App, Dashboard, Overrides, Settings};

#[derive(Parser, Debug)]
#[command(name = "opsboard")]
#[command(about = "Terminal status dashboard for a backend and its CI pipeline")]
#[command(version)]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin, e.g. http://127.0.0.1:5000
    #[arg(short, long)]
    backend_url: Option<String>,

    /// CI repository as owner/repo
    #[arg(long)]
    repo: Option<String>,

    /// CI provider API origin
    #[arg(long)]
    ci_api_base: Option<String>,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Write logs to this file while the dashboard is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, write the dashboard state to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            backend_url: self.backend_url.clone(),
            ci_api_base: self.ci_api_base.clone(),
            repository: self.repo.clone(),
            request_timeout_secs: self.timeout,
            log_file: self.log_file.clone(),
        }
    }
}

/// Where log output goes.
enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn init_logging(target: LogTarget<'_>) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        init_logging(LogTarget::Stderr)?;
        return export_to_file(&settings, export_path);
    }

    // The terminal belongs to the TUI, so logs only go to a file
    if let Some(ref path) = settings.log_file {
        init_logging(LogTarget::File(path))?;
    }

    run_tui(&settings)
}

/// Run the interactive dashboard.
fn run_tui(settings: &Settings) -> Result<()> {
    // Provider calls run on the runtime while the TUI owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let dashboard = Dashboard::new(
        settings.record_provider()?,
        settings.workflow_provider()?,
        rt.handle().clone(),
    );
    let mut app = App::new(dashboard, settings.reconcile_policy);

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
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    info!(
        backend = %settings.backend_url,
        repository = %settings.repository,
        "starting dashboard"
    );
    app.mount();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Requests still in flight are abandoned
    rt.shutdown_timeout(Duration::from_millis(100));

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.poll_updates();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Mount once, wait for both providers and write the state as JSON.
fn export_to_file(settings: &Settings, export_path: &Path) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let records = settings.record_provider()?;
    let workflows = settings.workflow_provider()?;

    let state = rt.block_on(fetch_snapshot(
        records,
        workflows,
        settings.reconcile_policy,
    ));

    let json = serde_json::to_string_pretty(&state)?;
    let mut file = std::fs::File::create(export_path)
        .with_context(|| format!("Failed to create {}", export_path.display()))?;
    file.write_all(json.as_bytes())?;

    info!(
        path = %export_path.display(),
        connectivity = state.connectivity.label(),
        records = state.records.len(),
        runs = state.workflows.len(),
        "exported dashboard state"
    );
    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
