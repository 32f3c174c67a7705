use std::fs::OpenOptions;
use std::io;
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
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use fraudwatch::ui::{self, Theme};
use fraudwatch::{events, export, App, DashboardConfig, Overrides};
use fraudwatch_client::BackendClient;

#[derive(Parser, Debug)]
#[command(name = "fraudwatch")]
#[command(about = "Terminal console for a fraud-monitoring backend")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g., "http://localhost:5001")
    #[arg(short, long)]
    backend: Option<String>,

    /// User id used when assigning alerts
    #[arg(long)]
    analyst: Option<String>,

    /// Save exported files here instead of only showing their link
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Log file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Transactions poll interval (e.g., "2s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Open with the live stream paused
    #[arg(long)]
    paused: bool,

    /// Fetch everything once, write a JSON snapshot and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        backend_url: args.backend,
        analyst: args.analyst,
        download_dir: args.download_dir,
        log_file: args.log_file,
        transactions_interval: args.interval,
        paused: args.paused,
    };
    let config = DashboardConfig::load(args.config.as_deref(), &overrides)
        .context("invalid configuration")?;

    let runtime = tokio::runtime::Runtime::new()?;
    let client = BackendClient::builder()
        .endpoint(config.backend.url.clone())
        .timeout(config.backend.timeout)
        .build()?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        init_tracing(None)?;
        runtime.block_on(export::export_once(
            &client,
            config.stream.limit,
            &config.risk,
            &export_path,
        ))?;
        println!("Exported snapshot to: {}", export_path.display());
        return Ok(());
    }

    init_tracing(Some(&config.log_file))?;
    tracing::info!(backend = %client.endpoint(), autostart = config.stream.autostart, "starting console");

    let theme = Theme::auto_detect();
    let app = App::new(runtime.handle().clone(), client, &config, theme)?;
    run_tui(app)
}

/// Log to a file in TUI mode, to stderr otherwise. `RUST_LOG` overrides the
/// default `info` level.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
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

    let result = run_app(&mut terminal, &mut app);

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
    while app.running {
        app.pump();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    events::handle_mouse_event(app, mouse, ui::CONTENT_START_ROW);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}
