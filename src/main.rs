use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::path::PathBuf;
use std::{io, time::Duration};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod app;
mod app_event;
mod config;
mod models;
mod ssh_config;
mod state;
mod ui;

use app::App;
use config::ConfigManager;

#[derive(Parser, Debug)]
#[command(version, about = "A TUI for browsing SSH hosts and jumping into them")]
struct Args {
    /// Override the configuration directory
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Log level for the application log file
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = match args.config_dir {
        Some(dir) => ConfigManager::with_config_dir(dir)?,
        None => ConfigManager::new()?,
    };

    // Setup logging into <config-dir>/logs
    let log_dir = config_manager.get_config_dir().join("logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)?;
    }

    let log_file = log_dir.join(format!("sshgo_{}.log", Local::now().format("%Y%m%d_%H%M%S")));
    let file = File::create(&log_file)
        .with_context(|| format!("Can't create log file {}", log_file.display()))?;

    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("sshgo={}", args.log_level).parse()?),
        )
        .with_ansi(false)
        .with_writer(file)
        .init();

    debug!("Starting application");
    debug!("Version {}", env!("CARGO_PKG_VERSION"));

    // One-time state initialization; every later state::get in the process
    // observes this same instance.
    let app_state = state::get(config_manager.get_config_dir(), &state::TracingLogger);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config_manager, app_state);
    let res = match app {
        Ok(mut app) => run_app(&mut terminal, &mut app).await,
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    // Losing the final state silently would surprise the user, so a
    // persist failure at shutdown is fatal.
    let persisted = match app_state.lock() {
        Ok(state) => state.persist(),
        Err(_) => Err(anyhow::anyhow!("application state lock poisoned")),
    };
    if let Err(err) = persisted {
        eprintln!("Can't save application state before closing: {:#}", err);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // While an SSH session owns the terminal, only watch for its end.
        if app.ssh_ready_for_terminal {
            app.process_ssh_events(terminal)?;
            tokio::time::sleep(Duration::from_millis(100)).await;
            continue;
        }

        terminal.draw(|f| ui::draw(f, app))?;

        app.process_ssh_events(terminal)?;
        app.process_config_events();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, terminal)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
