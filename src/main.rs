use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use clap::Parser;
use tickerchat::{Config, Locale};
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "tickerchat")]
#[command(about = "Terminal chat widget for a ticker-scoped financial assistant")]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, env = "TICKERCHAT_BASE_URL")]
    base_url: Option<String>,
    /// Prefill the ticker field
    #[arg(short, long)]
    ticker: Option<String>,
    /// Interface language: fr or en
    #[arg(short, long)]
    locale: Option<String>,
    /// Open the chat window on start
    #[arg(long)]
    open: bool,
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("tickerchat");
    std::fs::create_dir_all(&log_dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("tickerchat.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("could not load config, using defaults: {:#}", e);
        Config::new()
    });

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(ticker) = &cli.ticker {
        config.default_ticker = Some(ticker.trim().to_uppercase());
    }
    if let Some(locale) = &cli.locale {
        config.locale = Locale::from_str(locale)
            .ok_or_else(|| anyhow!("Unknown locale '{}', expected fr or en", locale))?;
    }

    Ok(config)
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {:#}", e);
    }

    let config = load_config(&cli)?;
    tracing::info!(base_url = %config.base_url, locale = config.locale.as_str(), "starting tickerchat");

    let mut events = EventHandler::new();
    let mut app = App::new(&config, events.sender());

    // Closed on start whatever the view defaults to
    app.widget.init();
    if cli.open {
        app.toggle_chat();
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!("tickerchat exited with error: {:#}", e);
    }
    result
}
