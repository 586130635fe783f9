use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use logbot::app::App;
use logbot::transcript::Role;
use logbot::tui::{self, EventHandler, Tui};
use logbot::{handler, logging, ui};
use logbot::{Config, Controller, HttpBackend, LogBackend};

#[derive(Parser)]
#[command(name = "logbot")]
#[command(about = "Chat with a log-analysis backend: trigger ingestion and query your logs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL [default: from config, then http://localhost:9090]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Treat a non-2xx ingest response as a failed ingest
    #[arg(long, global = true)]
    strict_ingest: bool,

    /// Write diagnostic logs here when running the TUI
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Tui,
    /// Trigger log ingestion once and print the result
    Ingest,
    /// Ask a single question and print the answer
    Query {
        /// Query text
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let http = HttpBackend::new(&config.base_url).with_strict_ingest(config.strict_ingest);
    let backend_url = http.base_url().to_string();
    let backend: Arc<dyn LogBackend> = Arc::new(http);
    let mut controller = Controller::new(backend);

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            logging::init_file(&config.resolved_log_file()?, &config.log_filter)?;
            tracing::info!(base_url = %backend_url, "starting logbot");
            run_tui(controller, backend_url, &config).await?;
        }
        Commands::Ingest => {
            logging::init_stderr(&config.log_filter);
            let seen = controller.transcript().len();
            controller.trigger_ingest().await;
            print_new_entries(&controller, seen);
        }
        Commands::Query { text } => {
            logging::init_stderr(&config.log_filter);
            let seen = controller.transcript().len();
            if !controller.submit_query(&text.join(" ")).await {
                eprintln!("Nothing to ask: the query is empty.");
            }
            print_new_entries(&controller, seen);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if cli.strict_ingest {
        config.strict_ingest = true;
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = Some(log_file.clone());
    }

    Ok(config)
}

fn print_new_entries(controller: &Controller, seen: usize) {
    for entry in &controller.transcript().entries()[seen..] {
        let label = match entry.role {
            Role::User => "You",
            Role::Bot => "Bot",
        };
        println!("{}:", label);
        for line in entry.display_lines() {
            println!("  {}", line);
        }
    }
}

async fn run_tui(controller: Controller, backend_url: String, config: &Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(Duration::from_millis(config.tick_rate_ms.max(16)));
    let mut app = App::new(controller, backend_url);

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        let busy = app.is_busy();
        tokio::select! {
            event = events.next() => match event {
                Some(event) => handler::handle_event(app, event),
                None => return Ok(()),
            },
            _ = app.controller.settle(), if busy => {
                app.tick_animation();
            }
        }
    }
}
