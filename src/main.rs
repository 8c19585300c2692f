mod app;
mod catalog;
mod config;
mod constants;
mod detail;
mod history;
mod html;
mod input;
mod listing;
mod player;
mod router;
mod taxonomy;
mod theme;
mod ui;
mod view;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use reqwest::Client;
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::App;
use catalog::{CatalogSource, load_catalog};
use config::Config;
use constants::constants;
use router::on_navigate;
use view::{CatalogState, Settings, render};

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse a JSON video catalog", long_about = None)]
struct Args {
  /// Catalog URL or path (overrides prefs.toml; default: videos.json)
  #[arg(short, long, global = true)]
  catalog: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive terminal browser (default)
  Browse {
    /// Query string to open first, e.g. "type=category&name=Music"
    #[arg(default_value = "")]
    query: String,
  },
  /// Print the HTML for a query string
  Render {
    /// Query string, e.g. "type=video&path=my-clip"
    #[arg(default_value = "")]
    query: String,
    /// Emit only the container regions instead of a full page
    #[arg(long)]
    fragment: bool,
  },
  /// Print shell completions
  Completions {
    #[arg(value_enum)]
    shell: Shell,
  },
}

// --- Logging ---

/// Interactive mode owns the terminal, so logs go to a file in the data dir.
fn init_file_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "reel")?;
  let log_dir = proj_dirs.data_dir();
  std::fs::create_dir_all(log_dir).ok()?;
  let appender = tracing_appender::rolling::never(log_dir, &constants().log_file_name);
  let (writer, guard) = tracing_appender::non_blocking(appender);
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_env("REEL_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();
  Some(guard)
}

fn init_stderr_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_env("REEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let config = Config::load();
  let source = CatalogSource::parse(&config.catalog_source(args.catalog.as_deref()));

  match args.command.unwrap_or(Command::Browse { query: String::new() }) {
    Command::Browse { query } => {
      let _guard = init_file_tracing();
      browse(source, &query, &config).await
    }
    Command::Render { query, fragment } => {
      init_stderr_tracing();
      render_html(source, &query, fragment).await
    }
    Command::Completions { shell } => {
      clap_complete::generate(shell, &mut Args::command(), "reel", &mut std::io::stdout());
      Ok(())
    }
  }
}

async fn render_html(source: CatalogSource, query: &str, fragment: bool) -> Result<()> {
  let catalog = match load_catalog(&Client::new(), &source).await {
    Ok(catalog) => CatalogState::Ready(catalog),
    Err(e) => {
      warn!(err = %format!("{:#}", e), "catalog load failed");
      CatalogState::Failed(format!("{:#}", e))
    }
  };
  let doc = render(&on_navigate(query), &catalog, &Settings::default());
  let out = if fragment { html::Fragments::from_document(&doc).to_regions() } else { html::render_page(&doc) };
  let mut stdout = std::io::stdout().lock();
  writeln!(stdout, "{}", out).context("Failed to write HTML to stdout")?;
  Ok(())
}

async fn browse(source: CatalogSource, query: &str, config: &Config) -> Result<()> {
  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, source, query, config).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, source: CatalogSource, query: &str, config: &Config) -> Result<()> {
  info!(source = %source, query = %query, "starting browser");
  let mut app = App::new(source, on_navigate(query), theme::index_of(config.theme_name.as_deref()));
  app.trigger_load();

  loop {
    app.check_pending();
    app.player.check_status();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key).await?;
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  app.player.stop().await?;
  Ok(())
}
