mod action;
mod app;
mod command;
mod config;
mod event;
mod fs;
mod git;
mod logging;
mod nav;
mod opener;
mod theme;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
  EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{LevelFilter, error, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;
use crate::config::Config;
use crate::event::{Event, EventLoop, map_key, map_mouse};
use crate::nav::Geometry;

/// Edits closer together than this count as one reload.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Parser)]
#[command(name = "lds", version, about = "Four-pane terminal directory browser")]
struct Args {
  /// Directory to open (defaults to the current one)
  path: Option<PathBuf>,

  /// Show hidden files and directories
  #[arg(short, long)]
  all: bool,

  /// Read this config file instead of searching for one
  #[arg(long, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Log level: off, error, warn, info, debug, trace
  #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
  log_level: Option<LevelFilter>,

  /// Write the default config file and exit
  #[arg(long)]
  init: bool,
}

fn parse_level(s: &str) -> std::result::Result<LevelFilter, String> {
  LevelFilter::from_str(s).map_err(|_| format!("unknown log level '{s}'"))
}

fn main() -> Result<()> {
  let args = Args::parse();

  if args.init {
    return write_default_config();
  }

  let (mut config, config_errors) = Config::load(args.config.as_deref());
  config.show_hidden |= args.all;

  let level = args.log_level.unwrap_or(config.log_level);
  if let Some(log_file) = config.log_file.clone().or_else(crate::config::default_log_file)
    && let Err(e) = logging::init(level, &log_file)
  {
    eprintln!("lds: logging disabled: {e:#}");
  }

  let root = match &args.path {
    Some(p) => p.clone(),
    None => std::env::current_dir().context("cannot read current directory")?,
  };
  let root =
    std::fs::canonicalize(&root).with_context(|| format!("cannot open {}", root.display()))?;
  std::env::set_current_dir(&root).with_context(|| format!("cannot enter {}", root.display()))?;
  info!("lds {} starting in {}", env!("CARGO_PKG_VERSION"), root.display());

  // Install panic hook that restores terminal
  let original_hook = panic::take_hook();
  panic::set_hook(Box::new(move |info| {
    let _ = restore_terminal();
    original_hook(info);
  }));

  let watch_dir = config.watch_dir();
  let tick_rate = Duration::from_millis(config.tick_rate_ms);

  setup_terminal()?;
  let backend = CrosstermBackend::new(io::stdout());
  let mut terminal = Terminal::new(backend)?;
  let size = terminal.size()?;

  let mut app = match App::new(root, config, Geometry::from_terminal(size.width, size.height)) {
    Ok(app) => app,
    Err(e) => {
      restore_terminal()?;
      return Err(e);
    }
  };
  if !config_errors.is_empty() {
    app.show_error(config_errors);
  }

  let events = EventLoop::new(tick_rate, watch_dir.as_deref());
  let mut last_reload = Instant::now() - RELOAD_DEBOUNCE;

  loop {
    terminal.draw(|frame| ui::draw(frame, &app))?;

    match events.next()? {
      Event::Key(key) => {
        if app.error_messages.is_empty() {
          let command = map_key(key, &app.config);
          app.handle_event(nav::Event::Command(command))?;
        } else {
          app.dismiss_errors();
        }
      }
      Event::Mouse(mouse) => {
        if let Some(ev) = map_mouse(mouse) {
          app.handle_event(ev)?;
        }
      }
      Event::Resize(w, h) => app.handle_event(nav::Event::Resize(w, h))?,
      Event::Tick => app.handle_event(nav::Event::Tick)?,
      Event::ConfigChanged => {
        if last_reload.elapsed() > RELOAD_DEBOUNCE {
          reload_config(&mut app, &args);
          last_reload = Instant::now();
        }
      }
    }

    // Editor and shell commands take over the terminal
    if let Some(suspend) = app.handle_suspend() {
      events.pause();
      drop(terminal);
      restore_terminal()?;
      let outcome = App::execute_suspend(&suspend, &app.cwd);
      terminal = resume_terminal()?;
      if events.resume() {
        reload_config(&mut app, &args);
        last_reload = Instant::now();
      }
      app.refresh();
      let size = terminal.size()?;
      app.handle_event(nav::Event::Resize(size.width, size.height))?;
      if let Err(e) = outcome {
        error!("{e:#}");
        app.set_error(format!("{e:#}"));
      }
    }

    if app.should_quit {
      break;
    }
  }

  restore_terminal()?;
  info!("lds exiting");
  Ok(())
}

fn write_default_config() -> Result<()> {
  let config_path = Config::config_path()?;
  let write = if config_path.exists() {
    eprint!("{} already exists. Overwrite? [y/N] ", config_path.display());
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).unwrap_or(0);
    answer.trim().eq_ignore_ascii_case("y")
  } else {
    true
  };
  if write {
    Config::dump_default_config(&config_path)?;
    println!("{}", config_path.display());
  }
  Ok(())
}

fn setup_terminal() -> Result<()> {
  enable_raw_mode()?;
  execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
  Ok(())
}

fn restore_terminal() -> Result<()> {
  disable_raw_mode()?;
  execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
  Ok(())
}

fn resume_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
  setup_terminal()?;
  // Drain stale keystrokes buffered in the TTY while the subprocess ran
  while crossterm::event::poll(Duration::ZERO).unwrap_or(false) {
    let _ = crossterm::event::read();
  }
  Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

fn reload_config(app: &mut App, args: &Args) {
  let (mut config, errors) = Config::load(args.config.as_deref());
  config.show_hidden |= args.all;
  app.apply_config(config);
  info!("config reloaded");
  if errors.is_empty() {
    app.set_status("Config reloaded".to_string());
  } else {
    app.show_error(errors);
  }
}
