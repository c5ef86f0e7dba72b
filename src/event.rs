use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
  self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
  MouseEvent, MouseEventKind,
};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::command::Command;
use crate::config::{Config, normalize_key_event};
use crate::nav;

const PAUSED_POLL: Duration = Duration::from_millis(50);

pub enum Event {
  Key(KeyEvent),
  Mouse(MouseEvent),
  Resize(u16, u16),
  Tick,
  ConfigChanged,
}

pub struct EventLoop {
  rx: mpsc::Receiver<Event>,
  paused: Arc<AtomicBool>,
  _watcher: Option<RecommendedWatcher>,
}

impl EventLoop {
  pub fn new(tick_rate: Duration, watch_dir: Option<&Path>) -> Self {
    let (tx, rx) = mpsc::channel();
    let paused = Arc::new(AtomicBool::new(false));

    let input_tx = tx.clone();
    let input_paused = Arc::clone(&paused);
    thread::spawn(move || loop {
      // A subprocess owns the terminal; leave its input alone
      if input_paused.load(Ordering::SeqCst) {
        thread::sleep(PAUSED_POLL);
        continue;
      }
      if event::poll(tick_rate).unwrap_or(false) {
        if input_paused.load(Ordering::SeqCst) {
          continue;
        }
        let forwarded = match event::read() {
          Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
          Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
          Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
          _ => None,
        };
        if let Some(ev) = forwarded
          && input_tx.send(ev).is_err()
        {
          break;
        }
      } else if input_tx.send(Event::Tick).is_err() {
        break;
      }
    });

    let watcher = watch_dir.and_then(|dir| watch_config(dir, tx));
    Self { rx, paused, _watcher: watcher }
  }

  pub fn next(&self) -> Result<Event> {
    Ok(self.rx.recv()?)
  }

  pub fn pause(&self) {
    self.paused.store(true, Ordering::SeqCst);
  }

  /// Drop everything queued while paused and start reading input again.
  /// Returns whether the config file changed in the meantime.
  pub fn resume(&self) -> bool {
    let mut config_changed = false;
    while let Ok(ev) = self.rx.try_recv() {
      if matches!(ev, Event::ConfigChanged) {
        config_changed = true;
      }
    }
    self.paused.store(false, Ordering::SeqCst);
    config_changed
  }
}

fn watch_config(dir: &Path, tx: mpsc::Sender<Event>) -> Option<RecommendedWatcher> {
  let handler = move |res: notify::Result<notify::Event>| {
    if let Ok(event) = res
      && is_config_event(&event)
    {
      let _ = tx.send(Event::ConfigChanged);
    }
  };
  let mut watcher = match notify::recommended_watcher(handler) {
    Ok(w) => w,
    Err(e) => {
      log::warn!("config watch unavailable: {e}");
      return None;
    }
  };
  if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
    log::warn!("cannot watch {}: {e}", dir.display());
    return None;
  }
  log::debug!("watching {} for config changes", dir.display());
  Some(watcher)
}

fn is_config_event(event: &notify::Event) -> bool {
  matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
    && event.paths.iter().any(|p| {
      matches!(p.file_name().and_then(|n| n.to_str()), Some("config.toml" | "config.json"))
    })
}

/// Bound keys first; any other printable character is typed.
pub fn map_key(key: KeyEvent, config: &Config) -> Command {
  let kb = normalize_key_event(key);
  if let Some(command) = config.keys.get(&kb) {
    return *command;
  }
  match key.code {
    KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
      Command::TypeChar(c)
    }
    _ => Command::None,
  }
}

/// Only left clicks reach the navigation engine.
pub fn map_mouse(mouse: MouseEvent) -> Option<nav::Event> {
  match mouse.kind {
    MouseEventKind::Down(MouseButton::Left) => {
      Some(nav::Event::Mouse { column: mouse.column, row: mouse.row })
    }
    _ => None,
  }
}
