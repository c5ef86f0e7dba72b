use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::LevelFilter;
use serde::Deserialize;

use crate::command::Command;
use crate::nav::EscapePolicy;
use crate::theme::{Theme, parse_color};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code: KeyCode,
  pub modifiers: KeyModifiers,
}

impl KeyBinding {
  pub fn display_key(&self) -> String {
    let key_name = match self.code {
      KeyCode::Char(' ') => "Space".to_string(),
      KeyCode::Char(c) => c.to_string(),
      KeyCode::Enter => "Enter".to_string(),
      KeyCode::Esc => "Esc".to_string(),
      KeyCode::Backspace => "Backspace".to_string(),
      KeyCode::Delete => "Delete".to_string(),
      KeyCode::Tab => "Tab".to_string(),
      KeyCode::BackTab => "Shift+Tab".to_string(),
      KeyCode::Up => "Up".to_string(),
      KeyCode::Down => "Down".to_string(),
      KeyCode::Left => "Left".to_string(),
      KeyCode::Right => "Right".to_string(),
      KeyCode::F(n) => format!("F{n}"),
      _ => format!("{:?}", self.code),
    };

    if self.modifiers.contains(KeyModifiers::CONTROL) {
      format!("Ctrl+{key_name}")
    } else if self.modifiers.contains(KeyModifiers::ALT) {
      format!("Alt+{key_name}")
    } else {
      key_name
    }
  }
}

pub struct Config {
  pub tick_rate_ms: u64,
  pub show_hidden: bool,
  /// Lowercase, without the leading dot.
  pub extensions: Vec<String>,
  pub preferred_editor: Option<String>,
  pub escape_policy: EscapePolicy,
  pub theme: Theme,
  pub keys: HashMap<KeyBinding, Command>,
  pub log_level: LevelFilter,
  pub log_file: Option<PathBuf>,
  /// File the config was read from, if any.
  pub source: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
  colors: Option<HashMap<String, String>>,
  keys: Option<HashMap<String, String>>,
  logging: Option<LoggingConfig>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  tick_rate_ms: Option<u64>,
  show_hidden: Option<bool>,
  extensions: Option<Vec<String>>,
  preferred_editor: Option<String>,
  escape_policy: Option<String>,
  theme: Option<String>,
}

#[derive(Deserialize, Default)]
struct LoggingConfig {
  level: Option<String>,
  file: Option<String>,
}

/// Shape of the older `config.json` files: camelCase keys and a
/// `keyBindings` table mapping command to key.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct JsonConfig {
  colors: Option<HashMap<String, String>>,
  key_bindings: Option<HashMap<String, String>>,
  theme: Option<String>,
  file_filters: Option<JsonFileFilters>,
  logging: Option<LoggingConfig>,
  preferred_editor: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct JsonFileFilters {
  show_hidden_files: Option<bool>,
  file_extensions: Option<Vec<String>>,
}

fn json_command_name(name: &str) -> Option<&'static str> {
  match name {
    "quit" => Some("quit"),
    "nextBox" => Some("next_pane"),
    "previousBox" => Some("previous_pane"),
    "selectUp" => Some("move_up"),
    "selectDown" => Some("move_down"),
    "execute" => Some("activate"),
    "backspace" => Some("backspace"),
    "rename" => Some("rename"),
    "move" => Some("move"),
    "delete" => Some("delete"),
    "copy" => Some("copy"),
    _ => None,
  }
}

pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
  if s.is_empty() {
    return None;
  }

  let parts: Vec<&str> = s.split('+').collect();

  if parts.len() == 1 {
    let key = parts[0];
    if let Some(code) = named_key(key) {
      return Some(KeyBinding { code, modifiers: KeyModifiers::NONE });
    }
    let mut chars = key.chars();
    return match (chars.next(), chars.next()) {
      (Some(c), None) => Some(KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE }),
      _ => None,
    };
  }

  if parts.len() == 2 {
    let modifier_str = parts[0].to_lowercase();
    let key_str = parts[1];

    let modifiers = match modifier_str.as_str() {
      "ctrl" => KeyModifiers::CONTROL,
      "alt" => KeyModifiers::ALT,
      "shift" => {
        if key_str.eq_ignore_ascii_case("tab") {
          return Some(KeyBinding { code: KeyCode::BackTab, modifiers: KeyModifiers::NONE });
        }
        let mut chars = key_str.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
          let c = c.to_uppercase().next().unwrap_or(c);
          return Some(KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE });
        }
        return named_key(key_str).map(|code| KeyBinding { code, modifiers: KeyModifiers::SHIFT });
      }
      _ => return None,
    };

    if let Some(code) = named_key(key_str) {
      return Some(KeyBinding { code, modifiers });
    }
    let mut chars = key_str.chars();
    return match (chars.next(), chars.next()) {
      (Some(c), None) => {
        Some(KeyBinding { code: KeyCode::Char(c.to_ascii_lowercase()), modifiers })
      }
      _ => None,
    };
  }

  None
}

fn named_key(s: &str) -> Option<KeyCode> {
  match s.to_lowercase().as_str() {
    "enter" => Some(KeyCode::Enter),
    "space" => Some(KeyCode::Char(' ')),
    "esc" | "escape" => Some(KeyCode::Esc),
    "up" => Some(KeyCode::Up),
    "down" => Some(KeyCode::Down),
    "left" => Some(KeyCode::Left),
    "right" => Some(KeyCode::Right),
    "backspace" => Some(KeyCode::Backspace),
    "delete" => Some(KeyCode::Delete),
    "tab" => Some(KeyCode::Tab),
    "backtab" => Some(KeyCode::BackTab),
    "pageup" => Some(KeyCode::PageUp),
    "pagedown" => Some(KeyCode::PageDown),
    s if s.starts_with('f') && s.len() > 1 => {
      s[1..].parse::<u8>().ok().filter(|&n| (1..=24).contains(&n)).map(KeyCode::F)
    }
    _ => None,
  }
}

pub fn normalize_key_event(key: KeyEvent) -> KeyBinding {
  let mut modifiers = key.modifiers;
  match key.code {
    KeyCode::Char(c) if c.is_uppercase() => modifiers -= KeyModifiers::SHIFT,
    KeyCode::BackTab => modifiers -= KeyModifiers::SHIFT,
    _ => {}
  }
  KeyBinding { code: key.code, modifiers }
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
  let home = dirs::home_dir();
  match (path, home) {
    ("~", Some(home)) => home,
    (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
    (p, _) => PathBuf::from(p),
  }
}

pub fn default_log_file() -> Option<PathBuf> {
  dirs::data_local_dir().map(|d| d.join("lds").join("lds.log"))
}

impl Default for Config {
  fn default() -> Self {
    let mut config = Config::empty();
    let mut errors = Vec::new();
    config.apply_toml_str(Config::default_toml(), &mut errors);
    config
  }
}

impl Config {
  fn empty() -> Self {
    Config {
      tick_rate_ms: 500,
      show_hidden: false,
      extensions: Vec::new(),
      preferred_editor: None,
      escape_policy: EscapePolicy::default(),
      theme: Theme::default(),
      keys: HashMap::new(),
      log_level: LevelFilter::Info,
      log_file: None,
      source: None,
    }
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    match toml::from_str::<TomlConfig>(s) {
      Ok(raw) => self.apply(raw, true, errors),
      Err(e) => errors.push(format!("failed to parse config.toml: {e}")),
    }
  }

  fn apply_json_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let json: JsonConfig = match serde_json::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.json: {e}"));
        return;
      }
    };

    let mut keys = HashMap::new();
    for (name, key) in json.key_bindings.unwrap_or_default() {
      if key.is_empty() {
        continue;
      }
      match json_command_name(&name) {
        Some(command) => {
          keys.insert(key, command.to_string());
        }
        None => errors.push(format!("invalid key binding name: {name:?}")),
      }
    }

    let filters = json.file_filters.unwrap_or_default();
    let raw = TomlConfig {
      general: Some(GeneralConfig {
        show_hidden: filters.show_hidden_files,
        extensions: filters.file_extensions,
        preferred_editor: json.preferred_editor,
        theme: json.theme,
        ..Default::default()
      }),
      colors: json.colors,
      keys: Some(keys),
      logging: json.logging,
    };
    // JSON bindings only ever adjusted the built-in keys
    self.apply(raw, false, errors);
  }

  fn apply(&mut self, raw: TomlConfig, replace_keys: bool, errors: &mut Vec<String>) {
    if let Some(general) = raw.general {
      if let Some(tick) = general.tick_rate_ms {
        if tick == 0 {
          errors.push("tick_rate_ms must be greater than 0".to_string());
        } else {
          self.tick_rate_ms = tick;
        }
      }
      if let Some(show) = general.show_hidden {
        self.show_hidden = show;
      }
      if let Some(exts) = general.extensions {
        self.extensions = exts
          .iter()
          .map(|e| e.trim().trim_start_matches('.').to_lowercase())
          .filter(|e| !e.is_empty())
          .collect();
      }
      if let Some(editor) = general.preferred_editor.filter(|e| !e.trim().is_empty()) {
        self.preferred_editor = Some(editor);
      }
      if let Some(policy) = general.escape_policy {
        match EscapePolicy::from_name(&policy) {
          Some(p) => self.escape_policy = p,
          None => errors.push(format!("invalid escape_policy: {policy:?}")),
        }
      }
      if let Some(name) = general.theme.filter(|t| !t.is_empty()) {
        match Theme::from_name(&name) {
          Some(theme) => self.theme = theme,
          None => errors.push(format!("unknown theme: {name:?}")),
        }
      }
    }

    if let Some(colors) = raw.colors {
      for (slot, value) in &colors {
        if value.is_empty() {
          continue;
        }
        let Some(color) = parse_color(value) else {
          errors.push(format!("invalid color for {slot}: {value:?}"));
          continue;
        };
        if !self.theme.set(slot, color) {
          errors.push(format!("unknown color slot: {slot:?}"));
        }
      }
    }

    if let Some(keys) = raw.keys {
      if replace_keys {
        self.keys.clear();
      }
      for (key_str, command_str) in &keys {
        let Some(kb) = parse_key_binding(key_str) else {
          errors.push(format!("invalid key binding: {key_str:?}"));
          continue;
        };
        let Some(command) = Command::from_name(command_str) else {
          errors.push(format!("invalid command: {command_str:?}"));
          continue;
        };
        self.keys.insert(kb, command);
      }
    }

    if let Some(logging) = raw.logging {
      if let Some(level) = logging.level {
        match LevelFilter::from_str(&level) {
          Ok(l) => self.log_level = l,
          Err(_) => errors.push(format!("invalid log level: {level:?}")),
        }
      }
      if let Some(file) = logging.file.filter(|f| !f.is_empty()) {
        self.log_file = Some(expand_path(&file));
      }
    }
  }

  pub fn default_toml() -> &'static str {
    r##"[general]
tick_rate_ms = 500                # cursor blink and event poll interval
show_hidden = false               # list dot files (after regular files)
extensions = []                   # e.g. ["rs", "toml"]; empty lists every file
# preferred_editor = "nvim"       # falls back to $VISUAL, $EDITOR, nvim, vim, nano, vi
escape_policy = "always_parent"   # or "directories_pane"
theme = "dark"                    # or "light"

[colors]
# text = "white"
# border = "teal"
# highlight = "#5fafff"
# command = "yellow"
# blinking = "green"
# label = "gray"
# value = "white"
# focused = "orange"
# error = "red"

[keys]
tab = "next_pane"
"shift+tab" = "previous_pane"
up = "move_up"
down = "move_down"
enter = "activate"
esc = "escape"
backspace = "backspace"
"ctrl+c" = "quit"
"alt+r" = "rename"
"alt+m" = "move"
"alt+c" = "copy"
"alt+d" = "delete"
"alt+x" = "run_command"

[logging]
level = "info"
# file = "~/.local/share/lds/lds.log"
"##
  }

  /// Keys bound to each command, sorted for stable display.
  pub fn reverse_lookup(&self) -> HashMap<Command, Vec<String>> {
    let mut map: HashMap<Command, Vec<String>> = HashMap::new();
    for (kb, command) in &self.keys {
      map.entry(*command).or_default().push(kb.display_key());
    }
    for keys in map.values_mut() {
      keys.sort();
    }
    map
  }

  /// Config files looked for, in order, when `--config` is not given.
  pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
      paths.push(dir.join("lds").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
      paths.push(home.join(".lds").join("config.toml"));
    }
    paths.push(PathBuf::from("config.toml"));
    paths.push(PathBuf::from("config.json"));
    paths
  }

  pub fn config_path() -> anyhow::Result<PathBuf> {
    dirs::config_dir()
      .map(|d| d.join("lds").join("config.toml"))
      .context("could not determine config directory")
  }

  pub fn dump_default_config(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, Self::default_toml())
      .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
  }

  /// Load `explicit`, or the first existing candidate. Problems are returned
  /// alongside a usable config rather than aborting.
  pub fn load(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let path = match explicit {
      Some(p) => Some(p.to_path_buf()),
      None => Self::candidate_paths().into_iter().find(|p| p.is_file()),
    };
    match path {
      Some(p) => Self::load_path(&p),
      None => (Config::default(), Vec::new()),
    }
  }

  pub fn load_path(path: &Path) -> (Config, Vec<String>) {
    let mut errors = Vec::new();
    let content = match std::fs::read_to_string(path) {
      Ok(s) => s,
      Err(e) => {
        errors.push(format!("failed to read {}: {e}", path.display()));
        return (Config::default(), errors);
      }
    };

    let mut config = Config::default();
    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
      config.apply_json_str(&content, &mut errors);
    } else {
      config.apply_toml_str(&content, &mut errors);
    }
    config.source = Some(path.to_path_buf());
    (config, errors)
  }

  pub fn load_from_str(s: &str) -> Config {
    let mut errors = Vec::new();
    Self::load_from_str_with_errors(s, &mut errors)
  }

  fn load_from_str_with_errors(s: &str, errors: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    config.apply_toml_str(s, errors);
    config
  }

  /// Directory to watch for edits: where the config came from, else where
  /// `--init` would put it.
  pub fn watch_dir(&self) -> Option<PathBuf> {
    match &self.source {
      Some(p) => p.parent().map(|d| {
        if d.as_os_str().is_empty() { PathBuf::from(".") } else { d.to_path_buf() }
      }),
      None => dirs::config_dir().map(|d| d.join("lds")),
    }
  }
}
