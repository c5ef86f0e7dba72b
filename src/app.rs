use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::action::Action;
use crate::config::Config;
use crate::fs::preview::FilePreview;
use crate::fs::{ListOptions, list_directory, ops};
use crate::nav::{self, EntryCatalog, Geometry, NavigationState, Pane};
use crate::opener;
use crate::ui::status_bar::key_hints;

/// Ticks a status message stays on screen.
const STATUS_TICKS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
  pub text: String,
  pub is_error: bool,
}

/// Work that needs the terminal handed over to a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspendAction {
  Editor { editor: String, file: PathBuf },
  RunCommand { command: String, file: PathBuf },
}

pub struct App {
  pub nav: NavigationState,
  pub cwd: PathBuf,
  pub config: Config,
  pub hints: String,
  pub should_quit: bool,
  pub should_suspend: Option<SuspendAction>,
  pub status_message: Option<StatusMessage>,
  pub status_ticks: u32,
  /// Config problems shown in a popup until the next key.
  pub error_messages: Vec<String>,
  /// Keep the process working directory in step with `cwd`.
  pub follow_process_dir: bool,
  /// Head of the selected file while the Files pane has focus.
  pub preview: Option<FilePreview>,
}

impl App {
  pub fn new(cwd: PathBuf, config: Config, geometry: Geometry) -> Result<Self> {
    let listing = list_directory(&cwd, &list_options(&config))
      .with_context(|| format!("cannot open {}", cwd.display()))?;
    let nav = NavigationState::new(EntryCatalog::from(listing), geometry)
      .with_escape_policy(config.escape_policy);
    Ok(Self {
      nav,
      cwd,
      hints: key_hints(&config.reverse_lookup()),
      config,
      should_quit: false,
      should_suspend: None,
      status_message: None,
      status_ticks: 0,
      error_messages: Vec::new(),
      follow_process_dir: true,
      preview: None,
    })
  }

  /// Feed one event through the navigation engine and carry out whatever it
  /// asks for.
  pub fn handle_event(&mut self, event: nav::Event) -> Result<()> {
    if event == nav::Event::Tick {
      self.tick_status();
    }
    let (next, action) = nav::handle_event(&self.nav, &event);
    let previous = std::mem::replace(&mut self.nav, next);
    match action {
      // Escape has already reset query and panes; undo that if the parent
      // cannot be entered
      Some(Action::NavigateParent) => {
        if !self.enter_parent() {
          self.nav = previous;
        }
      }
      Some(action) => self.dispatch(action)?,
      None => {}
    }
    self.sync_preview();
    Ok(())
  }

  pub fn dispatch(&mut self, action: Action) -> Result<()> {
    match action {
      Action::Quit => self.should_quit = true,
      Action::ChangeDirectory(name) => {
        let target = self.cwd.join(&name);
        self.change_directory(target);
      }
      Action::NavigateParent => {
        self.enter_parent();
      }
      Action::OpenOrInspect(name) => {
        if self.nav.catalog().has_directory(&name) {
          let target = self.cwd.join(&name);
          self.change_directory(target);
        } else {
          self.open_in_editor(&name);
        }
      }
      Action::OpenFile(name) => self.open_in_editor(&name),
      Action::RunCommand { command, file } => {
        let file = self.cwd.join(file);
        self.should_suspend = Some(SuspendAction::RunCommand { command, file });
      }
      Action::RenameFile { from, to } => {
        let source = self.cwd.join(&from);
        let dest = ops::resolve_target(&self.cwd, &from, &to);
        match ops::rename_path(&source, &dest) {
          Ok(()) => self.file_op_done(format!("Renamed {from} to {}", self.display(&dest))),
          Err(e) => self.file_op_failed(format!("Rename failed: {e}")),
        }
      }
      Action::MoveFile { from, to } => {
        let source = self.cwd.join(&from);
        let dest = ops::resolve_target(&self.cwd, &from, &to);
        match ops::move_path(&source, &dest) {
          Ok(()) => self.file_op_done(format!("Moved {from} to {}", self.display(&dest))),
          Err(e) => self.file_op_failed(format!("Move failed: {e}")),
        }
      }
      Action::CopyFile { from, to } => {
        let source = self.cwd.join(&from);
        let dest = ops::resolve_target(&self.cwd, &from, &to);
        match ops::copy_to(&source, &dest) {
          Ok(landed) => self.file_op_done(format!("Copied {from} to {}", self.display(&landed))),
          Err(e) => self.file_op_failed(format!("Copy failed: {e}")),
        }
      }
      Action::DeleteFile { name } => match ops::delete_path(&self.cwd.join(&name)) {
        Ok(()) => self.file_op_done(format!("Deleted {name}")),
        Err(e) => self.file_op_failed(format!("Delete failed: {e}")),
      },
    }
    Ok(())
  }

  /// Switch to `target`. The listing is read before anything changes, so a
  /// failure leaves the current directory on screen. Returns whether the
  /// switch happened.
  pub fn change_directory(&mut self, target: PathBuf) -> bool {
    let listing = match list_directory(&target, &list_options(&self.config)) {
      Ok(listing) => listing,
      Err(e) => {
        warn!("listing failed: {e}");
        self.set_error(e.to_string());
        return false;
      }
    };
    if self.follow_process_dir
      && let Err(e) = std::env::set_current_dir(&target)
    {
      warn!("chdir to {} failed: {e}", target.display());
      self.set_error(format!("{}: {e}", target.display()));
      return false;
    }
    info!("entered {}", target.display());
    self.cwd = target;
    self.nav.replace_catalog(EntryCatalog::from(listing));
    true
  }

  fn enter_parent(&mut self) -> bool {
    match self.cwd.parent() {
      Some(parent) => {
        let parent = parent.to_path_buf();
        self.change_directory(parent)
      }
      // Already at the root; show it again
      None => {
        self.refresh();
        true
      }
    }
  }

  /// Re-read the current directory.
  pub fn refresh(&mut self) {
    match list_directory(&self.cwd, &list_options(&self.config)) {
      Ok(listing) => self.nav.replace_catalog(EntryCatalog::from(listing)),
      Err(e) => {
        warn!("relisting failed: {e}");
        self.set_error(e.to_string());
      }
    }
    // Contents may have changed on disk
    self.preview = None;
    self.sync_preview();
  }

  /// Load the preview when the selected file changed.
  fn sync_preview(&mut self) {
    let selected = match self.nav.focus() {
      Pane::Files => self.nav.selected_entry(Pane::Files).map(|e| self.cwd.join(&e.name)),
      _ => None,
    };
    match selected {
      Some(path) if self.preview.as_ref().is_some_and(|p| p.path == path) => {}
      Some(path) => self.preview = Some(FilePreview::load(&path)),
      None => self.preview = None,
    }
  }

  fn open_in_editor(&mut self, name: &str) {
    match opener::resolve_editor(self.config.preferred_editor.as_deref()) {
      Some(editor) => {
        self.should_suspend = Some(SuspendAction::Editor { editor, file: self.cwd.join(name) });
      }
      None => self.set_error("No editor found; set preferred_editor or $EDITOR".to_string()),
    }
  }

  fn file_op_done(&mut self, message: String) {
    info!("{message}");
    self.set_status(message);
    self.refresh();
  }

  fn file_op_failed(&mut self, message: String) {
    error!("{message}");
    self.set_error(message);
    self.refresh();
  }

  fn display(&self, path: &Path) -> String {
    path.strip_prefix(&self.cwd).unwrap_or(path).display().to_string()
  }

  pub fn set_status(&mut self, text: String) {
    self.status_message = Some(StatusMessage { text, is_error: false });
    self.status_ticks = STATUS_TICKS;
  }

  pub fn set_error(&mut self, text: String) {
    self.status_message = Some(StatusMessage { text, is_error: true });
    self.status_ticks = STATUS_TICKS;
  }

  fn tick_status(&mut self) {
    if self.status_ticks > 0 {
      self.status_ticks -= 1;
    } else {
      self.status_message = None;
    }
  }

  pub fn show_error(&mut self, errors: Vec<String>) {
    for e in &errors {
      warn!("config: {e}");
    }
    self.error_messages = errors;
  }

  pub fn dismiss_errors(&mut self) {
    self.error_messages.clear();
  }

  /// Swap in a reloaded config. Listing filters may have changed, so the
  /// directory is read again.
  pub fn apply_config(&mut self, config: Config) {
    let relist = list_options(&config) != list_options(&self.config);
    self.nav.set_escape_policy(config.escape_policy);
    self.hints = key_hints(&config.reverse_lookup());
    self.config = config;
    if relist {
      self.refresh();
    }
  }

  pub fn handle_suspend(&mut self) -> Option<SuspendAction> {
    self.should_suspend.take()
  }

  /// Run the child process on the bare terminal. Called between
  /// restore and setup of the TUI.
  pub fn execute_suspend(action: &SuspendAction, cwd: &Path) -> Result<()> {
    match action {
      SuspendAction::Editor { editor, file } => {
        info!("opening {} with {editor}", file.display());
        let status = opener::shell_command(editor, file)
          .current_dir(cwd)
          .status()
          .with_context(|| format!("failed to start {editor}"))?;
        info!("{editor} exited with {status}");
      }
      SuspendAction::RunCommand { command, file } => {
        info!("running `{command}` on {}", file.display());
        let status = opener::shell_command(command, file)
          .current_dir(cwd)
          .status()
          .with_context(|| format!("failed to run {command}"))?;
        info!("`{command}` exited with {status}");

        print!("\n[{status}] press Enter to return to lds");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
      }
    }
    Ok(())
  }
}

fn list_options(config: &Config) -> ListOptions {
  ListOptions { show_hidden: config.show_hidden, extensions: config.extensions.clone() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::Command;
  use crate::nav::EscapePolicy;
  use std::fs;

  use std::sync::atomic::{AtomicU32, Ordering};
  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn setup_test_dir() -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("lds_app_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("aaa_dir")).unwrap();
    fs::create_dir_all(dir.join("zzz_dir")).unwrap();
    fs::write(dir.join("aaa_dir").join("inner.txt"), "inside").unwrap();
    fs::write(dir.join("bbb.txt"), "hello").unwrap();
    fs::write(dir.join("ccc.rs"), "fn main() {}").unwrap();
    fs::write(dir.join(".hidden"), "secret").unwrap();
    dir
  }

  fn cleanup_test_dir(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
  }

  fn app_in(dir: &Path) -> App {
    let mut config = Config::default();
    config.preferred_editor = Some("true".to_string());
    let mut app = App::new(dir.to_path_buf(), config, Geometry::default()).unwrap();
    app.follow_process_dir = false;
    app
  }

  fn send(app: &mut App, command: Command) {
    app.handle_event(nav::Event::Command(command)).unwrap();
  }

  fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
      send(app, Command::TypeChar(c));
    }
  }

  fn focus_files(app: &mut App) {
    send(app, Command::PreviousPane);
    assert_eq!(app.nav.focus(), Pane::Files);
  }

  fn select_file(app: &mut App, name: &str) {
    focus_files(app);
    while app.nav.selected_entry(Pane::Files).is_some_and(|e| e.name != name) {
      let before = app.nav.pane(Pane::Files).selected_index;
      send(app, Command::MoveDown);
      assert_ne!(before, app.nav.pane(Pane::Files).selected_index, "{name} not listed");
    }
  }

  fn file_names(app: &App) -> Vec<String> {
    app.nav.catalog().files.iter().map(|e| e.name.clone()).collect()
  }

  #[test]
  fn test_app_creation_lists_directory() {
    let dir = setup_test_dir();
    let app = app_in(&dir);
    let dirs: Vec<&str> = app.nav.catalog().directories.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(dirs, vec!["aaa_dir", "zzz_dir"]);
    assert_eq!(file_names(&app), vec!["bbb.txt", "ccc.rs"]);
    assert!(!app.should_quit);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_app_creation_fails_for_missing_dir() {
    let dir = setup_test_dir();
    let result = App::new(dir.join("missing"), Config::default(), Geometry::default());
    assert!(result.is_err());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_show_hidden_appends_dot_files() {
    let dir = setup_test_dir();
    let mut config = Config::default();
    config.show_hidden = true;
    let app = App::new(dir.clone(), config, Geometry::default()).unwrap();
    assert_eq!(file_names(&app), vec!["bbb.txt", "ccc.rs", ".hidden"]);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_quit() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    send(&mut app, Command::Quit);
    assert!(app.should_quit);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_enter_directory_from_directories_pane() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    send(&mut app, Command::NextPane);
    send(&mut app, Command::NextPane);
    assert_eq!(app.nav.focus(), Pane::Directories);
    send(&mut app, Command::Activate);
    assert_eq!(app.cwd, dir.join("aaa_dir"));
    assert_eq!(file_names(&app), vec!["inner.txt"]);
    assert_eq!(app.nav.focus(), Pane::Search);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_search_enter_on_directory_changes_dir() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    type_str(&mut app, "zzz");
    send(&mut app, Command::Activate);
    assert_eq!(app.cwd, dir.join("zzz_dir"));
    assert_eq!(app.nav.query(), "");
    assert!(app.should_suspend.is_none());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_search_enter_on_file_opens_editor() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    type_str(&mut app, "ccc");
    send(&mut app, Command::Activate);
    assert_eq!(
      app.handle_suspend(),
      Some(SuspendAction::Editor { editor: "true".to_string(), file: dir.join("ccc.rs") })
    );
    assert!(app.handle_suspend().is_none());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_escape_goes_to_parent() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.change_directory(dir.join("aaa_dir"));
    type_str(&mut app, "inn");
    send(&mut app, Command::Escape);
    assert_eq!(app.cwd, dir);
    assert_eq!(app.nav.query(), "");
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_dot_dot_query_goes_to_parent() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.change_directory(dir.join("zzz_dir"));
    type_str(&mut app, "..");
    send(&mut app, Command::Activate);
    assert_eq!(app.cwd, dir);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_escape_policy_from_config() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.change_directory(dir.join("aaa_dir"));
    let mut config = Config::default();
    config.escape_policy = EscapePolicy::DirectoriesPane;
    app.apply_config(config);
    send(&mut app, Command::Escape);
    assert_eq!(app.cwd, dir.join("aaa_dir"));
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_failed_listing_keeps_last_good_state() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    type_str(&mut app, "bbb");
    app.change_directory(dir.join("vanished"));
    assert_eq!(app.cwd, dir);
    assert_eq!(app.nav.query(), "bbb");
    let status = app.status_message.clone().unwrap();
    assert!(status.is_error);
    assert!(status.text.contains("no such directory"));
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_failed_parent_listing_restores_navigation() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.change_directory(dir.join("aaa_dir"));
    type_str(&mut app, "inn");
    let moved = dir.with_extension("moved");
    fs::rename(&dir, &moved).unwrap();

    send(&mut app, Command::Escape);
    assert_eq!(app.cwd, dir.join("aaa_dir"));
    assert_eq!(app.nav.query(), "inn");
    assert_eq!(app.nav.focus(), Pane::Search);
    assert!(app.status_message.as_ref().is_some_and(|s| s.is_error));
    cleanup_test_dir(&moved);
  }

  #[test]
  fn test_preview_follows_files_selection() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    assert!(app.preview.is_none());

    focus_files(&mut app);
    let preview = app.preview.clone().unwrap();
    assert_eq!(preview.path, dir.join("bbb.txt"));
    assert_eq!(preview.lines, Some(vec!["hello".to_string()]));

    send(&mut app, Command::MoveDown);
    assert_eq!(app.preview.as_ref().unwrap().path, dir.join("ccc.rs"));

    send(&mut app, Command::NextPane);
    assert!(app.preview.is_none());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_status_clears_after_ticks() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.set_status("hello".to_string());
    for _ in 0..STATUS_TICKS {
      app.handle_event(nav::Event::Tick).unwrap();
      assert!(app.status_message.is_some());
    }
    app.handle_event(nav::Event::Tick).unwrap();
    assert!(app.status_message.is_none());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_rename_file_through_prompt() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    select_file(&mut app, "bbb.txt");
    send(&mut app, Command::Rename);
    assert_eq!(app.nav.prompt().unwrap().input, "bbb.txt");
    for _ in 0.."bbb.txt".len() {
      send(&mut app, Command::Backspace);
    }
    type_str(&mut app, "renamed.txt");
    send(&mut app, Command::Activate);

    assert!(!dir.join("bbb.txt").exists());
    assert!(dir.join("renamed.txt").exists());
    assert!(file_names(&app).contains(&"renamed.txt".to_string()));
    assert!(!app.status_message.clone().unwrap().is_error);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_rename_to_existing_shows_error() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app
      .dispatch(Action::RenameFile { from: "bbb.txt".into(), to: "ccc.rs".into() })
      .unwrap();
    assert!(dir.join("bbb.txt").exists());
    assert_eq!(fs::read_to_string(dir.join("ccc.rs")).unwrap(), "fn main() {}");
    let status = app.status_message.clone().unwrap();
    assert!(status.is_error);
    assert!(status.text.contains("already exists"));
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_move_into_directory_keeps_name() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.dispatch(Action::MoveFile { from: "ccc.rs".into(), to: "zzz_dir".into() }).unwrap();
    assert!(!dir.join("ccc.rs").exists());
    assert!(dir.join("zzz_dir").join("ccc.rs").exists());
    assert_eq!(file_names(&app), vec!["bbb.txt"]);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_copy_onto_itself_gets_suffix() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.dispatch(Action::CopyFile { from: "bbb.txt".into(), to: "bbb.txt".into() }).unwrap();
    assert!(dir.join("bbb_copy.txt").exists());
    assert!(app.status_message.clone().unwrap().text.contains("bbb_copy.txt"));
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_delete_confirmed_with_y() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    select_file(&mut app, "ccc.rs");
    send(&mut app, Command::Delete);
    send(&mut app, Command::TypeChar('y'));
    assert!(!dir.join("ccc.rs").exists());
    assert_eq!(file_names(&app), vec!["bbb.txt"]);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_delete_declined_keeps_file() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    select_file(&mut app, "ccc.rs");
    send(&mut app, Command::Delete);
    send(&mut app, Command::TypeChar('n'));
    assert!(dir.join("ccc.rs").exists());
    assert!(app.nav.prompt().is_none());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_delete_missing_file_reports_error() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.dispatch(Action::DeleteFile { name: "ghost".into() }).unwrap();
    assert!(app.status_message.clone().unwrap().is_error);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_run_command_requests_suspend() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    select_file(&mut app, "bbb.txt");
    send(&mut app, Command::RunCommand);
    type_str(&mut app, "wc -l");
    send(&mut app, Command::Activate);
    assert_eq!(
      app.handle_suspend(),
      Some(SuspendAction::RunCommand { command: "wc -l".into(), file: dir.join("bbb.txt") })
    );
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_apply_config_relists_on_filter_change() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    let mut config = Config::default();
    config.extensions = vec!["rs".to_string()];
    app.apply_config(config);
    assert_eq!(file_names(&app), vec!["ccc.rs"]);
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_show_error_and_dismiss() {
    let dir = setup_test_dir();
    let mut app = app_in(&dir);
    app.show_error(vec!["bad key".to_string()]);
    assert_eq!(app.error_messages.len(), 1);
    app.dismiss_errors();
    assert!(app.error_messages.is_empty());
    cleanup_test_dir(&dir);
  }

  #[test]
  fn test_execute_editor_suspend_runs_command() {
    let dir = setup_test_dir();
    let action = SuspendAction::Editor { editor: "true".into(), file: dir.join("bbb.txt") };
    App::execute_suspend(&action, &dir).unwrap();
    cleanup_test_dir(&dir);
  }
}
