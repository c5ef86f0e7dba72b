use std::sync::Arc;

use crate::action::Action;
use crate::command::Command;
use crate::fs::entry::Entry;
use crate::nav::catalog::EntryCatalog;
use crate::nav::layout::{Geometry, Pane};
use crate::nav::pane::{FocusState, PaneState};
use crate::nav::search;

/// Inputs to the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  Command(Command),
  Mouse { column: u16, row: u16 },
  Resize(u16, u16),
  Tick,
}

/// Where Escape triggers parent navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapePolicy {
  #[default]
  AlwaysParent,
  DirectoriesPane,
}

impl EscapePolicy {
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "always_parent" => Some(EscapePolicy::AlwaysParent),
      "directories_pane" => Some(EscapePolicy::DirectoriesPane),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
  Rename,
  Move,
  Copy,
  ConfirmDelete,
  RunCommand,
}

impl PromptKind {
  pub fn label(self) -> &'static str {
    match self {
      PromptKind::Rename => "Rename to:",
      PromptKind::Move => "Move to:",
      PromptKind::Copy => "Copy to:",
      PromptKind::ConfirmDelete => "Delete? (y/N)",
      PromptKind::RunCommand => "Run command:",
    }
  }
}

/// Modal input line targeting one file of the Files pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
  pub kind: PromptKind,
  pub target: String,
  pub input: String,
}

impl Prompt {
  fn new(kind: PromptKind, target: String) -> Self {
    let input = if kind == PromptKind::Rename { target.clone() } else { String::new() };
    Self { kind, target, input }
  }

  fn confirm(self) -> Option<Action> {
    let input = self.input.trim();
    if input.is_empty() {
      return None;
    }
    let from = self.target;
    let to = input.to_string();
    match self.kind {
      PromptKind::Rename => Some(Action::RenameFile { from, to }),
      PromptKind::Move => Some(Action::MoveFile { from, to }),
      PromptKind::Copy => Some(Action::CopyFile { from, to }),
      PromptKind::RunCommand => Some(Action::RunCommand { command: to, file: from }),
      PromptKind::ConfirmDelete => None,
    }
  }
}

/// Everything the four panes display. Filtered lists and the best match are
/// derived from `catalog` and `query` on demand, never stored.
#[derive(Debug, Clone)]
pub struct NavigationState {
  catalog: Arc<EntryCatalog>,
  query: String,
  panes: [PaneState; 4],
  focus: FocusState,
  geometry: Geometry,
  prompt: Option<Prompt>,
  cursor_visible: bool,
  escape_policy: EscapePolicy,
}

impl Default for NavigationState {
  fn default() -> Self {
    Self::new(EntryCatalog::default(), Geometry::default())
  }
}

impl NavigationState {
  pub fn new(catalog: EntryCatalog, geometry: Geometry) -> Self {
    Self {
      catalog: Arc::new(catalog),
      query: String::new(),
      panes: [PaneState::default(); 4],
      focus: FocusState::default(),
      geometry,
      prompt: None,
      cursor_visible: true,
      escape_policy: EscapePolicy::default(),
    }
  }

  pub fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
    self.escape_policy = policy;
    self
  }

  pub fn set_escape_policy(&mut self, policy: EscapePolicy) {
    self.escape_policy = policy;
  }

  /// Install a fresh directory snapshot. Query, selections and focus start
  /// over.
  pub fn replace_catalog(&mut self, catalog: EntryCatalog) {
    self.catalog = Arc::new(catalog);
    self.reset();
  }

  pub fn catalog(&self) -> &EntryCatalog {
    &self.catalog
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  pub fn focus(&self) -> Pane {
    self.focus.current()
  }

  pub fn pane(&self, pane: Pane) -> PaneState {
    self.panes[pane.index()]
  }

  pub fn geometry(&self) -> Geometry {
    self.geometry
  }

  pub fn prompt(&self) -> Option<&Prompt> {
    self.prompt.as_ref()
  }

  pub fn cursor_visible(&self) -> bool {
    self.cursor_visible
  }

  pub fn escape_policy(&self) -> EscapePolicy {
    self.escape_policy
  }

  /// Filtered list shown in `pane`; empty for the non-list panes.
  pub fn filtered(&self, pane: Pane) -> Vec<&Entry> {
    match pane {
      Pane::Directories => search::filter(&self.catalog.directories, &self.query),
      Pane::Files => search::filter(&self.catalog.files, &self.query),
      Pane::Search | Pane::FileInfo => Vec::new(),
    }
  }

  pub fn best_match(&self) -> Option<&Entry> {
    search::best_match(&self.catalog.directories, &self.catalog.files, &self.query)
  }

  pub fn selected_entry(&self, pane: Pane) -> Option<&Entry> {
    self.filtered(pane).get(self.pane(pane).selected_index).copied()
  }

  /// Entry described by the File Info pane for the current focus.
  pub fn info_target(&self) -> Option<&Entry> {
    match self.focus() {
      Pane::Directories | Pane::Files => self.selected_entry(self.focus()),
      Pane::Search => self.best_match(),
      Pane::FileInfo => None,
    }
  }

  pub fn apply(&mut self, event: &Event) -> Option<Action> {
    match *event {
      Event::Command(command) => self.apply_command(command),
      Event::Mouse { column, row } => {
        self.click(column, row);
        None
      }
      Event::Resize(width, height) => {
        self.resize(Geometry::from_terminal(width, height));
        None
      }
      Event::Tick => {
        self.cursor_visible = !self.cursor_visible;
        None
      }
    }
  }

  fn apply_command(&mut self, command: Command) -> Option<Action> {
    if self.prompt.is_some() {
      return self.apply_prompt_command(command);
    }

    match command {
      Command::Quit => Some(Action::Quit),
      Command::MoveUp => {
        self.panes[self.focus().index()].move_up();
        None
      }
      Command::MoveDown => {
        let pane = self.focus();
        let len = self.filtered(pane).len();
        let height = self.geometry.visible_height(pane);
        self.panes[pane.index()].move_down(len, height);
        None
      }
      Command::NextPane => {
        self.focus.next();
        None
      }
      Command::PreviousPane => {
        self.focus.previous();
        None
      }
      Command::TypeChar(c) => {
        if self.focus() == Pane::Search {
          self.query.push(c);
          self.clamp_lists();
        }
        None
      }
      Command::Backspace => {
        if self.focus() == Pane::Search && self.query.pop().is_some() {
          self.clamp_lists();
        }
        None
      }
      Command::Escape => match self.escape_policy {
        EscapePolicy::AlwaysParent => Some(self.navigate_parent()),
        EscapePolicy::DirectoriesPane if self.focus() == Pane::Directories => {
          Some(self.navigate_parent())
        }
        EscapePolicy::DirectoriesPane => None,
      },
      Command::Activate => self.activate(),
      Command::Rename => self.open_prompt(PromptKind::Rename),
      Command::Move => self.open_prompt(PromptKind::Move),
      Command::Copy => self.open_prompt(PromptKind::Copy),
      Command::Delete => self.open_prompt(PromptKind::ConfirmDelete),
      Command::RunCommand => self.open_prompt(PromptKind::RunCommand),
      Command::None => None,
    }
  }

  fn apply_prompt_command(&mut self, command: Command) -> Option<Action> {
    let prompt = self.prompt.as_mut()?;
    match command {
      Command::Quit => Some(Action::Quit),
      Command::Escape => {
        self.prompt = None;
        None
      }
      Command::TypeChar(c) if prompt.kind == PromptKind::ConfirmDelete => {
        let prompt = self.prompt.take()?;
        matches!(c, 'y' | 'Y').then_some(Action::DeleteFile { name: prompt.target })
      }
      Command::TypeChar(c) => {
        prompt.input.push(c);
        None
      }
      Command::Backspace => {
        prompt.input.pop();
        None
      }
      Command::Activate => self.prompt.take()?.confirm(),
      _ => None,
    }
  }

  fn open_prompt(&mut self, kind: PromptKind) -> Option<Action> {
    if self.focus() != Pane::Files {
      return None;
    }
    let target = self.selected_entry(Pane::Files)?.name.clone();
    self.prompt = Some(Prompt::new(kind, target));
    None
  }

  fn activate(&mut self) -> Option<Action> {
    match self.focus() {
      Pane::Search if self.query == ".." => Some(self.navigate_parent()),
      Pane::Search => self.best_match().map(|e| Action::OpenOrInspect(e.name.clone())),
      Pane::Directories => self
        .selected_entry(Pane::Directories)
        .map(|e| Action::ChangeDirectory(e.name.clone())),
      Pane::Files => self.selected_entry(Pane::Files).map(|e| Action::OpenFile(e.name.clone())),
      Pane::FileInfo => None,
    }
  }

  /// Resets before the host has listed the parent. A host that cannot enter
  /// it keeps the state it had before the event.
  fn navigate_parent(&mut self) -> Action {
    self.reset();
    Action::NavigateParent
  }

  fn reset(&mut self) {
    self.query.clear();
    self.panes = [PaneState::default(); 4];
    self.focus = FocusState::default();
    self.prompt = None;
  }

  fn clamp_lists(&mut self) {
    for pane in [Pane::Directories, Pane::Files] {
      let len = self.filtered(pane).len();
      self.panes[pane.index()].clamp(len);
    }
  }

  fn click(&mut self, column: u16, row: u16) {
    if self.prompt.is_some() {
      return;
    }
    let Some(pane) = self.geometry.pane_at(column, row) else { return };
    self.focus.set(pane);
    if !pane.is_list() {
      return;
    }

    // First list row sits just under the top border
    let top = self.geometry.rect(pane).y + 1;
    if row < top {
      return;
    }
    let offset = (row - top) as usize;
    if offset >= self.geometry.list_rows(pane) {
      return;
    }
    let index = self.panes[pane.index()].scroll_offset + offset;
    if index < self.filtered(pane).len() {
      self.panes[pane.index()].selected_index = index;
    }
  }

  fn resize(&mut self, geometry: Geometry) {
    self.geometry = geometry;
    for pane in [Pane::Directories, Pane::Files] {
      let rows = geometry.list_rows(pane);
      self.panes[pane.index()].ensure_visible(rows);
    }
  }
}

/// Pure transition: the input state is left untouched.
pub fn handle_event(state: &NavigationState, event: &Event) -> (NavigationState, Option<Action>) {
  let mut next = state.clone();
  let action = next.apply(event);
  (next, action)
}
