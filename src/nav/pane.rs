use crate::nav::layout::{CHROME_ROWS, Pane};

/// Selection and scroll position of one pane. `scroll_offset` never exceeds
/// `selected_index`, and `selected_index` stays below the pane's list length
/// whenever that list is non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaneState {
  pub selected_index: usize,
  pub scroll_offset: usize,
}

impl PaneState {
  pub fn move_up(&mut self) {
    if self.selected_index > 0 {
      self.selected_index -= 1;
      if self.selected_index < self.scroll_offset {
        self.scroll_offset -= 1;
      }
    }
  }

  pub fn move_down(&mut self, len: usize, visible_height: usize) {
    if self.selected_index + 1 < len {
      self.selected_index += 1;
      if self.selected_index >= (self.scroll_offset + visible_height).saturating_sub(CHROME_ROWS) {
        self.scroll_offset += 1;
      }
    }
  }

  /// Pull the selection back inside a list of `len` entries.
  pub fn clamp(&mut self, len: usize) {
    if len == 0 {
      self.reset();
      return;
    }
    self.selected_index = self.selected_index.min(len - 1);
    self.scroll_offset = self.scroll_offset.min(self.selected_index);
  }

  /// Scroll so the selection lands inside a window of `rows` entries.
  pub fn ensure_visible(&mut self, rows: usize) {
    if rows == 0 {
      return;
    }
    if self.selected_index < self.scroll_offset {
      self.scroll_offset = self.selected_index;
    } else if self.selected_index >= self.scroll_offset + rows {
      self.scroll_offset = self.selected_index + 1 - rows;
    }
  }

  pub fn reset(&mut self) {
    *self = Self::default();
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
  current: Pane,
}

impl Default for FocusState {
  fn default() -> Self {
    Self { current: Pane::Search }
  }
}

impl FocusState {
  pub fn current(&self) -> Pane {
    self.current
  }

  pub fn next(&mut self) {
    self.current = self.current.next();
  }

  pub fn previous(&mut self) {
    self.current = self.current.previous();
  }

  pub fn set(&mut self, pane: Pane) {
    self.current = pane;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn at(selected_index: usize, scroll_offset: usize) -> PaneState {
    PaneState { selected_index, scroll_offset }
  }

  #[test]
  fn test_move_up_at_top_is_noop() {
    let mut p = PaneState::default();
    p.move_up();
    assert_eq!(p, at(0, 0));
  }

  #[test]
  fn test_move_up_scrolls_back() {
    let mut p = at(3, 3);
    p.move_up();
    assert_eq!(p, at(2, 2));
  }

  #[test]
  fn test_move_down_stops_at_last_entry() {
    let mut p = at(2, 0);
    p.move_down(3, 20);
    assert_eq!(p, at(2, 0));
  }

  #[test]
  fn test_move_down_on_empty_list() {
    let mut p = PaneState::default();
    p.move_down(0, 20);
    assert_eq!(p, at(0, 0));
  }

  #[test]
  fn test_move_down_scrolls_at_window_edge() {
    // visible_height 8 leaves 5 list rows
    let mut p = PaneState::default();
    for _ in 0..4 {
      p.move_down(10, 8);
    }
    assert_eq!(p, at(4, 0));
    p.move_down(10, 8);
    assert_eq!(p, at(5, 1));
  }

  #[test]
  fn test_move_down_in_pane_smaller_than_chrome() {
    let mut p = PaneState::default();
    p.move_down(5, 2);
    p.move_down(5, 2);
    assert!(p.scroll_offset <= p.selected_index);
    assert_eq!(p.selected_index, 2);
  }

  #[test]
  fn test_clamp() {
    let mut p = at(7, 5);
    p.clamp(3);
    assert_eq!(p, at(2, 2));

    let mut p = at(7, 5);
    p.clamp(0);
    assert_eq!(p, at(0, 0));

    let mut p = at(1, 0);
    p.clamp(10);
    assert_eq!(p, at(1, 0));
  }

  #[test]
  fn test_ensure_visible() {
    let mut p = at(9, 0);
    p.ensure_visible(5);
    assert_eq!(p, at(9, 5));

    let mut p = at(2, 4);
    p.ensure_visible(5);
    assert_eq!(p, at(2, 2));

    let mut p = at(9, 0);
    p.ensure_visible(0);
    assert_eq!(p, at(9, 0));
  }

  #[test]
  fn test_focus_starts_on_search() {
    let mut focus = FocusState::default();
    assert_eq!(focus.current(), Pane::Search);
    focus.next();
    assert_eq!(focus.current(), Pane::FileInfo);
    focus.previous();
    focus.previous();
    assert_eq!(focus.current(), Pane::Files);
  }
}
