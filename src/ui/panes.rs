use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::nav::{NavigationState, Pane};
use crate::ui::{Styles, Surface, fit};

/// Column offset of list entries inside a pane.
const NAME_INDENT: u16 = 3;
/// Column offset of previewed file lines.
const PREVIEW_INDENT: u16 = 2;

/// Draw the four boxes and their contents. `preview` holds the head of the
/// selected file; while Files has focus it takes the place of the
/// Directories list.
pub fn render_panes(
  surface: &mut impl Surface,
  state: &NavigationState,
  preview: Option<&[String]>,
  styles: &Styles,
) {
  let geometry = state.geometry();
  for pane in Pane::ALL {
    let rect = geometry.rect(pane);
    let border = if state.focus() == pane { styles.focused } else { styles.border };
    surface.draw_box(rect.x, rect.y, rect.width, rect.height, border);
    surface.draw_text(rect.x + 1, rect.y, pane.title(), styles.text);
  }

  match preview {
    Some(lines) if state.focus() == Pane::Files => render_preview(surface, state, lines, styles),
    _ => render_list(surface, state, Pane::Directories, styles),
  }
  render_list(surface, state, Pane::Files, styles);
  render_search(surface, state, styles);
}

fn render_list(surface: &mut impl Surface, state: &NavigationState, pane: Pane, styles: &Styles) {
  let geometry = state.geometry();
  let rect = geometry.rect(pane);
  let entries = state.filtered(pane);
  let pane_state = state.pane(pane);
  let focused = state.focus() == pane;
  let best = if state.focus() == Pane::Search { state.best_match() } else { None };
  let name_width = rect.width.saturating_sub(NAME_INDENT + 1) as usize;

  let rows = geometry.list_rows(pane);
  for (row, (index, entry)) in entries
    .iter()
    .enumerate()
    .skip(pane_state.scroll_offset)
    .take(rows)
    .enumerate()
  {
    let style = if best.is_some_and(|b| std::ptr::eq(b, *entry)) {
      styles.command
    } else if focused && index == pane_state.selected_index {
      styles.highlight
    } else {
      styles.text
    };
    let y = rect.y + 1 + row as u16;
    surface.draw_text(rect.x + NAME_INDENT, y, &fit(&entry.name, name_width), style);
  }
}

fn render_preview(
  surface: &mut impl Surface,
  state: &NavigationState,
  lines: &[String],
  styles: &Styles,
) {
  let rect = state.geometry().rect(Pane::Directories);
  let rows = rect.height.saturating_sub(2) as usize;
  let columns = rect.width.saturating_sub(4) as usize;
  for (row, line) in lines.iter().take(rows).enumerate() {
    let y = rect.y + 1 + row as u16;
    surface.draw_text(rect.x + PREVIEW_INDENT, y, &clip(line, columns), styles.text);
  }
}

/// Hard cut at `width` columns.
fn clip(text: &str, width: usize) -> String {
  let mut used = 0;
  text
    .chars()
    .take_while(|c| {
      used += c.width().unwrap_or(0);
      used <= width
    })
    .collect()
}

fn render_search(surface: &mut impl Surface, state: &NavigationState, styles: &Styles) {
  let rect = state.geometry().rect(Pane::Search);
  if rect.height < 3 {
    return;
  }
  let y = rect.y + 1;
  let inner = rect.width.saturating_sub(3) as usize;

  // Keep the tail of a long query in view
  let query = state.query();
  let mut shown = query;
  while shown.width() > inner {
    let mut chars = shown.chars();
    chars.next();
    shown = chars.as_str();
  }
  surface.draw_text(rect.x + 1, y, shown, styles.text);

  if state.focus() == Pane::Search && state.cursor_visible() {
    surface.draw_text(rect.x + 1 + shown.width() as u16, y, "_", styles.blinking);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::Command;
  use crate::fs::Entry;
  use crate::nav::{EntryCatalog, Event, Geometry};
  use crate::theme::Theme;
  use crate::ui::BufferSurface;
  use crate::ui::test_util::*;
  use ratatui::style::Modifier;

  fn catalog(dirs: &[&str], files: &[&str]) -> EntryCatalog {
    EntryCatalog::new(
      dirs.iter().map(|n| Entry::new(*n)).collect(),
      files.iter().map(|n| Entry::new(*n)).collect(),
    )
  }

  fn draw(state: &NavigationState, width: u16, height: u16) -> ratatui::buffer::Buffer {
    let mut buf = buffer(width, height);
    let styles = Styles::from_theme(&Theme::default());
    render_panes(&mut BufferSurface::new(&mut buf), state, None, &styles);
    buf
  }

  fn draw_with_preview(state: &NavigationState, lines: &[String]) -> ratatui::buffer::Buffer {
    let mut buf = buffer(40, 16);
    let styles = Styles::from_theme(&Theme::default());
    render_panes(&mut BufferSurface::new(&mut buf), state, Some(lines), &styles);
    buf
  }

  fn send(state: &mut NavigationState, command: Command) {
    state.apply(&Event::Command(command));
  }

  #[test]
  fn test_titles_on_top_borders() {
    let state = NavigationState::new(EntryCatalog::default(), Geometry::from_terminal(40, 16));
    let buf = draw(&state, 40, 16);
    assert!(row_text(&buf, 0).starts_with("┌Directories"));
    assert_eq!(row_text(&buf, 0).chars().skip(20).take(6).collect::<String>(), "┌Files");
    // tall = 8 + 4 = 12
    assert!(row_text(&buf, 12).starts_with("┌Search"));
  }

  #[test]
  fn test_lists_start_under_border_at_indent() {
    let state =
      NavigationState::new(catalog(&["docs", "src"], &["a.txt"]), Geometry::from_terminal(40, 16));
    let buf = draw(&state, 40, 16);
    assert_eq!(buf[(3, 1)].symbol(), "d");
    assert_eq!(buf[(3, 2)].symbol(), "s");
    assert_eq!(buf[(23, 1)].symbol(), "a");
  }

  #[test]
  fn test_focused_border_uses_focused_style() {
    let state = NavigationState::new(EntryCatalog::default(), Geometry::from_terminal(40, 16));
    let buf = draw(&state, 40, 16);
    let theme = Theme::default();
    // Search has focus at start
    assert_eq!(buf[(0, 12)].fg, theme.focused);
    assert_eq!(buf[(0, 0)].fg, theme.border);
  }

  #[test]
  fn test_selected_row_highlighted_only_when_focused() {
    let mut state =
      NavigationState::new(catalog(&[], &["one", "two"]), Geometry::from_terminal(40, 16));
    let theme = Theme::default();

    let buf = draw(&state, 40, 16);
    assert_eq!(buf[(23, 1)].fg, theme.text);

    send(&mut state, Command::NextPane);
    send(&mut state, Command::NextPane);
    send(&mut state, Command::NextPane);
    send(&mut state, Command::MoveDown);
    assert_eq!(state.focus(), Pane::Files);
    let buf = draw(&state, 40, 16);
    assert_eq!(buf[(23, 2)].fg, theme.highlight);
    assert!(buf[(23, 2)].modifier.contains(Modifier::BOLD));
    assert_eq!(buf[(23, 1)].fg, theme.text);
  }

  #[test]
  fn test_best_match_drawn_in_command_style() {
    let mut state =
      NavigationState::new(catalog(&["bandit"], &["banana.txt"]), Geometry::from_terminal(40, 16));
    for c in "ban".chars() {
      send(&mut state, Command::TypeChar(c));
    }
    let buf = draw(&state, 40, 16);
    let theme = Theme::default();
    assert_eq!(buf[(3, 1)].fg, theme.command);
    assert_eq!(buf[(23, 1)].fg, theme.text);
  }

  #[test]
  fn test_scrolled_list_skips_leading_rows() {
    let names: Vec<String> = (0..20).map(|i| format!("f{i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut state = NavigationState::new(catalog(&[], &refs), Geometry::from_terminal(40, 16));
    send(&mut state, Command::PreviousPane);
    for _ in 0..12 {
      send(&mut state, Command::MoveDown);
    }
    let scroll = state.pane(Pane::Files).scroll_offset;
    assert!(scroll > 0);
    let buf = draw(&state, 40, 16);
    let first: String = (23..26).map(|x| buf[(x, 1)].symbol().to_string()).collect();
    assert_eq!(first, format!("f{scroll:02}"));
  }

  #[test]
  fn test_long_names_are_truncated_inside_border() {
    let state = NavigationState::new(
      catalog(&[], &["a_really_long_file_name_that_overflows.txt"]),
      Geometry::from_terminal(40, 16),
    );
    let buf = draw(&state, 40, 16);
    let row = row_text(&buf, 1);
    assert!(row.ends_with("...│"));
  }

  #[test]
  fn test_search_shows_query_and_cursor() {
    let mut state = NavigationState::new(EntryCatalog::default(), Geometry::from_terminal(40, 16));
    send(&mut state, Command::TypeChar('r'));
    send(&mut state, Command::TypeChar('s'));
    let buf = draw(&state, 40, 16);
    assert!(row_text(&buf, 13).starts_with("│rs_"));

    state.apply(&Event::Tick);
    let buf = draw(&state, 40, 16);
    assert!(row_text(&buf, 13).starts_with("│rs "));
  }

  #[test]
  fn test_no_cursor_when_search_unfocused() {
    let mut state = NavigationState::new(EntryCatalog::default(), Geometry::from_terminal(40, 16));
    send(&mut state, Command::NextPane);
    let buf = draw(&state, 40, 16);
    assert!(row_text(&buf, 13).starts_with("│ "));
  }

  #[test]
  fn test_preview_replaces_directories_while_files_focused() {
    let mut state =
      NavigationState::new(catalog(&["docs"], &["main.rs"]), Geometry::from_terminal(40, 16));
    let lines: Vec<String> = (0..20).map(|i| format!("line {i} of a rather long file")).collect();

    // Search focused: directory list as usual
    let buf = draw_with_preview(&state, &lines);
    assert_eq!(buf[(3, 1)].symbol(), "d");

    send(&mut state, Command::PreviousPane);
    let buf = draw_with_preview(&state, &lines);
    // box_width 20 leaves 16 columns, tall 12 leaves 10 rows
    assert_eq!(row_text(&buf, 1), "│ line 0 of a rath ││  main.rs         │");
    assert!(row_text(&buf, 10).starts_with("│ line 9 of a rath "));
    assert!(row_text(&buf, 11).starts_with("└"));
    assert!(!screen_text(&buf).contains("docs"));
  }

  #[test]
  fn test_clip_is_a_hard_cut() {
    assert_eq!(clip("abcdef", 4), "abcd");
    assert_eq!(clip("ab", 4), "ab");
    assert_eq!(clip("日本語", 5), "日本");
  }
}
