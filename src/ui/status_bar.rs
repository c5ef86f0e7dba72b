use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::command::Command;
use crate::ui::{Styles, Surface, View, fit};

const HINTED: [(Command, &str); 6] = [
  (Command::NextPane, "pane"),
  (Command::Activate, "open"),
  (Command::Escape, "up"),
  (Command::Rename, "rename"),
  (Command::RunCommand, "run"),
  (Command::Quit, "quit"),
];

/// Short "key action" list from the active bindings, e.g.
/// `Tab pane  Enter open  Ctrl+c quit`.
pub fn key_hints(bindings: &HashMap<Command, Vec<String>>) -> String {
  HINTED
    .iter()
    .filter_map(|(command, label)| {
      let key = bindings.get(command)?.first()?;
      Some(format!("{key} {label}"))
    })
    .collect::<Vec<_>>()
    .join("  ")
}

/// One line across the bottom border of the lower panes: the pending status
/// message, or the working directory and key hints.
pub fn render_status_bar(surface: &mut impl Surface, view: &View, styles: &Styles) {
  let geometry = view.state.geometry();
  let bottom = geometry.tall_height + geometry.short_height;
  if bottom == 0 || geometry.width < 6 {
    return;
  }
  let y = bottom - 1;
  let available = geometry.width.saturating_sub(4) as usize;

  if let Some((text, is_error)) = view.status {
    let style = if is_error { styles.error } else { styles.command };
    surface.draw_text(2, y, &format!(" {} ", fit(text, available.saturating_sub(2))), style);
    return;
  }

  let hints_width = view.hints.width() + 2;
  let cwd = format!(" {} ", fit(view.cwd, available.saturating_sub(2)));
  surface.draw_text(2, y, &cwd, styles.text);
  if !view.hints.is_empty() && cwd.width() + hints_width < available {
    let x = geometry.width - 2 - hints_width as u16;
    surface.draw_text(x, y, &format!(" {} ", view.hints), styles.label);
  }
}

#[cfg(test)]
mod tests {
  use std::time::SystemTime;

  use super::*;
  use crate::config::Config;
  use crate::nav::{Geometry, NavigationState};
  use crate::theme::Theme;
  use crate::ui::BufferSurface;
  use crate::ui::test_util::*;

  fn draw(status: Option<(&str, bool)>, hints: &str) -> ratatui::buffer::Buffer {
    let state = NavigationState::new(Default::default(), Geometry::from_terminal(80, 24));
    let theme = Theme::default();
    let view = View {
      state: &state,
      theme: &theme,
      cwd: "/home/user/projects",
      hints,
      status,
      preview: None,
      now: SystemTime::now(),
    };
    let mut buf = buffer(80, 24);
    render_status_bar(&mut BufferSurface::new(&mut buf), &view, &Styles::from_theme(&theme));
    buf
  }

  #[test]
  fn test_key_hints_from_default_config() {
    let hints = key_hints(&Config::default().reverse_lookup());
    assert_eq!(hints, "Tab pane  Enter open  Esc up  Alt+r rename  Alt+x run  Ctrl+c quit");
  }

  #[test]
  fn test_key_hints_skip_unbound() {
    let mut bindings = HashMap::new();
    bindings.insert(Command::Quit, vec!["q".to_string()]);
    assert_eq!(key_hints(&bindings), "q quit");
  }

  #[test]
  fn test_cwd_and_hints_on_bottom_row() {
    let buf = draw(None, "Tab pane");
    let row = row_text(&buf, 23);
    assert!(row.starts_with("   /home/user/projects "));
    assert!(row.trim_end().ends_with("Tab pane"));
  }

  #[test]
  fn test_error_message_replaces_footer() {
    let buf = draw(Some(("nope: no such directory", true)), "Tab pane");
    let row = row_text(&buf, 23);
    assert!(row.contains("nope: no such directory"));
    assert!(!row.contains("Tab pane"));
    assert_eq!(buf[(3, 23)].fg, Theme::default().error);
  }

  #[test]
  fn test_info_message_uses_command_color() {
    let buf = draw(Some(("Copied a.txt", false)), "");
    assert_eq!(buf[(3, 23)].fg, Theme::default().command);
  }
}
