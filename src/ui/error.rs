use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::theme::Theme;

/// Popup listing config problems until any key dismisses it.
pub fn render_error(messages: &[String], theme: &Theme, area: Rect, buf: &mut Buffer) {
  let width = 60.min(area.width.saturating_sub(4));
  let inner_width = width.saturating_sub(2) as usize;

  // Rough wrapped height
  let mut line_count: u16 = 0;
  for msg in messages {
    line_count += ((msg.len() / inner_width.max(1)) as u16) + 1;
  }
  // borders, blank line, hint line
  let height = (line_count + 4).min(area.height.saturating_sub(2));

  if width < 10 || height < 3 {
    return;
  }

  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  let popup = Rect::new(x, y, width, height);

  Clear.render(popup, buf);

  let mut lines: Vec<Line> = messages
    .iter()
    .map(|msg| Line::from(Span::styled(format!(" {msg}"), Style::default().fg(theme.text))))
    .collect();

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    " press any key to dismiss",
    Style::default().fg(theme.label),
  )));

  let block = Block::default()
    .borders(Borders::ALL)
    .title(" Config errors ")
    .border_style(Style::default().fg(theme.error));

  Paragraph::new(lines).block(block).wrap(Wrap { trim: false }).render(popup, buf);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::test_util::*;

  #[test]
  fn test_lists_each_message() {
    let mut buf = buffer(80, 24);
    let messages = vec!["unknown command 'jump'".to_string(), "bad color 'mauve'".to_string()];
    render_error(&messages, &Theme::default(), buf.area, &mut buf);
    let text = screen_text(&buf);
    assert!(text.contains("Config errors"));
    assert!(text.contains("unknown command 'jump'"));
    assert!(text.contains("bad color 'mauve'"));
    assert!(text.contains("press any key to dismiss"));
  }

  #[test]
  fn test_tiny_area_draws_nothing() {
    let mut buf = buffer(8, 3);
    render_error(&["x".to_string()], &Theme::default(), buf.area, &mut buf);
    assert!(screen_text(&buf).trim().is_empty());
  }
}
