pub mod error;
pub mod file_info;
pub mod panes;
pub mod prompt;
pub mod status_bar;

use std::time::SystemTime;

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::nav::NavigationState;
use crate::theme::Theme;

/// Minimal drawing capability the renderer needs. Coordinates are absolute
/// terminal cells; anything outside `size()` is clipped.
pub trait Surface {
  fn size(&self) -> (u16, u16);
  fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style);
  fn draw_box(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style);
}

pub struct BufferSurface<'a> {
  buf: &'a mut Buffer,
}

impl<'a> BufferSurface<'a> {
  pub fn new(buf: &'a mut Buffer) -> Self {
    Self { buf }
  }
}

impl Surface for BufferSurface<'_> {
  fn size(&self) -> (u16, u16) {
    (self.buf.area.width, self.buf.area.height)
  }

  fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) {
    let area = self.buf.area;
    if y < area.y || y >= area.bottom() || x < area.x || x >= area.right() {
      return;
    }
    let max_width = (area.right() - x) as usize;
    self.buf.set_stringn(x, y, text, max_width, style);
  }

  fn draw_box(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) {
    let rect = Rect::new(x, y, width, height).intersection(self.buf.area);
    if rect.width < 2 || rect.height < 2 {
      return;
    }
    Block::bordered().border_style(style).render(rect, self.buf);
  }
}

/// Everything one frame shows, borrowed from the host.
pub struct View<'a> {
  pub state: &'a NavigationState,
  pub theme: &'a Theme,
  pub cwd: &'a str,
  pub hints: &'a str,
  /// Out-of-band message and whether it reports a failure.
  pub status: Option<(&'a str, bool)>,
  /// Lines of the file selected in the Files pane.
  pub preview: Option<&'a [String]>,
  pub now: SystemTime,
}

pub struct Styles {
  pub text: Style,
  pub border: Style,
  pub highlight: Style,
  pub command: Style,
  pub blinking: Style,
  pub label: Style,
  pub value: Style,
  pub focused: Style,
  pub error: Style,
}

impl Styles {
  pub fn from_theme(theme: &Theme) -> Self {
    let bold = |c| Style::default().fg(c).add_modifier(Modifier::BOLD);
    Self {
      text: Style::default().fg(theme.text),
      border: Style::default().fg(theme.border),
      highlight: bold(theme.highlight),
      command: bold(theme.command),
      blinking: bold(theme.blinking),
      label: Style::default().fg(theme.label),
      value: bold(theme.value),
      focused: bold(theme.focused),
      error: bold(theme.error),
    }
  }
}

pub fn render(surface: &mut impl Surface, view: &View) {
  let styles = Styles::from_theme(view.theme);
  panes::render_panes(surface, view.state, view.preview, &styles);
  file_info::render_file_info(surface, view.state, &styles, view.now);
  status_bar::render_status_bar(surface, view, &styles);
  if let Some(prompt) = view.state.prompt() {
    prompt::render_prompt(surface, prompt, view.state.cursor_visible(), &styles);
  }
}

pub fn draw(frame: &mut Frame, app: &App) {
  let area = frame.area();
  let cwd = app.cwd.to_string_lossy();
  let view = View {
    state: &app.nav,
    theme: &app.config.theme,
    cwd: &cwd,
    hints: &app.hints,
    status: app.status_message.as_ref().map(|s| (s.text.as_str(), s.is_error)),
    preview: app.preview.as_ref().and_then(|p| p.lines.as_deref()),
    now: SystemTime::now(),
  };
  let buf = frame.buffer_mut();
  render(&mut BufferSurface::new(buf), &view);

  if !app.error_messages.is_empty() {
    error::render_error(&app.error_messages, view.theme, area, buf);
  }
}

/// Cut `text` to at most `width` columns, marking the cut with "...".
pub fn fit(text: &str, width: usize) -> String {
  if text.width() <= width {
    return text.to_string();
  }
  if width <= 3 {
    return ".".repeat(width);
  }
  let mut out = String::new();
  let mut used = 0;
  for c in text.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > width - 3 {
      break;
    }
    out.push(c);
    used += w;
  }
  out.push_str("...");
  out
}

#[cfg(test)]
pub(crate) mod test_util {
  use ratatui::buffer::Buffer;
  use ratatui::layout::Rect;

  pub fn buffer(width: u16, height: u16) -> Buffer {
    Buffer::empty(Rect::new(0, 0, width, height))
  }

  pub fn row_text(buf: &Buffer, y: u16) -> String {
    (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
  }

  pub fn screen_text(buf: &Buffer) -> String {
    (0..buf.area.height).map(|y| row_text(buf, y)).collect::<Vec<_>>().join("\n")
  }
}
