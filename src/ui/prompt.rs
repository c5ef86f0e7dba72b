use unicode_width::UnicodeWidthStr;

use crate::nav::{Prompt, PromptKind};
use crate::ui::{Styles, Surface, fit};

/// Centered input box over the panes, half the screen wide.
pub fn render_prompt(
  surface: &mut impl Surface,
  prompt: &Prompt,
  cursor_visible: bool,
  styles: &Styles,
) {
  let (width, height) = surface.size();
  let box_width = width / 2;
  let box_height = (height / 4).max(5);
  if box_width < 10 || height < box_height {
    return;
  }
  let x = (width - box_width) / 2;
  let y = (height - box_height) / 2;
  let inner = box_width.saturating_sub(4) as usize;

  let blank = " ".repeat(box_width.saturating_sub(2) as usize);
  for row in y + 1..y + box_height - 1 {
    surface.draw_text(x + 1, row, &blank, styles.text);
  }
  surface.draw_box(x, y, box_width, box_height, styles.focused);

  let label = prompt.kind.label();
  surface.draw_text(x + 2, y + 1, label, styles.label);
  let target_width = inner.saturating_sub(label.width() + 1);
  if target_width > 0 {
    let target_x = x + 3 + label.width() as u16;
    surface.draw_text(target_x, y + 1, &fit(&prompt.target, target_width), styles.value);
  }

  if prompt.kind == PromptKind::ConfirmDelete {
    return;
  }
  let mut shown = prompt.input.as_str();
  while shown.width() + 1 > inner {
    let mut chars = shown.chars();
    chars.next();
    shown = chars.as_str();
  }
  surface.draw_text(x + 2, y + 2, shown, styles.text);
  if cursor_visible {
    surface.draw_text(x + 2 + shown.width() as u16, y + 2, "_", styles.blinking);
  }
}
