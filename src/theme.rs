use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
  pub text: Color,
  pub border: Color,
  pub highlight: Color,
  pub command: Color,
  pub blinking: Color,
  pub label: Color,
  pub value: Color,
  pub focused: Color,
  pub error: Color,
}

impl Theme {
  pub fn dark() -> Self {
    Self {
      text: Color::Indexed(252),
      border: Color::Indexed(37),
      highlight: Color::Indexed(75),
      command: Color::Indexed(214),
      blinking: Color::Indexed(114),
      label: Color::Indexed(245),
      value: Color::Indexed(252),
      focused: Color::Indexed(208),
      error: Color::Indexed(167),
    }
  }

  pub fn light() -> Self {
    Self {
      text: Color::Indexed(235),
      border: Color::Indexed(30),
      highlight: Color::Indexed(27),
      command: Color::Indexed(172),
      blinking: Color::Indexed(28),
      label: Color::Indexed(243),
      value: Color::Indexed(235),
      focused: Color::Indexed(166),
      error: Color::Indexed(124),
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "dark" => Some(Self::dark()),
      "light" => Some(Self::light()),
      _ => None,
    }
  }

  /// Override one named slot. Returns false for an unknown slot.
  pub fn set(&mut self, slot: &str, color: Color) -> bool {
    let target = match slot {
      "text" => &mut self.text,
      "border" => &mut self.border,
      "highlight" => &mut self.highlight,
      "command" => &mut self.command,
      "blinking" => &mut self.blinking,
      "label" => &mut self.label,
      "value" => &mut self.value,
      "focused" => &mut self.focused,
      "error" => &mut self.error,
      _ => return false,
    };
    *target = color;
    true
  }
}

impl Default for Theme {
  fn default() -> Self {
    Self::dark()
  }
}

/// Named colors (`teal`, `lightblue`), `#rrggbb`, or a 0-255 palette index.
pub fn parse_color(s: &str) -> Option<Color> {
  match s.trim().to_lowercase().as_str() {
    "" => None,
    "teal" => Some(Color::Cyan),
    "purple" => Some(Color::Magenta),
    "orange" => Some(Color::Indexed(208)),
    other => other.parse::<Color>().ok(),
  }
}
