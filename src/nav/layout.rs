//! Four-pane geometry: which pane covers which cells, and how many rows of a
//! pane's list are on screen.

/// Rows of each pane taken by its border and title instead of list entries.
pub const CHROME_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
  Directories,
  Files,
  Search,
  FileInfo,
}

impl Pane {
  pub const ALL: [Pane; 4] = [Pane::Directories, Pane::Files, Pane::Search, Pane::FileInfo];

  pub fn index(self) -> usize {
    match self {
      Pane::Directories => 0,
      Pane::Files => 1,
      Pane::Search => 2,
      Pane::FileInfo => 3,
    }
  }

  pub fn from_index(index: usize) -> Pane {
    Self::ALL[index % Self::ALL.len()]
  }

  pub fn next(self) -> Pane {
    Self::from_index(self.index() + 1)
  }

  pub fn previous(self) -> Pane {
    Self::from_index(self.index() + Self::ALL.len() - 1)
  }

  pub fn title(self) -> &'static str {
    match self {
      Pane::Directories => "Directories",
      Pane::Files => "Files",
      Pane::Search => "Search",
      Pane::FileInfo => "File Info",
    }
  }

  /// Panes 0 and 1 show a selectable list; the others never do.
  pub fn is_list(self) -> bool {
    matches!(self, Pane::Directories | Pane::Files)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneRect {
  pub x: u16,
  pub y: u16,
  pub width: u16,
  pub height: u16,
}

impl PaneRect {
  pub fn contains(&self, column: u16, row: u16) -> bool {
    column >= self.x
      && row >= self.y
      && (column - self.x) < self.width
      && (row - self.y) < self.height
  }
}

/// Terminal split into a tall top row (Directories | Files) and a short
/// bottom row (Search | File Info).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
  pub width: u16,
  pub tall_height: u16,
  pub short_height: u16,
}

impl Default for Geometry {
  fn default() -> Self {
    Self::from_terminal(80, 24)
  }
}

impl Geometry {
  pub fn from_terminal(width: u16, height: u16) -> Self {
    let box_height = height / 2;
    let short_height = box_height / 2;
    Self {
      width,
      tall_height: box_height + short_height,
      short_height,
    }
  }

  pub fn box_width(&self) -> u16 {
    self.width / 2
  }

  pub fn visible_height(&self, pane: Pane) -> usize {
    match pane {
      Pane::Directories | Pane::Files => self.tall_height as usize,
      Pane::Search | Pane::FileInfo => self.short_height as usize,
    }
  }

  /// Number of list rows drawn inside `pane`.
  pub fn list_rows(&self, pane: Pane) -> usize {
    self.visible_height(pane).saturating_sub(CHROME_ROWS)
  }

  pub fn rect(&self, pane: Pane) -> PaneRect {
    let left = self.box_width();
    let right = self.width - left;
    match pane {
      Pane::Directories => PaneRect { x: 0, y: 0, width: left, height: self.tall_height },
      Pane::Files => PaneRect { x: left, y: 0, width: right, height: self.tall_height },
      Pane::Search => PaneRect {
        x: 0,
        y: self.tall_height,
        width: left,
        height: self.short_height,
      },
      Pane::FileInfo => PaneRect {
        x: left,
        y: self.tall_height,
        width: right,
        height: self.short_height,
      },
    }
  }

  pub fn pane_at(&self, column: u16, row: u16) -> Option<Pane> {
    Pane::ALL.into_iter().find(|&pane| self.rect(pane).contains(column, row))
  }
}
