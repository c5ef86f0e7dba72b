use crate::fs::entry::Entry;
use crate::fs::listing::Listing;

/// Snapshot of one directory split into the two list panes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCatalog {
  pub directories: Vec<Entry>,
  pub files: Vec<Entry>,
}

impl EntryCatalog {
  pub fn new(directories: Vec<Entry>, files: Vec<Entry>) -> Self {
    Self { directories, files }
  }

  pub fn is_empty(&self) -> bool {
    self.directories.is_empty() && self.files.is_empty()
  }

  pub fn has_directory(&self, name: &str) -> bool {
    self.directories.iter().any(|e| e.name == name)
  }
}

impl From<Listing> for EntryCatalog {
  /// Hidden files trail the regular ones in the Files pane.
  fn from(listing: Listing) -> Self {
    let Listing { directories, mut files, hidden } = listing;
    files.extend(hidden);
    Self { directories, files }
  }
}
