use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::fs::entry::Entry;
use crate::fs::properties::{self, DirContext};

#[derive(Debug, Error)]
pub enum ListError {
  #[error("{}: no such directory", .path.display())]
  NotFound { path: PathBuf },
  #[error("{}: permission denied", .path.display())]
  PermissionDenied { path: PathBuf },
  #[error("{}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },
}

impl ListError {
  fn from_io(path: &Path, source: io::Error) -> Self {
    let path = path.to_path_buf();
    match source.kind() {
      io::ErrorKind::NotFound => ListError::NotFound { path },
      io::ErrorKind::PermissionDenied => ListError::PermissionDenied { path },
      _ => ListError::Io { path, source },
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
  pub show_hidden: bool,
  /// Lowercase extensions without the dot; empty keeps every file.
  pub extensions: Vec<String>,
}

impl ListOptions {
  fn keeps_file(&self, name: &str) -> bool {
    if self.extensions.is_empty() {
      return true;
    }
    Path::new(name)
      .extension()
      .map(|ext| ext.to_string_lossy().to_lowercase())
      .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
  }
}

/// One directory read, classified. Each list is sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
  pub directories: Vec<Entry>,
  pub files: Vec<Entry>,
  pub hidden: Vec<Entry>,
}

pub fn list_directory(path: &Path, options: &ListOptions) -> Result<Listing, ListError> {
  let read = std::fs::read_dir(path).map_err(|e| ListError::from_io(path, e))?;
  let ctx = DirContext::new(path);
  let mut listing = Listing::default();

  for dirent in read {
    let dirent = match dirent {
      Ok(d) => d,
      Err(e) => {
        log::debug!("skipping unreadable entry in {}: {e}", path.display());
        continue;
      }
    };
    let name = dirent.file_name().to_string_lossy().to_string();
    let Some(info) = properties::collect(&dirent.path(), &ctx) else { continue };
    let is_dir = dirent.file_type().is_ok_and(|t| t.is_dir());
    let entry = Entry::with_info(name, info);

    if is_dir {
      if options.show_hidden || !entry.is_hidden() {
        listing.directories.push(entry);
      }
    } else if entry.is_hidden() {
      if options.show_hidden {
        listing.hidden.push(entry);
      }
    } else if options.keeps_file(&entry.name) {
      listing.files.push(entry);
    }
  }

  for list in [&mut listing.directories, &mut listing.files, &mut listing.hidden] {
    list.sort_by(|a, b| a.name.cmp(&b.name));
  }

  Ok(listing)
}
