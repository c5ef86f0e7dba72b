use std::io::Read;
use std::path::{Path, PathBuf};

/// Bytes read from the head of a file for its preview.
const MAX_PREVIEW_BYTES: u64 = 16 * 1024;
const MAX_PREVIEW_LINES: usize = 200;
const TAB: &str = "    ";

/// Head of the file selected in the Files pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
  pub path: PathBuf,
  /// `None` when the file is binary, not a regular file, or unreadable.
  pub lines: Option<Vec<String>>,
}

impl FilePreview {
  pub fn load(path: &Path) -> Self {
    Self { path: path.to_path_buf(), lines: read_lines(path) }
  }
}

fn read_lines(path: &Path) -> Option<Vec<String>> {
  // Opening a fifo would block
  if !path.metadata().ok()?.is_file() {
    return None;
  }
  let mut data = Vec::new();
  let read = std::fs::File::open(path)
    .and_then(|file| file.take(MAX_PREVIEW_BYTES).read_to_end(&mut data));
  if let Err(e) = read {
    log::debug!("no preview for {}: {e}", path.display());
    return None;
  }
  if data.contains(&0) {
    return None;
  }
  let text = String::from_utf8_lossy(&data);
  Some(text.lines().take(MAX_PREVIEW_LINES).map(printable).collect())
}

fn printable(line: &str) -> String {
  let mut out = String::with_capacity(line.len());
  for c in line.chars() {
    if c == '\t' {
      out.push_str(TAB);
    } else if !c.is_control() {
      out.push(c);
    }
  }
  out
}
