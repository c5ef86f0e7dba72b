use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Send `log` records to `path`. The terminal belongs to the UI, so nothing
/// is ever written to stderr.
pub fn init(level: LevelFilter, path: &Path) -> Result<()> {
  if level == LevelFilter::Off {
    return Ok(());
  }
  let file = open_log_file(path)?;
  let config = ConfigBuilder::new().set_time_format_rfc3339().build();
  WriteLogger::init(level, config, file).context("logger already initialized")?;
  Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_open_log_file_creates_parents_and_appends() {
    let dir = std::env::temp_dir().join(format!("lds_log_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("lds.log");

    writeln!(open_log_file(&path).unwrap(), "first").unwrap();
    writeln!(open_log_file(&path).unwrap(), "second").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");

    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_off_level_skips_logger() {
    let path = Path::new("/nonexistent/dir/lds.log");
    assert!(init(LevelFilter::Off, path).is_ok());
  }
}
