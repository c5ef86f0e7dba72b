use std::io;
use std::path::{Path, PathBuf};

use crate::config::expand_path;

/// Resolve a typed destination against `cwd`. When it names an existing
/// directory, the source keeps its own name inside it.
pub fn resolve_target(cwd: &Path, source_name: &str, target: &str) -> PathBuf {
  let dest = cwd.join(expand_path(target));
  if dest.is_dir() { dest.join(source_name) } else { dest }
}

fn refuse_existing(dest: &Path) -> io::Result<()> {
  if dest.symlink_metadata().is_ok() {
    return Err(io::Error::new(
      io::ErrorKind::AlreadyExists,
      format!("{} already exists", dest.display()),
    ));
  }
  Ok(())
}

pub fn rename_path(source: &Path, dest: &Path) -> io::Result<()> {
  refuse_existing(dest)?;
  std::fs::rename(source, dest)
}

/// Rename, falling back to copy and delete across filesystems. Any other
/// rename failure is returned untouched.
pub fn move_path(source: &Path, dest: &Path) -> io::Result<()> {
  refuse_existing(dest)?;
  match std::fs::rename(source, dest) {
    Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
      log::debug!("{} is on another filesystem, copying", dest.display());
      copy_path(source, dest)?;
      delete_path(source)
    }
    result => result,
  }
}

/// Copy to `dest`, or to a `_copy` sibling of it when taken. Returns where
/// the copy landed.
pub fn copy_to(source: &Path, dest: &Path) -> io::Result<PathBuf> {
  let dest = unique_dest_path(dest);
  copy_path(source, &dest)?;
  Ok(dest)
}

/// Delete a path (file or directory) permanently. Symlinks are removed, not
/// followed.
pub fn delete_path(path: &Path) -> io::Result<()> {
  if path.symlink_metadata()?.is_dir() {
    std::fs::remove_dir_all(path)
  } else {
    std::fs::remove_file(path)
  }
}

/// First free sibling of `dest`: `dest` itself, then `name_copy.ext`,
/// `name_copy2.ext` and so on.
pub fn unique_dest_path(dest: &Path) -> PathBuf {
  let parent = dest.parent().unwrap_or(Path::new("."));
  let stem = dest.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
  let ext = dest.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();

  std::iter::once(dest.to_path_buf())
    .chain((1u32..).map(|n| {
      let suffix = if n == 1 { "_copy".to_string() } else { format!("_copy{n}") };
      parent.join(format!("{stem}{suffix}{ext}"))
    }))
    .find(|candidate| candidate.symlink_metadata().is_err())
    .unwrap_or_else(|| dest.to_path_buf())
}

/// Copy a file, directory tree or symlink. Links are recreated as links,
/// never followed.
pub fn copy_path(source: &Path, dest: &Path) -> io::Result<()> {
  let file_type = source.symlink_metadata()?.file_type();
  if file_type.is_symlink() {
    std::os::unix::fs::symlink(std::fs::read_link(source)?, dest)
  } else if file_type.is_dir() {
    copy_dir_recursive(source, dest)
  } else {
    std::fs::copy(source, dest)?;
    Ok(())
  }
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<()> {
  std::fs::create_dir_all(dest)?;
  for entry in std::fs::read_dir(source)? {
    let entry = entry?;
    copy_path(&entry.path(), &dest.join(entry.file_name()))?;
  }
  Ok(())
}
