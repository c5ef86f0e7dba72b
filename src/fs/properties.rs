use std::fs::{self, Metadata};
use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::fs::entry::{EntryInfo, EntryKind, GitState};
use crate::git::GitStatusMap;

/// Facts shared by every entry of one directory, looked up once per listing.
#[derive(Debug, Default)]
pub struct DirContext {
  dev: u64,
  mount_point: Option<String>,
  git: Option<GitStatusMap>,
}

impl DirContext {
  pub fn new(dir: &Path) -> Self {
    Self {
      dev: fs::metadata(dir).map(|m| m.dev()).unwrap_or(0),
      mount_point: find_mount_point(dir).map(|p| p.to_string_lossy().to_string()),
      git: GitStatusMap::load(dir),
    }
  }
}

/// Gather display metadata for `path` without following a final symlink.
pub fn collect(path: &Path, ctx: &DirContext) -> Option<EntryInfo> {
  let meta = fs::symlink_metadata(path).ok()?;
  let is_symlink = meta.file_type().is_symlink();
  let symlink_target = is_symlink.then(|| {
    fs::read_link(path)
      .map(|t| t.to_string_lossy().to_string())
      .unwrap_or_else(|_| "unknown".to_string())
  });
  let mode = meta.permissions().mode();

  let git = if meta.is_dir() {
    if path.join(".git").exists() { GitState::Repository } else { GitState::NotRepository }
  } else {
    ctx.git.as_ref().map_or(GitState::NotRepository, |g| g.state_of(path))
  };

  // An entry on another device is itself the mount point
  let mount_point = if meta.dev() != ctx.dev {
    Some(path.to_string_lossy().to_string())
  } else {
    ctx.mount_point.clone()
  };

  Some(EntryInfo {
    kind: entry_kind(&meta),
    permissions: format_rwx(mode),
    owner: format!("{}:{}", resolve_user(meta.uid()), resolve_group(meta.gid())),
    is_executable: mode & 0o111 != 0,
    is_symlink,
    symlink_target,
    mount_point,
    git,
    size: meta.len(),
    modified: meta.modified().ok(),
    accessed: meta.accessed().ok(),
    changed: u64::try_from(meta.ctime()).ok().map(|secs| UNIX_EPOCH + Duration::from_secs(secs)),
    inode: meta.ino(),
    hard_links: meta.nlink(),
    selinux: read_label(path, SELINUX_XATTR),
  })
}

const SELINUX_XATTR: &str = "security.selinux";

/// Text value of an extended attribute. Absent attributes and filesystems
/// without xattr support both give `None`.
fn read_label(path: &Path, name: &str) -> Option<String> {
  let raw = match xattr::get(path, name) {
    Ok(raw) => raw?,
    Err(e) => {
      log::trace!("{name} unreadable on {}: {e}", path.display());
      return None;
    }
  };
  let label = String::from_utf8_lossy(&raw).trim_end_matches('\0').to_string();
  (!label.is_empty()).then_some(label)
}

fn entry_kind(meta: &Metadata) -> EntryKind {
  let ft = meta.file_type();
  if ft.is_file() {
    EntryKind::RegularFile
  } else if ft.is_dir() {
    EntryKind::Directory
  } else if ft.is_symlink() {
    EntryKind::Symlink
  } else if ft.is_fifo() {
    EntryKind::NamedPipe
  } else if ft.is_socket() {
    EntryKind::Socket
  } else if ft.is_block_device() || ft.is_char_device() {
    EntryKind::Device
  } else {
    EntryKind::Unknown
  }
}

/// Walk up from `path` while the device id stays the same.
pub fn find_mount_point(path: &Path) -> Option<PathBuf> {
  let path = fs::canonicalize(path).ok()?;
  let dev = fs::metadata(&path).ok()?.dev();
  let mut current = path.as_path();
  while let Some(parent) = current.parent() {
    match fs::metadata(parent) {
      Ok(meta) if meta.dev() == dev => current = parent,
      _ => break,
    }
  }
  Some(current.to_path_buf())
}

pub fn format_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;
  const GB: u64 = MB * 1024;
  const TB: u64 = GB * 1024;

  match bytes {
    b if b >= TB => format!("{:.2} TB", b as f64 / TB as f64),
    b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
    b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
    b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
    b => format!("{b} B"),
  }
}

/// `ls -l` style mode string, file type character first.
pub fn format_rwx(mode: u32) -> String {
  let kind = match mode & 0o170000 {
    0o120000 => 'l',
    0o040000 => 'd',
    0o100000 => '-',
    0o010000 => 'p',
    0o140000 => 's',
    0o020000 => 'c',
    0o060000 => 'b',
    _ => '?',
  };

  let triplet = |shift: u32, special: u32, set: char| -> [char; 3] {
    let bits = (mode >> shift) & 0o7;
    let exec = match (bits & 0o1 != 0, mode & special != 0) {
      (true, true) => set,
      (false, true) => set.to_ascii_uppercase(),
      (true, false) => 'x',
      (false, false) => '-',
    };
    [
      if bits & 0o4 != 0 { 'r' } else { '-' },
      if bits & 0o2 != 0 { 'w' } else { '-' },
      exec,
    ]
  };

  let mut result = String::with_capacity(10);
  result.push(kind);
  result.extend(triplet(6, 0o4000, 's'));
  result.extend(triplet(3, 0o2000, 's'));
  result.extend(triplet(0, 0o1000, 't'));
  result
}

/// Coarse age of `time` relative to `now`: hours, days, 30-day months or
/// 365-day years.
pub fn format_age(time: SystemTime, now: SystemTime) -> String {
  let hours = now.duration_since(time).unwrap_or_default().as_secs() / 3600;
  if hours < 24 {
    format!("{hours} hours ago")
  } else if hours < 24 * 30 {
    format!("{} days ago", hours / 24)
  } else if hours < 24 * 365 {
    format!("{} months ago", hours / (24 * 30))
  } else {
    format!("{} years ago", hours / (24 * 365))
  }
}

fn resolve_user(uid: u32) -> String {
  users::get_user_by_uid(uid)
    .map(|u| u.name().to_string_lossy().to_string())
    .unwrap_or_else(|| uid.to_string())
}

fn resolve_group(gid: u32) -> String {
  users::get_group_by_gid(gid)
    .map(|g| g.name().to_string_lossy().to_string())
    .unwrap_or_else(|| gid.to_string())
}
