use std::time::SystemTime;

/// One directory entry as shown in the Directories or Files pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  pub name: String,
  pub info: EntryInfo,
}

impl Entry {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), info: EntryInfo::default() }
  }

  pub fn with_info(name: impl Into<String>, info: EntryInfo) -> Self {
    Self { name: name.into(), info }
  }

  pub fn is_hidden(&self) -> bool {
    self.name.starts_with('.')
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryKind {
  RegularFile,
  Directory,
  Symlink,
  NamedPipe,
  Socket,
  Device,
  #[default]
  Unknown,
}

impl EntryKind {
  pub fn label(self) -> &'static str {
    match self {
      EntryKind::RegularFile => "Regular File",
      EntryKind::Directory => "Directory",
      EntryKind::Symlink => "Symlink",
      EntryKind::NamedPipe => "Named Pipe",
      EntryKind::Socket => "Socket",
      EntryKind::Device => "Device",
      EntryKind::Unknown => "Unknown",
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GitState {
  /// Directory that is the root of a repository
  Repository,
  NotRepository,
  Clean,
  Modified,
  Untracked,
  #[default]
  Unknown,
}

impl GitState {
  pub fn label(self) -> &'static str {
    match self {
      GitState::Repository => "Git repository",
      GitState::NotRepository => "Not a git repository",
      GitState::Clean => "Clean",
      GitState::Modified => "Modified",
      GitState::Untracked => "Untracked",
      GitState::Unknown => "Unknown",
    }
  }
}

/// Display metadata gathered at listing time. Navigation never looks at it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInfo {
  pub kind: EntryKind,
  pub permissions: String,
  pub owner: String,
  pub is_executable: bool,
  pub is_symlink: bool,
  pub symlink_target: Option<String>,
  pub mount_point: Option<String>,
  pub git: GitState,
  pub size: u64,
  pub modified: Option<SystemTime>,
  pub accessed: Option<SystemTime>,
  pub changed: Option<SystemTime>,
  pub inode: u64,
  pub hard_links: u64,
  /// SELinux label, `None` when the file carries none.
  pub selinux: Option<String>,
}
