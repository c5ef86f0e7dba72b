use std::collections::HashMap;
use std::path::{Path, PathBuf};

use git2::{Repository, Status, StatusOptions};

use crate::fs::entry::GitState;

/// Working-tree status of every changed file in the repository containing a
/// directory. Files absent from the map are clean unless they sit under an
/// untracked directory, which git reports as a single entry.
pub struct GitStatusMap {
  root: PathBuf,
  states: HashMap<PathBuf, GitState>,
}

impl std::fmt::Debug for GitStatusMap {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GitStatusMap")
      .field("root", &self.root)
      .field("changed", &self.states.len())
      .finish()
  }
}

impl GitStatusMap {
  /// `None` when `dir` is not inside a work tree.
  pub fn load(dir: &Path) -> Option<Self> {
    let repo = Repository::discover(dir).ok()?;
    let root = repo.workdir()?.to_path_buf();

    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    opts.recurse_untracked_dirs(false);
    opts.include_ignored(false);

    let statuses = match repo.statuses(Some(&mut opts)) {
      Ok(s) => s,
      Err(e) => {
        log::debug!("git status failed in {}: {e}", root.display());
        return Some(Self { root, states: HashMap::new() });
      }
    };

    let mut states = HashMap::new();
    for entry in statuses.iter() {
      let Some(rel) = entry.path() else { continue };
      states.insert(root.join(rel), convert_status(entry.status()));
    }

    Some(Self { root, states })
  }

  pub fn state_of(&self, path: &Path) -> GitState {
    if !path.starts_with(&self.root) {
      return GitState::NotRepository;
    }
    if let Some(state) = self.states.get(path) {
      return *state;
    }
    let under_untracked = path
      .ancestors()
      .skip(1)
      .take_while(|dir| *dir != self.root && dir.starts_with(&self.root))
      .any(|dir| self.states.get(dir) == Some(&GitState::Untracked));
    if under_untracked { GitState::Untracked } else { GitState::Clean }
  }
}

fn convert_status(status: Status) -> GitState {
  if status.is_wt_new() && !status.is_index_new() {
    GitState::Untracked
  } else if status.is_empty() || status == Status::IGNORED {
    GitState::Clean
  } else {
    GitState::Modified
  }
}
