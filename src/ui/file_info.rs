use std::time::SystemTime;

use crate::fs::entry::{Entry, EntryKind};
use crate::fs::properties::{format_age, format_size};
use crate::nav::{NavigationState, Pane};
use crate::ui::{Styles, Surface, fit};

/// Label/value rows for `entry`, most useful first. The pane shows as many
/// as fit.
pub fn info_rows(entry: &Entry, now: SystemTime) -> Vec<(&'static str, String)> {
  let info = &entry.info;
  let age = |t: Option<SystemTime>| t.map(|t| format_age(t, now)).unwrap_or_else(|| "-".into());

  let mut rows = vec![
    ("Name:", entry.name.clone()),
    ("Size:", format_size(info.size)),
    ("Type:", info.kind.label().to_string()),
    ("Permissions:", info.permissions.clone()),
    ("Owner:", info.owner.clone()),
    ("Last Modified:", age(info.modified)),
    ("Git Status:", info.git.label().to_string()),
  ];
  if let Some(target) = &info.symlink_target {
    rows.push(("Symlink Target:", target.clone()));
  }
  if info.kind == EntryKind::RegularFile {
    let exec = if info.is_executable { "yes" } else { "no" };
    rows.push(("Executable:", exec.to_string()));
  }
  if let Some(mount) = &info.mount_point {
    rows.push(("Mount Point:", mount.clone()));
  }
  rows.push(("SELinux Context:", info.selinux.clone().unwrap_or_else(|| "N/A".into())));
  rows.push(("Last Accessed:", age(info.accessed)));
  rows.push(("Changed:", age(info.changed)));
  rows.push(("Inode:", info.inode.to_string()));
  rows.push(("Hard Links:", info.hard_links.to_string()));
  rows
}

pub fn render_file_info(
  surface: &mut impl Surface,
  state: &NavigationState,
  styles: &Styles,
  now: SystemTime,
) {
  let Some(entry) = state.info_target() else { return };
  let rect = state.geometry().rect(Pane::FileInfo);
  let x = rect.x + 3;
  let max_width = rect.width.saturating_sub(4) as usize;
  let max_rows = rect.height.saturating_sub(2) as usize;

  for (i, (label, value)) in info_rows(entry, now).into_iter().take(max_rows).enumerate() {
    let y = rect.y + 1 + i as u16;
    let label_width = label.len() + 1;
    let Some(value_width) = max_width.checked_sub(label_width).filter(|w| *w > 0) else {
      continue;
    };
    surface.draw_text(x, y, label, styles.label);
    surface.draw_text(x + label_width as u16, y, &fit(&value, value_width), styles.value);
  }
}
