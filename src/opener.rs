use std::path::Path;
use std::process::Command;

/// Tried in order when neither the config nor the environment names an
/// editor.
pub const FALLBACK_EDITORS: [&str; 4] = ["nvim", "vim", "nano", "vi"];

pub fn command_exists(cmd: &str) -> bool {
  Command::new("which")
    .arg(cmd)
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .status()
    .map(|s| s.success())
    .unwrap_or(false)
}

/// Editor to launch: `preferred`, then `$VISUAL`, `$EDITOR`, then the first
/// installed fallback.
pub fn resolve_editor(preferred: Option<&str>) -> Option<String> {
  resolve_editor_with(preferred, |key| std::env::var(key).ok(), command_exists)
}

fn resolve_editor_with(
  preferred: Option<&str>,
  env: impl Fn(&str) -> Option<String>,
  exists: impl Fn(&str) -> bool,
) -> Option<String> {
  let non_empty = |s: &String| !s.trim().is_empty();
  preferred
    .map(str::to_string)
    .filter(non_empty)
    .or_else(|| env("VISUAL").filter(non_empty))
    .or_else(|| env("EDITOR").filter(non_empty))
    .or_else(|| FALLBACK_EDITORS.iter().find(|e| exists(e)).map(|e| e.to_string()))
}

#[cfg(not(windows))]
fn quote_arg(arg: &str) -> String {
  format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(windows)]
fn quote_arg(arg: &str) -> String {
  format!("\"{arg}\"")
}

/// `<program> <file>` run through the platform shell, so `program` may carry
/// its own arguments.
pub fn shell_command(program: &str, file: &Path) -> Command {
  let line = format!("{program} {}", quote_arg(&file.to_string_lossy()));
  #[cfg(windows)]
  {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
  }
  #[cfg(not(windows))]
  {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
  }
}
