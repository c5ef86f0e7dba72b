/// Side effects requested by the navigation engine. The host performs them;
/// the engine itself never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  OpenFile(String),
  /// Best match from the search pane: a directory is entered, anything else
  /// goes to the editor.
  OpenOrInspect(String),
  ChangeDirectory(String),
  NavigateParent,
  Quit,
  RunCommand { command: String, file: String },
  RenameFile { from: String, to: String },
  MoveFile { from: String, to: String },
  DeleteFile { name: String },
  CopyFile { from: String, to: String },
}
