use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of a command as reported by the shell-execution collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Init,
    Success,
    Failure,
    Error,
    Prompt,
}

impl Status {
    /// Text shown in the status line.
    pub fn label(self) -> &'static str {
        match self {
            Status::Init => "Initialized",
            Status::Success => "Success!",
            Status::Failure => "Failure!",
            Status::Error => "Error!",
            Status::Prompt => "Select option:",
        }
    }

    /// Palette key the status line is painted with.
    pub fn style_key(self) -> &'static str {
        match self {
            Status::Init => "init",
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Error => "error",
            Status::Prompt => "prompt",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable record of one completed command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: String,
    pub command: String,
    pub status: Status,
    pub description: String,
    pub presentation: String,
    pub working_dir: PathBuf,
}

impl Snapshot {
    /// Build a snapshot; description and presentation lose surrounding newlines.
    pub fn new(
        mode: impl Into<String>,
        command: impl Into<String>,
        status: Status,
        description: &str,
        presentation: &str,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mode: mode.into(),
            command: command.into(),
            status,
            description: description.trim_matches('\n').to_string(),
            presentation: presentation.trim_matches('\n').to_string(),
            working_dir: working_dir.into(),
        }
    }

    /// Last component of the working directory (`""` for a root path).
    pub fn directory(&self) -> &str {
        self.working_dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    pub fn parent_directory(&self) -> &Path {
        self.working_dir.parent().unwrap_or(Path::new(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_newlines_only() {
        let s = Snapshot::new("def", "ls", Status::Success, "\n ok \n", "a\nb\n\n", "/tmp/x");
        assert_eq!(s.description, " ok ");
        assert_eq!(s.presentation, "a\nb");
    }

    #[test]
    fn directory_parts() {
        let s = Snapshot::new("def", "", Status::Init, "", "", "/home/user/project");
        assert_eq!(s.directory(), "project");
        assert_eq!(s.parent_directory(), Path::new("/home/user"));
        let root = Snapshot::new("def", "", Status::Init, "", "", "/");
        assert_eq!(root.directory(), "");
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::Prompt.label(), "Select option:");
        assert_eq!(Status::Failure.to_string(), "Failure!");
        assert_eq!(Status::Error.style_key(), "error");
    }
}
