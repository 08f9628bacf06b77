use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edit kind understood by the module-file editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseRepoAction {
    Add,
    Remove,
}

impl UseRepoAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UseRepoAction::Add => "use_repo_add",
            UseRepoAction::Remove => "use_repo_remove",
        }
    }
}

impl fmt::Display for UseRepoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `use_repo` edit addressed to one proxy.
///
/// Renders as `<action> <proxy-label> <repo>...` with repositories sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct UseRepoCommand {
    action: UseRepoAction,
    proxy_label: String,
    repos: Vec<String>,
}

impl UseRepoCommand {
    pub fn new<I, S>(action: UseRepoAction, proxy_label: impl Into<String>, repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut repos: Vec<String> = repos.into_iter().map(Into::into).collect();
        repos.sort();
        repos.dedup();
        Self {
            action,
            proxy_label: proxy_label.into(),
            repos,
        }
    }

    pub fn action(&self) -> UseRepoAction {
        self.action
    }

    pub fn proxy_label(&self) -> &str {
        &self.proxy_label
    }

    pub fn repos(&self) -> &[String] {
        &self.repos
    }
}

impl fmt::Display for UseRepoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.proxy_label)?;
        for repo in &self.repos {
            write!(f, " {}", repo)?;
        }
        Ok(())
    }
}

/// Failure to parse command text back into a [`UseRepoCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError {
    input: String,
    reason: &'static str,
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid use_repo command '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseCommandError {}

impl FromStr for UseRepoCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseCommandError {
            input: s.to_string(),
            reason,
        };

        let mut parts = s.split_whitespace();
        let action = match parts.next() {
            Some("use_repo_add") => UseRepoAction::Add,
            Some("use_repo_remove") => UseRepoAction::Remove,
            Some(_) => return Err(err("unknown action")),
            None => return Err(err("empty command")),
        };
        let proxy_label = parts.next().ok_or_else(|| err("missing proxy label"))?;
        let repos: Vec<&str> = parts.collect();
        if repos.is_empty() {
            return Err(err("no repositories"));
        }

        Ok(UseRepoCommand::new(action, proxy_label, repos))
    }
}

impl From<UseRepoCommand> for String {
    fn from(cmd: UseRepoCommand) -> Self {
        cmd.to_string()
    }
}

impl TryFrom<String> for UseRepoCommand {
    type Error = ParseCommandError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Commands for one module file, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommands {
    pub path: Utf8PathBuf,
    pub commands: Vec<UseRepoCommand>,
}

/// Module file -> commands, keyed in the order files first received a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleFileCommands {
    files: Vec<FileCommands>,
}

impl ModuleFileCommands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl AsRef<Utf8Path>, command: UseRepoCommand) {
        let path = path.as_ref();
        match self.files.iter_mut().find(|f| f.path.as_path() == path) {
            Some(entry) => entry.commands.push(command),
            None => self.files.push(FileCommands {
                path: path.to_path_buf(),
                commands: vec![command],
            }),
        }
    }

    pub fn get(&self, path: impl AsRef<Utf8Path>) -> Option<&[UseRepoCommand]> {
        let path = path.as_ref();
        self.files
            .iter()
            .find(|f| f.path.as_path() == path)
            .map(|f| f.commands.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileCommands> {
        self.files.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Utf8Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    /// Command text per file, as handed to the module-file editor.
    pub fn to_strings(&self, path: impl AsRef<Utf8Path>) -> Vec<String> {
        self.get(path)
            .map(|cmds| cmds.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.iter().map(|f| f.commands.len()).sum()
    }
}
