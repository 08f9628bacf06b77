use crate::command::ModuleFileCommands;
use crate::usage::{Location, ModuleExtensionUsage};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        })
    }
}

/// A diagnostic for the event sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Event {
    pub fn warn(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            message: message.into(),
        }
    }
}

/// Repair for the root module's `use_repo` calls of one extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixup {
    pub schema: String,

    /// Edits for the module-file editor, grouped by file.
    pub commands: ModuleFileCommands,

    /// The usage the commands apply to.
    pub usage: ModuleExtensionUsage,

    pub warning: Event,
}

impl Fixup {
    pub fn new(commands: ModuleFileCommands, usage: ModuleExtensionUsage, warning: Event) -> Self {
        Self {
            schema: crate::schema::USEFIX_FIXUP_V1.to_string(),
            commands,
            usage,
            warning,
        }
    }
}
