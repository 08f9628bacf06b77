//! Shared DTOs (schemas-as-code) for the usefix workspace.
//!
//! # Design constraints
//! - These types cross the boundary to the module-file editor and the diagnostic sink.
//! - Command text and warning text are a user-facing contract; keep them stable.
//! - Values are immutable once built; usages recompute their derived flags on load.

pub mod command;
pub mod evaluation;
pub mod fixup;
pub mod usage;

/// Schema identifiers.
pub mod schema {
    pub const USEFIX_EVALUATION_V1: &str = "usefix.evaluation.v1";
    pub const USEFIX_FIXUP_V1: &str = "usefix.fixup.v1";
}

pub use command::{ModuleFileCommands, UseRepoAction, UseRepoCommand};
pub use evaluation::ExtensionEvaluation;
pub use fixup::{Event, Fixup, Severity};
pub use usage::{Location, ModuleExtensionUsage, UsageProxy};
