//! Domain logic: turn an extension's declared direct dependencies and the root module's
//! actual `use_repo` imports into a deterministic fixup.
//!
//! This crate owns *what* should change and why. It does not edit module files; the
//! emitted commands are consumed by an external editor.
//!
//! Flow: [`RawDeps`] → [`ExtensionMetadata`] → [`ExpectedImports`] → [`Reconciliation`]
//! → [`Fixup`](usefix_types::Fixup).

mod emit;
mod error;
mod metadata;
mod raw;
mod reconcile;
mod repo_name;
mod resolver;

pub use emit::emit_commands;
pub use error::{DepCategory, ErrorKind, MetadataError};
pub use metadata::{ExtensionMetadata, UseAllRepos};
pub use raw::RawDeps;
pub use reconcile::{ImportDiff, MismatchCategory, Reconciliation, TIDY_COMMAND};
pub use repo_name::validate_user_provided_repo_name;
pub use resolver::ExpectedImports;

use std::collections::BTreeSet;
use usefix_types::{ExtensionEvaluation, Fixup};

/// Run the whole pipeline for one evaluation document.
pub fn check_evaluation(eval: &ExtensionEvaluation) -> Result<Option<Fixup>, MetadataError> {
    let deps = RawDeps::from_json(&eval.root_module_direct_deps);
    let dev_deps = RawDeps::from_json(&eval.root_module_direct_dev_deps);
    let metadata = ExtensionMetadata::from_raw(deps, dev_deps, eval.reproducible)?;
    let generated: &BTreeSet<String> = &eval.generated_repos;
    metadata.generate_fixup(&eval.usage(), generated)
}
