use crate::error::{DepCategory, MetadataError};
use crate::reconcile::ImportDiff;
use std::collections::BTreeSet;
use usefix_types::{ModuleFileCommands, UsageProxy, UseRepoAction, UseRepoCommand};

/// Turn an import diff into per-file `use_repo` edits.
///
/// Additions go to the first proxy (in declaration order) of the matching dev-status.
/// Removals go to every proxy that actually imports one of the repositories to remove.
pub fn emit_commands(
    diff: &ImportDiff,
    proxies: &[UsageProxy],
) -> Result<ModuleFileCommands, MetadataError> {
    let mut commands = ModuleFileCommands::new();

    for category in [DepCategory::Regular, DepCategory::Dev] {
        let to_add = diff.to_add(category);
        if to_add.is_empty() {
            continue;
        }
        let proxy = first_proxy(proxies, category)?;
        commands.push(
            &proxy.containing_module_file_path,
            UseRepoCommand::new(UseRepoAction::Add, proxy.label(), to_add.iter().cloned()),
        );
    }

    for proxy in proxies {
        let to_remove = diff.to_remove(category_of(proxy));
        let repos: BTreeSet<&str> = proxy
            .imported_repos()
            .filter(|repo| to_remove.contains(*repo))
            .collect();
        if repos.is_empty() {
            continue;
        }
        commands.push(
            &proxy.containing_module_file_path,
            UseRepoCommand::new(UseRepoAction::Remove, proxy.label(), repos),
        );
    }

    Ok(commands)
}

fn category_of(proxy: &UsageProxy) -> DepCategory {
    if proxy.dev_dependency {
        DepCategory::Dev
    } else {
        DepCategory::Regular
    }
}

// Existence is guaranteed by the policy check in `Reconciliation::new`.
fn first_proxy(
    proxies: &[UsageProxy],
    category: DepCategory,
) -> Result<&UsageProxy, MetadataError> {
    proxies
        .iter()
        .find(|p| category_of(p) == category)
        .ok_or_else(|| {
            MetadataError::Invariant(format!(
                "no proxy with dev_dependency = {} to add imports to",
                category.is_dev()
            ))
        })
}
