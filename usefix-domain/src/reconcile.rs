use crate::emit::emit_commands;
use crate::error::{DepCategory, MetadataError};
use crate::resolver::ExpectedImports;
use std::collections::BTreeSet;
use tracing::debug;
use usefix_types::{Event, Fixup, ModuleExtensionUsage};

/// Subcommand users run to apply the generated commands.
pub const TIDY_COMMAND: &str = "bazel mod tidy";

/// The four set differences between expected and actual imports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportDiff {
    pub imports_to_add: BTreeSet<String>,
    pub imports_to_remove: BTreeSet<String>,
    pub dev_imports_to_add: BTreeSet<String>,
    pub dev_imports_to_remove: BTreeSet<String>,
}

impl ImportDiff {
    pub fn is_empty(&self) -> bool {
        self.imports_to_add.is_empty()
            && self.imports_to_remove.is_empty()
            && self.dev_imports_to_add.is_empty()
            && self.dev_imports_to_remove.is_empty()
    }

    pub fn to_add(&self, category: DepCategory) -> &BTreeSet<String> {
        match category {
            DepCategory::Regular => &self.imports_to_add,
            DepCategory::Dev => &self.dev_imports_to_add,
        }
    }

    pub fn to_remove(&self, category: DepCategory) -> &BTreeSet<String> {
        match category {
            DepCategory::Regular => &self.imports_to_remove,
            DepCategory::Dev => &self.dev_imports_to_remove,
        }
    }
}

/// Kinds of mismatch reported in the warning, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MismatchCategory {
    /// Imported but never generated.
    InvalidImports,
    /// Expected as a direct dependency but not imported.
    MissingImports,
    RegularImportsOfDevDeps,
    DevImportsOfRegularDeps,
    /// Imported and generated, but not a direct dependency.
    IndirectDepImports,
}

impl MismatchCategory {
    pub const ALL: [MismatchCategory; 5] = [
        MismatchCategory::InvalidImports,
        MismatchCategory::MissingImports,
        MismatchCategory::RegularImportsOfDevDeps,
        MismatchCategory::DevImportsOfRegularDeps,
        MismatchCategory::IndirectDepImports,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            MismatchCategory::InvalidImports => {
                "Imported, but not created by the extension (will cause the build to fail)"
            }
            MismatchCategory::MissingImports => {
                "Not imported, but reported as direct dependencies by the extension (may cause the build to fail)"
            }
            MismatchCategory::RegularImportsOfDevDeps => {
                "Imported as a regular dependency, but reported as a dev dependency by the extension (may cause the build to fail when used by other modules)"
            }
            MismatchCategory::DevImportsOfRegularDeps => {
                "Imported as a dev dependency, but reported as a regular dependency by the extension (may cause the build to fail when used by other modules)"
            }
            MismatchCategory::IndirectDepImports => {
                "Imported, but reported as indirect dependencies by the extension"
            }
        }
    }
}

/// Expected vs. actual imports of one extension in the root module.
#[derive(Debug, Clone)]
pub struct Reconciliation<'a> {
    usage: &'a ModuleExtensionUsage,
    all_repos: &'a BTreeSet<String>,
    expected: ExpectedImports,
    actual_regular: BTreeSet<String>,
    actual_dev: BTreeSet<String>,
    diff: ImportDiff,
}

impl<'a> Reconciliation<'a> {
    /// Fails if the extension expects imports in a category the root module never
    /// declares a usage for.
    pub fn new(
        usage: &'a ModuleExtensionUsage,
        all_repos: &'a BTreeSet<String>,
        expected: ExpectedImports,
    ) -> Result<Self, MetadataError> {
        if !usage.has_non_dev_use_extension() && !expected.regular().is_empty() {
            return Err(MetadataError::PolicyViolation {
                category: DepCategory::Regular,
            });
        }
        if !usage.has_dev_use_extension() && !expected.dev().is_empty() {
            return Err(MetadataError::PolicyViolation {
                category: DepCategory::Dev,
            });
        }

        let actual_regular = actual_imports(usage, DepCategory::Regular);
        let actual_dev = actual_imports(usage, DepCategory::Dev);

        let diff = ImportDiff {
            imports_to_add: difference(expected.regular(), &actual_regular),
            imports_to_remove: difference(&actual_regular, expected.regular()),
            dev_imports_to_add: difference(expected.dev(), &actual_dev),
            dev_imports_to_remove: difference(&actual_dev, expected.dev()),
        };

        debug!(
            extension = usage.extension_name(),
            add = diff.imports_to_add.len(),
            remove = diff.imports_to_remove.len(),
            dev_add = diff.dev_imports_to_add.len(),
            dev_remove = diff.dev_imports_to_remove.len(),
            "reconciled use_repo imports"
        );

        Ok(Self {
            usage,
            all_repos,
            expected,
            actual_regular,
            actual_dev,
            diff,
        })
    }

    pub fn diff(&self) -> &ImportDiff {
        &self.diff
    }

    pub fn actual_imports(&self, category: DepCategory) -> &BTreeSet<String> {
        match category {
            DepCategory::Regular => &self.actual_regular,
            DepCategory::Dev => &self.actual_dev,
        }
    }

    pub fn expected(&self) -> &ExpectedImports {
        &self.expected
    }

    /// Repositories in one mismatch category (possibly empty).
    pub fn mismatch(&self, category: MismatchCategory) -> BTreeSet<String> {
        let all_actual = union(&self.actual_regular, &self.actual_dev);
        let all_expected = union(self.expected.regular(), self.expected.dev());

        match category {
            MismatchCategory::InvalidImports => difference(&all_actual, self.all_repos),
            MismatchCategory::MissingImports => difference(&all_expected, &all_actual),
            MismatchCategory::RegularImportsOfDevDeps => {
                intersection(self.expected.dev(), &self.actual_regular)
            }
            MismatchCategory::DevImportsOfRegularDeps => {
                intersection(self.expected.regular(), &self.actual_dev)
            }
            MismatchCategory::IndirectDepImports => {
                difference(&intersection(&all_actual, self.all_repos), &all_expected)
            }
        }
    }

    /// Non-empty mismatch categories in reporting order.
    pub fn mismatches(&self) -> Vec<(MismatchCategory, BTreeSet<String>)> {
        MismatchCategory::ALL
            .into_iter()
            .map(|category| (category, self.mismatch(category)))
            .filter(|(_, repos)| !repos.is_empty())
            .collect()
    }

    /// Warning text for the diagnostic sink.
    pub fn message(&self) -> String {
        let mut message = format!(
            "The module extension {} defined in {} reported incorrect imports of repositories via use_repo():\n\n",
            self.usage.extension_name(),
            self.usage.extension_bzl_file()
        );

        for (category, repos) in self.mismatches() {
            let names: Vec<&str> = repos.iter().map(String::as_str).collect();
            message.push_str(&format!(
                "{}:\n    {}\n\n",
                category.heading(),
                names.join(", ")
            ));
        }

        message.push_str(&format!(
            "Fix the use_repo calls by running '{}'.",
            TIDY_COMMAND
        ));
        message
    }

    /// `Ok(None)` when nothing needs to change.
    pub fn into_fixup(self) -> Result<Option<Fixup>, MetadataError> {
        if self.diff.is_empty() {
            return Ok(None);
        }

        let commands = emit_commands(&self.diff, self.usage.proxies())?;
        let first = self.usage.proxies().first().ok_or_else(|| {
            MetadataError::Invariant("fixup requested for a usage without proxies".to_string())
        })?;
        let warning = Event::warn(first.location.clone(), self.message());

        debug!(
            extension = self.usage.extension_name(),
            commands = commands.len(),
            "generated use_repo fixup"
        );

        Ok(Some(Fixup::new(commands, self.usage.clone(), warning)))
    }
}

fn actual_imports(usage: &ModuleExtensionUsage, category: DepCategory) -> BTreeSet<String> {
    usage
        .proxies()
        .iter()
        .filter(|p| p.dev_dependency == category.is_dev())
        .flat_map(|p| p.imported_repos())
        .map(str::to_string)
        .collect()
}

fn difference(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.difference(b).cloned().collect()
}

fn intersection(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.intersection(b).cloned().collect()
}

fn union(a: &BTreeSet<String>, b: &BTreeSet<String>) -> BTreeSet<String> {
    a.union(b).cloned().collect()
}
