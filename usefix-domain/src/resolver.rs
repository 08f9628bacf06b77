use crate::error::{DepCategory, MetadataError};
use crate::metadata::{ExtensionMetadata, UseAllRepos};
use std::collections::BTreeSet;

/// Concrete repositories the root module is expected to import, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedImports {
    regular: BTreeSet<String>,
    dev: BTreeSet<String>,
}

impl ExpectedImports {
    pub fn new(regular: BTreeSet<String>, dev: BTreeSet<String>) -> Self {
        Self { regular, dev }
    }

    /// Combine a declaration with what the extension actually generated.
    ///
    /// `Ok(None)` means the extension expressed no opinion.
    pub fn resolve(
        metadata: &ExtensionMetadata,
        all_repos: &BTreeSet<String>,
    ) -> Result<Option<Self>, MetadataError> {
        // Dev first: when both lists name unknown repositories, the dev list is reported.
        let dev = resolve_category(metadata, DepCategory::Dev, all_repos)?;
        let regular = resolve_category(metadata, DepCategory::Regular, all_repos)?;

        match (regular, dev) {
            (Some(regular), Some(dev)) => Ok(Some(Self { regular, dev })),
            (None, None) => Ok(None),
            _ => Err(MetadataError::Invariant(
                "expected imports resolved for only one dependency category".to_string(),
            )),
        }
    }

    pub fn regular(&self) -> &BTreeSet<String> {
        &self.regular
    }

    pub fn dev(&self) -> &BTreeSet<String> {
        &self.dev
    }

    pub fn get(&self, category: DepCategory) -> &BTreeSet<String> {
        match category {
            DepCategory::Regular => &self.regular,
            DepCategory::Dev => &self.dev,
        }
    }
}

fn resolve_category(
    metadata: &ExtensionMetadata,
    category: DepCategory,
    all_repos: &BTreeSet<String>,
) -> Result<Option<BTreeSet<String>>, MetadataError> {
    match (metadata.use_all_repos(), category) {
        (UseAllRepos::Regular, DepCategory::Regular) | (UseAllRepos::Dev, DepCategory::Dev) => {
            Ok(Some(all_repos.clone()))
        }
        (UseAllRepos::Regular, DepCategory::Dev) | (UseAllRepos::Dev, DepCategory::Regular) => {
            Ok(Some(BTreeSet::new()))
        }
        (UseAllRepos::No, _) => {
            let Some(explicit) = metadata.explicit(category) else {
                return Ok(None);
            };
            let unknown: Vec<String> = explicit
                .iter()
                .filter(|repo| !all_repos.contains(repo.as_str()))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(MetadataError::UnknownRepositories {
                    category,
                    names: unknown,
                });
            }
            Ok(Some(explicit.iter().cloned().collect()))
        }
    }
}
