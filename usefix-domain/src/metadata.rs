use crate::error::{DepCategory, MetadataError};
use crate::raw::RawDeps;
use crate::reconcile::Reconciliation;
use crate::repo_name::validate_user_provided_repo_name;
use crate::resolver::ExpectedImports;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;
use usefix_types::{Fixup, ModuleExtensionUsage};

/// Whether the extension claims every generated repository for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseAllRepos {
    #[default]
    No,
    Regular,
    Dev,
}

/// An extension's validated statement of which repositories the root module should
/// import directly.
///
/// Only constructed through [`ExtensionMetadata::from_raw`] (or deserialization, which
/// runs the same checks). Either both explicit lists are present and `use_all_repos` is
/// [`UseAllRepos::No`], or both are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MetadataRepr", into = "MetadataRepr")]
pub struct ExtensionMetadata {
    explicit_root_module_direct_deps: Option<Vec<String>>,
    explicit_root_module_direct_dev_deps: Option<Vec<String>>,
    use_all_repos: UseAllRepos,
    reproducible: bool,
}

impl ExtensionMetadata {
    /// Metadata that expresses no opinion on imports and marks the extension reproducible.
    pub fn reproducible_only() -> Self {
        Self {
            explicit_root_module_direct_deps: None,
            explicit_root_module_direct_dev_deps: None,
            use_all_repos: UseAllRepos::No,
            reproducible: true,
        }
    }

    /// Validate the two loosely typed arguments an extension passes.
    pub fn from_raw(
        deps: RawDeps,
        dev_deps: RawDeps,
        reproducible: bool,
    ) -> Result<Self, MetadataError> {
        if deps.is_unset() && dev_deps.is_unset() {
            return Ok(Self::sentinel(UseAllRepos::No, reproducible));
        }

        // "all" pairs only with an explicit empty list on the other side.
        if deps.is_all() && dev_deps.is_empty_list() {
            return Ok(Self::sentinel(UseAllRepos::Regular, reproducible));
        }
        if dev_deps.is_all() && deps.is_empty_list() {
            return Ok(Self::sentinel(UseAllRepos::Dev, reproducible));
        }
        if deps.is_all() || dev_deps.is_all() {
            return Err(MetadataError::AllWithNonEmptySibling);
        }

        if deps.is_str() || dev_deps.is_str() {
            return Err(MetadataError::UnexpectedString);
        }
        if deps.is_unset() != dev_deps.is_unset() {
            return Err(MetadataError::PartiallySpecified);
        }

        let deps = deps.into_list(DepCategory::Regular)?;
        let dev_deps = dev_deps.into_list(DepCategory::Dev)?;

        let mut regular_seen = BTreeSet::new();
        let mut regular = Vec::with_capacity(deps.len());
        for dep in deps {
            check_repo_name(DepCategory::Regular, &dep)?;
            if !regular_seen.insert(dep.clone()) {
                return Err(MetadataError::DuplicateEntry {
                    category: DepCategory::Regular,
                    name: dep,
                });
            }
            regular.push(dep);
        }

        let mut dev_seen = BTreeSet::new();
        let mut dev = Vec::with_capacity(dev_deps.len());
        for dep in dev_deps {
            check_repo_name(DepCategory::Dev, &dep)?;
            if regular_seen.contains(&dep) {
                return Err(MetadataError::CrossCategoryEntry { name: dep });
            }
            if !dev_seen.insert(dep.clone()) {
                return Err(MetadataError::DuplicateEntry {
                    category: DepCategory::Dev,
                    name: dep,
                });
            }
            dev.push(dep);
        }

        Ok(Self {
            explicit_root_module_direct_deps: Some(regular),
            explicit_root_module_direct_dev_deps: Some(dev),
            use_all_repos: UseAllRepos::No,
            reproducible,
        })
    }

    fn sentinel(use_all_repos: UseAllRepos, reproducible: bool) -> Self {
        Self {
            explicit_root_module_direct_deps: None,
            explicit_root_module_direct_dev_deps: None,
            use_all_repos,
            reproducible,
        }
    }

    /// Explicit regular list, in declaration order.
    pub fn explicit_root_module_direct_deps(&self) -> Option<&[String]> {
        self.explicit_root_module_direct_deps.as_deref()
    }

    /// Explicit dev list, in declaration order.
    pub fn explicit_root_module_direct_dev_deps(&self) -> Option<&[String]> {
        self.explicit_root_module_direct_dev_deps.as_deref()
    }

    pub fn use_all_repos(&self) -> UseAllRepos {
        self.use_all_repos
    }

    pub fn reproducible(&self) -> bool {
        self.reproducible
    }

    pub(crate) fn explicit(&self, category: DepCategory) -> Option<&[String]> {
        match category {
            DepCategory::Regular => self.explicit_root_module_direct_deps(),
            DepCategory::Dev => self.explicit_root_module_direct_dev_deps(),
        }
    }

    /// Compare the declaration against the root module's usage of the extension.
    ///
    /// Returns `Ok(None)` when the extension expresses no opinion or the imports
    /// already match.
    pub fn generate_fixup(
        &self,
        root_usage: &ModuleExtensionUsage,
        all_repos: &BTreeSet<String>,
    ) -> Result<Option<Fixup>, MetadataError> {
        let Some(expected) = ExpectedImports::resolve(self, all_repos)? else {
            debug!(
                extension = root_usage.extension_name(),
                "extension reports no direct dependencies; nothing to reconcile"
            );
            return Ok(None);
        };

        Reconciliation::new(root_usage, all_repos, expected)?.into_fixup()
    }
}

fn check_repo_name(category: DepCategory, name: &str) -> Result<(), MetadataError> {
    if validate_user_provided_repo_name(name) {
        Ok(())
    } else {
        Err(MetadataError::InvalidRepoName {
            category,
            name: name.to_string(),
        })
    }
}

/// Persisted form, e.g. inside a lockfile.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MetadataRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explicit_root_module_direct_deps: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    explicit_root_module_direct_dev_deps: Option<Vec<String>>,

    #[serde(default)]
    use_all_repos: UseAllRepos,

    #[serde(default)]
    reproducible: bool,
}

impl TryFrom<MetadataRepr> for ExtensionMetadata {
    type Error = MetadataError;

    fn try_from(repr: MetadataRepr) -> Result<Self, Self::Error> {
        let to_raw = |list: Option<Vec<String>>| list.map_or(RawDeps::Unset, RawDeps::List);
        let (deps, dev_deps) = match repr.use_all_repos {
            UseAllRepos::No => (
                to_raw(repr.explicit_root_module_direct_deps),
                to_raw(repr.explicit_root_module_direct_dev_deps),
            ),
            UseAllRepos::Regular => {
                if repr.explicit_root_module_direct_deps.is_some() {
                    return Err(MetadataError::AllWithNonEmptySibling);
                }
                (
                    RawDeps::all(),
                    RawDeps::List(repr.explicit_root_module_direct_dev_deps.unwrap_or_default()),
                )
            }
            UseAllRepos::Dev => {
                if repr.explicit_root_module_direct_dev_deps.is_some() {
                    return Err(MetadataError::AllWithNonEmptySibling);
                }
                (
                    RawDeps::List(repr.explicit_root_module_direct_deps.unwrap_or_default()),
                    RawDeps::all(),
                )
            }
        };
        ExtensionMetadata::from_raw(deps, dev_deps, repr.reproducible)
    }
}

impl From<ExtensionMetadata> for MetadataRepr {
    fn from(m: ExtensionMetadata) -> Self {
        MetadataRepr {
            explicit_root_module_direct_deps: m.explicit_root_module_direct_deps,
            explicit_root_module_direct_dev_deps: m.explicit_root_module_direct_dev_deps,
            use_all_repos: m.use_all_repos,
            reproducible: m.reproducible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reproducible_only_has_no_opinion() {
        let m = ExtensionMetadata::reproducible_only();
        assert!(m.reproducible());
        assert_eq!(m.use_all_repos(), UseAllRepos::No);
        assert!(m.explicit_root_module_direct_deps().is_none());
        assert!(m.explicit_root_module_direct_dev_deps().is_none());
    }

    #[test]
    fn persisted_form_keeps_declaration_order() {
        let m = ExtensionMetadata::from_raw(
            RawDeps::list(["zeta", "alpha"]),
            RawDeps::list(["mid"]),
            true,
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&m).unwrap(),
            json!({
                "explicit_root_module_direct_deps": ["zeta", "alpha"],
                "explicit_root_module_direct_dev_deps": ["mid"],
                "use_all_repos": "no",
                "reproducible": true
            })
        );
    }

    #[test]
    fn loading_revalidates() {
        let err = serde_json::from_value::<ExtensionMetadata>(json!({
            "explicit_root_module_direct_deps": ["a"],
            "explicit_root_module_direct_dev_deps": ["a"],
        }))
        .unwrap_err();
        assert!(err.to_string().contains(
            "in root_module_direct_dev_deps: entry 'a' is also in root_module_direct_deps"
        ));

        let err = serde_json::from_value::<ExtensionMetadata>(json!({
            "explicit_root_module_direct_deps": ["a"],
            "use_all_repos": "regular",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("the other must be an empty list"));

        let loaded: ExtensionMetadata =
            serde_json::from_value(json!({ "use_all_repos": "dev" })).unwrap();
        assert_eq!(loaded.use_all_repos(), UseAllRepos::Dev);
        assert!(loaded.explicit_root_module_direct_deps().is_none());
    }
}
