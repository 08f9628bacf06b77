//! Error types for usefix-domain.
//!
//! Every variant renders the exact message shown to the module author, so callers can
//! surface `to_string()` unchanged. [`MetadataError::kind`] groups variants for callers
//! that only care about the category of failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which of the two declared dependency lists a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepCategory {
    Regular,
    Dev,
}

impl DepCategory {
    /// Attribute name as written by extension authors.
    pub fn field_name(self) -> &'static str {
        match self {
            DepCategory::Regular => "root_module_direct_deps",
            DepCategory::Dev => "root_module_direct_dev_deps",
        }
    }

    pub fn is_dev(self) -> bool {
        matches!(self, DepCategory::Dev)
    }

    fn dev_dependency_literal(self) -> &'static str {
        match self {
            DepCategory::Regular => "False",
            DepCategory::Dev => "True",
        }
    }
}

impl fmt::Display for DepCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Coarse failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Wrong value shape or type, or `"all"` paired with a non-empty list.
    MalformedDeclaration,
    DuplicateEntry,
    CrossCategoryEntry,
    /// A declared name the extension never generated.
    UnknownRepository,
    /// A non-empty expectation for a category the root module never uses.
    PolicyViolation,
    /// Broken internal invariant; indicates a bug rather than bad input.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error(
        "if one of root_module_direct_deps and root_module_direct_dev_deps is \"all\", the other must be an empty list"
    )]
    AllWithNonEmptySibling,

    #[error(
        "root_module_direct_deps and root_module_direct_dev_deps must be None, \"all\", or a list of strings"
    )]
    UnexpectedString,

    #[error(
        "root_module_direct_deps and root_module_direct_dev_deps must both be specified or both be unspecified"
    )]
    PartiallySpecified,

    #[error("for {category}, got {type_name}, want sequence")]
    WrongType {
        category: DepCategory,
        type_name: String,
    },

    #[error("at index {index} of {category}, got element of type {type_name}, want string")]
    WrongElementType {
        category: DepCategory,
        index: usize,
        type_name: String,
    },

    #[error(
        "in {category}: invalid user-provided repo name '{name}': valid names may contain only A-Z, a-z, 0-9, '-', '_', '.', and must start with a letter"
    )]
    InvalidRepoName { category: DepCategory, name: String },

    #[error("in {category}: duplicate entry '{name}'")]
    DuplicateEntry { category: DepCategory, name: String },

    #[error("in root_module_direct_dev_deps: entry '{name}' is also in root_module_direct_deps")]
    CrossCategoryEntry { name: String },

    #[error(
        "{category} contained the following repositories not generated by the extension: {}",
        .names.join(", ")
    )]
    UnknownRepositories {
        category: DepCategory,
        names: Vec<String>,
    },

    #[error(
        "{category} must be empty if the root module contains no usages with dev_dependency = {}",
        .category.dev_dependency_literal()
    )]
    PolicyViolation { category: DepCategory },

    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl MetadataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MetadataError::AllWithNonEmptySibling
            | MetadataError::UnexpectedString
            | MetadataError::PartiallySpecified
            | MetadataError::WrongType { .. }
            | MetadataError::WrongElementType { .. }
            | MetadataError::InvalidRepoName { .. } => ErrorKind::MalformedDeclaration,
            MetadataError::DuplicateEntry { .. } => ErrorKind::DuplicateEntry,
            MetadataError::CrossCategoryEntry { .. } => ErrorKind::CrossCategoryEntry,
            MetadataError::UnknownRepositories { .. } => ErrorKind::UnknownRepository,
            MetadataError::PolicyViolation { .. } => ErrorKind::PolicyViolation,
            MetadataError::Invariant(_) => ErrorKind::Internal,
        }
    }

    /// True for failures caused by the extension's declaration or the root module,
    /// false for internal bugs.
    pub fn is_user_error(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::{DepCategory, ErrorKind, MetadataError};

    #[test]
    fn policy_violation_names_the_missing_usage_kind() {
        let regular = MetadataError::PolicyViolation {
            category: DepCategory::Regular,
        };
        assert_eq!(
            regular.to_string(),
            "root_module_direct_deps must be empty if the root module contains no usages with dev_dependency = False"
        );

        let dev = MetadataError::PolicyViolation {
            category: DepCategory::Dev,
        };
        assert_eq!(
            dev.to_string(),
            "root_module_direct_dev_deps must be empty if the root module contains no usages with dev_dependency = True"
        );
        assert_eq!(dev.kind(), ErrorKind::PolicyViolation);
    }

    #[test]
    fn unknown_repositories_are_comma_joined() {
        let err = MetadataError::UnknownRepositories {
            category: DepCategory::Dev,
            names: vec!["b".to_string(), "a".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "root_module_direct_dev_deps contained the following repositories not generated by the extension: b, a"
        );
        assert_eq!(err.kind(), ErrorKind::UnknownRepository);
    }

    #[test]
    fn invariant_is_not_a_user_error() {
        let err = MetadataError::Invariant("no proxy".to_string());
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("no proxy"));
        assert!(MetadataError::PartiallySpecified.is_user_error());
    }
}
