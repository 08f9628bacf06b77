use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label used in repair commands for a `use_extension` call that is not bound to a name.
pub const UNNAMED_USAGE_LABEL: &str = "_unnamed_usage";

/// Source position of a declaration, used to anchor diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,

    #[serde(default)]
    pub line: u32,

    #[serde(default)]
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One `use_extension` proxy and the repositories pulled in through its `use_repo` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageProxy {
    /// Module file that contains the declaration.
    pub containing_module_file_path: Utf8PathBuf,

    /// Name the proxy is bound to; empty for an anonymous usage.
    #[serde(default)]
    pub proxy_name: String,

    #[serde(default)]
    pub dev_dependency: bool,

    /// Local alias -> repository name as generated by the extension.
    #[serde(default)]
    pub imports: BTreeMap<String, String>,

    pub location: Location,
}

impl UsageProxy {
    /// Name to use when addressing this proxy in a repair command.
    pub fn label(&self) -> &str {
        if self.proxy_name.is_empty() {
            UNNAMED_USAGE_LABEL
        } else {
            &self.proxy_name
        }
    }

    /// Repository names imported through this proxy. The same name may repeat under
    /// different aliases.
    pub fn imported_repos(&self) -> impl Iterator<Item = &str> {
        self.imports.values().map(String::as_str)
    }
}

/// All proxies of one extension within the root module, in declaration order.
///
/// The derived dev/non-dev flags are recomputed whenever a usage is built or
/// deserialized, so they cannot drift from the proxy list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UsageRepr", into = "UsageRepr")]
pub struct ModuleExtensionUsage {
    extension_bzl_file: String,
    extension_name: String,
    proxies: Vec<UsageProxy>,
    has_dev_use_extension: bool,
    has_non_dev_use_extension: bool,
}

impl ModuleExtensionUsage {
    pub fn new(
        extension_bzl_file: impl Into<String>,
        extension_name: impl Into<String>,
        proxies: Vec<UsageProxy>,
    ) -> Self {
        let has_dev_use_extension = proxies.iter().any(|p| p.dev_dependency);
        let has_non_dev_use_extension = proxies.iter().any(|p| !p.dev_dependency);
        Self {
            extension_bzl_file: extension_bzl_file.into(),
            extension_name: extension_name.into(),
            proxies,
            has_dev_use_extension,
            has_non_dev_use_extension,
        }
    }

    pub fn extension_bzl_file(&self) -> &str {
        &self.extension_bzl_file
    }

    pub fn extension_name(&self) -> &str {
        &self.extension_name
    }

    pub fn proxies(&self) -> &[UsageProxy] {
        &self.proxies
    }

    pub fn has_dev_use_extension(&self) -> bool {
        self.has_dev_use_extension
    }

    pub fn has_non_dev_use_extension(&self) -> bool {
        self.has_non_dev_use_extension
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UsageRepr {
    extension_bzl_file: String,
    extension_name: String,
    #[serde(default)]
    proxies: Vec<UsageProxy>,
}

impl From<UsageRepr> for ModuleExtensionUsage {
    fn from(repr: UsageRepr) -> Self {
        ModuleExtensionUsage::new(repr.extension_bzl_file, repr.extension_name, repr.proxies)
    }
}

impl From<ModuleExtensionUsage> for UsageRepr {
    fn from(usage: ModuleExtensionUsage) -> Self {
        UsageRepr {
            extension_bzl_file: usage.extension_bzl_file,
            extension_name: usage.extension_name,
            proxies: usage.proxies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy(name: &str, dev: bool) -> UsageProxy {
        UsageProxy {
            containing_module_file_path: "MODULE.bazel".into(),
            proxy_name: name.to_string(),
            dev_dependency: dev,
            imports: BTreeMap::new(),
            location: Location::new("MODULE.bazel", 1, 1),
        }
    }

    #[test]
    fn flags_follow_proxy_list() {
        let usage = ModuleExtensionUsage::new("//:ext.bzl", "ext", vec![proxy("a", true)]);
        assert!(usage.has_dev_use_extension());
        assert!(!usage.has_non_dev_use_extension());

        let empty = ModuleExtensionUsage::new("//:ext.bzl", "ext", vec![]);
        assert!(!empty.has_dev_use_extension());
        assert!(!empty.has_non_dev_use_extension());
    }

    #[test]
    fn anonymous_proxy_uses_placeholder_label() {
        assert_eq!(proxy("", false).label(), UNNAMED_USAGE_LABEL);
        assert_eq!(proxy("my_ext", false).label(), "my_ext");
    }
}
