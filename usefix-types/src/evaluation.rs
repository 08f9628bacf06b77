use crate::usage::{ModuleExtensionUsage, UsageProxy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything known after running one module extension for the root module.
///
/// The `root_module_direct_*` fields are kept as raw JSON: they arrive loosely typed
/// (absent, `"all"`, or a list of strings) and are validated by the domain crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionEvaluation {
    #[serde(default = "default_schema")]
    pub schema: String,

    pub extension_bzl_file: String,
    pub extension_name: String,

    #[serde(default)]
    pub root_module_direct_deps: serde_json::Value,

    #[serde(default)]
    pub root_module_direct_dev_deps: serde_json::Value,

    #[serde(default)]
    pub reproducible: bool,

    /// Repositories the extension actually generated.
    #[serde(default)]
    pub generated_repos: BTreeSet<String>,

    /// Root-module proxies for this extension, in declaration order.
    #[serde(default)]
    pub proxies: Vec<UsageProxy>,
}

fn default_schema() -> String {
    crate::schema::USEFIX_EVALUATION_V1.to_string()
}

impl ExtensionEvaluation {
    pub fn usage(&self) -> ModuleExtensionUsage {
        ModuleExtensionUsage::new(
            self.extension_bzl_file.clone(),
            self.extension_name.clone(),
            self.proxies.clone(),
        )
    }
}
