#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use usefix_types::{
    Fixup, Location, ModuleExtensionUsage, UsageProxy, UseRepoAction, UseRepoCommand,
};

pub const BZL_FILE: &str = "@ext_mod//:extensions.bzl";
pub const EXT_NAME: &str = "ext";

pub fn proxy(file: &str, name: &str, dev: bool, repos: &[&str], line: u32) -> UsageProxy {
    UsageProxy {
        containing_module_file_path: file.into(),
        proxy_name: name.to_string(),
        dev_dependency: dev,
        imports: repos
            .iter()
            .map(|r| (r.to_string(), r.to_string()))
            .collect::<BTreeMap<_, _>>(),
        location: Location::new(file, line, 5),
    }
}

pub fn usage(proxies: Vec<UsageProxy>) -> ModuleExtensionUsage {
    ModuleExtensionUsage::new(BZL_FILE, EXT_NAME, proxies)
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Apply emitted commands the way the module-file editor would, matching proxies by
/// file and label.
pub fn apply_fixup(usage: &ModuleExtensionUsage, fixup: &Fixup) -> ModuleExtensionUsage {
    let mut proxies = usage.proxies().to_vec();
    for file in fixup.commands.iter() {
        for cmd in &file.commands {
            let parsed: UseRepoCommand = cmd.to_string().parse().expect("command text parses");
            let target = proxies
                .iter_mut()
                .find(|p| {
                    p.containing_module_file_path == file.path
                        && p.label() == parsed.proxy_label()
                })
                .expect("command addresses an existing proxy");
            match parsed.action() {
                UseRepoAction::Add => {
                    for repo in parsed.repos() {
                        target.imports.insert(repo.clone(), repo.clone());
                    }
                }
                UseRepoAction::Remove => {
                    target.imports.retain(|_, repo| !parsed.repos().contains(repo));
                }
            }
        }
    }
    ModuleExtensionUsage::new(usage.extension_bzl_file(), usage.extension_name(), proxies)
}
