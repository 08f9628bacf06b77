use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use usefix_types::{
    Event, ExtensionEvaluation, Fixup, Location, ModuleExtensionUsage, ModuleFileCommands,
    Severity, UsageProxy, UseRepoAction, UseRepoCommand,
};

fn proxy(file: &str, name: &str, dev: bool, imports: &[(&str, &str)]) -> UsageProxy {
    UsageProxy {
        containing_module_file_path: file.into(),
        proxy_name: name.to_string(),
        dev_dependency: dev,
        imports: imports
            .iter()
            .map(|(a, r)| (a.to_string(), r.to_string()))
            .collect::<BTreeMap<_, _>>(),
        location: Location::new(file, 3, 5),
    }
}

#[test]
fn severity_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(Severity::Warning).expect("serialize"),
        serde_json::json!("warning")
    );
    assert_eq!(
        serde_json::to_value(Severity::Error).expect("serialize"),
        serde_json::json!("error")
    );
}

#[test]
fn command_serializes_as_plain_text() {
    let cmd = UseRepoCommand::new(UseRepoAction::Add, "ext", ["b", "a"]);
    let value = serde_json::to_value(&cmd).expect("serialize");
    assert_eq!(value, serde_json::json!("use_repo_add ext a b"));

    let back: UseRepoCommand = serde_json::from_value(value).expect("deserialize");
    assert_eq!(back, cmd);
}

#[test]
fn command_rejects_malformed_text_on_load() {
    let err = serde_json::from_value::<UseRepoCommand>(serde_json::json!("use_repo_add ext"))
        .expect_err("missing repos");
    assert!(err.to_string().contains("no repositories"));
}

#[test]
fn usage_recomputes_flags_on_deserialize() {
    let json = serde_json::json!({
        "extension_bzl_file": "@mod//:ext.bzl",
        "extension_name": "ext",
        "proxies": [{
            "containing_module_file_path": "MODULE.bazel",
            "proxy_name": "ext",
            "dev_dependency": true,
            "imports": { "foo": "foo" },
            "location": { "file": "MODULE.bazel", "line": 1, "column": 7 }
        }]
    });

    let usage: ModuleExtensionUsage = serde_json::from_value(json).expect("deserialize");
    assert!(usage.has_dev_use_extension());
    assert!(!usage.has_non_dev_use_extension());
    assert_eq!(usage.proxies().len(), 1);

    let value = serde_json::to_value(&usage).expect("serialize");
    assert!(value.get("has_dev_use_extension").is_none());
}

#[test]
fn fixup_serializes_commands_in_file_order() {
    let usage = ModuleExtensionUsage::new(
        "@mod//:ext.bzl",
        "ext",
        vec![
            proxy("MODULE.bazel", "ext", false, &[("foo", "foo")]),
            proxy("dev.MODULE.bazel", "ext_dev", true, &[]),
        ],
    );

    let mut commands = ModuleFileCommands::new();
    commands.push(
        "dev.MODULE.bazel",
        UseRepoCommand::new(UseRepoAction::Add, "ext_dev", ["bar"]),
    );
    commands.push(
        "MODULE.bazel",
        UseRepoCommand::new(UseRepoAction::Remove, "ext", ["foo"]),
    );

    let fixup = Fixup::new(
        commands,
        usage,
        Event::warn(Location::new("MODULE.bazel", 3, 5), "msg"),
    );

    let value = serde_json::to_value(&fixup).expect("serialize");
    assert_eq!(value["schema"], serde_json::json!(usefix_types::schema::USEFIX_FIXUP_V1));
    assert_eq!(
        value["commands"],
        serde_json::json!([
            { "path": "dev.MODULE.bazel", "commands": ["use_repo_add ext_dev bar"] },
            { "path": "MODULE.bazel", "commands": ["use_repo_remove ext foo"] }
        ])
    );
    assert_eq!(value["warning"]["severity"], serde_json::json!("warning"));
}

#[test]
fn evaluation_defaults_missing_fields() {
    let json = serde_json::json!({
        "extension_bzl_file": "@mod//:ext.bzl",
        "extension_name": "ext"
    });

    let eval: ExtensionEvaluation = serde_json::from_value(json).expect("deserialize");
    assert_eq!(eval.schema, usefix_types::schema::USEFIX_EVALUATION_V1);
    assert!(eval.root_module_direct_deps.is_null());
    assert!(eval.root_module_direct_dev_deps.is_null());
    assert!(!eval.reproducible);
    assert!(eval.generated_repos.is_empty());
    assert!(eval.usage().proxies().is_empty());
}
