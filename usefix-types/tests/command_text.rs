//! Command text is consumed by the module-file editor, so its shape is pinned here.

use proptest::prelude::*;
use usefix_types::{ModuleFileCommands, UseRepoAction, UseRepoCommand};

#[test]
fn renders_sorted_space_joined_tokens() {
    let cmd = UseRepoCommand::new(UseRepoAction::Remove, "_unnamed_usage", ["zed", "alpha", "mid"]);
    assert_eq!(cmd.to_string(), "use_repo_remove _unnamed_usage alpha mid zed");
}

#[test]
fn duplicate_repos_collapse() {
    let cmd = UseRepoCommand::new(UseRepoAction::Add, "ext", ["a", "a", "b"]);
    assert_eq!(cmd.repos(), ["a".to_string(), "b".to_string()]);
}

#[test]
fn parse_rejects_unknown_action() {
    let err = "use_repo_replace ext a".parse::<UseRepoCommand>().unwrap_err();
    assert!(err.to_string().contains("unknown action"));
}

#[test]
fn parse_rejects_missing_label() {
    let err = "use_repo_add".parse::<UseRepoCommand>().unwrap_err();
    assert!(err.to_string().contains("missing proxy label"));
}

#[test]
fn parse_rejects_empty() {
    assert!("   ".parse::<UseRepoCommand>().is_err());
}

#[test]
fn file_commands_keep_first_seen_file_order() {
    let mut cmds = ModuleFileCommands::new();
    cmds.push("b.bazel", UseRepoCommand::new(UseRepoAction::Add, "x", ["1"]));
    cmds.push("a.bazel", UseRepoCommand::new(UseRepoAction::Add, "y", ["2"]));
    cmds.push("b.bazel", UseRepoCommand::new(UseRepoAction::Remove, "x", ["3"]));

    let paths: Vec<&str> = cmds.paths().map(|p| p.as_str()).collect();
    assert_eq!(paths, vec!["b.bazel", "a.bazel"]);
    assert_eq!(
        cmds.to_strings("b.bazel"),
        vec!["use_repo_add x 1".to_string(), "use_repo_remove x 3".to_string()]
    );
    assert_eq!(cmds.len(), 3);
    assert!(cmds.to_strings("missing.bazel").is_empty());
}

fn arb_repo() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-z][a-z0-9_.-]{0,8}").unwrap()
}

proptest! {
    /// Whatever the editor receives parses back to the same command.
    #[test]
    fn rendered_text_parses_back(
        add in any::<bool>(),
        label in prop::string::string_regex(r"[a-z_][a-z0-9_]{0,8}").unwrap(),
        repos in prop::collection::vec(arb_repo(), 1..6),
    ) {
        let action = if add { UseRepoAction::Add } else { UseRepoAction::Remove };
        let cmd = UseRepoCommand::new(action, label, repos);
        let parsed: UseRepoCommand = cmd.to_string().parse().unwrap();
        prop_assert_eq!(parsed, cmd);
    }
}
