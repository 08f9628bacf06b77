//! Rendering helpers (plain text and markdown) for human-readable fixups.

use usefix_types::Fixup;

/// Terminal output: the warning line followed by the commands grouped per file.
pub fn render_fixup_text(fixup: &Fixup) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {}: {}\n",
        fixup.warning.severity, fixup.warning.location, fixup.warning.message
    ));

    for file in fixup.commands.iter() {
        out.push_str(&format!("\n{}:\n", file.path));
        for cmd in &file.commands {
            out.push_str(&format!("  {}\n", cmd));
        }
    }

    out
}

pub fn render_fixup_md(fixup: &Fixup) -> String {
    let mut out = String::new();
    out.push_str("# usefix fixup\n\n");
    out.push_str(&format!(
        "- Extension: `{}` from `{}`\n",
        fixup.usage.extension_name(),
        fixup.usage.extension_bzl_file()
    ));
    out.push_str(&format!("- Proxies: {}\n", fixup.usage.proxies().len()));
    out.push_str(&format!("- Files touched: {}\n", fixup.commands.paths().count()));
    out.push_str(&format!("- Commands: {}\n\n", fixup.commands.len()));

    out.push_str("## Warning\n\n");
    out.push_str(&format!("- Location: `{}`\n\n", fixup.warning.location));
    out.push_str("```text\n");
    out.push_str(&fixup.warning.message);
    out.push_str("\n```\n\n");

    out.push_str("## Commands\n\n");
    if fixup.commands.is_empty() {
        out.push_str("_No commands._\n");
        return out;
    }

    for file in fixup.commands.iter() {
        out.push_str(&format!("### `{}`\n\n", file.path));
        out.push_str("```text\n");
        for cmd in &file.commands {
            out.push_str(&format!("{}\n", cmd));
        }
        out.push_str("```\n\n");
    }

    out
}

pub fn render_fixup_json(fixup: &Fixup) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(fixup)?;
    out.push('\n');
    Ok(out)
}

pub fn render_no_fixup_text() -> String {
    "usefix: use_repo imports already match the extension's declared dependencies\n".to_string()
}
