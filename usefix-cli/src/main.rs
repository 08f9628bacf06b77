mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, OutputFormat};
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use usefix_domain::{DepCategory, ExtensionMetadata, RawDeps};
use usefix_render::{render_fixup_json, render_fixup_md, render_fixup_text, render_no_fixup_text};
use usefix_types::{ExtensionEvaluation, Fixup, UseRepoCommand};

/// Exit code for a fixup under `--strict`.
const EXIT_FIXUP_REQUIRED: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "usefix",
    version,
    about = "Checks module-extension use_repo imports against the extension's declared direct dependencies."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile one extension evaluation and print the fixup, if any.
    Check(CheckArgs),
    /// Validate a direct-dependency declaration and print its persisted form.
    Metadata(MetadataArgs),
    /// Parse a use_repo_add / use_repo_remove command and print it as JSON.
    ParseCommand(ParseCommandArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Evaluation document (JSON).
    evaluation: Utf8PathBuf,

    /// Output format (default: from usefix.toml, else text).
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the rendered result to this file instead of stdout.
    #[arg(long)]
    out: Option<Utf8PathBuf>,

    /// Exit with code 2 when use_repo calls need changes.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Config file (default: ./usefix.toml if present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct MetadataArgs {
    /// root_module_direct_deps as JSON (omit for unset).
    #[arg(long)]
    deps: Option<String>,

    /// root_module_direct_dev_deps as JSON (omit for unset).
    #[arg(long)]
    dev_deps: Option<String>,

    /// Mark the extension result as reproducible.
    #[arg(long, default_value_t = false)]
    reproducible: bool,
}

#[derive(Debug, Parser)]
struct ParseCommandArgs {
    /// Command text, e.g. "use_repo_add ext foo bar".
    text: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match real_main() {
        Ok(code) => code,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Metadata(args) => cmd_metadata(args).map(|()| ExitCode::SUCCESS),
        Command::ParseCommand(args) => cmd_parse_command(args).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let file_config = config::resolve(args.config.as_deref(), Utf8Path::new("."))
        .context("load usefix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_check_args(args.format, args.strict);
    debug!("merged config: format={:?}, strict={}", merged.format, merged.strict);

    let eval = load_evaluation(&args.evaluation)?;
    let fixup = usefix_domain::check_evaluation(&eval)?;

    let rendered = render(fixup.as_ref(), merged.format)?;
    match &args.out {
        Some(out) => {
            fs::write(out, &rendered).with_context(|| format!("write {}", out))?;
            info!("wrote result to {}", out);
        }
        None => print!("{}", rendered),
    }

    if fixup.is_some() && merged.strict {
        return Ok(ExitCode::from(EXIT_FIXUP_REQUIRED));
    }
    Ok(ExitCode::SUCCESS)
}

fn load_evaluation(path: &Utf8Path) -> anyhow::Result<ExtensionEvaluation> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    let eval: ExtensionEvaluation =
        serde_json::from_str(&contents).with_context(|| format!("parse evaluation {}", path))?;
    if eval.schema != usefix_types::schema::USEFIX_EVALUATION_V1 {
        anyhow::bail!(
            "unsupported evaluation schema '{}' in {} (expected '{}')",
            eval.schema,
            path,
            usefix_types::schema::USEFIX_EVALUATION_V1
        );
    }
    debug!(
        extension = %eval.extension_name,
        proxies = eval.proxies.len(),
        generated = eval.generated_repos.len(),
        "loaded evaluation"
    );
    Ok(eval)
}

fn render(fixup: Option<&Fixup>, format: OutputFormat) -> anyhow::Result<String> {
    let out = match (fixup, format) {
        (Some(f), OutputFormat::Text) => render_fixup_text(f),
        (Some(f), OutputFormat::Md) => render_fixup_md(f),
        (Some(f), OutputFormat::Json) => render_fixup_json(f).context("serialize fixup")?,
        (None, OutputFormat::Json) => "null\n".to_string(),
        (None, OutputFormat::Text | OutputFormat::Md) => render_no_fixup_text(),
    };
    Ok(out)
}

fn cmd_metadata(args: MetadataArgs) -> anyhow::Result<()> {
    let deps = parse_raw(DepCategory::Regular, args.deps.as_deref())?;
    let dev_deps = parse_raw(DepCategory::Dev, args.dev_deps.as_deref())?;
    let metadata = ExtensionMetadata::from_raw(deps, dev_deps, args.reproducible)?;
    let s = serde_json::to_string_pretty(&metadata).context("serialize metadata")?;
    println!("{}", s);
    Ok(())
}

fn parse_raw(category: DepCategory, arg: Option<&str>) -> anyhow::Result<RawDeps> {
    let Some(text) = arg else {
        return Ok(RawDeps::Unset);
    };
    let value: serde_json::Value = serde_json::from_str(text)
        .with_context(|| format!("parse {} as JSON", category.field_name()))?;
    Ok(RawDeps::from_json(&value))
}

fn cmd_parse_command(args: ParseCommandArgs) -> anyhow::Result<()> {
    let cmd: UseRepoCommand = args.text.parse()?;
    let v = serde_json::json!({
        "action": cmd.action().as_str(),
        "proxy_label": cmd.proxy_label(),
        "repos": cmd.repos(),
    });
    let s = serde_json::to_string_pretty(&v).context("serialize command")?;
    println!("{}", s);
    Ok(())
}
