use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use famopt_contracts::analysis::{AnalysisState, FamilyCategory, OptimizationResult};
use famopt_contracts::schema::response_schema;
use famopt_engine::{AnalysisProvider, AnalysisSession, EngineConfig, ProviderRegistry};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

mod form;
mod logging;
mod report;

use report::{render_html, render_text, ReportView};

#[derive(Debug, Parser)]
#[command(
    name = "famopt",
    version,
    about = "Screenshot-based over-modeling review for Revit families"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze one screenshot and print the report.
    Analyze(AnalyzeArgs),
    /// Interactive analysis form.
    Form(FormArgs),
    /// Print the response schema sent to the model.
    Schema,
    /// List the family categories.
    Categories,
}

#[derive(Debug, Args)]
struct ProviderArgs {
    /// Provider name. Defaults to FAMOPT_PROVIDER or gemini.
    #[arg(long)]
    provider: Option<String>,
    /// Model name. Defaults to FAMOPT_MODEL or gemini-2.5-flash-image.
    #[arg(long)]
    model: Option<String>,
}

impl ProviderArgs {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig::from_env().with_overrides(self.provider.as_deref(), self.model.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
}

#[derive(Debug, Parser)]
struct AnalyzeArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long, default_value = "furniture")]
    category: FamilyCategory,
    /// Estimated family file size in MB.
    #[arg(long, default_value = "0.5")]
    file_size: String,
    /// Free-text notes about the family (parameters, nesting, detail level).
    #[arg(long)]
    context: Option<String>,
    #[command(flatten)]
    provider: ProviderArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Parser)]
struct FormArgs {
    #[command(flatten)]
    provider: ProviderArgs,
    #[arg(long)]
    no_color: bool,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("famopt error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Form(args) => {
            let color = use_color(args.no_color);
            form::run_form(args.provider.engine_config(), color)?;
            Ok(0)
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&response_schema())?);
            Ok(0)
        }
        Command::Categories => {
            for category in FamilyCategory::ALL {
                println!("{:<12} {}", category.key(), category.label());
            }
            Ok(0)
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<i32> {
    let config = args.provider.engine_config();
    debug!(config = ?config, "resolved engine config");
    let registry = ProviderRegistry::from_config(&config);
    let provider = registry.resolve(&config.provider)?;

    let mut session = AnalysisSession::new();
    let draft = session.draft_mut();
    draft.category = args.category;
    draft.set_file_size(&args.file_size)?;
    draft.set_context(args.context.as_deref().unwrap_or_default());
    draft
        .set_image_path(&args.image)
        .with_context(|| format!("cannot use {} as the screenshot", args.image.display()))?;

    match submit_with_spinner(&mut session, provider)? {
        AnalysisState::Success(result) => {
            let color = args.out.is_none() && use_color(args.no_color);
            emit_report(&result, args.format, args.out.as_deref(), color)?;
            Ok(0)
        }
        AnalysisState::Failure(message) => {
            eprintln!("famopt error: {message}");
            Ok(1)
        }
        AnalysisState::Idle | AnalysisState::Loading => Ok(1),
    }
}

/// Runs the pending analysis behind a spinner and returns the new slot value.
pub(crate) fn submit_with_spinner(
    session: &mut AnalysisSession,
    provider: &dyn AnalysisProvider,
) -> Result<AnalysisState> {
    let pending = session.begin()?;
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message("Analyzing geometry...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = pending.run(provider);
    spinner.finish_and_clear();
    Ok(session.complete(outcome).clone())
}

fn emit_report(
    result: &OptimizationResult,
    format: OutputFormat,
    out: Option<&Path>,
    color: bool,
) -> Result<()> {
    let view = ReportView::from_result(result);
    let body = match format {
        OutputFormat::Text => render_text(&view, color),
        OutputFormat::Html => render_html(&view, &now_utc_iso()),
        OutputFormat::Json => serde_json::to_string_pretty(result)? + "\n",
    };
    match out {
        Some(path) => write_output(path, &body),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(body.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

pub(crate) fn write_output(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

pub(crate) fn now_utc_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

fn use_color(no_color: bool) -> bool {
    !no_color && io::stdout().is_terminal() && console::colors_enabled()
}
