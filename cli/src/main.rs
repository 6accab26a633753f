use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slim_scaffold::{CommandHooks, FsProbe, Outcome, Pipeline, ProjectRoot, Settings, Variant};

mod error;
mod output;

use error::CliError;
use output::TerminalNotifier;

const REJECTED_MESSAGE: &str = "Must run on new project";
const SUCCESS_MESSAGE: &str = "Set up successfully.";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ErrorFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Api,
    Console,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Api => Variant::Api,
            VariantArg::Console => Variant::Console,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "slim")]
#[command(
    about = "Convert a new Laravel project into an API-only or console-only project.",
    version
)]
struct Cli {
    /// Project directory to convert.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Settings file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not run the install-api / migrate commands.
    #[arg(long, default_value_t = false)]
    skip_hooks: bool,

    #[arg(long, value_enum, default_value_t = ErrorFormat::Text)]
    error_format: ErrorFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Set up for an API only project.
    Api,
    /// Delete everything a console only project does not need.
    Console,
    /// Report whether the project can be converted, without changing it.
    Check {
        #[arg(value_enum)]
        variant: VariantArg,
    },
    /// Print the conversion plan as JSON.
    Plan {
        #[arg(value_enum)]
        variant: VariantArg,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "slim_scaffold=warn".into()),
    );

    // stdout carries the user-facing progress lines.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let error_format = cli.error_format;
    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            match error_format {
                ErrorFormat::Text => eprintln!("{}", err.to_string().red()),
                ErrorFormat::Json => eprintln!("{}", error::render_json_error(&err)),
            }
            std::process::exit(1);
        }
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = match &cli.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            slim_scaffold::settings_io::load_settings(path)?
        }
        None => Settings::default(),
    };
    if cli.skip_hooks {
        settings.hooks.enabled = false;
    }
    Ok(settings)
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    let settings = load_settings(cli)?;

    match &cli.command {
        Command::Api => convert(&ProjectRoot::new(&cli.root)?, Variant::Api, &settings),
        Command::Console => convert(&ProjectRoot::new(&cli.root)?, Variant::Console, &settings),
        Command::Check { variant } => {
            check(&ProjectRoot::new(&cli.root)?, (*variant).into(), &settings)
        }
        Command::Plan { variant } => {
            let plan = slim_scaffold::plan_for((*variant).into());
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?;
            Ok(0)
        }
    }
}

fn check(root: &ProjectRoot, variant: Variant, settings: &Settings) -> Result<i32, CliError> {
    let plan = slim_scaffold::plan_for(variant);
    let pipeline = Pipeline::new(root, &plan).with_limits(settings.limits);
    let mut probe = FsProbe::new(settings.limits.max_read_bytes);
    if pipeline.check(&mut probe) {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", format!("Eligible for {variant} conversion.").green())?;
        Ok(0)
    } else {
        eprintln!("{}", REJECTED_MESSAGE.red());
        Ok(1)
    }
}

fn convert(root: &ProjectRoot, variant: Variant, settings: &Settings) -> Result<i32, CliError> {
    let plan = slim_scaffold::plan_for(variant);
    let pipeline = Pipeline::new(root, &plan).with_limits(settings.limits);
    let mut hooks = CommandHooks::new(settings.hooks.clone());
    tracing::info!(root = %root.path().display(), %variant, "starting conversion");

    let stdout = std::io::stdout();
    let mut notifier = TerminalNotifier::new(stdout.lock());
    let outcome = pipeline.run(&mut hooks, &mut notifier)?;
    notifier.finish()?;

    match outcome {
        Outcome::Rejected => eprintln!("{}", REJECTED_MESSAGE.red()),
        Outcome::Completed => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", SUCCESS_MESSAGE.green())?;
        }
    }
    Ok(outcome.exit_code())
}
