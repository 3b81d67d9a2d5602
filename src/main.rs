// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use app_controller::{Controller, LintOptions, TranslateOptions};

mod app_controller;
mod catalog;
mod errors;
mod linter;
mod pipeline;
mod tokens;
mod variables;

const DEFAULT_FORMATS: &str = "pysprintf,pyformat";

/// CLI wrapper for log levels to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lint .po files for broken variables and mismatched markup
    Lint(LintArgs),

    /// Pseudo-translate strings or .po files
    Translate(TranslateArgs),

    /// Generate shell completions for polint
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct LintArgs {
    /// .po files or directories to lint
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Comma-separated list of variable formats. See Available Variable Formats.
    #[arg(long, default_value = DEFAULT_FORMATS)]
    varformat: String,

    /// Comma-separated list of lint rules, by code or name. Defaults to all rules.
    #[arg(long, default_value = "")]
    rules: String,

    /// Quiet all report output
    #[arg(short, long)]
    quiet: bool,

    /// Only report errors
    #[arg(long)]
    errorsonly: bool,

    /// Disable ANSI colors in the report
    #[arg(long)]
    no_color: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Strings or .po file paths to translate; "-" reads stdin
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,

    /// Treat the inputs as strings to translate rather than file paths
    #[arg(short = 's', long)]
    strings: bool,

    /// Comma-separated list of variable formats. See Available Variable Formats.
    #[arg(long, default_value = DEFAULT_FORMATS)]
    varformat: String,

    /// Translation pipeline. See Available Pipeline Stages.
    #[arg(short, long, default_value = "html,pirate")]
    pipeline: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// polint - linter and pseudo-translator for gettext catalogs
///
/// Checks translated strings for broken interpolation variables and
/// mismatched HTML, and pseudo-translates catalogs for layout testing.
#[derive(Parser, Debug)]
#[command(name = "polint")]
#[command(version = "1.0.0")]
#[command(about = "Lint and pseudo-translate gettext .po catalogs")]
#[command(long_about = "polint lints gettext .po catalogs for mismatched interpolation \
variables and HTML between source and translated strings, and pseudo-translates catalogs \
so layout and encoding problems show up before real translations exist.

EXAMPLES:
    polint lint locale/                      # Lint every .po file under locale/
    polint lint --rules E201,W202 de.po      # Run only the variable-consistency rules
    polint lint --errorsonly locale/         # Report errors, skip warnings
    polint translate -s \"Hello %(user)s\"     # Pirate-translate one string
    polint translate --pipeline shouty de.po # Rewrite de.po translations in place
    polint completions bash > polint.bash    # Generate bash completions

Note: translating files replaces the original file in place.")]
#[command(after_help = catalogue_help())]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

/// The registered formats, stages, and rules, for --help output
fn catalogue_help() -> String {
    let mut out = String::from("Available Variable Formats:\n");
    for format in variables::available_formats() {
        out.push_str(&format!("  {:13}  {}\n", format.name, format.desc));
    }
    out.push_str("\nAvailable Pipeline Stages:\n");
    for stage in pipeline::available_transforms() {
        out.push_str(&format!("  {:13}  {}\n", stage.name(), stage.desc()));
    }
    out.push_str("\nAvailable Lint Rules:\n");
    for rule in linter::available_rules() {
        out.push_str(&format!("  {:4}  {:22}  {}\n", rule.code(), rule.name(), rule.desc()));
    }
    out
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{color}{now} {:5} {}\x1B[0m",
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "polint", &mut std::io::stdout());
            Ok(())
        }
        Commands::Lint(args) => {
            if let Some(level) = &args.log_level {
                log::set_max_level(level.clone().into());
            }
            let options = LintOptions {
                formats: args.varformat,
                rules: args.rules,
                quiet: args.quiet,
                errors_only: args.errorsonly,
                no_color: args.no_color,
            };
            let code = Controller::run_lint(&args.paths, &options)?;
            std::process::exit(code);
        }
        Commands::Translate(args) => {
            if let Some(level) = &args.log_level {
                log::set_max_level(level.clone().into());
            }
            let options = TranslateOptions {
                formats: args.varformat,
                pipeline: args.pipeline,
            };
            if args.strings {
                Controller::run_translate_strings(&args.inputs, &options)
            } else if args.inputs.len() == 1 && args.inputs[0] == "-" {
                Controller::run_translate_stdin(&options)
            } else {
                let paths: Vec<PathBuf> = args.inputs.iter().map(PathBuf::from).collect();
                Controller::run_translate_files(&paths, &options)
            }
        }
    }
}
