/*!
 * Application controller: wires the core engines to the filesystem.
 *
 * The core never touches files; this module collects catalog paths,
 * parses them, drives the [`Linter`] or [`Translator`], and renders the
 * reports. Lint findings go to stdout with the same shape per finding:
 * a colored severity line, the source and target strings, and a blank
 * separator.
 */

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::linter::{LintMessage, Linter};
use crate::pipeline::Translator;

const BOLD_RED: &str = "\x1B[1;31m";
const BOLD_YELLOW: &str = "\x1B[1;33m";
const BOLD_GREEN: &str = "\x1B[1;32m";
const RESET: &str = "\x1B[0m";

/// Options for the lint command
pub struct LintOptions {
    /// Comma-separated variable format names
    pub formats: String,
    /// Comma-separated rule codes or names; empty selects all rules
    pub rules: String,
    /// Suppress all report output
    pub quiet: bool,
    /// Report errors only, no warnings
    pub errors_only: bool,
    /// Disable ANSI colors in the report
    pub no_color: bool,
}

/// Options for the translate command
pub struct TranslateOptions {
    /// Comma-separated variable format names
    pub formats: String,
    /// Comma-separated pipeline stage names
    pub pipeline: String,
}

/// Per-file lint outcome, for the final cross-file summary
struct FileTally {
    path: PathBuf,
    errors: usize,
    warnings: usize,
}

/// Main application controller
pub struct Controller;

impl Controller {
    /// Lint catalogs at the given paths; directories are walked for
    /// `.po` files.
    ///
    /// Returns the process exit code: 1 when any error-severity finding
    /// (or unreadable file) was encountered, 0 otherwise.
    pub fn run_lint(paths: &[PathBuf], options: &LintOptions) -> Result<i32> {
        let linter = Linter::new(&options.formats, &options.rules)?;
        let po_files = collect_po_files(paths)?;
        if po_files.is_empty() {
            return Err(anyhow!("no .po files found under the given paths"));
        }

        let paint = |color: &'static str| if options.no_color { "" } else { color };
        let reset = if options.no_color { "" } else { RESET };

        let mut tallies: Vec<FileTally> = Vec::new();
        let mut total_errors = 0;
        let mut total_warnings = 0;
        let mut files_with_errors = 0;

        for path in &po_files {
            let messages = match lint_one_file(&linter, path) {
                Ok(messages) => messages,
                Err(err) => {
                    // Unreadable or unparseable file; report and keep going.
                    println!(
                        "{}>>> Error opening file: {}{}",
                        paint(BOLD_RED),
                        path.display(),
                        reset
                    );
                    println!("{}{err:#}{}", paint(BOLD_RED), reset);
                    println!();
                    tallies.push(FileTally {
                        path: path.clone(),
                        errors: 1,
                        warnings: 0,
                    });
                    total_errors += 1;
                    files_with_errors += 1;
                    continue;
                }
            };

            let shown: Vec<&LintMessage> = messages
                .iter()
                .filter(|message| message.is_error() || !options.errors_only)
                .collect();

            let errors = messages.iter().filter(|m| m.is_error()).count();
            let warnings = messages.len() - errors;
            total_errors += errors;
            total_warnings += warnings;
            if errors > 0 {
                files_with_errors += 1;
            }
            tallies.push(FileTally {
                path: path.clone(),
                errors,
                warnings,
            });

            if shown.is_empty() {
                continue;
            }

            if !options.quiet {
                println!(
                    "{}>>> Working on: {}{}",
                    paint(BOLD_GREEN),
                    path.display(),
                    reset
                );
                for message in shown {
                    print!("{}", render_finding(message, options.no_color));
                }

                println!("Totals");
                if !options.errors_only {
                    println!("  Warnings: {warnings:5}");
                }
                println!("  Errors:   {errors:5}");
                println!();
            }
        }

        if po_files.len() > 1 && !options.quiet {
            print_final_totals(&tallies, total_errors, total_warnings, files_with_errors, options);
        }

        Ok(if total_errors > 0 { 1 } else { 0 })
    }

    /// Translate string arguments directly to stdout
    pub fn run_translate_strings(strings: &[String], options: &TranslateOptions) -> Result<()> {
        let translator = Translator::new(&options.formats, &options.pipeline)?;
        for string in strings {
            let translated = translator
                .translate_string(string)
                .context("failed to translate string")?;
            println!("{translated}");
        }
        Ok(())
    }

    /// Translate everything read from stdin to stdout
    pub fn run_translate_stdin(options: &TranslateOptions) -> Result<()> {
        let translator = Translator::new(&options.formats, &options.pipeline)?;
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        let translated = translator
            .translate_string(&input)
            .context("failed to translate stdin")?;
        println!("{translated}");
        Ok(())
    }

    /// Translate catalog files in place, replacing the originals
    pub fn run_translate_files(paths: &[PathBuf], options: &TranslateOptions) -> Result<()> {
        let translator = Translator::new(&options.formats, &options.pipeline)?;

        for path in paths {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mut catalog = Catalog::parse(&source)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let count = translator
                .translate_file(&mut catalog)
                .with_context(|| format!("failed to translate {}", path.display()))?;
            std::fs::write(path, catalog.to_po_string())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("translated {count} entries in {}", path.display());
        }
        Ok(())
    }
}

/// Expand the given paths into the list of `.po` files to lint
fn collect_po_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut po_files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("failed to walk directory {}", path.display()))?;
                if entry.file_type().is_file() && has_po_extension(entry.path()) {
                    po_files.push(entry.path().to_path_buf());
                }
            }
        } else {
            po_files.push(path.clone());
        }
    }
    debug!("collected {} catalog files", po_files.len());
    Ok(po_files)
}

fn has_po_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "po")
}

/// Render one finding as its report block: the colored severity line,
/// the entry's line number and source string, the target string, and a
/// blank separator. Catalogs only locate entries by line, so no column
/// is reported.
fn render_finding(message: &LintMessage, no_color: bool) -> String {
    let (label, color) = if message.is_error() {
        ("Error", BOLD_RED)
    } else {
        ("Warning", BOLD_YELLOW)
    };
    let (color, reset) = if no_color { ("", "") } else { (color, RESET) };
    format!(
        "{color}{label}: {}: {}{reset}\n{}: msgid \"{}\"\n{} \"{}\"\n\n",
        message.code,
        message.text,
        message.line,
        message.msgid,
        message.target_field,
        message.target_string,
    )
}

fn lint_one_file(linter: &Linter, path: &Path) -> Result<Vec<LintMessage>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let catalog = Catalog::parse(&source)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let messages = linter.verify_entries(&catalog.entries)?;
    Ok(messages)
}

fn print_final_totals(
    tallies: &[FileTally],
    total_errors: usize,
    total_warnings: usize,
    files_with_errors: usize,
    options: &LintOptions,
) {
    println!("Final totals");
    println!("  Number of files examined:          {:5}", tallies.len());
    println!("  Total number of files with errors: {files_with_errors:5}");
    if !options.errors_only {
        println!("  Total number of warnings:          {total_warnings:5}");
    }
    println!("  Total number of errors:            {total_errors:5}");
    println!();

    if options.errors_only {
        println!("Errors  Filename");
    } else {
        println!("Warnings  Errors  Filename");
    }
    let mut sorted: Vec<&FileTally> = tallies
        .iter()
        .filter(|tally| tally.errors > 0 || tally.warnings > 0)
        .collect();
    sorted.sort_by(|a, b| (b.errors, b.warnings).cmp(&(a.errors, a.warnings)));
    for tally in sorted {
        if options.errors_only {
            println!(" {:5}  {}", tally.errors, tally.path.display());
        } else {
            println!(" {:5}     {:5}  {}", tally.warnings, tally.errors, tally.path.display());
        }
    }
}
