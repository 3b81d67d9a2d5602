/*!
 * # polint - linter and pseudo-translator for gettext catalogs
 *
 * A library and CLI for catching localization breakage before it ships:
 * translated strings with broken interpolation variables, mismatched
 * HTML between source and translation, and catalogs that were never
 * translated at all.
 *
 * ## Features
 *
 * - Tokenize strings into plain text and interpolation variables
 *   (percent and brace syntaxes, selectable per project)
 * - Lint `.po` catalogs with a fixed catalogue of coded rules
 *   (`E1xx` malformed syntax, `E2xx`/`W2xx` variable consistency,
 *   `W3xx` content quality)
 * - Pseudo-translate catalogs through a configurable transform
 *   pipeline (shouty, xxx, anglequote, redacted, pirate, ...) with an
 *   HTML-aware stage that never rewrites markup
 * - Inline `polint-ignore` directives for per-entry suppression
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `variables`: variable-format registry and tokenizer
 * - `tokens`: the token stream transforms operate on
 * - `pipeline`: transform catalogue and the [`Translator`] driver
 * - `linter`: rule catalogue and the [`Linter`] engine
 * - `catalog`: PO parsing and serialization
 * - `app_controller`: file collection, report rendering, in-place
 *   translation
 * - `errors`: error types shared across the crate
 *
 * The core engines perform no file I/O; they consume parsed
 * [`TranslationEntry`] records and are safe to parallelize across
 * entries or files.
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod linter;
pub mod pipeline;
pub mod tokens;
pub mod variables;

// Re-export main types for easier usage
pub use catalog::{Catalog, TranslationEntry};
pub use errors::{CatalogError, ConfigError, MarkupError};
pub use linter::{LintMessage, Linter, Severity};
pub use pipeline::Translator;
pub use variables::VariableTokenizer;
