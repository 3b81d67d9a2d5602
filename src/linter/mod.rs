/*!
 * Lint engine for translation catalogs.
 *
 * The engine normalizes each [`TranslationEntry`](crate::catalog::TranslationEntry)
 * into a [`LintedEntry`] of source/target string tuples, then runs every
 * selected [`LintRule`] over it and concatenates the emitted
 * [`LintMessage`]s. Rules are pure and mutually independent; no rule
 * observes another rule's output, and a rule either reports findings or
 * returns an empty list.
 *
 * Entries that are untranslated or still flagged as needing review are
 * never linted. An inline `polint-ignore` directive in an entry's
 * translator comment suppresses all rules or a code list for that entry.
 */

pub mod rules;

use log::{debug, trace};

use crate::catalog::TranslationEntry;
use crate::errors::ConfigError;
use crate::variables::{IgnoreDirective, VariableTokenizer, parse_ignore_directive};

pub use rules::{LintRule, available_rules};

/// How serious a finding is; errors drive a non-zero exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warn,
    Err,
}

/// One coded finding against one target string of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintMessage {
    pub severity: Severity,
    /// Fixed rule code, e.g. "W202"
    pub code: &'static str,
    /// Human-readable finding, mentioning the offending token(s)
    pub text: String,
    /// Line number of the entry in the catalog source
    pub line: usize,
    /// The field the finding is against, e.g. "msgstr" or "msgstr[1]"
    pub target_field: String,
    /// The entry's source string, for report display
    pub msgid: String,
    /// The target string the finding is against
    pub target_string: String,
}

impl LintMessage {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Err
    }
}

/// One translatable target slot paired with the full set of its source
/// slot(s). A singular entry yields one of these; a plural entry yields
/// one per `msgstr[n]` slot, each paired with both plural sources.
#[derive(Debug, Clone)]
pub struct TranslatedString {
    pub source_fields: Vec<&'static str>,
    pub source_strings: Vec<String>,
    pub target_field: String,
    pub target_string: String,
}

/// An entry normalized for linting
#[derive(Debug, Clone)]
pub struct LintedEntry {
    pub msgid: String,
    pub linenum: usize,
    pub strings: Vec<TranslatedString>,
}

impl LintedEntry {
    /// Normalize an entry into source/target tuples.
    ///
    /// Every plural target slot is paired with both plural sources;
    /// which source a slot renders is decided by the language's plural
    /// formula, so the variable rules compare each slot against the
    /// union of the two source token sets.
    pub fn from_entry(entry: &TranslationEntry) -> LintedEntry {
        let strings = match &entry.msgid_plural {
            Some(plural) => entry
                .msgstr_plural
                .iter()
                .enumerate()
                .map(|(index, slot)| TranslatedString {
                    source_fields: vec!["msgid", "msgid_plural"],
                    source_strings: vec![entry.msgid.clone(), plural.clone()],
                    target_field: format!("msgstr[{index}]"),
                    target_string: slot.clone(),
                })
                .collect(),
            None => vec![TranslatedString {
                source_fields: vec!["msgid"],
                source_strings: vec![entry.msgid.clone()],
                target_field: "msgstr".to_string(),
                target_string: entry.msgstr.clone(),
            }],
        };

        LintedEntry {
            msgid: entry.msgid.clone(),
            linenum: entry.linenum,
            strings,
        }
    }

    /// Build a finding against one of this entry's target strings
    pub(crate) fn message(
        &self,
        severity: Severity,
        code: &'static str,
        text: String,
        target: &TranslatedString,
    ) -> LintMessage {
        LintMessage {
            severity,
            code,
            text,
            line: self.linenum,
            target_field: target.target_field.clone(),
            msgid: self.msgid.clone(),
            target_string: target.target_string.clone(),
        }
    }
}

/// Ordered set-difference of two token lists.
///
/// Returns `(missing, invalid)`: tokens present in `source` but not
/// `target`, and tokens present in `target` but not `source`. Inputs are
/// deduplicated lists, so this is a plain set difference that preserves
/// order of appearance.
pub(crate) fn compare_token_lists(
    source: &[String],
    target: &[String],
) -> (Vec<String>, Vec<String>) {
    let missing = source
        .iter()
        .filter(|token| !target.contains(token))
        .cloned()
        .collect();
    let invalid = target
        .iter()
        .filter(|token| !source.contains(token))
        .cloned()
        .collect();
    (missing, invalid)
}

/// Runs a selected rule set over catalog entries
pub struct Linter {
    vartok: VariableTokenizer,
    rules: Vec<&'static dyn LintRule>,
}

impl Linter {
    /// Build a linter from comma-separated format and rule lists.
    ///
    /// Rules may be selected by code or by name; an empty rule list
    /// selects every registered rule. Unknown names fail construction.
    pub fn new(formats_spec: &str, rules_spec: &str) -> Result<Self, ConfigError> {
        let vartok = VariableTokenizer::new(formats_spec)?;
        let rules = rules::resolve_rules(rules_spec)?;
        Ok(Linter { vartok, rules })
    }

    /// Lint a sequence of entries, returning every finding in entry order.
    ///
    /// Untranslated, fuzzy, and obsolete entries are skipped, as are
    /// entries carrying a `polint-ignore: all` directive. A directive
    /// naming an unknown code is a configuration error, not silently
    /// ignored.
    pub fn verify_entries(
        &self,
        entries: &[TranslationEntry],
    ) -> Result<Vec<LintMessage>, ConfigError> {
        let mut messages = Vec::new();

        for entry in entries {
            if entry.obsolete || entry.is_fuzzy() || !entry.is_translated() {
                trace!("skipping unlintable entry at line {}", entry.linenum);
                continue;
            }

            let suppressed = match parse_ignore_directive(&entry.translator_comment) {
                IgnoreDirective::None => Vec::new(),
                IgnoreDirective::All => continue,
                IgnoreDirective::Codes(codes) => {
                    for code in &codes {
                        if !rules::is_known_code(code) {
                            return Err(ConfigError::UnknownSuppressedCode {
                                code: code.clone(),
                                line: entry.linenum,
                            });
                        }
                    }
                    codes
                }
            };

            let linted = LintedEntry::from_entry(entry);
            for rule in &self.rules {
                let findings = rule.lint(&self.vartok, &linted);
                messages.extend(
                    findings
                        .into_iter()
                        .filter(|message| !suppressed.iter().any(|code| code == message.code)),
                );
            }
        }

        debug!("linted {} entries, {} findings", entries.len(), messages.len());
        Ok(messages)
    }
}
