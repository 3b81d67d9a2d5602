/*!
 * The lint rule catalogue.
 *
 * Every rule is a stateless function from a normalized entry to zero or
 * more coded findings. Codes follow a fixed scheme: `E1xx` malformed
 * syntax, `E2xx`/`W2xx` variable consistency, `W3xx` content quality.
 * Adding a rule means adding one entry to [`RULES`].
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigError;
use crate::linter::{LintMessage, LintedEntry, Severity, compare_token_lists};
use crate::pipeline::html::segment_markup;
use crate::tokens::TokenKind;
use crate::variables::VariableTokenizer;

/// One lint rule: a pure function of `(tokenizer, entry) -> findings`
pub trait LintRule: Send + Sync {
    /// Primary rule code, e.g. "W202"
    fn code(&self) -> &'static str;

    /// Selection name, e.g. "missing-variables"
    fn name(&self) -> &'static str;

    /// Human-readable description for --help output
    fn desc(&self) -> &'static str;

    /// Every code this rule can emit, primary first
    fn codes(&self) -> &'static [&'static str];

    /// Evaluate the rule; never fails, only reports
    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage>;
}

/// The process-wide rule catalogue. Adding a rule means adding one entry
/// here.
static RULES: &[&dyn LintRule] = &[
    &MalformedNoTypeRule,
    &MissingRightBraceRule,
    &MissingLeftBraceRule,
    &BadFormatCharacterRule,
    &InvalidVariablesRule,
    &MissingVariablesRule,
    &BlankRule,
    &UnchangedRule,
    &HtmlMismatchRule,
];

/// All registered rules, for --help output
pub fn available_rules() -> &'static [&'static dyn LintRule] {
    RULES
}

/// Whether `code` is one a registered rule can emit
pub(crate) fn is_known_code(code: &str) -> bool {
    RULES
        .iter()
        .any(|rule| rule.codes().iter().any(|c| *c == code))
}

/// Resolve a comma-separated rule list against the catalogue, by code or
/// by name. An empty list selects every rule.
pub(crate) fn resolve_rules(
    rules_spec: &str,
) -> Result<Vec<&'static dyn LintRule>, ConfigError> {
    let names: Vec<&str> = rules_spec
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    if names.is_empty() {
        return Ok(RULES.to_vec());
    }

    names
        .into_iter()
        .map(|name| {
            RULES
                .iter()
                .copied()
                .find(|rule| rule.code() == name || rule.name() == name)
                .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
        })
        .collect()
}

/// The variable tokens of all source strings, deduplicated, in order of
/// first appearance across the strings.
fn source_tokens(vartok: &VariableTokenizer, source_strings: &[String]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for source in source_strings {
        for token in vartok.extract_tokens(source, true) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}

/// A named percent token with no trailing conversion character, e.g.
/// `%(count)` where `%(count)s` was meant
pub struct MalformedNoTypeRule;

static NAMED_PERCENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\([^)\s]+?\)").expect("Invalid named percent regex"));

impl LintRule for MalformedNoTypeRule {
    fn code(&self) -> &'static str {
        "E101"
    }

    fn name(&self) -> &'static str {
        "malformed-no-type"
    }

    fn desc(&self) -> &'static str {
        "Checks for named percent variables missing a type"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["E101"]
    }

    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        if !vartok.contains("pysprintf") {
            return messages;
        }

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            let masked = vartok.mask_escapes(&target.target_string);
            for m in NAMED_PERCENT_REGEX.find_iter(&masked) {
                // A full valid token starting here means the name is fine.
                if vartok.token_starts_at(&masked, m.start()) {
                    continue;
                }
                messages.push(entry.message(
                    Severity::Err,
                    "E101",
                    format!("type missing: {}", m.as_str()),
                    target,
                ));
            }
        }
        messages
    }
}

/// A left curly-brace with no matching right brace
pub struct MissingRightBraceRule;

static MISSING_RIGHT_BRACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^\}]*(?:\{|$)").expect("Invalid missing right brace regex"));

impl LintRule for MissingRightBraceRule {
    fn code(&self) -> &'static str {
        "E102"
    }

    fn name(&self) -> &'static str {
        "missing-right-brace"
    }

    fn desc(&self) -> &'static str {
        "Checks for brace variables missing the right brace"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["E102"]
    }

    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        if !vartok.contains("pyformat") {
            return messages;
        }

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            // Doubled braces are neutralized first so literals never scan
            // as malformed; the match is restored for display.
            let masked = vartok.mask_escapes(&target.target_string);
            for m in MISSING_RIGHT_BRACE_REGEX.find_iter(&masked) {
                messages.push(entry.message(
                    Severity::Err,
                    "E102",
                    format!(
                        "missing right curly-brace: {}",
                        vartok.restore_escapes(m.as_str())
                    ),
                    target,
                ));
            }
        }
        messages
    }
}

/// A right curly-brace with no matching left brace
pub struct MissingLeftBraceRule;

static MISSING_LEFT_BRACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\})[^\{\}]*\}").expect("Invalid missing left brace regex"));

impl LintRule for MissingLeftBraceRule {
    fn code(&self) -> &'static str {
        "E103"
    }

    fn name(&self) -> &'static str {
        "missing-left-brace"
    }

    fn desc(&self) -> &'static str {
        "Checks for brace variables missing the left brace"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["E103"]
    }

    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        if !vartok.contains("pyformat") {
            return messages;
        }

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            let masked = vartok.mask_escapes(&target.target_string);
            for m in MISSING_LEFT_BRACE_REGEX.find_iter(&masked) {
                messages.push(entry.message(
                    Severity::Err,
                    "E103",
                    format!(
                        "missing left curly-brace: {}",
                        vartok.restore_escapes(m.as_str())
                    ),
                    target,
                ));
            }
        }
        messages
    }
}

/// A `%` followed by a character that isn't a valid conversion.
///
/// Only meaningful when the sources actually use unnamed percent tokens;
/// otherwise a stray `%` is almost certainly prose or urlencoding. A
/// candidate that appears verbatim in a source string is excused for the
/// same reason, e.g. strftime patterns inside a brace variable.
pub struct BadFormatCharacterRule;

impl LintRule for BadFormatCharacterRule {
    fn code(&self) -> &'static str {
        "E104"
    }

    fn name(&self) -> &'static str {
        "bad-format-character"
    }

    fn desc(&self) -> &'static str {
        "Checks for percent tokens with a bad format character"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["E104"]
    }

    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        if !vartok.contains("pysprintf") {
            return messages;
        }

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            let uses_positional = target.source_strings.iter().any(|source| {
                vartok
                    .extract_tokens(source, true)
                    .iter()
                    .any(|token| vartok.is_positional_percent(token))
            });
            if !uses_positional {
                continue;
            }

            let masked = vartok.mask_escapes(&target.target_string);
            for (index, _) in masked.match_indices('%') {
                if vartok.token_starts_at(&masked, index) {
                    continue;
                }
                match masked[index + 1..].chars().next() {
                    None => {
                        messages.push(entry.message(
                            Severity::Err,
                            "E104",
                            "bad format character: %".to_string(),
                            target,
                        ));
                    }
                    Some(next) if next.is_ascii_alphabetic() => {
                        let candidate = format!("%{next}");
                        if target
                            .source_strings
                            .iter()
                            .any(|source| source.contains(&candidate))
                        {
                            continue;
                        }
                        messages.push(entry.message(
                            Severity::Err,
                            "E104",
                            format!("bad format character: {candidate}"),
                            target,
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
        messages
    }
}

/// A variable in the target that isn't in any source string
pub struct InvalidVariablesRule;

impl LintRule for InvalidVariablesRule {
    fn code(&self) -> &'static str {
        "E201"
    }

    fn name(&self) -> &'static str {
        "invalid-variables"
    }

    fn desc(&self) -> &'static str {
        "Checks for variables not present in the source string"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["E201"]
    }

    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            let source = source_tokens(vartok, &target.source_strings);
            let found = vartok.extract_tokens(&target.target_string, true);
            let (_, mut invalid) = compare_token_lists(&source, &found);

            // A variable-free source can't have a target interpolated
            // with percent arguments, so percent lookalikes there are
            // urlencoding or prose, not mistakes.
            if source.is_empty() {
                invalid.retain(|token| !vartok.is_positional_percent(token));
            }

            if !invalid.is_empty() {
                messages.push(entry.message(
                    Severity::Err,
                    "E201",
                    format!("invalid variables: {}", invalid.join(", ")),
                    target,
                ));
            }
        }
        messages
    }
}

/// A source variable absent from the target.
///
/// Normally a warning: for brace and named percent variables the string
/// still renders. An unnamed positional percent variable is different;
/// dropping one breaks interpolation outright, so those escalate to the
/// error code E202.
pub struct MissingVariablesRule;

impl LintRule for MissingVariablesRule {
    fn code(&self) -> &'static str {
        "W202"
    }

    fn name(&self) -> &'static str {
        "missing-variables"
    }

    fn desc(&self) -> &'static str {
        "Checks for source variables missing from the translation"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["W202", "E202"]
    }

    fn lint(&self, vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            let source = source_tokens(vartok, &target.source_strings);
            let found = vartok.extract_tokens(&target.target_string, true);
            let (missing, _) = compare_token_lists(&source, &found);

            let (positional, named): (Vec<String>, Vec<String>) = missing
                .into_iter()
                .partition(|token| vartok.is_positional_percent(token));

            if !named.is_empty() {
                messages.push(entry.message(
                    Severity::Warn,
                    "W202",
                    format!("missing variables: {}", named.join(", ")),
                    target,
                ));
            }
            if !positional.is_empty() {
                messages.push(entry.message(
                    Severity::Err,
                    "E202",
                    format!("missing variables: {}", positional.join(", ")),
                    target,
                ));
            }
        }
        messages
    }
}

/// A target that is non-empty but solely whitespace
pub struct BlankRule;

impl LintRule for BlankRule {
    fn code(&self) -> &'static str {
        "W301"
    }

    fn name(&self) -> &'static str {
        "blank"
    }

    fn desc(&self) -> &'static str {
        "Checks for translations that are solely whitespace"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["W301"]
    }

    fn lint(&self, _vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        for target in &entry.strings {
            let s = &target.target_string;
            if !s.is_empty() && s.chars().all(char::is_whitespace) {
                messages.push(entry.message(
                    Severity::Warn,
                    "W301",
                    "translated string is solely whitespace".to_string(),
                    target,
                ));
            }
        }
        messages
    }
}

/// A target textually identical to a source string
pub struct UnchangedRule;

impl LintRule for UnchangedRule {
    fn code(&self) -> &'static str {
        "W302"
    }

    fn name(&self) -> &'static str {
        "unchanged"
    }

    fn desc(&self) -> &'static str {
        "Checks for translations that are the same as the source"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["W302"]
    }

    fn lint(&self, _vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();
        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }
            if target.source_strings.contains(&target.target_string) {
                messages.push(entry.message(
                    Severity::Warn,
                    "W302",
                    "translated string is same as source string".to_string(),
                    target,
                ));
            }
        }
        messages
    }
}

/// The target's HTML structure differs from the source's.
///
/// Emits W303 for a structural difference and E105 for markup the
/// segmenter cannot parse at all. Markup order is legitimately allowed to
/// change across languages, so the tag sequences are sorted before the
/// positional compare; the report cites exactly the first difference.
pub struct HtmlMismatchRule;

fn markup_sequence(text: &str) -> Result<Vec<String>, crate::errors::MarkupError> {
    let tokens = segment_markup(text)?;
    let mut sequence: Vec<String> = tokens
        .into_iter()
        .filter(|token| token.kind == TokenKind::Html)
        .map(|token| token.text)
        .collect();
    sequence.sort();
    Ok(sequence)
}

impl LintRule for HtmlMismatchRule {
    fn code(&self) -> &'static str {
        "W303"
    }

    fn name(&self) -> &'static str {
        "html-mismatch"
    }

    fn desc(&self) -> &'static str {
        "Checks for HTML structure differences between source and translation"
    }

    fn codes(&self) -> &'static [&'static str] {
        &["W303", "E105"]
    }

    fn lint(&self, _vartok: &VariableTokenizer, entry: &LintedEntry) -> Vec<LintMessage> {
        let mut messages = Vec::new();

        for target in &entry.strings {
            if target.target_string.is_empty() {
                continue;
            }

            let mut source_sequences = Vec::new();
            let mut source_failed = false;
            for source in &target.source_strings {
                match markup_sequence(source) {
                    Ok(sequence) => source_sequences.push(sequence),
                    Err(err) => {
                        messages.push(entry.message(
                            Severity::Err,
                            "E105",
                            format!("unparseable markup: {err}"),
                            target,
                        ));
                        source_failed = true;
                    }
                }
            }

            let target_sequence = match markup_sequence(&target.target_string) {
                Ok(sequence) => sequence,
                Err(err) => {
                    messages.push(entry.message(
                        Severity::Err,
                        "E105",
                        format!("unparseable markup: {err}"),
                        target,
                    ));
                    continue;
                }
            };
            if source_failed {
                continue;
            }

            // When the plural sources already disagree with each other
            // there is no reference structure to hold the target to.
            if source_sequences.windows(2).any(|pair| pair[0] != pair[1]) {
                continue;
            }
            let source_sequence = &source_sequences[0];

            let len = source_sequence.len().max(target_sequence.len());
            for i in 0..len {
                let expected = source_sequence.get(i).map(String::as_str).unwrap_or("");
                let got = target_sequence.get(i).map(String::as_str).unwrap_or("");
                if expected != got {
                    messages.push(entry.message(
                        Severity::Warn,
                        "W303",
                        format!("different html: \"{expected}\" vs. \"{got}\""),
                        target,
                    ));
                    break;
                }
            }
        }
        messages
    }
}
