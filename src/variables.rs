/*!
 * Variable-format registry and tokenizer.
 *
 * Interpolation variables come in several syntaxes (percent markers like
 * `%(count)s`, brace markers like `{name!r:>8}`). Each syntax is described
 * by a [`VariableFormat`] in a static registry; a [`VariableTokenizer`]
 * composes a chosen subset of formats into one combined recognizer that can
 * split text into plain/variable segments, extract the variable substrings,
 * and pull the variable name out of a single token.
 */

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigError;

/// Percent conversion characters.
///
/// Note: this doesn't include `X`, `E` or `F` because of problems with
/// false positives and urlencoding. Those aren't getting used in gettext
/// contexts anyhow. The space flag is left out for the same reason;
/// accepting it would turn prose like "100% sure" into a variable.
const PERCENT_PATTERN: &str = r"%(?:\([^)\s]+?\))?[#0+-]?[\.\d\*]*[hlL]?[diouxefGgcrs]";

/// Brace markers: `{`, optional name, optional `!conversion`, optional
/// `:format_spec`, `}`. Whitespace inside a marker disqualifies it.
const BRACE_PATTERN: &str = r"\{\S*?\}";

/// One variable syntax: a recognition pattern, its literal escapes, and a
/// name extractor. Immutable, registered once into [`VARIABLE_FORMATS`].
pub struct VariableFormat {
    /// Selection name, e.g. "pysprintf"
    pub name: &'static str,
    /// Human-readable description for --help output
    pub desc: &'static str,
    /// Recognition pattern (un-anchored, no capture groups)
    pattern: &'static str,
    /// Literal escapes and their same-length sentinel substitutions.
    /// Escapes are neutralized before any scan so they are never
    /// tokenized and never reported as malformed.
    escapes: &'static [(&'static str, &'static str)],
    /// Extracts the variable name from a token of this format.
    /// Returns None for unnamed (positional) tokens.
    extract_name: fn(&str) -> Option<String>,
}

fn percent_name(token: &str) -> Option<String> {
    let rest = token.strip_prefix("%(")?;
    rest.find(')').map(|end| rest[..end].to_string())
}

fn brace_name(token: &str) -> Option<String> {
    let body = token.strip_prefix('{')?.strip_suffix('}')?;
    let name: &str = body.split(['!', ':']).next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// The process-wide, read-only format registry.
static VARIABLE_FORMATS: &[VariableFormat] = &[
    VariableFormat {
        name: "pysprintf",
        desc: "Python sprintf syntax (e.g. \"%s\", \"%(foo)s\")",
        pattern: PERCENT_PATTERN,
        escapes: &[("%%", "\u{1}\u{1}")],
        extract_name: percent_name,
    },
    VariableFormat {
        name: "pyformat",
        desc: "Python format string syntax (e.g. \"{0}\", \"{foo}\")",
        pattern: BRACE_PATTERN,
        escapes: &[("{{", "\u{2}\u{2}"), ("}}", "\u{3}\u{3}")],
        extract_name: brace_name,
    },
];

/// All registered variable formats, for --help output and validation
pub fn available_formats() -> &'static [VariableFormat] {
    VARIABLE_FORMATS
}

fn lookup_format(name: &str) -> Option<&'static VariableFormat> {
    VARIABLE_FORMATS.iter().find(|f| f.name == name)
}

/// One piece of tokenized text: either plain text or a variable token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The segment text, borrowed from the input
    pub text: &'a str,
    /// True when this segment is a recognized variable token
    pub is_variable: bool,
}

/// Combined recognizer over an ordered selection of variable formats.
///
/// The combined pattern is built once at construction and the tokenizer is
/// read-only thereafter. Selecting an unknown format name fails
/// construction with [`ConfigError::UnknownFormat`].
pub struct VariableTokenizer {
    formats: Vec<&'static VariableFormat>,
    combined: Regex,
    anchored: Regex,
    per_format: Vec<Regex>,
}

impl VariableTokenizer {
    /// Build a tokenizer from a comma-separated list of format names,
    /// e.g. `"pysprintf,pyformat"`. Empty items are ignored.
    pub fn new(formats_spec: &str) -> Result<Self, ConfigError> {
        let names: Vec<&str> = formats_spec
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut formats = Vec::with_capacity(names.len());
        for name in names {
            let format =
                lookup_format(name).ok_or_else(|| ConfigError::UnknownFormat(name.to_string()))?;
            formats.push(format);
        }

        let alternation = formats
            .iter()
            .map(|f| f.pattern)
            .collect::<Vec<_>>()
            .join("|");
        // An empty selection recognizes nothing; never-matching pattern.
        let combined_src = if formats.is_empty() {
            "[^\\s\\S]".to_string()
        } else {
            format!("(?:{alternation})")
        };

        let combined = Regex::new(&combined_src)
            .map_err(|_| ConfigError::UnknownFormat(formats_spec.to_string()))?;
        let anchored = Regex::new(&format!("^(?:{combined_src})$"))
            .map_err(|_| ConfigError::UnknownFormat(formats_spec.to_string()))?;
        let per_format = formats
            .iter()
            .map(|f| Regex::new(&format!("^(?:{})$", f.pattern)).expect("Invalid format pattern"))
            .collect();

        Ok(VariableTokenizer {
            formats,
            combined,
            anchored,
            per_format,
        })
    }

    /// Does this tokenizer include the named format?
    pub fn contains(&self, format_name: &str) -> bool {
        self.formats.iter().any(|f| f.name == format_name)
    }

    /// Neutralize literal escapes (`%%`, `{{`, `}}`) of the selected
    /// formats via same-length sentinel substitution. Byte offsets in the
    /// result line up with the original text, so matches found in the
    /// masked text can be sliced out of the original.
    pub fn mask_escapes<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let needs_mask = self
            .formats
            .iter()
            .flat_map(|f| f.escapes)
            .any(|(escape, _)| text.contains(escape));
        if !needs_mask {
            return Cow::Borrowed(text);
        }

        let mut masked = text.to_string();
        for format in &self.formats {
            for (escape, sentinel) in format.escapes {
                masked = masked.replace(escape, sentinel);
            }
        }
        Cow::Owned(masked)
    }

    /// Undo [`mask_escapes`](Self::mask_escapes), turning sentinels back
    /// into their literal escapes. Used to rebuild readable report text
    /// from slices of masked strings.
    pub fn restore_escapes(&self, text: &str) -> String {
        let mut restored = text.to_string();
        for format in &self.formats {
            for (escape, sentinel) in format.escapes {
                restored = restored.replace(sentinel, escape);
            }
        }
        restored
    }

    /// Split `text` into ordered plain/variable segments.
    ///
    /// Joining the segment texts reproduces `text` exactly.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Segment<'a>> {
        let masked = self.mask_escapes(text);
        let mut segments = Vec::new();
        let mut last = 0;

        for m in self.combined.find_iter(&masked) {
            if m.start() > last {
                segments.push(Segment {
                    text: &text[last..m.start()],
                    is_variable: false,
                });
            }
            segments.push(Segment {
                text: &text[m.start()..m.end()],
                is_variable: true,
            });
            last = m.end();
        }

        if last < text.len() || segments.is_empty() {
            segments.push(Segment {
                text: &text[last..],
                is_variable: false,
            });
        }

        segments
    }

    /// The variable tokens present in `text`, in order of appearance.
    ///
    /// With `unique` set, later duplicates are dropped; otherwise every
    /// occurrence is returned (a multiset).
    pub fn extract_tokens(&self, text: &str, unique: bool) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .tokenize(text)
            .into_iter()
            .filter(|segment| segment.is_variable)
            .map(|segment| segment.text.to_string())
            .collect();

        if unique {
            let mut seen = Vec::with_capacity(tokens.len());
            tokens.retain(|token| {
                if seen.contains(token) {
                    false
                } else {
                    seen.push(token.clone());
                    true
                }
            });
        }

        tokens
    }

    /// True when a variable token begins exactly at byte `index` of
    /// `text`. Callers scanning for marker characters use this to tell a
    /// real token from a stray marker.
    pub fn token_starts_at(&self, text: &str, index: usize) -> bool {
        self.combined
            .find_at(text, index)
            .is_some_and(|m| m.start() == index)
    }

    /// True iff `text` fully matches the combined grammar
    pub fn is_token(&self, text: &str) -> bool {
        let masked = self.mask_escapes(text);
        self.anchored.is_match(&masked)
    }

    /// Extract the variable name from a single token, dispatching to the
    /// owning format. Returns None when `token` is not recognized or the
    /// token is unnamed (e.g. `%s`, `{}`, `{0:>8}` keeps its name "0").
    pub fn extract_variable_name(&self, token: &str) -> Option<String> {
        for (format, regex) in self.formats.iter().zip(&self.per_format) {
            if regex.is_match(token) {
                return (format.extract_name)(token);
            }
        }
        None
    }

    /// True when `token` is an unnamed positional percent token such as
    /// `%s` or `%.2f`. Omitting one of these breaks interpolation, so the
    /// missing-variables rule escalates them to errors.
    pub fn is_positional_percent(&self, token: &str) -> bool {
        self.formats
            .iter()
            .zip(&self.per_format)
            .filter(|(format, _)| format.name == "pysprintf")
            .any(|(_, regex)| regex.is_match(token) && !token.starts_with("%("))
    }
}

/// Matches an ignore directive in a translator comment:
/// `polint-ignore: all` or `polint-ignore: E101,W202`
static IGNORE_DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"polint-ignore:\s+(all|[EW0-9,\s]+)").expect("Invalid ignore directive regex")
});

/// Rules to skip for one entry, as parsed from its translator comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreDirective {
    /// No directive present
    None,
    /// `polint-ignore: all` — skip the entry entirely
    All,
    /// `polint-ignore: CODE,...` — skip messages with those codes
    Codes(Vec<String>),
}

/// Parse an ignore directive out of a translator comment.
///
/// A comment that doesn't match the directive pattern yields
/// [`IgnoreDirective::None`]; validation of the listed codes against the
/// rule catalogue happens in the lint engine, where an unknown code is a
/// configuration error.
pub fn parse_ignore_directive(comment: &str) -> IgnoreDirective {
    let Some(captures) = IGNORE_DIRECTIVE_REGEX.captures(comment) else {
        return IgnoreDirective::None;
    };

    let spec = captures[1].trim();
    if spec == "all" {
        return IgnoreDirective::All;
    }

    let codes: Vec<String> = spec
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect();
    IgnoreDirective::Codes(codes)
}
