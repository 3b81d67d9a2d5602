/*!
 * Gettext PO catalog model, parser, and serializer.
 *
 * The core engines never touch the filesystem; they consume
 * [`TranslationEntry`] records produced here. The parser is line based and
 * deliberately forgiving about layout (blank-line separation, continuation
 * strings, comment ordering) while rejecting lines it cannot interpret.
 */

use log::debug;

use crate::errors::CatalogError;

/// One message of a catalog: a source string and its translation(s)
#[derive(Debug, Clone, Default)]
pub struct TranslationEntry {
    /// Source string
    pub msgid: String,
    /// Plural source string, when the entry is pluralized
    pub msgid_plural: Option<String>,
    /// Translated string (singular entries)
    pub msgstr: String,
    /// Translated plural forms, indexed by msgstr[n] (plural entries)
    pub msgstr_plural: Vec<String>,
    /// Message context (msgctxt)
    pub msgctxt: Option<String>,
    /// Entry flags from `#,` lines, e.g. "fuzzy", "python-format"
    pub flags: Vec<String>,
    /// Translator comment (`# ` lines); may carry an ignore directive
    pub translator_comment: String,
    /// Extracted comment (`#.` lines)
    pub extracted_comment: String,
    /// Source locations (`#:` lines)
    pub references: Vec<String>,
    /// 1-based line number of the entry in the catalog source
    pub linenum: usize,
    /// Entry was marked obsolete (`#~`)
    pub obsolete: bool,
}

impl TranslationEntry {
    /// Create an entry with the given source string
    pub fn new(msgid: impl Into<String>) -> Self {
        TranslationEntry {
            msgid: msgid.into(),
            ..TranslationEntry::default()
        }
    }

    /// Whether the entry carries the fuzzy (needs-review) flag
    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|flag| flag == "fuzzy")
    }

    /// Whether the entry is pluralized
    pub fn has_plural(&self) -> bool {
        self.msgid_plural.is_some()
    }

    /// All target strings of this entry, in slot order
    pub fn target_strings(&self) -> Vec<&str> {
        if self.has_plural() {
            self.msgstr_plural.iter().map(String::as_str).collect()
        } else {
            vec![self.msgstr.as_str()]
        }
    }

    /// Whether at least one target slot holds a non-empty string
    pub fn is_translated(&self) -> bool {
        self.target_strings().iter().any(|s| !s.is_empty())
    }
}

/// A parsed PO catalog: header metadata plus ordered entries
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Header metadata in declaration order
    pub metadata: Vec<(String, String)>,
    /// Comments attached to the header entry
    pub header_comment: String,
    /// The catalog entries, header excluded
    pub entries: Vec<TranslationEntry>,
}

impl Catalog {
    /// Look up a header metadata value
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a header metadata value, replacing any existing one
    pub fn set_metadata(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.metadata.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_string();
        } else {
            self.metadata.push((key.to_string(), value.to_string()));
        }
    }

    /// Parse a catalog from PO source text
    pub fn parse(source: &str) -> Result<Catalog, CatalogError> {
        Parser::default().parse(source)
    }

    /// Serialize the catalog back to PO source text
    pub fn to_po_string(&self) -> String {
        let mut out = String::new();

        // Header entry
        if !self.header_comment.is_empty() {
            for line in self.header_comment.lines() {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("msgid \"\"\n");
        out.push_str("msgstr \"\"\n");
        for (key, value) in &self.metadata {
            out.push_str(&format!("\"{}\"\n", escape(&format!("{key}: {value}\n"))));
        }

        for entry in &self.entries {
            out.push('\n');
            write_entry(&mut out, entry);
        }

        out
    }
}

fn write_entry(out: &mut String, entry: &TranslationEntry) {
    for line in entry.translator_comment.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    for line in entry.extracted_comment.lines() {
        out.push_str("#. ");
        out.push_str(line);
        out.push('\n');
    }
    for reference in &entry.references {
        out.push_str("#: ");
        out.push_str(reference);
        out.push('\n');
    }
    if !entry.flags.is_empty() {
        out.push_str("#, ");
        out.push_str(&entry.flags.join(", "));
        out.push('\n');
    }
    let prefix = if entry.obsolete { "#~ " } else { "" };
    if let Some(msgctxt) = &entry.msgctxt {
        out.push_str(&format!("{prefix}msgctxt \"{}\"\n", escape(msgctxt)));
    }
    out.push_str(&format!("{prefix}msgid \"{}\"\n", escape(&entry.msgid)));
    if let Some(plural) = &entry.msgid_plural {
        out.push_str(&format!("{prefix}msgid_plural \"{}\"\n", escape(plural)));
        for (index, slot) in entry.msgstr_plural.iter().enumerate() {
            out.push_str(&format!("{prefix}msgstr[{index}] \"{}\"\n", escape(slot)));
        }
    } else {
        out.push_str(&format!("{prefix}msgstr \"{}\"\n", escape(&entry.msgstr)));
    }
}

/// Escape a string for a PO quoted literal
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Unescape a PO quoted literal body
fn unescape(s: &str, linenum: usize) -> Result<String, CatalogError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                // Unknown escape: keep it verbatim rather than guessing
                out.push('\\');
                out.push(other);
            }
            None => return Err(CatalogError::syntax(linenum, "trailing backslash in string")),
        }
    }
    Ok(out)
}

/// Which string field continuation lines currently append to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Msgctxt,
    Msgid,
    MsgidPlural,
    Msgstr,
    MsgstrPlural(usize),
}

impl Default for Field {
    fn default() -> Self {
        Field::None
    }
}

#[derive(Default)]
struct Parser {
    entries: Vec<TranslationEntry>,
    current: TranslationEntry,
    field: Field,
    started: bool,
}

impl Parser {
    fn parse(mut self, source: &str) -> Result<Catalog, CatalogError> {
        for (index, raw_line) in source.lines().enumerate() {
            let linenum = index + 1;
            let line = raw_line.trim();

            if line.is_empty() {
                self.finish_entry();
                continue;
            }

            let (line, obsolete) = match line.strip_prefix("#~") {
                Some(rest) => (rest.trim(), true),
                None => (line, false),
            };
            if obsolete {
                self.current.obsolete = true;
            }

            self.begin_entry(linenum);

            if let Some(rest) = line.strip_prefix("#,") {
                self.current
                    .flags
                    .extend(rest.split(',').map(str::trim).filter(|f| !f.is_empty()).map(str::to_string));
            } else if let Some(rest) = line.strip_prefix("#:") {
                self.current.references.push(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("#.") {
                push_comment_line(&mut self.current.extracted_comment, rest.trim());
            } else if let Some(rest) = line.strip_prefix('#') {
                push_comment_line(
                    &mut self.current.translator_comment,
                    rest.strip_prefix(' ').unwrap_or(rest),
                );
            } else if let Some(rest) = line.strip_prefix("msgid_plural") {
                self.current.msgid_plural = Some(quoted(rest, linenum)?);
                self.field = Field::MsgidPlural;
            } else if let Some(rest) = line.strip_prefix("msgid") {
                // A new msgid after a translation starts the next entry
                // even without a separating blank line.
                if self.field != Field::None && self.field != Field::Msgctxt {
                    self.finish_entry();
                    self.begin_entry(linenum);
                }
                self.current.msgid = quoted(rest, linenum)?;
                self.field = Field::Msgid;
            } else if let Some(rest) = line.strip_prefix("msgstr[") {
                let close = rest
                    .find(']')
                    .ok_or_else(|| CatalogError::syntax(linenum, "malformed msgstr[n]"))?;
                let slot: usize = rest[..close]
                    .parse()
                    .map_err(|_| CatalogError::syntax(linenum, "malformed msgstr[n] index"))?;
                let value = quoted(&rest[close + 1..], linenum)?;
                if self.current.msgstr_plural.len() <= slot {
                    self.current.msgstr_plural.resize(slot + 1, String::new());
                }
                self.current.msgstr_plural[slot] = value;
                self.field = Field::MsgstrPlural(slot);
            } else if let Some(rest) = line.strip_prefix("msgstr") {
                self.current.msgstr = quoted(rest, linenum)?;
                self.field = Field::Msgstr;
            } else if let Some(rest) = line.strip_prefix("msgctxt") {
                self.current.msgctxt = Some(quoted(rest, linenum)?);
                self.field = Field::Msgctxt;
            } else if line.starts_with('"') {
                let value = quoted(line, linenum)?;
                match self.field {
                    Field::None => {
                        return Err(CatalogError::syntax(
                            linenum,
                            "continuation string outside an entry",
                        ));
                    }
                    Field::Msgctxt => match &mut self.current.msgctxt {
                        Some(ctxt) => ctxt.push_str(&value),
                        None => self.current.msgctxt = Some(value),
                    },
                    Field::Msgid => self.current.msgid.push_str(&value),
                    Field::MsgidPlural => {
                        if let Some(plural) = &mut self.current.msgid_plural {
                            plural.push_str(&value);
                        }
                    }
                    Field::Msgstr => self.current.msgstr.push_str(&value),
                    Field::MsgstrPlural(slot) => self.current.msgstr_plural[slot].push_str(&value),
                }
            } else {
                return Err(CatalogError::syntax(
                    linenum,
                    format!("unrecognized line: {line}"),
                ));
            }
        }
        self.finish_entry();

        // Peel the header entry (empty msgid) off into metadata.
        let mut catalog = Catalog::default();
        let mut entries = self.entries.into_iter();
        let mut rest: Vec<TranslationEntry> = Vec::new();
        if let Some(first) = entries.next() {
            if first.msgid.is_empty() && first.msgctxt.is_none() {
                catalog.header_comment = first.translator_comment;
                for line in first.msgstr.lines() {
                    if let Some((key, value)) = line.split_once(':') {
                        catalog
                            .metadata
                            .push((key.trim().to_string(), value.trim().to_string()));
                    }
                }
            } else {
                rest.push(first);
            }
        }
        rest.extend(entries);
        catalog.entries = rest;
        debug!(
            "parsed catalog: {} entries, {} metadata keys",
            catalog.entries.len(),
            catalog.metadata.len()
        );
        Ok(catalog)
    }

    fn begin_entry(&mut self, linenum: usize) {
        if !self.started {
            self.started = true;
            self.current.linenum = linenum;
        }
    }

    fn finish_entry(&mut self) {
        if self.started {
            let entry = std::mem::take(&mut self.current);
            self.entries.push(entry);
            self.started = false;
            self.field = Field::None;
        }
    }
}

fn push_comment_line(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(line);
}

/// Parse the quoted part of a keyword line, e.g. the `"text"` in
/// `msgid "text"`
fn quoted(rest: &str, linenum: usize) -> Result<String, CatalogError> {
    let trimmed = rest.trim();
    let body = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| CatalogError::syntax(linenum, "expected a quoted string"))?;
    unescape(body, linenum)
}
