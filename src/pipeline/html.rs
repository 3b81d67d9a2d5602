/*!
 * HTML-aware segmentation stage.
 *
 * Reparses a token's text and splits it into immutable markup, immutable
 * style/script bodies, and mutable human-visible text, so later stages can
 * rewrite only the text a reader actually sees. The values of translatable
 * attributes (`alt`, `title`, `placeholder`) become their own mutable
 * tokens; entity references become single atomic immutable tokens.
 *
 * This is deliberately not a validator: a `<` that opens no recognizable
 * construct is ordinary text. Only constructs that start but never end
 * (tags, comments, quoted attribute values) are reported as
 * [`MarkupError`]s — during translation that aborts the file, during
 * linting it is downgraded to a diagnostic.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::MarkupError;
use crate::pipeline::Transform;
use crate::tokens::{Token, TokenKind};
use crate::variables::VariableTokenizer;

/// Attributes whose values are human-visible and therefore translatable
const TRANSLATABLE_ATTRIBUTES: &[&str] = &["alt", "title", "placeholder"];

/// Entity and character references: `&amp;`, `&#160;`, `&#xa0;`
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);")
        .expect("Invalid entity regex")
});

/// Elements whose bodies are raw text, never translated
fn raw_text_element(name: &str) -> Option<&'static str> {
    if name.eq_ignore_ascii_case("style") {
        Some("style")
    } else if name.eq_ignore_ascii_case("script") {
        Some("script")
    } else {
        None
    }
}

/// Parser state: either ordinary character data, or inside the raw-text
/// body of a style/script element.
#[derive(Clone, Copy)]
enum State {
    Data,
    RawText(&'static str),
}

/// Accumulates the output token list and the pending run of mutable text
struct Segmenter {
    tokens: Vec<Token>,
    pending: String,
}

impl Segmenter {
    fn new() -> Self {
        Segmenter {
            tokens: Vec::new(),
            pending: String::new(),
        }
    }

    /// Close out the pending mutable text run, if any
    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tokens.push(Token::text(text));
        }
    }

    fn push_immutable(&mut self, text: &str, kind: TokenKind) {
        self.flush();
        self.tokens.push(Token::immutable(text, kind));
    }

    fn push_mutable(&mut self, text: &str) {
        self.flush();
        self.tokens.push(Token::text(text));
    }
}

/// Split markup-bearing text into a token stream.
///
/// Joining the returned tokens reproduces `text` exactly.
pub fn segment_markup(text: &str) -> Result<Vec<Token>, MarkupError> {
    let bytes = text.as_bytes();
    let mut seg = Segmenter::new();
    let mut state = State::Data;
    let mut i = 0;

    while i < bytes.len() {
        if let State::RawText(element) = state {
            match find_raw_text_end(text, i, element) {
                Some(end) => {
                    if end > i {
                        let kind = if element == "style" {
                            TokenKind::Style
                        } else {
                            TokenKind::Script
                        };
                        seg.push_immutable(&text[i..end], kind);
                    }
                    // The closing tag itself is plain markup.
                    let close = find_byte(bytes, end, b'>')
                        .ok_or(MarkupError::UnterminatedTag(end))?;
                    seg.push_immutable(&text[end..=close], TokenKind::Html);
                    i = close + 1;
                    state = State::Data;
                }
                None => {
                    // No closing tag: keep the rest as an immutable body so
                    // nothing translatable leaks out of a script.
                    let kind = if element == "style" {
                        TokenKind::Style
                    } else {
                        TokenKind::Script
                    };
                    seg.push_immutable(&text[i..], kind);
                    i = bytes.len();
                }
            }
            continue;
        }

        match bytes[i] {
            b'<' if text[i..].starts_with("<!--") => {
                let end = text[i..]
                    .find("-->")
                    .map(|offset| i + offset + 3)
                    .ok_or(MarkupError::UnterminatedComment(i))?;
                seg.push_immutable(&text[i..end], TokenKind::Comment);
                i = end;
            }
            b'<' if matches!(bytes.get(i + 1), Some(b'!')) => {
                // Declarations such as <!DOCTYPE html>
                let close = find_byte(bytes, i, b'>').ok_or(MarkupError::UnterminatedTag(i))?;
                seg.push_immutable(&text[i..=close], TokenKind::Html);
                i = close + 1;
            }
            b'<' if matches!(bytes.get(i + 1), Some(b'/'))
                && matches!(bytes.get(i + 2), Some(c) if c.is_ascii_alphabetic()) =>
            {
                let close = find_byte(bytes, i, b'>').ok_or(MarkupError::UnterminatedTag(i))?;
                seg.push_immutable(&text[i..=close], TokenKind::Html);
                i = close + 1;
            }
            b'<' if matches!(bytes.get(i + 1), Some(c) if c.is_ascii_alphabetic()) => {
                let (element, next) = parse_start_tag(text, i, &mut seg)?;
                i = next;
                if let Some(element) = element {
                    state = State::RawText(element);
                }
            }
            b'<' => {
                // Opens no recognizable construct; ordinary text.
                seg.pending.push('<');
                i += 1;
            }
            b'&' => {
                if let Some(m) = ENTITY_REGEX.find_at(text, i) {
                    if m.start() == i {
                        seg.push_immutable(m.as_str(), TokenKind::Entity);
                        i = m.end();
                        continue;
                    }
                }
                seg.pending.push('&');
                i += 1;
            }
            _ => {
                // Plain character data up to the next structural byte.
                let end = text[i..]
                    .find(['<', '&'])
                    .map(|offset| i + offset)
                    .unwrap_or(text.len());
                seg.pending.push_str(&text[i..end]);
                i = end;
            }
        }
    }

    seg.flush();
    Ok(seg.tokens)
}

/// Parse one start tag beginning at `start` (which is `<`).
///
/// Emits the tag as immutable markup, with the values of translatable
/// attributes emitted as their own mutable tokens. Returns the raw-text
/// element name when the tag opens a style/script body, and the index
/// just past the closing `>`.
fn parse_start_tag(
    text: &str,
    start: usize,
    seg: &mut Segmenter,
) -> Result<(Option<&'static str>, usize), MarkupError> {
    let bytes = text.as_bytes();
    let mut i = start + 1;

    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let tag_name = &text[start + 1..i];

    // Start of the current immutable markup run
    let mut seg_start = start;
    let mut self_closing = false;

    loop {
        if i >= bytes.len() {
            return Err(MarkupError::UnterminatedTag(start));
        }
        match bytes[i] {
            b'>' => {
                seg.push_immutable(&text[seg_start..=i], TokenKind::Html);
                let element = if self_closing {
                    None
                } else {
                    raw_text_element(tag_name)
                };
                return Ok((element, i + 1));
            }
            b'/' => {
                self_closing = true;
                i += 1;
            }
            c if c.is_ascii_whitespace() => {
                i += 1;
            }
            _ => {
                self_closing = false;
                let (name_start, name_end) = scan_attribute_name(bytes, i);
                i = name_end;
                // Optional whitespace around '='
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i >= bytes.len() || bytes[i] != b'=' {
                    // Bare attribute, no value
                    continue;
                }
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(MarkupError::UnterminatedTag(start));
                }

                let attr_name = &text[name_start..name_end];
                let translatable = TRANSLATABLE_ATTRIBUTES
                    .iter()
                    .any(|name| attr_name.eq_ignore_ascii_case(name));

                let (value_start, value_end) = match bytes[i] {
                    quote @ (b'"' | b'\'') => {
                        let value_start = i + 1;
                        let value_end = find_byte(bytes, value_start, quote)
                            .ok_or(MarkupError::UnterminatedAttribute(i))?;
                        i = value_end + 1;
                        (value_start, value_end)
                    }
                    _ => {
                        let value_start = i;
                        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>'
                        {
                            i += 1;
                        }
                        (value_start, i)
                    }
                };

                if translatable {
                    // Markup up to (but excluding) the value, then the
                    // value as its own mutable token, then carry on with
                    // the rest of the tag.
                    seg.push_immutable(&text[seg_start..value_start], TokenKind::Html);
                    seg.push_mutable(&text[value_start..value_end]);
                    seg_start = value_end;
                }
            }
        }
    }
}

fn scan_attribute_name(bytes: &[u8], start: usize) -> (usize, usize) {
    let mut end = start;
    while end < bytes.len()
        && !bytes[end].is_ascii_whitespace()
        && !matches!(bytes[end], b'=' | b'>' | b'/')
    {
        end += 1;
    }
    (start, end)
}

fn find_byte(bytes: &[u8], start: usize, needle: u8) -> Option<usize> {
    bytes[start..].iter().position(|&b| b == needle).map(|p| start + p)
}

/// Find the start of the `</style>`/`</script>` end tag at or after `from`
fn find_raw_text_end(text: &str, from: usize, element: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while let Some(pos) = text[i..].find("</").map(|p| i + p) {
        let name_start = pos + 2;
        let name_end = name_start + element.len();
        if name_end <= bytes.len() && text[name_start..name_end].eq_ignore_ascii_case(element) {
            let boundary = bytes.get(name_end).copied();
            if matches!(boundary, None | Some(b'>')) || boundary.is_some_and(|b| b.is_ascii_whitespace())
            {
                return Some(pos);
            }
        }
        i = pos + 2;
    }
    None
}

/// Tokenizes HTML bits so only human-visible text is translated
pub struct HtmlTransform;

impl Transform for HtmlTransform {
    fn name(&self) -> &'static str {
        "html"
    }

    fn desc(&self) -> &'static str {
        "Tokenizes HTML bits so only text is translated."
    }

    fn transform(
        &self,
        _vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            if !token.mutable || token.text.is_empty() {
                out.push(token);
                continue;
            }
            out.extend(segment_markup(&token.text)?);
        }
        Ok(out)
    }
}
