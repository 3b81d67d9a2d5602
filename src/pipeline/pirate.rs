/*!
 * The Pirate transform.
 *
 * A rule-table-driven language transform: an ordered list of substitution
 * rules evaluated left-to-right with first-match-wins and an explicit
 * in-word scan state, plus a deterministic trailing flavor phrase. The
 * table and its evaluation order are load-bearing; changing either changes
 * the output language.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::MarkupError;
use crate::pipeline::{Transform, rewrite_plain_segments};
use crate::tokens::Token;
use crate::variables::VariableTokenizer;

/// Flavor phrases appended to every non-whitespace string. The phrase is
/// picked by the transformed string's char length mod the table size, so
/// the same input always gets the same flavor.
const COLOR: &[&str] = &[
    "arr!",
    "arrRRr!",
    "arrRRRrrr!",
    "matey!",
    "me mateys!",
    "ahoy!",
    "aye!",
    "ye scalleywag!",
    "cap'n!",
    "yo-ho-ho!",
    "shiver me timbers!",
    "ye landlubbers!",
    "prepare to be boarded!",
];

// Substitution rules. The tuples have:
//
// * in word: rule may match mid-word
// * not in word: rule may match at a word start
// * match string
// * WC: the character after the match must be a word character
// * NW: the character after the match must not be a word character
//   (end of string counts as a non-word character)
// * replacement string
#[rustfmt::skip]
static TRANSFORM_TABLE: &[(bool, bool, &str, bool, bool, &str)] = &[
    // INW?, NIW?, match, WC?, NW?, replacement
    // Anti-replacements: need these so that we make sure these words
    // don't get screwed up by later rules.
    (false, true, "need", false, true, "need"),
    (false, true, "Need", false, true, "Need"),

    // Replace entire words
    (false, true, "add-on", false, true, "bilge rat"),
    (false, true, "add-ons", false, true, "bilge rats"),
    (false, true, "are", false, true, "bee"),
    (false, true, "browser", false, true, "corsairr"),
    (false, true, "for", false, true, "fer"),
    (false, true, "Hi", false, true, "H'ello"),
    (false, true, "my", false, true, "me"),
    (false, true, "no", false, true, "nay"),
    (false, true, "of", false, true, "o'"),
    (false, true, "over", false, true, "o'err"),
    (false, true, "plugin", false, true, "mug o' grog"),
    (false, true, "plugins", false, true, "mugs o' grog"),
    (false, true, "program", false, true, "Jolly Rogerr"),
    (false, true, "the", false, true, "th'"),
    (false, true, "there", false, true, "tharr"),
    (false, true, "want", false, true, "wants"),
    (false, true, "where", false, true, "'erre"),
    (false, true, "with", false, true, "wit'"),
    (false, true, "yes", false, true, "aye"),
    (false, true, "you", false, true, "ye'"),
    (false, true, "You", false, true, "Ye'"),
    (false, true, "your", false, true, "yerr"),
    (false, true, "Your", false, true, "Yerr"),

    // Prefixes
    (false, true, "hel", true, false, "'el"),
    (false, true, "Hel", true, false, "'el"),

    // Mid-word
    (true, false, "er", true, false, "arr"),

    // Suffixes
    (true, false, "a", false, true, "ar"),
    (true, false, "ed", false, true, "'d"),
    (true, false, "ing", false, true, "in'"),
    (true, false, "ort", false, true, "arrt"),
    (true, false, "r", false, true, "rr"),
    (true, false, "w", false, true, "ww"),
];

static WHITESPACE_ONLY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*$").expect("Invalid whitespace regex"));

/// Word characters for the scan state: letters and apostrophe
fn word_char(c: char) -> bool {
    c == '\'' || c.is_ascii_alphabetic()
}

/// Split trailing punctuation off a string, returning (body, ending)
fn split_ending(s: &str) -> (&str, &str) {
    let body_end = s
        .rfind(|c: char| !matches!(c, '.' | ',' | '"' | ':' | ';' | '?' | '!' | '\n'))
        .map(|i| i + s[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    s.split_at(body_end)
}

/// Apply the substitution table to one plain-text segment.
///
/// Scans left to right; at each position the first applicable rule wins
/// and the scan continues after the matched text with the in-word state
/// set. Sentence punctuation resets the state.
fn pirate_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    let mut rest = text;

    'scan: while let Some(c) = rest.chars().next() {
        if matches!(c, '.' | '!' | '?') {
            in_word = false;
            out.push(c);
            rest = &rest[c.len_utf8()..];
            continue;
        }

        for &(rule_in_word, rule_not_in_word, pattern, wc, nw, replacement) in TRANSFORM_TABLE {
            // Match inside a word? (Not a prefix.)
            if in_word && !rule_in_word {
                continue;
            }
            // Match at a word start? (Prefix.)
            if !in_word && !rule_not_in_word {
                continue;
            }
            if !rest.starts_with(pattern) {
                continue;
            }

            // Check the character after the match. End of string never
            // counts as a word character but does count as a non-word
            // character.
            let after = rest[pattern.len()..].chars().next();
            match after {
                Some(next) => {
                    if wc && !word_char(next) {
                        continue;
                    }
                    if nw && word_char(next) {
                        continue;
                    }
                }
                None => {
                    if wc {
                        continue;
                    }
                }
            }

            out.push_str(replacement);
            rest = &rest[pattern.len()..];
            in_word = true;
            continue 'scan;
        }

        in_word = word_char(c);
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Translates text into Pirate!
pub struct PirateTransform;

impl Transform for PirateTransform {
    fn name(&self) -> &'static str {
        "pirate"
    }

    fn desc(&self) -> &'static str {
        "Translates text into Pirate!"
    }

    fn transform(
        &self,
        vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        let out = tokens
            .into_iter()
            .map(|token| {
                if !token.mutable {
                    return token;
                }

                let transformed = rewrite_plain_segments(vartok, &token.text, pirate_words);

                // Whitespace-only strings get no flavor; everything else
                // grows a flavor phrase and at least one unicode character.
                if WHITESPACE_ONLY_REGEX.is_match(&transformed) {
                    return Token::text(transformed);
                }

                let flavor = COLOR[transformed.chars().count() % COLOR.len()];
                let (body, ending) = split_ending(&transformed);
                let mut flavored = format!("{body} {flavor}{ending}");
                if !flavored.contains('!') {
                    flavored.push('!');
                }
                Token::text(flavored.replace('!', "\u{2757}"))
            })
            .collect();

        Ok(out)
    }
}
