/*!
 * Stateless content transforms.
 *
 * Each transform rewrites the text of mutable tokens and passes immutable
 * tokens through untouched. Transforms that rewrite characters go through
 * the variable tokenizer first so interpolation variables survive intact.
 */

use crate::errors::MarkupError;
use crate::pipeline::{Transform, rewrite_plain_segments};
use crate::tokens::Token;
use crate::variables::VariableTokenizer;

/// Split trailing whitespace off a string, returning (body, ending)
fn split_trailing_whitespace(s: &str) -> (&str, &str) {
    let body_end = s
        .rfind(|c: char| !c.is_whitespace())
        .map(|i| i + s[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    s.split_at(body_end)
}

/// Map a transform over every mutable token
fn map_mutable<F>(tokens: Vec<Token>, rewrite: F) -> Vec<Token>
where
    F: Fn(&str) -> String,
{
    tokens
        .into_iter()
        .map(|token| {
            if token.mutable {
                Token::text(rewrite(&token.text))
            } else {
                token
            }
        })
        .collect()
}

/// Blanks every mutable token
pub struct EmptyTransform;

impl Transform for EmptyTransform {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn desc(&self) -> &'static str {
        "Replaces translatable text with empty strings."
    }

    fn transform(
        &self,
        _vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |_| String::new()))
    }
}

/// Adds xxx before and after each line of a string
pub struct XxxTransform;

impl Transform for XxxTransform {
    fn name(&self) -> &'static str {
        "xxx"
    }

    fn desc(&self) -> &'static str {
        "Adds xxx before and after lines in a string."
    }

    fn transform(
        &self,
        _vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |text| {
            let mut out = String::with_capacity(text.len() + 6);
            for line in text.split_inclusive('\n') {
                let (body, ending) = split_trailing_whitespace(line);
                out.push_str("xxx");
                out.push_str(body);
                out.push_str("xxx");
                out.push_str(ending);
            }
            out
        }))
    }
}

/// Encloses each string in unicode angle quotes
pub struct AngleQuoteTransform;

impl Transform for AngleQuoteTransform {
    fn name(&self) -> &'static str {
        "anglequote"
    }

    fn desc(&self) -> &'static str {
        "Encloses string in unicode angle quotes."
    }

    fn transform(
        &self,
        _vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |text| {
            let (body, ending) = split_trailing_whitespace(text);
            format!("\u{ab}{body}\u{bb}{ending}")
        }))
    }
}

/// Translates into all caps
pub struct ShoutyTransform;

impl Transform for ShoutyTransform {
    fn name(&self) -> &'static str {
        "shouty"
    }

    fn desc(&self) -> &'static str {
        "Translates into all caps."
    }

    fn transform(
        &self,
        vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |text| {
            rewrite_plain_segments(vartok, text, |plain| plain.to_uppercase())
        }))
    }
}

/// Reverses the text between variables
pub struct ReverseTransform;

impl Transform for ReverseTransform {
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn desc(&self) -> &'static str {
        "Reverses the characters of translatable text."
    }

    fn transform(
        &self,
        vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |text| {
            rewrite_plain_segments(vartok, text, |plain| plain.chars().rev().collect())
        }))
    }
}

/// Redacts everything
pub struct RedactedTransform;

impl Transform for RedactedTransform {
    fn name(&self) -> &'static str {
        "redacted"
    }

    fn desc(&self) -> &'static str {
        "Redacts everything."
    }

    fn transform(
        &self,
        vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |text| {
            rewrite_plain_segments(vartok, text, |plain| {
                plain
                    .chars()
                    .map(|c| {
                        if c.is_ascii_uppercase() {
                            'X'
                        } else if c.is_ascii_lowercase() {
                            'x'
                        } else {
                            c
                        }
                    })
                    .collect()
            })
        }))
    }
}

const HAHA: &str = "Haha\u{2757}";

/// Adds Haha! before sentences in a string
pub struct HahaTransform;

impl Transform for HahaTransform {
    fn name(&self) -> &'static str {
        "haha"
    }

    fn desc(&self) -> &'static str {
        "Adds haha! before sentences in a string."
    }

    fn transform(
        &self,
        _vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError> {
        Ok(map_mutable(tokens, |text| {
            let chars: Vec<char> = text.chars().collect();
            let mut out = String::with_capacity(text.len() + HAHA.len() + 1);
            out.push_str(HAHA);
            out.push(' ');

            for (i, &c) in chars.iter().enumerate() {
                if matches!(c, '.' | '!' | '?') && chars.get(i + 1) == Some(&' ') {
                    out.push(c);
                    out.push(' ');
                    out.push_str(HAHA);
                    continue;
                }
                if c == '\n' {
                    out.push(c);
                    out.push_str(HAHA);
                    out.push(' ');
                    continue;
                }
                out.push(c);
            }

            out
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vartok() -> VariableTokenizer {
        VariableTokenizer::new("pysprintf,pyformat").unwrap()
    }

    fn run(transform: &dyn Transform, text: &str) -> String {
        let tokens = transform
            .transform(&vartok(), vec![Token::text(text)])
            .unwrap();
        crate::tokens::join_tokens(&tokens)
    }

    #[test]
    fn test_empty_shouldBlankMutableAndKeepImmutable() {
        let tokens = EmptyTransform
            .transform(
                &vartok(),
                vec![Token::markup("<b>"), Token::text("bold"), Token::markup("</b>")],
            )
            .unwrap();
        assert_eq!(crate::tokens::join_tokens(&tokens), "<b></b>");
    }

    #[test]
    fn test_xxx_withMultilineText_shouldWrapEachLine() {
        assert_eq!(run(&XxxTransform, "one\ntwo "), "xxxonexxx\nxxxtwoxxx ");
    }

    #[test]
    fn test_anglequote_shouldWrapBeforeTrailingWhitespace() {
        assert_eq!(run(&AngleQuoteTransform, "quoted \n"), "\u{ab}quoted\u{bb} \n");
    }

    #[test]
    fn test_shouty_shouldSkipVariables() {
        assert_eq!(run(&ShoutyTransform, "a %(b)s c"), "A %(b)s C");
    }

    #[test]
    fn test_reverse_shouldReversePlainSegmentsOnly() {
        assert_eq!(run(&ReverseTransform, "abc{x}def"), "cba{x}fed");
    }

    #[test]
    fn test_redacted_shouldMaskLettersOnly() {
        assert_eq!(run(&RedactedTransform, "Ab1 %(c)s"), "Xx1 %(c)s");
    }

    #[test]
    fn test_haha_shouldPrefixSentences() {
        assert_eq!(
            run(&HahaTransform, "One. Two"),
            "Haha\u{2757} One. Haha\u{2757} Two"
        );
    }
}
