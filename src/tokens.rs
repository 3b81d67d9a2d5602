/*!
 * Token stream model for the transform pipeline.
 *
 * A string being pseudo-translated moves through the pipeline as an ordered
 * list of tokens. Each token carries a kind tag and a mutability flag: a
 * stage may rewrite the content of mutable tokens but must pass immutable
 * tokens through byte-for-byte. Concatenating a stream's text in order
 * always reproduces the string it was built from.
 */

use std::fmt;

/// What a token's text represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Ordinary human-visible text
    Text,
    /// Markup: tags and tag fragments
    Html,
    /// An entity or character reference, e.g. `&amp;` or `&#160;`.
    /// Kept atomic so no stage can split inside one.
    Entity,
    /// An HTML comment, including its delimiters
    Comment,
    /// The body of a `<style>` element
    Style,
    /// The body of a `<script>` element
    Script,
}

/// The unit of text passed between pipeline stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text
    pub text: String,
    /// Kind tag
    pub kind: TokenKind,
    /// Whether a transform stage may rewrite this token
    pub mutable: bool,
}

impl Token {
    /// A mutable text token
    pub fn text(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            kind: TokenKind::Text,
            mutable: true,
        }
    }

    /// An immutable markup token
    pub fn markup(text: impl Into<String>) -> Self {
        Token {
            text: text.into(),
            kind: TokenKind::Html,
            mutable: false,
        }
    }

    /// An immutable token of the given kind
    pub fn immutable(text: impl Into<String>, kind: TokenKind) -> Self {
        Token {
            text: text.into(),
            kind,
            mutable: false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Concatenate a token stream back into a string
pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.text.as_str()).collect()
}
