/*!
 * Token-stream transform pipeline.
 *
 * A pipeline is an ordered list of [`Transform`] stages resolved by name
 * against a static catalogue. Every stage consumes a token stream and
 * produces a new one; immutable tokens pass through byte-for-byte, mutable
 * tokens may be rewritten or re-segmented, and no stage may silently drop
 * content. [`Translator`] drives the pipeline over single strings and over
 * whole catalogs.
 *
 * # Architecture
 *
 * - `content`: stateless themed rewriters (case folding, reversal,
 *   redaction, wrappers)
 * - `pirate`: the rule-table-driven language transform
 * - `html`: HTML-aware segmentation so markup is never rewritten
 */

pub mod content;
pub mod html;
pub mod pirate;

use log::debug;

use crate::catalog::Catalog;
use crate::errors::{ConfigError, MarkupError};
use crate::tokens::{Token, join_tokens};
use crate::variables::VariableTokenizer;

/// One pipeline stage.
///
/// The contract: every immutable input token appears in the output
/// byte-for-byte; mutable tokens may be freely rewritten; a stage may
/// split one token into several (changing kind and mutability) but must
/// never lose content. Only the HTML-aware stage can fail, on markup it
/// cannot segment.
pub trait Transform: Send + Sync {
    /// Selection name, e.g. "pirate"
    fn name(&self) -> &'static str;

    /// Human-readable description for --help output
    fn desc(&self) -> &'static str;

    /// Rewrite a token stream
    fn transform(
        &self,
        vartok: &VariableTokenizer,
        tokens: Vec<Token>,
    ) -> Result<Vec<Token>, MarkupError>;
}

/// The process-wide transform catalogue. Adding a transform means adding
/// one entry here.
static TRANSFORMS: &[&dyn Transform] = &[
    &content::EmptyTransform,
    &content::XxxTransform,
    &content::AngleQuoteTransform,
    &content::ShoutyTransform,
    &content::ReverseTransform,
    &content::RedactedTransform,
    &content::HahaTransform,
    &pirate::PirateTransform,
    &html::HtmlTransform,
];

/// All registered transforms, for --help output
pub fn available_transforms() -> &'static [&'static dyn Transform] {
    TRANSFORMS
}

/// Resolve a comma-separated stage list against the catalogue.
///
/// Fails fast with [`ConfigError::UnknownTransform`] before any string is
/// processed. Empty items are ignored.
fn resolve_pipeline(pipeline_spec: &str) -> Result<Vec<&'static dyn Transform>, ConfigError> {
    pipeline_spec
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            TRANSFORMS
                .iter()
                .copied()
                .find(|transform| transform.name() == name)
                .ok_or_else(|| ConfigError::UnknownTransform(name.to_string()))
        })
        .collect()
}

/// Rewrite only the plain segments of `text`, passing variable tokens
/// through untouched. Character-rewriting transforms use this so they
/// never mangle interpolation variables.
pub(crate) fn rewrite_plain_segments<F>(vartok: &VariableTokenizer, text: &str, rewrite: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    for segment in vartok.tokenize(text) {
        if segment.is_variable {
            out.push_str(segment.text);
        } else {
            out.push_str(&rewrite(segment.text));
        }
    }
    out
}

/// Drives a configured pipeline over strings and catalogs
pub struct Translator {
    vartok: VariableTokenizer,
    pipeline_spec: String,
    pipeline: Vec<&'static dyn Transform>,
}

impl Translator {
    /// Build a translator from comma-separated format and stage lists.
    ///
    /// Both lists are resolved eagerly; an unknown name aborts
    /// construction.
    pub fn new(formats_spec: &str, pipeline_spec: &str) -> Result<Self, ConfigError> {
        let vartok = VariableTokenizer::new(formats_spec)?;
        let pipeline = resolve_pipeline(pipeline_spec)?;
        Ok(Translator {
            vartok,
            pipeline_spec: pipeline_spec.to_string(),
            pipeline,
        })
    }

    /// Run one string through every stage in order and concatenate the
    /// resulting stream.
    pub fn translate_string(&self, text: &str) -> Result<String, MarkupError> {
        let mut tokens = vec![Token::text(text)];
        for stage in &self.pipeline {
            tokens = stage.transform(&self.vartok, tokens)?;
            debug!("stage {} produced {} tokens", stage.name(), tokens.len());
        }
        Ok(join_tokens(&tokens))
    }

    /// Pseudo-translate every entry of a catalog in place.
    ///
    /// Each entry's source string(s) are translated into its own target
    /// slot(s): the singular `msgstr`, or plural slot 0 from `msgid` and
    /// every later slot from `msgid_plural`. The fuzzy flag is cleared.
    /// Malformed markup in any string aborts the whole file; there is no
    /// safe way to report a partial translation.
    ///
    /// Returns the number of entries translated.
    pub fn translate_file(&self, catalog: &mut Catalog) -> Result<usize, MarkupError> {
        let mut count = 0;

        for entry in catalog.entries.iter_mut() {
            if entry.obsolete {
                continue;
            }

            if let Some(plural) = entry.msgid_plural.clone() {
                if entry.msgstr_plural.is_empty() {
                    entry.msgstr_plural = vec![String::new(), String::new()];
                }
                let singular = self.translate_string(&entry.msgid)?;
                let plural_translated = self.translate_string(&plural)?;
                for (index, slot) in entry.msgstr_plural.iter_mut().enumerate() {
                    *slot = if index == 0 {
                        singular.clone()
                    } else {
                        plural_translated.clone()
                    };
                }
            } else {
                entry.msgstr = self.translate_string(&entry.msgid)?;
            }

            entry.flags.retain(|flag| flag != "fuzzy");
            count += 1;
        }

        catalog.set_metadata("Language", &self.pipeline_spec);
        catalog.set_metadata("Plural-Forms", "nplurals=2; plural=(n != 1);");
        catalog.set_metadata("Content-Type", "text/plain; charset=UTF-8");

        Ok(count)
    }
}
