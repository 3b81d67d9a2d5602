/*!
 * Tests for the variable-format registry and tokenizer
 */

use polint::variables::{available_formats, parse_ignore_directive, IgnoreDirective};
use polint::VariableTokenizer;

/// Joining the tokenized segments must reproduce the input exactly, for
/// any format selection.
#[test]
fn test_tokenize_withAnySelection_shouldRoundTrip() {
    let samples = [
        "",
        "plain text with no variables",
        "Hello %(username)s, you have %d messages",
        "{count} of {total:>5} done",
        "mixed %(a)s and {b} and %s",
        "escapes 50%% and {{literal}} stay put",
        "dangling % and { and } survive",
        "unicode caf\u{e9} %(caf\u{e9})s \u{2757}",
    ];
    for spec in ["pysprintf", "pyformat", "pysprintf,pyformat", ""] {
        let vartok = VariableTokenizer::new(spec).unwrap();
        for sample in samples {
            let joined: String = vartok
                .tokenize(sample)
                .iter()
                .map(|segment| segment.text)
                .collect();
            assert_eq!(joined, sample, "selection {spec:?}");
        }
    }
}

/// Every extracted token must itself satisfy is_token.
#[test]
fn test_extract_tokens_shouldBeConsistentWithIsToken() {
    let vartok = VariableTokenizer::new("pysprintf,pyformat").unwrap();
    let text = "%(count)s widgets, {ratio:.2f} done, 100%% true, %d left, {0}";
    let tokens = vartok.extract_tokens(text, false);
    assert!(!tokens.is_empty());
    for token in tokens {
        assert!(vartok.is_token(&token), "{token}");
    }
}

#[test]
fn test_extract_tokens_withLiteralEscapes_shouldNeverReportThem() {
    let vartok = VariableTokenizer::new("pysprintf,pyformat").unwrap();
    assert!(vartok.extract_tokens("50%%", true).is_empty());
    assert!(vartok.extract_tokens("{{", true).is_empty());
    assert!(vartok.extract_tokens("}}", true).is_empty());
    assert!(vartok.extract_tokens("{{foo}}", true).is_empty());
}

#[test]
fn test_new_withUnknownFormat_shouldFailConstruction() {
    assert!(VariableTokenizer::new("pysprintf,klingon").is_err());
}

#[test]
fn test_extract_variable_name_shouldDispatchAcrossFormats() {
    let vartok = VariableTokenizer::new("pysprintf,pyformat").unwrap();
    assert_eq!(
        vartok.extract_variable_name("%(user)s").as_deref(),
        Some("user")
    );
    assert_eq!(
        vartok.extract_variable_name("{user!r:>8}").as_deref(),
        Some("user")
    );
    assert_eq!(vartok.extract_variable_name("%s"), None);
    assert_eq!(vartok.extract_variable_name("{}"), None);
}

#[test]
fn test_available_formats_shouldListBothSyntaxes() {
    let names: Vec<&str> = available_formats().iter().map(|f| f.name).collect();
    assert!(names.contains(&"pysprintf"));
    assert!(names.contains(&"pyformat"));
}

#[test]
fn test_parse_ignore_directive_shouldRecognizeAllAndCodeLists() {
    assert_eq!(
        parse_ignore_directive("translator note, nothing else"),
        IgnoreDirective::None
    );
    assert_eq!(
        parse_ignore_directive("polint-ignore: all"),
        IgnoreDirective::All
    );
    assert_eq!(
        parse_ignore_directive("checked; polint-ignore: W302, E201"),
        IgnoreDirective::Codes(vec!["W302".to_string(), "E201".to_string()])
    );
}
