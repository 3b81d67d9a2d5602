/*!
 * Tests for the lint engine over parsed catalog entries
 */

use polint::{Catalog, Linter, Severity};

fn lint_po(source: &str) -> Vec<polint::LintMessage> {
    let catalog = Catalog::parse(source).unwrap();
    let linter = Linter::new("pysprintf,pyformat", "").unwrap();
    linter.verify_entries(&catalog.entries).unwrap()
}

#[test]
fn test_verify_entries_withMissingBraceVariable_shouldWarnOnce() {
    let messages = lint_po("msgid \"Foo: {foo}\"\nmsgstr \"Oof\"\n");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "W202");
    assert_eq!(messages[0].severity, Severity::Warn);
    assert!(messages[0].text.contains("{foo}"), "{}", messages[0].text);
}

#[test]
fn test_verify_entries_withInvalidBraceVariable_shouldErrorOnce() {
    let messages = lint_po("msgid \"Foo\"\nmsgstr \"Oof: {foo}\"\n");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "E201");
    assert!(messages[0].is_error());
    assert!(messages[0].text.contains("{foo}"), "{}", messages[0].text);
}

#[test]
fn test_verify_entries_withMissingConversionType_shouldReportMalformed() {
    let messages = lint_po("msgid \"%(count)s\"\nmsgstr \"%(count)\"\n");
    let malformed: Vec<_> = messages.iter().filter(|m| m.code == "E101").collect();
    assert_eq!(malformed.len(), 1);
    assert!(malformed[0].is_error());
    assert_eq!(malformed[0].text, "type missing: %(count)");
}

#[test]
fn test_verify_entries_withMismatchedHtml_shouldCiteBothTags() {
    let messages = lint_po("msgid \"<b>Foo</b>\"\nmsgstr \"<em>ARGH</em>\"\n");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "W303");
    assert_eq!(messages[0].text, "different html: \"</b>\" vs. \"</em>\"");
}

#[test]
fn test_verify_entries_withIgnoreAllDirective_shouldSuppressEverything() {
    let messages = lint_po(
        "# polint-ignore: all\nmsgid \"Foo: {foo}\"\nmsgstr \"Oof: {bar}\"\n",
    );
    assert!(messages.is_empty(), "{messages:?}");
}

#[test]
fn test_verify_entries_withIgnoreOneCode_shouldSuppressOnlyThatCode() {
    let messages = lint_po(
        "# polint-ignore: E201\nmsgid \"Foo: {foo}\"\nmsgstr \"Oof: {bar}\"\n",
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "W202");
}

#[test]
fn test_verify_entries_withUnknownIgnoredCode_shouldBeConfigError() {
    let catalog =
        Catalog::parse("# polint-ignore: W999\nmsgid \"Foo\"\nmsgstr \"Oof\"\n").unwrap();
    let linter = Linter::new("pysprintf,pyformat", "").unwrap();
    assert!(linter.verify_entries(&catalog.entries).is_err());
}

#[test]
fn test_verify_entries_withFuzzyAndUntranslated_shouldSkipBoth() {
    let messages = lint_po(
        "#, fuzzy\nmsgid \"Foo: {foo}\"\nmsgstr \"Oof\"\n\nmsgid \"Bar: {bar}\"\nmsgstr \"\"\n",
    );
    assert!(messages.is_empty(), "{messages:?}");
}

#[test]
fn test_verify_entries_withRuleSelection_shouldRunOnlySelectedRules() {
    let catalog = Catalog::parse("msgid \"Foo\"\nmsgstr \"Foo\"\n").unwrap();

    let all = Linter::new("pysprintf,pyformat", "").unwrap();
    assert_eq!(all.verify_entries(&catalog.entries).unwrap().len(), 1);

    let selected = Linter::new("pysprintf,pyformat", "E201,W202").unwrap();
    assert!(selected.verify_entries(&catalog.entries).unwrap().is_empty());
}

#[test]
fn test_verify_entries_withPluralEntry_shouldReportPerTargetSlot() {
    let messages = lint_po(
        "msgid \"1 reply\"\nmsgid_plural \"{n} replies\"\nmsgstr[0] \"{n} respuesta\"\nmsgstr[1] \"{n} {m} respuestas\"\n",
    );
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].code, "E201");
    assert_eq!(messages[0].target_field, "msgstr[1]");
    assert!(messages[0].text.contains("{m}"), "{}", messages[0].text);
}

#[test]
fn test_verify_entries_withLiteralPercentInProse_shouldReportNothing() {
    let messages = lint_po(
        "msgid \"Updated %s\"\nmsgstr \"Actualizado %s al 100% seguro\"\n",
    );
    assert!(messages.is_empty(), "{messages:?}");
}

#[test]
fn test_verify_entries_withEscapedLiterals_shouldNeverReportThem() {
    let messages = lint_po(
        "msgid \"50%% of {{batch}}\"\nmsgstr \"el 50%% de {{batch}}\"\n",
    );
    assert!(messages.is_empty(), "{messages:?}");
}
