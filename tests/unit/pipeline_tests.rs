/*!
 * Tests for the transform pipeline
 */

use polint::pipeline::available_transforms;
use polint::{Catalog, TranslationEntry, Translator};

fn translator(pipeline: &str) -> Translator {
    Translator::new("pysprintf,pyformat", pipeline).unwrap()
}

#[test]
fn test_available_transforms_shouldIncludeWholeCatalogue() {
    let names: Vec<&str> = available_transforms().iter().map(|t| t.name()).collect();
    for expected in [
        "empty",
        "xxx",
        "anglequote",
        "shouty",
        "reverse",
        "redacted",
        "haha",
        "pirate",
        "html",
    ] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
}

#[test]
fn test_translate_string_withStagedPipeline_shouldNeverAlterMarkup() {
    // Stages after html see markup as immutable tokens; only the
    // human-visible text and the flavor suffix may change.
    let translator = translator("html,shouty,pirate");
    let out = translator
        .translate_string("<a href=\"/profile\" title=\"My profile\">Your profile</a> here")
        .unwrap();
    assert!(out.starts_with("<a href=\"/profile\" title=\""), "{out}");
    assert!(out.contains("</a>"), "{out}");
    assert!(!out.contains("HREF"), "tag internals rewritten: {out}");
}

#[test]
fn test_translate_string_withVariables_shouldPreserveEveryToken() {
    let translator = translator("html,pirate");
    let input = "You have %(count)s new {thing} alerts";
    let out = translator.translate_string(input).unwrap();
    assert!(out.contains("%(count)s"), "{out}");
    assert!(out.contains("{thing}"), "{out}");
}

#[test]
fn test_translate_string_shouldBeDeterministic() {
    let translator = translator("html,pirate");
    let a = translator.translate_string("Hi there, friend!").unwrap();
    let b = translator.translate_string("Hi there, friend!").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_translate_string_withUnterminatedTag_shouldFail() {
    let translator = translator("html");
    assert!(translator.translate_string("<a href=").is_err());
}

#[test]
fn test_new_withUnknownStage_shouldFailBeforeProcessing() {
    assert!(Translator::new("pysprintf", "html,klingon").is_err());
}

#[test]
fn test_translate_file_shouldFillTargetsAndClearFuzzy() {
    let mut catalog = Catalog::default();

    let mut singular = TranslationEntry::new("Save changes");
    singular.flags.push("fuzzy".to_string());
    catalog.entries.push(singular);

    let mut plural = TranslationEntry::new("1 item");
    plural.msgid_plural = Some("%(count)s items".to_string());
    plural.msgstr_plural = vec![String::new(), String::new()];
    catalog.entries.push(plural);

    let translator = translator("shouty");
    let count = translator.translate_file(&mut catalog).unwrap();
    assert_eq!(count, 2);

    assert_eq!(catalog.entries[0].msgstr, "SAVE CHANGES");
    assert!(!catalog.entries[0].is_fuzzy());
    assert_eq!(catalog.entries[1].msgstr_plural[0], "1 ITEM");
    assert_eq!(catalog.entries[1].msgstr_plural[1], "%(count)s ITEMS");
    assert_eq!(catalog.metadata("Language"), Some("shouty"));
}

#[test]
fn test_translate_file_withObsoleteEntry_shouldSkipIt() {
    let mut catalog = Catalog::default();
    let mut entry = TranslationEntry::new("old message");
    entry.obsolete = true;
    catalog.entries.push(entry);

    let count = translator("shouty").translate_file(&mut catalog).unwrap();
    assert_eq!(count, 0);
    assert!(catalog.entries[0].msgstr.is_empty());
}
