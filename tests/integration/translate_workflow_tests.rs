/*!
 * End-to-end translate workflow tests: in-place catalog rewriting
 */

use polint::app_controller::{Controller, TranslateOptions};
use polint::Catalog;

fn options(pipeline: &str) -> TranslateOptions {
    TranslateOptions {
        formats: "pysprintf,pyformat".to_string(),
        pipeline: pipeline.to_string(),
    }
}

#[test]
fn test_run_translate_files_shouldFillEverySlotInPlace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.po");
    std::fs::write(
        &path,
        "#, fuzzy\nmsgid \"Hello %(user)s\"\nmsgstr \"\"\n\nmsgid \"1 file\"\nmsgid_plural \"{n} files\"\nmsgstr[0] \"\"\nmsgstr[1] \"\"\n",
    )
    .unwrap();

    Controller::run_translate_files(&[path.clone()], &options("shouty")).unwrap();

    let catalog = Catalog::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(catalog.entries[0].msgstr, "HELLO %(user)s");
    assert!(!catalog.entries[0].is_fuzzy());
    assert_eq!(catalog.entries[1].msgstr_plural[0], "1 FILE");
    assert_eq!(catalog.entries[1].msgstr_plural[1], "{n} FILES");
    assert_eq!(catalog.metadata("Language"), Some("shouty"));
    assert_eq!(
        catalog.metadata("Plural-Forms"),
        Some("nplurals=2; plural=(n != 1);")
    );
}

#[test]
fn test_run_translate_files_withPirate_shouldKeepVariablesAndMarkup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.po");
    std::fs::write(
        &path,
        "msgid \"<b>You have %(count)s messages</b>\"\nmsgstr \"\"\n",
    )
    .unwrap();

    Controller::run_translate_files(&[path.clone()], &options("html,pirate")).unwrap();

    let catalog = Catalog::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let msgstr = &catalog.entries[0].msgstr;
    assert!(msgstr.starts_with("<b>"), "{msgstr}");
    assert!(msgstr.contains("%(count)s"), "{msgstr}");
    assert!(msgstr.contains('\u{2757}'), "{msgstr}");
}

#[test]
fn test_run_translate_files_withUnterminatedMarkup_shouldAbortFile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.po");
    let original = "msgid \"<a href=\"\nmsgstr \"\"\n";
    std::fs::write(&path, original).unwrap();

    let result = Controller::run_translate_files(&[path.clone()], &options("html,pirate"));
    assert!(result.is_err());
    // The file is left untouched on failure.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_run_translate_strings_withUnknownStage_shouldFail() {
    let result =
        Controller::run_translate_strings(&["hello".to_string()], &options("klingon"));
    assert!(result.is_err());
}
