/*!
 * End-to-end lint workflow tests: files on disk through the controller
 */

use std::path::PathBuf;

use polint::app_controller::{Controller, LintOptions};

fn options() -> LintOptions {
    LintOptions {
        formats: "pysprintf,pyformat".to_string(),
        rules: String::new(),
        quiet: true,
        errors_only: false,
        no_color: true,
    }
}

fn write_po(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_run_lint_withCleanCatalogs_shouldExitZero() {
    let dir = tempfile::tempdir().unwrap();
    write_po(
        &dir,
        "clean.po",
        "msgid \"Hello %(user)s\"\nmsgstr \"Hola %(user)s\"\n",
    );

    let code = Controller::run_lint(&[dir.path().to_path_buf()], &options()).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_run_lint_withWarningsOnly_shouldExitZero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_po(&dir, "warn.po", "msgid \"Foo: {foo}\"\nmsgstr \"Oof\"\n");

    let code = Controller::run_lint(&[path], &options()).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_run_lint_withErrors_shouldExitOne() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_po(&dir, "error.po", "msgid \"Foo\"\nmsgstr \"Oof: {foo}\"\n");

    let code = Controller::run_lint(&[path], &options()).unwrap();
    assert_eq!(code, 1);
}

#[test]
fn test_run_lint_withDirectoryTree_shouldWalkForCatalogs() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("locale").join("de").join("LC_MESSAGES");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(
        nested.join("django.po"),
        "msgid \"Foo %s\"\nmsgstr \"OOF\"\n",
    )
    .unwrap();
    std::fs::write(nested.join("django.mo"), "binary").unwrap();

    // The missing positional %s escalates to an error.
    let code = Controller::run_lint(&[dir.path().to_path_buf()], &options()).unwrap();
    assert_eq!(code, 1);
}

#[test]
fn test_run_lint_withUnparseableFile_shouldCountAsErrorAndContinue() {
    let dir = tempfile::tempdir().unwrap();
    write_po(&dir, "broken.po", "this is not a catalog\n");
    write_po(&dir, "clean.po", "msgid \"a\"\nmsgstr \"b\"\n");

    let code = Controller::run_lint(&[dir.path().to_path_buf()], &options()).unwrap();
    assert_eq!(code, 1);
}

#[test]
fn test_run_lint_withUnknownRule_shouldFailBeforeLinting() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_po(&dir, "clean.po", "msgid \"a\"\nmsgstr \"b\"\n");

    let mut options = options();
    options.rules = "E201,bogus".to_string();
    assert!(Controller::run_lint(&[path], &options).is_err());
}

#[test]
fn test_run_lint_withSuppressedEntry_shouldExitZero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_po(
        &dir,
        "ignored.po",
        "# polint-ignore: all\nmsgid \"Foo\"\nmsgstr \"Oof: {foo}\"\n",
    );

    let code = Controller::run_lint(&[path], &options()).unwrap();
    assert_eq!(code, 0);
}

#[test]
fn test_run_lint_withNoCatalogs_shouldError() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Controller::run_lint(&[dir.path().to_path_buf()], &options()).is_err());
}
