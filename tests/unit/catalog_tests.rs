/*!
 * Tests for PO catalog parsing and serialization
 */

use polint::{Catalog, TranslationEntry};

const CATALOG: &str = r#"# Spanish translations
msgid ""
msgstr ""
"Project-Id-Version: demo 2.1\n"
"Language: es\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

#: src/views.py:42
msgid "Welcome back, %(user)s"
msgstr "Bienvenido, %(user)s"

#. A count of files
#: src/views.py:77
msgid "One file"
msgid_plural "%(count)s files"
msgstr[0] "Un archivo"
msgstr[1] "%(count)s archivos"

#, fuzzy
msgid "Needs review"
msgstr "Necesita revision"
"#;

#[test]
fn test_parse_shouldExposeMetadataAndEntries() {
    let catalog = Catalog::parse(CATALOG).unwrap();
    assert_eq!(catalog.metadata("Project-Id-Version"), Some("demo 2.1"));
    assert_eq!(catalog.metadata("Language"), Some("es"));
    assert_eq!(catalog.entries.len(), 3);

    assert_eq!(catalog.entries[0].msgid, "Welcome back, %(user)s");
    assert_eq!(catalog.entries[0].references, vec!["src/views.py:42".to_string()]);

    let plural = &catalog.entries[1];
    assert_eq!(plural.msgid_plural.as_deref(), Some("%(count)s files"));
    assert_eq!(plural.msgstr_plural[1], "%(count)s archivos");
    assert_eq!(plural.extracted_comment, "A count of files");

    assert!(catalog.entries[2].is_fuzzy());
}

#[test]
fn test_parse_shouldTrackEntryLineNumbers() {
    let catalog = Catalog::parse(CATALOG).unwrap();
    // The first entry starts at its "#:" comment line.
    assert_eq!(catalog.entries[0].linenum, 8);
}

#[test]
fn test_roundtrip_shouldPreserveEntriesAndMetadata() {
    let catalog = Catalog::parse(CATALOG).unwrap();
    let serialized = catalog.to_po_string();
    let reparsed = Catalog::parse(&serialized).unwrap();

    assert_eq!(reparsed.metadata("Language"), Some("es"));
    assert_eq!(reparsed.entries.len(), catalog.entries.len());
    for (a, b) in catalog.entries.iter().zip(&reparsed.entries) {
        assert_eq!(a.msgid, b.msgid);
        assert_eq!(a.msgid_plural, b.msgid_plural);
        assert_eq!(a.msgstr, b.msgstr);
        assert_eq!(a.msgstr_plural, b.msgstr_plural);
        assert_eq!(a.flags, b.flags);
    }
}

#[test]
fn test_parse_withEscapedCharacters_shouldUnescape() {
    let catalog = Catalog::parse(
        "msgid \"tab\\there \\\"quoted\\\" and\\nnewline\"\nmsgstr \"\"\n",
    )
    .unwrap();
    assert_eq!(catalog.entries[0].msgid, "tab\there \"quoted\" and\nnewline");
}

#[test]
fn test_parse_withBadLine_shouldFailWithLineNumber() {
    let err = Catalog::parse("msgid \"ok\"\nmsgstr \"ok\"\n\nnot a po line\n").unwrap_err();
    assert!(err.to_string().contains("line 4"), "{err}");
}

#[test]
fn test_entry_targetStrings_shouldCoverSingularAndPlural() {
    let mut entry = TranslationEntry::new("one");
    entry.msgstr = "uno".to_string();
    assert_eq!(entry.target_strings(), vec!["uno"]);

    entry.msgid_plural = Some("many".to_string());
    entry.msgstr_plural = vec!["uno".to_string(), "muchos".to_string()];
    assert_eq!(entry.target_strings(), vec!["uno", "muchos"]);
}
