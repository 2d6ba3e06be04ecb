#![allow(missing_docs)]

use std::fs;

use serde_json::json;
use static_lang_dictionary::{
    Dictionary, DictionaryError, LANGUAGES, LanguageInfo, Languages, SNAPSHOT,
    WordEntry, WordTable,
    validate::{
        IssueKind, Severity, unmatched_languages, validate_dictionary,
        validate_file, validate_value,
    },
};

#[test]
fn top_level_must_be_an_object() {
    let report = validate_value(&json!(["en"]));
    assert!(!report.is_valid());
    assert_eq!(report.issues()[0].kind, IssueKind::TopLevelNotObject);
}

#[test]
fn structural_problems_are_errors() {
    let document = json!({
        "en": {
            "apple": {
                "definition": "A fruit",
                "part_of_speech": 3,
                "example": "An apple a day.",
                "synonyms": []
            },
            "book": {
                "definition": "A written work",
                "example": "She read a book."
            },
            "cat": "a small animal"
        },
        "pt": []
    });
    let report = validate_value(&document);
    let kinds = report.errors().map(|issue| &issue.kind).collect::<Vec<_>>();
    assert!(kinds.contains(&&IssueKind::FieldNotString(
        "part_of_speech".into()
    )));
    assert!(kinds.contains(&&IssueKind::UnknownField("synonyms".into())));
    assert!(kinds.contains(&&IssueKind::MissingField("part_of_speech")));
    assert!(kinds.contains(&&IssueKind::EntryNotObject));
    assert!(kinds.contains(&&IssueKind::LanguageNotObject));
    assert_eq!(report.warnings().count(), 0);

    let not_object = report
        .issues()
        .iter()
        .find(|issue| issue.kind == IssueKind::LanguageNotObject)
        .unwrap();
    assert_eq!(not_object.language.as_deref(), Some("pt"));
    assert_eq!(not_object.headword, None);
}

#[test]
fn malformed_documents_do_not_load() {
    let missing_field = r#"{"en": {"apple": {"definition": "A fruit"}}}"#;
    assert!(Dictionary::from_json_str(missing_field).is_err());
    let wrong_type = json!({"en": {"apple": {
        "definition": "A fruit",
        "part_of_speech": "noun",
        "example": 1
    }}});
    assert!(Dictionary::from_json_str(&wrong_type.to_string()).is_err());
    let extra_field = json!({"en": {"apple": {
        "definition": "A fruit",
        "part_of_speech": "noun",
        "example": "",
        "id": "1"
    }}});
    assert!(Dictionary::from_json_str(&extra_field.to_string()).is_err());
}

#[test]
fn snapshot_content_warnings() {
    let report = validate_dictionary(&SNAPSHOT, &LANGUAGES);
    assert!(report.is_valid());
    assert_eq!(report.errors().count(), 0);

    let placeholder = report
        .warnings()
        .find(|issue| issue.kind == IssueKind::PlaceholderExample)
        .expect("snapshot has placeholder examples");
    assert_eq!(placeholder.severity(), Severity::Warning);

    let portuguese_labels = report
        .warnings()
        .find_map(|issue| match &issue.kind {
            IssueKind::InconsistentPartOfSpeech { variants }
                if issue.language.as_deref() == Some("pt") =>
            {
                Some(variants.clone())
            },
            _ => None,
        })
        .expect("Substantivo and substantivo should be flagged");
    assert_eq!(portuguese_labels, ["Substantivo", "substantivo"]);
}

#[test]
fn content_warnings() {
    let dictionary = Dictionary::from_json_str(
        r#"{
            "de": {
                "Apfel": {
                    "definition": "",
                    "part_of_speech": "Nomen",
                    "example": "Ich esse einen Apfel."
                }
            }
        }"#,
    )
    .unwrap();
    let report = validate_dictionary(&dictionary, &LANGUAGES);
    let kinds = report
        .issues()
        .iter()
        .map(|issue| &issue.kind)
        .collect::<Vec<_>>();
    assert_eq!(kinds, [
        &IssueKind::UnknownLanguage,
        &IssueKind::HeadwordNotNormalized {
            normalized: "apfel".into()
        },
        &IssueKind::EmptyField("definition"),
    ]);
    assert!(report.is_valid());
}

#[test]
fn issues_display_their_location() {
    let report = validate_value(&json!({"en": {"apple": {}}}));
    let first = report.issues()[0].to_string();
    assert_eq!(first, "error: en/apple: missing field \"definition\"");
}

#[test]
fn files_are_checked_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("good.json");
    fs::write(&good, SNAPSHOT.to_json_string().unwrap()).unwrap();
    let report = validate_file(&good, &LANGUAGES).unwrap();
    assert!(report.is_valid());
    assert!(report.warnings().count() > 0);

    let bad_shape = dir.path().join("bad_shape.json");
    fs::write(&bad_shape, r#"{"en": {"apple": {"definition": 1}}}"#).unwrap();
    let report = validate_file(&bad_shape, &LANGUAGES).unwrap();
    assert!(!report.is_valid());

    let not_json = dir.path().join("not_json.json");
    fs::write(&not_json, "{ this is not json").unwrap();
    assert!(validate_file(&not_json, &LANGUAGES).is_err());
}

#[test]
fn unmatched_languages_both_ways() {
    let dictionary = Dictionary::from_json_str(
        r#"{"en": {}, "de": {}}"#,
    )
    .unwrap();
    let (without_metadata, without_words) =
        unmatched_languages(&dictionary, &LANGUAGES);
    assert_eq!(without_metadata, ["de"]);
    let mut without_words = without_words;
    without_words.sort();
    assert_eq!(without_words, ["es", "fr", "pt"]);
}

#[test]
fn custom_metadata() {
    let languages = [("de", LanguageInfo::new("Deutsch", "de-DE", "de"))]
        .into_iter()
        .collect::<Languages>();
    let dictionary = [(
        "de",
        [("apfel", WordEntry::new("Eine Frucht.", "Nomen", "Ein Apfel."))]
            .into_iter()
            .collect::<WordTable>(),
    )]
    .into_iter()
    .collect::<Dictionary>();

    let report = validate_dictionary(&dictionary, &languages);
    assert!(report.is_empty(), "{:?}", report.issues());
    assert_eq!(languages.resolve("DE").unwrap().code(), "de-DE");
    assert!(matches!(
        languages.resolve("en"),
        Err(DictionaryError::UnknownLanguage(_))
    ));
}
