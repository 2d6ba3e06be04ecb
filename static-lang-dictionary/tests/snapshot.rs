#![allow(missing_docs)]

use serde_json::Value;
use static_lang_dictionary::{
    Dictionary, LANGUAGES, PLACEHOLDER_EXAMPLE, SNAPSHOT, validate,
};

const SHIPPED: &str = include_str!("../data/dictionary_data.json");

fn shipped_value() -> Value {
    serde_json::from_str(SHIPPED).unwrap()
}

#[test]
fn snapshot_decompresses() {
    assert!(!SNAPSHOT.is_empty());
    assert!(SNAPSHOT.total_entries() > 0);
}

#[test]
fn only_known_languages() {
    SNAPSHOT.language_codes().for_each(|code| {
        assert!(["en", "pt", "es", "fr"].contains(&code), "unexpected {code}");
    });
    assert_eq!(SNAPSHOT.len(), 4);
}

#[test]
fn every_language_is_an_object_of_string_records() {
    let value = shipped_value();
    let languages = value.as_object().unwrap();
    languages.values().for_each(|words| {
        let words = words.as_object().expect("language should be an object");
        words.values().for_each(|entry| {
            let entry = entry.as_object().unwrap();
            assert_eq!(entry.len(), 3);
            ["definition", "part_of_speech", "example"]
                .iter()
                .for_each(|field| {
                    let text = entry[*field].as_str().unwrap();
                    assert!(!text.is_empty());
                });
        });
    });
    assert!(validate::validate_value(&value).is_valid());
}

#[test]
fn known_entries() {
    let value = shipped_value();
    assert_eq!(value["en"]["apple"]["part_of_speech"], "noun");
    assert_eq!(value["pt"]["laranja"]["definition"], "Laranja");
    assert!(
        value["es"]["coche"]["example"]
            .as_str()
            .unwrap()
            .contains("coche")
    );

    assert_eq!(SNAPSHOT["en"]["apple"].part_of_speech(), "noun");
    assert_eq!(SNAPSHOT["pt"]["laranja"].definition(), "Laranja");
}

#[test]
fn round_trip_preserves_content() {
    let json = SNAPSHOT.to_json_string().unwrap();
    let reparsed = Dictionary::from_json_str(&json).unwrap();
    assert_eq!(*SNAPSHOT, reparsed);
    // Accents come through unescaped
    assert!(json.contains("maçã"));
    assert!(json.contains(PLACEHOLDER_EXAMPLE));
    assert!(!json.contains("\\u00"));
}

#[test]
fn embedded_snapshot_matches_shipped_file() {
    let from_reader = Dictionary::from_reader(SHIPPED.as_bytes()).unwrap();
    assert_eq!(from_reader, *SNAPSHOT);
    assert!(Dictionary::from_reader(&b"{\"en\": []}"[..]).is_err());
}

#[test]
fn write_json_reproduces_shipped_file() {
    let mut buf = Vec::new();
    SNAPSHOT.write_json(&mut buf).unwrap();
    let written = String::from_utf8(buf).unwrap();
    assert_eq!(written, SHIPPED.trim_end());
}

#[test]
fn round_trip_preserves_order() {
    let codes = SNAPSHOT.language_codes().collect::<Vec<_>>();
    assert_eq!(codes, ["en", "pt", "es", "fr"]);
    let reparsed =
        Dictionary::from_json_str(&SNAPSHOT.to_json_string().unwrap()).unwrap();
    let original = SNAPSHOT["pt"].headwords().collect::<Vec<_>>();
    let after = reparsed["pt"].headwords().collect::<Vec<_>>();
    assert_eq!(original, after);
}

#[test]
fn lookup_normalizes() {
    assert!(SNAPSHOT.lookup("  APPLE ", "EN").is_some());
    assert!(SNAPSHOT.lookup("Maçã", "pt").is_some());
    assert!(SNAPSHOT.lookup("apple", "pt").is_none());
    assert!(SNAPSHOT.lookup("apple", "de").is_none());
}

#[test]
fn list_words_is_sorted() {
    let words = SNAPSHOT.list_words("en").unwrap();
    let mut sorted = words.clone();
    sorted.sort();
    assert_eq!(words, sorted);
    assert_eq!(words.len(), SNAPSHOT["en"].len());
    assert!(SNAPSHOT.list_words("de").is_none());
}

#[test]
fn placeholder_examples_are_not_examples() {
    let laranja = SNAPSHOT.lookup("laranja", "pt").unwrap();
    assert_eq!(laranja.example(), PLACEHOLDER_EXAMPLE);
    assert!(!laranja.has_example());
    assert_eq!(
        laranja.example_or_fallback("laranja"),
        "Exemplo de uso para 'laranja' não encontrado.",
    );

    let coche = SNAPSHOT.lookup("coche", "es").unwrap();
    assert!(coche.has_example());
    assert_eq!(coche.example_or_fallback("coche"), coche.example());
}

#[test]
fn every_language_has_metadata() {
    SNAPSHOT.language_codes().for_each(|code| {
        assert!(LANGUAGES.contains(code), "no metadata for {code}");
    });
    assert_eq!(LANGUAGES.resolve(" PT ").unwrap().name(), "Português");
    assert_eq!(LANGUAGES.get("fr").unwrap().tts_code(), "fr");
}
