#![allow(missing_docs)]

use std::{
    env, fs,
    fs::{File, OpenOptions},
    io::Cursor,
    path::{Path, PathBuf},
};

use brotli::enc::{
    BrotliEncoderParams, backward_references::BrotliEncoderMode,
};
use serde_json::Value;

static SNAPSHOT_PATH: &str = "data/dictionary_data.json";
static ENTRY_FIELDS: [&str; 3] = ["definition", "part_of_speech", "example"];

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed={SNAPSHOT_PATH}");
    println!("cargo::rerun-if-changed=data/languages.toml");

    let bytes = fs::read(SNAPSHOT_PATH).unwrap_or_else(|err| {
        panic!("failed to read snapshot {SNAPSHOT_PATH}: {err}");
    });
    // Validate the bytes are UTF-8 and well-shaped now so we don't need to at
    // runtime
    let text =
        str::from_utf8(&bytes).expect("snapshot should be valid UTF-8");
    check_shape(text);

    compress(&bytes, "dictionary_data.json.br");
}

fn check_shape(text: &str) {
    let document: Value = serde_json::from_str(text)
        .unwrap_or_else(|err| panic!("snapshot is not valid JSON: {err}"));
    let Value::Object(languages) = document else {
        panic!("snapshot top level must be an object");
    };
    languages.iter().for_each(|(code, words)| {
        let Value::Object(words) = words else {
            panic!("language {code:?} must map to an object");
        };
        words.iter().for_each(|(headword, entry)| {
            let Value::Object(entry) = entry else {
                panic!("entry {code}/{headword} must be an object");
            };
            assert_eq!(
                entry.len(),
                ENTRY_FIELDS.len(),
                "entry {code}/{headword} must have exactly {ENTRY_FIELDS:?}",
            );
            ENTRY_FIELDS.iter().for_each(|field| {
                assert!(
                    entry.get(*field).is_some_and(Value::is_string),
                    "entry {code}/{headword} is missing string field {field}",
                );
            });
        });
    });
}

fn compress(bytes: &[u8], name: &str) -> PathBuf {
    let br_path = out_dir_path(name);
    let mut br_file = open_path(&br_path);

    let mut cursor = Cursor::new(bytes);
    brotli::BrotliCompress(&mut cursor, &mut br_file, &BrotliEncoderParams {
        mode: BrotliEncoderMode::BROTLI_MODE_TEXT,
        quality: if env::var("PROFILE").as_deref() == Ok("debug") {
            8
        } else {
            11
        },
        size_hint: bytes.len(),
        ..Default::default()
    })
    .unwrap_or_else(|err| panic!("failed to compress {name}: {err}"));

    br_path
}

fn out_dir_path(name: &str) -> PathBuf {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    PathBuf::from(out_dir).join(name)
}

fn open_path(path: &Path) -> File {
    let Some(parent) = path.parent() else {
        unreachable!(
            "open_path will always be called on a file with a parent directory"
        );
    };
    fs::create_dir_all(parent).expect("failed to create parent directories");
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .unwrap_or_else(|err| {
            panic!("unable to open output file {}: {err}", path.display())
        })
}
