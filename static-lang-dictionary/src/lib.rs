#![doc = include_str!("../README.md")]

mod dictionary;
pub mod errors;
mod export;
mod languages;
mod store;
pub mod validate;

use std::sync::LazyLock;

pub use dictionary::{
    Dictionary, PLACEHOLDER_EXAMPLE, WordEntry, WordTable, WordTableIter,
    normalize_headword,
};
pub use errors::DictionaryError;
pub use export::{CSV_HEADER, export_csv, write_csv};
pub use languages::{LanguageInfo, Languages};
pub use store::{SnapshotStore, StoreConfig, backup_path};

static SNAPSHOT_BROTLI: &[u8] =
    include_bytes!(concat!(env!("OUT_DIR"), "/dictionary_data.json.br"));

/// The dictionary backup snapshot, covering English, Portuguese, Spanish and
/// French.
///
/// Compiled into the binary compressed with Brotli, decompressed and parsed
/// on first access.
pub static SNAPSHOT: LazyLock<Dictionary> = LazyLock::new(|| {
    let mut brotli_bytes: &[u8] = SNAPSHOT_BROTLI;
    let mut buf = Vec::with_capacity(brotli_bytes.len() * 4);
    brotli_decompressor::BrotliDecompress(&mut brotli_bytes, &mut buf)
        .unwrap_or_else(|err| {
            panic!("failed to decode the dictionary snapshot: {err}");
        });
    // UTF-8 validity and document shape are checked by the build script
    let dictionary = Dictionary::from_reader(buf.as_slice()).unwrap_or_else(
        |err| panic!("failed to parse the dictionary snapshot: {err}"),
    );
    log::debug!(
        "loaded snapshot with {} entries in {} languages",
        dictionary.total_entries(),
        dictionary.len(),
    );
    dictionary
});

/// Metadata for the languages in [`SNAPSHOT`].
pub static LANGUAGES: LazyLock<Languages> = LazyLock::new(|| {
    Languages::from_toml_str(include_str!("../data/languages.toml"))
        .unwrap_or_else(|err| {
            panic!("invalid embedded language metadata: {err}")
        })
});
