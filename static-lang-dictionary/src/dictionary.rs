use std::{
    fs,
    io::{self, Read, Write},
    ops::Index,
    path::Path,
};

use indexmap::{IndexMap, map};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::errors::DictionaryError;

/// The literal some entries carry instead of a real usage example.
pub const PLACEHOLDER_EXAMPLE: &str = "Exemplo não disponível.";

/// Normalize a headword the way the dictionary stores them: surrounding
/// whitespace trimmed and lowercased.
pub fn normalize_headword(word: &str) -> String {
    word.trim().to_lowercase()
}

/// A single dictionary entry: what a headword means, its grammatical
/// category, and a usage example.
///
/// All three fields are free text, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WordEntry {
    definition: String,
    part_of_speech: String,
    example: String,
}

impl WordEntry {
    /// Create a new entry.
    pub fn new(
        definition: impl Into<String>,
        part_of_speech: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        WordEntry {
            definition: definition.into(),
            part_of_speech: part_of_speech.into(),
            example: example.into(),
        }
    }

    /// The free-text gloss.
    #[inline]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// The grammatical category.
    ///
    /// Labels are not normalized: `"noun"`, `"Substantivo"` and
    /// `"substantivo"` all occur in the snapshot.
    #[inline]
    pub fn part_of_speech(&self) -> &str {
        &self.part_of_speech
    }

    /// The usage example, exactly as stored. May be
    /// [`PLACEHOLDER_EXAMPLE`].
    #[inline]
    pub fn example(&self) -> &str {
        &self.example
    }

    /// Returns `true` if the entry has a real usage example, i.e. one that
    /// is neither blank nor [`PLACEHOLDER_EXAMPLE`].
    pub fn has_example(&self) -> bool {
        let example = self.example.trim();
        !example.is_empty() && example != PLACEHOLDER_EXAMPLE
    }

    /// The usage example, or a "not found" message naming `word` if the
    /// entry doesn't have one.
    pub fn example_or_fallback(&self, word: &str) -> String {
        if self.has_example() {
            self.example.clone()
        } else {
            format!("Exemplo de uso para '{word}' não encontrado.")
        }
    }
}

/// All the entries for one language, keyed by headword.
///
/// Entries keep the order they had in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordTable {
    entries: IndexMap<String, WordEntry>,
}

impl WordTable {
    /// Get the entry for an exact headword.
    #[inline]
    pub fn get(&self, headword: &str) -> Option<&WordEntry> {
        self.entries.get(headword)
    }

    /// Iterate through `(headword, entry)` pairs in document order.
    pub fn iter(&self) -> WordTableIter<'_> {
        WordTableIter(self.entries.iter())
    }

    /// Iterate through the headwords in document order.
    pub fn headwords(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get how many entries there are.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for WordTable
where
    K: Into<String>,
    V: Into<WordEntry>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        WordTable {
            entries: iter
                .into_iter()
                .map(|(headword, entry)| (headword.into(), entry.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WordTable {
    type IntoIter = WordTableIter<'a>;
    type Item = (&'a str, &'a WordEntry);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<&str> for WordTable {
    type Output = WordEntry;

    fn index(&self, headword: &str) -> &Self::Output {
        &self.entries[headword]
    }
}

/// An iterator over a [`WordTable`].
///
/// Returned by [`WordTable::iter`].
#[derive(Debug)]
pub struct WordTableIter<'a>(map::Iter<'a, String, WordEntry>);

impl<'a> Iterator for WordTableIter<'a> {
    type Item = (&'a str, &'a WordEntry);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(headword, entry)| (headword.as_str(), entry))
    }
}

impl ExactSizeIterator for WordTableIter<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl DoubleEndedIterator for WordTableIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0
            .next_back()
            .map(|(headword, entry)| (headword.as_str(), entry))
    }
}

/// A multilingual dictionary: language code → [`WordTable`].
///
/// Serializes to and from the JSON document shape
/// `{ "<language>": { "<headword>": { "definition", "part_of_speech",
/// "example" } } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    languages: IndexMap<String, WordTable>,
}

impl Dictionary {
    /// Parse a dictionary from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DictionaryError> {
        serde_json::from_str(json)
            .map_err(|json_err| DictionaryError::Json(None, json_err))
    }

    /// Parse a dictionary from a reader producing JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self, DictionaryError> {
        serde_json::from_reader(io::BufReader::new(reader))
            .map_err(|json_err| DictionaryError::Json(None, json_err))
    }

    /// Load a dictionary from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|io_err| {
            DictionaryError::FailedToRead(path.to_owned(), io_err)
        })?;
        let dictionary: Dictionary =
            serde_json::from_str(&content).map_err(|json_err| {
                DictionaryError::Json(Some(path.to_owned()), json_err)
            })?;
        debug!(
            "loaded {} entries in {} languages from {}",
            dictionary.total_entries(),
            dictionary.len(),
            path.display(),
        );
        Ok(dictionary)
    }

    /// Serialize as pretty-printed JSON with four-space indentation.
    ///
    /// Non-ASCII characters are written as-is, not `\u`-escaped.
    pub fn write_json(
        &self,
        writer: impl Write,
    ) -> Result<(), serde_json::Error> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)
    }

    /// Serialize as a pretty-printed JSON string, see
    /// [`Dictionary::write_json`].
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        self.write_json(&mut buf)?;
        String::from_utf8(buf).map_err(serde::ser::Error::custom)
    }

    /// Get the word table for a language code.
    #[inline]
    pub fn get(&self, language: &str) -> Option<&WordTable> {
        self.languages.get(language)
    }

    /// Look up a word in a language.
    ///
    /// Both the word and the language code are trimmed and lowercased first,
    /// so `" Apple "` finds `"apple"`.
    pub fn lookup(&self, word: &str, language: &str) -> Option<&WordEntry> {
        let word = normalize_headword(word);
        let language = language.trim().to_lowercase();
        let entry = self
            .languages
            .get(&language)
            .and_then(|table| table.get(&word));
        match entry {
            Some(_) => debug!("found '{word}' in language '{language}'"),
            None => debug!("'{word}' not found in language '{language}'"),
        }
        entry
    }

    /// List the headwords of a language, sorted.
    ///
    /// Returns [`None`] if the language isn't present.
    pub fn list_words(&self, language: &str) -> Option<Vec<&str>> {
        let language = language.trim().to_lowercase();
        let table = self.languages.get(&language)?;
        let mut words = table.headwords().collect::<Vec<_>>();
        words.sort_unstable();
        debug!("listing {} words in language '{language}'", words.len());
        Some(words)
    }

    /// Iterate through the language codes in document order.
    pub fn language_codes(&self) -> impl ExactSizeIterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Iterate through `(language code, word table)` pairs in document
    /// order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &WordTable)> {
        self.languages
            .iter()
            .map(|(code, table)| (code.as_str(), table))
    }

    /// Get how many languages there are.
    #[inline]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns `true` if there are no languages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Count the entries across all languages.
    pub fn total_entries(&self) -> usize {
        self.languages.values().map(WordTable::len).sum()
    }
}

impl<K> FromIterator<(K, WordTable)> for Dictionary
where
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, WordTable)>>(iter: T) -> Self {
        Dictionary {
            languages: iter
                .into_iter()
                .map(|(code, table)| (code.into(), table))
                .collect(),
        }
    }
}

impl Index<&str> for Dictionary {
    type Output = WordTable;

    fn index(&self, language: &str) -> &Self::Output {
        &self.languages[language]
    }
}

#[cfg(feature = "rayon")]
pub(crate) mod rayon {
    use rayon::prelude::*;

    use super::{Dictionary, WordEntry, WordTable};

    impl WordTable {
        /// Iterate through the entries in parallel with `rayon`.
        pub fn par_iter(
            &self,
        ) -> impl ParallelIterator<Item = (&str, &WordEntry)> {
            self.entries
                .par_iter()
                .map(|(headword, entry)| (headword.as_str(), entry))
        }
    }

    impl Dictionary {
        /// Iterate through `(language code, word table)` pairs in parallel
        /// with `rayon`.
        pub fn par_iter(
            &self,
        ) -> impl ParallelIterator<Item = (&str, &WordTable)> {
            self.languages
                .par_iter()
                .map(|(code, table)| (code.as_str(), table))
        }
    }
}
