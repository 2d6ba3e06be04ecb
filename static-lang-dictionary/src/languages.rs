use std::{fs, path::Path};

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::DictionaryError;

/// Metadata describing one of the dictionary's languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageInfo {
    name: String,
    code: String,
    #[serde(rename = "gtts_code")]
    tts_code: String,
}

impl LanguageInfo {
    /// Create language metadata.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        tts_code: impl Into<String>,
    ) -> Self {
        LanguageInfo {
            name: name.into(),
            code: code.into(),
            tts_code: tts_code.into(),
        }
    }

    /// The language's name, in that language (e.g. `"Português"`).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full locale code (e.g. `"pt-BR"`).
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The code used for text-to-speech voices (e.g. `"pt"`).
    #[inline]
    pub fn tts_code(&self) -> &str {
        &self.tts_code
    }
}

/// The set of languages a dictionary knows about, keyed by short language
/// code.
///
/// A fully specified metadata file looks like this:
/// ```toml
#[doc = include_str!("../data/languages.toml")]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Languages {
    languages: IndexMap<String, LanguageInfo>,
}

impl Languages {
    /// Parse language metadata from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, DictionaryError> {
        toml::from_str(content)
            .map_err(|toml_err| DictionaryError::Metadata(None, toml_err))
    }

    /// Load language metadata from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|io_err| {
            DictionaryError::FailedToRead(path.to_owned(), io_err)
        })?;
        let languages: Languages =
            toml::from_str(&content).map_err(|toml_err| {
                DictionaryError::Metadata(Some(path.to_owned()), toml_err)
            })?;
        if languages.is_empty() {
            warn!("{} doesn't define any languages", path.display());
        }
        Ok(languages)
    }

    /// Serialize the metadata as TOML.
    pub fn to_toml_string(&self) -> Result<String, DictionaryError> {
        toml::to_string(self).map_err(DictionaryError::MetadataSerialize)
    }

    /// Get the metadata for an exact language code.
    #[inline]
    pub fn get(&self, code: &str) -> Option<&LanguageInfo> {
        self.languages.get(code)
    }

    /// Get the metadata for a language code, after trimming and lowercasing
    /// it.
    pub fn resolve(
        &self,
        code: &str,
    ) -> Result<&LanguageInfo, DictionaryError> {
        let code = code.trim().to_lowercase();
        self.languages
            .get(&code)
            .ok_or(DictionaryError::UnknownLanguage(code))
    }

    /// Returns `true` if metadata exists for the exact language code.
    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Iterate through the language codes.
    pub fn codes(&self) -> impl ExactSizeIterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    /// Iterate through `(language code, metadata)` pairs.
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = (&str, &LanguageInfo)> {
        self.languages
            .iter()
            .map(|(code, info)| (code.as_str(), info))
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
}

impl<K> FromIterator<(K, LanguageInfo)> for Languages
where
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, LanguageInfo)>>(iter: T) -> Self {
        Languages {
            languages: iter
                .into_iter()
                .map(|(code, info)| (code.into(), info))
                .collect(),
        }
    }
}
