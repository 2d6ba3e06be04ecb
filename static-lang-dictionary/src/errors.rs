//! The errors produced while reading, checking and writing dictionaries.
use std::{io, path::PathBuf};

use thiserror::Error;

/// An error encountered while loading, saving or exporting a
/// [`Dictionary`](crate::Dictionary) or its language metadata.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Unable to read a dictionary, metadata or backup file.
    #[error("failed to read from {}: {}", .0.display(), .1)]
    FailedToRead(PathBuf, io::Error),
    /// Unable to write a dictionary, metadata, backup or export file.
    #[error("failed to write to {}: {}", .0.display(), .1)]
    FailedToWrite(PathBuf, io::Error),
    /// The dictionary document was not valid JSON, or didn't have the
    /// language → headword → entry shape.
    #[error("failed to parse dictionary{}: {}", DisplayPath(.0), .1)]
    Json(Option<PathBuf>, serde_json::Error),
    /// Unable to parse the language metadata.
    #[error("failed to parse language metadata{}: {}", DisplayPath(.0), .1)]
    Metadata(Option<PathBuf>, toml::de::Error),
    /// Unable to serialize the language metadata.
    #[error("failed to serialize language metadata: {0}")]
    MetadataSerialize(toml::ser::Error),
    /// The language code isn't present in the dictionary or metadata.
    #[error("unknown language: \"{0}\"")]
    UnknownLanguage(String),
    /// A freshly saved dictionary file could not be read back.
    #[error("saved dictionary {} did not read back: {}", .0.display(), .1)]
    PostSaveValidation(PathBuf, serde_json::Error),
}

struct DisplayPath<'a>(&'a Option<PathBuf>);

impl std::fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(path) => write!(f, " from {}", path.display()),
            None => Ok(()),
        }
    }
}
