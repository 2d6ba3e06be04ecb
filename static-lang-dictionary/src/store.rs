use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Local;
use log::{debug, info};

use crate::{Dictionary, LANGUAGES, Languages, errors::DictionaryError};

/// Where a [`SnapshotStore`] keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// The dictionary JSON document.
    pub dictionary_path: PathBuf,
    /// The language metadata TOML file.
    pub language_data_path: PathBuf,
    /// The directory CSV exports are written to.
    pub export_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            dictionary_path: PathBuf::from("data/dictionary_data.json"),
            language_data_path: PathBuf::from("data/languages.toml"),
            export_dir: PathBuf::from("data/export"),
        }
    }
}

impl StoreConfig {
    /// A config with every file inside `dir`, laid out like the default.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        StoreConfig {
            dictionary_path: dir.join("dictionary_data.json"),
            language_data_path: dir.join("languages.toml"),
            export_dir: dir.join("export"),
        }
    }
}

/// Reads and writes dictionary snapshots on disk, keeping a timestamped
/// backup of the previous file on every save.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    config: StoreConfig,
}

impl SnapshotStore {
    /// Create a store over the files named in `config`. Nothing is touched
    /// on disk until a method is called.
    pub const fn new(config: StoreConfig) -> Self {
        SnapshotStore { config }
    }

    /// The store's file locations.
    #[inline]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create any missing files: an empty dictionary, the default language
    /// metadata, and the export directory.
    pub fn ensure_files_exist(&self) -> Result<(), DictionaryError> {
        let StoreConfig {
            dictionary_path,
            language_data_path,
            export_dir,
        } = &self.config;

        if !dictionary_path.exists() {
            write_file(dictionary_path, b"{}")?;
            info!("created empty dictionary {}", dictionary_path.display());
        }
        if !language_data_path.exists() {
            let content = LANGUAGES.to_toml_string()?;
            write_file(language_data_path, content.as_bytes())?;
            info!(
                "created default language metadata {}",
                language_data_path.display(),
            );
        }
        if !export_dir.exists() {
            fs::create_dir_all(export_dir).map_err(|io_err| {
                DictionaryError::FailedToWrite(export_dir.clone(), io_err)
            })?;
            info!("created export directory {}", export_dir.display());
        }
        Ok(())
    }

    /// Load the dictionary and its language metadata.
    pub fn load(&self) -> Result<(Dictionary, Languages), DictionaryError> {
        let dictionary = Dictionary::load(&self.config.dictionary_path)?;
        let languages = Languages::load(&self.config.language_data_path)?;
        Ok((dictionary, languages))
    }

    /// Write `dictionary` to the dictionary file.
    ///
    /// If the file already exists it is first copied to
    /// `<file>.backup.<YYYYmmddHHMMSS>`, and the backup path is returned.
    /// After writing, the file is read back and parsed again.
    pub fn save(
        &self,
        dictionary: &Dictionary,
    ) -> Result<Option<PathBuf>, DictionaryError> {
        let path = &self.config.dictionary_path;
        let backup = if path.exists() {
            let timestamp = Local::now().format("%Y%m%d%H%M%S").to_string();
            let backup = backup_path(path, &timestamp);
            fs::copy(path, &backup).map_err(|io_err| {
                DictionaryError::FailedToWrite(backup.clone(), io_err)
            })?;
            info!("backed up {} to {}", path.display(), backup.display());
            Some(backup)
        } else {
            None
        };

        create_parent_dir(path)?;
        let file = File::create(path).map_err(|io_err| {
            DictionaryError::FailedToWrite(path.clone(), io_err)
        })?;
        let mut wtr = BufWriter::new(file);
        dictionary.write_json(&mut wtr).map_err(|json_err| {
            DictionaryError::FailedToWrite(path.clone(), json_err.into())
        })?;
        wtr.flush().map_err(|io_err| {
            DictionaryError::FailedToWrite(path.clone(), io_err)
        })?;
        info!(
            "saved {} entries in {} languages to {}",
            dictionary.total_entries(),
            dictionary.len(),
            path.display(),
        );

        self.check_saved()?;
        Ok(backup)
    }

    /// The CSV export path for a language.
    pub fn export_path(&self, language: &str) -> PathBuf {
        self.config
            .export_dir
            .join(format!("dictionary_{}.csv", language.trim().to_lowercase()))
    }

    fn check_saved(&self) -> Result<(), DictionaryError> {
        let path = &self.config.dictionary_path;
        let content = fs::read_to_string(path).map_err(|io_err| {
            DictionaryError::FailedToRead(path.clone(), io_err)
        })?;
        serde_json::from_str::<Dictionary>(&content).map_err(|json_err| {
            DictionaryError::PostSaveValidation(path.clone(), json_err)
        })?;
        debug!("{} reads back cleanly", path.display());
        Ok(())
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        SnapshotStore::new(StoreConfig::default())
    }
}

/// `<path>.backup.<timestamp>`, next to `path`.
pub fn backup_path(path: &Path, timestamp: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".backup.");
    name.push(timestamp);
    PathBuf::from(name)
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), DictionaryError> {
    create_parent_dir(path)?;
    fs::write(path, content).map_err(|io_err| {
        DictionaryError::FailedToWrite(path.to_owned(), io_err)
    })
}

pub(crate) fn create_parent_dir(path: &Path) -> Result<(), DictionaryError> {
    match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent).map_err(|io_err| {
            DictionaryError::FailedToWrite(parent.to_owned(), io_err)
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_file_must_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(StoreConfig::in_dir(dir.path()));
        store.save(&Dictionary::default()).unwrap();
        store.check_saved().unwrap();

        // Truncated between the write and the read back
        let path = &store.config().dictionary_path;
        fs::write(path, "{\"en\": {").unwrap();
        match store.check_saved() {
            Err(DictionaryError::PostSaveValidation(failed, _)) => {
                assert_eq!(&failed, path)
            },
            other => panic!("expected a read back failure, got {other:?}"),
        }
    }
}
