//! Integrity checks for dictionary documents.
//!
//! Structural checks work on untyped JSON and report problems that would
//! stop a document from loading as a [`Dictionary`]. Content checks work on a
//! loaded [`Dictionary`] and report oddities that load fine but suggest
//! incomplete data. Nothing here modifies the data.
use std::{
    collections::{HashMap, HashSet},
    fmt, fs,
    path::Path,
};

use log::{debug, info};
use serde_json::Value;

use crate::{
    Dictionary, Languages, WordTable,
    dictionary::{PLACEHOLDER_EXAMPLE, normalize_headword},
    errors::DictionaryError,
};

/// The fields every entry must have, and the only ones it may have.
pub const ENTRY_FIELDS: [&str; 3] = ["definition", "part_of_speech", "example"];

/// How serious an [`Issue`] is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious, but the document still loads.
    Warning,
    /// The document does not have the dictionary shape.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// What's wrong.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// The top level of the document is not an object.
    TopLevelNotObject,
    /// A language code maps to something other than an object.
    LanguageNotObject,
    /// A headword maps to something other than an object.
    EntryNotObject,
    /// A required field is absent.
    MissingField(&'static str),
    /// A field is present but isn't a string.
    FieldNotString(String),
    /// The entry has a field that isn't one of [`ENTRY_FIELDS`].
    UnknownField(String),
    /// The language code has no language metadata.
    UnknownLanguage,
    /// A field is empty or only whitespace.
    EmptyField(&'static str),
    /// The example is [`PLACEHOLDER_EXAMPLE`].
    PlaceholderExample,
    /// The headword isn't trimmed and lowercase, so normalized lookups can't
    /// find it.
    HeadwordNotNormalized {
        /// What lookups search for.
        normalized: String,
    },
    /// Several part of speech labels in the language differ only by case.
    InconsistentPartOfSpeech {
        /// Every spelling seen, in order of first appearance.
        variants: Vec<String>,
    },
}

impl IssueKind {
    /// How serious this kind of issue is.
    pub const fn severity(&self) -> Severity {
        match self {
            IssueKind::TopLevelNotObject
            | IssueKind::LanguageNotObject
            | IssueKind::EntryNotObject
            | IssueKind::MissingField(_)
            | IssueKind::FieldNotString(_)
            | IssueKind::UnknownField(_) => Severity::Error,
            IssueKind::UnknownLanguage
            | IssueKind::EmptyField(_)
            | IssueKind::PlaceholderExample
            | IssueKind::HeadwordNotNormalized { .. }
            | IssueKind::InconsistentPartOfSpeech { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::TopLevelNotObject => {
                f.write_str("top level is not an object")
            },
            IssueKind::LanguageNotObject => {
                f.write_str("language does not map to an object")
            },
            IssueKind::EntryNotObject => {
                f.write_str("entry is not an object")
            },
            IssueKind::MissingField(field) => {
                write!(f, "missing field \"{field}\"")
            },
            IssueKind::FieldNotString(field) => {
                write!(f, "field \"{field}\" is not a string")
            },
            IssueKind::UnknownField(field) => {
                write!(f, "unknown field \"{field}\"")
            },
            IssueKind::UnknownLanguage => {
                f.write_str("no metadata for this language")
            },
            IssueKind::EmptyField(field) => {
                write!(f, "field \"{field}\" is empty")
            },
            IssueKind::PlaceholderExample => {
                write!(
                    f,
                    "example is the placeholder \"{PLACEHOLDER_EXAMPLE}\""
                )
            },
            IssueKind::HeadwordNotNormalized { normalized } => {
                write!(
                    f,
                    "headword is not normalized (lookups use \"{normalized}\")"
                )
            },
            IssueKind::InconsistentPartOfSpeech { variants } => {
                write!(f, "part of speech spelled inconsistently: {variants:?}")
            },
        }
    }
}

/// A single finding, located by language and headword where relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The language code the issue was found under.
    pub language: Option<String>,
    /// The headword the issue was found under.
    pub headword: Option<String>,
    /// What's wrong.
    pub kind: IssueKind,
}

impl Issue {
    fn new(
        language: Option<&str>,
        headword: Option<&str>,
        kind: IssueKind,
    ) -> Self {
        Issue {
            language: language.map(String::from),
            headword: headword.map(String::from),
            kind,
        }
    }

    /// How serious the issue is.
    #[inline]
    pub const fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity())?;
        match (&self.language, &self.headword) {
            (Some(language), Some(headword)) => {
                write!(f, "{language}/{headword}: ")?
            },
            (Some(language), None) => write!(f, "{language}: ")?,
            (None, Some(headword)) => write!(f, "{headword}: ")?,
            (None, None) => {},
        }
        write!(f, "{}", self.kind)
    }
}

/// Everything found by a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    /// All issues, in the order they were found.
    #[inline]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// The issues that stop the document loading.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
    }

    /// The issues that don't stop the document loading.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }

    /// Returns `true` if there are no errors. Warnings are allowed.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Get how many issues there are.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if nothing at all was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }
}

/// Check that an untyped JSON document has the dictionary shape: an object
/// of language codes, each mapping to an object of headwords, each mapping
/// to an object with exactly the string fields in [`ENTRY_FIELDS`].
pub fn validate_value(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Value::Object(languages) = document else {
        report.push(Issue::new(None, None, IssueKind::TopLevelNotObject));
        return report;
    };
    for (language, words) in languages {
        let Value::Object(words) = words else {
            report.push(Issue::new(
                Some(language.as_str()),
                None,
                IssueKind::LanguageNotObject,
            ));
            continue;
        };
        for (headword, entry) in words {
            validate_entry_value(&mut report, language, headword, entry);
        }
    }
    report
}

fn validate_entry_value(
    report: &mut ValidationReport,
    language: &str,
    headword: &str,
    entry: &Value,
) {
    let at = |kind| Issue::new(Some(language), Some(headword), kind);
    let Value::Object(fields) = entry else {
        report.push(at(IssueKind::EntryNotObject));
        return;
    };
    for field in ENTRY_FIELDS {
        match fields.get(field) {
            None => report.push(at(IssueKind::MissingField(field))),
            Some(Value::String(_)) => {},
            Some(_) => {
                report.push(at(IssueKind::FieldNotString(field.to_owned())))
            },
        }
    }
    fields
        .keys()
        .filter(|key| !ENTRY_FIELDS.contains(&key.as_str()))
        .for_each(|key| report.push(at(IssueKind::UnknownField(key.clone()))));
}

/// Report content oddities in a loaded dictionary. Every issue found is a
/// [`Severity::Warning`].
pub fn validate_dictionary(
    dictionary: &Dictionary,
    languages: &Languages,
) -> ValidationReport {
    #[cfg(feature = "rayon")]
    let reports = {
        use rayon::prelude::*;
        dictionary
            .par_iter()
            .map(|(code, table)| validate_table(code, table, languages))
            .collect::<Vec<_>>()
    };
    #[cfg(not(feature = "rayon"))]
    let reports = dictionary
        .iter()
        .map(|(code, table)| validate_table(code, table, languages))
        .collect::<Vec<_>>();

    let mut report = ValidationReport::default();
    reports.into_iter().for_each(|table_report| report.extend(table_report));
    report
}

fn validate_table(
    language: &str,
    table: &WordTable,
    languages: &Languages,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    if !languages.contains(language) {
        report.push(Issue::new(
            Some(language),
            None,
            IssueKind::UnknownLanguage,
        ));
    }

    // Lowercased label → spellings, in order of first appearance
    let mut part_of_speech_spellings: Vec<(String, Vec<&str>)> = Vec::new();
    let mut spelling_index: HashMap<String, usize> = HashMap::new();

    for (headword, entry) in table {
        let at = |kind| Issue::new(Some(language), Some(headword), kind);

        let normalized = normalize_headword(headword);
        if normalized != headword {
            report.push(at(IssueKind::HeadwordNotNormalized { normalized }));
        }

        [
            ("definition", entry.definition()),
            ("part_of_speech", entry.part_of_speech()),
            ("example", entry.example()),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .for_each(|(field, _)| report.push(at(IssueKind::EmptyField(field))));

        if entry.example().trim() == PLACEHOLDER_EXAMPLE {
            report.push(at(IssueKind::PlaceholderExample));
        }

        let label = entry.part_of_speech().trim();
        if label.is_empty() {
            continue;
        }
        let folded = label.to_lowercase();
        let index = *spelling_index.entry(folded.clone()).or_insert_with(|| {
            part_of_speech_spellings.push((folded, Vec::new()));
            part_of_speech_spellings.len() - 1
        });
        let spellings = &mut part_of_speech_spellings[index].1;
        if !spellings.contains(&label) {
            spellings.push(label);
        }
    }

    part_of_speech_spellings
        .into_iter()
        .filter(|(_, spellings)| spellings.len() > 1)
        .for_each(|(_, spellings)| {
            report.push(Issue::new(
                Some(language),
                None,
                IssueKind::InconsistentPartOfSpeech {
                    variants: spellings.into_iter().map(String::from).collect(),
                },
            ));
        });

    debug!("{language}: {} issues in {} entries", report.len(), table.len());
    report
}

/// Validate a dictionary file: JSON syntax, then shape, then (if the shape
/// is sound) content.
///
/// Fails only if the file can't be read or isn't JSON at all; everything
/// else is reported.
pub fn validate_file(
    path: impl AsRef<Path>,
    languages: &Languages,
) -> Result<ValidationReport, DictionaryError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|io_err| {
        DictionaryError::FailedToRead(path.to_owned(), io_err)
    })?;
    let document: Value = serde_json::from_str(&content).map_err(|json_err| {
        DictionaryError::Json(Some(path.to_owned()), json_err)
    })?;

    let mut report = validate_value(&document);
    if report.is_valid() {
        let dictionary: Dictionary =
            serde_json::from_value(document).map_err(|json_err| {
                DictionaryError::Json(Some(path.to_owned()), json_err)
            })?;
        report.extend(validate_dictionary(&dictionary, languages));
    }
    info!(
        "validated {}: {} errors, {} warnings",
        path.display(),
        report.errors().count(),
        report.warnings().count(),
    );
    Ok(report)
}

/// Languages in `dictionary` that have no metadata, and metadata entries
/// with no words in `dictionary`.
pub fn unmatched_languages<'a>(
    dictionary: &'a Dictionary,
    languages: &'a Languages,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let in_dictionary = dictionary.language_codes().collect::<HashSet<_>>();
    let without_metadata = dictionary
        .language_codes()
        .filter(|code| !languages.contains(code))
        .collect();
    let without_words = languages
        .codes()
        .filter(|code| !in_dictionary.contains(code))
        .collect();
    (without_metadata, without_words)
}
