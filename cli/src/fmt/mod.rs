use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use static_lang_dictionary::{Languages, WordEntry, validate::Issue};

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for reading in a terminal
    Human,
    /// One JSON document
    Json,
}

#[derive(Debug, Copy, Clone)]
pub struct EntryFormatter<'a> {
    word: &'a str,
    language: &'a str,
    entry: &'a WordEntry,
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    word: &'a str,
    language: &'a str,
    #[serde(flatten)]
    entry: &'a WordEntry,
}

impl fmt::Display for EntryFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let EntryFormatter {
            word,
            language,
            entry,
            format,
        } = *self;
        match format {
            OutputFormat::Human => {
                writeln!(
                    f,
                    "{word} ({}) [{language}]",
                    entry.part_of_speech(),
                )?;
                writeln!(f, "  {}", entry.definition())?;
                // Formatter shouldn't leave a trailing newline
                write!(f, "  Example: {}", entry.example_or_fallback(word))
            },
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&JsonEntry {
                    word,
                    language,
                    entry,
                })
                .map_err(|_| fmt::Error)?;
                f.write_str(&json)
            },
        }
    }
}

pub trait FormatEntry<'a> {
    fn format(
        &'a self,
        word: &'a str,
        language: &'a str,
        format: OutputFormat,
    ) -> EntryFormatter<'a>;
}

impl<'a> FormatEntry<'a> for WordEntry {
    fn format(
        &'a self,
        word: &'a str,
        language: &'a str,
        format: OutputFormat,
    ) -> EntryFormatter<'a> {
        EntryFormatter {
            word,
            language,
            entry: self,
            format,
        }
    }
}

pub fn format_languages(
    languages: &Languages,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => Ok(languages
            .iter()
            .map(|(code, info)| {
                format!(
                    "{code}\t{}\t{}\t{}",
                    info.name(),
                    info.code(),
                    info.tts_code(),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(languages)?),
    }
}

pub fn format_issues(
    issues: &[Issue],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => Ok(issues
            .iter()
            .map(Issue::to_string)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            let issues = issues
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "severity": issue.severity().to_string(),
                        "language": issue.language,
                        "headword": issue.headword,
                        "message": issue.kind.to_string(),
                    })
                })
                .collect::<Vec<_>>();
            Ok(serde_json::to_string_pretty(&issues)?)
        },
    }
}

pub fn format_words(
    words: &[&str],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => Ok(words.join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(words)?),
    }
}
