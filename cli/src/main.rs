#![allow(missing_docs)]

mod fmt;

use std::{
    borrow::Cow,
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use env_logger::Env;
use log::{error, info, warn};
use static_lang_dictionary::{
    Dictionary, LANGUAGES, Languages, SNAPSHOT, SnapshotStore, StoreConfig,
    export_csv,
    validate::{unmatched_languages, validate_dictionary, validate_file},
};

use crate::fmt::{
    FormatEntry, OutputFormat, format_issues, format_languages, format_words,
};

fn main() -> ExitCode {
    match _main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            error!("{why:#}");
            ExitCode::FAILURE
        },
    }
}

// Default to debug logs on debug builds, info otherwise
#[cfg(debug_assertions)]
type DictionaryVerbosity = Verbosity<clap_verbosity_flag::DebugLevel>;
#[cfg(not(debug_assertions))]
type DictionaryVerbosity = Verbosity<clap_verbosity_flag::InfoLevel>;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Dictionary JSON file to read [default: the embedded snapshot]
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Language metadata TOML file [default: the embedded metadata]
    #[arg(long, global = true)]
    languages: Option<PathBuf>,

    /// How to print results
    #[arg(
        long,
        value_enum,
        global = true,
        default_value_t = OutputFormat::Human
    )]
    format: OutputFormat,

    #[command(flatten)]
    verbosity: DictionaryVerbosity,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the entry for a word
    Lookup {
        /// Language code, e.g. "en"
        language: String,
        /// The word to look up
        word: String,
    },
    /// List the headwords of a language, sorted
    List {
        /// Language code, e.g. "pt"
        language: String,
    },
    /// Print the language metadata
    Languages,
    /// Check a dictionary's structure and content
    Validate {
        /// The file to check [default: --input, or the embedded snapshot]
        file: Option<PathBuf>,
        /// Fail on warnings as well as errors
        #[arg(long)]
        strict: bool,
    },
    /// Export one language as CSV
    Export {
        /// Language code, e.g. "es"
        language: String,
        /// Where to write the CSV [default: data/export/dictionary_<LANG>.csv]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the dictionary as pretty JSON
    Dump {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the dictionary to a file, backing up the file it replaces
    Save {
        /// The dictionary file to write
        file: PathBuf,
    },
}

fn _main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(args.verbosity.into())
        .parse_env(Env::new().filter("LANG_DICTIONARY_LOG"))
        .init();

    let input = args.input.as_deref();
    let languages: Cow<'_, Languages> = match &args.languages {
        Some(path) => Cow::Owned(Languages::load(path)?),
        None => Cow::Borrowed(&*LANGUAGES),
    };
    let format = args.format;

    match args.command {
        Command::Lookup { language, word } => {
            let dictionary = load_dictionary(input)?;
            let entry = dictionary.lookup(&word, &language).ok_or_else(|| {
                anyhow!("'{word}' not found in language '{language}'")
            })?;
            println!("{}", entry.format(&word, &language, format));
        },
        Command::List { language } => {
            let dictionary = load_dictionary(input)?;
            let words = dictionary
                .list_words(&language)
                .ok_or_else(|| anyhow!("unknown language '{language}'"))?;
            info!("{} words in '{language}'", words.len());
            println!("{}", format_words(&words, format)?);
        },
        Command::Languages => {
            let dictionary = load_dictionary(input)?;
            let (without_metadata, without_words) =
                unmatched_languages(&dictionary, &languages);
            without_metadata.iter().for_each(|code| {
                warn!("dictionary has words for '{code}' but no metadata");
            });
            without_words.iter().for_each(|code| {
                warn!("metadata for '{code}' but the dictionary has no words");
            });
            println!("{}", format_languages(&languages, format)?);
        },
        Command::Validate { file, strict } => {
            // Files are checked as raw JSON, so malformed ones still get a
            // report
            let report = match file.as_deref().or(input) {
                Some(path) => validate_file(path, &languages)?,
                None => validate_dictionary(&SNAPSHOT, &languages),
            };
            if !report.is_empty() {
                println!("{}", format_issues(report.issues(), format)?);
            }
            let errors = report.errors().count();
            let warnings = report.warnings().count();
            info!("{errors} errors, {warnings} warnings");
            if errors > 0 {
                bail!("validation failed with {errors} errors");
            }
            if strict && warnings > 0 {
                bail!("validation failed with {warnings} warnings (--strict)");
            }
        },
        Command::Export { language, output } => {
            let dictionary = load_dictionary(input)?;
            let path = output.unwrap_or_else(|| {
                SnapshotStore::default().export_path(&language)
            });
            export_csv(&dictionary, &language, &path)?;
        },
        Command::Dump { output } => {
            let dictionary = load_dictionary(input)?;
            match output {
                Some(path) => {
                    let file = fs::File::create(&path).with_context(|| {
                        format!("failed to create {}", path.display())
                    })?;
                    let mut wtr = BufWriter::new(file);
                    dictionary.write_json(&mut wtr)?;
                    wtr.flush()?;
                    info!("wrote {}", path.display());
                },
                None => println!("{}", dictionary.to_json_string()?),
            }
        },
        Command::Save { file } => {
            let dictionary = load_dictionary(input)?;
            let store = SnapshotStore::new(StoreConfig {
                dictionary_path: file,
                ..StoreConfig::default()
            });
            match store.save(&dictionary)? {
                Some(backup) => {
                    info!("previous file kept as {}", backup.display())
                },
                None => info!("no previous file to back up"),
            }
        },
    }
    Ok(())
}

fn load_dictionary(
    input: Option<&Path>,
) -> anyhow::Result<Cow<'static, Dictionary>> {
    match input {
        Some(path) => {
            let dictionary = Dictionary::load(path).with_context(|| {
                format!("failed to load {}", path.display())
            })?;
            Ok(Cow::Owned(dictionary))
        },
        None => Ok(Cow::Borrowed(&*SNAPSHOT)),
    }
}
