use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use log::info;

use crate::{
    Dictionary, WordTable, errors::DictionaryError, store::create_parent_dir,
};

/// The CSV header row written by [`write_csv`].
pub const CSV_HEADER: [&str; 4] =
    ["word", "definition", "part_of_speech", "example"];

/// Write a word table as CSV: a [`CSV_HEADER`] row, then one row per entry
/// in table order. Fields are quoted only when needed and rows end in
/// `\r\n`.
pub fn write_csv(table: &WordTable, mut wtr: impl Write) -> io::Result<()> {
    write_row(&mut wtr, CSV_HEADER)?;
    table.iter().try_for_each(|(headword, entry)| {
        write_row(&mut wtr, [
            headword,
            entry.definition(),
            entry.part_of_speech(),
            entry.example(),
        ])
    })
}

/// Export one language of `dictionary` to a CSV file at `path`, creating
/// missing parent directories.
///
/// Nothing is written if the language isn't in the dictionary.
pub fn export_csv(
    dictionary: &Dictionary,
    language: &str,
    path: impl AsRef<Path>,
) -> Result<(), DictionaryError> {
    let path = path.as_ref();
    let language = language.trim().to_lowercase();
    let table = dictionary
        .get(&language)
        .ok_or_else(|| DictionaryError::UnknownLanguage(language.clone()))?;

    let write_err =
        |io_err| DictionaryError::FailedToWrite(path.to_owned(), io_err);
    create_parent_dir(path)?;
    let mut wtr = BufWriter::new(File::create(path).map_err(write_err)?);
    write_csv(table, &mut wtr).map_err(write_err)?;
    wtr.flush().map_err(write_err)?;

    info!(
        "exported {} '{language}' entries to {}",
        table.len(),
        path.display(),
    );
    Ok(())
}

fn write_row<'a>(
    mut wtr: impl Write,
    fields: impl IntoIterator<Item = &'a str>,
) -> io::Result<()> {
    fields
        .into_iter()
        .enumerate()
        .try_for_each(|(index, field)| {
            if index != 0 {
                wtr.write_all(b",")?;
            }
            quote_csv_cell(&mut wtr, field.as_bytes())
        })?;
    wtr.write_all(b"\r\n")
}

fn quote_csv_cell(mut wtr: impl Write, mut data: &[u8]) -> io::Result<()> {
    let mut output = [0; 4096];
    let mut writer = csv_core::Writer::new();
    loop {
        let (result, nin, nout) = writer.field(data, &mut output);
        wtr.write_all(&output[..nout])?;
        data = &data[nin..];
        if result == csv_core::WriteResult::InputEmpty {
            break;
        }
    }
    let (result, nout) = writer.finish(&mut output);
    debug_assert_eq!(result, csv_core::WriteResult::InputEmpty);
    wtr.write_all(&output[..nout])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str) -> String {
        let mut buf = Vec::new();
        quote_csv_cell(&mut buf, text.as_bytes()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_cells_are_not_quoted() {
        assert_eq!(cell("maçã"), "maçã");
    }

    #[test]
    fn cells_with_separators_are_quoted() {
        assert_eq!(
            cell("At a fast speed; rapidly, too"),
            "\"At a fast speed; rapidly, too\"",
        );
        assert_eq!(
            cell("Je pense, donc je suis."),
            "\"Je pense, donc je suis.\"",
        );
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
