use std::{
    io::{Read, Write},
    path::Path,
    sync::LazyLock,
    time::Duration,
};

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

static SONG_FILE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"songs(\d*)\.csv").ok());

/// Joins the words of a repeated CLI argument with single spaces and
/// lower-cases the result.
///
/// `["Kendrick", "LAMAR"]` becomes `"kendrick lamar"`.
pub fn normalize_artist_arg(words: &[String]) -> String {
    words.join(" ").to_lowercase()
}

/// Shape of artist and track names as the tag lookup sends them:
/// spaces, apostrophes and `#` removed, lower-cased.
pub fn clean_lastfm_query(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '\'' | '#'))
        .collect::<String>()
        .to_lowercase()
}

pub fn strip_spaces(value: &str) -> String {
    value.replace(' ', "")
}

/// Current local time as printed in the job START/END lines.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS),
    );
    pb
}

pub fn progress_bar(len: u64, message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_message(message.into());
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars(TICK_CHARS)
            .progress_chars("=> "),
    );
    pb
}

/// File number of a `songs<N>.csv` file, `None` for any other name.
///
/// `songs.csv` has an empty number.
pub fn parse_song_file_number(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let re = SONG_FILE.as_ref()?;
    re.captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Copies a CSV from `input` to `output`, appending a `unique_pid` column.
///
/// The pid of a row is `file_number` followed by the row's first cell. Rows
/// keep their width; short rows are not padded. Returns the number of data
/// rows written. An input without a header row produces no output.
pub fn append_unique_pid<R: Read, W: Write>(
    file_number: &str,
    input: R,
    output: W,
) -> Result<usize, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(output);

    let mut records = reader.records();
    let Some(header) = records.next().transpose()? else {
        return Ok(0);
    };

    let mut header: Vec<String> = header.iter().map(str::to_string).collect();
    header.push("unique_pid".to_string());
    writer.write_record(&header)?;

    let mut rows = 0;
    for record in records {
        let record = record?;
        let pid = format!("{}{}", file_number, record.get(0).unwrap_or_default());
        let mut row: Vec<&str> = record.iter().collect();
        row.push(&pid);
        writer.write_record(&row)?;
        rows += 1;
    }

    writer.flush()?;
    Ok(rows)
}
