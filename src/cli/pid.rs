use std::{fs::File, path::PathBuf};

use crate::{
    Res, info, success,
    types::SummaryRow,
    utils::{append_unique_pid, parse_song_file_number},
};

use super::{finish, start};

#[derive(Debug, Clone)]
pub struct AddPidOptions {
    /// Directory holding the `songs<N>.csv` files.
    pub dir: PathBuf,
    pub output: PathBuf,
}

/// Adds a `unique_pid` column to every `songs<N>.csv` in a directory.
///
/// The result of `songs<N>.csv` is written to `append_songs<N>.csv` in the
/// output directory. Other files are ignored.
pub async fn add_pid(opts: AddPidOptions) -> Res<()> {
    start();

    let mut inputs: Vec<(PathBuf, String)> = std::fs::read_dir(&opts.dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter_map(|path| parse_song_file_number(&path).map(|n| (path, n)))
        .collect();
    inputs.sort();

    async_fs::create_dir_all(&opts.output).await?;

    let mut rows = 0;
    for (path, number) in &inputs {
        info!("Writing for file {}", number);
        let input = File::open(path)?;
        let output = File::create(opts.output.join(format!("append_songs{}.csv", number)))?;
        rows += append_unique_pid(number, input, output)?;
    }
    success!("Processed {} files", inputs.len());

    finish(vec![
        SummaryRow::new("files", inputs.len()),
        SummaryRow::new("rows", rows),
    ]);
    Ok(())
}
