use std::path::PathBuf;

use crate::{
    Res, config, info,
    pipeline::{
        batch::fetch_aligned,
        writer::{BatchWriter, ChunkedReader, count_rows},
    },
    spotify::SpotifyClient,
    success,
    types::{AudioFeatureRecord, SummaryRow, TrackIdRow},
};

use super::{ensure_parent, finish, start};

pub const DEFAULT_CHUNK_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct FeaturesOptions {
    /// CSV with a `trackid` column.
    pub input: PathBuf,
    pub output: PathBuf,
    pub chunk_size: usize,
    /// Data rows in `input`, only used for progress output. Counted when
    /// not given.
    pub rows: Option<usize>,
}

/// Audio-feature crawl.
///
/// Reads track ids chunk by chunk, looks up their audio features and writes
/// every chunk before reading the next one. Ids without features still get
/// a row carrying only the id.
pub async fn features(opts: FeaturesOptions) -> Res<()> {
    start();

    let mut spotify = SpotifyClient::connect(config::spotify()?).await?;
    ensure_parent(&opts.output).await?;

    let chunk_size = opts.chunk_size.max(1);
    let num_chunks = opts
        .rows
        .or_else(|| count_rows(&opts.input).ok())
        .map(|rows| rows.div_ceil(chunk_size));
    let reader = ChunkedReader::<_, TrackIdRow>::from_path(&opts.input, chunk_size)?;
    let mut writer = BatchWriter::<AudioFeatureRecord>::new(&opts.output);

    let mut ids_read = 0;
    let mut with_features = 0;

    for (chunk_index, chunk) in reader.enumerate() {
        let chunk = chunk?;
        match num_chunks {
            Some(total) => info!("Extracting features for chunk {} / {}", chunk_index + 1, total),
            None => info!("Extracting features for chunk {}", chunk_index + 1),
        }

        let ids: Vec<String> = chunk.into_iter().map(|row| row.trackid).collect();
        let records = fetch_aligned(&mut spotify, &ids).await?;

        ids_read += ids.len();
        with_features += records.iter().filter(|r| r.features.is_some()).count();
        writer.write(&records, chunk_index == 0)?;
    }

    success!(
        "Wrote {} rows to {}",
        writer.rows_written(),
        writer.path().display()
    );

    finish(vec![
        SummaryRow::new("track ids read", ids_read),
        SummaryRow::new("with audio features", with_features),
        SummaryRow::new("id-only rows", ids_read - with_features),
        SummaryRow::new("rows written", writer.rows_written()),
    ]);
    Ok(())
}
