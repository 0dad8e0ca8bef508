use std::path::PathBuf;

use crate::{
    Res,
    client::with_reconnect,
    config::{self, MatchConfig},
    genius::{GeniusClient, songs::discography_record},
    info,
    lastfm::LastfmClient,
    pipeline::{matcher::RecordMatcher, paginator::Paginator, reconcile::reconcile, writer::write_all},
    success,
    types::{SummaryRow, TrackRecord},
    utils::{normalize_artist_arg, progress_bar, spinner},
    warning,
};

use super::{ensure_parent, finish, start};

#[derive(Debug, Clone)]
pub struct LyricsOptions {
    /// Words of the artist name. `None` runs the tag crawl.
    pub artist: Option<Vec<String>>,
    /// Pages of top tracks per tag.
    pub pages: usize,
    /// Tracks kept from each page of top tracks.
    pub top_n: Option<usize>,
    pub matching: MatchConfig,
    pub output: PathBuf,
}

/// Lyric crawl.
///
/// With an artist, crawls that artist's Genius discography. Without one,
/// collects the Last.fm top tracks of every top tag, keeps the tracks that
/// reconcile with a Genius song and fetches their lyrics.
pub async fn lyrics(opts: LyricsOptions) -> Res<()> {
    start();

    let mut genius = GeniusClient::new(config::genius()?);
    let summary = match &opts.artist {
        Some(words) => {
            let Some(summary) = artist_crawl(&mut genius, &normalize_artist_arg(words), &opts).await?
            else {
                return Ok(());
            };
            summary
        }
        None => tag_crawl(&mut genius, &opts).await?,
    };

    finish(summary);
    Ok(())
}

/// `None` when the artist does not exist at Genius.
async fn artist_crawl(
    genius: &mut GeniusClient,
    artist_name: &str,
    opts: &LyricsOptions,
) -> Res<Option<Vec<SummaryRow>>> {
    info!("Retrieving results for artist: {}", artist_name);

    let artist = match with_reconnect(&mut *genius, async |g: &mut GeniusClient| {
        g.find_artist(artist_name).await
    })
    .await
    {
        Ok(artist) => artist,
        Err(e) if e.is_empty() => {
            println!("Artist name {} not found...", artist_name);
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let pb = spinner("Fetching discography...");
    let mut pages = Paginator::new(genius.artist_songs(artist.id));
    let mut song_ids = Vec::new();
    while let Some(songs) = pages.next_page().await? {
        pb.set_message(format!("Retrieved results for page {}", pages.pages_fetched()));
        song_ids.extend(songs.into_iter().map(|s| s.id));
    }
    pb.finish_and_clear();
    success!("Found {} songs for {}", song_ids.len(), artist.name);

    let pb = progress_bar(song_ids.len() as u64, "Retrieving songs...");
    let mut records = Vec::with_capacity(song_ids.len());
    for song_id in &song_ids {
        pb.set_message(format!("Retrieving song: {}", song_id));
        let song = with_reconnect(&mut *genius, async |g: &mut GeniusClient| g.song(*song_id).await).await?;
        records.push(discography_record(artist_name, artist.id, song));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let with_lyrics = attach_lyrics(genius, &mut records).await;

    ensure_parent(&opts.output).await?;
    let written = write_all(&opts.output, &records)?;
    success!("Wrote {} songs to {}", written, opts.output.display());

    Ok(Some(vec![
        SummaryRow::new("discography songs", song_ids.len()),
        SummaryRow::new("with lyrics", with_lyrics),
        SummaryRow::new("rows written", written),
    ]))
}

async fn tag_crawl(genius: &mut GeniusClient, opts: &LyricsOptions) -> Res<Vec<SummaryRow>> {
    let mut lastfm = LastfmClient::new(config::lastfm()?);

    let pb = spinner("Fetching top tags...");
    let tags = with_reconnect(&mut lastfm, async |l: &mut LastfmClient| l.top_tags().await).await?;
    pb.finish_and_clear();
    success!("Found {} top tags", tags.len());

    let pb = spinner("Fetching top tracks...");
    let mut tracks: Vec<TrackRecord> = Vec::new();
    for tag in &tags {
        pb.set_message(format!("Fetching top tracks for: {}", tag));
        let tag_tracks = Paginator::new(lastfm.tag_top_tracks(tag, opts.top_n))
            .with_max_pages(Some(opts.pages))
            .collect_all()
            .await?;
        tracks.extend(tag_tracks);
    }
    pb.finish_and_clear();
    let collected = tracks.len();
    success!("Collected {} tracks", collected);

    let matcher = RecordMatcher::from(opts.matching);
    let pb = spinner("Matching tracks...");
    let mut matched = reconcile(tracks, genius, &matcher, &pb).await?;
    pb.finish_and_clear();
    success!(
        "Matched {} of {} tracks ({} metric, threshold {})",
        matched.len(),
        collected,
        opts.matching.metric,
        matcher.threshold()
    );

    let with_lyrics = attach_lyrics(genius, &mut matched).await;

    ensure_parent(&opts.output).await?;
    let written = write_all(&opts.output, &matched)?;
    success!("Wrote {} songs to {}", written, opts.output.display());

    Ok(vec![
        SummaryRow::new("top tags", tags.len()),
        SummaryRow::new("tracks collected", collected),
        SummaryRow::new("matched", matched.len()),
        SummaryRow::new("with lyrics", with_lyrics),
        SummaryRow::new("rows written", written),
    ])
}

/// Fills in lyrics where the song page can be scraped.
///
/// Failures are reported and leave the lyrics empty. Returns the number of
/// records that got lyrics.
async fn attach_lyrics(genius: &GeniusClient, records: &mut [TrackRecord]) -> usize {
    let pb = progress_bar(records.len() as u64, "Retrieving lyrics...");
    let mut found = 0;

    for record in records.iter_mut() {
        pb.set_message(format!(
            "Retrieving lyrics for: {} - {}",
            record.artist_name, record.song_title
        ));

        if let Some(url) = record.song_url.as_deref() {
            match genius.fetch_lyrics(url).await {
                Ok(lyrics) => {
                    record.lyrics = Some(lyrics);
                    found += 1;
                }
                Err(e) => pb.suspend(|| {
                    warning!(
                        "No lyrics for {} - {}: {}",
                        record.artist_name,
                        record.song_title,
                        e
                    )
                }),
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    found
}
