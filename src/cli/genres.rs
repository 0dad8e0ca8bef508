use std::path::PathBuf;

use crate::{
    Res,
    client::with_reconnect,
    config, info,
    lastfm::LastfmClient,
    pipeline::{paginator::Paginator, writer::write_all},
    spotify::SpotifyClient,
    success,
    types::{SummaryRow, TaggedTrack},
    utils::{clean_lastfm_query, spinner},
    warning,
};

use super::{ensure_parent, finish, start};

pub const DEFAULT_PLAYLIST: &str = "BIGGEST PLAYLIST WITH ALL THE BEST SONGS";

#[derive(Debug, Clone)]
pub struct GenresOptions {
    /// Exact playlist names.
    pub playlists: Vec<String>,
    pub output: PathBuf,
}

/// Genre crawl.
///
/// Collects the tracks of the given Spotify playlists, looks up their
/// Last.fm tags and keeps the tracks that have at least one. Provider calls
/// that fail authorization are retried once after a reconnect; a second
/// failure aborts the job.
pub async fn genres(opts: GenresOptions) -> Res<()> {
    start();

    let mut spotify = SpotifyClient::connect(config::spotify()?).await?;
    let mut lastfm = LastfmClient::new(config::lastfm()?);

    let mut tracks: Vec<TaggedTrack> = Vec::new();
    for name in &opts.playlists {
        let playlist = match with_reconnect(&mut spotify, async |s: &mut SpotifyClient| {
            s.find_playlist(name).await
        })
        .await
        {
            Ok(playlist) => playlist,
            Err(e) if e.is_empty() => {
                warning!("Playlist {} not found, skipping.", name);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        info!("Fetching tracks of {} (owner {})", playlist.name, playlist.owner.id);
        let pb = spinner(format!("Fetching tracks of {}...", playlist.name));
        let playlist_tracks = Paginator::new(spotify.playlist_tracks(&playlist.id))
            .collect_all()
            .await?;
        pb.finish_and_clear();
        success!("Fetched {} tracks from {}", playlist_tracks.len(), playlist.name);
        tracks.extend(playlist_tracks);
    }
    let collected = tracks.len();

    let pb = spinner("Fetching tags...");
    let mut tagged = Vec::with_capacity(collected);
    for (position, mut track) in tracks.into_iter().enumerate() {
        pb.set_message(format!(
            "Fetching tags for: {} - {} ({}/{})",
            track.artist_name,
            track.track_name,
            position + 1,
            collected
        ));

        let artist = clean_lastfm_query(&track.artist_name);
        let title = clean_lastfm_query(&track.track_name);
        let tags = with_reconnect(&mut lastfm, async |l: &mut LastfmClient| {
            l.track_tags(&artist, &title).await
        })
        .await;
        match tags {
            Ok(tags) => track.tags = tags,
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => pb.suspend(|| {
                warning!(
                    "No tags for {} - {}: {}",
                    track.artist_name,
                    track.track_name,
                    e
                )
            }),
        }

        if !track.tags.is_empty() {
            tagged.push(track);
        }
    }
    pb.finish_and_clear();

    ensure_parent(&opts.output).await?;
    let written = write_all(&opts.output, &tagged)?;
    success!("Wrote {} tagged tracks to {}", written, opts.output.display());

    finish(vec![
        SummaryRow::new("playlist tracks", collected),
        SummaryRow::new("with tags", tagged.len()),
        SummaryRow::new("rows written", written),
    ]);
    Ok(())
}
