use crate::{
    client::Reconnect,
    errors::ProviderError,
    pipeline::paginator::{Cursor, Page, PageSource},
    types::{GeniusArtistSongs, GeniusSong, GeniusSongDetail, GeniusSongSummary, TrackRecord},
};

use super::GeniusClient;

const SONGS_PER_PAGE: u32 = 50;

impl GeniusClient {
    /// Paged discography of an artist, sorted by title.
    pub fn artist_songs(&mut self, artist_id: u64) -> ArtistSongs<'_> {
        ArtistSongs {
            client: self,
            artist_id,
        }
    }

    /// Full song record including album information.
    pub async fn song(&self, song_id: u64) -> Result<GeniusSong, ProviderError> {
        let detail: GeniusSongDetail = self
            .get(
                &format!("songs/{}", song_id),
                &[("text_format", "plain".to_string())],
            )
            .await?;
        Ok(detail.song)
    }
}

/// Builds the output record of a discography song.
pub fn discography_record(artist_name: &str, artist_id: u64, song: GeniusSong) -> TrackRecord {
    let (album_id, album_name) = match song.album {
        Some(album) => (Some(album.id), Some(album.name)),
        None => (None, None),
    };

    TrackRecord {
        artist_name: artist_name.to_string(),
        song_title: song.title,
        artist_id: Some(artist_id),
        song_id: Some(song.id),
        song_url: Some(song.url),
        album_id,
        album_name,
        ..Default::default()
    }
}

/// Page source over `GET /artists/{id}/songs`.
///
/// Genius keeps answering past the last page with an empty song list, which
/// ends the pagination.
pub struct ArtistSongs<'c> {
    client: &'c mut GeniusClient,
    artist_id: u64,
}

impl Reconnect for ArtistSongs<'_> {
    async fn reconnect(&mut self) -> Result<(), ProviderError> {
        self.client.reconnect().await
    }
}

impl PageSource for ArtistSongs<'_> {
    type Item = GeniusSongSummary;

    fn first_cursor(&self) -> Cursor {
        Cursor::Number(1)
    }

    async fn fetch_page(&mut self, cursor: &Cursor) -> Result<Page<GeniusSongSummary>, ProviderError> {
        let page = match cursor {
            Cursor::Number(n) => *n,
            Cursor::Url(_) => 1,
        };

        let response: GeniusArtistSongs = self
            .client
            .get(
                &format!("artists/{}/songs", self.artist_id),
                &[
                    ("page", page.to_string()),
                    ("per_page", SONGS_PER_PAGE.to_string()),
                    ("sort", "title".to_string()),
                ],
            )
            .await?;

        Ok(Page::numbered(response.songs, page))
    }
}
