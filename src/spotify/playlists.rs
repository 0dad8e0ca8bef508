use crate::{
    client::Reconnect,
    errors::{Provider, ProviderError},
    pipeline::paginator::{Cursor, Page, PageSource},
    types::{PlaylistSearchResponse, PlaylistSummary, PlaylistTracksPage, TaggedTrack},
    warning,
};

use super::SpotifyClient;

const PLAYLIST_PAGE_SIZE: u32 = 100;

impl SpotifyClient {
    /// Searches playlists and returns the first one named exactly `name`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Empty`] when no search result carries that name.
    pub async fn find_playlist(&mut self, name: &str) -> Result<PlaylistSummary, ProviderError> {
        let url = self.endpoint("search");
        let response: PlaylistSearchResponse = self
            .get(&url, &[("q", name), ("type", "playlist")])
            .await?;

        response
            .playlists
            .items
            .into_iter()
            .flatten()
            .find(|p| p.name == name)
            .ok_or_else(|| ProviderError::Empty {
                provider: Provider::Spotify,
                what: format!("playlist {:?}", name),
            })
    }

    /// Paged tracks of a playlist.
    pub fn playlist_tracks(&mut self, playlist_id: &str) -> PlaylistTracks<'_> {
        PlaylistTracks {
            client: self,
            playlist_id: playlist_id.to_string(),
        }
    }
}

/// Page source over `GET /playlists/{id}/tracks`.
///
/// Entries whose track is missing (removed or local files) are skipped. A
/// page that held only such entries still links to the next one.
/// Items carry only artist and track name; tags are filled in later.
pub struct PlaylistTracks<'c> {
    client: &'c mut SpotifyClient,
    playlist_id: String,
}

impl PlaylistTracks<'_> {
    fn page_url(&self, offset: u32) -> String {
        format!(
            "{}?limit={}&offset={}",
            self.client
                .endpoint(&format!("playlists/{}/tracks", self.playlist_id)),
            PLAYLIST_PAGE_SIZE,
            offset
        )
    }
}

impl Reconnect for PlaylistTracks<'_> {
    async fn reconnect(&mut self) -> Result<(), ProviderError> {
        self.client.reconnect().await
    }
}

impl PageSource for PlaylistTracks<'_> {
    type Item = TaggedTrack;

    fn first_cursor(&self) -> Cursor {
        Cursor::Url(self.page_url(0))
    }

    async fn fetch_page(&mut self, cursor: &Cursor) -> Result<Page<TaggedTrack>, ProviderError> {
        let url = match cursor {
            Cursor::Url(url) => url.clone(),
            Cursor::Number(n) => self.page_url(n.saturating_sub(1) * PLAYLIST_PAGE_SIZE),
        };

        let page: PlaylistTracksPage = self.client.get(&url, &[]).await?;
        let received = page.items.len();

        let items = page
            .items
            .into_iter()
            .filter_map(|item| match item.track {
                Some(track) if !track.artists.is_empty() => Some(TaggedTrack {
                    artist_name: track.artists[0].name.clone(),
                    track_name: track.name,
                    tags: Vec::new(),
                }),
                Some(track) => {
                    warning!("Skipping playlist track without artists: {}", track.name);
                    None
                }
                None => {
                    warning!("Skipping playlist entry without track data.");
                    None
                }
            })
            .collect();

        Ok(Page {
            items,
            received,
            next: page.next.map(Cursor::Url),
        })
    }
}
