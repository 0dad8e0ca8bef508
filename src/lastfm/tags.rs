use crate::{
    client::Reconnect,
    errors::ProviderError,
    pipeline::paginator::{Cursor, Page, PageSource},
    types::{LastfmTopTags, LastfmTopTracks, LastfmTrackInfo, TrackRecord},
    utils::strip_spaces,
};

use super::LastfmClient;

/// Last.fm code for an unknown track.
const TRACK_NOT_FOUND: i64 = 6;

impl LastfmClient {
    /// Global top tags, with spaces removed from every name.
    pub async fn top_tags(&self) -> Result<Vec<String>, ProviderError> {
        let response: LastfmTopTags = self.call("tag.gettoptags", &[]).await?;
        Ok(response
            .toptags
            .tag
            .into_vec()
            .into_iter()
            .map(|t| strip_spaces(&t.name))
            .collect())
    }

    /// Paged top tracks of `tag`, each tagged with it as genre.
    pub fn tag_top_tracks(&mut self, tag: &str, top_n: Option<usize>) -> TagTopTracks<'_> {
        TagTopTracks {
            client: self,
            tag: tag.to_string(),
            top_n,
        }
    }

    /// Tag names of a track, most popular first.
    ///
    /// Unknown tracks and tracks without tags give an empty list.
    pub async fn track_tags(&self, artist: &str, track: &str) -> Result<Vec<String>, ProviderError> {
        let result: Result<LastfmTrackInfo, _> = self
            .call(
                "track.getInfo",
                &[("artist", artist.to_string()), ("track", track.to_string())],
            )
            .await;

        match result {
            Ok(info) => Ok(info
                .track
                .and_then(|t| t.toptags)
                .map(|tags| tags.names())
                .unwrap_or_default()),
            Err(ProviderError::Api { code, .. }) if code == TRACK_NOT_FOUND => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

/// Page source over `tag.gettoptracks`.
pub struct TagTopTracks<'c> {
    client: &'c mut LastfmClient,
    tag: String,
    top_n: Option<usize>,
}

impl Reconnect for TagTopTracks<'_> {
    async fn reconnect(&mut self) -> Result<(), ProviderError> {
        self.client.reconnect().await
    }
}

impl PageSource for TagTopTracks<'_> {
    type Item = TrackRecord;

    fn first_cursor(&self) -> Cursor {
        Cursor::Number(1)
    }

    async fn fetch_page(&mut self, cursor: &Cursor) -> Result<Page<TrackRecord>, ProviderError> {
        let page = match cursor {
            Cursor::Number(n) => *n,
            Cursor::Url(_) => 1,
        };

        let response: LastfmTopTracks = self
            .client
            .call(
                "tag.gettoptracks",
                &[("tag", self.tag.clone()), ("page", page.to_string())],
            )
            .await?;

        let mut tracks = response.tracks.track.into_vec();
        let received = tracks.len();
        if let Some(n) = self.top_n {
            tracks.truncate(n);
        }

        let items = tracks
            .into_iter()
            .map(|t| TrackRecord::new(t.artist.name, t.name).with_genre(self.tag.as_str()))
            .collect();

        Ok(Page {
            items,
            received,
            next: Some(Cursor::Number(page + 1)),
        })
    }
}
