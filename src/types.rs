use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::pipeline::{batch::Stub, writer::CsvRecord};

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// A song as it moves through the lyric crawls.
///
/// Created by ingestion with artist and title, then enriched in place by the
/// reconciliation and lyric stages. Fields are only ever filled, never
/// cleared. `song_id` and `song_url` identify the record at the lyric
/// provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub artist_name: String,
    pub song_title: String,
    pub genre: Option<String>,
    pub artist_id: Option<u64>,
    pub song_id: Option<u64>,
    pub song_url: Option<String>,
    pub album_id: Option<u64>,
    pub album_name: Option<String>,
    pub lyrics: Option<String>,
}

/// A search hit from the secondary provider, not yet confirmed as a match.
pub type Candidate = TrackRecord;

impl TrackRecord {
    pub fn new(artist_name: impl Into<String>, song_title: impl Into<String>) -> Self {
        Self {
            artist_name: artist_name.into(),
            song_title: song_title.into(),
            ..Default::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Copies the provider identifiers of an accepted candidate.
    pub fn absorb_match(&mut self, candidate: &Candidate) {
        if candidate.artist_id.is_some() {
            self.artist_id = candidate.artist_id;
        }
        if candidate.song_id.is_some() {
            self.song_id = candidate.song_id;
        }
        if candidate.song_url.is_some() {
            self.song_url = candidate.song_url.clone();
        }
    }
}

impl CsvRecord for TrackRecord {
    fn header() -> Vec<&'static str> {
        vec![
            "artist_name",
            "song_title",
            "genre",
            "artist_id",
            "song_id",
            "song_url",
            "album_id",
            "album_name",
            "lyrics",
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.artist_name.clone(),
            self.song_title.clone(),
            opt(&self.genre),
            opt(&self.artist_id),
            opt(&self.song_id),
            opt(&self.song_url),
            opt(&self.album_id),
            opt(&self.album_name),
            opt(&self.lyrics),
        ]
    }
}

/// One row of the audio-feature crawl.
///
/// `features` is `None` for the stub written when the provider had no data
/// for `trackid`, which keeps output rows aligned with the input ids.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFeatureRecord {
    pub trackid: String,
    pub features: Option<AudioFeatures>,
}

impl Stub for AudioFeatureRecord {
    fn stub(id: &str) -> Self {
        Self {
            trackid: id.to_string(),
            features: None,
        }
    }
}

impl CsvRecord for AudioFeatureRecord {
    fn header() -> Vec<&'static str> {
        vec![
            "trackid",
            "danceability",
            "energy",
            "key",
            "loudness",
            "mode",
            "speechiness",
            "acousticness",
            "instrumentalness",
            "liveness",
            "valence",
            "tempo",
            "duration_ms",
            "time_signature",
            "type",
            "id",
            "uri",
            "track_href",
            "analysis_url",
        ]
    }

    fn record(&self) -> Vec<String> {
        let mut row = vec![self.trackid.clone()];
        match &self.features {
            Some(f) => row.extend([
                opt(&f.danceability),
                opt(&f.energy),
                opt(&f.key),
                opt(&f.loudness),
                opt(&f.mode),
                opt(&f.speechiness),
                opt(&f.acousticness),
                opt(&f.instrumentalness),
                opt(&f.liveness),
                opt(&f.valence),
                opt(&f.tempo),
                opt(&f.duration_ms),
                opt(&f.time_signature),
                opt(&f.kind),
                opt(&f.id),
                opt(&f.uri),
                opt(&f.track_href),
                opt(&f.analysis_url),
            ]),
            None => row.extend(std::iter::repeat_n(String::new(), Self::header().len() - 1)),
        }
        row
    }
}

/// A playlist track with the tags Last.fm knows for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTrack {
    pub artist_name: String,
    pub track_name: String,
    pub tags: Vec<String>,
}

impl CsvRecord for TaggedTrack {
    fn header() -> Vec<&'static str> {
        vec!["artist_name", "track_name", "genre"]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.artist_name.clone(),
            self.track_name.clone(),
            self.tags.join(", "),
        ]
    }
}

/// Input row of the audio-feature crawl; other columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackIdRow {
    pub trackid: String,
}

/// One line of the end-of-run summary table.
#[derive(Tabled)]
pub struct SummaryRow {
    pub stage: String,
    pub records: usize,
}

impl SummaryRow {
    pub fn new(stage: &str, records: usize) -> Self {
        Self {
            stage: stage.to_string(),
            records,
        }
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Spotify payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentialsResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i32>,
    pub loudness: Option<f64>,
    pub mode: Option<i32>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub duration_ms: Option<u64>,
    pub time_signature: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub uri: Option<String>,
    pub track_href: Option<String>,
    pub analysis_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSearchResponse {
    pub playlists: PlaylistSearchPage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSearchPage {
    // Spotify pads search results with nulls for removed playlists.
    pub items: Vec<Option<PlaylistSummary>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Genius payloads
// ---------------------------------------------------------------------------

/// Every Genius API answer wraps its payload in `{"response": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeniusEnvelope<T> {
    pub response: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSearch {
    #[serde(default)]
    pub hits: Vec<GeniusHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHit {
    pub result: GeniusHitResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusHitResult {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub primary_artist: GeniusArtist,
}

impl From<&GeniusHitResult> for Candidate {
    fn from(hit: &GeniusHitResult) -> Self {
        Candidate {
            artist_name: hit.primary_artist.name.clone(),
            song_title: hit.title.clone(),
            artist_id: Some(hit.primary_artist.id),
            song_id: Some(hit.id),
            song_url: Some(hit.url.clone()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusArtist {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusArtistSongs {
    #[serde(default)]
    pub songs: Vec<GeniusSongSummary>,
    pub next_page: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSongSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSongDetail {
    pub song: GeniusSong,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusSong {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub album: Option<GeniusAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeniusAlbum {
    pub id: u64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Last.fm payloads
// ---------------------------------------------------------------------------

/// Last.fm collapses single-element lists into a bare object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmError {
    pub error: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTopTags {
    pub toptags: LastfmTagList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastfmTagList {
    #[serde(default)]
    pub tag: OneOrMany<LastfmTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTag {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTopTracks {
    pub tracks: LastfmTrackList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastfmTrackList {
    #[serde(default)]
    pub track: OneOrMany<LastfmTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTrack {
    pub name: String,
    pub artist: LastfmArtist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTrackInfo {
    pub track: Option<LastfmTrackDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LastfmTrackDetail {
    #[serde(default)]
    pub toptags: Option<LastfmTagField>,
}

/// `toptags` is an object when tags exist and sometimes a blank string when
/// they do not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LastfmTagField {
    Tags(LastfmTagList),
    Blank(serde_json::Value),
}

impl LastfmTagField {
    pub fn names(self) -> Vec<String> {
        match self {
            LastfmTagField::Tags(list) => list.tag.into_vec().into_iter().map(|t| t.name).collect(),
            LastfmTagField::Blank(_) => Vec::new(),
        }
    }
}
