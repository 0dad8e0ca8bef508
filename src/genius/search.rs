use crate::{
    errors::{Provider, ProviderError},
    pipeline::reconcile::CandidateSearch,
    types::{Candidate, GeniusArtist, GeniusHitResult, GeniusSearch, TrackRecord},
};

use super::GeniusClient;

impl GeniusClient {
    /// Keyword search, hits in Genius relevance order.
    pub async fn search(&self, query: &str) -> Result<Vec<GeniusHitResult>, ProviderError> {
        let response: GeniusSearch = self.get("search", &[("q", query.to_string())]).await?;
        Ok(response.hits.into_iter().map(|hit| hit.result).collect())
    }

    /// Resolves an artist by name.
    ///
    /// `name` is expected lower-cased. The first hit whose primary artist
    /// name, lower-cased, equals `name` wins.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Empty`] when the search has no hits or none of them
    /// belongs to the artist.
    pub async fn find_artist(&self, name: &str) -> Result<GeniusArtist, ProviderError> {
        let hits = self.search(name).await?;
        pick_artist(name, hits).ok_or_else(|| ProviderError::Empty {
            provider: Provider::Genius,
            what: format!("artist {:?}", name),
        })
    }
}

/// First primary artist whose lower-cased name equals `name`.
pub fn pick_artist(name: &str, hits: Vec<GeniusHitResult>) -> Option<GeniusArtist> {
    hits.into_iter()
        .map(|hit| hit.primary_artist)
        .find(|artist| artist.name.to_lowercase() == name)
}

/// Search query used to look up a record: title first, then artist.
pub fn candidate_query(target: &TrackRecord) -> String {
    format!("{} {}", target.song_title, target.artist_name)
}

impl CandidateSearch for GeniusClient {
    async fn search_candidates(&mut self, target: &TrackRecord) -> Result<Vec<Candidate>, ProviderError> {
        let hits = self.search(&candidate_query(target)).await?;
        Ok(hits.iter().map(Candidate::from).collect())
    }
}
