use crate::{
    config::MatchConfig,
    pipeline::similarity::{Similarity, SimilarityMetric},
    types::{Candidate, TrackRecord},
};

/// Decides whether a search candidate is the same song as a target record.
///
/// A candidate is accepted when both its artist similarity and its title
/// similarity are strictly above the threshold. Candidates are tried in the
/// provider's ranking order and the first acceptable one wins, even if a
/// later one would score higher. The artist is scored first; a candidate
/// that fails on the artist never has its title scored.
///
/// Scores are taken as `similarity(candidate_field, target_field)`.
#[derive(Debug, Clone)]
pub struct RecordMatcher<S = SimilarityMetric> {
    similarity: S,
    threshold: f64,
}

impl<S: Similarity> RecordMatcher<S> {
    pub fn new(similarity: S, threshold: f64) -> Self {
        Self {
            similarity,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn accepts(&self, target: &TrackRecord, candidate: &Candidate) -> bool {
        self.similarity
            .similarity(&candidate.artist_name, &target.artist_name)
            > self.threshold
            && self
                .similarity
                .similarity(&candidate.song_title, &target.song_title)
                > self.threshold
    }

    /// First candidate that clears the threshold on both fields.
    pub fn find_match<'c>(
        &self,
        target: &TrackRecord,
        candidates: &'c [Candidate],
    ) -> Option<&'c Candidate> {
        candidates.iter().find(|c| self.accepts(target, c))
    }

    /// Index of the accepted candidate for every target, `None` for targets
    /// that would be dropped.
    pub fn partition(
        &self,
        targets: &[TrackRecord],
        candidate_lists: &[Vec<Candidate>],
    ) -> Vec<Option<usize>> {
        targets
            .iter()
            .zip(candidate_lists)
            .map(|(target, candidates)| {
                candidates
                    .iter()
                    .position(|c| self.accepts(target, c))
            })
            .collect()
    }
}

impl Default for RecordMatcher<SimilarityMetric> {
    fn default() -> Self {
        MatchConfig::default().into()
    }
}

impl From<MatchConfig> for RecordMatcher<SimilarityMetric> {
    fn from(cfg: MatchConfig) -> Self {
        Self::new(cfg.metric, cfg.threshold)
    }
}
