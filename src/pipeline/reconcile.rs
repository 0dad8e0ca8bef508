use indicatif::ProgressBar;

use crate::{
    client::Reconnect,
    errors::ProviderError,
    pipeline::{matcher::RecordMatcher, similarity::Similarity},
    types::{Candidate, TrackRecord},
    warning,
};

/// A provider that answers a record with a ranked list of candidates.
#[allow(async_fn_in_trait)]
pub trait CandidateSearch: Reconnect {
    async fn search_candidates(&mut self, target: &TrackRecord) -> Result<Vec<Candidate>, ProviderError>;
}

/// Matches every record against the search results of `search`.
///
/// Matched records get the identifiers of their accepted candidate, records
/// without an acceptable candidate are dropped. Survivors keep their input
/// order. A search that fails authorization is retried once after a
/// reconnect.
pub async fn reconcile<C, S>(
    records: Vec<TrackRecord>,
    search: &mut C,
    matcher: &RecordMatcher<S>,
    pb: &ProgressBar,
) -> Result<Vec<TrackRecord>, ProviderError>
where
    C: CandidateSearch,
    S: Similarity,
{
    let total = records.len();
    let mut matched = Vec::with_capacity(total);

    for (position, mut record) in records.into_iter().enumerate() {
        pb.set_message(format!(
            "Fetching match for: {} - {} ({}/{})",
            record.artist_name,
            record.song_title,
            position + 1,
            total
        ));

        let candidates = match search.search_candidates(&record).await {
            Err(e) if e.is_unauthorized() => {
                warning!("{}. Reconnecting and retrying the search once.", e);
                search.reconnect().await?;
                search.search_candidates(&record).await?
            }
            other => other?,
        };

        if let Some(candidate) = matcher.find_match(&record, &candidates) {
            record.absorb_match(candidate);
            matched.push(record);
        }
    }

    Ok(matched)
}
