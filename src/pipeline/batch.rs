use crate::{
    client::Reconnect,
    errors::{Provider, ProviderError},
    warning,
};

/// Placeholder for an id the provider had no data for.
pub trait Stub {
    fn stub(id: &str) -> Self;
}

/// A provider endpoint that resolves many ids in one request.
#[allow(async_fn_in_trait)]
pub trait BatchLookup: Reconnect {
    type Item: Stub;

    fn provider(&self) -> Provider;

    /// Largest number of ids the provider accepts in one call.
    fn max_batch(&self) -> usize;

    /// One request; the result has one entry per id, `None` where the
    /// provider returned null.
    async fn lookup_batch(&mut self, ids: &[String]) -> Result<Vec<Option<Self::Item>>, ProviderError>;
}

/// Looks up `ids` and returns exactly one item per id, in input order.
///
/// Ids are sent in sub-batches of at most `max_batch()`. A sub-batch that
/// fails authorization is retried once after a reconnect; a second failure
/// propagates. Null entries become [`Stub::stub`] records.
pub async fn fetch_aligned<S: BatchLookup>(
    source: &mut S,
    ids: &[String],
) -> Result<Vec<S::Item>, ProviderError> {
    let mut aligned = Vec::with_capacity(ids.len());

    for batch in ids.chunks(source.max_batch().max(1)) {
        let found = match source.lookup_batch(batch).await {
            Err(e) if e.is_unauthorized() => {
                warning!("{}. Reconnecting and retrying the batch once.", e);
                source.reconnect().await?;
                source.lookup_batch(batch).await?
            }
            other => other?,
        };

        if found.len() != batch.len() {
            return Err(ProviderError::BatchMismatch {
                provider: source.provider(),
                expected: batch.len(),
                got: found.len(),
            });
        }

        aligned.extend(
            batch
                .iter()
                .zip(found)
                .map(|(id, item)| item.unwrap_or_else(|| <S::Item as Stub>::stub(id))),
        );
    }

    Ok(aligned)
}
