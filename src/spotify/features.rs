use crate::{
    errors::{Provider, ProviderError},
    pipeline::batch::BatchLookup,
    types::{AudioFeatureRecord, AudioFeatures, AudioFeaturesResponse},
};

use super::SpotifyClient;

/// Hard limit of the `/audio-features` endpoint.
pub const MAX_AUDIO_FEATURE_IDS: usize = 100;

impl SpotifyClient {
    /// Audio features for up to 100 track ids, aligned with `ids`.
    ///
    /// # Errors
    ///
    /// [`ProviderError::BatchTooLarge`] when more than
    /// [`MAX_AUDIO_FEATURE_IDS`] ids are passed; no request is sent then.
    pub async fn audio_features(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, ProviderError> {
        if ids.len() > MAX_AUDIO_FEATURE_IDS {
            return Err(ProviderError::BatchTooLarge {
                provider: Provider::Spotify,
                max: MAX_AUDIO_FEATURE_IDS,
                got: ids.len(),
            });
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint("audio-features");
        let joined = ids.join(",");
        let response: AudioFeaturesResponse = self.get(&url, &[("ids", joined.as_str())]).await?;
        Ok(response.audio_features)
    }
}

impl BatchLookup for SpotifyClient {
    type Item = AudioFeatureRecord;

    fn provider(&self) -> Provider {
        Provider::Spotify
    }

    fn max_batch(&self) -> usize {
        MAX_AUDIO_FEATURE_IDS
    }

    async fn lookup_batch(
        &mut self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatureRecord>>, ProviderError> {
        let features = self.audio_features(ids).await?;
        if features.len() != ids.len() {
            return Err(ProviderError::BatchMismatch {
                provider: Provider::Spotify,
                expected: ids.len(),
                got: features.len(),
            });
        }

        Ok(ids
            .iter()
            .zip(features)
            .map(|(id, features)| {
                features.map(|f| AudioFeatureRecord {
                    trackid: id.clone(),
                    features: Some(f),
                })
            })
            .collect())
    }
}
