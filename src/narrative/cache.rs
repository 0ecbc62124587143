use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::NarrativeError;
use super::provider::{GenerationOptions, NarrativeProvider};

/// Get the platform-appropriate narrative cache directory
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("req-rank/narratives"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/req-rank/narratives",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the narrative cache directory
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Serializable cache entry for disk storage
#[derive(Debug, Serialize, Deserialize)]
struct CachedNarrative {
    text: String,
    cached_at: DateTime<Utc>,
}

/// Disk-persistent cache in front of a narrative provider.
///
/// Only successful generations are stored. Entries are keyed by model,
/// prompt and sampling options, and expire after `ttl`.
pub struct CachedProvider<P> {
    inner: P,
    cache_path: PathBuf,
    ttl: Duration,
}

impl<P: NarrativeProvider> CachedProvider<P> {
    pub fn new(inner: P, cache_path: PathBuf, ttl: Duration) -> Self {
        Self {
            inner,
            cache_path,
            ttl,
        }
    }

    fn cache_key(&self, prompt: &str, options: &GenerationOptions) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.inner.model_id().as_bytes());
        hasher.update(&[0]);
        hasher.update(prompt.as_bytes());
        hasher.update(&[0]);
        hasher.update(&options.max_output_tokens.to_le_bytes());
        hasher.update(&options.temperature.to_le_bytes());
        hasher.update(&options.top_p.to_le_bytes());
        format!("narrative:{}", hasher.finalize().to_hex())
    }

    fn is_fresh(&self, entry: &CachedNarrative) -> bool {
        match (Utc::now() - entry.cached_at).to_std() {
            Ok(age) => age < self.ttl,
            // Timestamp in the future (clock moved back); treat as fresh
            Err(_) => true,
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        let bytes = cacache::read_sync(&self.cache_path, key).ok()?;
        let entry: CachedNarrative = serde_json::from_slice(&bytes).ok()?;
        self.is_fresh(&entry).then_some(entry.text)
    }

    fn write(&self, key: &str, text: &str) {
        let entry = CachedNarrative {
            text: text.to_string(),
            cached_at: Utc::now(),
        };
        // Cache write failures only cost a future backend call
        let result = serde_json::to_vec(&entry)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| {
                cacache::write_sync(&self.cache_path, key, bytes)
                    .map(|_| ())
                    .map_err(anyhow::Error::from)
            });
        if let Err(e) = result {
            tracing::debug!(error = %e, "failed to write narrative cache entry");
        }
    }
}

#[async_trait]
impl<P: NarrativeProvider> NarrativeProvider for CachedProvider<P> {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, NarrativeError> {
        let key = self.cache_key(prompt, options);
        if let Some(text) = self.read(&key) {
            tracing::debug!(key = %key, "narrative cache hit");
            return Ok(text);
        }

        let text = self.inner.generate(prompt, options).await?;
        self.write(&key, &text);
        Ok(text)
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; fails when the prompt contains "fail".
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NarrativeProvider for CountingProvider {
        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerationOptions,
        ) -> Result<String, NarrativeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt.contains("fail") {
                Err(NarrativeError::Timeout)
            } else {
                Ok(format!("narrative for {}", prompt))
            }
        }

        fn model_id(&self) -> &str {
            "counting"
        }
    }

    fn cached(dir: &Path, ttl: Duration) -> CachedProvider<CountingProvider> {
        CachedProvider::new(
            CountingProvider {
                calls: AtomicUsize::new(0),
            },
            dir.to_path_buf(),
            ttl,
        )
    }

    #[tokio::test]
    async fn test_second_call_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let provider = cached(dir.path(), Duration::from_secs(3600));
        let options = GenerationOptions::default();

        let first = provider.generate("sso", &options).await.unwrap();
        let second = provider.generate("sso", &options).await.unwrap();

        assert_eq!(first, "narrative for sso");
        assert_eq!(first, second);
        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_options_are_part_of_key() {
        let dir = tempfile::tempdir().unwrap();
        let provider = cached(dir.path(), Duration::from_secs(3600));
        let options = GenerationOptions::default();
        let hotter = GenerationOptions {
            temperature: 1.2,
            ..options
        };

        provider.generate("sso", &options).await.unwrap();
        provider.generate("sso", &hotter).await.unwrap();

        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let provider = cached(dir.path(), Duration::from_secs(3600));
        let options = GenerationOptions::default();

        assert!(provider.generate("fail", &options).await.is_err());
        assert!(provider.generate("fail", &options).await.is_err());

        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entries_are_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let provider = cached(dir.path(), Duration::ZERO);
        let options = GenerationOptions::default();

        provider.generate("sso", &options).await.unwrap();
        provider.generate("sso", &options).await.unwrap();

        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_missing_cache_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        assert!(clear_cache(&dir.path().join("absent")).is_ok());
    }

    #[tokio::test]
    async fn test_clear_cache_forgets_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("narratives");
        let provider = cached(&cache_dir, Duration::from_secs(3600));
        let options = GenerationOptions::default();

        provider.generate("sso", &options).await.unwrap();
        clear_cache(&cache_dir).unwrap();
        provider.generate("sso", &options).await.unwrap();

        assert_eq!(provider.inner.calls.load(Ordering::SeqCst), 2);
    }
}
