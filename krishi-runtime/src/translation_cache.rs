use anyhow::Context;
use async_trait::async_trait;
use krishi_core::language::SOURCE_LANGUAGE;
use krishi_engine::traits::{TranslationProvider, Translator};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Disk-backed cache in front of a translation provider.
///
/// Every successful translation is persisted immediately so nothing is lost
/// if the process dies. Failures degrade to the source text and are not
/// cached, leaving the next call free to retry.
pub struct TranslationCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
    provider: Arc<dyn TranslationProvider>,
}

impl TranslationCache {
    /// Opens the cache at `path`, seeding from an existing file when one is
    /// present. A malformed file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>, provider: Arc<dyn TranslationProvider>) -> Self {
        let path = path.into();
        let entries = match Self::try_load(&path) {
            Ok(map) => map,
            Err(e) => {
                log::warn!(
                    "unreadable translation cache at {}, starting empty: {e:#}",
                    path.display()
                );
                HashMap::new()
            }
        };
        Self { path, entries: Mutex::new(entries), provider }
    }

    fn try_load(path: &Path) -> anyhow::Result<HashMap<String, String>> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(anyhow::Error::new(e))
                    .with_context(|| format!("read translation cache: {}", path.display()));
            }
        };
        serde_json::from_slice(&bytes).context("decode translation cache JSON")
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cache_key(text: &str, target_language: &str) -> String {
        format!("{text}_{target_language}")
    }

    /// Returns the cached translation, or translates and stores it. English
    /// sessions and empty inputs pass through untouched.
    pub async fn get_or_translate(&self, text: &str, target_language: &str) -> String {
        if text.trim().is_empty() || target_language == SOURCE_LANGUAGE {
            return text.to_string();
        }

        let key = Self::cache_key(text, target_language);
        if let Some(hit) = self.entries.lock().unwrap().get(&key) {
            return hit.clone();
        }

        match self
            .provider
            .translate(text, SOURCE_LANGUAGE, target_language)
            .await
        {
            Ok(translated) => {
                let snapshot = {
                    let mut entries = self.entries.lock().unwrap();
                    entries.insert(key, translated.clone());
                    entries.clone()
                };
                if let Err(e) = crate::fs::write_json_atomic(&self.path, &snapshot) {
                    log::warn!("failed persisting translation cache: {e:#}");
                }
                translated
            }
            Err(e) => {
                log::warn!("translation to {target_language} failed, showing source text: {e:#}");
                text.to_string()
            }
        }
    }
}

#[async_trait]
impl Translator for TranslationCache {
    async fn translate_to(&self, text: &str, target_language: &str) -> String {
        self.get_or_translate(text, target_language).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationProvider for CountingProvider {
        async fn translate(
            &self,
            text: &str,
            _source_language: &str,
            target_language: &str,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("provider unavailable");
            }
            Ok(format!("{text} [{target_language}]"))
        }
    }

    #[tokio::test]
    async fn second_lookup_hits_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CountingProvider::new(false);
        let cache = TranslationCache::open(
            dir.path().join("translation_cache.json"),
            provider.clone(),
        );

        let first = cache.get_or_translate("Soil Health", "hi-IN").await;
        let second = cache.get_or_translate("Soil Health", "hi-IN").await;
        assert_eq!(first, "Soil Health [hi-IN]");
        assert_eq!(second, first);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn different_target_languages_are_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CountingProvider::new(false);
        let cache = TranslationCache::open(dir.path().join("cache.json"), provider.clone());

        cache.get_or_translate("Hello", "hi-IN").await;
        cache.get_or_translate("Hello", "pa-IN").await;
        assert_eq!(provider.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn english_and_empty_inputs_bypass_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CountingProvider::new(false);
        let cache = TranslationCache::open(dir.path().join("cache.json"), provider.clone());

        assert_eq!(cache.get_or_translate("Hello", SOURCE_LANGUAGE).await, "Hello");
        assert_eq!(cache.get_or_translate("   ", "hi-IN").await, "   ");
        assert_eq!(provider.calls(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn failure_degrades_to_source_text_and_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CountingProvider::new(true);
        let cache = TranslationCache::open(dir.path().join("cache.json"), provider.clone());

        assert_eq!(cache.get_or_translate("Hello", "hi-IN").await, "Hello");
        assert_eq!(cache.get_or_translate("Hello", "hi-IN").await, "Hello");
        // Each call retried the provider because nothing was cached.
        assert_eq!(provider.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn cache_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translation_cache.json");

        let provider = CountingProvider::new(false);
        let cache = TranslationCache::open(&path, provider.clone());
        cache.get_or_translate("Economics", "ta-IN").await;
        drop(cache);

        let reopened = TranslationCache::open(&path, provider.clone());
        assert_eq!(
            reopened.get_or_translate("Economics", "ta-IN").await,
            "Economics [ta-IN]"
        );
        assert_eq!(provider.calls(), 1);
    }
}
