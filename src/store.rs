use crate::models::{StoreStats, UrlRecord};
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("short code '{0}' already exists")]
    CodeExists(String),

    /// The URL was shortened concurrently; carries the code it already maps to.
    #[error("URL is already shortened as '{0}'")]
    UrlExists(String),
}

/// Both indices live behind the same lock so they can never disagree.
#[derive(Debug, Default)]
struct Indices {
    /// short_code -> record
    forward: HashMap<String, UrlRecord>,
    /// original_url -> short_code
    reverse: HashMap<String, String>,
}

/// Thread-safe in-memory store mapping short codes to URL records and
/// original URLs back to their short code.
///
/// Every operation takes the single `RwLock` for the duration of its map
/// access only; nothing here awaits or does I/O while holding it. Reads hand
/// out clones, so callers never observe a record mid-update.
///
/// The store knows nothing about how codes are generated. Retrying on
/// collision is the caller's job (see `handlers::shorten`).
#[derive(Debug, Default)]
pub struct UrlStore {
    inner: RwLock<Indices>,
}

impl UrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the indices consistent before anything
    // that could panic, so a poisoned lock still guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, Indices> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Indices> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a new record with zero clicks.
    ///
    /// The existence check is repeated under the write lock, so of several
    /// callers racing on the same code exactly one succeeds and the rest get
    /// [`StoreError::CodeExists`]. A URL that is already indexed yields
    /// [`StoreError::UrlExists`] instead of a second record. Nothing is
    /// mutated on error.
    pub fn insert(
        &self,
        code: impl Into<String>,
        original_url: impl Into<String>,
    ) -> Result<UrlRecord, StoreError> {
        let code = code.into();
        let original_url = original_url.into();
        let mut idx = self.write();

        if idx.forward.contains_key(&code) {
            return Err(StoreError::CodeExists(code));
        }
        if let Some(existing) = idx.reverse.get(&original_url) {
            return Err(StoreError::UrlExists(existing.clone()));
        }

        let record = UrlRecord {
            code: code.clone(),
            original_url: original_url.clone(),
            click_count: 0,
            created_at: Utc::now(),
        };
        idx.forward.insert(code.clone(), record.clone());
        idx.reverse.insert(original_url, code);

        Ok(record)
    }

    /// Snapshot of the record for `code`, if any.
    pub fn lookup(&self, code: &str) -> Option<UrlRecord> {
        self.read().forward.get(code).cloned()
    }

    pub fn exists(&self, code: &str) -> bool {
        self.read().forward.contains_key(code)
    }

    /// Reverse lookup by exact string; callers normalize first.
    pub fn find_by_url(&self, original_url: &str) -> Option<String> {
        self.read().reverse.get(original_url).cloned()
    }

    /// Add one click. Returns `false` (and changes nothing) for unknown codes.
    pub fn increment_clicks(&self, code: &str) -> bool {
        match self.write().forward.get_mut(code) {
            Some(record) => {
                record.click_count += 1;
                true
            }
            None => false,
        }
    }

    pub fn stats(&self) -> StoreStats {
        let idx = self.read();
        let total_urls = idx.forward.len();
        let total_clicks: u64 = idx.forward.values().map(|r| r.click_count).sum();
        let average_clicks = if total_urls > 0 {
            total_clicks as f64 / total_urls as f64
        } else {
            0.0
        };

        StoreStats {
            total_urls,
            total_clicks,
            average_clicks,
        }
    }

    /// Drop every record. Test/reset only; never routed.
    pub fn clear(&self) {
        let mut idx = self.write();
        idx.forward.clear();
        idx.reverse.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Barrier},
        thread,
    };

    fn empty_stats() -> StoreStats {
        StoreStats {
            total_urls: 0,
            total_clicks: 0,
            average_clicks: 0.0,
        }
    }

    #[test]
    fn insert_then_lookup_starts_at_zero_clicks() {
        let store = UrlStore::new();
        let inserted = store.insert("abc123", "https://example.com").unwrap();
        assert_eq!(inserted.click_count, 0);

        let found = store.lookup("abc123").unwrap();
        assert_eq!(found, inserted);
        assert_eq!(found.original_url, "https://example.com");
        assert!(store.exists("abc123"));
        assert!(!store.exists("zzz999"));
        assert!(store.lookup("zzz999").is_none());
    }

    #[test]
    fn increments_accumulate() {
        let store = UrlStore::new();
        store.insert("abc123", "https://example.com").unwrap();
        for _ in 0..3 {
            assert!(store.increment_clicks("abc123"));
        }
        assert_eq!(store.lookup("abc123").unwrap().click_count, 3);
    }

    #[test]
    fn increment_unknown_code_changes_nothing() {
        let store = UrlStore::new();
        store.insert("abc123", "https://example.com").unwrap();
        assert!(!store.increment_clicks("nope00"));
        assert!(store.lookup("nope00").is_none());
        assert_eq!(store.stats().total_clicks, 0);
    }

    #[test]
    fn reverse_lookup_is_exact() {
        let store = UrlStore::new();
        store.insert("abc123", "https://example.com").unwrap();
        assert_eq!(
            store.find_by_url("https://example.com").as_deref(),
            Some("abc123")
        );
        assert_eq!(store.find_by_url("https://other.com"), None);
        assert_eq!(store.find_by_url("https://example.com/"), None);
    }

    #[test]
    fn existing_code_is_never_overwritten() {
        let store = UrlStore::new();
        store.insert("abc123", "https://example.com").unwrap();
        store.increment_clicks("abc123");

        let err = store.insert("abc123", "https://other.com").unwrap_err();
        assert_eq!(err, StoreError::CodeExists("abc123".into()));

        let kept = store.lookup("abc123").unwrap();
        assert_eq!(kept.original_url, "https://example.com");
        assert_eq!(kept.click_count, 1);
        assert_eq!(store.find_by_url("https://other.com"), None);
        assert_eq!(store.stats().total_urls, 1);
    }

    #[test]
    fn known_url_is_not_indexed_twice() {
        let store = UrlStore::new();
        store.insert("abc123", "https://example.com").unwrap();

        let err = store.insert("def456", "https://example.com").unwrap_err();
        assert_eq!(err, StoreError::UrlExists("abc123".into()));
        assert!(!store.exists("def456"));
        assert_eq!(store.stats().total_urls, 1);
    }

    #[test]
    fn stats_on_empty_store_is_all_zero() {
        assert_eq!(UrlStore::new().stats(), empty_stats());
    }

    #[test]
    fn stats_averages_over_records() {
        let store = UrlStore::new();
        store.insert("aaaaaa", "https://a.example.com").unwrap();
        store.insert("bbbbbb", "https://b.example.com").unwrap();
        for _ in 0..3 {
            store.increment_clicks("aaaaaa");
        }

        let stats = store.stats();
        assert_eq!(stats.total_urls, 2);
        assert_eq!(stats.total_clicks, 3);
        assert!((stats.average_clicks - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn clear_resets_everything() {
        let store = UrlStore::new();
        store.insert("abc123", "https://example.com").unwrap();
        store.increment_clicks("abc123");

        store.clear();

        assert_eq!(store.stats(), empty_stats());
        assert_eq!(store.find_by_url("https://example.com"), None);
        // Code and URL are both free again.
        store.insert("abc123", "https://example.com").unwrap();
    }

    #[test]
    fn racing_inserts_on_one_code_have_a_single_winner() {
        const THREADS: usize = 16;
        let store = Arc::new(UrlStore::new());
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.insert("race00", format!("https://site{i}.example.com"))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::CodeExists(c)) if c == "race00"))
            .count();

        assert_eq!(winners, 1);
        assert_eq!(losers, THREADS - 1);
        assert_eq!(store.stats().total_urls, 1);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 500;
        let store = Arc::new(UrlStore::new());
        store.insert("abc123", "https://example.com").unwrap();

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..PER_THREAD {
                        assert!(store.increment_clicks("abc123"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(
            store.lookup("abc123").unwrap().click_count,
            THREADS * PER_THREAD
        );
    }
}
