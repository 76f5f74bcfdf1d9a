//! On-disk persistence for deal collections and scrape debug artifacts.
//!
//! One pretty-printed JSON array per store (`deals_<slug>.json`) under a
//! single data directory. Every write goes to a dot-prefixed temp file in the
//! same directory and is moved into place with an atomic rename, so readers
//! never observe a partially-written collection. A re-scrape replaces the
//! whole file; there is no merge or versioning.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use cartwise_core::Deal;

/// Errors raised by [`DealStore`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to the data directory holding per-store deal collections and
/// debug artifacts.
#[derive(Debug, Clone)]
pub struct DealStore {
    root: PathBuf,
}

impl DealStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn deals_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("deals_{slug}.json"))
    }

    #[must_use]
    pub fn debug_html_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("debug_{slug}.html"))
    }

    #[must_use]
    pub fn screenshot_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("debug_{slug}.png"))
    }

    fn captured_dump_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("captured_{slug}.json"))
    }

    /// Persist the deal collection for one store, wholly replacing any prior
    /// collection. Returns the number of deals written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the write/rename fails;
    /// on failure the previous collection is left untouched.
    pub fn save_deals(&self, slug: &str, deals: &[Deal]) -> Result<usize, StoreError> {
        let bytes = serde_json::to_vec_pretty(deals)?;
        self.write_atomic(&self.deals_path(slug), &bytes)?;
        tracing::debug!(slug, count = deals.len(), "persisted deal collection");
        Ok(deals.len())
    }

    /// Load the persisted collection for one store. A missing file is an
    /// empty collection, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file exists but cannot be read or parsed.
    pub fn load_deals(&self, slug: &str) -> Result<Vec<Deal>, StoreError> {
        let path = self.deals_path(slug);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Load every persisted collection, merged, in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the data directory listing or any
    /// collection file cannot be read or parsed.
    pub fn load_all(&self) -> Result<Vec<Deal>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.root.display().to_string(),
                    source: e,
                })
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with("deals_") && name.ends_with(".json"))
            .collect();
        names.sort();

        let mut merged = Vec::new();
        for name in names {
            let slug = &name["deals_".len()..name.len() - ".json".len()];
            merged.extend(self.load_deals(slug)?);
        }
        Ok(merged)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the write/rename fails.
    pub fn save_debug_html(&self, slug: &str, html: &str) -> Result<(), StoreError> {
        self.write_atomic(&self.debug_html_path(slug), html.as_bytes())
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the write/rename fails.
    pub fn save_screenshot(&self, slug: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.write_atomic(&self.screenshot_path(slug), bytes)
    }

    /// Dump the raw captured-network payloads for a scrape, for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or the write/rename fails.
    pub fn save_captured_dump<T: Serialize>(&self, slug: &str, payload: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(payload)?;
        self.write_atomic(&self.captured_dump_path(slug), &bytes)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let io_err = |p: &Path| {
            let p = p.display().to_string();
            move |e: std::io::Error| StoreError::Io { path: p, source: e }
        };

        fs::create_dir_all(&self.root).map_err(io_err(&self.root))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self.root.join(format!(".{file_name}.tmp"));

        fs::write(&tmp, bytes).map_err(io_err(&tmp))?;
        fs::rename(&tmp, path).map_err(io_err(path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use cartwise_core::Unit;

    use super::*;

    static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store() -> DealStore {
        let n = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "cartwise-store-test-{}-{n}",
            std::process::id()
        ));
        DealStore::new(dir)
    }

    fn make_deal(item: &str, price: &str) -> Deal {
        let today = chrono::Utc::now().date_naive();
        Deal {
            store_id: "food-lion-24503".to_owned(),
            item: item.to_owned(),
            size_text: "per lb".to_owned(),
            price: price.parse().unwrap(),
            unit_qty: Some("1".parse().unwrap()),
            unit: Some(Unit::Lb),
            start_date: today,
            end_date: today + chrono::Days::new(7),
            promo_text: "Weekly Ad".to_owned(),
            source: "https://example.com/ad".to_owned(),
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = temp_store();
        let deals = vec![make_deal("Chicken Breast", "4.99"), make_deal("Milk", "3.49")];
        assert_eq!(store.save_deals("food-lion", &deals).unwrap(), 2);

        let loaded = store.load_deals("food-lion").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].item, "Chicken Breast");
        assert_eq!(loaded[1].price, "3.49".parse().unwrap());
    }

    #[test]
    fn load_missing_collection_is_empty() {
        let store = temp_store();
        assert!(store.load_deals("never-scraped").unwrap().is_empty());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_prior_collection() {
        let store = temp_store();
        store
            .save_deals("fresh-market", &[make_deal("Old Item", "1.00")])
            .unwrap();
        store
            .save_deals("fresh-market", &[make_deal("New Item", "2.00")])
            .unwrap();

        let loaded = store.load_deals("fresh-market").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].item, "New Item");
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let store = temp_store();
        store.save_deals("food-lion", &[make_deal("Milk", "3.49")]).unwrap();

        let leftovers: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn load_all_merges_collections_in_name_order() {
        let store = temp_store();
        store
            .save_deals("fresh-market", &[make_deal("Salmon Fillet", "9.99")])
            .unwrap();
        store
            .save_deals("food-lion", &[make_deal("Milk", "3.49")])
            .unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        // "deals_food-lion.json" sorts before "deals_fresh-market.json".
        assert_eq!(all[0].item, "Milk");
        assert_eq!(all[1].item, "Salmon Fillet");
    }

    #[test]
    fn persisted_file_is_indented_json() {
        let store = temp_store();
        store.save_deals("food-lion", &[make_deal("Milk", "3.49")]).unwrap();

        let raw = fs::read_to_string(store.root().join("deals_food-lion.json")).unwrap();
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"item\": \"Milk\""));
    }

    #[test]
    fn debug_artifacts_are_written() {
        let store = temp_store();
        store.save_debug_html("food-lion", "<html></html>").unwrap();
        store.save_screenshot("food-lion", &[0x89, 0x50, 0x4e, 0x47]).unwrap();
        store
            .save_captured_dump("food-lion", &serde_json::json!([{"url": "https://x"}]))
            .unwrap();

        assert!(store.debug_html_path("food-lion").exists());
        assert!(store.screenshot_path("food-lion").exists());
        assert!(store.root().join("captured_food-lion.json").exists());
    }
}
