use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A retailer entry from the store catalog (`config/stores.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub name: String,
    /// Stable identifier stamped onto every deal, e.g. `"food-lion-24503"`.
    pub store_id: String,
    /// Weekly-ad page to render and extract from.
    pub ad_url: String,
    /// Campaign label stamped onto deals from this store.
    pub promo_text: String,
    pub zip: Option<String>,
    /// Cookie/consent banner selectors the renderer should try to dismiss.
    #[serde(default)]
    pub dismiss_selectors: Vec<String>,
    /// Whether the renderer should scroll the page to trigger lazy sections.
    #[serde(default)]
    pub scroll_nudge: bool,
}

impl StoreConfig {
    /// Generate a URL-safe slug from the store name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreConfig>,
}

/// Load and validate the store catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile =
        serde_yaml::from_str(&content).map_err(ConfigError::StoresFileParse)?;

    validate_stores(&stores_file)?;

    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for store in &stores_file.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if store.store_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty store_id",
                store.name
            )));
        }

        if !store.ad_url.starts_with("http://") && !store.ad_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid ad_url '{}'; must be http(s)",
                store.name, store.ad_url
            )));
        }

        if !seen_ids.insert(store.store_id.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store_id: '{}'",
                store.store_id
            )));
        }

        let slug = store.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store slug: '{}' (from store '{}')",
                slug, store.name
            )));
        }
    }

    Ok(())
}
