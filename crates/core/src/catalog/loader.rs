use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use parking_lot::RwLock;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::manifest::{CatalogMetadata, MANIFEST_FILE};

use super::Catalog;

/// Thread-safe loader that reads catalog fragments from a directory.
///
/// Every `*.json` file beneath the root (except the manifest) is a fragment;
/// fragments merge in path order and the result is validated before caching.
#[derive(Clone)]
pub struct CatalogLoader {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    root_path: PathBuf,
    metadata: Option<CatalogMetadata>,
    cache: Option<Arc<Catalog>>,
}

impl CatalogLoader {
    /// Build a new loader rooted at the given catalog directory.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                root_path: root_path.into(),
                metadata: None,
                cache: None,
            })),
        }
    }

    /// Root path of the catalog fragments.
    pub fn root_path(&self) -> PathBuf {
        self.inner.read().root_path.clone()
    }

    /// Point the loader at a new directory, dropping any cached catalog.
    pub fn refresh(&self, root_path: impl Into<PathBuf>) {
        let mut inner = self.inner.write();
        inner.root_path = root_path.into();
        inner.metadata = None;
        inner.cache = None;
    }

    /// Manifest metadata for the catalog, if a manifest exists.
    pub fn metadata(&self) -> Result<Option<CatalogMetadata>> {
        let mut inner = self.inner.write();
        if inner.metadata.is_none() {
            inner.metadata = CatalogMetadata::read_dir(&inner.root_path)?;
        }
        Ok(inner.metadata.clone())
    }

    /// Return the merged catalog, loading it on first use.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        let mut inner = self.inner.write();
        if let Some(catalog) = &inner.cache {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(load_catalog_dir(&inner.root_path)?);
        inner.cache = Some(Arc::clone(&catalog));
        Ok(catalog)
    }
}

fn load_catalog_dir(root: &Path) -> Result<Catalog> {
    if !root.is_dir() {
        anyhow::bail!("catalog directory missing: {}", root.display());
    }

    let mut fragments: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable catalog entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .filter(|path| {
            path.file_name().and_then(|name| name.to_str()) != Some(MANIFEST_FILE)
        })
        .collect();
    fragments.sort();

    let mut catalog = Catalog::default();
    for path in &fragments {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog fragment {}", path.display()))?;
        let fragment: Catalog = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse catalog fragment {}", path.display()))?;
        catalog.merge(fragment);
    }

    catalog
        .validate()
        .with_context(|| format!("invalid catalog in {}", root.display()))?;

    info!(
        fragments = fragments.len(),
        expansions = catalog.expansions.len(),
        stories = catalog.story_cards.len(),
        "loaded catalog from {}",
        root.display()
    );
    Ok(catalog)
}
