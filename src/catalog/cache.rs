use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::{Catalog, CatalogError, parse_catalog_with_digest, read_source};

/// Memoizes parsed catalogs per source path, keyed by a digest of the content.
///
/// A reload of unchanged text hands back the same `Arc`, so callers can use
/// `Arc::ptr_eq` to tell whether anything actually changed.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: HashMap<PathBuf, Arc<Catalog>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<Catalog>, CatalogError> {
        let content = read_source(path)?;
        self.load_content(path, &content)
    }

    pub fn load_content(&mut self, key: &Path, content: &str) -> Result<Arc<Catalog>, CatalogError> {
        let digest = content_digest(content);
        if let Some(cached) = self.entries.get(key) {
            if cached.digest() == Some(digest.as_str()) {
                debug!(path = %key.display(), "catalog cache hit");
                return Ok(Arc::clone(cached));
            }
        }

        let catalog = Arc::new(parse_catalog_with_digest(content, digest)?);
        debug!(
            path = %key.display(),
            projects = catalog.len(),
            "catalog parsed"
        );
        self.entries.insert(key.to_path_buf(), Arc::clone(&catalog));
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn content_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}
