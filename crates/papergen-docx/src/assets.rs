//! Filename-addressed, read-only asset store.
//!
//! The upload-accepting service owns writing and validating assets; the
//! compiler only ever reads them back by filename. A missing file is a
//! designed skip (the caller renders without the visual element), never an
//! error, so [`AssetStore::resolve`] returns an `Option` rather than a
//! `Result`.

use log::debug;
use std::path::{Path, PathBuf};

/// Read-only byte store addressed by filename under a fixed root directory.
///
/// The root is threaded in explicitly at construction; nothing here reads
/// process-wide configuration, so tests and concurrent renders can each hold
/// their own store.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at the given uploads directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root directory.
    #[inline]
    #[must_use = "returns the store's root directory"]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a reference to the asset's bytes, or `None` when missing.
    ///
    /// Accepts two reference shapes: a bare filename, or a URL-shaped
    /// reference containing an upload path segment (the editor emits
    /// `/api/uploads/<name>` in image `src` attributes), from which the
    /// final path component is taken. Performs no content validation.
    #[must_use = "returns the asset bytes when the reference resolves"]
    pub fn resolve(&self, reference: &str) -> Option<Vec<u8>> {
        let filename = filename_from_reference(reference)?;
        let path = self.root.join(filename);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                debug!("asset {} unavailable, skipping: {err}", path.display());
                None
            }
        }
    }
}

/// Reduce a reference to the filename it addresses, or `None` when the
/// reference cannot name an asset in the store.
fn filename_from_reference(reference: &str) -> Option<&str> {
    let filename = match reference.rsplit_once("/uploads/") {
        Some((_, rest)) => rest.rsplit('/').next().unwrap_or(""),
        // References with path structure but no upload segment point outside
        // the store (external URLs); only bare filenames resolve directly.
        None if reference.contains('/') => return None,
        None => reference,
    };
    if filename.is_empty() {
        None
    } else {
        Some(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_file(name: &str, bytes: &[u8]) -> (tempfile::TempDir, AssetStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(name), bytes).expect("write asset");
        let store = AssetStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_resolve_bare_filename() {
        let (_dir, store) = store_with_file("logo.png", b"png-bytes");
        assert_eq!(store.resolve("logo.png"), Some(b"png-bytes".to_vec()));
    }

    #[test]
    fn test_resolve_upload_url_reference() {
        let (_dir, store) = store_with_file("fig.png", b"fig-bytes");
        assert_eq!(
            store.resolve("/api/uploads/fig.png"),
            Some(b"fig-bytes".to_vec())
        );
        assert_eq!(
            store.resolve("http://localhost:8000/api/uploads/fig.png"),
            Some(b"fig-bytes".to_vec())
        );
    }

    #[test]
    fn test_missing_file_returns_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = AssetStore::new(dir.path());
        assert_eq!(store.root(), dir.path());
        assert_eq!(store.resolve("missing.png"), None);
    }

    #[test]
    fn test_external_url_without_upload_segment_is_unresolvable() {
        let (_dir, store) = store_with_file("fig.png", b"fig-bytes");
        assert_eq!(store.resolve("https://example.com/fig.png"), None);
    }

    #[test]
    fn test_empty_reference_is_unresolvable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = AssetStore::new(dir.path());
        assert_eq!(store.resolve(""), None);
        assert_eq!(store.resolve("/api/uploads/"), None);
    }
}
