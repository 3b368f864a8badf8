//! DescriptionCache - persistent disk cache for image descriptions.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Descriptions stored as text files named by a hash of model and image.
pub struct DescriptionCache {
    cache_dir: PathBuf,
}

impl DescriptionCache {
    /// Create a cache rooted at `cache_dir`. The directory is created on the
    /// first store.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Default: ~/.cache/asciivision/descriptions/
    pub fn with_default_dir() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("asciivision")
            .join("descriptions");
        Self::new(cache_dir)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Hex SHA-256 of the model name and image bytes. The same pair always
    /// produces the same key.
    pub fn key(model: &str, image: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update([0u8]);
        hasher.update(image);
        hex::encode(hasher.finalize())
    }

    fn entry_path(&self, model: &str, image: &[u8]) -> PathBuf {
        self.cache_dir.join(format!("{}.txt", Self::key(model, image)))
    }

    /// Cached description for this image and model, if any.
    pub fn get(&self, model: &str, image: &[u8]) -> Option<String> {
        let path = self.entry_path(model, image);
        let text = std::fs::read_to_string(&path).ok()?;
        log::debug!("description cache hit: {}", path.display());
        Some(text)
    }

    /// Store a description, returning the file it was written to.
    pub fn store(
        &self,
        model: &str,
        image: &[u8],
        description: &str,
    ) -> Result<PathBuf, std::io::Error> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self.entry_path(model, image);
        std::fs::write(&path, description)?;
        Ok(path)
    }

    /// Number of cached descriptions.
    pub fn len(&self) -> usize {
        std::fs::read_dir(&self.cache_dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("txt"))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every cached description.
    pub fn clear(&self) -> Result<(), std::io::Error> {
        if !self.cache_dir.exists() {
            return Ok(());
        }
        for entry in std::fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|x| x.to_str()) == Some("txt") {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}
