//! Where logo markup comes from.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Asset path conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetPaths {
    /// Folder holding the recolorable catalog logos.
    pub catalog_folder: String,
    /// Folder holding the unmodified brand files.
    pub original_folder: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            catalog_folder: "logos_bancos".to_string(),
            original_folder: "logo_original".to_string(),
        }
    }
}

impl AssetPaths {
    /// `/{catalog_folder}/{id}.svg`
    pub fn catalog_path(&self, id: &str) -> String {
        format!("/{}/{id}.svg", self.catalog_folder)
    }

    /// `/{original_folder}/{file_name}`
    pub fn original_path(&self, file_name: &str) -> String {
        format!("/{}/{file_name}", self.original_folder)
    }
}

/// Fetches raw markup by asset path.
///
/// A missing or unreadable asset is `None`, never an error.
#[async_trait]
pub trait LogoSource: Send + Sync {
    async fn fetch(&self, path: &str) -> Option<String>;
}

/// Serves assets from a directory; asset paths are resolved relative to it.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl LogoSource for DirectorySource {
    async fn fetch(&self, path: &str) -> Option<String> {
        let file = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::read_to_string(&file).await {
            Ok(markup) => Some(markup),
            Err(error) => {
                debug!(path, %error, "asset not available");
                None
            }
        }
    }
}

/// In-memory assets keyed by path.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    assets: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, markup: impl Into<String>) -> Self {
        self.assets.insert(path.into(), markup.into());
        self
    }
}

#[async_trait]
impl LogoSource for StaticSource {
    async fn fetch(&self, path: &str) -> Option<String> {
        self.assets.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_folder_convention() {
        let paths = AssetPaths::default();
        assert_eq!(paths.catalog_path("banco-itau"), "/logos_bancos/banco-itau.svg");
        assert_eq!(paths.original_path("Itau.svg"), "/logo_original/Itau.svg");
    }

    #[tokio::test]
    async fn directory_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("logos_bancos")).unwrap();
        std::fs::write(dir.path().join("logos_bancos/banco-itau.svg"), "<svg/>").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(source.fetch("/logos_bancos/banco-itau.svg").await.as_deref(), Some("<svg/>"));
        assert_eq!(source.fetch("/logos_bancos/missing.svg").await, None);
    }

    #[tokio::test]
    async fn static_source_serves_registered_paths() {
        let source = StaticSource::new().with("/a.svg", "<svg/>");
        assert!(source.fetch("/a.svg").await.is_some());
        assert!(source.fetch("/b.svg").await.is_none());
    }
}
