//! Filesystem-backed filing source.
//!
//! A corpus directory holds one subdirectory per company; each keeps its
//! filings as `{doc_id}.tsv` (and optionally `{doc_id}.pdf`) next to the
//! document-list entry `{doc_id}.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use edinet_core::{ContentType, EdinetError, FilingMetadata, FilingSource, Result};

/// Serves filings stored in one local directory.
#[derive(Debug, Clone)]
pub struct LocalDirectorySource {
    root: PathBuf,
    name: String,
}

impl LocalDirectorySource {
    /// Creates a source over `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("local:{}", root.display());
        Self { root, name }
    }

    /// Opens one source per subdirectory of a corpus directory, sorted by
    /// directory name.
    pub async fn per_company(corpus: &Path) -> Result<Vec<Self>> {
        let mut entries = tokio::fs::read_dir(corpus).await?;
        let mut dirs = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        debug!(corpus = %corpus.display(), companies = dirs.len(), "Opened corpus");
        Ok(dirs.into_iter().map(Self::new).collect())
    }

    /// Directory this source reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, doc_id: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{doc_id}.{extension}"))
    }
}

#[async_trait]
impl FilingSource for LocalDirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, doc_id: &str, content_type: ContentType) -> Result<PathBuf> {
        let path = self.path_of(doc_id, content_type.extension());
        if tokio::fs::try_exists(&path).await? {
            Ok(path)
        } else {
            Err(EdinetError::NotFound(path.display().to_string()))
        }
    }

    async fn metadata(&self, doc_id: &str) -> Result<FilingMetadata> {
        let path = self.path_of(doc_id, "json");
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EdinetError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json)
            .map_err(|e| EdinetError::Serialization(format!("{}: {e}", path.display())))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut doc_ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ContentType::Tsv.extension()) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                doc_ids.push(stem.to_string());
            }
        }
        doc_ids.sort();
        Ok(doc_ids)
    }
}
