//! Retrieval trait for locating filing content on disk.
//!
//! The parser only ever reads local files. Whatever fetches filings from the
//! disclosure API (authentication, retry, rate limiting) sits behind
//! [`FilingSource`] and hands back a ready-to-parse path.

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;

use crate::{error::Result, filing::FilingMetadata};

/// Content type of a filing rendition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Tab-separated UTF-16 export of the XBRL facts.
    Tsv,
    /// PDF rendition of the filing.
    Pdf,
}

impl ContentType {
    /// File extension used for this content type.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Pdf => "pdf",
        }
    }
}

/// Source of locally available filings.
///
/// Implementations resolve a document identifier to a local file path. Errors
/// are caller-visible: [`EdinetError::NotFound`](crate::EdinetError::NotFound)
/// when the document is not available, I/O errors otherwise.
#[async_trait]
pub trait FilingSource: Send + Sync + Debug {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Resolves the local path of a document rendition.
    async fn fetch(&self, doc_id: &str, content_type: ContentType) -> Result<PathBuf>;

    /// Loads the document-list metadata stored for a document.
    async fn metadata(&self, doc_id: &str) -> Result<FilingMetadata>;

    /// Lists the document identifiers available from this source.
    async fn list(&self) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdinetError;
    use std::collections::HashMap;

    #[derive(Debug, Default)]
    struct StaticSource {
        paths: HashMap<String, PathBuf>,
    }

    #[async_trait]
    impl FilingSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch(&self, doc_id: &str, content_type: ContentType) -> Result<PathBuf> {
            self.paths
                .get(doc_id)
                .map(|p| p.with_extension(content_type.extension()))
                .ok_or_else(|| EdinetError::NotFound(doc_id.to_string()))
        }

        async fn metadata(&self, doc_id: &str) -> Result<FilingMetadata> {
            Err(EdinetError::NotFound(doc_id.to_string()))
        }

        async fn list(&self) -> Result<Vec<String>> {
            Ok(self.paths.keys().cloned().collect())
        }
    }

    #[tokio::test]
    async fn test_source_trait_object() {
        let mut source = StaticSource::default();
        source
            .paths
            .insert("S100TR7I".to_string(), PathBuf::from("corpus/E02144/S100TR7I"));
        let source: Box<dyn FilingSource> = Box::new(source);

        let path = source.fetch("S100TR7I", ContentType::Pdf).await.unwrap();
        assert_eq!(path, PathBuf::from("corpus/E02144/S100TR7I.pdf"));
        assert!(matches!(
            source.fetch("missing", ContentType::Tsv).await,
            Err(EdinetError::NotFound(_))
        ));
        assert_eq!(source.list().await.unwrap().len(), 1);
    }
}
