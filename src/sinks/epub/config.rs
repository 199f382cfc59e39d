//! EPUB output configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// EPUB document metadata configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Subject/description for EPUB metadata.
    /// Empty string for none.
    pub subject: String,
    /// Keywords for EPUB metadata (comma-separated recommended).
    /// Empty string for none.
    pub keywords: String,
}

/// EPUB output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::upper_case_acronyms)]
pub struct EPUB {
    /// Output EPUB file path. `{lang}` is replaced with the book language.
    pub outfile: PathBuf,
    /// Add a page per element when summaries have been fetched
    pub profiles: bool,

    /// EPUB document metadata
    pub metadata: MetadataConfig,
}

impl Default for EPUB {
    fn default() -> Self {
        Self {
            outfile: PathBuf::from("book/PeriodicTable.{lang}.epub"),
            profiles: true,
            metadata: MetadataConfig {
                subject: "Periodic table of the chemical elements".to_string(),
                keywords: "periodic table, chemistry, elements".to_string(),
            },
        }
    }
}

impl EPUB {
    /// The output path for a book in `language`.
    pub fn outfile_for(&self, language: &str) -> PathBuf {
        PathBuf::from(
            self.outfile
                .to_string_lossy()
                .replace("{lang}", language),
        )
    }

    /// Returns the subject, if configured.
    pub fn subject_opt(&self) -> Option<&str> {
        if self.metadata.subject.is_empty() {
            None
        } else {
            Some(&self.metadata.subject)
        }
    }

    /// Returns the keywords, if configured.
    pub fn keywords_opt(&self) -> Option<&str> {
        if self.metadata.keywords.is_empty() {
            None
        } else {
            Some(&self.metadata.keywords)
        }
    }
}

/// Statistics from rendering an EPUB, used for user feedback.
pub struct RenderStats {
    /// Number of documents/chapters in the EPUB
    pub document_count: usize,
}
