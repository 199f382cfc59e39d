//! The element dataset: records normalised from the source table, plus the
//! JSON files they are persisted in between pipeline stages.

use anyhow::{Context, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod normalize;
pub use normalize::*;

mod table;
pub use table::*;

/// One row of the element table.
///
/// Only `atomic_number`, `symbol`, `group` and `period` matter for placement;
/// everything else is carried through for the rendered pages.
#[derive(Builder, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct ElementRecord {
    pub atomic_number: u32,
    #[builder(default)]
    pub symbol: String,
    #[builder(default)]
    pub name_en: String,
    #[builder(setter(into, strip_option), default)]
    pub group: Option<u32>,
    #[builder(setter(into, strip_option), default)]
    pub period: Option<u32>,
    #[builder(default)]
    pub block: String,
    #[builder(default)]
    pub block_label: String,
    #[builder(default)]
    pub standard_atomic_weight: String,
    #[builder(default)]
    pub category: String,
    #[builder(default)]
    pub phase: String,
    #[builder(default)]
    pub origin: String,
    #[builder(default)]
    pub wiki_url: String,

    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_html: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl ElementRecord {
    /// `Name (Sym)`, falling back to placeholders for missing parts
    pub fn display_title(&self) -> String {
        let name = if self.name_en.is_empty() {
            "Element"
        } else {
            &self.name_en
        };
        let symbol = if self.symbol.is_empty() {
            "?"
        } else {
            &self.symbol
        };
        format!("{name} ({symbol})")
    }

    /// The article title at the end of `wiki_url`, if there is one
    pub fn wiki_title(&self) -> Option<&str> {
        if self.wiki_url.is_empty() {
            return None;
        }
        self.wiki_url
            .rsplit('/')
            .next()
            .filter(|title| !title.is_empty())
    }

    /// Whether a summary was fetched for this element.
    pub fn has_summary(&self) -> bool {
        self.summary.is_some() || self.summary_html.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMeta {
    pub source_url: Option<String>,
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A batch of element records along with where they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub meta: DatasetMeta,
    pub elements: Vec<ElementRecord>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read element data from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse element data in {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialise element data")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write element data to {}", path.display()))
    }

    /// The dataset language, defaulting to English.
    pub fn language(&self) -> &str {
        self.meta
            .language
            .as_deref()
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or("en")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_build_element_with_builder_pattern() {
        let element = ElementRecordBuilder::default()
            .atomic_number(26u32)
            .symbol("Fe")
            .name_en("Iron")
            .group(8u32)
            .period(4u32)
            .build()
            .expect("can build element");

        assert_eq!(element.group, Some(8));
        assert_eq!(element.display_title(), "Iron (Fe)");
        assert!(!element.has_summary());
    }

    #[test]
    fn wiki_title_is_last_url_segment() {
        let element = ElementRecordBuilder::default()
            .atomic_number(1u32)
            .wiki_url("https://en.wikipedia.org/wiki/Hydrogen")
            .build()
            .unwrap();
        assert_eq!(element.wiki_title(), Some("Hydrogen"));

        let element = ElementRecord::default();
        assert_eq!(element.wiki_title(), None);
    }

    #[test]
    fn dataset_reads_missing_fields_as_defaults() {
        let json = r#"{
            "meta": { "language": "ja" },
            "elements": [
                { "atomic_number": 57, "symbol": "La", "group": null, "period": 6 }
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).expect("can parse dataset");
        assert_eq!(dataset.language(), "ja");
        assert_eq!(dataset.elements[0].group, None);
        assert_eq!(dataset.elements[0].period, Some(6));
        assert_eq!(dataset.elements[0].name_en, "");
    }

    #[test]
    fn can_save_and_load_dataset() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("data").join("tables.json");
        let dataset = Dataset {
            meta: DatasetMeta {
                language: Some("en".to_string()),
                ..DatasetMeta::default()
            },
            elements: vec![ElementRecordBuilder::default()
                .atomic_number(2u32)
                .symbol("He")
                .summary("Helium is a chemical element.")
                .build()
                .unwrap()],
        };
        dataset.save(&path).expect("can save dataset");
        let loaded = Dataset::load(&path).expect("can load dataset");
        assert_eq!(loaded, dataset);
    }
}
