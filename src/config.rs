//! `periodic-book.toml` configuration.
//!
//! Every section has defaults, so an empty (or missing) file describes the
//! standard English build. Paths are relative to the working directory.

use crate::fetch::Api;
use crate::layout::{ArcSpec, GridLayout};
use crate::sinks::EPUB;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "periodic-book.toml";

/// Complete configuration for a periodic-book project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Wikipedia language code, also used for the book's own strings
    pub language: String,
    pub data: DataConfig,
    pub fetch: FetchConfig,
    pub cover: CoverConfig,
    pub epub: EPUB,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            language: "en".to_string(),
            data: DataConfig::default(),
            fetch: FetchConfig::default(),
            cover: CoverConfig::default(),
            epub: EPUB::default(),
        }
    }
}

impl Configuration {
    /// Load the configuration at `path`; a missing file gives the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!(
                "{} not found, using the default configuration",
                path.display()
            );
            return Ok(Configuration::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents =
            toml::to_string_pretty(self).with_context(|| "Failed to convert configuration to TOML")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write configuration file {}", path.display()))
    }
}

/// Where pipeline stages read and write their data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Raw API responses
    pub raw_dir: PathBuf,
    /// Per-element summary responses
    pub summaries_raw_dir: PathBuf,
    /// Fetch / normalise bookkeeping
    pub meta: PathBuf,
    /// Normalised element table
    pub tables: PathBuf,
    /// Element table merged with fetched summaries
    pub summaries: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            raw_dir: PathBuf::from("data/raw"),
            summaries_raw_dir: PathBuf::from("data/raw/elements"),
            meta: PathBuf::from("data/meta.json"),
            tables: PathBuf::from("data/tables.json"),
            summaries: PathBuf::from("data/elements.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Title of the page holding the element table
    pub page: String,
    pub api: Api,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            page: "List of chemical elements".to_string(),
            api: Api::Auto,
            user_agent: format!(
                "periodic-book/{} ({})",
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_NAME")
            ),
            timeout_secs: 30,
        }
    }
}

/// Cover image configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// Where the generated cover SVG is written
    pub outfile: PathBuf,
    /// Optional cover image to use instead of the generated one. Empty string for none.
    pub image: String,
    pub width: f64,
    pub height: f64,
    /// Vertical offset of the periodic table on the cover
    pub table_top: f64,
    pub title_font_size: f64,
    pub subtitle_font_size: f64,
    /// Preferred font families, most preferred first
    pub fonts: Vec<String>,
    /// Grid placement inside the table's own canvas
    pub layout: GridLayout,
    pub title_arc: ArcSpec,
    pub subtitle_arc: ArcSpec,
}

impl Default for CoverConfig {
    fn default() -> Self {
        CoverConfig {
            outfile: PathBuf::from("assets/gen/cover.svg"),
            image: String::new(),
            width: 1600.0,
            height: 2560.0,
            table_top: 1300.0,
            layout: GridLayout::default(),
            title_arc: ArcSpec {
                center_x: 800.0,
                center_y: 1500.0,
                radius: 900.0,
                start_angle_deg: 310.0,
                end_angle_deg: 50.0,
            },
            subtitle_arc: ArcSpec {
                center_x: 800.0,
                center_y: 1500.0,
                radius: 760.0,
                start_angle_deg: 315.0,
                end_angle_deg: 45.0,
            },
            title_font_size: 140.0,
            subtitle_font_size: 64.0,
            fonts: vec![
                "Noto Sans CJK JP".to_string(),
                "Noto Sans".to_string(),
                "DejaVu Sans".to_string(),
                "Liberation Sans".to_string(),
            ],
        }
    }
}

impl CoverConfig {
    /// Returns the cover image override, if configured.
    pub fn image_path(&self) -> Option<PathBuf> {
        if self.image.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.image))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_roundtrip_configuration() {
        let config = Configuration::default();
        let toml_str = toml::to_string_pretty(&config).expect("can serialize");
        let deserialized: Configuration = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(deserialized.language, config.language);
        assert_eq!(deserialized.cover.layout, config.cover.layout);
        assert_eq!(deserialized.cover.title_arc, config.cover.title_arc);
        assert_eq!(deserialized.fetch.api, Api::Auto);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: Configuration = toml::from_str(
            r#"
            language = "ja"

            [cover.layout]
            canvas_width = 1000.0
            canvas_height = 500.0
            margin_left = 0.0
            margin_right = 0.0
            margin_top = 0.0
            margin_bottom = 0.0
            gap_factor = 0.25
            "#,
        )
        .expect("can parse partial config");
        assert_eq!(config.language, "ja");
        assert_eq!(config.cover.layout.gap_factor, 0.25);
        assert_eq!(config.data.tables, PathBuf::from("data/tables.json"));
        assert!(config.cover.image_path().is_none());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = Configuration::load(dir.path().join(CONFIG_FILE)).expect("can load");
        assert_eq!(config.fetch.page, "List of chemical elements");
    }

    #[test]
    fn can_save_and_load() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Configuration::default();
        config.cover.image = "cover.jpg".to_string();
        config.save(&path).expect("can save");
        let loaded = Configuration::load(&path).expect("can load");
        assert_eq!(loaded.cover.image_path(), Some(PathBuf::from("cover.jpg")));
    }
}
