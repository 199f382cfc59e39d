//! The offline pipeline stages: normalise, cover and render.

use crate::cli::NormalizeArgs;
use crate::config::Configuration;
use crate::elements::{
    extract_tables, find_element_table, normalize_table, Dataset, DatasetMeta, ElementRecord,
};
use crate::fetch::{raw_file_name, Api, RawPage};
use crate::fonts::{font_family_value, font_stack, FcListProbe};
use crate::localization::{BuiltinCatalog, Catalog};
use crate::meta;
use crate::sinks::cover::write_cover;
use crate::sinks::Book;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// The raw file `normalize` reads when none is given: the one recorded by
/// the last fetch, or the REST file for the configured page.
pub fn default_input(config: &Configuration, meta: &Map<String, Value>) -> PathBuf {
    let raw_dir = &config.data.raw_dir;
    match meta.get("raw_file").and_then(Value::as_str) {
        Some(file) if !file.is_empty() => raw_dir.join(file),
        _ => raw_dir.join(raw_file_name(
            &config.fetch.page,
            &config.language,
            &Api::Rest.to_string(),
        )),
    }
}

/// JSON files in the raw directory, sorted by name.
fn available_raw_files(raw_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(raw_dir) else {
        return Vec::new();
    };
    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .map(|path| meta::file_name(&path))
        .collect();
    files.sort();
    files
}

fn missing_input_error(raw_dir: &Path, input: &Path) -> anyhow::Error {
    let available = available_raw_files(raw_dir);
    if available.is_empty() {
        anyhow!(
            "Raw input {} not found and {} holds no raw files - run 'periodic-book fetch' first",
            input.display(),
            raw_dir.display()
        )
    } else {
        anyhow!(
            "Raw input {} not found. Available raw files in {}: {}",
            input.display(),
            raw_dir.display(),
            available.join(", ")
        )
    }
}

/// Run the normalize command: raw page -> `tables.json`.
pub fn normalize(config: &Configuration, args: &NormalizeArgs) -> Result<()> {
    let meta_path = &config.data.meta;
    let bookkeeping = meta::load(meta_path)?;
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| default_input(config, &bookkeeping));
    if !input.exists() {
        return Err(missing_input_error(&config.data.raw_dir, &input));
    }

    let raw = RawPage::load(&input)?;
    let lang = args
        .lang
        .clone()
        .or_else(|| Some(raw.lang.clone()).filter(|lang| !lang.is_empty()))
        .unwrap_or_else(|| config.language.clone());
    log::info!("Normalising {} ({lang})", input.display());

    let tables = extract_tables(&raw.html)
        .with_context(|| format!("Failed to read tables from {}", input.display()))?;
    log::debug!("Found {} tables", tables.len());
    let table = find_element_table(tables)
        .with_context(|| format!("No element table in {}", input.display()))?;
    let elements = normalize_table(&table, &lang);
    if elements.is_empty() {
        log::warn!("No element rows found in {}", input.display());
    }

    let normalized_at = Utc::now().to_rfc3339();
    let count = elements.len();
    let dataset = Dataset {
        meta: DatasetMeta {
            source_url: Some(raw.source_url.clone()),
            language: Some(lang.clone()),
            normalized_at: Some(normalized_at.clone()),
            source: Some(format!("wikipedia-{}", raw.api)),
        },
        elements,
    };
    let output = &config.data.tables;
    dataset.save(output)?;

    meta::update(meta_path, |meta| {
        meta.insert("normalized_at".into(), normalized_at.into());
        meta.insert("normalized_input".into(), meta::file_name(&input).into());
        meta.insert("normalized_output".into(), meta::file_name(output).into());
        meta.insert("element_count".into(), count.into());
    })?;

    println!("Wrote {count} elements to {}", output.display());
    Ok(())
}

fn load_tables(config: &Configuration) -> Result<Dataset> {
    let path = &config.data.tables;
    Dataset::load(path).with_context(|| {
        format!(
            "Unable to load element data from {} - run 'periodic-book normalize' first",
            path.display()
        )
    })
}

/// Run the cover command: `tables.json` -> cover SVG.
pub fn cover(config: &Configuration) -> Result<()> {
    let dataset = load_tables(config)?;
    let strings = BuiltinCatalog.strings(Some(dataset.language()));
    write_cover(
        &config.cover,
        &strings,
        &dataset.elements,
        &FcListProbe::default(),
    )?;
    println!("Wrote cover to {}", config.cover.outfile.display());
    Ok(())
}

/// Elements with a fetched summary, if summaries have been fetched.
fn load_profiles(path: &Path) -> Result<Vec<ElementRecord>> {
    if !path.exists() {
        log::info!("{} not found, rendering without element profiles", path.display());
        return Ok(Vec::new());
    }
    let dataset = Dataset::load(path)?;
    let mut profiles: Vec<ElementRecord> = dataset
        .elements
        .into_iter()
        .filter(ElementRecord::has_summary)
        .collect();
    profiles.sort_by_key(|element| element.atomic_number);
    Ok(profiles)
}

/// Human readable retrieval time: the last fetch, else the last normalise,
/// else now.
pub fn retrieved_at(bookkeeping: &Map<String, Value>, dataset: &Dataset) -> String {
    let stamp = bookkeeping
        .get("fetched_at_utc")
        .and_then(Value::as_str)
        .or(dataset.meta.normalized_at.as_deref())
        .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok())
        .map(|stamp| stamp.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    stamp.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Run the render command: `tables.json` (+ summaries, cover) -> EPUB.
pub fn render(config: &Configuration) -> Result<()> {
    let dataset = load_tables(config)?;
    let language = dataset.language().to_string();
    let strings = BuiltinCatalog.strings(Some(&language));
    let profiles = load_profiles(&config.data.summaries)?;
    let bookkeeping = meta::load(&config.data.meta)?;

    let cover_image = config.cover.image_path().or_else(|| {
        Some(config.cover.outfile.clone()).filter(|path| {
            let exists = path.exists();
            if !exists {
                log::warn!(
                    "{} not found, run 'periodic-book cover' to generate it",
                    path.display()
                );
            }
            exists
        })
    });

    let fonts = font_stack(&config.cover.fonts, &FcListProbe::default());
    let book = Book {
        language: language.clone(),
        strings: &strings,
        elements: &dataset.elements,
        profiles: &profiles,
        cover_image,
        font_family: font_family_value(&fonts),
        retrieved: retrieved_at(&bookkeeping, &dataset),
    };

    let progress = ProgressBar::new(profiles.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .with_context(|| "Failed to parse progress style")?
            .progress_chars("#>-"),
    );

    let stats = config
        .epub
        .render(&book, &progress)
        .with_context(|| "Failed to render EPUB")?;

    let outfile = config.epub.outfile_for(&language);
    let size = std::fs::metadata(&outfile)
        .map(|metadata| {
            byte_unit::Byte::from_u64(metadata.len())
                .get_appropriate_unit(byte_unit::UnitType::Binary)
                .to_string()
        })
        .unwrap_or_default();

    println!();
    println!("  EPUB:      {} ({size})", outfile.display());
    println!("  Documents: {}", stats.document_count);
    println!("  Elements:  {}", dataset.elements.len());
    println!("  Profiles:  {}", profiles.len());
    Ok(())
}

/// Run the build command: cover, then EPUB.
pub fn build(config: &Configuration) -> Result<()> {
    if config.cover.image_path().is_none() {
        cover(config)?;
    }
    render(config)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn config_in(dir: &Path) -> Configuration {
        let mut config = Configuration::default();
        config.data.raw_dir = dir.join("raw");
        config.data.meta = dir.join("meta.json");
        config.data.tables = dir.join("tables.json");
        config.data.summaries = dir.join("elements.json");
        config.cover.outfile = dir.join("cover.svg");
        config.epub.outfile = dir.join("PeriodicTable.{lang}.epub");
        config
    }

    const PAGE: &str = r#"<div>
<table class="wikitable">
<tr><th>Z</th><th>Sym.</th><th>Element</th><th>Group</th><th>Period</th><th>Block</th></tr>
<tr><td>1</td><td>H</td><td>Hydrogen</td><td>1</td><td>1</td><td>s-block</td></tr>
<tr><td>2</td><td>He</td><td>Helium</td><td>18</td><td>1</td><td>s-block</td></tr>
</table>
</div>"#;

    fn write_raw(config: &Configuration) -> PathBuf {
        let raw = RawPage {
            api: "rest".to_string(),
            page: config.fetch.page.clone(),
            lang: "en".to_string(),
            source_url: "https://en.wikipedia.org/wiki/List_of_chemical_elements".to_string(),
            content_type: "text/html".to_string(),
            html: PAGE.to_string(),
            headers: Default::default(),
        };
        let path = default_input(config, &Map::new());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string(&raw).unwrap()).unwrap();
        path
    }

    #[test]
    fn default_input_prefers_recorded_file() {
        let config = Configuration::default();
        assert_eq!(
            default_input(&config, &Map::new()),
            PathBuf::from("data/raw/list-of-chemical-elements-en-rest.json")
        );

        let mut meta = Map::new();
        meta.insert("raw_file".into(), "other.json".into());
        assert_eq!(
            default_input(&config, &meta),
            PathBuf::from("data/raw/other.json")
        );
    }

    #[test]
    fn missing_input_lists_available_files() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = config_in(dir.path());
        std::fs::create_dir_all(&config.data.raw_dir).unwrap();
        std::fs::write(config.data.raw_dir.join("b.json"), "{}").unwrap();
        std::fs::write(config.data.raw_dir.join("a.json"), "{}").unwrap();
        std::fs::write(config.data.raw_dir.join("notes.txt"), "").unwrap();

        let err = normalize(&config, &NormalizeArgs::default()).expect_err("input is missing");
        let message = format!("{err:#}");
        assert!(message.contains("a.json, b.json"), "{message}");
        assert!(!message.contains("notes.txt"));
    }

    #[test]
    fn normalize_then_render() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = config_in(dir.path());
        write_raw(&config);

        normalize(&config, &NormalizeArgs::default()).expect("can normalise");
        let dataset = Dataset::load(&config.data.tables).expect("tables written");
        assert_eq!(dataset.elements.len(), 2);
        assert_eq!(dataset.language(), "en");
        assert_eq!(dataset.meta.source.as_deref(), Some("wikipedia-rest"));

        let bookkeeping = meta::load(&config.data.meta).unwrap();
        assert_eq!(bookkeeping["element_count"], 2);

        build(&config).expect("can build");
        assert!(config.cover.outfile.exists());
        assert!(dir.path().join("PeriodicTable.en.epub").exists());
    }

    #[test]
    fn retrieval_time_prefers_fetch_stamp() {
        let dataset = Dataset {
            meta: DatasetMeta {
                normalized_at: Some("2024-02-01T00:00:00+00:00".to_string()),
                ..DatasetMeta::default()
            },
            elements: Vec::new(),
        };
        let mut bookkeeping = Map::new();
        assert_eq!(retrieved_at(&bookkeeping, &dataset), "2024-02-01 00:00 UTC");

        bookkeeping.insert("fetched_at_utc".into(), json!("2024-01-15T09:30:00+09:00"));
        assert_eq!(retrieved_at(&bookkeeping, &dataset), "2024-01-15 00:30 UTC");
    }
}
