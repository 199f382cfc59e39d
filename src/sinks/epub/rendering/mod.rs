//! EPUB rendering orchestration.
//!
//! Coordinates the generation of all EPUB components: cover, contents, quick
//! table, index, block reference, element profiles, legend and attribution.
//! Uses the `epub-builder` crate which handles the EPUB packaging
//! requirements (OPF manifest, NCX navigation, ZIP structure with proper
//! MIME type).

mod attribution;
mod blocks;
mod cover;
mod element;
mod index;
mod legend;
mod quick_table;
mod toc;

use super::config::{RenderStats, EPUB};
use super::styles;
use crate::elements::ElementRecord;
use crate::localization::Strings;
use anyhow::{Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, ZipLibrary};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

pub use element::profile_href;

pub const COVER_PAGE: &str = "cover.xhtml";
pub const TOC_PAGE: &str = "toc.xhtml";
pub const QUICK_TABLE_PAGE: &str = "quick-table.xhtml";
pub const INDEX_PAGE: &str = "index.xhtml";
pub const BLOCKS_PAGE: &str = "blocks.xhtml";
pub const PROFILES_PAGE: &str = "elements/index.xhtml";
pub const LEGEND_PAGE: &str = "legend.xhtml";
pub const ATTRIBUTION_PAGE: &str = "attribution.xhtml";

/// Everything the page renderers need to know about the book.
#[derive(Debug, Clone)]
pub struct Book<'a> {
    /// Language tag written to the EPUB and every page
    pub language: String,
    pub strings: &'a Strings,
    /// Normalised elements, sorted by atomic number
    pub elements: &'a [ElementRecord],
    /// Elements with fetched summaries; empty when none were fetched
    pub profiles: &'a [ElementRecord],
    /// Image shown on the cover page
    pub cover_image: Option<PathBuf>,
    /// CSS `font-family` value for the body text
    pub font_family: String,
    /// When the source data was retrieved, already formatted
    pub retrieved: String,
}

impl Book<'_> {
    /// Page to link an element to: its profile if it has one (and profiles
    /// are rendered), otherwise its quick-table cell.
    pub fn element_links(&self, with_profiles: bool) -> HashMap<u32, String> {
        let mut links: HashMap<u32, String> = self
            .elements
            .iter()
            .map(|element| {
                (
                    element.atomic_number,
                    format!("{QUICK_TABLE_PAGE}#el-{}", element.atomic_number),
                )
            })
            .collect();
        if !with_profiles {
            return links;
        }
        for element in self.profiles {
            links.insert(element.atomic_number, profile_href(element));
        }
        links
    }
}

/// Wrap a page body in the XHTML boilerplate every document shares.
///
/// `depth` is how many directories below the content root the page lives,
/// so the stylesheet link still resolves.
pub(crate) fn xhtml_page(language: &str, title: &str, depth: usize, body: &str) -> String {
    let stylesheet = format!("{}stylesheet.css", "../".repeat(depth));
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="{stylesheet}"/>
</head>
<body>
{body}
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(language),
        title = html_escape::encode_text(title),
    )
}

impl EPUB {
    /// Render the book to an EPUB file.
    ///
    /// Returns statistics about the generated EPUB.
    pub fn render(&self, book: &Book, progress: &ProgressBar) -> Result<RenderStats> {
        progress.set_message("Generating EPUB...");
        let strings = book.strings;

        let stylesheet = styles::generate_stylesheet(&book.font_family);

        // create epub builder
        let zip = ZipLibrary::new().with_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip).with_context(|| "Failed to build builder")?;

        builder
            .metadata("title", &strings.book_title)
            .with_context(|| "Failed to set title metadata")?;
        builder
            .metadata("author", &strings.book_author)
            .with_context(|| "Failed to set author metadata")?;
        builder
            .metadata("generator", env!("CARGO_PKG_NAME"))
            .with_context(|| "Failed to set generator metadata")?;
        builder
            .metadata("lang", &book.language)
            .with_context(|| "Failed to set language metadata")?;
        builder
            .metadata("toc_name", &strings.toc_heading)
            .with_context(|| "Failed to set toc name metadata")?;

        // add optional metadata
        if let Some(subject) = self.subject_opt() {
            builder
                .metadata("description", subject)
                .with_context(|| "Failed to set description metadata")?;
        }
        if let Some(keywords) = self.keywords_opt() {
            builder
                .metadata("subject", keywords)
                .with_context(|| "Failed to set subject (keywords) metadata")?;
        }

        builder
            .stylesheet(stylesheet.as_bytes())
            .with_context(|| "Failed to add stylesheet")?;

        let mut document_count = 0;

        // add cover image, if there is one
        let cover_file = match &book.cover_image {
            Some(cover_path) => {
                let image_data = std::fs::read(cover_path).with_context(|| {
                    format!("Failed to read cover image: {}", cover_path.display())
                })?;
                let mime = mime_from_path(cover_path);
                let filename = cover_path
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "cover-image".to_string());
                builder
                    .add_cover_image(&filename, image_data.as_slice(), mime)
                    .with_context(|| {
                        format!(
                            "Failed to add cover image to EPUB: {}",
                            cover_path.display()
                        )
                    })?;
                Some(filename)
            }
            None => {
                log::warn!("No cover image available, the cover page will only carry the title");
                None
            }
        };

        let cover_html = cover::render(book, cover_file.as_deref());
        builder
            .add_content(
                EpubContent::new(COVER_PAGE, cover_html.as_bytes())
                    .title(&strings.cover_page_title)
                    .reftype(ReferenceType::Cover),
            )
            .with_context(|| "Failed to add cover page")?;
        document_count += 1;

        let with_profiles = self.profiles && !book.profiles.is_empty();
        let toc_html = toc::render(book, with_profiles);
        builder
            .add_content(
                EpubContent::new(TOC_PAGE, toc_html.as_bytes())
                    .title(&strings.toc_heading)
                    .reftype(ReferenceType::Toc),
            )
            .with_context(|| "Failed to add table of contents page")?;
        document_count += 1;

        let links = book.element_links(with_profiles);

        let quick_table_html = quick_table::render(book, &links);
        builder
            .add_content(
                EpubContent::new(QUICK_TABLE_PAGE, quick_table_html.as_bytes())
                    .title(&strings.quick_table_title)
                    .reftype(ReferenceType::Text),
            )
            .with_context(|| "Failed to add quick table page")?;
        document_count += 1;

        let index_html = index::render(book, &links);
        builder
            .add_content(
                EpubContent::new(INDEX_PAGE, index_html.as_bytes())
                    .title(&strings.index_title)
                    .reftype(ReferenceType::Index),
            )
            .with_context(|| "Failed to add index page")?;
        document_count += 1;

        let blocks_html = blocks::render(book, &links);
        builder
            .add_content(
                EpubContent::new(BLOCKS_PAGE, blocks_html.as_bytes())
                    .title(&strings.blocks_title),
            )
            .with_context(|| "Failed to add block reference page")?;
        document_count += 1;

        // element profiles, only when summaries were fetched
        if with_profiles {
            progress.set_length(book.profiles.len() as u64);

            let profiles_html = element::render_index(book);
            builder
                .add_content(
                    EpubContent::new(PROFILES_PAGE, profiles_html.as_bytes())
                        .title(&strings.element_profiles_title),
                )
                .with_context(|| "Failed to add element profiles page")?;
            document_count += 1;

            for profile in book.profiles {
                progress.inc(1);
                let href = profile_href(profile);
                let html = element::render_profile(book, profile);
                builder
                    .add_content(
                        EpubContent::new(&href, html.as_bytes())
                            .title(profile.display_title())
                            .level(2),
                    )
                    .with_context(|| {
                        format!(
                            "Failed to add profile for element {} to EPUB",
                            profile.atomic_number
                        )
                    })?;
                document_count += 1;
            }
        } else if self.profiles {
            log::info!("No element summaries available, skipping element profiles");
        }

        let legend_html = legend::render(book);
        builder
            .add_content(
                EpubContent::new(LEGEND_PAGE, legend_html.as_bytes()).title(&strings.legend_title),
            )
            .with_context(|| "Failed to add legend page")?;
        document_count += 1;

        let attribution_html = attribution::render(book);
        builder
            .add_content(
                EpubContent::new(ATTRIBUTION_PAGE, attribution_html.as_bytes())
                    .title(&strings.sources_title)
                    .reftype(ReferenceType::Copyright),
            )
            .with_context(|| "Failed to add attribution page")?;
        document_count += 1;

        // write epub to file
        let outfile = self.outfile_for(&book.language);
        if let Some(parent) = outfile.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let output_file = File::create(&outfile)
            .with_context(|| format!("Failed to create EPUB file: {}", outfile.display()))?;
        let writer = BufWriter::new(output_file);
        builder
            .generate(writer)
            .with_context(|| "Failed to generate EPUB file")?;

        progress.finish_with_message("EPUB generated");
        log::info!(
            "Wrote {} documents to {}",
            document_count,
            outfile.display()
        );

        Ok(RenderStats { document_count })
    }
}

/// Determine MIME type from file extension.
fn mime_from_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elements::ElementRecordBuilder;
    use crate::sinks::epub::config::MetadataConfig;
    use std::io::Read;

    pub(crate) fn element(z: u32, symbol: &str, name: &str, group: u32, period: u32) -> ElementRecord {
        ElementRecordBuilder::default()
            .atomic_number(z)
            .symbol(symbol)
            .name_en(name)
            .group(group)
            .period(period)
            .block("s")
            .block_label("s-block")
            .category("alkali metal")
            .wiki_url(format!("https://en.wikipedia.org/wiki/{name}"))
            .build()
            .unwrap()
    }

    pub(crate) fn book<'a>(
        strings: &'a Strings,
        elements: &'a [ElementRecord],
        profiles: &'a [ElementRecord],
    ) -> Book<'a> {
        Book {
            language: "en".to_string(),
            strings,
            elements,
            profiles,
            cover_image: None,
            font_family: "sans-serif".to_string(),
            retrieved: "2024-05-01 12:00 UTC".to_string(),
        }
    }

    #[test]
    fn mime_types_follow_extension() {
        assert_eq!(mime_from_path(std::path::Path::new("a/cover.SVG")), "image/svg+xml");
        assert_eq!(mime_from_path(std::path::Path::new("cover.jpeg")), "image/jpeg");
        assert_eq!(mime_from_path(std::path::Path::new("cover")), "application/octet-stream");
    }

    #[test]
    fn pages_below_the_root_link_the_stylesheet_relatively() {
        let page = xhtml_page("en", "A & B", 1, "<p/>");
        assert!(page.contains(r#"href="../stylesheet.css""#));
        assert!(page.contains("<title>A &amp; B</title>"));
    }

    #[test]
    fn links_prefer_profiles() {
        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1), element(3, "Li", "Lithium", 1, 2)];
        let mut lithium = elements[1].clone();
        lithium.summary = Some("Lithium is soft.".to_string());
        let profiles = vec![lithium];
        let book = book(&strings, &elements, &profiles);

        let links = book.element_links(true);
        assert_eq!(links[&1], "quick-table.xhtml#el-1");
        assert_eq!(links[&3], "elements/003-lithium.xhtml");

        let links = book.element_links(false);
        assert_eq!(links[&3], "quick-table.xhtml#el-3");
    }

    #[test]
    fn renders_epub_end_to_end() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let cover = dir.path().join("cover.svg");
        std::fs::write(&cover, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1), element(3, "Li", "Lithium", 1, 2)];
        let mut hydrogen = elements[0].clone();
        hydrogen.summary = Some("Hydrogen is the lightest element.".to_string());
        let profiles = vec![hydrogen];
        let mut book = book(&strings, &elements, &profiles);
        book.cover_image = Some(cover);

        let epub = EPUB {
            outfile: dir.path().join("out").join("PeriodicTable.{lang}.epub"),
            profiles: true,
            metadata: MetadataConfig::default(),
        };
        let stats = epub
            .render(&book, &ProgressBar::hidden())
            .expect("can render EPUB");
        // cover, toc, quick table, index, blocks, profiles index, 1 profile, legend, attribution
        assert_eq!(stats.document_count, 9);

        let path = dir.path().join("out").join("PeriodicTable.en.epub");
        let mut bytes = Vec::new();
        File::open(&path)
            .expect("EPUB exists")
            .read_to_end(&mut bytes)
            .unwrap();
        // EPUB containers are ZIP files
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn profiles_can_be_disabled() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1)];
        let mut hydrogen = elements[0].clone();
        hydrogen.summary = Some("Hydrogen.".to_string());
        let profiles = vec![hydrogen];
        let book = book(&strings, &elements, &profiles);

        let epub = EPUB {
            outfile: dir.path().join("book.epub"),
            profiles: false,
            metadata: MetadataConfig::default(),
        };
        let stats = epub
            .render(&book, &ProgressBar::hidden())
            .expect("can render EPUB");
        assert_eq!(stats.document_count, 7);
    }
}
