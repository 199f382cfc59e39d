//! Interactive configuration wizard for creating `periodic-book.toml`.
//!
//! The wizard collects the book language, where to fetch the element table
//! from, cover and EPUB output options through a series of prompts. Anything
//! not asked about keeps its default.

use crate::config::{Configuration, CoverConfig, FetchConfig};
use crate::fetch::Api;
use crate::fonts::{FcListProbe, FontProbe};
use crate::localization::SUPPORTED_LANGUAGES;
use crate::sinks::{MetadataConfig, EPUB};
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};
use std::path::{Path, PathBuf};

const APIS: [Api; 3] = [Api::Auto, Api::Rest, Api::Action];

/// Run the interactive configuration wizard.
///
/// Prompts for the book settings, then writes the configuration to `path`.
pub fn run(path: &Path) -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };
    let defaults = Configuration::default();

    let mut languages: Vec<String> = SUPPORTED_LANGUAGES.iter().map(ToString::to_string).collect();
    languages.push("other".to_string());
    let language_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Book language")
        .items(&languages)
        .default(0)
        .interact()
        .with_context(|| "Failed to obtain language")?;
    let language = if language_idx < SUPPORTED_LANGUAGES.len() {
        languages[language_idx].clone()
    } else {
        let language: String = Input::with_theme(&theme)
            .with_prompt("Wikipedia language code (book text will be in English)")
            .allow_empty(false)
            .interact()
            .with_context(|| "Failed to obtain language")?;
        language.trim().to_lowercase()
    };

    let page: String = Input::with_theme(&theme)
        .with_prompt("Wikipedia page holding the element table")
        .with_initial_text(defaults.fetch.page.clone())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain page title")?;

    let api_names: Vec<String> = APIS.iter().map(ToString::to_string).collect();
    let api_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Wikipedia API")
        .items(&api_names)
        .default(0)
        .interact()?;
    let api = APIS[api_idx];

    let image: String = Input::with_theme(&theme)
        .with_prompt("Cover image to use instead of the generated cover (leave blank for none)")
        .allow_empty(true)
        .interact()?;
    let image = image.trim().to_string();
    if !image.is_empty() && !PathBuf::from(&image).exists() {
        println!("Warning: {image} doesn't exist yet, it must be present before rendering");
    }

    // start from the defaults that are actually installed
    let probe = FcListProbe::default();
    let mut fonts: Vec<String> = defaults
        .cover
        .fonts
        .iter()
        .filter(|family| probe.is_available(family))
        .cloned()
        .collect();
    'fonts: loop {
        if !fonts.is_empty() {
            println!("Cover fonts: [{}]", fonts.join("], ["));
        }
        let family: String = Input::with_theme(&theme)
            .with_prompt("Additional cover font family (leave empty for done)")
            .allow_empty(true)
            .interact()?;
        let family = family.trim();
        if family.is_empty() {
            break 'fonts;
        }
        if !probe.is_available(family) {
            println!("Warning: {family} isn't installed, sans-serif will be used in its place");
        }
        fonts.push(family.to_string());
    }

    let outfile: String = Input::with_theme(&theme)
        .with_prompt("Output EPUB file ({lang} is replaced with the language)")
        .default(defaults.epub.outfile.display().to_string())
        .interact()?;
    let mut outfile = PathBuf::from(outfile);
    let ext = outfile
        .extension()
        .map(std::ffi::OsStr::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != *"epub" {
        outfile.set_extension("epub");
    }

    let profiles = Confirm::with_theme(&theme)
        .with_prompt("Include a profile page per element when summaries are fetched?")
        .default(true)
        .interact()?;

    let subject: String = Input::with_theme(&theme)
        .with_prompt("EPUB description (leave blank for none)")
        .with_initial_text(defaults.epub.metadata.subject.clone())
        .allow_empty(true)
        .interact()?;
    let keywords: String = Input::with_theme(&theme)
        .with_prompt("EPUB keywords, comma separated (leave blank for none)")
        .with_initial_text(defaults.epub.metadata.keywords.clone())
        .allow_empty(true)
        .interact()?;

    let config = Configuration {
        language,
        fetch: FetchConfig {
            page,
            api,
            ..defaults.fetch
        },
        cover: CoverConfig {
            image,
            fonts,
            ..defaults.cover
        },
        epub: EPUB {
            outfile,
            profiles,
            metadata: MetadataConfig { subject, keywords },
        },
        ..defaults
    };

    if path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{} already exists, do you want to override it?",
                path.display()
            ))
            .interact()?
    {
        let contents = toml::to_string_pretty(&config)
            .with_context(|| "Failed to convert configuration to TOML")?;
        println!("Configuration:");
        println!("{contents}");
    } else {
        config.save(path)?;
        println!("{} written!", path.display());
    }

    Ok(())
}
