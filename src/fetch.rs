//! Downloading the source page and per-element summaries from Wikipedia.
//!
//! The page is fetched through the REST API, falling back to the Action API
//! in `auto` mode. Every response is saved verbatim (as JSON) under the raw
//! data directory so later stages can run offline. Failures are logged and
//! the next API is tried; there is no retry or backoff.

use crate::cli::FetchArgs;
use crate::config::{Configuration, DataConfig, FetchConfig};
use crate::elements::{Dataset, DatasetMeta, ElementRecord};
use crate::meta;
use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which Wikipedia API to fetch the page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Api {
    /// REST first, then the Action API
    Auto,
    Rest,
    Action,
}

impl Api {
    /// The concrete APIs to try, in order.
    pub fn attempts(self) -> &'static [Api] {
        match self {
            Api::Auto => &[Api::Rest, Api::Action],
            Api::Rest => &[Api::Rest],
            Api::Action => &[Api::Action],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Api::Auto => "auto",
            Api::Rest => "rest",
            Api::Action => "action",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A page's HTML as returned by one of the APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    pub api: String,
    pub page: String,
    pub lang: String,
    pub source_url: String,
    pub content_type: String,
    pub html: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RawPage {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RawPage> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read raw page {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse raw page {}", path.display()))
    }
}

/// File name a raw response is stored under.
pub fn raw_file_name(page: &str, lang: &str, api: &str) -> String {
    format!("{}.json", slug::slugify(format!("{page}-{lang}-{api}")))
}

fn article_url(lang: &str, title: &str) -> String {
    format!("https://{lang}.wikipedia.org/wiki/{}", title.replace(' ', "_"))
}

fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(value).with_context(|| "Failed to serialise JSON")?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// Blocking client for one Wikipedia language edition.
pub struct WikiClient {
    client: Client,
    lang: String,
}

impl WikiClient {
    pub fn new(config: &FetchConfig, lang: &str) -> Result<WikiClient> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .with_context(|| "Failed to build HTTP client")?;
        Ok(WikiClient {
            client,
            lang: lang.to_string(),
        })
    }

    fn base_url(&self) -> String {
        format!("https://{}.wikipedia.org", self.lang)
    }

    /// Page HTML through the REST API.
    pub fn rest_page(&self, page: &str) -> Result<RawPage> {
        let title = page.replace(' ', "_");
        let url = format!("{}/api/rest_v1/page/html/{title}", self.base_url());
        log::debug!("Requesting REST API page html from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to request {url}"))?
            .error_for_status()
            .with_context(|| format!("REST API request for {url} failed"))?;
        log::info!("Fetched REST API page html ({}) from {url}", response.status());

        let headers = collect_headers(response.headers());
        let content_type = headers
            .get("content-type")
            .cloned()
            .unwrap_or_else(|| "text/html".to_string());
        let html = response
            .text()
            .with_context(|| format!("Failed to read response body from {url}"))?;

        Ok(RawPage {
            api: Api::Rest.to_string(),
            page: page.to_string(),
            lang: self.lang.clone(),
            source_url: article_url(&self.lang, page),
            content_type,
            html,
            headers,
        })
    }

    /// Page HTML through the Action API's `parse` module.
    pub fn action_page(&self, page: &str) -> Result<RawPage> {
        let url = format!("{}/w/api.php", self.base_url());
        log::debug!("Requesting Action API parse of {page} from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "parse"),
                ("page", page),
                ("format", "json"),
                ("prop", "text"),
                ("formatversion", "2"),
            ])
            .send()
            .with_context(|| format!("Failed to request {url}"))?
            .error_for_status()
            .with_context(|| format!("Action API request for {page} failed"))?;
        log::info!("Fetched Action API parse ({}) from {url}", response.status());

        let headers = collect_headers(response.headers());
        let data: Value = response
            .json()
            .with_context(|| "Failed to parse Action API response as JSON")?;
        if let Some(error) = data.get("error") {
            bail!("Action API returned an error: {error}");
        }
        let html = data
            .pointer("/parse/text")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("Action API response has no parse.text"))?
            .to_string();

        Ok(RawPage {
            api: Api::Action.to_string(),
            page: page.to_string(),
            lang: self.lang.clone(),
            source_url: article_url(&self.lang, page),
            content_type: "text/html".to_string(),
            html,
            headers,
        })
    }

    /// Fetch `page` through each API `api` allows until one succeeds.
    pub fn page(&self, page: &str, api: Api) -> Result<RawPage> {
        for attempt in api.attempts() {
            let result = match attempt {
                Api::Rest | Api::Auto => self.rest_page(page),
                Api::Action => self.action_page(page),
            };
            match result {
                Ok(raw) => return Ok(raw),
                Err(e) => log::error!("Failed {attempt} API request: {e:#}"),
            }
        }
        bail!("All API attempts failed for page '{page}'")
    }

    /// Article summary JSON through the REST API.
    pub fn summary(&self, title: &str) -> Result<Value> {
        let url = format!("{}/api/rest_v1/page/summary/{title}", self.base_url());
        log::debug!("Requesting REST API summary from {url}");
        let mut data: Value = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to request {url}"))?
            .error_for_status()
            .with_context(|| format!("Summary request for {title} failed"))?
            .json()
            .with_context(|| format!("Failed to parse summary for {title}"))?;

        if let Some(object) = data.as_object_mut() {
            object
                .entry("api")
                .or_insert_with(|| Value::from("summary"));
            object
                .entry("lang")
                .or_insert_with(|| Value::from(self.lang.clone()));
        }
        Ok(data)
    }
}

/// Merge a summary payload into a copy of `element`.
pub fn merge_summary(element: &ElementRecord, payload: &Value) -> ElementRecord {
    let text = |pointer: &str| {
        payload
            .pointer(pointer)
            .and_then(Value::as_str)
            .map(ToString::to_string)
    };

    let mut merged = element.clone();
    merged.summary = text("/extract");
    merged.summary_html = text("/extract_html");
    merged.description = text("/description");
    merged.source_url = text("/content_urls/desktop/page").or_else(|| {
        Some(element.wiki_url.clone()).filter(|url| !url.is_empty())
    });
    merged
}

/// Fetch a summary for every element with a Wikipedia URL. Elements whose
/// summary can't be fetched are left out.
pub fn fetch_summaries(
    client: &WikiClient,
    elements: &[ElementRecord],
    raw_dir: &Path,
    progress: &ProgressBar,
) -> Result<Vec<ElementRecord>> {
    let mut summaries = Vec::with_capacity(elements.len());

    for element in elements {
        progress.inc(1);
        let Some(title) = element.wiki_title() else {
            log::warn!(
                "Skipping element {} without a wiki URL",
                element.atomic_number
            );
            continue;
        };
        progress.set_message(element.name_en.clone());

        let payload = match client.summary(title) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to fetch summary for {title}: {e:#}");
                continue;
            }
        };

        let page = if element.name_en.is_empty() {
            title.replace('_', " ")
        } else {
            element.name_en.clone()
        };
        let raw_path = raw_dir.join(raw_file_name(&page, &client.lang, "summary"));
        save_json(&payload, &raw_path)?;

        summaries.push(merge_summary(element, &payload));
        log::info!(
            "Fetched summary for element {} ({})",
            element.atomic_number,
            element.name_en
        );
    }

    summaries.sort_by_key(|element| element.atomic_number);
    Ok(summaries)
}

/// Run the fetch command: save the raw page, then optionally summaries.
pub fn run(config: &Configuration, options: &FetchArgs) -> Result<()> {
    let FetchConfig { page, api, .. } = &config.fetch;
    let DataConfig {
        raw_dir,
        summaries_raw_dir,
        meta: meta_path,
        tables,
        summaries: summaries_path,
    } = &config.data;

    let page = options.page.as_deref().unwrap_or(page);
    let lang = options.lang.as_deref().unwrap_or(&config.language);
    let api = options.api.unwrap_or(*api);
    log::info!("Starting fetch of '{page}' ({lang}, {api} API)");

    let client = WikiClient::new(&config.fetch, lang)?;
    let raw = client.page(page, api)?;
    let raw_path: PathBuf = raw_dir.join(raw_file_name(&raw.page, &raw.lang, &raw.api));
    save_json(&raw, &raw_path)?;
    log::info!("Saved raw data to {}", raw_path.display());
    println!("Saved {} to {}", raw.source_url, raw_path.display());

    meta::update(meta_path, |meta| {
        meta.insert("fetched_at_utc".into(), Utc::now().to_rfc3339().into());
        meta.insert("language".into(), raw.lang.clone().into());
        meta.insert("page".into(), raw.page.clone().into());
        meta.insert("api".into(), raw.api.clone().into());
        meta.insert("source_url".into(), raw.source_url.clone().into());
        meta.insert("raw_file".into(), meta::file_name(&raw_path).into());
    })?;

    if !options.summaries {
        return Ok(());
    }

    let dataset = Dataset::load(tables).with_context(|| {
        format!(
            "Unable to load element data from {} - run 'periodic-book normalize' first",
            tables.display()
        )
    })?;

    let progress = ProgressBar::new(dataset.elements.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .with_context(|| "Failed to parse progress style")?
            .progress_chars("#>-"),
    );
    let summaries = fetch_summaries(&client, &dataset.elements, summaries_raw_dir, &progress)?;
    progress.finish_with_message("Summaries fetched");

    if summaries.is_empty() {
        log::warn!("No element summaries were fetched");
        return Ok(());
    }

    let count = summaries.len();
    let aggregated = Dataset {
        meta: DatasetMeta {
            language: Some(lang.to_string()),
            source: Some("wikipedia-summary".to_string()),
            source_url: Some(raw.source_url.clone()),
            normalized_at: None,
        },
        elements: summaries,
    };
    aggregated.save(summaries_path)?;

    meta::update(meta_path, |meta| {
        meta.insert(
            "element_summary_file".into(),
            meta::file_name(summaries_path).into(),
        );
        meta.insert("element_summary_count".into(), count.into());
        meta.insert(
            "element_summary_raw_dir".into(),
            summaries_raw_dir.display().to_string().into(),
        );
    })?;
    println!("Wrote {count} element summaries to {}", summaries_path.display());

    Ok(())
}
