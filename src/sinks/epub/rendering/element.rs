//! Element profile pages, one per element with a fetched summary.

use super::{xhtml_page, Book, QUICK_TABLE_PAGE};
use crate::elements::ElementRecord;
use crate::localization::Strings;
use html_escape::{encode_double_quoted_attribute, encode_text};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::sync::LazyLock;

static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("entity pattern is valid"));

const XML_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

/// Path of an element's profile page inside the EPUB.
pub fn profile_href(element: &ElementRecord) -> String {
    let name = [element.name_en.as_str(), element.symbol.as_str()]
        .into_iter()
        .map(slug::slugify)
        .find(|slug| !slug.is_empty())
        .unwrap_or_else(|| "element".to_string());
    format!("elements/{:03}-{name}.xhtml", element.atomic_number)
}

/// Whether a summary's HTML can be embedded in an XHTML page as is:
/// balanced, well-formed, and free of HTML-only named entities.
pub fn is_embeddable(html: &str) -> bool {
    if NAMED_ENTITY
        .captures_iter(html)
        .any(|captures| !XML_ENTITIES.contains(&&captures[1]))
    {
        return false;
    }

    let mut reader = Reader::from_str(html);
    reader.check_end_names(true);
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Ok(Event::Eof) => return depth == 0,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

/// Non-empty metadata rows for the definition list.
fn metadata(strings: &Strings, element: &ElementRecord) -> Vec<(String, String)> {
    let block = if element.block_label.is_empty() {
        element.block.clone()
    } else {
        element.block_label.clone()
    };
    let number = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();

    [
        (&strings.element_meta_atomic_number, element.atomic_number.to_string()),
        (&strings.element_meta_symbol, element.symbol.clone()),
        (
            &strings.element_meta_standard_atomic_weight,
            element.standard_atomic_weight.clone(),
        ),
        (&strings.element_meta_group, number(element.group)),
        (&strings.element_meta_period, number(element.period)),
        (&strings.element_meta_block, block),
        (&strings.element_meta_category, element.category.clone()),
        (&strings.element_meta_phase_stp, element.phase.clone()),
        (&strings.element_meta_origin, element.origin.clone()),
        (&strings.element_meta_name_en, element.name_en.clone()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| (label.clone(), value))
    .collect()
}

fn summary_html(strings: &Strings, element: &ElementRecord) -> String {
    if let Some(html) = element
        .summary_html
        .as_deref()
        .filter(|html| !html.trim().is_empty())
    {
        if is_embeddable(html) {
            return format!(r#"<div class="summary">{html}</div>"#);
        }
        log::debug!(
            "Summary HTML for element {} is not valid XHTML, using plain text",
            element.atomic_number
        );
    }

    match element.summary.as_deref().filter(|text| !text.trim().is_empty()) {
        Some(text) => {
            let paragraphs = text
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(|p| format!("<p>{}</p>", encode_text(p)))
                .collect::<Vec<_>>()
                .join("\n");
            format!(r#"<div class="summary">{paragraphs}</div>"#)
        }
        None => format!(
            r#"<p class="missing">{}</p>"#,
            encode_text(&strings.element_summary_missing)
        ),
    }
}

/// Render one element's profile page.
pub fn render_profile(book: &Book, element: &ElementRecord) -> String {
    let strings = book.strings;
    let title = element.display_title();

    let rows = metadata(strings, element)
        .into_iter()
        .map(|(label, value)| {
            format!(
                "<dt>{}</dt><dd>{}</dd>",
                encode_text(&label),
                encode_text(&value)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let description = element
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!(r#"<p class="description">{}</p>"#, encode_text(d)))
        .unwrap_or_default();

    let source = element
        .source_url
        .as_deref()
        .or(Some(element.wiki_url.as_str()))
        .filter(|url| !url.is_empty())
        .map(|url| {
            format!(
                r#"<p class="source">{}: <a href="{}">{}</a></p>"#,
                encode_text(&strings.element_source),
                encode_double_quoted_attribute(url),
                encode_text(url)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h2 id="el-{z}"><a href="../{QUICK_TABLE_PAGE}#el-{z}">{title}</a></h2>
{description}
<dl class="meta">
{rows}
</dl>
<h3>{summary_label}</h3>
{summary}
{source}"#,
        z = element.atomic_number,
        title = encode_text(&title),
        summary_label = encode_text(&strings.element_summary_label),
        summary = summary_html(strings, element),
    );
    xhtml_page(&book.language, &title, 1, &body)
}

/// Render the element profiles landing page.
pub fn render_index(book: &Book) -> String {
    let strings = book.strings;
    let items = book
        .profiles
        .iter()
        .map(|element| {
            // both pages live in the same directory
            let href = profile_href(element);
            let href = href.trim_start_matches("elements/");
            format!(
                r#"<li><span class="z">{}</span><a href="{}">{}</a></li>"#,
                element.atomic_number,
                encode_double_quoted_attribute(href),
                encode_text(&element.display_title())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<h1>{}</h1>
<p>{}</p>
<p class="source">{}</p>
<ol class="elements">
{items}
</ol>"#,
        encode_text(&strings.element_profiles_title),
        encode_text(&strings.element_profiles_intro),
        encode_text(&strings.element_profiles_source_note),
    );
    xhtml_page(&book.language, &strings.element_profiles_title, 1, &body)
}
