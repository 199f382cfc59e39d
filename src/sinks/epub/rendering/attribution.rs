//! Sources and licensing: every article the book draws from, under CC BY-SA.

use super::{xhtml_page, Book};
use html_escape::{encode_double_quoted_attribute, encode_text};

pub const LICENCE_NAME: &str = "CC BY-SA 4.0";
pub const LICENCE_URL: &str = "https://creativecommons.org/licenses/by-sa/4.0/";

/// Render the attribution page as XHTML.
pub fn render(book: &Book) -> String {
    let strings = book.strings;
    // profiles carry the canonical article URL, fall back to the table
    let elements = if book.profiles.is_empty() {
        book.elements
    } else {
        book.profiles
    };

    let items = elements
        .iter()
        .map(|element| {
            let url = element
                .source_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(&element.wiki_url);
            let title = encode_text(&element.display_title()).into_owned();
            let title = if url.is_empty() {
                title
            } else {
                format!(
                    r#"<a href="{}">{title}</a>"#,
                    encode_double_quoted_attribute(url)
                )
            };
            format!(
                r#"<li>{title} · {} · <a href="{LICENCE_URL}">{LICENCE_NAME}</a></li>"#,
                encode_text(&strings.book_author),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<h1>{}</h1>
<p>{}</p>
<ol class="attribution">
{items}
</ol>
<p>{}</p>"#,
        encode_text(&strings.sources_title),
        encode_text(&strings.sources_intro),
        encode_text(&strings.retrieved(&book.retrieved)),
    );
    xhtml_page(&book.language, &strings.sources_title, 0, &body)
}
