//! Table of contents rendering for EPUB.
//!
//! Complements the EPUB's built-in navigation (NCX/nav.xhtml) with a
//! human-readable page listing every section, with element profiles nested
//! under their own heading.

use super::{
    profile_href, xhtml_page, Book, ATTRIBUTION_PAGE, BLOCKS_PAGE, INDEX_PAGE, LEGEND_PAGE,
    PROFILES_PAGE, QUICK_TABLE_PAGE,
};
use html_escape::encode_text;

fn item(href: &str, label: &str) -> String {
    format!(r#"<li><a href="{href}">{}</a></li>"#, encode_text(label))
}

/// Render the table of contents as XHTML.
pub fn render(book: &Book, with_profiles: bool) -> String {
    let strings = book.strings;
    let mut items = vec![
        item(QUICK_TABLE_PAGE, &strings.quick_table_title),
        item(INDEX_PAGE, &strings.index_title),
        item(BLOCKS_PAGE, &strings.blocks_title),
    ];

    if with_profiles {
        let profiles = book
            .profiles
            .iter()
            .map(|element| item(&profile_href(element), &element.display_title()))
            .collect::<Vec<_>>()
            .join("\n");
        items.push(format!(
            r#"<li><a href="{PROFILES_PAGE}">{}</a>
<ol>
{profiles}
</ol></li>"#,
            encode_text(&strings.element_profiles_title)
        ));
    }

    items.push(item(LEGEND_PAGE, &strings.legend_title));
    items.push(item(ATTRIBUTION_PAGE, &strings.sources_title));

    let body = format!(
        r#"<div class="toc">
<h2>{}</h2>
<ol>
{}
</ol>
</div>"#,
        encode_text(&strings.toc_heading),
        items.join("\n"),
    );
    xhtml_page(&book.language, &strings.toc_heading, 0, &body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::localization::Strings;
    use crate::sinks::epub::rendering::test::{book, element};

    #[test]
    fn lists_sections_in_reading_order() {
        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1)];
        let book = book(&strings, &elements, &elements);

        let html = render(&book, true);
        let quick = html.find("quick-table.xhtml").unwrap();
        let profile = html.find("elements/001-hydrogen.xhtml").unwrap();
        let sources = html.find("attribution.xhtml").unwrap();
        assert!(quick < profile && profile < sources);
        assert!(html.contains("Hydrogen (H)"));

        let html = render(&book, false);
        assert!(!html.contains("elements/"));
    }
}
