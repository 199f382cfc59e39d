//! Legend page: how to read the table, and what the cell colours mean.

use super::{xhtml_page, Book};
use crate::sinks::cover::CATEGORY_COLOURS;
use crate::sinks::epub::styles::category_class;
use html_escape::encode_text;

/// Render the legend as XHTML.
pub fn render(book: &Book) -> String {
    let strings = book.strings;
    let items = strings
        .legend_items
        .iter()
        .map(|item| format!("<li>{}</li>", encode_text(item)))
        .collect::<Vec<_>>()
        .join("\n");

    // only list categories that actually occur
    let swatches = CATEGORY_COLOURS
        .iter()
        .filter(|(category, _)| {
            book.elements
                .iter()
                .any(|element| element.category.eq_ignore_ascii_case(category))
        })
        .map(|(category, _)| {
            format!(
                r#"<li><span class="{}">&#160;&#160;&#160;</span> {}</li>"#,
                category_class(category),
                encode_text(category)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<h1>{}</h1>
<ul>
{items}
</ul>
<ul class="elements">
{swatches}
</ul>"#,
        encode_text(&strings.legend_title),
    );
    xhtml_page(&book.language, &strings.legend_title, 0, &body)
}
