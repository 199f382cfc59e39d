//! Alphabetical (by symbol) element index.

use super::{xhtml_page, Book};
use crate::elements::ElementRecord;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::collections::HashMap;

/// One linked list entry: symbol, atomic number and name.
pub(super) fn element_item(element: &ElementRecord, links: &HashMap<u32, String>) -> String {
    let label = format!(
        r#"<span class="sym">{}</span><span class="z">{}</span>{}"#,
        encode_text(&element.symbol),
        element.atomic_number,
        encode_text(&element.name_en),
    );
    match links.get(&element.atomic_number) {
        Some(href) => format!(
            r#"<li><a href="{}">{label}</a></li>"#,
            encode_double_quoted_attribute(href)
        ),
        None => format!("<li>{label}</li>"),
    }
}

/// Elements ordered by symbol, ties broken by atomic number.
pub fn sorted_by_symbol(elements: &[ElementRecord]) -> Vec<&ElementRecord> {
    let mut sorted: Vec<&ElementRecord> = elements.iter().collect();
    sorted.sort_by(|a, b| {
        a.symbol
            .cmp(&b.symbol)
            .then(a.atomic_number.cmp(&b.atomic_number))
    });
    sorted
}

/// Render the index as XHTML.
pub fn render(book: &Book, links: &HashMap<u32, String>) -> String {
    let strings = book.strings;
    let items = sorted_by_symbol(book.elements)
        .into_iter()
        .map(|element| element_item(element, links))
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<h1>{}</h1>
<ol class="elements">
{items}
</ol>"#,
        encode_text(&strings.index_title),
    );
    xhtml_page(&book.language, &strings.index_title, 0, &body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::localization::Strings;
    use crate::sinks::epub::rendering::test::{book, element};

    #[test]
    fn index_is_sorted_by_symbol_then_number() {
        let elements = vec![
            element(1, "H", "Hydrogen", 1, 1),
            element(2, "He", "Helium", 18, 1),
            element(3, "Li", "Lithium", 1, 2),
            element(20, "Ca", "Calcium", 2, 4),
            element(200, "H", "Duplicate", 1, 8),
        ];
        let order: Vec<u32> = sorted_by_symbol(&elements)
            .iter()
            .map(|e| e.atomic_number)
            .collect();
        assert_eq!(order, vec![20, 1, 200, 2, 3]);
    }

    #[test]
    fn index_links_to_quick_table_cells() {
        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1)];
        let book = book(&strings, &elements, &[]);
        let html = render(&book, &book.element_links(false));
        assert!(html.contains(r#"<a href="quick-table.xhtml#el-1">"#));
        assert!(html.contains("<h1>Elements A–Z</h1>"));
    }
}
