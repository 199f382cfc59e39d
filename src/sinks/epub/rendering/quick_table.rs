//! The quick table: the periodic grid as an XHTML table.
//!
//! Uses the same placement rules as the cover, so the f-block sits in its
//! own two rows under the main table, separated by an empty spacer row.

use super::{xhtml_page, Book, QUICK_TABLE_PAGE};
use crate::layout::{
    grid_map, GridPosition, ACTINIDE_ROW, COLUMNS, F_BLOCK_FIRST_ROW, LANTHANIDE_ROW, ROWS,
};
use crate::localization::Strings;
use crate::sinks::epub::styles::category_class;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::collections::HashMap;

fn row_label(strings: &Strings, row: u32) -> String {
    match row {
        LANTHANIDE_ROW => strings.quick_table_lanthanides.clone(),
        ACTINIDE_ROW => strings.quick_table_actinides.clone(),
        period => format!("{} {period}", strings.quick_table_period),
    }
}

/// Render the quick table as XHTML.
pub fn render(book: &Book, links: &HashMap<u32, String>) -> String {
    let strings = book.strings;
    let grid = grid_map(book.elements);

    let mut rows = Vec::with_capacity(ROWS as usize + 2);

    let groups = (1..=COLUMNS)
        .map(|group| format!("<th>{group}</th>"))
        .collect::<String>();
    rows.push(format!(
        r#"<tr><th class="row-label">{}</th>{groups}</tr>"#,
        encode_text(&strings.quick_table_group)
    ));

    for row in 1..=ROWS {
        if row == F_BLOCK_FIRST_ROW {
            rows.push(format!(
                r#"<tr><td class="gap" colspan="{}"></td></tr>"#,
                COLUMNS + 1
            ));
        }

        let mut cells = format!(
            r#"<th class="row-label">{}</th>"#,
            encode_text(&row_label(strings, row))
        );
        for column in 1..=COLUMNS {
            let Some(element) = grid.get(&GridPosition::new(row, column)) else {
                cells.push_str(r#"<td class="empty"></td>"#);
                continue;
            };
            let z = element.atomic_number;
            let content = format!(
                r#"<span class="number">{z}</span><span class="symbol">{}</span>"#,
                encode_text(&element.symbol)
            );
            // cells only link out, never back to themselves
            let link = links
                .get(&z)
                .filter(|href| !href.starts_with(QUICK_TABLE_PAGE));
            let content = match link {
                Some(href) => format!(
                    r#"<a href="{}">{content}</a>"#,
                    encode_double_quoted_attribute(href)
                ),
                None => content,
            };
            cells.push_str(&format!(
                r#"<td id="el-{z}" class="{}" title="{}">{content}</td>"#,
                category_class(&element.category),
                encode_double_quoted_attribute(&element.display_title()),
            ));
        }
        rows.push(format!("<tr>{cells}</tr>"));
    }

    let body = format!(
        r#"<h1>{}</h1>
<table class="periodic">
{}
</table>
<p class="hint">{}</p>"#,
        encode_text(&strings.quick_table_title),
        rows.join("\n"),
        encode_text(&strings.quick_table_hint),
    );
    xhtml_page(&book.language, &strings.quick_table_title, 0, &body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::elements::ElementRecord;
    use crate::sinks::epub::rendering::test::{book, element};

    fn lanthanum() -> ElementRecord {
        let mut la = element(57, "La", "Lanthanum", 3, 6);
        la.category = "lanthanide".to_string();
        la
    }

    #[test]
    fn cells_are_anchored_by_atomic_number() {
        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1), lanthanum()];
        let book = book(&strings, &elements, &[]);
        let links = book.element_links(false);
        let html = render(&book, &links);

        assert!(html.contains(r#"<td id="el-1" class="cat-alkali-metal" title="Hydrogen (H)">"#));
        assert!(html.contains(r#"<td id="el-57" class="cat-lanthanide""#));
        assert!(html.contains("Period 1"));
        assert!(html.contains("Lanthanides"));
        assert!(html.contains("Actinides"));
        // no self-links when there are no profiles
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn lanthanides_sit_below_the_spacer_row() {
        let strings = Strings::english();
        let elements = vec![lanthanum()];
        let book = book(&strings, &elements, &[]);
        let html = render(&book, &HashMap::new());

        let gap = html.find(r#"class="gap""#).unwrap();
        let la = html.find(r#"id="el-57""#).unwrap();
        assert!(gap < la);
        // one row per grid row, plus the header and spacer rows
        assert_eq!(html.matches("<tr>").count(), ROWS as usize + 2);
    }

    #[test]
    fn cells_link_to_profiles() {
        let strings = Strings::english();
        let elements = vec![element(1, "H", "Hydrogen", 1, 1)];
        let book = book(&strings, &elements, &elements);
        let html = render(&book, &book.element_links(true));
        assert!(html.contains(r#"<a href="elements/001-hydrogen.xhtml">"#));
    }
}
