//! Block reference: elements grouped by s, p, d and f block.

use super::index::element_item;
use super::{xhtml_page, Book};
use crate::elements::ElementRecord;
use html_escape::encode_text;
use std::collections::HashMap;

/// Section order; anything else goes into a trailing "other" section.
pub const BLOCK_ORDER: [&str; 4] = ["s", "p", "d", "f"];

/// A block name (`None` for "other") and its elements.
pub type Section<'a> = (Option<&'static str>, Vec<&'a ElementRecord>);

/// Elements grouped into sections, in section order. Empty sections are
/// dropped.
pub fn group_by_block(elements: &[ElementRecord]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section> = BLOCK_ORDER
        .iter()
        .map(|block| (Some(*block), Vec::new()))
        .collect();
    sections.push((None, Vec::new()));

    for element in elements {
        let block = element.block.trim().to_lowercase();
        let index = BLOCK_ORDER
            .iter()
            .position(|b| *b == block)
            .unwrap_or(BLOCK_ORDER.len());
        sections[index].1.push(element);
    }

    for (_, members) in &mut sections {
        members.sort_by_key(|element| element.atomic_number);
    }
    sections.retain(|(_, members)| !members.is_empty());
    sections
}

/// Render the block reference as XHTML.
pub fn render(book: &Book, links: &HashMap<u32, String>) -> String {
    let strings = book.strings;
    let sections = group_by_block(book.elements)
        .into_iter()
        .map(|(block, members)| {
            let (id, heading) = match block {
                Some(block) => (format!("block-{block}"), format!("{block}-block")),
                None => ("block-other".to_string(), strings.blocks_other.clone()),
            };
            let items = members
                .into_iter()
                .map(|element| element_item(element, links))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"<h2 id="{id}">{}</h2>
<ul class="elements">
{items}
</ul>"#,
                encode_text(&heading)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        "<h1>{}</h1>\n{sections}",
        encode_text(&strings.blocks_title)
    );
    xhtml_page(&book.language, &strings.blocks_title, 0, &body)
}
