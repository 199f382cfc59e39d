//! CSS generation for the EPUB.
//!
//! Base document styles tuned for e-ink readers, plus one class per element
//! category so quick-table cells share the cover's colours.

use crate::sinks::cover::{CATEGORY_COLOURS, UNKNOWN_COLOUR};

/// Class name for a category, e.g. `cat-noble-gas`.
pub fn category_class(category: &str) -> String {
    let slug = slug::slugify(category);
    if slug.is_empty() {
        "cat-unknown".to_string()
    } else {
        format!("cat-{slug}")
    }
}

/// Generate the complete stylesheet.
pub fn generate_stylesheet(font_family: &str) -> String {
    let mut css = String::with_capacity(4096);
    css.push_str(&generate_base_styles(font_family));

    css.push_str("\n/* Categories */\n");
    for (category, colour) in CATEGORY_COLOURS {
        css.push_str(&format!(
            ".{} {{ background-color: {colour}; }}\n",
            category_class(category)
        ));
    }
    css.push_str(&format!(
        ".cat-unknown {{ background-color: {UNKNOWN_COLOUR}; }}\n"
    ));

    css
}

fn generate_base_styles(font_family: &str) -> String {
    format!(
        r#"/* Base styles */
body {{
    font-family: {font_family};
    line-height: 1.5;
    margin: 1em;
}}

h1 {{
    font-size: 1.8em;
    text-align: center;
    margin: 1em 0;
}}

h2 {{
    font-size: 1.4em;
    margin: 1em 0 0.5em;
    border-bottom: 1px solid #ccc;
}}

/* Cover page */
.cover {{
    text-align: center;
    margin: 0;
    padding: 0;
}}

.cover img {{
    max-width: 100%;
    max-height: 100%;
}}

/* Quick table */
table.periodic {{
    border-collapse: collapse;
    font-size: 0.6em;
    width: 100%;
}}

table.periodic th {{
    font-weight: normal;
    color: #666;
    padding: 0.1em;
}}

table.periodic th.row-label {{
    text-align: right;
    white-space: nowrap;
}}

table.periodic td {{
    border: 1px solid #999;
    text-align: center;
    padding: 0.1em;
}}

table.periodic td.empty {{
    border: none;
}}

table.periodic td.gap {{
    border: none;
    height: 0.5em;
}}

table.periodic .number {{
    display: block;
    font-size: 0.7em;
    text-align: left;
}}

table.periodic .symbol {{
    display: block;
    font-weight: bold;
    font-size: 1.2em;
}}

.hint {{
    font-size: 0.8em;
    color: #666;
}}

/* Element lists */
ol.elements, ul.elements {{
    list-style-type: none;
    padding-left: 0;
}}

ol.elements li, ul.elements li {{
    margin: 0.2em 0;
}}

.elements .z {{
    display: inline-block;
    min-width: 2.5em;
    color: #666;
}}

.elements .sym {{
    display: inline-block;
    min-width: 2.5em;
    font-weight: bold;
}}

/* Element profiles */
dl.meta {{
    margin: 1em 0;
}}

dl.meta dt {{
    font-weight: bold;
    margin-top: 0.3em;
}}

dl.meta dd {{
    margin-left: 1em;
}}

.summary {{
    margin: 1em 0;
}}

.missing {{
    font-style: italic;
    color: #888;
}}

.source {{
    font-size: 0.85em;
    word-wrap: break-word;
}}

/* Attribution */
ol.attribution li {{
    margin: 0.5em 0;
    font-size: 0.85em;
}}
"#
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_generate_stylesheet() {
        let css = generate_stylesheet("'Noto Sans', sans-serif");
        assert!(css.contains("body {"));
        assert!(css.contains("font-family: 'Noto Sans', sans-serif;"));
        assert!(css.contains("table.periodic"));
        assert!(css.contains(".cat-noble-gas { background-color: #a78bfa; }"));
        assert!(css.contains(".cat-unknown"));
    }

    #[test]
    fn category_classes_are_slugged() {
        assert_eq!(category_class("Alkali metal"), "cat-alkali-metal");
        assert_eq!(category_class("lanthanide/actinide"), "cat-lanthanide-actinide");
        assert_eq!(category_class(""), "cat-unknown");
    }
}
