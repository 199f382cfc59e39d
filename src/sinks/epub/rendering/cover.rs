//! Cover page rendering for EPUB.
//!
//! The cover page is marked with EPUB's cover reference type so e-readers
//! display it appropriately in library views. Without an image it falls back
//! to the book title.

use super::{xhtml_page, Book};
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Render the cover page as XHTML. `image` is the cover image's file name
/// inside the EPUB.
pub fn render(book: &Book, image: Option<&str>) -> String {
    let strings = book.strings;
    let body = match image {
        Some(image) => format!(
            r#"<div class="cover">
<img src="{}" alt="{}"/>
</div>"#,
            encode_double_quoted_attribute(image),
            encode_double_quoted_attribute(&strings.cover_image_alt),
        ),
        None => format!(
            r#"<div class="cover">
<h1>{}</h1>
<p>{}</p>
</div>"#,
            encode_text(&strings.book_title),
            encode_text(&strings.cover_arc_subtitle),
        ),
    };
    xhtml_page(&book.language, &strings.cover_page_title, 0, &body)
}
