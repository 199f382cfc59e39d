//! Tolerant HTML table extraction.
//!
//! The source page is HTML5 rather than XML, so the tokenizer runs with end
//! tag checks disabled and only a handful of tags are tracked: `table`, `tr`,
//! `td`/`th`, `br`, and `style`/`script` (whose contents are dropped). Row and
//! column spans are expanded so every row of the result lines up with the
//! header.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Upper bound for `colspan` / `rowspan`, so a broken attribute can't explode the grid.
const MAX_SPAN: usize = 1000;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("no <table> element found in the document")]
    NoTable,
    #[error("failed to tokenise HTML near byte {position}")]
    Markup {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
}

/// A table with its header rows collapsed into one name per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Index of the first column whose header satisfies `predicate`.
    pub fn find_column<F: Fn(&str) -> bool>(&self, predicate: F) -> Option<usize> {
        self.headers.iter().position(|header| predicate(header))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RawCell {
    text: String,
    header: bool,
    colspan: usize,
    rowspan: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct GridCell {
    text: String,
    header: bool,
}

#[derive(Default)]
struct OpenTable {
    rows: Vec<Vec<RawCell>>,
    row: Option<Vec<RawCell>>,
    cell: Option<RawCell>,
}

impl OpenTable {
    fn close_cell(&mut self) {
        if let Some(mut cell) = self.cell.take() {
            cell.text = cell.text.split_whitespace().collect::<Vec<_>>().join(" ");
            self.row.get_or_insert_with(Vec::new).push(cell);
        }
    }

    fn close_row(&mut self) {
        self.close_cell();
        if let Some(row) = self.row.take() {
            if !row.is_empty() {
                self.rows.push(row);
            }
        }
    }

    fn finish(mut self) -> HtmlTable {
        self.close_row();
        build_table(expand_spans(&self.rows))
    }
}

fn tag_name(name: &[u8]) -> Vec<u8> {
    name.to_ascii_lowercase()
}

fn span_attribute(start: &BytesStart, key: &[u8]) -> usize {
    start
        .html_attributes()
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(key))
        .and_then(|attr| {
            std::str::from_utf8(&attr.value)
                .ok()
                .and_then(|value| value.trim().parse::<usize>().ok())
        })
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Extract every table in `html`, in document order of their closing tags.
pub fn extract_tables(html: &str) -> Result<Vec<HtmlTable>, TableError> {
    let mut reader = Reader::from_str(html);
    reader.check_end_names(false);

    let mut finished = Vec::new();
    let mut open: Vec<OpenTable> = Vec::new();
    let mut skip_depth = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(TableError::Markup {
                    position: reader.buffer_position(),
                    source,
                })
            }
        };

        match event {
            Event::Start(start) => match tag_name(start.local_name().as_ref()).as_slice() {
                b"table" => open.push(OpenTable::default()),
                b"tr" => {
                    if let Some(table) = open.last_mut() {
                        table.close_row();
                        table.row = Some(Vec::new());
                    }
                }
                name @ (b"td" | b"th") => {
                    if let Some(table) = open.last_mut() {
                        table.close_cell();
                        table.cell = Some(RawCell {
                            text: String::new(),
                            header: name == b"th",
                            colspan: span_attribute(&start, b"colspan"),
                            rowspan: span_attribute(&start, b"rowspan"),
                        });
                    }
                }
                b"br" => push_text(&mut open, " "),
                b"style" | b"script" => skip_depth += 1,
                _ => {}
            },
            Event::Empty(empty) => {
                if tag_name(empty.local_name().as_ref()) == b"br" {
                    push_text(&mut open, " ");
                }
            }
            Event::End(end) => match tag_name(end.local_name().as_ref()).as_slice() {
                b"table" => {
                    if let Some(table) = open.pop() {
                        finished.push(table.finish());
                    }
                }
                b"tr" => {
                    if let Some(table) = open.last_mut() {
                        table.close_row();
                    }
                }
                b"td" | b"th" => {
                    if let Some(table) = open.last_mut() {
                        table.close_cell();
                    }
                }
                b"style" | b"script" => skip_depth = skip_depth.saturating_sub(1),
                _ => {}
            },
            Event::Text(text) if skip_depth == 0 => {
                let raw = String::from_utf8_lossy(&text);
                let decoded = html_escape::decode_html_entities(&raw);
                push_text(&mut open, &decoded);
            }
            Event::CData(data) if skip_depth == 0 => {
                push_text(&mut open, &String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // unterminated tables still count
    while let Some(table) = open.pop() {
        finished.push(table.finish());
    }

    Ok(finished)
}

fn push_text(open: &mut [OpenTable], text: &str) {
    if let Some(cell) = open.last_mut().and_then(|table| table.cell.as_mut()) {
        cell.text.push_str(text);
    }
}

/// Lay raw rows out on a rectangular grid, copying spanned cells into every
/// slot they cover.
fn expand_spans(rows: &[Vec<RawCell>]) -> Vec<Vec<GridCell>> {
    // per column: rows still to be covered by a rowspan, and the cell covering them
    let mut pending: Vec<Option<(usize, GridCell)>> = Vec::new();
    let mut grid = Vec::with_capacity(rows.len());

    for row in rows {
        let mut out: Vec<GridCell> = Vec::new();
        let mut cells = row.iter();

        loop {
            take_pending(&mut pending, &mut out);

            let Some(cell) = cells.next() else {
                break;
            };
            let grid_cell = GridCell {
                text: cell.text.clone(),
                header: cell.header,
            };
            for _ in 0..cell.colspan {
                let column = out.len();
                if cell.rowspan > 1 {
                    if pending.len() <= column {
                        pending.resize(column + 1, None);
                    }
                    pending[column] = Some((cell.rowspan - 1, grid_cell.clone()));
                }
                out.push(grid_cell.clone());
            }
        }

        // spans hanging off the end of a short row
        while out.len() < pending.len() {
            if pending[out.len()].is_some() {
                take_pending(&mut pending, &mut out);
            } else {
                out.push(GridCell {
                    text: String::new(),
                    header: false,
                });
            }
        }

        grid.push(out);
    }

    grid
}

/// Push cells continuing from earlier rows for as long as the next column is covered.
fn take_pending(pending: &mut [Option<(usize, GridCell)>], out: &mut Vec<GridCell>) {
    while let Some(slot) = pending.get_mut(out.len()) {
        let Some((remaining, cell)) = slot.as_mut() else {
            break;
        };
        out.push(cell.clone());
        *remaining -= 1;
        if *remaining == 0 {
            *slot = None;
        }
    }
}

/// Split leading all-header rows from the body and name each column.
fn build_table(grid: Vec<Vec<GridCell>>) -> HtmlTable {
    let header_count = grid
        .iter()
        .take_while(|row| !row.is_empty() && row.iter().all(|cell| cell.header))
        .count();
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);

    let headers = (0..width)
        .map(|column| {
            let mut parts: Vec<&str> = Vec::new();
            for row in &grid[..header_count] {
                if let Some(cell) = row.get(column) {
                    let text = cell.text.as_str();
                    if !text.is_empty() && parts.last() != Some(&text) {
                        parts.push(text);
                    }
                }
            }
            parts.join(" ")
        })
        .collect();

    let rows = grid
        .into_iter()
        .skip(header_count)
        .map(|row| row.into_iter().map(|cell| cell.text).collect())
        .collect();

    HtmlTable { headers, rows }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_simple_table() {
        let html = r#"<html><body><table>
            <tr><th>Z</th><th>Sym.</th></tr>
            <tr><td>1</td><td>H</td></tr>
            <tr><td>2</td><td>He</td></tr>
        </table></body></html>"#;
        let tables = extract_tables(html).expect("can extract tables");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Z", "Sym."]);
        assert_eq!(
            tables[0].rows,
            vec![vec!["1".to_string(), "H".to_string()], vec!["2".to_string(), "He".to_string()]]
        );
    }

    #[test]
    fn tolerates_html_void_elements_and_entities() {
        let html = r#"<!DOCTYPE html><html><head><meta charset="utf-8"><link rel="stylesheet" href="x.css">
            <style>td { color: red; }</style></head><body>
            <table class=wikitable><tbody>
            <tr><th>Element</th><th>Origin</th></tr>
            <tr><td>Hydrogen&nbsp;gas</td><td>Greek<br>'water'<br/>&amp; former</td></tr>
            </tbody></table></body></html>"#;
        let tables = extract_tables(html).expect("can extract tables");
        assert_eq!(tables[0].headers, vec!["Element", "Origin"]);
        assert_eq!(tables[0].rows[0][0], "Hydrogen gas");
        assert_eq!(tables[0].rows[0][1], "Greek 'water' & former");
    }

    #[test]
    fn expands_colspan_and_rowspan_in_headers() {
        let html = r#"<table>
            <tr><th rowspan="2">Z</th><th colspan="2">Atomic weight</th></tr>
            <tr><th>(Da)</th><th>Note</th></tr>
            <tr><td>1</td><td>1.008</td><td>-</td></tr>
        </table>"#;
        let table = extract_tables(html).unwrap().remove(0);
        assert_eq!(
            table.headers,
            vec!["Z", "Atomic weight (Da)", "Atomic weight Note"]
        );
        assert_eq!(table.rows[0], vec!["1", "1.008", "-"]);
    }

    #[test]
    fn expands_rowspan_in_body() {
        let html = r#"<table>
            <tr><th>Z</th><th>Period</th><th>Sym.</th></tr>
            <tr><td>3</td><td rowspan="2">2</td><td>Li</td></tr>
            <tr><td>4</td><td>Be</td></tr>
            <tr><td>5</td><td>2</td><td rowspan="3">B</td></tr>
        </table>"#;
        let table = extract_tables(html).unwrap().remove(0);
        assert_eq!(table.rows[1], vec!["4", "2", "Be"]);
        // the trailing rowspan runs past the last row without panicking
        assert_eq!(table.rows[2], vec!["5", "2", "B"]);
    }

    #[test]
    fn nested_tables_are_separate() {
        let html = r#"<table><tr><th>Outer</th></tr><tr><td>
            <table><tr><th>Inner</th></tr><tr><td>x</td></tr></table>
            </td></tr></table>"#;
        let tables = extract_tables(html).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Inner"]);
        assert_eq!(tables[1].headers, vec!["Outer"]);
    }

    #[test]
    fn documents_without_tables_give_nothing() {
        let tables = extract_tables("<p>No tables here</p>").unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn find_column_matches_header() {
        let table = HtmlTable {
            headers: vec!["Z".to_string(), "Sym.".to_string()],
            rows: vec![],
        };
        assert_eq!(table.find_column(|h| h.starts_with("Sym")), Some(1));
        assert_eq!(table.find_column(|h| h == "Group"), None);
    }
}
