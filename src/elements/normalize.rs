//! Turning the raw element table into [`ElementRecord`]s.

use super::{ElementRecord, HtmlTable, TableError};
use regex::Regex;
use std::sync::LazyLock;

static FOOTNOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("footnote pattern is valid"));

/// Strip bracketed footnote markers (`[a]`, `[12]`) and surrounding whitespace.
pub fn clean_text(value: &str) -> String {
    FOOTNOTE
        .replace_all(value, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse an integer the way the table prints them: `"3"`, `"3.0"`, `"3[a]"`.
pub fn to_int(value: &str) -> Option<u32> {
    let text = clean_text(value);
    if text.is_empty() {
        return None;
    }
    let number: f64 = text.parse().ok()?;
    if number.is_finite() && number >= 0.0 {
        Some(number.trunc() as u32)
    } else {
        None
    }
}

/// Which record field a table column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AtomicNumber,
    Symbol,
    Name,
    Group,
    Period,
    BlockLabel,
    AtomicWeight,
    Phase,
    Origin,
}

impl Field {
    const ALL: [Field; 9] = [
        Field::AtomicNumber,
        Field::Symbol,
        Field::Name,
        Field::Group,
        Field::Period,
        Field::BlockLabel,
        Field::AtomicWeight,
        Field::Phase,
        Field::Origin,
    ];

    /// Whether a cleaned, lowercased header names this field.
    fn matches(&self, header: &str) -> bool {
        match self {
            Field::AtomicNumber => header == "z" || header == "atomic number",
            Field::Symbol => header.starts_with("sym"),
            Field::Name => header.starts_with("element") || header == "name",
            Field::Group => header == "group",
            Field::Period => header == "period",
            Field::BlockLabel => header.starts_with("block"),
            Field::AtomicWeight => {
                header.starts_with("atomic weight") || header.starts_with("standard atomic weight")
            }
            Field::Phase => header.starts_with("phase"),
            Field::Origin => header.starts_with("origin"),
        }
    }
}

/// Column index for each field, if the table has one.
#[derive(Debug, Default)]
struct ColumnMap {
    columns: [Option<usize>; Field::ALL.len()],
}

impl ColumnMap {
    fn new(table: &HtmlTable) -> ColumnMap {
        let mut map = ColumnMap::default();
        for (slot, field) in map.columns.iter_mut().zip(Field::ALL) {
            *slot = table.find_column(|header| field.matches(&clean_text(header).to_lowercase()));
        }
        map
    }

    fn get<'r>(&self, row: &'r [String], field: Field) -> &'r str {
        let index = Field::ALL
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.columns[i]);
        index
            .and_then(|column| row.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Pick the element table out of the page: the first table with a `Z`
/// column, or failing that the first table.
pub fn find_element_table(mut tables: Vec<HtmlTable>) -> Result<HtmlTable, TableError> {
    if tables.is_empty() {
        return Err(TableError::NoTable);
    }
    let index = tables
        .iter()
        .position(|table| {
            table
                .find_column(|header| Field::AtomicNumber.matches(&clean_text(header).to_lowercase()))
                .is_some()
        })
        .unwrap_or(0);
    Ok(tables.swap_remove(index))
}

/// Map a block label like `f-block` onto a display category.
fn block_category(block_label: &str) -> String {
    let label = block_label.trim().to_lowercase();
    match label.as_str() {
        "s-block" => "s-block element".to_string(),
        "p-block" => "p-block element".to_string(),
        "d-block" => "transition metal".to_string(),
        "f-block" => "lanthanide/actinide".to_string(),
        "" => "unknown".to_string(),
        _ => label,
    }
}

/// Display category for an element, from its block with well-known families
/// taking priority.
pub fn determine_category(block_label: &str, atomic_number: u32) -> String {
    let family = match atomic_number {
        1 => Some("nonmetal"),
        2 => Some("noble gas"),
        3 | 11 | 19 | 37 | 55 | 87 => Some("alkali metal"),
        4 | 12 | 20 | 38 | 56 | 88 => Some("alkaline earth metal"),
        10 | 18 | 36 | 54 | 86 | 118 => Some("noble gas"),
        5 | 14 | 32 | 33 | 51 | 52 | 84 => Some("metalloid"),
        6 | 7 | 8 | 15 | 16 | 34 => Some("nonmetal"),
        9 | 17 | 35 | 53 | 85 | 117 => Some("halogen"),
        57..=71 => Some("lanthanide"),
        89..=103 => Some("actinide"),
        _ => None,
    };
    family
        .map(ToString::to_string)
        .unwrap_or_else(|| block_category(block_label))
}

/// Wikipedia article URL for an element name.
pub fn wiki_url(lang: &str, name: &str) -> String {
    format!("https://{lang}.wikipedia.org/wiki/{}", name.replace(' ', "_"))
}

/// Convert the element table into records sorted by atomic number.
///
/// Rows without a readable atomic number (footnotes, repeated headers) are
/// dropped.
pub fn normalize_table(table: &HtmlTable, lang: &str) -> Vec<ElementRecord> {
    let columns = ColumnMap::new(table);
    if columns.columns[0].is_none() {
        log::warn!("Element table has no atomic number column, no records produced");
    }

    let mut records: Vec<ElementRecord> = table
        .rows
        .iter()
        .filter_map(|row| {
            let atomic_number = to_int(columns.get(row, Field::AtomicNumber))?;
            let name = clean_text(columns.get(row, Field::Name));
            let block_label = clean_text(columns.get(row, Field::BlockLabel));
            let block = block_label
                .chars()
                .next()
                .map(|c| c.to_lowercase().to_string())
                .unwrap_or_default();

            Some(ElementRecord {
                atomic_number,
                symbol: clean_text(columns.get(row, Field::Symbol)),
                group: to_int(columns.get(row, Field::Group)),
                period: to_int(columns.get(row, Field::Period)),
                block,
                category: determine_category(&block_label, atomic_number),
                block_label,
                standard_atomic_weight: clean_text(columns.get(row, Field::AtomicWeight)),
                phase: clean_text(columns.get(row, Field::Phase)),
                origin: clean_text(columns.get(row, Field::Origin)),
                wiki_url: wiki_url(lang, &name),
                name_en: name,
                ..ElementRecord::default()
            })
        })
        .collect();

    records.sort_by_key(|record| record.atomic_number);
    log::info!("Normalised {} element records", records.len());
    records
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> HtmlTable {
        HtmlTable {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        }
    }

    #[test]
    fn footnotes_are_stripped() {
        assert_eq!(clean_text("Atomic weight [a] (Da)"), "Atomic weight (Da)");
        assert_eq!(clean_text("  1.008[b][c] "), "1.008");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn integers_parse_through_floats() {
        assert_eq!(to_int("3"), Some(3));
        assert_eq!(to_int("3.0"), Some(3));
        assert_eq!(to_int("18[n]"), Some(18));
        assert_eq!(to_int(""), None);
        assert_eq!(to_int("f-block"), None);
        assert_eq!(to_int("-2"), None);
    }

    #[test]
    fn categories_prefer_known_families() {
        assert_eq!(determine_category("s-block", 1), "nonmetal");
        assert_eq!(determine_category("s-block", 2), "noble gas");
        assert_eq!(determine_category("s-block", 55), "alkali metal");
        assert_eq!(determine_category("p-block", 33), "metalloid");
        assert_eq!(determine_category("p-block", 117), "halogen");
        assert_eq!(determine_category("f-block", 64), "lanthanide");
        assert_eq!(determine_category("f-block", 92), "actinide");
        assert_eq!(determine_category("d-block", 26), "transition metal");
        assert_eq!(determine_category("p-block", 50), "p-block element");
        assert_eq!(determine_category("", 120), "unknown");
        assert_eq!(determine_category("G-Block", 121), "g-block");
    }

    #[test]
    fn normalises_rows_into_sorted_records() {
        let table = table(
            &[
                "Z",
                "Sym.",
                "Element",
                "Group",
                "Period",
                "Block",
                "Atomic weight [a] (Da)",
                "Phase[j]",
                "Origin[i]",
            ],
            &[
                &["26", "Fe", "Iron", "8", "4", "d-block", "55.845(2)", "solid", "primordial"],
                &["1", "H", "Hydrogen", "1", "1", "s-block", "1.0080", "gas", "primordial"],
                &["57", "La", "Lanthanum", "", "6", "f-block", "138.91", "solid", "primordial"],
                &["Notes", "", "", "", "", "", "", "", ""],
            ],
        );

        let records = normalize_table(&table, "en");
        let numbers: Vec<u32> = records.iter().map(|r| r.atomic_number).collect();
        assert_eq!(numbers, vec![1, 26, 57]);

        let iron = &records[1];
        assert_eq!(iron.symbol, "Fe");
        assert_eq!(iron.name_en, "Iron");
        assert_eq!(iron.group, Some(8));
        assert_eq!(iron.period, Some(4));
        assert_eq!(iron.block, "d");
        assert_eq!(iron.block_label, "d-block");
        assert_eq!(iron.category, "transition metal");
        assert_eq!(iron.standard_atomic_weight, "55.845(2)");
        assert_eq!(iron.phase, "solid");
        assert_eq!(iron.wiki_url, "https://en.wikipedia.org/wiki/Iron");

        let lanthanum = &records[2];
        assert_eq!(lanthanum.group, None);
        assert_eq!(lanthanum.category, "lanthanide");
    }

    #[test]
    fn element_table_is_found_by_atomic_number_column() {
        let tables = vec![
            table(&["Legend"], &[]),
            table(&["Z[1]", "Sym."], &[&["1", "H"]]),
        ];
        let found = find_element_table(tables).expect("finds a table");
        assert_eq!(found.headers[1], "Sym.");

        let tables = vec![table(&["A"], &[]), table(&["B"], &[])];
        let found = find_element_table(tables).expect("falls back to first table");
        assert_eq!(found.headers[0], "A");

        assert!(matches!(find_element_table(vec![]), Err(TableError::NoTable)));
    }

    #[test]
    fn wiki_urls_use_underscores() {
        assert_eq!(
            wiki_url("ja", "Rare earth"),
            "https://ja.wikipedia.org/wiki/Rare_earth"
        );
    }
}
