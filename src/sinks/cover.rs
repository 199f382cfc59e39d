//! Cover art: the periodic table grid with the title arched over it.
//!
//! The grid is laid out on its own canvas by [`GridLayout`] and embedded as a
//! nested `<svg>` scaled to the cover width. The title and subtitle follow
//! two concentric arcs from [`make_arc_path`].

use crate::config::CoverConfig;
use crate::elements::ElementRecord;
use crate::fonts::{font_family_value, font_stack, FontProbe};
use crate::layout::{format_coord, make_arc_path, Cell};
use crate::localization::Strings;
use anyhow::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::collections::HashMap;

const BACKGROUND: &str = "#0f172a";
const TEXT: &str = "#f8fafc";
const CELL_TEXT: &str = "#0f172a";
const CELL_STROKE: &str = "#1e293b";

/// Fill colour per display category.
pub const CATEGORY_COLOURS: &[(&str, &str)] = &[
    ("alkali metal", "#f87171"),
    ("alkaline earth metal", "#fb923c"),
    ("transition metal", "#facc15"),
    ("lanthanide", "#f472b6"),
    ("actinide", "#c084fc"),
    ("lanthanide/actinide", "#e879f9"),
    ("metalloid", "#34d399"),
    ("nonmetal", "#60a5fa"),
    ("halogen", "#22d3ee"),
    ("noble gas", "#a78bfa"),
    ("s-block element", "#fca5a5"),
    ("p-block element", "#86efac"),
];

/// Colour for cells whose category isn't listed.
pub const UNKNOWN_COLOUR: &str = "#cbd5e1";

pub fn category_colour(category: &str) -> &'static str {
    let category = category.trim().to_lowercase();
    CATEGORY_COLOURS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, colour)| *colour)
        .unwrap_or(UNKNOWN_COLOUR)
}

fn render_cell(svg: &mut String, cell: &Cell, category: &str) {
    let inset = cell.width.min(cell.height) * 0.04;
    let number_size = cell.height * 0.22;
    let symbol_size = cell.height * 0.42;

    svg.push_str(&format!(
        r#"    <g id="cell-{z}">
      <rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{rx}" fill="{fill}" stroke="{CELL_STROKE}"/>
      <text x="{nx}" y="{ny}" font-size="{number_size}" fill="{CELL_TEXT}">{z}</text>
      <text x="{sx}" y="{sy}" font-size="{symbol_size}" font-weight="bold" fill="{CELL_TEXT}" text-anchor="middle">{symbol}</text>
    </g>
"#,
        z = cell.atomic_number,
        x = format_coord(cell.x + inset),
        y = format_coord(cell.y + inset),
        w = format_coord(cell.width - 2.0 * inset),
        h = format_coord(cell.height - 2.0 * inset),
        rx = format_coord(inset * 2.0),
        fill = category_colour(category),
        nx = format_coord(cell.x + inset * 3.0),
        ny = format_coord(cell.y + inset + number_size),
        number_size = format_coord(number_size),
        sx = format_coord(cell.x + cell.width / 2.0),
        sy = format_coord(cell.y + cell.height * 0.78),
        symbol_size = format_coord(symbol_size),
        symbol = encode_text(&cell.symbol),
    ));
}

/// Render the cover SVG.
pub fn render_svg(
    config: &CoverConfig,
    strings: &Strings,
    elements: &[ElementRecord],
    fonts: &[String],
) -> String {
    let layout = &config.layout;
    let placement = layout.place(elements);
    let categories: HashMap<u32, &str> = elements
        .iter()
        .map(|element| (element.atomic_number, element.category.as_str()))
        .collect();

    let title_arc = make_arc_path(&config.title_arc);
    let subtitle_arc = make_arc_path(&config.subtitle_arc);
    let font_family = font_family_value(fonts);
    let table_height = if layout.canvas_width > 0.0 {
        config.width * layout.canvas_height / layout.canvas_width
    } else {
        0.0
    };

    let mut cells = String::new();
    for cell in &placement.cells {
        let category = categories.get(&cell.atomic_number).copied().unwrap_or("");
        render_cell(&mut cells, cell, category);
    }

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
  <title>{alt}</title>
  <defs>
    <path id="title-arc" d="{title_d}"/>
    <path id="subtitle-arc" d="{subtitle_d}"/>
  </defs>
  <rect x="0" y="0" width="{width}" height="{height}" fill="{BACKGROUND}"/>
  <g font-family="{font_family}" fill="{TEXT}" text-anchor="middle">
    <text font-size="{title_size}" font-weight="bold"><textPath href="#title-arc" xlink:href="#title-arc" startOffset="50%">{title}</textPath></text>
    <text font-size="{subtitle_size}"><textPath href="#subtitle-arc" xlink:href="#subtitle-arc" startOffset="50%">{subtitle}</textPath></text>
  </g>
  <svg x="0" y="{table_top}" width="{width}" height="{table_height}" viewBox="0 0 {canvas_width} {canvas_height}" font-family="{font_family}">
{cells}  </svg>
</svg>
"##,
        width = format_coord(config.width),
        height = format_coord(config.height),
        alt = encode_text(&strings.cover_image_alt),
        title_d = title_arc.d,
        subtitle_d = subtitle_arc.d,
        font_family = encode_double_quoted_attribute(&font_family),
        title_size = format_coord(config.title_font_size),
        subtitle_size = format_coord(config.subtitle_font_size),
        title = encode_text(&strings.cover_arc_title),
        subtitle = encode_text(&strings.cover_arc_subtitle),
        table_top = format_coord(config.table_top),
        table_height = format_coord(table_height),
        canvas_width = format_coord(layout.canvas_width),
        canvas_height = format_coord(layout.canvas_height),
        cells = cells,
    )
}

/// Render the cover and write it to the configured output file.
pub fn write_cover<P: FontProbe + ?Sized>(
    config: &CoverConfig,
    strings: &Strings,
    elements: &[ElementRecord],
    probe: &P,
) -> Result<()> {
    let fonts = font_stack(&config.fonts, probe);
    log::debug!("Cover font stack: {}", fonts.join(", "));
    let svg = render_svg(config, strings, elements, &fonts);

    if let Some(parent) = config.outfile.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(&config.outfile, svg)
        .with_context(|| format!("Failed to write cover to {}", config.outfile.display()))?;
    log::info!("Wrote cover to {}", config.outfile.display());
    Ok(())
}
