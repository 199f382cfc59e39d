//! Periodic table grid placement.
//!
//! Maps each element onto the 18 column by 9 row periodic table, then onto a
//! pixel rectangle within a fixed canvas. Rows 1 through 7 are the periods;
//! rows 8 and 9 hold the lanthanides and actinides, pushed down by an extra
//! gap so the f-block reads as separate from the main table.
//!
//! Placement is decided by an ordered list of rules, the first matching rule
//! wins. The f-block rules are keyed on atomic number and come before the
//! group/period rule, so an f-block record that also carries a group and
//! period is still placed in its f-block row. Those records are reported back
//! as overridden rather than silently absorbed.

use crate::elements::ElementRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

pub const COLUMNS: u32 = 18;
pub const ROWS: u32 = 9;

/// The first row below the main table; it and every row after it get the gap.
pub const F_BLOCK_FIRST_ROW: u32 = 8;
pub const LANTHANIDE_ROW: u32 = 8;
pub const ACTINIDE_ROW: u32 = 9;

pub const LANTHANIDES: RangeInclusive<u32> = 57..=71;
pub const ACTINIDES: RangeInclusive<u32> = 89..=103;

/// Column of the first lanthanide / actinide in the f-block rows.
const F_BLOCK_START_COLUMN: u32 = 4;

/// A 1-indexed `(row, column)` coordinate in the periodic table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GridPosition {
    pub row: u32,
    pub column: u32,
}

impl GridPosition {
    pub fn new(row: u32, column: u32) -> GridPosition {
        GridPosition { row, column }
    }

    pub fn is_f_block_row(&self) -> bool {
        self.row >= F_BLOCK_FIRST_ROW
    }
}

/// A guard and the position it yields when the guard matches.
pub struct PlacementRule {
    pub name: &'static str,
    pub applies: fn(&ElementRecord) -> bool,
    pub position: fn(&ElementRecord) -> GridPosition,
}

/// Placement rules in priority order.
pub const PLACEMENT_RULES: &[PlacementRule] = &[
    PlacementRule {
        name: "lanthanide",
        applies: |e| LANTHANIDES.contains(&e.atomic_number),
        position: |e| {
            GridPosition::new(
                LANTHANIDE_ROW,
                F_BLOCK_START_COLUMN + (e.atomic_number - LANTHANIDES.start()),
            )
        },
    },
    PlacementRule {
        name: "actinide",
        applies: |e| ACTINIDES.contains(&e.atomic_number),
        position: |e| {
            GridPosition::new(
                ACTINIDE_ROW,
                F_BLOCK_START_COLUMN + (e.atomic_number - ACTINIDES.start()),
            )
        },
    },
    PlacementRule {
        name: "group-period",
        applies: |e| group_period(e).is_some(),
        position: |e| {
            let (group, period) = group_period(e).unwrap_or_default();
            GridPosition::new(period, group)
        },
    },
];

/// The `(group, period)` pair if the record carries a usable one.
///
/// Zero counts as absent for both values, matching how the source data marks
/// blank cells.
fn group_period(element: &ElementRecord) -> Option<(u32, u32)> {
    match (element.group, element.period) {
        (Some(group), Some(period)) if (1..=COLUMNS).contains(&group) && period > 0 => {
            Some((group, period))
        }
        _ => None,
    }
}

/// Find the first rule that places `element`.
pub fn matching_rule(element: &ElementRecord) -> Option<&'static PlacementRule> {
    PLACEMENT_RULES.iter().find(|rule| (rule.applies)(element))
}

/// The grid coordinate of `element`, or `None` if it can't be placed.
pub fn grid_position(element: &ElementRecord) -> Option<GridPosition> {
    matching_rule(element).map(|rule| (rule.position)(element))
}

/// Whether an f-block rule won over a group/period the record also carried.
fn is_overridden(element: &ElementRecord) -> bool {
    let f_block =
        LANTHANIDES.contains(&element.atomic_number) || ACTINIDES.contains(&element.atomic_number);
    f_block && group_period(element).is_some()
}

/// Index elements by grid coordinate. Later elements replace earlier ones
/// that land on the same coordinate.
pub fn grid_map(elements: &[ElementRecord]) -> BTreeMap<GridPosition, &ElementRecord> {
    let mut grid = BTreeMap::new();
    for element in elements {
        if let Some(position) = grid_position(element) {
            grid.insert(position, element);
        }
    }
    grid
}

/// A placed element: a pixel rectangle on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub atomic_number: u32,
    pub symbol: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The result of a placement run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// One cell per placeable element, in input order
    pub cells: Vec<Cell>,
    /// Atomic numbers placed by an f-block rule despite carrying a group and period
    pub overridden: Vec<u32>,
    /// Atomic numbers no rule could place
    pub unplaceable: Vec<u32>,
}

/// Canvas and margin constants for grid placement, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Fraction of a cell height inserted above the f-block rows
    pub gap_factor: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout {
            canvas_width: 2560.0,
            canvas_height: 1600.0,
            margin_left: 160.0,
            margin_right: 160.0,
            margin_top: 200.0,
            margin_bottom: 200.0,
            gap_factor: 0.5,
        }
    }
}

impl GridLayout {
    pub fn cell_width(&self) -> f64 {
        (self.canvas_width - self.margin_left - self.margin_right) / COLUMNS as f64
    }

    pub fn cell_height(&self) -> f64 {
        (self.canvas_height - self.margin_top - self.margin_bottom) / ROWS as f64
    }

    /// Vertical space inserted above the f-block rows.
    pub fn gap(&self) -> f64 {
        self.cell_height() * self.gap_factor
    }

    /// Top-left corner of the cell at `position`.
    pub fn origin(&self, position: GridPosition) -> (f64, f64) {
        let x = self.margin_left + (position.column as f64 - 1.0) * self.cell_width();
        let mut y = self.margin_top + (position.row as f64 - 1.0) * self.cell_height();
        if position.is_f_block_row() {
            y += self.gap();
        }
        (x, y)
    }

    /// Place every placeable element, preserving input order.
    pub fn place(&self, elements: &[ElementRecord]) -> Placement {
        let width = self.cell_width();
        let height = self.cell_height();
        let mut placement = Placement::default();

        for element in elements {
            let Some(rule) = matching_rule(element) else {
                log::debug!(
                    "Element {} ({}) has no grid position, skipping",
                    element.atomic_number,
                    element.symbol
                );
                placement.unplaceable.push(element.atomic_number);
                continue;
            };

            if is_overridden(element) {
                log::warn!(
                    "Element {} ({}) placed by {} rule, ignoring group {:?} / period {:?}",
                    element.atomic_number,
                    element.symbol,
                    rule.name,
                    element.group,
                    element.period
                );
                placement.overridden.push(element.atomic_number);
            }

            let (x, y) = self.origin((rule.position)(element));
            placement.cells.push(Cell {
                atomic_number: element.atomic_number,
                symbol: element.symbol.clone(),
                x,
                y,
                width,
                height,
            });
        }

        placement
    }
}
