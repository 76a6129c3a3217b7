use std::cmp::Ordering;

use log::debug;

use crate::error::StatError;

use super::{
    RenderState, RenderedTable,
    format::{sort_number, strip_separators},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// How the direction of the next sort is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionPolicy {
    /// A newly sorted column starts ascending; re-sorting it toggles.
    #[default]
    PerColumn,
    /// One toggle shared by every column of the table.
    Shared,
}

impl RenderState {
    pub fn next_direction(&self, column: usize) -> SortDirection {
        match (self.policy, self.sorted) {
            (_, None) => SortDirection::Ascending,
            (DirectionPolicy::Shared, Some((_, last))) => last.flipped(),
            (DirectionPolicy::PerColumn, Some((col, last))) if col == column => last.flipped(),
            (DirectionPolicy::PerColumn, Some(_)) => SortDirection::Ascending,
        }
    }
}

/// Reorders the body rows (hidden ones included) by the text of `column`.
///
/// Cells that both read as numbers once separators are stripped compare
/// numerically; anything else compares as text. The sort is stable.
pub fn sort_by_column(
    table: &mut RenderedTable,
    state: &mut RenderState,
    column: usize,
) -> Result<SortDirection, StatError> {
    let count = table.column_count();
    if column >= count {
        return Err(StatError::ColumnOutOfRange {
            index: column,
            count,
        });
    }

    let direction = state.next_direction(column);
    table.body.sort_by(|a, b| {
        let ord = compare_cells(a.text_at(column), b.text_at(column));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    state.sorted = Some((column, direction));
    update_indicators(table, column, direction);
    debug!("sorted column {column} {direction:?}");
    Ok(direction)
}

pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (sort_number(a), sort_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => strip_separators(a).cmp(&strip_separators(b)),
    }
}

fn update_indicators(table: &mut RenderedTable, column: usize, direction: SortDirection) {
    for cell in table.header_cells_mut() {
        cell.indicator = match cell.column_index {
            Some(idx) if idx == column => Some(direction),
            _ => None,
        };
    }
}
