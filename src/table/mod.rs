//! Rendered table model shared by the HTML writer and the terminal viewer.
//!
//! A [`RenderedTable`] is built once from records by [`render::render_table`]
//! and then mutated in place by [`sort::sort_by_column`] and
//! [`filter::apply_filter`]. The per-table [`RenderState`] travels alongside
//! it; nothing about sorting or filtering lives in global state.

pub mod filter;
pub mod format;
pub mod html;
pub mod render;
pub mod sort;

pub use sort::{DirectionPolicy, SortDirection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Marks a cell as the first and/or last column of a bordered group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GroupEdge {
    pub start: bool,
    pub end: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderRowKind {
    /// Super-header row holding group names and rowspan-2 regular headers.
    Group,
    Column,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderCell {
    pub label: String,
    /// Flattened column index; `None` for group cells, which are not sortable.
    pub column_index: Option<usize>,
    pub colspan: usize,
    pub rowspan: usize,
    pub edge: GroupEdge,
    /// Explicit text alignment; headers are centered when unset.
    pub align: Option<Align>,
    pub indicator: Option<SortDirection>,
}

impl HeaderCell {
    pub fn column(label: String, column_index: usize) -> Self {
        Self {
            label,
            column_index: Some(column_index),
            colspan: 1,
            rowspan: 1,
            edge: GroupEdge::default(),
            align: None,
            indicator: None,
        }
    }

    pub fn group(label: String, colspan: usize, edge: GroupEdge) -> Self {
        Self {
            label,
            column_index: None,
            colspan,
            rowspan: 1,
            edge,
            align: None,
            indicator: None,
        }
    }

    pub fn display_label(&self) -> String {
        match self.indicator {
            Some(dir) => format!("{} {}", self.label, dir.indicator()),
            None => self.label.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeaderRow {
    pub kind: HeaderRowKind,
    pub cells: Vec<HeaderCell>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BodyCell {
    pub text: String,
    pub align: Align,
    pub edge: GroupEdge,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BodyRow {
    /// Position of the source record in the loaded dataset.
    pub source_index: usize,
    pub cells: Vec<BodyCell>,
    pub hidden: bool,
}

impl BodyRow {
    pub fn text_at(&self, column: usize) -> &str {
        self.cells.get(column).map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// One flattened column, in display order.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub group: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedTable {
    pub header: Vec<HeaderRow>,
    pub body: Vec<BodyRow>,
    pub columns: Vec<Column>,
}

impl RenderedTable {
    pub fn clear(&mut self) {
        self.header.clear();
        self.body.clear();
        self.columns.clear();
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.body.len()
    }

    pub fn visible_count(&self) -> usize {
        self.body.iter().filter(|r| !r.hidden).count()
    }

    pub fn is_populated(&self) -> bool {
        !self.header.is_empty()
    }

    pub fn header_cells_mut(&mut self) -> impl Iterator<Item = &mut HeaderCell> {
        self.header.iter_mut().flat_map(|row| row.cells.iter_mut())
    }

    pub fn header_cell(&self, column: usize) -> Option<&HeaderCell> {
        self.header
            .iter()
            .flat_map(|row| row.cells.iter())
            .find(|cell| cell.column_index == Some(column))
    }
}

/// Transient per-table state: current sort and filter text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    pub policy: DirectionPolicy,
    pub sorted: Option<(usize, SortDirection)>,
    pub filter_text: String,
}

impl RenderState {
    pub fn new(policy: DirectionPolicy) -> Self {
        Self {
            policy,
            sorted: None,
            filter_text: String::new(),
        }
    }

    pub fn reset(&mut self) {
        self.sorted = None;
        self.filter_text.clear();
    }
}
