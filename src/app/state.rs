use log::{debug, error};
use ratatui::widgets::TableState as GridState;

use crate::{
    model::{Record, TableConfig},
    table::{
        DirectionPolicy, RenderState, RenderedTable, filter::apply_filter, render::populate,
        sort::sort_by_column,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    FilterInput,
}

pub struct App {
    pub table_id: String,
    pub config: Option<TableConfig>,
    pub table: RenderedTable,
    pub render_state: RenderState,
    /// Positions in `table.body` of the rows not hidden by the filter.
    pub visible: Vec<usize>,
    pub grid_state: GridState,
    pub selected_column: usize,
    pub column_offset: usize,
    pub last_grid_height: usize,
    pub input_mode: InputMode,
    pub filter_buffer: String,
    pub show_help: bool,
    pub force_redraw: bool,
}

impl App {
    pub fn new(table_id: String, config: Option<TableConfig>, policy: DirectionPolicy) -> Self {
        Self {
            table_id,
            config,
            table: RenderedTable::default(),
            render_state: RenderState::new(policy),
            visible: Vec::new(),
            grid_state: GridState::default(),
            selected_column: 0,
            column_offset: 0,
            last_grid_height: 0,
            input_mode: InputMode::Normal,
            filter_buffer: String::new(),
            show_help: false,
            force_redraw: true,
        }
    }

    /// Renders freshly loaded records, replacing any previous table. The
    /// filter typed so far is re-applied to the new rows.
    pub fn ingest(&mut self, records: Vec<Record>) {
        if let Err(err) = populate(&mut self.table, &records, self.config.as_ref()) {
            error!("rendering table {}: {err}", self.table_id);
            return;
        }
        self.render_state.reset();
        self.selected_column = 0;
        self.column_offset = 0;
        let filter = self.filter_buffer.clone();
        apply_filter(&mut self.table, &mut self.render_state, &filter);
        self.grid_state.select(None);
        self.rebuild_visible(None);
        self.force_redraw = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_populated()
    }

    pub fn next(&mut self) {
        self.move_selection(1);
    }

    pub fn previous(&mut self) {
        self.move_selection(-1);
    }

    pub fn page_down(&mut self) {
        let half = (self.last_grid_height.max(1) / 2).max(1) as isize;
        self.move_selection(half);
    }

    pub fn page_up(&mut self) {
        let half = (self.last_grid_height.max(1) / 2).max(1) as isize;
        self.move_selection(-half);
    }

    pub fn select_first(&mut self) {
        if self.visible.is_empty() {
            self.grid_state.select(None);
        } else {
            self.grid_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if self.visible.is_empty() {
            self.grid_state.select(None);
        } else {
            self.grid_state.select(Some(self.visible.len() - 1));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let current = self.grid_state.selected().unwrap_or(0) as isize;
        let new_idx = (current + delta).clamp(0, len - 1) as usize;
        self.grid_state.select(Some(new_idx));
    }

    pub fn column_right(&mut self) {
        let count = self.table.column_count();
        if count == 0 {
            return;
        }
        self.selected_column = (self.selected_column + 1).min(count - 1);
    }

    pub fn column_left(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
    }

    /// Source position of the selected row, if any.
    pub fn selected_source(&self) -> Option<usize> {
        let idx = self.grid_state.selected()?;
        let body_idx = *self.visible.get(idx)?;
        self.table.body.get(body_idx).map(|row| row.source_index)
    }

    pub fn sort_selected_column(&mut self) {
        if !self.is_loaded() {
            return;
        }
        let keep = self.selected_source();
        match sort_by_column(&mut self.table, &mut self.render_state, self.selected_column) {
            Ok(direction) => {
                debug!("{}: column {} {direction:?}", self.table_id, self.selected_column);
                self.rebuild_visible(keep);
            }
            Err(err) => error!("sorting table {}: {err}", self.table_id),
        }
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_buffer.push(c);
        self.refilter();
    }

    pub fn pop_filter_char(&mut self) {
        if self.filter_buffer.pop().is_some() {
            self.refilter();
        }
    }

    pub fn clear_filter(&mut self) {
        if !self.filter_buffer.is_empty() {
            self.filter_buffer.clear();
            self.refilter();
        }
    }

    fn refilter(&mut self) {
        let keep = self.selected_source();
        let filter = self.filter_buffer.clone();
        apply_filter(&mut self.table, &mut self.render_state, &filter);
        self.rebuild_visible(keep);
    }

    /// Recomputes the visible rows, keeping the row that came from `keep`
    /// selected when it is still shown, else selecting the first row.
    fn rebuild_visible(&mut self, keep: Option<usize>) {
        self.visible = self
            .table
            .body
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.hidden)
            .map(|(idx, _)| idx)
            .collect();

        if self.visible.is_empty() {
            self.grid_state.select(None);
            return;
        }
        let kept = keep.and_then(|source| {
            self.visible
                .iter()
                .position(|&idx| self.table.body[idx].source_index == source)
        });
        self.grid_state.select(Some(kept.unwrap_or(0)));
    }
}
