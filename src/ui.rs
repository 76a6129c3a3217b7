use ratatui::{
    prelude::*,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, InputMode},
    table::{Align, RenderedTable},
};

const MAX_COLUMN_WIDTH: usize = 30;
const COLUMN_SPACING: u16 = 1;

pub fn render(f: &mut Frame, app: &mut App) {
    let full_area = f.size();
    f.render_widget(Clear, full_area);

    let lines = status_lines(app);
    let status_height = (lines.len() as u16).saturating_add(2);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(status_height)])
        .split(full_area);

    if app.is_loaded() {
        render_grid(f, vertical[0], app);
    } else {
        let block = Block::default().title(app.table_id.clone()).borders(Borders::ALL);
        let waiting = Paragraph::new(format!("Loading {}...", app.table_id)).block(block);
        f.render_widget(waiting, vertical[0]);
    }

    if app.show_help {
        render_help(f, full_area);
    } else {
        render_status(f, vertical[1], lines);
    }
}

fn render_grid(f: &mut Frame, area: Rect, app: &mut App) {
    // Two rows of borders and two header lines.
    app.last_grid_height = area.height.saturating_sub(4) as usize;

    let widths = column_widths(&app.table, &app.visible);
    let inner_width = area.width.saturating_sub(4);
    let (start, end) = column_window(&widths, app.selected_column, app.column_offset, inner_width);
    app.column_offset = start;

    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let selected_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let header_cells: Vec<Cell> = header_lines(&app.table)
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(idx, (group, label))| {
            let style = if idx == app.selected_column {
                selected_style
            } else {
                header_style
            };
            Cell::from(Text::from(vec![Line::from(group), Line::from(label)])).style(style)
        })
        .collect();
    let header = Row::new(header_cells).height(2);

    let rows: Vec<Row> = app
        .visible
        .iter()
        .filter_map(|&idx| app.table.body.get(idx))
        .map(|row| {
            let cells: Vec<Cell> = row.cells[start.min(row.cells.len())..end.min(row.cells.len())]
                .iter()
                .map(|cell| Cell::from(Line::from(cell.text.clone()).alignment(alignment(cell.align))))
                .collect();
            Row::new(cells)
        })
        .collect();

    let constraints: Vec<Constraint> = widths[start..end]
        .iter()
        .map(|&w| Constraint::Length(w))
        .collect();

    let title = format!(
        "{} ({} of {} rows)",
        app.table_id,
        app.table.visible_count(),
        app.table.row_count()
    );
    let grid = Table::new(rows, constraints)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▸ ");

    f.render_stateful_widget(grid, area, &mut app.grid_state);
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

/// Two header lines per flattened column: the group name (on the first
/// column of its group only) and the column label with its sort indicator.
pub fn header_lines(table: &RenderedTable) -> Vec<(String, String)> {
    let mut previous_group: Option<&str> = None;
    table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let group = match column.group.as_deref() {
                Some(name) if previous_group != Some(name) => name.to_string(),
                _ => String::new(),
            };
            previous_group = column.group.as_deref();
            let label = table
                .header_cell(idx)
                .map(|cell| cell.display_label())
                .unwrap_or_else(|| column.label.clone());
            (group, label)
        })
        .collect()
}

/// Display width per column from its header lines and visible cells,
/// leaving room for a sort indicator.
pub fn column_widths(table: &RenderedTable, visible: &[usize]) -> Vec<u16> {
    header_lines(table)
        .iter()
        .enumerate()
        .map(|(idx, (group, label))| {
            let header = group.width().max(label.width() + 2);
            let widest_cell = visible
                .iter()
                .filter_map(|&row| table.body.get(row))
                .map(|row| row.text_at(idx).width())
                .max()
                .unwrap_or(0);
            header.max(widest_cell).clamp(1, MAX_COLUMN_WIDTH) as u16
        })
        .collect()
}

/// Picks the half-open range of columns to draw so that `selected` is on
/// screen, starting no later than `offset`.
pub fn column_window(widths: &[u16], selected: usize, offset: usize, available: u16) -> (usize, usize) {
    if widths.is_empty() {
        return (0, 0);
    }
    let selected = selected.min(widths.len() - 1);
    let mut start = offset.min(selected);
    loop {
        let mut used = 0u16;
        let mut end = start;
        while end < widths.len() {
            let needed = widths[end] + if end > start { COLUMN_SPACING } else { 0 };
            if end > start && used.saturating_add(needed) > available {
                break;
            }
            used = used.saturating_add(needed);
            end += 1;
        }
        if selected < end || start >= selected {
            return (start, end.max(start + 1));
        }
        start += 1;
    }
}

fn status_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    match app.input_mode {
        InputMode::FilterInput => {
            lines.push(Line::from(format!("Filter (names, comma separated): {}_", app.filter_buffer)));
        }
        InputMode::Normal if !app.filter_buffer.is_empty() => {
            lines.push(Line::from(format!(
                "Filter: {} ({} shown)",
                app.filter_buffer,
                app.visible.len()
            )));
        }
        InputMode::Normal => lines.push(Line::from("Filter: (none)")),
    }

    let sorted = app.render_state.sorted.and_then(|(column, direction)| {
        app.table
            .columns
            .get(column)
            .map(|c| format!("Sorted by {} {}", c.key, direction.indicator()))
    });
    lines.push(Line::from(
        sorted.unwrap_or_else(|| "Unsorted (press s to sort the highlighted column)".to_string()),
    ));
    lines
}

fn render_status(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let block = Block::default().borders(Borders::ALL);
    let status = Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(status, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    let mut entries = all_shortcuts();
    entries.sort_by(|a, b| a.context.cmp(b.context));
    let mut current_context: Option<&str> = None;
    for sc in entries {
        if current_context != Some(sc.context) {
            if current_context.is_some() {
                lines.push(Line::from(""));
            }
            current_context = Some(sc.context);
            lines.push(Line::styled(
                sc.context,
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:20}", sc.keys),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(sc.description),
        ]));
    }

    let width = (area.width.saturating_sub(10)).min(90).max(50);
    let needed_height = (lines.len() as u16).saturating_add(2);
    let max_allowed = area.height.saturating_sub(2);
    let height = needed_height.min(max_allowed).max(8);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    let block = Block::default().title("Shortcuts").borders(Borders::ALL);
    let help = Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}

#[derive(Clone, Copy)]
struct Shortcut {
    context: &'static str,
    keys: &'static str,
    description: &'static str,
}

fn all_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut {
            context: "Global",
            keys: "q, Ctrl+C",
            description: "Quit",
        },
        Shortcut {
            context: "Global",
            keys: "?",
            description: "Toggle help",
        },
        Shortcut {
            context: "Global",
            keys: "Ctrl+L",
            description: "Force redraw",
        },
        Shortcut {
            context: "Rows",
            keys: "j/k, Up/Down",
            description: "Move selection",
        },
        Shortcut {
            context: "Rows",
            keys: "Ctrl+d / Ctrl+u",
            description: "Half-page down/up",
        },
        Shortcut {
            context: "Rows",
            keys: "g / G",
            description: "Jump to top/bottom",
        },
        Shortcut {
            context: "Columns",
            keys: "h/l, Left/Right",
            description: "Highlight column",
        },
        Shortcut {
            context: "Columns",
            keys: "s, Enter",
            description: "Sort highlighted column (again to reverse)",
        },
        Shortcut {
            context: "Filter",
            keys: "/",
            description: "Edit name filter (comma separated)",
        },
        Shortcut {
            context: "Filter",
            keys: "Enter, Esc",
            description: "Stop editing, keep filter",
        },
        Shortcut {
            context: "Filter",
            keys: "Ctrl+U",
            description: "Clear filter",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ColumnGroup, TableConfig, records_from_json},
        table::{RenderState, render::render_table, sort::sort_by_column},
    };
    use serde_json::json;

    fn grouped_table() -> RenderedTable {
        let records = records_from_json(&json!([
            {"Player": "annabelle", "Min Rank": 3, "Max Rank": 1, "Avg Stars": 4.5},
        ]))
        .unwrap();
        let config = TableConfig {
            column_groups: vec![
                ColumnGroup {
                    name: "Ranks".into(),
                    columns: vec!["Min Rank".into(), "Max Rank".into()],
                    strip_label: Some(" Rank".into()),
                },
                ColumnGroup {
                    name: "Stars".into(),
                    columns: vec!["Avg Stars".into()],
                    strip_label: Some(" Stars".into()),
                },
            ],
            group_borders: false,
        };
        render_table(&records, Some(&config)).unwrap()
    }

    #[test]
    fn header_lines_name_each_group_once() {
        let mut table = grouped_table();
        let mut state = RenderState::default();
        sort_by_column(&mut table, &mut state, 3).unwrap();

        let lines = header_lines(&table);

        assert_eq!(
            lines,
            vec![
                (String::new(), "Player".to_string()),
                ("Ranks".to_string(), "Min".to_string()),
                (String::new(), "Max".to_string()),
                ("Stars".to_string(), "Avg ▲".to_string()),
            ]
        );
    }

    #[test]
    fn widths_cover_headers_and_cells() {
        let table = grouped_table();
        let widths = column_widths(&table, &[0]);
        assert_eq!(widths, vec![9, 5, 5, 5]);
        assert_eq!(column_widths(&table, &[])[0], 8);
    }

    #[test]
    fn column_window_scrolls_to_selection() {
        let widths = [10, 10, 10, 10];
        assert_eq!(column_window(&widths, 0, 0, 21), (0, 2));
        assert_eq!(column_window(&widths, 3, 0, 21), (2, 4));
        assert_eq!(column_window(&widths, 1, 2, 21), (1, 3));
        assert_eq!(column_window(&widths, 0, 0, 5), (0, 1));
        assert_eq!(column_window(&[], 0, 0, 20), (0, 0));
    }
}
