use log::warn;

use crate::{
    error::StatError,
    model::{CellValue, ColumnGroup, Record, TableConfig},
};

use super::{
    Align, BodyCell, BodyRow, Column, GroupEdge, HeaderCell, HeaderRow, HeaderRowKind,
    RenderedTable,
    format::{display_text, is_numeric},
};

pub fn render_table(
    records: &[Record],
    config: Option<&TableConfig>,
) -> Result<RenderedTable, StatError> {
    let mut table = RenderedTable::default();
    populate(&mut table, records, config)?;
    Ok(table)
}

/// Replaces whatever `table` held with a rendering of `records`.
///
/// Columns outside every group come first, in the key order of the first
/// record. Grouped columns follow in configuration order under a group
/// header row. Without groups a single header row is produced.
pub fn populate(
    table: &mut RenderedTable,
    records: &[Record],
    config: Option<&TableConfig>,
) -> Result<(), StatError> {
    let first = records.first().ok_or(StatError::EmptyDataset)?;
    table.clear();

    match config.filter(|c| c.is_grouped()) {
        Some(config) => populate_grouped(table, records, first, config),
        None => populate_simple(table, records, first),
    }
    Ok(())
}

fn populate_simple(table: &mut RenderedTable, records: &[Record], first: &Record) {
    let keys: Vec<String> = first.keys().map(str::to_string).collect();

    let cells = keys
        .iter()
        .enumerate()
        .map(|(idx, key)| HeaderCell::column(key.clone(), idx))
        .collect();
    table.header.push(HeaderRow {
        kind: HeaderRowKind::Column,
        cells,
    });
    table.columns = keys
        .iter()
        .map(|key| Column {
            key: key.clone(),
            label: key.clone(),
            group: None,
        })
        .collect();

    for (row_idx, record) in records.iter().enumerate() {
        let cells = keys
            .iter()
            .map(|key| BodyCell {
                text: cell_text(record, row_idx, key),
                align: Align::Center,
                edge: GroupEdge::default(),
            })
            .collect();
        table.body.push(BodyRow {
            source_index: row_idx,
            cells,
            hidden: false,
        });
    }
}

fn populate_grouped(
    table: &mut RenderedTable,
    records: &[Record],
    first: &Record,
    config: &TableConfig,
) {
    let regular: Vec<String> = first
        .keys()
        .filter(|key| !config.is_grouped_column(key))
        .map(str::to_string)
        .collect();
    let groups: Vec<&ColumnGroup> = config
        .column_groups
        .iter()
        .filter(|g| !g.columns.is_empty())
        .collect();

    let mut group_row = Vec::new();
    let mut column_row = Vec::new();
    let mut column_index = 0usize;

    for key in &regular {
        let mut cell = HeaderCell::column(key.clone(), column_index);
        cell.rowspan = 2;
        group_row.push(cell);
        table.columns.push(Column {
            key: key.clone(),
            label: key.clone(),
            group: None,
        });
        column_index += 1;
    }

    for group in &groups {
        let group_edge = GroupEdge {
            start: config.group_borders,
            end: config.group_borders,
        };
        group_row.push(HeaderCell::group(
            group.name.clone(),
            group.columns.len(),
            group_edge,
        ));
        for (i, key) in group.columns.iter().enumerate() {
            let label = group.column_label(key);
            let mut cell = HeaderCell::column(label.clone(), column_index);
            cell.edge = member_edge(config, i, group.columns.len());
            if key.contains(" Stars") {
                cell.align = Some(Align::Right);
            }
            column_row.push(cell);
            table.columns.push(Column {
                key: key.clone(),
                label,
                group: Some(group.name.clone()),
            });
            column_index += 1;
        }
    }

    table.header.push(HeaderRow {
        kind: HeaderRowKind::Group,
        cells: group_row,
    });
    table.header.push(HeaderRow {
        kind: HeaderRowKind::Column,
        cells: column_row,
    });

    for (row_idx, record) in records.iter().enumerate() {
        let mut cells = Vec::with_capacity(column_index);
        for key in &regular {
            let align = match record.get(key) {
                Some(value) if is_numeric(value) => Align::Center,
                _ => Align::Left,
            };
            cells.push(BodyCell {
                text: cell_text(record, row_idx, key),
                align,
                edge: GroupEdge::default(),
            });
        }
        for group in &groups {
            for (i, key) in group.columns.iter().enumerate() {
                let align = if key.contains("Stars") {
                    Align::Right
                } else if record.get(key).is_some_and(is_numeric) {
                    Align::Center
                } else {
                    Align::Left
                };
                cells.push(BodyCell {
                    text: cell_text(record, row_idx, key),
                    align,
                    edge: body_edge(config, i, group.columns.len()),
                });
            }
        }
        table.body.push(BodyRow {
            source_index: row_idx,
            cells,
            hidden: false,
        });
    }
}

fn member_edge(config: &TableConfig, position: usize, len: usize) -> GroupEdge {
    if !config.group_borders {
        return GroupEdge::default();
    }
    GroupEdge {
        start: position == 0,
        end: position + 1 == len,
    }
}

/// Body cells of a one-column group only carry the left border.
fn body_edge(config: &TableConfig, position: usize, len: usize) -> GroupEdge {
    let edge = member_edge(config, position, len);
    GroupEdge {
        start: edge.start,
        end: edge.end && !edge.start,
    }
}

fn cell_text(record: &Record, row_idx: usize, key: &str) -> String {
    match record.get(key) {
        Some(value) => display_text(value),
        None => {
            warn!("record {row_idx} has no column {key:?}; rendering an empty cell");
            display_text(&CellValue::Empty)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records_from_json;
    use serde_json::json;

    fn metrics() -> Vec<Record> {
        records_from_json(&json!([
            {"Player": "ann", "Score": 1200, "Min Rank": 3, "Max Rank": 1, "Avg Stars": 4.5},
            {"Player": "bob", "Score": 999, "Min Rank": 9, "Max Rank": 2, "Avg Stars": 2.25},
            {"Player": "cy", "Score": 45210.5, "Min Rank": 5, "Max Rank": 4, "Avg Stars": 3.0},
        ]))
        .unwrap()
    }

    fn grouped_config() -> TableConfig {
        TableConfig {
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
            group_borders: true,
        }
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let err = render_table(&[], None).unwrap_err();
        assert!(matches!(err, StatError::EmptyDataset));
    }

    #[test]
    fn simple_table_uses_first_record_key_order() {
        let table = render_table(&metrics(), None).unwrap();
        assert_eq!(table.header.len(), 1);
        let labels: Vec<&str> = table.header[0].cells.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Player", "Score", "Min Rank", "Max Rank", "Avg Stars"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 5);
        assert_eq!(table.body[0].text_at(1), "1,200");
        assert!(table.body[0].cells.iter().all(|c| c.align == Align::Center));
    }

    #[test]
    fn grouped_table_puts_regular_columns_first() {
        let records = metrics();
        let table = render_table(&records, Some(&grouped_config())).unwrap();

        assert_eq!(table.row_count(), records.len());
        assert_eq!(table.column_count(), 2 + 3);
        assert_eq!(table.header.len(), 2);

        let group_row = &table.header[0];
        assert_eq!(group_row.kind, HeaderRowKind::Group);
        let group_labels: Vec<(&str, Option<usize>, usize, usize)> = group_row
            .cells
            .iter()
            .map(|c| (c.label.as_str(), c.column_index, c.colspan, c.rowspan))
            .collect();
        assert_eq!(
            group_labels,
            vec![
                ("Player", Some(0), 1, 2),
                ("Score", Some(1), 1, 2),
                ("Ranks", None, 2, 1),
                ("Stars", None, 1, 1),
            ]
        );

        let column_row = &table.header[1];
        let column_labels: Vec<(&str, Option<usize>)> = column_row
            .cells
            .iter()
            .map(|c| (c.label.as_str(), c.column_index))
            .collect();
        assert_eq!(
            column_labels,
            vec![("Min", Some(2)), ("Max", Some(3)), ("Avg", Some(4))]
        );

        let texts: Vec<&str> = table.body[2].cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["cy", "45,210.5", "5", "4", "3"]);
    }

    #[test]
    fn grouped_cells_carry_alignment_and_edges() {
        let table = render_table(&metrics(), Some(&grouped_config())).unwrap();
        let row = &table.body[0];
        assert_eq!(row.cells[0].align, Align::Left);
        assert_eq!(row.cells[1].align, Align::Center);
        assert_eq!(row.cells[2].edge, GroupEdge { start: true, end: false });
        assert_eq!(row.cells[3].edge, GroupEdge { start: false, end: true });
        assert_eq!(row.cells[4].align, Align::Right);
        assert_eq!(row.cells[4].edge, GroupEdge { start: true, end: false });
    }

    #[test]
    fn star_headers_align_with_their_cells() {
        let table = render_table(&metrics(), Some(&grouped_config())).unwrap();
        let column_row = &table.header[1];
        assert_eq!(column_row.cells[0].align, None);
        assert_eq!(column_row.cells[2].label, "Avg");
        assert_eq!(column_row.cells[2].align, Some(Align::Right));
        // a lone group member keeps both header borders
        assert_eq!(column_row.cells[2].edge, GroupEdge { start: true, end: true });
    }

    #[test]
    fn config_without_groups_falls_back_to_simple_layout() {
        let table = render_table(&metrics(), Some(&TableConfig::default())).unwrap();
        assert_eq!(table.header.len(), 1);
        assert_eq!(table.header[0].kind, HeaderRowKind::Column);
    }

    #[test]
    fn missing_grouped_column_renders_empty_cell() {
        let records = records_from_json(&json!([{"Player": "ann", "Min Rank": 1}])).unwrap();
        let table = render_table(&records, Some(&grouped_config())).unwrap();
        assert_eq!(table.column_count(), 4);
        assert_eq!(table.body[0].text_at(2), "");
        assert_eq!(table.body[0].text_at(3), "");
    }

    #[test]
    fn populate_replaces_previous_content() {
        let mut table = render_table(&metrics(), Some(&grouped_config())).unwrap();
        let fresh = records_from_json(&json!([{"Name": "zed"}])).unwrap();

        populate(&mut table, &fresh, None).unwrap();

        assert_eq!(table.header.len(), 1);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.body[0].text_at(0), "zed");
    }
}
