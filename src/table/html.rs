use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{Align, BodyCell, GroupEdge, HeaderCell, HeaderRowKind, RenderedTable};

fn align_class(align: Align) -> &'static str {
    match align {
        Align::Left => "text-left pl-4",
        Align::Center => "text-center",
        Align::Right => "text-right pr-4",
    }
}

fn push_edge_classes(classes: &mut Vec<&'static str>, edge: GroupEdge) {
    if edge.start && edge.end {
        classes.push("border-x-2 border-black");
    } else if edge.start {
        classes.push("border-l-2 border-black");
    } else if edge.end {
        classes.push("border-r-2 border-black");
    }
}

fn class_attr(classes: &[&str]) -> String {
    if classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", classes.join(" "))
    }
}

fn header_cell_html(cell: &HeaderCell) -> String {
    let mut classes = Vec::new();
    push_edge_classes(&mut classes, cell.edge);
    if let Some(align) = cell.align {
        classes.push(align_class(align));
    }
    let mut attrs = String::new();
    if cell.rowspan > 1 {
        attrs.push_str(&format!(" rowspan=\"{}\"", cell.rowspan));
    }
    if cell.colspan > 1 {
        attrs.push_str(&format!(" colspan=\"{}\"", cell.colspan));
    }
    if let Some(idx) = cell.column_index {
        classes.push("sortable");
        attrs.push_str(&format!(" data-col-index=\"{idx}\""));
    }
    format!(
        "<th{}{}>{}</th>",
        attrs,
        class_attr(&classes),
        encode_text(&cell.display_label())
    )
}

fn body_cell_html(cell: &BodyCell) -> String {
    let mut classes = vec![align_class(cell.align)];
    push_edge_classes(&mut classes, cell.edge);
    format!("<td{}>{}</td>", class_attr(&classes), encode_text(&cell.text))
}

/// Writes the table element, carrying its id and data source so the page
/// can re-populate it. An unpopulated table yields an empty shell.
pub fn table_html(table: &RenderedTable, table_id: &str, data_url: Option<&str>) -> String {
    let mut out = format!("<table id=\"{}\"", encode_double_quoted_attribute(table_id));
    if let Some(url) = data_url {
        out.push_str(&format!(
            " data-json-url=\"{}\"",
            encode_double_quoted_attribute(url)
        ));
    }
    out.push_str(">\n  <thead>\n");

    let grouped = table.header.len() > 1;
    for row in &table.header {
        let row_class = match (grouped, row.kind) {
            (false, _) => "",
            (true, HeaderRowKind::Group) => " class=\"group-header\"",
            (true, HeaderRowKind::Column) => " class=\"column-header\"",
        };
        out.push_str(&format!("    <tr{row_class}>\n"));
        for cell in &row.cells {
            out.push_str("      ");
            out.push_str(&header_cell_html(cell));
            out.push('\n');
        }
        out.push_str("    </tr>\n");
    }
    out.push_str("  </thead>\n  <tbody>\n");

    for row in &table.body {
        if row.hidden {
            out.push_str("    <tr style=\"display: none\">\n");
        } else {
            out.push_str("    <tr>\n");
        }
        for cell in &row.cells {
            out.push_str("      ");
            out.push_str(&body_cell_html(cell));
            out.push('\n');
        }
        out.push_str("    </tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ColumnGroup, TableConfig, records_from_json},
        table::{RenderState, filter::apply_filter, render::render_table, sort::sort_by_column},
    };
    use serde_json::json;

    #[test]
    fn empty_table_renders_shell() {
        let html = table_html(&RenderedTable::default(), "metrics", Some("metrics.json"));
        assert_eq!(
            html,
            "<table id=\"metrics\" data-json-url=\"metrics.json\">\n  <thead>\n  </thead>\n  <tbody>\n  </tbody>\n</table>\n"
        );
    }

    #[test]
    fn simple_table_markup() {
        let records = records_from_json(&json!([{"Player": "<ann>", "Score": 1500}])).unwrap();
        let table = render_table(&records, None).unwrap();

        let html = table_html(&table, "t", None);

        assert!(html.starts_with("<table id=\"t\">"));
        assert!(html.contains("<th data-col-index=\"0\" class=\"sortable\">Player</th>"));
        assert!(html.contains("<td class=\"text-center\">&lt;ann&gt;</td>"));
        assert!(html.contains("<td class=\"text-center\">1,500</td>"));
        assert!(!html.contains("group-header"));
    }

    #[test]
    fn grouped_markup_has_spans_borders_and_indicator() {
        let records = records_from_json(&json!([
            {"Player": "ann", "Min Rank": 3, "Max Rank": 1},
            {"Player": "bob", "Min Rank": 1, "Max Rank": 2},
        ]))
        .unwrap();
        let config = TableConfig {
            column_groups: vec![ColumnGroup {
                name: "Ranks".into(),
                columns: vec!["Min Rank".into(), "Max Rank".into()],
                strip_label: Some(" Rank".into()),
            }],
            group_borders: true,
        };
        let mut table = render_table(&records, Some(&config)).unwrap();
        let mut state = RenderState::default();
        sort_by_column(&mut table, &mut state, 1).unwrap();
        apply_filter(&mut table, &mut state, "ann");

        let html = table_html(&table, "ranks", None);

        assert!(html.contains("<tr class=\"group-header\">"));
        assert!(html.contains("<tr class=\"column-header\">"));
        assert!(html.contains(" rowspan=\"2\" data-col-index=\"0\" class=\"sortable\">Player</th>"));
        assert!(html.contains("<th colspan=\"2\" class=\"border-x-2 border-black\">Ranks</th>"));
        assert!(html.contains(
            "<th data-col-index=\"1\" class=\"border-l-2 border-black sortable\">Min ▲</th>"
        ));
        assert!(html.contains("<td class=\"text-center border-r-2 border-black\">1</td>"));
        assert_eq!(html.matches("<tr style=\"display: none\">").count(), 1);
    }

    #[test]
    fn lone_star_column_markup() {
        let records = records_from_json(&json!([{"Player": "ann", "Avg Stars": 4.5}])).unwrap();
        let config = TableConfig {
            column_groups: vec![ColumnGroup {
                name: "Stars".into(),
                columns: vec!["Avg Stars".into()],
                strip_label: Some(" Stars".into()),
            }],
            group_borders: true,
        };
        let table = render_table(&records, Some(&config)).unwrap();

        let html = table_html(&table, "stars", None);

        assert!(html.contains(
            "<th data-col-index=\"1\" class=\"border-x-2 border-black text-right pr-4 sortable\">Avg</th>"
        ));
        assert!(html.contains("<td class=\"text-right pr-4 border-l-2 border-black\">4.5</td>"));
    }
}
