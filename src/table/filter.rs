use log::debug;

use super::{RenderState, RenderedTable};

/// Splits filter text on commas into trimmed, lower-cased, non-empty fragments.
pub fn parse_fragments(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn row_matches(first_cell: &str, fragments: &[String]) -> bool {
    if fragments.is_empty() {
        return true;
    }
    let hay = first_cell.to_lowercase();
    fragments.iter().any(|f| hay.contains(f.as_str()))
}

/// Hides every row whose first column matches none of the fragments in
/// `text`. Rows are only flagged, never removed. Returns the visible count.
pub fn apply_filter(table: &mut RenderedTable, state: &mut RenderState, text: &str) -> usize {
    let fragments = parse_fragments(text);
    let mut visible = 0usize;
    for row in &mut table.body {
        row.hidden = !row_matches(row.text_at(0), &fragments);
        if !row.hidden {
            visible += 1;
        }
    }
    state.filter_text = text.to_string();
    debug!(
        "filter {:?} leaves {visible} of {} rows",
        text,
        table.row_count()
    );
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::records_from_json,
        table::{render::render_table, sort::sort_by_column},
    };
    use serde_json::json;

    fn table() -> RenderedTable {
        let records = records_from_json(&json!([
            {"Player": "Alice", "Score": 10},
            {"Player": "Bob", "Score": 20},
            {"Player": "Cyd", "Score": 30},
            {"Player": "Dana", "Score": 40},
        ]))
        .unwrap();
        render_table(&records, None).unwrap()
    }

    fn visible_names(table: &RenderedTable) -> Vec<&str> {
        table
            .body
            .iter()
            .filter(|r| !r.hidden)
            .map(|r| r.text_at(0))
            .collect()
    }

    #[test]
    fn fragments_are_trimmed_lowercased_and_non_empty() {
        assert_eq!(parse_fragments(" Ann, ,BOB ,"), vec!["ann", "bob"]);
        assert!(parse_fragments("").is_empty());
        assert!(parse_fragments(" , ").is_empty());
    }

    #[test]
    fn comma_separated_fragments_match_any() {
        let mut table = table();
        let mut state = RenderState::default();

        let visible = apply_filter(&mut table, &mut state, "a, b");

        assert_eq!(visible, 3);
        assert_eq!(visible_names(&table), vec!["Alice", "Bob", "Dana"]);
        assert_eq!(state.filter_text, "a, b");
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn empty_filter_shows_every_row() {
        let mut table = table();
        let mut state = RenderState::default();
        apply_filter(&mut table, &mut state, "cyd");
        assert_eq!(visible_names(&table), vec!["Cyd"]);

        let visible = apply_filter(&mut table, &mut state, "");

        assert_eq!(visible, 4);
        assert_eq!(table.visible_count(), 4);
    }

    #[test]
    fn only_first_column_is_matched() {
        let mut table = table();
        let mut state = RenderState::default();
        assert_eq!(apply_filter(&mut table, &mut state, "20"), 0);
    }

    #[test]
    fn sorting_after_filter_keeps_hidden_flags() {
        let mut table = table();
        let mut state = RenderState::default();
        apply_filter(&mut table, &mut state, "bob,dana");

        sort_by_column(&mut table, &mut state, 1).unwrap();
        sort_by_column(&mut table, &mut state, 1).unwrap();

        assert_eq!(visible_names(&table), vec!["Dana", "Bob"]);
        assert_eq!(table.row_count(), 4);
    }
}
