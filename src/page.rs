//! HTML fragments written by the `render` and `summary` commands.
//!
//! A fragment is always produced: when its data cannot be loaded the failure
//! is logged and an empty container takes its place, so one bad input never
//! blanks the rest of the page.

use std::path::Path;

use log::{error, warn};

use crate::{
    args::RenderArgs,
    loader::{self, InputSource},
    model::TableConfig,
    summary,
    table::{
        RenderState, RenderedTable, filter::apply_filter, html::table_html, render::render_table,
        sort::sort_by_column,
    },
};

pub const EMPTY_REPORT: &str = "<div id=\"summary\">\n</div>\n<div id=\"top-players\">\n</div>\n";

/// Loads, renders, sorts and filters one table, falling back to the empty
/// table shell when the data cannot be loaded.
pub fn table_page(args: &RenderArgs, source: InputSource, config: Option<&TableConfig>) -> String {
    let table_id = &args.table.table_id;
    let data_url = args
        .data_url
        .clone()
        .or_else(|| args.table.data.as_ref().map(|p| p.display().to_string()));

    let described = source.describe();
    let table = match loader::load_records(source).and_then(|records| render_table(&records, config)) {
        Ok(mut table) => {
            let mut state = RenderState::new(args.table.policy());
            for &column in &args.sorts {
                if let Err(err) = sort_by_column(&mut table, &mut state, column) {
                    warn!("{table_id}: skipping sort: {err}");
                }
            }
            if let Some(filter) = &args.filter {
                apply_filter(&mut table, &mut state, filter);
            }
            table
        }
        Err(err) => {
            error!("rendering table {table_id} from {described}: {err}");
            RenderedTable::default()
        }
    };

    table_html(&table, table_id, data_url.as_deref())
}

/// Summary and podium markup for a report file, or the empty containers
/// when it cannot be read.
pub fn summary_page(report: &Path) -> String {
    match loader::load_report(report) {
        Ok(report) => summary::report_html(&report),
        Err(err) => {
            error!("loading weekend report {}: {err}", report.display());
            EMPTY_REPORT.to_string()
        }
    }
}
