use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::table::DirectionPolicy;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render and browse sports statistics tables")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a statistics table to HTML
    Render(RenderArgs),

    /// Render the weekend summary and podium to HTML
    Summary(SummaryArgs),

    /// Browse a statistics table interactively
    View(ViewArgs),
}

#[derive(clap::Args, Debug)]
pub struct TableArgs {
    /// JSON array of records (defaults to piped stdin)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Table identifier, also used to look up its column groups
    #[arg(short, long, default_value = "stats-table")]
    pub table_id: String,

    /// Table layout file keyed by table id
    #[arg(short, long, env = "STATBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Share one sort-direction toggle across all columns
    #[arg(long)]
    pub shared_direction: bool,
}

impl TableArgs {
    pub fn policy(&self) -> DirectionPolicy {
        if self.shared_direction {
            DirectionPolicy::Shared
        } else {
            DirectionPolicy::PerColumn
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// URL the page fetches the data from (defaults to the data path)
    #[arg(long)]
    pub data_url: Option<String>,

    /// Sort by this flattened column index; repeat to sort again
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sorts: Vec<usize>,

    /// Comma-separated names matched against the first column
    #[arg(long)]
    pub filter: Option<String>,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Weekend report JSON
    #[arg(short, long)]
    pub report: PathBuf,

    /// Write HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub table: TableArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_accepts_repeated_sorts() {
        let args = Args::try_parse_from([
            "statboard", "render", "--data", "m.json", "--table-id", "metrics", "--sort", "2",
            "--sort", "2", "--filter", "ann,bob",
        ])
        .unwrap();
        let Command::Render(render) = args.command else {
            panic!("expected render");
        };
        assert_eq!(render.sorts, vec![2, 2]);
        assert_eq!(render.table.table_id, "metrics");
        assert_eq!(render.filter.as_deref(), Some("ann,bob"));
        assert_eq!(render.table.policy(), DirectionPolicy::PerColumn);
    }

    #[test]
    fn view_shared_direction_flag() {
        let args =
            Args::try_parse_from(["statboard", "view", "--data", "m.json", "--shared-direction"])
                .unwrap();
        let Command::View(view) = args.command else {
            panic!("expected view");
        };
        assert_eq!(view.table.policy(), DirectionPolicy::Shared);
        assert_eq!(view.table.table_id, "stats-table");
    }
}
