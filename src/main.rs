use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::mpsc,
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};

mod app;
mod args;
mod error;
mod loader;
mod model;
mod page;
mod summary;
mod table;
mod ui;

use args::{Args, Command, RenderArgs, SummaryArgs, ViewArgs};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match args.command {
        Command::Render(render) => run_render(render),
        Command::Summary(summary) => run_summary(summary),
        Command::View(view) => run_view(view),
    }
}

fn write_output(path: Option<&Path>, html: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, html).with_context(|| format!("writing {}", path.display())),
        None => io::stdout()
            .write_all(html.as_bytes())
            .context("writing to stdout"),
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = loader::table_config(args.table.config.as_deref(), &args.table.table_id);
    let source = loader::resolve_input_source(args.table.data.as_deref())?;
    let html = page::table_page(&args, source, config.as_ref());
    write_output(args.output.as_deref(), &html)
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let html = page::summary_page(&args.report);
    write_output(args.output.as_deref(), &html)
}

fn run_view(args: ViewArgs) -> Result<()> {
    let config = loader::table_config(args.table.config.as_deref(), &args.table.table_id);
    let source = loader::resolve_input_source(args.table.data.as_deref())?;

    let (tx, rx) = mpsc::channel();
    loader::spawn_loader(source, tx);

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let mut app = app::App::new(args.table.table_id.clone(), config, args.table.policy());
    let res = app::run_app(&mut terminal, &mut app, rx);

    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leaving alternate screen")?;
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("error: {err:?}");
    }

    Ok(())
}
