use std::{
    fs::{self, File},
    io::{self, IsTerminal, Read},
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

use anyhow::{Context, Result, bail};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::StatError,
    model::{Record, TableConfig, TableConfigs, WeekendReport, records_from_json},
};

pub enum InputSource {
    File(PathBuf),
    StdinPipe(File),
}

impl InputSource {
    pub fn describe(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::StdinPipe(_) => "<stdin>".to_string(),
        }
    }
}

/// Uses `path` when given, otherwise a piped stdin.
pub fn resolve_input_source(path: Option<&Path>) -> Result<InputSource> {
    if let Some(path) = path {
        Ok(InputSource::File(path.to_path_buf()))
    } else if io::stdin().is_terminal() {
        bail!("no data file given and stdin is a terminal; pass --data or pipe JSON in")
    } else {
        let file = File::open("/dev/stdin").context("opening /dev/stdin")?;
        Ok(InputSource::StdinPipe(file))
    }
}

fn read_path(path: &Path) -> Result<String, StatError> {
    fs::read_to_string(path).map_err(|source| StatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StatError> {
    let text = read_path(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn load_records(source: InputSource) -> Result<Vec<Record>, StatError> {
    let text = match source {
        InputSource::File(path) => read_path(&path)?,
        InputSource::StdinPipe(mut file) => {
            let mut text = String::new();
            file.read_to_string(&mut text)
                .map_err(|source| StatError::Io {
                    path: PathBuf::from("/dev/stdin"),
                    source,
                })?;
            text
        }
    };
    let value: Value = serde_json::from_str(&text)?;
    let records = records_from_json(&value)?;
    if records.is_empty() {
        return Err(StatError::EmptyDataset);
    }
    Ok(records)
}

pub fn load_configs(path: &Path) -> Result<TableConfigs, StatError> {
    read_json(path)
}

pub fn load_report(path: &Path) -> Result<WeekendReport, StatError> {
    read_json(path)
}

/// Looks up the layout for `table_id`. Any failure falls back to the
/// ungrouped layout and is only logged.
pub fn table_config(path: Option<&Path>, table_id: &str) -> Option<TableConfig> {
    let path = path?;
    match load_configs(path) {
        Ok(mut configs) => {
            let config = configs.remove(table_id);
            if config.is_none() {
                info!("no layout for table {table_id:?} in {}", path.display());
            }
            config
        }
        Err(err) => {
            error!("loading table config {}: {err}", path.display());
            None
        }
    }
}

/// Loads records off the UI thread. A failed load is logged and nothing is
/// sent, so the table simply never populates.
pub fn spawn_loader(source: InputSource, tx: mpsc::Sender<Vec<Record>>) {
    thread::spawn(move || {
        let label = source.describe();
        match load_records(source) {
            Ok(records) => {
                info!("loaded {} records from {label}", records.len());
                let _ = tx.send(records);
            }
            Err(err) => error!("loading table data from {label}: {err}"),
        }
    });
}
