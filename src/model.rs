use std::collections::HashMap;

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

use crate::error::StatError;

/// Display value of a single record field.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    fn from_json(index: usize, column: &str, value: &Value) -> Result<Self, StatError> {
        match value {
            Value::Number(n) => Ok(n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Empty)),
            Value::String(s) => Ok(CellValue::Text(s.clone())),
            Value::Bool(b) => Ok(CellValue::Text(b.to_string())),
            Value::Null => Ok(CellValue::Empty),
            Value::Array(_) | Value::Object(_) => Err(StatError::NestedValue {
                index,
                column: column.to_string(),
            }),
        }
    }
}

/// One flat data row. Field order follows the source object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn from_json(index: usize, value: &Value) -> Result<Self, StatError> {
        let obj = value
            .as_object()
            .ok_or(StatError::RecordNotObject { index })?;
        let fields = obj
            .iter()
            .map(|(key, v)| Ok((key.clone(), CellValue::from_json(index, key, v)?)))
            .collect::<Result<Vec<_>, StatError>>()?;
        Ok(Self { fields })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }
}

/// Parses a JSON array of flat objects into records.
pub fn records_from_json(value: &Value) -> Result<Vec<Record>, StatError> {
    let arr = value.as_array().ok_or(StatError::NotAnArray)?;
    arr.iter()
        .enumerate()
        .map(|(idx, v)| Record::from_json(idx, v))
        .collect()
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ColumnGroup {
    pub name: String,
    pub columns: Vec<String>,
    /// Removed from member column labels in the column header row.
    #[serde(default)]
    pub strip_label: Option<String>,
}

impl ColumnGroup {
    pub fn column_label(&self, column: &str) -> String {
        match &self.strip_label {
            Some(fragment) if !fragment.is_empty() => column.replacen(fragment.as_str(), "", 1),
            _ => column.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TableConfig {
    #[serde(default)]
    pub column_groups: Vec<ColumnGroup>,
    #[serde(default)]
    pub group_borders: bool,
}

impl TableConfig {
    pub fn is_grouped(&self) -> bool {
        !self.column_groups.is_empty()
    }

    pub fn is_grouped_column(&self, column: &str) -> bool {
        self.column_groups
            .iter()
            .any(|g| g.columns.iter().any(|c| c == column))
    }
}

/// Table layouts keyed by table id, as read from the configuration file.
pub type TableConfigs = HashMap<String, TableConfig>;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TopPlayer {
    pub player_tag: String,
    pub recent_score: f64,
    pub weekend_rank: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct WeekendReport {
    #[serde(default)]
    pub weekend_date: Option<String>,
    pub team_score_recent: f64,
    #[serde(deserialize_with = "rank_text")]
    pub team_score_recent_rank: String,
    #[serde(default)]
    pub team_score_previous: Option<f64>,
    #[serde(default, deserialize_with = "optional_rank_text")]
    pub team_score_previous_rank: Option<String>,
    pub team_score_max: f64,
    #[serde(deserialize_with = "rank_text")]
    pub team_score_max_rank: String,
    #[serde(default)]
    pub percent_change_previous: Option<f64>,
    #[serde(default)]
    pub top_three_players: Vec<TopPlayer>,
}

/// Ranks are usually labels like `"#2"`, but reports may also carry a bare
/// number such as `0` when no rank was recorded.
fn rank_from_value(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(format!("expected a rank label or number, found {other}")),
    }
}

fn rank_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    rank_from_value(Value::deserialize(deserializer)?)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("rank is required"))
}

fn optional_rank_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    rank_from_value(Value::deserialize(deserializer)?).map_err(D::Error::custom)
}
