use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Placeholder for a pulsar without a name in the result set.
pub const MISSING_NAME: &str = "N/A";

/// Column holding the reference epoch used by the latest-epoch policy.
pub const EPOCH_COLUMN: &str = "PEPOCH";

/// One cell of a catalogue row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    /// The column is not part of the result set at all.
    Absent,
    /// The column exists but this row carries no value.
    Masked,
    Value(&'a str),
}

impl<'a> Cell<'a> {
    pub fn text(self) -> Option<&'a str> {
        match self {
            Cell::Value(text) => Some(text),
            Cell::Absent | Cell::Masked => None,
        }
    }

    /// Numeric view; a value that does not parse is treated like a masked one.
    pub fn number(self) -> Option<f64> {
        self.text()
            .and_then(|text| text.parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueRow {
    data: HashMap<String, Option<String>>,
}

impl CatalogueRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by the table parser and by tests; `None` marks a masked value.
    pub fn with(mut self, column: &str, value: Option<&str>) -> Self {
        self.insert(column, value.map(str::to_string));
        self
    }

    pub fn insert(&mut self, column: &str, value: Option<String>) {
        self.data.insert(column.to_ascii_uppercase(), value);
    }

    pub fn get(&self, column: &str) -> Cell<'_> {
        match self.data.get(&column.to_ascii_uppercase()) {
            None => Cell::Absent,
            Some(None) => Cell::Masked,
            Some(Some(value)) => Cell::Value(value),
        }
    }
}

/// Result set of one catalogue query. Every row carries every column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueTable {
    columns: Vec<String>,
    rows: Vec<CatalogueRow>,
}

impl CatalogueTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns
                .into_iter()
                .map(|c| c.to_ascii_uppercase())
                .collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, marking every column the row does not mention as masked.
    pub fn push(&mut self, mut row: CatalogueRow) {
        for column in &self.columns {
            if row.get(column) == Cell::Absent {
                row.insert(column, None);
            }
        }
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.eq_ignore_ascii_case(column))
    }

    pub fn rows(&self) -> &[CatalogueRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<CatalogueRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Request sent to the catalogue: an optional projection and an optional filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogueQuery {
    pub fields: Option<Vec<String>>,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Five rows with the most recent reference epoch
    #[default]
    LatestEpoch,
    /// First ten rows of a short-period query
    ShortPeriod,
}

impl SelectionPolicy {
    pub fn default_limit(self) -> usize {
        match self {
            SelectionPolicy::LatestEpoch => 5,
            SelectionPolicy::ShortPeriod => 10,
        }
    }

    /// Empty means "let the catalogue client pick its full default field set".
    pub fn default_fields(self) -> Vec<String> {
        match self {
            SelectionPolicy::LatestEpoch => Vec::new(),
            SelectionPolicy::ShortPeriod => ["JNAME", "P0", "DM", "RAJ", "DECJ"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }

    pub fn default_condition(self) -> Option<String> {
        match self {
            SelectionPolicy::LatestEpoch => None,
            SelectionPolicy::ShortPeriod => Some("P0 < 0.01".to_string()),
        }
    }

    pub fn default_style(self) -> JsonStyle {
        match self {
            SelectionPolicy::LatestEpoch => JsonStyle::Pretty,
            SelectionPolicy::ShortPeriod => JsonStyle::Compact,
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::LatestEpoch => write!(f, "latest-epoch"),
            SelectionPolicy::ShortPeriod => write!(f, "short-period"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    Pretty,
    Compact,
}

/// Where the JSON document goes. `-` in configuration selects stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(String),
    Stdout,
}

impl OutputTarget {
    pub const DEFAULT_FILE: &'static str = "pulsars.json";

    pub fn parse(value: &str) -> Self {
        if value == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(value.to_string())
        }
    }
}

impl Default for OutputTarget {
    fn default() -> Self {
        OutputTarget::File(Self::DEFAULT_FILE.to_string())
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::File(path) => write!(f, "{}", path),
            OutputTarget::Stdout => write!(f, "<stdout>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestEpochRecord {
    #[serde(rename = "PSRJ")]
    pub psrj: String,
    #[serde(rename = "P0")]
    pub p0: Option<f64>,
    #[serde(rename = "DM")]
    pub dm: Option<f64>,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortPeriodRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub period: Option<f64>,
    pub dispersion: Option<f64>,
    pub position: String,
}

/// Flat record written for the dashboard; the shape follows the selection policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PulsarRecord {
    LatestEpoch(LatestEpochRecord),
    ShortPeriod(ShortPeriodRecord),
}

impl PulsarRecord {
    pub fn name(&self) -> &str {
        match self {
            PulsarRecord::LatestEpoch(record) => &record.psrj,
            PulsarRecord::ShortPeriod(record) => &record.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<PulsarRecord>,
    pub source_rows: usize,
    pub eligible_rows: usize,
}
