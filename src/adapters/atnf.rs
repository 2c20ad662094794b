//! Client for the ATNF pulsar catalogue (`psrcat`) web query form.
//!
//! The form answers with an HTML page whose `<pre>` block holds a plain-text
//! table: a `#` header line naming the columns, a units line, dashed rules and
//! one line per pulsar starting with its 1-based index. `*` marks a missing value.

use crate::domain::model::{CatalogueQuery, CatalogueRow, CatalogueTable};
use crate::domain::ports::CatalogueSource;
use crate::utils::error::{FeedError, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str =
    "https://www.atnf.csiro.au/research/pulsar/psrcat/proc_form.php";
pub const DEFAULT_VERSION: &str = "2.6.1";

/// Requested when the query carries no projection.
pub const DEFAULT_FIELDS: &[&str] = &["PSRJ", "JNAME", "RAJ", "DECJ", "P0", "P1", "DM", "PEPOCH"];

const NO_VALUE: &str = "*";

pub struct AtnfCatalogue {
    client: Client,
    endpoint: String,
    version: String,
}

impl AtnfCatalogue {
    pub fn new(endpoint: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            version: version.into(),
        }
    }

    pub fn with_timeout(
        endpoint: impl Into<String>,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            version: version.into(),
        })
    }

    /// Full form URL for `query`; also used by dry runs.
    pub fn query_url(&self, query: &CatalogueQuery) -> Result<Url> {
        let mut url = Url::parse(&self.endpoint)?;

        let fields: Vec<String> = match &query.fields {
            Some(fields) => fields.clone(),
            None => DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("version", &self.version);
            for field in &fields {
                pairs.append_pair(field, field);
            }
            pairs
                .append_pair("startUserDefined", "true")
                .append_pair("c1_val", "")
                .append_pair("c2_val", "")
                .append_pair("c3_val", "")
                .append_pair("c4_val", "");
            if let Some(condition) = &query.condition {
                pairs.append_pair("condition", condition);
            }
            pairs
                .append_pair("sort_attr", "jname")
                .append_pair("sort_order", "asc")
                .append_pair("ephemeris", "short")
                .append_pair("coords_unit", "raj/decj")
                .append_pair("radius", "")
                .append_pair("coords_1", "")
                .append_pair("coords_2", "")
                .append_pair("style", "Short without errors")
                .append_pair("no_value", NO_VALUE)
                .append_pair("fsize", "3")
                .append_pair("x_axis", "")
                .append_pair("x_scale", "linear")
                .append_pair("y_axis", "")
                .append_pair("y_scale", "linear")
                .append_pair("state", "query")
                .append_pair("table_bottom.x", "30")
                .append_pair("table_bottom.y", "22");
        }

        Ok(url)
    }
}

#[async_trait]
impl CatalogueSource for AtnfCatalogue {
    async fn query(&self, query: &CatalogueQuery) -> Result<CatalogueTable> {
        let url = self.query_url(query)?;

        tracing::debug!("Making catalogue request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("Catalogue response status: {}", response.status());

        if !response.status().is_success() {
            return Err(FeedError::CatalogueStatusError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

fn pre_block_regex() -> &'static Regex {
    static PRE: OnceLock<Regex> = OnceLock::new();
    PRE.get_or_init(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").expect("valid regex"))
}

/// Parses a psrcat answer page into a table.
pub fn parse_response(body: &str) -> Result<CatalogueTable> {
    let block = pre_block_regex()
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| FeedError::malformed(format!("no table in response: {}", excerpt(body))))?;

    parse_table(block)
}

pub fn parse_table(block: &str) -> Result<CatalogueTable> {
    let mut table: Option<CatalogueTable> = None;

    for (line_no, line) in block.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed.strip_prefix('#') {
            if table.is_some() {
                continue;
            }
            let columns: Vec<String> = header.split_whitespace().map(str::to_string).collect();
            if columns.is_empty() {
                return Err(FeedError::malformed("header line names no columns"));
            }
            table = Some(CatalogueTable::new(columns));
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        let is_data_line = tokens
            .next()
            .is_some_and(|first| first.parse::<usize>().is_ok());
        if !is_data_line {
            continue;
        }

        let Some(table) = table.as_mut() else {
            return Err(FeedError::malformed(format!(
                "data on line {} before the header",
                line_no + 1
            )));
        };

        let values: Vec<&str> = tokens.collect();
        if values.len() != table.columns().len() {
            return Err(FeedError::malformed(format!(
                "line {} has {} values for {} columns",
                line_no + 1,
                values.len(),
                table.columns().len()
            )));
        }

        let mut row = CatalogueRow::new();
        for (column, value) in table.columns().iter().zip(values) {
            let value = (value != NO_VALUE).then(|| value.to_string());
            row.insert(column, value);
        }
        table.push(row);
    }

    table.ok_or_else(|| FeedError::malformed("table has no header line"))
}

fn excerpt(body: &str) -> String {
    let text = body.split_whitespace().collect::<Vec<_>>().join(" ");
    text.chars().take(120).collect()
}
