use crate::core::projection::{project, render};
use crate::core::selection::select;
use crate::core::{CatalogueSource, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{CatalogueTable, OutputTarget, PulsarRecord, TransformResult};
use crate::utils::error::Result;

/// Query → select top N → project → serialize → persist.
pub struct PulsarPipeline<Q: CatalogueSource, S: Storage, C: ConfigProvider> {
    catalogue: Q,
    storage: S,
    config: C,
}

impl<Q: CatalogueSource, S: Storage, C: ConfigProvider> PulsarPipeline<Q, S, C> {
    pub fn new(catalogue: Q, storage: S, config: C) -> Self {
        Self {
            catalogue,
            storage,
            config,
        }
    }
}

#[async_trait::async_trait]
impl<Q: CatalogueSource, S: Storage, C: ConfigProvider> Pipeline for PulsarPipeline<Q, S, C> {
    async fn extract(&self) -> Result<CatalogueTable> {
        let query = self.config.catalogue_query();
        tracing::info!(
            "🔭 Querying pulsar catalogue (fields: {}, condition: {})",
            query
                .fields
                .as_ref()
                .map(|f| f.join(","))
                .unwrap_or_else(|| "default".to_string()),
            query.condition.as_deref().unwrap_or("none")
        );

        let table = self.catalogue.query(&query).await?;
        tracing::debug!("Catalogue columns: {:?}", table.columns());
        Ok(table)
    }

    async fn transform(&self, table: CatalogueTable) -> Result<TransformResult> {
        let policy = self.config.policy();
        let source_rows = table.len();

        let selection = select(policy, table, self.config.limit());
        let records = selection
            .rows
            .iter()
            .map(|row| project(policy, row))
            .collect::<Vec<_>>();

        tracing::debug!(
            "Policy {}: {} of {} eligible rows kept [{}]",
            policy,
            records.len(),
            selection.eligible,
            kept_names(&records)
        );

        Ok(TransformResult {
            records,
            source_rows,
            eligible_rows: selection.eligible,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let data = render(&result.records, self.config.json_style())?;
        let target = self.config.output();

        let path = match &target {
            OutputTarget::File(path) => path.as_str(),
            OutputTarget::Stdout => "-",
        };
        self.storage.write_file(path, &data).await?;

        tracing::info!("💾 Wrote {} pulsar records to {}", result.records.len(), target);
        Ok(target.to_string())
    }
}

fn kept_names(records: &[PulsarRecord]) -> String {
    records
        .iter()
        .map(PulsarRecord::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CatalogueQuery, CatalogueRow, JsonStyle, SelectionPolicy};
    use crate::utils::error::FeedError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_json(&self, path: &str) -> Option<serde_json::Value> {
            let files = self.files.lock().await;
            files
                .get(path)
                .map(|data| serde_json::from_slice(data).unwrap())
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Stub catalogue that applies `P0 < limit` itself when the query asks for it.
    struct MockCatalogue {
        table: CatalogueTable,
        seen: Arc<Mutex<Vec<CatalogueQuery>>>,
    }

    impl MockCatalogue {
        fn new(table: CatalogueTable) -> Self {
            Self {
                table,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait::async_trait]
    impl CatalogueSource for MockCatalogue {
        async fn query(&self, query: &CatalogueQuery) -> Result<CatalogueTable> {
            self.seen.lock().await.push(query.clone());

            let max_period = query
                .condition
                .as_deref()
                .and_then(|c| c.strip_prefix("P0 < "))
                .and_then(|v| v.parse::<f64>().ok());

            let mut table = CatalogueTable::new(self.table.columns().to_vec());
            for row in self.table.rows() {
                let keep = match max_period {
                    Some(max) => row.get("P0").number().is_some_and(|p| p < max),
                    None => true,
                };
                if keep {
                    table.push(row.clone());
                }
            }
            Ok(table)
        }
    }

    struct FailingCatalogue;

    #[async_trait::async_trait]
    impl CatalogueSource for FailingCatalogue {
        async fn query(&self, _query: &CatalogueQuery) -> Result<CatalogueTable> {
            Err(FeedError::CatalogueStatusError {
                status: 502,
                url: "http://catalogue.test".to_string(),
            })
        }
    }

    struct MockConfig {
        policy: SelectionPolicy,
        output: OutputTarget,
    }

    impl MockConfig {
        fn new(policy: SelectionPolicy) -> Self {
            Self {
                policy,
                output: OutputTarget::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn policy(&self) -> SelectionPolicy {
            self.policy
        }

        fn fields(&self) -> Vec<String> {
            self.policy.default_fields()
        }

        fn condition(&self) -> Option<String> {
            self.policy.default_condition()
        }

        fn limit(&self) -> usize {
            self.policy.default_limit()
        }

        fn output(&self) -> OutputTarget {
            self.output.clone()
        }

        fn json_style(&self) -> JsonStyle {
            self.policy.default_style()
        }
    }

    fn short_period_table(periods: &[&str]) -> CatalogueTable {
        let mut table = CatalogueTable::new(
            ["JNAME", "P0", "DM", "RAJ", "DECJ"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        for (i, period) in periods.iter().enumerate() {
            table.push(
                CatalogueRow::new()
                    .with("JNAME", Some(format!("J{:04}+0000", i).as_str()))
                    .with("P0", Some(*period))
                    .with("DM", Some(format!("{}.5", i).as_str()))
                    .with("RAJ", Some(format!("0{}:00:00", i).as_str()))
                    .with("DECJ", Some("+00:00:00")),
            );
        }
        table
    }

    #[tokio::test]
    async fn test_short_period_three_rows_verbatim() {
        let table = short_period_table(&["0.001", "0.002", "0.003"]);
        let storage = MockStorage::new();
        let pipeline = PulsarPipeline::new(
            MockCatalogue::new(table),
            storage.clone(),
            MockConfig::new(SelectionPolicy::ShortPeriod),
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "pulsars.json");
        let json = storage.get_json("pulsars.json").await.unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "Pulsar", "name": "J0000+0000", "period": 0.001, "dispersion": 0.5, "position": "00:00:00 +00:00:00"},
                {"type": "Pulsar", "name": "J0001+0000", "period": 0.002, "dispersion": 1.5, "position": "01:00:00 +00:00:00"},
                {"type": "Pulsar", "name": "J0002+0000", "period": 0.003, "dispersion": 2.5, "position": "02:00:00 +00:00:00"}
            ])
        );
    }

    #[tokio::test]
    async fn test_kept_names_follow_selection_order() {
        let pipeline = PulsarPipeline::new(
            MockCatalogue::new(short_period_table(&["0.001", "0.002"])),
            MockStorage::new(),
            MockConfig::new(SelectionPolicy::ShortPeriod),
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();

        assert_eq!(kept_names(&result.records), "J0000+0000, J0001+0000");
        assert_eq!(kept_names(&[]), "");
    }

    #[tokio::test]
    async fn test_short_period_honours_condition_and_limit() {
        let mut periods = vec!["0.5", "1.2"];
        periods.extend(std::iter::repeat("0.004").take(14));
        let catalogue = MockCatalogue::new(short_period_table(&periods));
        let seen = catalogue.seen.clone();
        let pipeline = PulsarPipeline::new(
            catalogue,
            MockStorage::new(),
            MockConfig::new(SelectionPolicy::ShortPeriod),
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();

        assert_eq!(result.source_rows, 14);
        assert_eq!(result.records.len(), 10);
        for record in &result.records {
            let value = serde_json::to_value(record).unwrap();
            assert!(value["period"].as_f64().unwrap() < 0.01);
        }

        let queries = seen.lock().await;
        assert_eq!(queries[0].condition.as_deref(), Some("P0 < 0.01"));
        assert_eq!(
            queries[0].fields.as_deref().unwrap(),
            ["JNAME", "P0", "DM", "RAJ", "DECJ"]
        );
    }

    #[tokio::test]
    async fn test_latest_epoch_without_name_column_uses_placeholder() {
        let mut table = CatalogueTable::new(vec!["P0".to_string(), "PEPOCH".to_string()]);
        for epoch in ["55000", "56000", "57000"] {
            table.push(
                CatalogueRow::new()
                    .with("P0", Some("0.5"))
                    .with("PEPOCH", Some(epoch)),
            );
        }
        let pipeline = PulsarPipeline::new(
            MockCatalogue::new(table),
            MockStorage::new(),
            MockConfig::new(SelectionPolicy::LatestEpoch),
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();

        assert_eq!(result.records.len(), 3);
        assert!(result.records.iter().all(|r| r.name() == "N/A"));
    }

    #[tokio::test]
    async fn test_latest_epoch_round_trip_field_names() {
        let mut table = CatalogueTable::new(
            ["PSRJ", "P0", "DM", "PEPOCH"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        for (i, epoch) in ["5", "3", "*", "7", "1", "6", "2"].iter().enumerate() {
            let epoch = (*epoch != "*").then_some(*epoch);
            table.push(
                CatalogueRow::new()
                    .with("PSRJ", Some(format!("J{}", i).as_str()))
                    .with("P0", Some("0.1"))
                    .with("DM", None)
                    .with("PEPOCH", epoch),
            );
        }
        let storage = MockStorage::new();
        let pipeline = PulsarPipeline::new(
            MockCatalogue::new(table),
            storage.clone(),
            MockConfig::new(SelectionPolicy::LatestEpoch),
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();
        assert_eq!(result.eligible_rows, 6);
        pipeline.load(result).await.unwrap();

        let json = storage.get_json("pulsars.json").await.unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 5);

        let times: Vec<&str> = records.iter().map(|r| r["time"].as_str().unwrap()).collect();
        assert_eq!(times, vec!["7", "6", "5", "3", "2"]);

        for record in records {
            let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
            let mut keys: Vec<&str> = keys.into_iter().map(String::as_str).collect();
            keys.sort();
            assert_eq!(keys, vec!["DM", "P0", "PSRJ", "time"]);
            assert!(record["DM"].is_null());
        }
    }

    #[tokio::test]
    async fn test_load_to_stdout_target() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(SelectionPolicy::ShortPeriod);
        config.output = OutputTarget::Stdout;
        let pipeline = PulsarPipeline::new(
            MockCatalogue::new(short_period_table(&["0.001"])),
            storage.clone(),
            config,
        );

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, "<stdout>");
        assert!(storage.get_json("-").await.is_some());
    }

    #[tokio::test]
    async fn test_extract_failure_propagates() {
        let pipeline = PulsarPipeline::new(
            FailingCatalogue,
            MockStorage::new(),
            MockConfig::new(SelectionPolicy::LatestEpoch),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(
            err,
            FeedError::CatalogueStatusError { status: 502, .. }
        ));
    }
}
