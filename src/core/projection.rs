use crate::domain::model::{
    CatalogueRow, JsonStyle, LatestEpochRecord, PulsarRecord, SelectionPolicy, ShortPeriodRecord,
    EPOCH_COLUMN, MISSING_NAME,
};
use crate::utils::error::Result;

pub fn project(policy: SelectionPolicy, row: &CatalogueRow) -> PulsarRecord {
    match policy {
        SelectionPolicy::LatestEpoch => PulsarRecord::LatestEpoch(LatestEpochRecord {
            psrj: row.get("PSRJ").text().unwrap_or(MISSING_NAME).to_string(),
            p0: row.get("P0").number(),
            dm: row.get("DM").number(),
            time: row.get(EPOCH_COLUMN).text().unwrap_or_default().to_string(),
        }),
        SelectionPolicy::ShortPeriod => PulsarRecord::ShortPeriod(ShortPeriodRecord {
            kind: "Pulsar".to_string(),
            name: row.get("JNAME").text().unwrap_or(MISSING_NAME).to_string(),
            period: row.get("P0").number(),
            dispersion: row.get("DM").number(),
            position: format!(
                "{} {}",
                row.get("RAJ").text().unwrap_or(MISSING_NAME),
                row.get("DECJ").text().unwrap_or(MISSING_NAME)
            ),
        }),
    }
}

pub fn render(records: &[PulsarRecord], style: JsonStyle) -> Result<Vec<u8>> {
    let bytes = match style {
        JsonStyle::Pretty => serde_json::to_vec_pretty(records)?,
        JsonStyle::Compact => serde_json::to_vec(records)?,
    };
    Ok(bytes)
}
