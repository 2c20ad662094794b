use crate::domain::model::{CatalogueRow, CatalogueTable, SelectionPolicy, EPOCH_COLUMN};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct Selection {
    pub rows: Vec<CatalogueRow>,
    /// Rows that passed filtering, before truncation to the limit.
    pub eligible: usize,
}

pub fn select(policy: SelectionPolicy, table: CatalogueTable, limit: usize) -> Selection {
    match policy {
        SelectionPolicy::LatestEpoch => select_latest_epoch(table, limit),
        SelectionPolicy::ShortPeriod => select_first(table, limit),
    }
}

/// Drops rows without an epoch and keeps the `limit` most recent ones.
///
/// `sort_by` is stable, so rows sharing an epoch keep their catalogue order.
/// Without an epoch column the result set is taken as-is.
pub fn select_latest_epoch(table: CatalogueTable, limit: usize) -> Selection {
    if !table.has_column(EPOCH_COLUMN) {
        tracing::debug!("No {} column in result set, keeping catalogue order", EPOCH_COLUMN);
        return select_first(table, limit);
    }

    let mut dated: Vec<(f64, CatalogueRow)> = table
        .into_rows()
        .into_iter()
        .filter_map(|row| row.get(EPOCH_COLUMN).number().map(|epoch| (epoch, row)))
        .collect();

    dated.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let eligible = dated.len();
    let rows = dated
        .into_iter()
        .take(limit)
        .map(|(_, row)| row)
        .collect();

    Selection { rows, eligible }
}

/// The catalogue already applied the filter; keep the first `limit` rows.
pub fn select_first(table: CatalogueTable, limit: usize) -> Selection {
    let eligible = table.len();
    let rows = table.into_rows().into_iter().take(limit).collect();
    Selection { rows, eligible }
}
