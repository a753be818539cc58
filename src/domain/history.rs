// History domain model
use super::analysis::AnalysisResult;
use serde::{Deserialize, Serialize};

/// Maximum number of past analyses retained.
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: i64,
    pub result: AnalysisResult,
    /// Full data URI, enough to render a thumbnail offline.
    pub image_data: String,
}

impl HistoryItem {
    pub fn new(timestamp: i64, result: AnalysisResult, image_data: String) -> Self {
        Self {
            id: timestamp.to_string(),
            timestamp,
            result,
            image_data,
        }
    }
}

/// Prepend `item` and drop everything past [`HISTORY_CAPACITY`].
pub fn prepend_bounded(items: &[HistoryItem], item: HistoryItem) -> Vec<HistoryItem> {
    let retained = items
        .iter()
        .filter(|existing| existing.id != item.id)
        .take(HISTORY_CAPACITY - 1)
        .cloned();

    std::iter::once(item.clone()).chain(retained).collect()
}
