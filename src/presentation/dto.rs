// JSON shapes served to the front end
use crate::domain::analysis::AnalysisResult;
use crate::domain::session::AnalysisViewState;
use crate::domain::valuation::{ValueRange, extract_value_range};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisViewDto {
    pub is_loading: bool,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub image_preview: Option<String>,
    /// Parsed from `finalValuation.asIsValue` for charting only
    pub valuation_estimate: Option<ValueRange>,
}

impl From<AnalysisViewState> for AnalysisViewDto {
    fn from(state: AnalysisViewState) -> Self {
        let result = state.result().cloned();
        let valuation_estimate = result
            .as_ref()
            .and_then(|r| extract_value_range(&r.final_valuation.as_is_value));

        Self {
            is_loading: state.is_loading(),
            error: state.error().map(str::to_string),
            image_preview: state.image_preview,
            result,
            valuation_estimate,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsRequest {
    pub components: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
