// Analysis result domain model
use serde::{Deserialize, Serialize};

/// Structured assessment of one board, as returned by the analysis gateway.
///
/// Every field is required on deserialization. Unknown keys are ignored so
/// history written by a newer build still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Vec<String>,
    pub components: Vec<PcbComponent>,
    pub pcb_category: String,
    pub damage_assessment: DamageAssessment,
    pub cost_analysis: CostAnalysis,
    pub final_valuation: FinalValuation,
    pub technical_insights: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcbComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageAssessment {
    pub detected: bool,
    pub visible_faults: Vec<String>,
    pub condition_grade: ConditionGrade,
    pub condition_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionGrade {
    A,
    B,
    C,
    D,
}

impl ConditionGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionGrade::A => "A",
            ConditionGrade::B => "B",
            ConditionGrade::C => "C",
            ConditionGrade::D => "D",
        }
    }
}

/// Monetary fields are free-form display strings ("₹40 - ₹90").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostAnalysis {
    pub component_value_range: String,
    pub manufacturing_complexity: String,
    pub condition_depreciation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalValuation {
    pub as_is_value: String,
}

impl AnalysisResult {
    /// Parse a raw JSON document, rejecting anything that does not match the schema.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn grade(&self) -> ConditionGrade {
        self.damage_assessment.condition_grade
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_RESULT_JSON: &str = r#"{
    "summary": ["12x Ceramic Capacitors", "3x Electrolytic Capacitors", "1x USB-C Port"],
    "components": [
        {"name": "U1", "type": "Microcontroller", "function": "Main controller", "isCritical": true},
        {"name": "C12", "type": "Electrolytic Capacitor", "function": "Bulk decoupling", "isCritical": false}
    ],
    "pcbCategory": "Consumer IoT controller",
    "damageAssessment": {
        "detected": true,
        "visibleFaults": ["Heavy Dust Accumulation", "Flux Residue"],
        "conditionGrade": "B",
        "conditionDescription": "Minor dust, no burn marks."
    },
    "costAnalysis": {
        "componentValueRange": "₹40 - ₹90",
        "manufacturingComplexity": "Two-layer, moderate density",
        "conditionDepreciation": "15% for dust"
    },
    "finalValuation": {"asIsValue": "₹60 - ₹120"},
    "technicalInsights": "ESP32 class module with onboard regulator.",
    "suggestions": ["Clean with isopropyl alcohol", "Salvage the USB-C port"]
}"#;

#[cfg(test)]
pub(crate) fn sample_result() -> AnalysisResult {
    AnalysisResult::from_json(SAMPLE_RESULT_JSON).expect("sample result parses")
}
