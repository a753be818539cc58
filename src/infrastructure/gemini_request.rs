// Request bodies and response decoding for the Gemini generateContent API
use crate::domain::chat::ChatTurn;
use serde::Deserialize;
use serde_json::{Value, json};

const ANALYSIS_INSTRUCTION: &str = "\
You are an electronics vision analyst. Inspect the printed circuit board in the image \
and answer tersely and precisely.

Summary: count components by specific subtype, never by broad family. Write \
\"12x Ceramic Capacitors\" and \"3x Electrolytic Capacitors\" rather than \"15x Capacitors\"; \
\"1x USB-C Port\" rather than \"Connectors\".

Condition: record dust, flux residue, grime, oxidation and debris in visibleFaults, along with \
burns, cracks, corrosion, bent pins and broken traces. Grade the board:
A - like new and clean.
B - good, minor dust or signs of use.
C - visible dirt, grime or component damage.
D - severe damage, heavy corrosion or burns.

Valuation: estimate the scrap value of the visible components only, in INR, never the resale \
value of the whole board. Keep asIsValue below 200 INR. For grades B, C and D keep it below \
150 INR. Only when more than 65 components are clearly visible may the estimate range from \
100 to 250 INR.";

const ANALYSIS_PROMPT: &str = "Analyze this PCB. Count specific component types, check for damage, \
and give a conservative salvage valuation in INR below 200.";

const CHAT_INSTRUCTION: &str = "\
You are the friendly assistant of a PCB salvage app. Greet the user politely, use plain and \
calm language, and reassure them when they ask about damaged hardware. Give useful background \
on components and suggest concrete things they could build or repair. You cannot see the \
uploaded image: if asked to identify a part, ask for its markings or point them to the \
analysis report. Topics: component identification, projects for salvaged parts, repair \
troubleshooting, soldering technique and safety.";

const PROJECTS_INSTRUCTION: &str = "\
You are a creative DIY electronics mentor. From the user's component list suggest 5 to 10 \
practical projects and name any essential parts they would still need to buy.";

const ANALYSIS_TEMPERATURE: f64 = 0.1;

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

/// Response schema mirroring `AnalysisResult`; every key is required.
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Quantified list of specific component subtypes, e.g. '5x 0603 Resistors'."
            },
            "components": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Reference designator or marking, e.g. 'U1'." },
                        "type": { "type": "STRING", "description": "Specific component type." },
                        "function": { "type": "STRING", "description": "Short note on its purpose." },
                        "isCritical": { "type": "BOOLEAN", "description": "Whether this is a critical IC." }
                    },
                    "required": ["name", "type", "function", "isCritical"]
                }
            },
            "pcbCategory": { "type": "STRING", "description": "Likely application of the board." },
            "damageAssessment": {
                "type": "OBJECT",
                "properties": {
                    "detected": { "type": "BOOLEAN" },
                    "visibleFaults": string_array(),
                    "conditionGrade": { "type": "STRING", "enum": ["A", "B", "C", "D"] },
                    "conditionDescription": { "type": "STRING" }
                },
                "required": ["detected", "visibleFaults", "conditionGrade", "conditionDescription"]
            },
            "costAnalysis": {
                "type": "OBJECT",
                "properties": {
                    "componentValueRange": { "type": "STRING", "description": "Value range in INR." },
                    "manufacturingComplexity": { "type": "STRING" },
                    "conditionDepreciation": { "type": "STRING" }
                },
                "required": ["componentValueRange", "manufacturingComplexity", "conditionDepreciation"]
            },
            "finalValuation": {
                "type": "OBJECT",
                "properties": {
                    "asIsValue": { "type": "STRING", "description": "Raw component value in INR." }
                },
                "required": ["asIsValue"]
            },
            "technicalInsights": { "type": "STRING" },
            "suggestions": string_array()
        },
        "required": [
            "summary", "components", "pcbCategory", "damageAssessment",
            "costAnalysis", "finalValuation", "technicalInsights", "suggestions"
        ]
    })
}

pub fn projects_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "projects": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "difficulty": { "type": "STRING", "enum": ["Beginner", "Intermediate", "Advanced"] },
                        "missingComponents": string_array()
                    },
                    "required": ["title", "description", "difficulty", "missingComponents"]
                }
            }
        },
        "required": ["projects"]
    })
}

fn system_instruction(text: &str) -> Value {
    json!({ "parts": [{ "text": text }] })
}

pub fn analysis_request(image_base64: &str, mime_type: &str) -> Value {
    json!({
        "systemInstruction": system_instruction(ANALYSIS_INSTRUCTION),
        "contents": [{
            "role": "user",
            "parts": [
                { "inlineData": { "mimeType": mime_type, "data": image_base64 } },
                { "text": ANALYSIS_PROMPT }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": analysis_schema(),
            "temperature": ANALYSIS_TEMPERATURE
        }
    })
}

pub fn chat_request(prior_turns: &[ChatTurn], message: &str) -> Value {
    let mut contents: Vec<Value> = prior_turns
        .iter()
        .map(|turn| json!({ "role": turn.role.as_str(), "parts": [{ "text": turn.text }] }))
        .collect();
    contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

    json!({
        "systemInstruction": system_instruction(CHAT_INSTRUCTION),
        "contents": contents
    })
}

pub fn projects_request(component_list: &str) -> Value {
    json!({
        "systemInstruction": system_instruction(PROJECTS_INSTRUCTION),
        "contents": [{
            "role": "user",
            "parts": [{
                "text": format!(
                    "I have these components: {}. Suggest 5-10 specific DIY electronics projects.",
                    component_list
                )
            }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": projects_schema()
        }
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate that has any.
    pub fn text(&self) -> Option<String> {
        self.candidates.iter().find_map(|candidate| {
            let text: String = candidate
                .content
                .as_ref()?
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect();
            (!text.trim().is_empty()).then_some(text)
        })
    }
}

/// Strip a surrounding Markdown code fence (```json ... ```), if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
