// Project idea domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdea {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Parts the user did not list but would need to buy.
    pub missing_components: Vec<String>,
}
