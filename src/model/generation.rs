//! Structured-output schemas for the generation backend

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Decomposition output: a flat list of sub-question strings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubquestionList {
    pub questions: Vec<String>,
}

/// Grounded (or fallback) answer output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GroundedAnswer {
    pub answer: String,
}
