//! Reasoning steps and validation statuses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claim-level verdict describing evidentiary support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Fully and directly supported by cited evidence
    Validated,
    /// Defensible inference from the evidence, but not explicit in it
    Partial,
    /// Unsupported, contradicted, or lacking evidence altogether
    NotValidated,
}

impl ValidationStatus {
    /// Parse a judge-produced label, coercing anything outside the three
    /// known labels to `NotValidated` (fail closed)
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "validated" | "validada" => Self::Validated,
            "partial" | "parcial" => Self::Partial,
            "not_validated" | "no validada" | "no_validada" => Self::NotValidated,
            _ => Self::NotValidated,
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Validated => "validated",
            Self::Partial => "partial",
            Self::NotValidated => "not_validated",
        };
        f.write_str(label)
    }
}

/// One recorded deliberation step: a question, the evidence seen, the
/// generated claim, and its validation status
///
/// Owned by the reasoning tracker; never mutated after insertion. A
/// re-generation of the same question appends a new step.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReasoningStep {
    pub question: String,
    /// Grounding text the generation saw, summarized; empty when ungrounded
    pub evidence_summary: String,
    /// Whether any evidence was retrieved for this step
    pub evidence_present: bool,
    pub source_label: String,
    pub generated_answer: String,
    pub status: ValidationStatus,
    pub recorded_at: DateTime<Utc>,
}
