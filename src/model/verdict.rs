//! Audit verdicts

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::step::ValidationStatus;

/// Independent judgment of a (claim, evidence) pair
///
/// Stateless output of the claim auditor; persisting it is the caller's or
/// the tracker's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditVerdict {
    pub status: ValidationStatus,
    pub justification: String,
}

/// Raw structured output of the judge model, before label coercion
///
/// `status` stays a free string here on purpose: the auditor parses it
/// leniently and coerces anything out of vocabulary to `not_validated`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawVerdict {
    /// One of: validated | partial | not_validated
    pub status: String,
    /// Direct, factual justification for the label
    pub justification: String,
}
