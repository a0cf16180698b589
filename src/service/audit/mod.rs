//! Claim auditor: independent judgment of generated claims
//!
//! The auditor is the system's check against hallucination. It re-judges a
//! (claim, evidence) pair with a stricter instruction than the generator's
//! own heuristic, and every degrade path fails closed: no judge, judge
//! outage and out-of-vocabulary labels all land on `not_validated`.

use std::sync::Arc;

use crate::model::{AuditVerdict, ValidationStatus};
use crate::service::generation::GenerationBackend;

/// Evidence shorter than this carries no auditable substance
const MIN_EVIDENCE_CHARS: usize = 10;

/// Judges claims against retrieved evidence text
pub struct ClaimAuditor {
    generation: Option<Arc<dyn GenerationBackend>>,
}

impl ClaimAuditor {
    pub fn new(generation: Option<Arc<dyn GenerationBackend>>) -> Self {
        Self { generation }
    }

    /// Audit a claim strictly against `evidence_text`
    ///
    /// The verdict label is always one of the three known statuses; any
    /// malformed judge output is coerced to `not_validated`.
    pub async fn audit(&self, claim: &str, evidence_text: &str) -> AuditVerdict {
        if evidence_text.trim().chars().count() < MIN_EVIDENCE_CHARS {
            return AuditVerdict {
                status: ValidationStatus::NotValidated,
                justification:
                    "Insufficient grounding: the evidence text is empty or has no substance"
                        .to_string(),
            };
        }

        let Some(generation) = self.generation.as_ref() else {
            tracing::warn!("No judge backend configured, failing closed");
            return AuditVerdict {
                status: ValidationStatus::NotValidated,
                justification:
                    "Evidence is present but no judge backend is configured; the claim remains unverified"
                        .to_string(),
            };
        };

        match generation.judge_claim(claim, evidence_text).await {
            Ok(raw) => {
                let status = ValidationStatus::parse_lenient(&raw.status);
                if status == ValidationStatus::NotValidated
                    && !raw.status.trim().eq_ignore_ascii_case("not_validated")
                {
                    tracing::warn!(
                        label = %raw.status,
                        "Judge returned an out-of-vocabulary label, coerced to not_validated"
                    );
                }

                tracing::debug!(status = %status, "Claim audited");

                AuditVerdict {
                    status,
                    justification: raw.justification,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Judge call failed, failing closed");
                AuditVerdict {
                    status: ValidationStatus::NotValidated,
                    justification: format!(
                        "Judge service failed ({e}); the claim remains unverified"
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawVerdict;
    use crate::service::generation::GenerationError;
    use async_trait::async_trait;

    struct ScriptedJudge {
        outcome: Result<RawVerdict, ()>,
    }

    impl ScriptedJudge {
        fn returning(status: &str, justification: &str) -> Arc<Self> {
            Arc::new(Self {
                outcome: Ok(RawVerdict {
                    status: status.to_string(),
                    justification: justification.to_string(),
                }),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { outcome: Err(()) })
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedJudge {
        async fn generate_subquestions(
            &self,
            _question: &str,
            _grounding: &str,
            _width: usize,
            _concepts: &[String],
        ) -> Result<Vec<String>, GenerationError> {
            Ok(Vec::new())
        }

        async fn generate_grounded_answer(
            &self,
            _question: &str,
            _grounding: &str,
        ) -> Result<String, GenerationError> {
            Ok(String::new())
        }

        async fn generate_general_answer(
            &self,
            _question: &str,
        ) -> Result<String, GenerationError> {
            Ok(String::new())
        }

        async fn judge_claim(
            &self,
            _claim: &str,
            _evidence: &str,
        ) -> Result<RawVerdict, GenerationError> {
            self.outcome
                .clone()
                .map_err(|_| GenerationError::Backend("judge offline".to_string()))
        }
    }

    const EVIDENCE: &str = "La Ley 24/2015 exige una contribución técnica para patentar software.";

    #[tokio::test]
    async fn empty_evidence_is_insufficient_grounding() {
        let auditor = ClaimAuditor::new(Some(ScriptedJudge::returning("validated", "ok")));
        let verdict = auditor.audit("cualquier afirmación", "").await;

        assert_eq!(verdict.status, ValidationStatus::NotValidated);
        assert!(verdict
            .justification
            .to_lowercase()
            .contains("insufficient grounding"));
    }

    #[tokio::test]
    async fn whitespace_and_short_evidence_are_insufficient() {
        let auditor = ClaimAuditor::new(Some(ScriptedJudge::returning("validated", "ok")));
        for evidence in ["   \n\t  ", "Ley 1."] {
            let verdict = auditor.audit("afirmación", evidence).await;
            assert_eq!(verdict.status, ValidationStatus::NotValidated);
        }
    }

    #[tokio::test]
    async fn no_judge_fails_closed() {
        let auditor = ClaimAuditor::new(None);
        let verdict = auditor.audit("afirmación", EVIDENCE).await;

        assert_eq!(verdict.status, ValidationStatus::NotValidated);
        assert!(verdict.justification.contains("no judge backend"));
    }

    #[tokio::test]
    async fn judge_labels_pass_through() {
        for (label, expected) in [
            ("validated", ValidationStatus::Validated),
            ("partial", ValidationStatus::Partial),
            ("not_validated", ValidationStatus::NotValidated),
        ] {
            let auditor = ClaimAuditor::new(Some(ScriptedJudge::returning(label, "razón")));
            let verdict = auditor.audit("afirmación", EVIDENCE).await;
            assert_eq!(verdict.status, expected, "label {label}");
            assert_eq!(verdict.justification, "razón");
        }
    }

    #[tokio::test]
    async fn out_of_vocabulary_label_is_coerced() {
        let auditor = ClaimAuditor::new(Some(ScriptedJudge::returning(
            "definitely true!!",
            "razón",
        )));
        let verdict = auditor.audit("afirmación", EVIDENCE).await;
        assert_eq!(verdict.status, ValidationStatus::NotValidated);
    }

    #[tokio::test]
    async fn judge_outage_fails_closed() {
        let auditor = ClaimAuditor::new(Some(ScriptedJudge::failing()));
        let verdict = auditor.audit("afirmación", EVIDENCE).await;

        assert_eq!(verdict.status, ValidationStatus::NotValidated);
        assert!(verdict.justification.contains("unverified"));
    }
}
