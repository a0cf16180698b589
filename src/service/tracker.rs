//! Append-only log of deliberation steps

use chrono::Utc;

use crate::model::{ReasoningStep, ValidationStatus};

/// Records every (question, evidence, answer, validation) step of a session
///
/// Steps are never mutated or removed; re-generating a question appends a
/// new step. Durable storage is a caller concern, the log lives in memory.
#[derive(Debug, Default)]
pub struct ReasoningTracker {
    steps: Vec<ReasoningStep>,
}

impl ReasoningTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one step
    pub fn add_step(
        &mut self,
        question: &str,
        evidence_summary: &str,
        evidence_present: bool,
        source_label: &str,
        generated_answer: &str,
        status: ValidationStatus,
    ) {
        self.steps.push(ReasoningStep {
            question: question.to_string(),
            evidence_summary: evidence_summary.to_string(),
            evidence_present,
            source_label: source_label.to_string(),
            generated_answer: generated_answer.to_string(),
            status,
            recorded_at: Utc::now(),
        });
    }

    pub fn steps(&self) -> &[ReasoningStep] {
        &self.steps
    }

    /// Percentage of steps backed by at least one evidence unit, rounded to
    /// two decimals; 0 on an empty log
    ///
    /// A cheap aggregate proxy, distinct from the auditor's per-claim
    /// verdicts.
    pub fn soundness(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }

        let with_evidence = self.steps.iter().filter(|s| s.evidence_present).count();
        let percent = 100.0 * with_evidence as f64 / self.steps.len() as f64;
        (percent * 100.0).round() / 100.0
    }
}
