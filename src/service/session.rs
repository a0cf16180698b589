//! Deliberation sessions and the end-to-end orchestrator
//!
//! A [`Session`] is an explicit context value owned by the caller and
//! threaded through the orchestrator; the core holds no ambient session
//! state. The orchestrator runs the full per-tree flow an external
//! dashboard would trigger node by node: expand, generate context, audit,
//! record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::model::{
    AuditVerdict, EvidenceUnit, ExpansionStatus, InquiryTree, NodeId, QuestionNode, ReasoningStep,
    ValidationStatus,
};
use crate::service::audit::ClaimAuditor;
use crate::service::context::{ContextGenerator, NodeContext};
use crate::service::inquiry::InquiryEngine;
use crate::service::tracker::ReasoningTracker;

/// Per-caller deliberation state: the reasoning log and the last tree
#[derive(Default)]
pub struct Session {
    pub tracker: ReasoningTracker,
    pub tree: Option<InquiryTree>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A question node annotated with its generated context and audit verdict
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnnotatedNode {
    pub id: NodeId,
    pub question: String,
    pub depth: usize,
    pub expansion: ExpansionStatus,
    pub answer: String,
    pub source_label: String,
    pub evidence: Vec<EvidenceUnit>,
    /// Cheap heuristic status computed from the retrieved excerpts
    pub preliminary_status: ValidationStatus,
    /// Authoritative verdict from the claim auditor
    pub audit: AuditVerdict,
    pub children: Vec<AnnotatedNode>,
}

/// Result of one full deliberation run
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliberationReport {
    pub root: AnnotatedNode,
    /// Percentage of steps backed by evidence, over the whole session log
    pub soundness: f64,
    /// Steps recorded by this run
    pub steps_recorded: usize,
    /// The reasoning steps this run appended to the session log
    pub trace: Vec<ReasoningStep>,
}

/// Runs the deliberation pipeline over a session
pub struct DeliberationService {
    engine: InquiryEngine,
    generator: ContextGenerator,
    auditor: ClaimAuditor,
}

impl DeliberationService {
    pub fn new(
        engine: InquiryEngine,
        generator: ContextGenerator,
        auditor: ClaimAuditor,
    ) -> Self {
        Self {
            engine,
            generator,
            auditor,
        }
    }

    /// Expand, ground, audit and record a whole tree for `question`
    ///
    /// Per-node ordering is retrieval, then generation, then audit, so the
    /// auditor always judges against the same evidence snapshot the
    /// generator saw.
    pub async fn deliberate(
        &self,
        session: &mut Session,
        question: &str,
        max_depth: usize,
        max_width: usize,
    ) -> DeliberationReport {
        let start_time = std::time::Instant::now();
        let steps_before = session.tracker.steps().len();

        let tree = self
            .engine
            .generate_with_limits(question, max_depth, max_width)
            .await;

        // Preorder walk: contexts and verdicts per structural path
        let mut paths = Vec::new();
        collect_paths(&tree.root, Vec::new(), &mut paths);

        let mut annotations: HashMap<Vec<usize>, (NodeContext, AuditVerdict)> = HashMap::new();
        for path in &paths {
            let node = node_at(&tree.root, path);
            let context = self.generator.generate(&node.question).await;
            let verdict = self
                .auditor
                .audit(&context.answer, &context.grounding)
                .await;

            session.tracker.add_step(
                &context.question,
                &context.grounding,
                context.evidence_present(),
                &context.source_label,
                &context.answer,
                verdict.status,
            );

            annotations.insert(path.clone(), (context, verdict));
        }

        let root = annotate(&tree.root, &Vec::new(), &annotations);
        let steps_recorded = paths.len();
        let trace = session.tracker.steps()[steps_before..].to_vec();
        session.tree = Some(tree);

        let soundness = session.tracker.soundness();
        tracing::info!(
            question_len = question.len(),
            nodes = steps_recorded,
            soundness = soundness,
            elapsed_ms = start_time.elapsed().as_millis(),
            "Deliberation completed"
        );

        DeliberationReport {
            root,
            soundness,
            steps_recorded,
            trace,
        }
    }
}

fn collect_paths(node: &QuestionNode, path: Vec<usize>, out: &mut Vec<Vec<usize>>) {
    out.push(path.clone());
    for (i, child) in node.children.iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(i);
        collect_paths(child, child_path, out);
    }
}

fn node_at<'a>(root: &'a QuestionNode, path: &[usize]) -> &'a QuestionNode {
    let mut node = root;
    for &index in path {
        node = &node.children[index];
    }
    node
}

fn annotate(
    node: &QuestionNode,
    path: &Vec<usize>,
    annotations: &HashMap<Vec<usize>, (NodeContext, AuditVerdict)>,
) -> AnnotatedNode {
    let (context, verdict) = annotations
        .get(path)
        .expect("every collected path has an annotation");

    let children = node
        .children
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let mut child_path = path.clone();
            child_path.push(i);
            annotate(child, &child_path, annotations)
        })
        .collect();

    AnnotatedNode {
        id: node.id.clone(),
        question: node.question.clone(),
        depth: node.depth,
        expansion: node.expansion,
        answer: context.answer.clone(),
        source_label: context.source_label.clone(),
        evidence: context.evidence.clone(),
        preliminary_status: context.status,
        audit: verdict.clone(),
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EngineConfig, RawVerdict};
    use crate::service::evidence::{EvidenceSource, IngestError, StubEvidenceSource};
    use crate::service::generation::{GenerationBackend, GenerationError};
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Arc;

    /// Backend that decomposes once, answers and judges deterministically
    struct PipelineBackend;

    #[async_trait]
    impl GenerationBackend for PipelineBackend {
        async fn generate_subquestions(
            &self,
            _question: &str,
            _grounding: &str,
            width: usize,
            _concepts: &[String],
        ) -> Result<Vec<String>, GenerationError> {
            Ok((0..width).map(|i| format!("¿sub {i}?")).collect())
        }

        async fn generate_grounded_answer(
            &self,
            question: &str,
            _grounding: &str,
        ) -> Result<String, GenerationError> {
            Ok(format!("respuesta fundada a {question}"))
        }

        async fn generate_general_answer(
            &self,
            question: &str,
        ) -> Result<String, GenerationError> {
            Ok(format!("respuesta general a {question}"))
        }

        async fn judge_claim(
            &self,
            _claim: &str,
            evidence: &str,
        ) -> Result<RawVerdict, GenerationError> {
            let status = if evidence.contains("Ley") {
                "validated"
            } else {
                "partial"
            };
            Ok(RawVerdict {
                status: status.to_string(),
                justification: "juicio determinista".to_string(),
            })
        }
    }

    struct EmptyEvidence;

    #[async_trait]
    impl EvidenceSource for EmptyEvidence {
        async fn ingest(&self, _path: &Path) -> Result<usize, IngestError> {
            Ok(0)
        }

        async fn retrieve(&self, _query: &str, _k: usize) -> Vec<EvidenceUnit> {
            Vec::new()
        }
    }

    fn service(evidence: Arc<dyn EvidenceSource>) -> DeliberationService {
        let backend: Arc<dyn GenerationBackend> = Arc::new(PipelineBackend);
        let config = EngineConfig {
            max_depth: 1,
            max_width: 2,
            top_k: 2,
            node_budget: 16,
        };
        DeliberationService::new(
            InquiryEngine::new(evidence.clone(), Some(backend.clone()), config),
            ContextGenerator::new(evidence, Some(backend.clone()), 2),
            ClaimAuditor::new(Some(backend)),
        )
    }

    #[tokio::test]
    async fn deliberation_records_one_step_per_node() {
        let mut session = Session::new();
        let report = service(Arc::new(StubEvidenceSource))
            .deliberate(&mut session, "¿raíz?", 1, 2)
            .await;

        // Root plus two children
        assert_eq!(report.steps_recorded, 3);
        assert_eq!(session.tracker.steps().len(), 3);
        assert!(session.tree.is_some());
        assert_eq!(report.root.children.len(), 2);
    }

    #[tokio::test]
    async fn grounded_run_validates_through_the_judge() {
        let mut session = Session::new();
        let report = service(Arc::new(StubEvidenceSource))
            .deliberate(&mut session, "¿raíz?", 0, 0)
            .await;

        // Stub evidence cites Ley 24/2015, so the judge validates
        assert_eq!(report.root.audit.status, ValidationStatus::Validated);
        assert_eq!(report.soundness, 100.0);
    }

    #[tokio::test]
    async fn empty_corpus_forces_not_validated_everywhere() {
        let mut session = Session::new();
        let report = service(Arc::new(EmptyEvidence))
            .deliberate(&mut session, "¿raíz?", 1, 2)
            .await;

        assert_eq!(report.soundness, 0.0);
        assert_eq!(report.root.audit.status, ValidationStatus::NotValidated);
        assert!(report
            .root
            .children
            .iter()
            .all(|c| c.audit.status == ValidationStatus::NotValidated));
        // The session log agrees with the report
        assert!(session
            .tracker
            .steps()
            .iter()
            .all(|s| s.status == ValidationStatus::NotValidated && !s.evidence_present));
    }

    #[tokio::test]
    async fn consecutive_runs_accumulate_in_the_session_log() {
        let mut session = Session::new();
        let svc = service(Arc::new(StubEvidenceSource));
        svc.deliberate(&mut session, "¿primera?", 0, 0).await;
        svc.deliberate(&mut session, "¿segunda?", 0, 0).await;

        assert_eq!(session.tracker.steps().len(), 2);
        // The stored tree is the most recent one
        assert_eq!(
            session.tree.as_ref().unwrap().root.question,
            "¿segunda?"
        );
    }
}
