//! Inquiry engine: bounded decomposition of a question into a tree
//!
//! Expansion is an explicit breadth-first work queue instead of open
//! recursion: depth, width and the node budget are all enforced in one
//! place, and a failed generation call degrades a single node rather than
//! the whole tree.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::{grounding_block, EngineConfig, ExpansionStatus, InquiryTree, NodeId, QuestionNode};
use crate::service::concepts::extract_concepts;
use crate::service::evidence::EvidenceSource;
use crate::service::generation::GenerationBackend;

/// Evidence units pulled per node to ground the decomposition prompt
const GROUNDING_K: usize = 2;

/// Drives tree expansion against the evidence store and generation backend
pub struct InquiryEngine {
    evidence: Arc<dyn EvidenceSource>,
    generation: Option<Arc<dyn GenerationBackend>>,
    config: EngineConfig,
}

impl InquiryEngine {
    pub fn new(
        evidence: Arc<dyn EvidenceSource>,
        generation: Option<Arc<dyn GenerationBackend>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            evidence,
            generation,
            config,
        }
    }

    /// Expand `question` into a tree using the configured limits
    pub async fn generate(&self, question: &str) -> InquiryTree {
        self.generate_with_limits(question, self.config.max_depth, self.config.max_width)
            .await
    }

    /// Expand `question` with per-call depth/width overrides
    pub async fn generate_with_limits(
        &self,
        question: &str,
        max_depth: usize,
        max_width: usize,
    ) -> InquiryTree {
        let mut root = QuestionNode::new(NodeId::root(), question, 0);
        let mut queue: VecDeque<Vec<usize>> = VecDeque::new();
        queue.push_back(Vec::new());

        let mut expanded = 0usize;

        while let Some(path) = queue.pop_front() {
            let (question, depth, id) = {
                let node = node_at(&root, &path);
                (node.question.clone(), node.depth, node.id.clone())
            };

            if max_width == 0 || depth >= max_depth {
                // Terminal by configuration; already marked Leaf
                continue;
            }

            if expanded >= self.config.node_budget {
                tracing::warn!(
                    node = %id,
                    budget = self.config.node_budget,
                    "Node budget exhausted, leaving remaining nodes unexpanded"
                );
                continue;
            }
            expanded += 1;

            let Some(generation) = self.generation.as_ref() else {
                // Flag the degrade so callers can tell "service unavailable"
                // apart from "genuinely no sub-questions"
                node_at_mut(&mut root, &path).expansion = ExpansionStatus::ServiceUnavailable;
                tracing::warn!(
                    node = %id,
                    "No generation backend configured, marking node unexpandable"
                );
                continue;
            };

            let evidence = self.evidence.retrieve(&question, GROUNDING_K).await;
            let grounding = grounding_block(&evidence);
            let concepts = extract_concepts(&question);

            match generation
                .generate_subquestions(&question, &grounding, max_width, &concepts)
                .await
            {
                Ok(subquestions) => {
                    let subquestions = clamp_subquestions(subquestions, max_width);
                    tracing::debug!(
                        node = %id,
                        depth = depth,
                        children = subquestions.len(),
                        grounded = !evidence.is_empty(),
                        "Node expanded"
                    );

                    let node = node_at_mut(&mut root, &path);
                    node.expansion = ExpansionStatus::Expanded;
                    for (i, subquestion) in subquestions.into_iter().enumerate() {
                        node.children
                            .push(QuestionNode::new(id.child(i), subquestion, depth + 1));

                        let mut child_path = path.clone();
                        child_path.push(i);
                        queue.push_back(child_path);
                    }
                }
                Err(e) => {
                    // Partial trees are acceptable; only this node degrades
                    node_at_mut(&mut root, &path).expansion = ExpansionStatus::Failed;
                    tracing::warn!(
                        node = %id,
                        error = %e,
                        "Sub-question generation failed, node left childless"
                    );
                }
            }
        }

        InquiryTree { root }
    }
}

/// Trim, drop empties, and cap the list at `max_width`
fn clamp_subquestions(subquestions: Vec<String>, max_width: usize) -> Vec<String> {
    subquestions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(max_width)
        .collect()
}

fn node_at<'a>(root: &'a QuestionNode, path: &[usize]) -> &'a QuestionNode {
    let mut node = root;
    for &index in path {
        node = &node.children[index];
    }
    node
}

fn node_at_mut<'a>(root: &'a mut QuestionNode, path: &[usize]) -> &'a mut QuestionNode {
    let mut node = root;
    for &index in path {
        node = &mut node.children[index];
    }
    node
}
