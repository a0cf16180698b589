//! Deliberation tree: a root question and its generated sub-questions

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Node identity: the structural path of child indices from the root
///
/// The root is the empty path, rendered `"root"`; its second child is `"1"`,
/// that child's first child `"1.0"`, and so on. Identity is positional, so
/// two branches that happen to generate identical question text remain
/// distinct nodes; question text is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn root() -> Self {
        Self("root".to_string())
    }

    /// Id of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        if self.0 == "root" {
            Self(index.to_string())
        } else {
            Self(format!("{}.{}", self.0, index))
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a node's expansion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionStatus {
    /// Sub-questions were generated for this node
    Expanded,
    /// Terminal by configuration: max depth reached, zero width, or the
    /// node budget was exhausted before this node's turn
    Leaf,
    /// The generation call failed or returned unparseable output; the node
    /// is childless but the tree as a whole is still usable
    Failed,
    /// No generation backend is configured; distinguishes "service
    /// unavailable" from "genuinely no sub-questions"
    ServiceUnavailable,
}

/// One question in the deliberation tree
///
/// Created during expansion and immutable afterwards; children keep their
/// generation order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionNode {
    pub id: NodeId,
    pub question: String,
    pub depth: usize,
    pub expansion: ExpansionStatus,
    pub children: Vec<QuestionNode>,
}

impl QuestionNode {
    pub fn new(id: NodeId, question: impl Into<String>, depth: usize) -> Self {
        Self {
            id,
            question: question.into(),
            depth,
            expansion: ExpansionStatus::Leaf,
            children: Vec::new(),
        }
    }

    /// Depth of the deepest node in this subtree
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(QuestionNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Largest out-degree in this subtree
    pub fn max_out_degree(&self) -> usize {
        self.children
            .iter()
            .map(QuestionNode::max_out_degree)
            .max()
            .unwrap_or(0)
            .max(self.children.len())
    }

    /// Total node count in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(QuestionNode::node_count)
            .sum::<usize>()
    }
}

/// A complete deliberation tree
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InquiryTree {
    pub root: QuestionNode,
}
