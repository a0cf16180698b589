//! Evidence units returned by the evidence store

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One retrieved chunk of corpus text
///
/// Immutable once returned by a query. `relevance` is a cosine similarity:
/// higher means closer to the query. Query results are ordered best-first,
/// with ties broken by chunk insertion order, so repeated queries against an
/// unchanged index return identical lists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceUnit {
    /// Verbatim chunk text
    pub content: String,
    /// Locator within the corpus (document name plus chunk position)
    pub source: String,
    /// Cosine similarity to the query, higher = closer
    pub relevance: f32,
}

/// Marker inserted into prompts when no corpus has been ingested, so the
/// generation step knows it is running ungrounded
pub const NO_KNOWLEDGE_BASE_MARKER: &str =
    "[sin base de conocimiento cargada / no knowledge base loaded]";

/// Format retrieved evidence as a grounding block for prompts
///
/// One `source: content` pair per unit, joined in retrieval order. An empty
/// slice yields the explicit no-knowledge-base marker instead of an empty
/// string.
pub fn grounding_block(evidence: &[EvidenceUnit]) -> String {
    if evidence.is_empty() {
        return NO_KNOWLEDGE_BASE_MARKER.to_string();
    }

    evidence
        .iter()
        .map(|unit| format!("{}: {}", unit.source, unit.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Concatenated source locators, used to label a generated answer
pub fn source_label(evidence: &[EvidenceUnit]) -> String {
    evidence
        .iter()
        .map(|unit| unit.source.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str, content: &str) -> EvidenceUnit {
        EvidenceUnit {
            content: content.to_string(),
            source: source.to_string(),
            relevance: 0.9,
        }
    }

    #[test]
    fn grounding_block_joins_in_retrieval_order() {
        let evidence = vec![unit("p. 3", "primer fragmento"), unit("p. 7", "segundo")];
        let block = grounding_block(&evidence);
        assert_eq!(block, "p. 3: primer fragmento\n\np. 7: segundo");
    }

    #[test]
    fn empty_evidence_yields_explicit_marker() {
        assert_eq!(grounding_block(&[]), NO_KNOWLEDGE_BASE_MARKER);
    }

    #[test]
    fn source_label_concatenates_locators() {
        let evidence = vec![unit("p. 3", "a"), unit("p. 7", "b")];
        assert_eq!(source_label(&evidence), "p. 3; p. 7");
    }
}
