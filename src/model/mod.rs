pub mod config;
pub mod evidence;
pub mod generation;
pub mod step;
pub mod tree;
pub mod verdict;

pub use config::{Config, EngineConfig, EvidenceBackend, LlmConfig, StoreConfig};
pub use evidence::{grounding_block, source_label, EvidenceUnit, NO_KNOWLEDGE_BASE_MARKER};
pub use step::{ReasoningStep, ValidationStatus};
pub use tree::{ExpansionStatus, InquiryTree, NodeId, QuestionNode};
pub use verdict::{AuditVerdict, RawVerdict};
