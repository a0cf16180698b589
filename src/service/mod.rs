pub mod audit;
pub mod concepts;
pub mod context;
pub mod evidence;
pub mod generation;
pub mod inquiry;
pub mod llm;
pub mod session;
pub mod tracker;

pub use audit::ClaimAuditor;
pub use context::ContextGenerator;
pub use inquiry::InquiryEngine;
pub use llm::LlmClient;
pub use session::{DeliberationService, Session};
pub use tracker::ReasoningTracker;
