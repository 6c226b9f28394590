//! Knowledge tools exposed to the onboarding agent.

pub mod executor;
pub mod knowledge;
pub mod registry;
pub mod reply;
pub mod scoring;

pub use executor::{ToolCall, ToolError, ToolExecutor, ToolOutput};
pub use knowledge::KnowledgeTools;
pub use registry::{ToolDef, ToolRegistry};
pub use reply::ToolReply;
