//! Folio Agent
//!
//! The persona conversation loop: persona context, system prompt, tool
//! dispatch, and the model/tool round-trip state machine.

pub mod agent_loop;
pub mod persona;
pub mod system_prompt;
pub mod tool_dispatcher;
pub mod transcript;

pub use agent_loop::{ChatOutcome, ProfileAgent, APOLOGY, DEGRADED_REPLY};
pub use persona::Persona;
pub use system_prompt::PromptBuilder;
pub use tool_dispatcher::ToolDispatcher;
pub use transcript::Transcript;
