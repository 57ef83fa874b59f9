pub mod error;
pub mod message;
pub mod tools;
pub mod traits;

pub use error::{ErrorClass, FolioError};
pub use message::{ChatMessage, FunctionCall, Role, ToolCall};
pub use tools::{ToolRegistry, ToolSchema};
pub use traits::{
    ChatModel, Completion, CompletionRequest, ExchangeLog, FinishReason, Notifier, Tool,
};
