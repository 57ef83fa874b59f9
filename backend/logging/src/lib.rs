//! Structured logging for the Folio backend.
//!
//! Handles log redaction, console and rolling NDJSON output, and agent event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AgentEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
