//! Outbound side channels.
//!
//! Notifications and exchange logging are best-effort: they run on a
//! background [`Outbox`] task and their failures are logged, never returned
//! to the conversation.

pub mod memory;
pub mod outbox;
pub mod pushover;
pub mod sheets;

pub use memory::{ExchangeRow, RecordingExchangeLog, RecordingNotifier};
pub use outbox::{Outbox, DEFAULT_QUEUE_CAPACITY};
pub use pushover::{DisabledNotifier, PushoverNotifier};
pub use sheets::{DisabledExchangeLog, GoogleSheetsLog, ServiceAccountSource};
