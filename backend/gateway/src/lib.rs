//! Folio Gateway HTTP API Server
//!
//! Serves the landing message, the live health probe, and the `/ask` chat
//! endpoint used by the website front-end.

pub mod ask_api;
pub mod health_api;
pub mod server;

pub use ask_api::{AskRequest, ASK_FAILURE, OUTCOME_HEADER};
pub use server::{build_router, start_server, GatewayState};
