//! Folio document understanding.
//!
//! Turns the persona's source documents (plain-text biography, exported
//! profile PDF) into prompt-ready text.

pub mod doc_parse;

pub use doc_parse::{DocError, DocParser};
