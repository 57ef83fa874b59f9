//! The persona the model role-plays.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use folio_understanding::DocParser;

pub const SUMMARY_PLACEHOLDER: &str = "Profile summary temporarily unavailable.";
pub const PROFILE_PLACEHOLDER: &str = "LinkedIn profile information temporarily unavailable.";

/// Fixed identity and background context. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub summary: String,
    pub profile_text: String,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        summary: impl Into<String>,
        profile_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
            profile_text: profile_text.into(),
        }
    }

    /// Read the biography and profile export. Each document that cannot be
    /// read is replaced by a placeholder; this never fails.
    pub fn load(name: impl Into<String>, summary_path: &Path, profile_path: &Path) -> Self {
        let name = name.into();
        info!(persona = %name, "Loading persona context");

        let summary = match DocParser::read_text(summary_path) {
            Ok(text) => {
                info!("Summary loaded successfully");
                text
            }
            Err(e) => {
                warn!(error = %e, "Error reading summary");
                SUMMARY_PLACEHOLDER.to_string()
            }
        };

        let profile_text = match DocParser::read_pdf(profile_path) {
            Ok(text) => {
                info!(chars = text.len(), "Profile document loaded successfully");
                text
            }
            Err(e) => {
                warn!(error = %e, "Error reading profile document");
                PROFILE_PLACEHOLDER.to_string()
            }
        };

        Self {
            name,
            summary,
            profile_text,
        }
    }
}
