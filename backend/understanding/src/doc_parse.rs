//! Document Parsing
//!
//! Reads plain-text documents and strips PDFs down to their contiguous text.

use std::io::ErrorKind;
use std::panic;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DocError {
    #[error("document not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },
}

pub struct DocParser;

impl DocParser {
    /// Read a UTF-8 text document.
    pub fn read_text(path: &Path) -> Result<String, DocError> {
        info!(path = %path.display(), "Reading text document");
        std::fs::read_to_string(path).map_err(|source| io_error(path, source))
    }

    /// Extract the text of every page of a PDF, in page order.
    pub fn read_pdf(path: &Path) -> Result<String, DocError> {
        info!(path = %path.display(), "Parsing PDF document");
        if !path.exists() {
            return Err(DocError::NotFound(path.to_path_buf()));
        }

        // pdf-extract panics on some unsupported font encodings.
        let extracted = panic::catch_unwind(|| pdf_extract::extract_text(path)).map_err(|_| {
            DocError::Extraction {
                path: path.to_path_buf(),
                message: "extractor panicked".to_string(),
            }
        })?;

        let text = extracted.map_err(|e| DocError::Extraction {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(text.trim().to_string())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> DocError {
    if source.kind() == ErrorKind::NotFound {
        DocError::NotFound(path.to_path_buf())
    } else {
        DocError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_text_documents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Engineer with 18 years of experience.").unwrap();
        let text = DocParser::read_text(file.path()).unwrap();
        assert_eq!(text, "Engineer with 18 years of experience.");
    }

    #[test]
    fn missing_documents_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("summary.txt");
        assert!(matches!(DocParser::read_text(&missing), Err(DocError::NotFound(_))));
        let missing = dir.path().join("linkedin.pdf");
        assert!(matches!(DocParser::read_pdf(&missing), Err(DocError::NotFound(_))));
    }

    #[test]
    fn garbage_pdf_is_an_extraction_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        write!(file, "this is not a pdf").unwrap();
        assert!(matches!(
            DocParser::read_pdf(file.path()),
            Err(DocError::Extraction { .. })
        ));
    }
}
