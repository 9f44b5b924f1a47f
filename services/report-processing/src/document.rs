//! Source document contract and the PDF-backed implementation.

use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use pqlens_utils::{PqError, PqResult};

/// One structured table object as reported by the PDF collaborator: a list
/// of rows, each a list of nullable cell strings.
pub type StructuredTable = Vec<Vec<Option<String>>>;

/// Plain text and structured tables for a single page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub text: String,
    pub tables: Vec<StructuredTable>,
}

/// A fully loaded source document.
///
/// This is the only interface the extraction engine sees; how the pages
/// were produced (pdf parser, synthetic test fixture) is irrelevant
/// downstream.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Display name, normally the source file name.
    pub name: String,
    pub pages: Vec<Page>,
}

impl SourceDocument {
    /// Builds a document from page texts alone, with no structured tables.
    pub fn from_texts(name: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            name: name.into(),
            pages: texts
                .into_iter()
                .map(|text| Page {
                    text,
                    tables: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of the first page, used by the metadata extractor.
    pub fn first_page_text(&self) -> &str {
        self.pages.first().map(|p| p.text.as_str()).unwrap_or("")
    }

    /// Opens a PDF file and extracts per-page text.
    ///
    /// The parse runs on a helper thread bounded by `timeout`: malformed
    /// PDFs can hang the parser, and a hung open must fail as a
    /// document-level error instead of stalling the batch. The pure-Rust
    /// text extractor reports no table objects, so structured extraction is
    /// empty for PDF-backed documents and the regex fallback carries them.
    pub fn open_pdf(path: &Path, timeout: Duration) -> PqResult<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = std::fs::read(path)
            .map_err(|e| PqError::document(&name, format!("failed to read file: {e}")))?;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| e.to_string());
            // Receiver may have timed out and gone away.
            let _ = tx.send(result);
        });

        let pages = match rx.recv_timeout(timeout) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                return Err(PqError::document(
                    &name,
                    format!("failed to extract text: {e}"),
                ))
            }
            Err(_) => {
                return Err(PqError::document(
                    &name,
                    format!("document open timed out after {}s", timeout.as_secs()),
                ))
            }
        };

        tracing::debug!(document = %name, pages = pages.len(), "opened PDF document");

        Ok(Self::from_texts(name, pages))
    }
}
