//! PDF documents for anamnesis records and budgets.
//!
//! Each document is first laid out as a list of [`Block`]s (pure data, easy
//! to assert on) and then drawn onto A4 pages by the canvas in `layout`.

mod layout;
mod anamnesis_pdf;
mod budget_pdf;
mod filename;

pub use layout::*;
pub use anamnesis_pdf::*;
pub use budget_pdf::*;
pub use filename::*;

use thiserror::Error;

/// PDF export errors.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Este registro não possui dados completos para gerar PDF.")]
    MissingPatientData,

    #[error("PDF render error: {0}")]
    Render(String),
}

pub type PdfResult<T> = Result<T, PdfError>;

/// Rendered document and suggested download name.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
