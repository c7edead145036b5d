//! Dental chart (odontogram) in FDI notation.
//!
//! Codes are two digits: quadrant (1-4) then position from the midline (1-8).
//! The chart is drawn from the dentist's point of view, so the patient's
//! right side sits on the left of the picture.

mod tooth;
mod shape;
mod selection;
mod chart;

pub use tooth::*;
pub use shape::*;
pub use selection::*;
pub use chart::*;

use thiserror::Error;

/// Odontogram errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToothError {
    #[error("Invalid FDI tooth code: {0}")]
    InvalidCode(u8),
}

pub type ToothResult<T> = Result<T, ToothError>;
