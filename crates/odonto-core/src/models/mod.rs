//! Domain models for the clinic.

mod anamnesis;
mod budget;
mod clinical_record;
mod patient;
mod preset;

pub use anamnesis::*;
pub use budget::*;
pub use clinical_record::*;
pub use patient::*;
pub use preset::*;
