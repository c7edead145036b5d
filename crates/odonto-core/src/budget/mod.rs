//! Budget (orçamento) builder.
//!
//! A budget is assembled client side: procedure lines go into a
//! [`BudgetLedger`], conditions into a [`ConditionList`], and a
//! [`BudgetDraft`] ties both to a patient and validity date before a single
//! insert.

mod ledger;
mod conditions;
mod draft;
mod currency;

pub use ledger::*;
pub use conditions::*;
pub use draft::*;
pub use currency::*;

use thiserror::Error;

/// Budget builder errors.
///
/// Messages are shown to the user as-is.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Preencha pelo menos o procedimento e o valor.")]
    MissingProcedureOrValue,

    #[error("Adicione pelo menos um procedimento ao orçamento.")]
    EmptyBudget,

    #[error("Database error: {0}")]
    Db(#[from] crate::db::DbError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
