//! Procedure line items and the running total.

use super::{LedgerError, LedgerResult};
use crate::models::{calculate_total, BudgetItem};

/// Tooth placeholder for items not tied to a tooth.
pub const NO_TOOTH: &str = "-";

/// Raw form input for a new line.
#[derive(Debug, Clone, Default)]
pub struct NewItemInput {
    pub procedure: String,
    pub tooth: String,
    /// `None` when the field is empty
    pub value: Option<f64>,
    /// Percentage; empty means no discount
    pub discount: Option<f64>,
}

impl NewItemInput {
    pub fn new(procedure: impl Into<String>, value: f64) -> Self {
        Self {
            procedure: procedure.into(),
            value: Some(value),
            ..Default::default()
        }
    }

    pub fn tooth(mut self, tooth: impl Into<String>) -> Self {
        self.tooth = tooth.into();
        self
    }

    pub fn discount(mut self, discount: f64) -> Self {
        self.discount = Some(discount);
        self
    }
}

/// Ordered list of budget lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetLedger {
    items: Vec<BudgetItem>,
}

impl BudgetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a line.
    ///
    /// Requires a procedure name and a finite value. Tooth defaults to
    /// [`NO_TOOTH`], discount to 0.
    pub fn add_item(&mut self, input: NewItemInput) -> LedgerResult<&BudgetItem> {
        let value = input.value.filter(|v| v.is_finite());
        let (procedure, value) = match (input.procedure.trim().is_empty(), value) {
            (false, Some(value)) => (input.procedure, value),
            _ => return Err(LedgerError::MissingProcedureOrValue),
        };

        let tooth = if input.tooth.trim().is_empty() {
            NO_TOOTH.to_string()
        } else {
            input.tooth
        };
        let discount = input.discount.filter(|d| d.is_finite()).unwrap_or(0.0);

        self.items.push(BudgetItem {
            id: uuid::Uuid::new_v4().to_string(),
            procedure,
            tooth,
            value,
            discount,
        });
        let idx = self.items.len() - 1;
        Ok(&self.items[idx])
    }

    /// Remove a line by its generated id.
    pub fn remove_item(&mut self, id: &str) -> Option<BudgetItem> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn items(&self) -> &[BudgetItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Σ value × (1 − discount/100).
    pub fn total(&self) -> f64 {
        calculate_total(&self.items)
    }

    pub fn into_items(self) -> Vec<BudgetItem> {
        self.items
    }
}
