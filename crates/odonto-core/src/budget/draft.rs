//! Budget drafts and saving.

use chrono::{DateTime, Days, NaiveDate, Utc};

use super::{BudgetLedger, ConditionList, LedgerError, LedgerResult};
use crate::db::{Database, DbResult};
use crate::models::{Budget, BudgetStatus, Preset};
use crate::presets::{PresetBackend, PresetResult, PresetStore};

/// Default validity window for new budgets.
pub const DEFAULT_VALIDITY_DAYS: u32 = 30;

/// Budget number: the last 8 digits of the unix time in seconds.
pub fn budget_number(now: DateTime<Utc>) -> String {
    let secs = now.timestamp().to_string();
    let start = secs.len().saturating_sub(8);
    secs[start..].to_string()
}

/// A budget being composed for one patient.
#[derive(Debug, Clone)]
pub struct BudgetDraft {
    pub patient_id: String,
    pub ledger: BudgetLedger,
    pub conditions: ConditionList,
    pub valid_until: NaiveDate,
}

impl BudgetDraft {
    /// Empty draft with default conditions, valid `validity_days` from `today`.
    pub fn new(patient_id: impl Into<String>, today: NaiveDate, validity_days: u32) -> Self {
        let valid_until = today
            .checked_add_days(Days::new(u64::from(validity_days)))
            .unwrap_or(today);

        Self {
            patient_id: patient_id.into(),
            ledger: BudgetLedger::new(),
            conditions: ConditionList::default(),
            valid_until,
        }
    }

    /// Add `text` to the conditions and save it as a favorite.
    ///
    /// The condition is added even if the favorite could not be stored.
    pub fn save_favorite_condition<B: PresetBackend + ?Sized>(
        &mut self,
        presets: &mut PresetStore,
        backend: &B,
        text: &str,
    ) -> PresetResult<Option<Preset>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let stored = presets.add(backend, text);
        self.conditions.add(text);
        stored
    }

    /// Build the row to insert. Fails when there are no items.
    pub fn to_budget(&self, now: DateTime<Utc>) -> LedgerResult<Budget> {
        if self.ledger.is_empty() {
            return Err(LedgerError::EmptyBudget);
        }

        Ok(Budget {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: self.patient_id.clone(),
            number: Some(budget_number(now)),
            status: BudgetStatus::Draft,
            total_value: self.ledger.total(),
            items: self.ledger.items().to_vec(),
            valid_until: Some(self.valid_until.format("%Y-%m-%d").to_string()),
            conditions: Some(self.conditions.to_stored()),
            created_at: now.to_rfc3339(),
        })
    }

    /// Validate and insert as a single row.
    pub fn submit(&self, db: &Database, now: DateTime<Utc>) -> LedgerResult<Budget> {
        let budget = self.to_budget(now)?;
        db.insert_budget(&budget).inspect_err(|e| {
            tracing::error!(patient_id = %self.patient_id, error = %e, "Erro ao salvar orçamento");
        })?;
        Ok(budget)
    }
}

/// Insert a budget carrying only a total and a status.
pub fn quick_budget(
    db: &Database,
    patient_id: &str,
    total_value: f64,
    status: BudgetStatus,
) -> DbResult<Budget> {
    let mut budget = Budget::new(patient_id.to_string());
    budget.total_value = if total_value.is_finite() { total_value } else { 0.0 };
    budget.status = status;

    db.insert_budget(&budget)?;
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::NewItemInput;
    use crate::models::Patient;
    use chrono::TimeZone;

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Beatriz".into());
        db.insert_patient(&patient).unwrap();
        (db, patient.id)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_budget_number_last_eight_digits() {
        let now = Utc.timestamp_opt(1_718_323_200, 0).unwrap();
        assert_eq!(budget_number(now), "18323200");

        let early = Utc.timestamp_opt(12_345, 0).unwrap();
        assert_eq!(budget_number(early), "12345");
    }

    #[test]
    fn test_default_validity() {
        let draft = BudgetDraft::new("p", date("2024-06-14"), DEFAULT_VALIDITY_DAYS);
        assert_eq!(draft.valid_until, date("2024-07-14"));
        assert_eq!(draft.conditions, ConditionList::default());
    }

    #[test]
    fn test_empty_budget_rejected() {
        let (db, patient_id) = setup_db();
        let draft = BudgetDraft::new(patient_id.clone(), date("2024-06-14"), 30);

        let err = draft.submit(&db, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "Adicione pelo menos um procedimento ao orçamento.");
        assert!(db.list_budgets_for_patient(&patient_id).unwrap().is_empty());
    }

    #[test]
    fn test_submit_inserts_one_row() {
        let (db, patient_id) = setup_db();
        let mut draft = BudgetDraft::new(patient_id.clone(), date("2024-06-14"), 30);
        draft
            .ledger
            .add_item(NewItemInput::new("Restauração", 100.0).tooth("11").discount(10.0))
            .unwrap();
        draft.ledger.add_item(NewItemInput::new("Limpeza", 50.0)).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap();
        let saved = draft.submit(&db, now).unwrap();

        let listed = db.list_budgets_for_patient(&patient_id).unwrap();
        assert_eq!(listed, vec![saved.clone()]);
        assert_eq!(saved.status, BudgetStatus::Draft);
        assert!((saved.total_value - 140.0).abs() < 1e-9);
        assert_eq!(saved.valid_until.as_deref(), Some("2024-07-14"));
        assert_eq!(saved.number.as_deref(), Some(budget_number(now).as_str()));
        assert!(saved.conditions.unwrap().starts_with("• Orçamento válido"));
    }

    #[test]
    fn test_quick_budget() {
        let (db, patient_id) = setup_db();
        let budget = quick_budget(&db, &patient_id, f64::NAN, BudgetStatus::Presented).unwrap();

        assert_eq!(budget.total_value, 0.0);
        assert!(budget.items.is_empty());
        assert_eq!(db.get_budget(&budget.id).unwrap().unwrap().status, BudgetStatus::Presented);
    }

    #[test]
    fn test_save_favorite_condition() {
        let (db, _) = setup_db();
        let mut presets =
            PresetStore::load(crate::models::BUDGET_CONDITION_CATEGORY, &db).unwrap();
        let mut draft = BudgetDraft::new("p", date("2024-06-14"), 30);

        let stored = draft
            .save_favorite_condition(&mut presets, &db, "Parcelamento em 3x")
            .unwrap()
            .unwrap();

        assert_eq!(presets.presets(), &[stored]);
        assert_eq!(draft.conditions.items().last().unwrap(), "Parcelamento em 3x");
    }
}
