//! Budget database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Budget, BudgetStatus};

const BUDGET_COLUMNS: &str =
    "id, patient_id, number, status, total_value, items, valid_until, conditions, created_at";

impl Database {
    /// Insert a new budget.
    pub fn insert_budget(&self, budget: &Budget) -> DbResult<()> {
        let items_json = serde_json::to_string(&budget.items)?;

        self.conn.execute(
            r#"
            INSERT INTO budgets (
                id, patient_id, number, status, total_value, items,
                valid_until, conditions, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                budget.id,
                budget.patient_id,
                budget.number,
                budget.status.as_str(),
                budget.total_value,
                items_json,
                budget.valid_until,
                budget.conditions,
                budget.created_at,
            ],
        )?;
        tracing::info!(
            budget_id = %budget.id,
            patient_id = %budget.patient_id,
            items = budget.items.len(),
            "Saved budget"
        );
        Ok(())
    }

    /// Get a budget by ID.
    pub fn get_budget(&self, id: &str) -> DbResult<Option<Budget>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
                [id],
                BudgetRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a patient's budgets, newest first.
    pub fn list_budgets_for_patient(&self, patient_id: &str) -> DbResult<Vec<Budget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM budgets WHERE patient_id = ? ORDER BY created_at DESC, rowid DESC",
            BUDGET_COLUMNS
        ))?;

        let rows = stmt
            .query_map([patient_id], BudgetRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Change a budget's status.
    pub fn update_budget_status(&self, id: &str, status: BudgetStatus) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE budgets SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete a budget.
    pub fn delete_budget(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM budgets WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct BudgetRow {
    id: String,
    patient_id: String,
    number: Option<String>,
    status: String,
    total_value: f64,
    items: String,
    valid_until: Option<String>,
    conditions: Option<String>,
    created_at: String,
}

impl BudgetRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            number: row.get(2)?,
            status: row.get(3)?,
            total_value: row.get(4)?,
            items: row.get(5)?,
            valid_until: row.get(6)?,
            conditions: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl TryFrom<BudgetRow> for Budget {
    type Error = DbError;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        let status = BudgetStatus::parse(&row.status)
            .ok_or_else(|| DbError::Constraint(format!("Unknown budget status: {}", row.status)))?;
        let items = serde_json::from_str(&row.items)?;

        Ok(Budget {
            id: row.id,
            patient_id: row.patient_id,
            number: row.number,
            status,
            total_value: row.total_value,
            items,
            valid_until: row.valid_until,
            conditions: row.conditions,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetItem, Patient};

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Carlos".into());
        db.insert_patient(&patient).unwrap();
        (db, patient.id)
    }

    fn sample_budget(patient_id: &str) -> Budget {
        let mut budget = Budget::new(patient_id.to_string());
        budget.number = Some("12345678".into());
        budget.items = vec![BudgetItem {
            id: "i-1".into(),
            procedure: "Canal".into(),
            tooth: "36".into(),
            value: 900.0,
            discount: 10.0,
        }];
        budget.total_value = budget.items_total();
        budget.valid_until = Some("2024-07-14".into());
        budget.conditions = Some("• Pagamento à vista".into());
        budget
    }

    #[test]
    fn test_insert_and_get_budget() {
        let (db, patient_id) = setup_db();
        let budget = sample_budget(&patient_id);

        db.insert_budget(&budget).unwrap();

        let retrieved = db.get_budget(&budget.id).unwrap().unwrap();
        assert_eq!(retrieved, budget);
        assert!((retrieved.total_value - 810.0).abs() < 1e-9);
    }

    #[test]
    fn test_quick_budget_defaults() {
        let (db, patient_id) = setup_db();

        let mut budget = Budget::new(patient_id.clone());
        budget.total_value = 350.0;
        db.insert_budget(&budget).unwrap();

        let listed = db.list_budgets_for_patient(&patient_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].items.is_empty());
        assert_eq!(listed[0].number, None);
        assert_eq!(listed[0].status, BudgetStatus::Draft);
    }

    #[test]
    fn test_update_status() {
        let (db, patient_id) = setup_db();
        let budget = sample_budget(&patient_id);
        db.insert_budget(&budget).unwrap();

        assert!(db.update_budget_status(&budget.id, BudgetStatus::Approved).unwrap());
        let retrieved = db.get_budget(&budget.id).unwrap().unwrap();
        assert_eq!(retrieved.status, BudgetStatus::Approved);
    }

    #[test]
    fn test_list_newest_first() {
        let (db, patient_id) = setup_db();
        let first = sample_budget(&patient_id);
        let second = sample_budget(&patient_id);
        db.insert_budget(&first).unwrap();
        db.insert_budget(&second).unwrap();

        let listed = db.list_budgets_for_patient(&patient_id).unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[test]
    fn test_delete_budget() {
        let (db, patient_id) = setup_db();
        let budget = sample_budget(&patient_id);
        db.insert_budget(&budget).unwrap();

        assert!(db.delete_budget(&budget.id).unwrap());
        assert!(db.get_budget(&budget.id).unwrap().is_none());
    }
}
