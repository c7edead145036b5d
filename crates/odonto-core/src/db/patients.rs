//! Patient database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str =
    "id, full_name, document_id, contact_phone, contact_email, birth_date, created_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        full_name: row.get(1)?,
        document_id: row.get(2)?,
        contact_phone: row.get(3)?,
        contact_email: row.get(4)?,
        birth_date: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, full_name, document_id, contact_phone, contact_email,
                birth_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                patient.id,
                patient.full_name,
                patient.document_id,
                patient.contact_phone,
                patient.contact_email,
                patient.birth_date,
                patient.created_at,
            ],
        )?;
        tracing::debug!(patient_id = %patient.id, "Inserted patient");
        Ok(())
    }

    /// Update an existing patient.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                full_name = ?2,
                document_id = ?3,
                contact_phone = ?4,
                contact_email = ?5,
                birth_date = ?6
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.full_name,
                patient.document_id,
                patient.contact_phone,
                patient.contact_email,
                patient.birth_date,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all patients, newest first.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients ORDER BY created_at DESC, rowid DESC",
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Search patients by name (prefix match).
    pub fn search_patients(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", query);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients WHERE full_name LIKE ? ORDER BY full_name LIMIT ?",
            PATIENT_COLUMNS
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a patient (records and budgets cascade).
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
