//! Clinical record database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{ClinicalRecord, RecordKind};

const RECORD_COLUMNS: &str = "id, patient_id, type, title, content, created_at";

impl Database {
    /// Insert a new clinical record.
    pub fn insert_record(&self, record: &ClinicalRecord) -> DbResult<()> {
        let content_json = serde_json::to_string(&record.content)?;

        self.conn.execute(
            r#"
            INSERT INTO clinical_records (
                id, patient_id, type, title, content, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id,
                record.patient_id,
                record.kind.as_str(),
                record.title,
                content_json,
                record.created_at,
            ],
        )?;
        tracing::debug!(record_id = %record.id, kind = record.kind.as_str(), "Inserted clinical record");
        Ok(())
    }

    /// Overwrite a record's title and content (last write wins).
    pub fn update_record(
        &self,
        id: &str,
        title: &str,
        content: &serde_json::Value,
    ) -> DbResult<bool> {
        let content_json = serde_json::to_string(content)?;
        let rows_affected = self.conn.execute(
            "UPDATE clinical_records SET title = ?2, content = ?3 WHERE id = ?1",
            params![id, title, content_json],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a record by ID.
    pub fn get_record(&self, id: &str) -> DbResult<Option<ClinicalRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM clinical_records WHERE id = ?", RECORD_COLUMNS),
                [id],
                RecordRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List records for a patient, newest first, optionally filtered by kind.
    pub fn list_records_for_patient(
        &self,
        patient_id: &str,
        kind: Option<RecordKind>,
    ) -> DbResult<Vec<ClinicalRecord>> {
        let rows: Vec<RecordRow> = match kind {
            Some(kind) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM clinical_records WHERE patient_id = ? AND type = ? \
                     ORDER BY created_at DESC, rowid DESC",
                    RECORD_COLUMNS
                ))?;
                let rows = stmt.query_map(params![patient_id, kind.as_str()], RecordRow::from_row)?;
                rows.collect::<Result<_, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {} FROM clinical_records WHERE patient_id = ? \
                     ORDER BY created_at DESC, rowid DESC",
                    RECORD_COLUMNS
                ))?;
                let rows = stmt.query_map([patient_id], RecordRow::from_row)?;
                rows.collect::<Result<_, _>>()?
            }
        };

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

/// Intermediate row struct for database mapping.
struct RecordRow {
    id: String,
    patient_id: String,
    kind: String,
    title: String,
    content: String,
    created_at: String,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            kind: row.get(2)?,
            title: row.get(3)?,
            content: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<RecordRow> for ClinicalRecord {
    type Error = DbError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let kind = RecordKind::parse(&row.kind)
            .ok_or_else(|| DbError::Constraint(format!("Unknown record type: {}", row.kind)))?;
        let content = serde_json::from_str(&row.content)?;

        Ok(ClinicalRecord {
            id: row.id,
            patient_id: row.patient_id,
            kind,
            title: row.title,
            content,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patient;
    use serde_json::json;

    fn setup_db() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let patient = Patient::new("Ana".into());
        db.insert_patient(&patient).unwrap();
        (db, patient.id)
    }

    #[test]
    fn test_insert_and_get_record() {
        let (db, patient_id) = setup_db();

        let record = ClinicalRecord::certificate(patient_id, "Atestado".into(), "Repouso 2 dias".into());
        db.insert_record(&record).unwrap();

        let retrieved = db.get_record(&record.id).unwrap().unwrap();
        assert_eq!(retrieved, record);
    }

    #[test]
    fn test_update_overwrites_content() {
        let (db, patient_id) = setup_db();

        let record = ClinicalRecord::new(
            patient_id,
            RecordKind::Anamnesis,
            "Anamnese".into(),
            json!({ "dadosPaciente": { "nome": "Ana" }, "tratamento": { "observacoes": "a" } }),
        );
        db.insert_record(&record).unwrap();

        let new_content = json!({ "dadosPaciente": { "nome": "Ana Lima" } });
        assert!(db.update_record(&record.id, "Anamnese (Atualizada)", &new_content).unwrap());

        let retrieved = db.get_record(&record.id).unwrap().unwrap();
        assert_eq!(retrieved.title, "Anamnese (Atualizada)");
        // Wholesale overwrite: the old treatment section is gone
        assert_eq!(retrieved.content, new_content);
    }

    #[test]
    fn test_update_missing_record() {
        let (db, _) = setup_db();
        assert!(!db.update_record("missing", "x", &json!({})).unwrap());
    }

    #[test]
    fn test_list_filters_by_kind() {
        let (db, patient_id) = setup_db();

        let cert = ClinicalRecord::certificate(patient_id.clone(), "Atestado".into(), "".into());
        let anam = ClinicalRecord::new(
            patient_id.clone(),
            RecordKind::Anamnesis,
            "Anamnese".into(),
            json!({}),
        );
        db.insert_record(&cert).unwrap();
        db.insert_record(&anam).unwrap();

        let all = db.list_records_for_patient(&patient_id, None).unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].id, anam.id);

        let certs = db
            .list_records_for_patient(&patient_id, Some(RecordKind::Certificate))
            .unwrap();
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].id, cert.id);
    }

    #[test]
    fn test_records_cascade_with_patient() {
        let (db, patient_id) = setup_db();
        let record = ClinicalRecord::certificate(patient_id.clone(), "A".into(), "B".into());
        db.insert_record(&record).unwrap();

        db.delete_patient(&patient_id).unwrap();
        assert!(db.get_record(&record.id).unwrap().is_none());
    }
}
