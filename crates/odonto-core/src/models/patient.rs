//! Patient models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// UUID primary key
    pub id: String,
    /// Full legal name
    pub full_name: String,
    /// CPF/RG document number
    pub document_id: Option<String>,
    /// Contact phone
    pub contact_phone: Option<String>,
    /// Contact email
    pub contact_email: Option<String>,
    /// Date of birth (`YYYY-MM-DD`)
    pub birth_date: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Patient {
    /// Create a new patient with only the required name.
    pub fn new(full_name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            full_name,
            document_id: None,
            contact_phone: None,
            contact_email: None,
            birth_date: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Patient registration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatientError {
    #[error("Dados inválidos. Verifique os campos.")]
    Invalid(Vec<FieldError>),
}

/// A single inline validation message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Registration form input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewPatient {
    #[validate(length(min = 2, message = "Nome deve ter pelo menos 2 caracteres."))]
    pub full_name: String,
    #[validate(length(min = 1, message = "CPF/RG é obrigatório."))]
    pub document_id: String,
    #[validate(length(min = 1, message = "Telefone é obrigatório."))]
    pub contact_phone: String,
    #[validate(email(message = "Email inválido."))]
    pub contact_email: String,
    pub birth_date: Option<String>,
}

impl NewPatient {
    /// Validate the form and build the patient row to insert.
    pub fn into_patient(self) -> Result<Patient, PatientError> {
        if let Err(errors) = self.validate() {
            let mut fields: Vec<FieldError> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    let field = field.to_string();
                    errs.iter().map(move |e| FieldError {
                        field: field.clone(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    })
                })
                .collect();
            fields.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(PatientError::Invalid(fields));
        }

        let mut patient = Patient::new(self.full_name);
        patient.document_id = Some(self.document_id);
        patient.contact_phone = Some(self.contact_phone);
        patient.contact_email = Some(self.contact_email);
        patient.birth_date = self.birth_date.filter(|d| !d.trim().is_empty());
        Ok(patient)
    }
}

/// Parse a stored date. Accepts `YYYY-MM-DD` and anything with that prefix
/// (e.g. an RFC 3339 timestamp).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()
}

/// Whole years between `birth` and `today`, not counting a birthday that
/// has not happened yet this year.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> NewPatient {
        NewPatient {
            full_name: "Maria Souza".into(),
            document_id: "123.456.789-00".into(),
            contact_phone: "(11) 99999-0000".into(),
            contact_email: "maria@example.com".into(),
            birth_date: Some("1990-03-10".into()),
        }
    }

    #[test]
    fn test_new_patient() {
        let patient = Patient::new("Maria".into());
        assert_eq!(patient.full_name, "Maria");
        assert_eq!(patient.id.len(), 36); // UUID format
        assert!(patient.birth_date.is_none());
    }

    #[test]
    fn test_age_before_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(age_on(birth, today), 23);
    }

    #[test]
    fn test_age_on_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(age_on(birth, today), 24);
    }

    #[test]
    fn test_parse_date_accepts_timestamp_prefix() {
        assert_eq!(
            parse_date("2000-06-15T00:00:00Z"),
            NaiveDate::from_ymd_opt(2000, 6, 15)
        );
        assert_eq!(parse_date("15/06/2000"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_valid_registration() {
        let patient = valid_form().into_patient().unwrap();
        assert_eq!(patient.full_name, "Maria Souza");
        assert_eq!(patient.contact_email.as_deref(), Some("maria@example.com"));
        assert_eq!(patient.birth_date.as_deref(), Some("1990-03-10"));
    }

    #[test]
    fn test_invalid_registration_reports_fields() {
        let mut form = valid_form();
        form.full_name = "M".into();
        form.contact_email = "not-an-email".into();

        let PatientError::Invalid(errors) = form.into_patient().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["contact_email", "full_name"]);
        assert_eq!(errors[0].message, "Email inválido.");
    }

    #[test]
    fn test_blank_birth_date_is_dropped() {
        let mut form = valid_form();
        form.birth_date = Some("  ".into());
        let patient = form.into_patient().unwrap();
        assert!(patient.birth_date.is_none());
    }
}
