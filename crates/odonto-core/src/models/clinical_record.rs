//! Clinical record models.

use serde::{Deserialize, Serialize};

use super::anamnesis::AnamnesisContent;

/// Kind of clinical record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Structured intake questionnaire
    Anamnesis,
    /// Free-text certificate (atestado)
    Certificate,
    /// Uploaded exam
    ExamUpload,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Anamnesis => "anamnesis",
            RecordKind::Certificate => "certificate",
            RecordKind::ExamUpload => "exam_upload",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "anamnesis" => Some(RecordKind::Anamnesis),
            "certificate" => Some(RecordKind::Certificate),
            "exam_upload" => Some(RecordKind::ExamUpload),
            _ => None,
        }
    }
}

/// A clinical record with freeform JSON content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalRecord {
    /// UUID primary key
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    /// Record kind
    pub kind: RecordKind,
    /// Display title
    pub title: String,
    /// Freeform content
    pub content: serde_json::Value,
    /// Creation timestamp
    pub created_at: String,
}

impl ClinicalRecord {
    /// Create a new record.
    pub fn new(
        patient_id: String,
        kind: RecordKind,
        title: String,
        content: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            kind,
            title,
            content,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a certificate holding free-text notes.
    pub fn certificate(patient_id: String, title: String, notes: String) -> Self {
        Self::new(
            patient_id,
            RecordKind::Certificate,
            title,
            serde_json::json!({ "notes": notes }),
        )
    }

    /// Parse the content as an anamnesis document.
    ///
    /// Returns `None` when the content carries no patient data, which is
    /// the case for records created before the structured form existed.
    pub fn anamnesis(&self) -> Option<AnamnesisContent> {
        self.content.get("dadosPaciente")?;
        serde_json::from_value(self.content.clone()).ok()
    }

    /// Short text shown on the record card.
    pub fn summary(&self) -> String {
        self.content
            .get("notes")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.content
                    .get("tratamento")
                    .and_then(|t| t.get("observacoes"))
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or("Sem anotações detalhadas.")
            .to_string()
    }
}
