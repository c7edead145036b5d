//! Multi-step anamnesis form.
//!
//! A new intake walks Dados → Saúde → Tratamento; editing an existing record
//! adds a Confirmar step. Navigation is strictly linear. The collected state
//! is serialized into one [`AnamnesisContent`] document and written with a
//! single insert (new) or update (edit).

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{
    age_on, medical_condition, parse_date, AnamnesisContent, BloodType, ClinicalRecord, Patient,
    PatientSnapshot, RecordKind, ReferralSource,
};
use crate::odontogram::{ToothCode, ToothSelection};

/// Wizard errors.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Você precisa aceitar a declaração para continuar.")]
    DeclarationNotAccepted,

    #[error("Unknown medical condition: {0}")]
    UnknownCondition(String),

    #[error("Record {0} is not an anamnesis")]
    NotAnamnesis(String),

    #[error("Record {record_id} does not belong to patient {patient_id}")]
    WrongPatient { record_id: String, patient_id: String },

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type WizardResult<T> = Result<T, WizardError>;

/// One screen of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    PatientData,
    Health,
    Treatment,
    Confirm,
}

const NEW_STEPS: [WizardStep; 3] = [WizardStep::PatientData, WizardStep::Health, WizardStep::Treatment];
const EDIT_STEPS: [WizardStep; 4] = [
    WizardStep::PatientData,
    WizardStep::Health,
    WizardStep::Treatment,
    WizardStep::Confirm,
];

impl WizardStep {
    /// 1-based position shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::PatientData => 1,
            WizardStep::Health => 2,
            WizardStep::Treatment => 3,
            WizardStep::Confirm => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::PatientData => "Dados",
            WizardStep::Health => "Saúde",
            WizardStep::Treatment => "Tratamento",
            WizardStep::Confirm => "Confirmar",
        }
    }
}

/// Whether the wizard creates a record or rewrites one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardMode {
    New,
    Edit { record_id: String },
}

/// Anamnesis form state.
#[derive(Debug, Clone)]
pub struct AnamnesisWizard {
    mode: WizardMode,
    patient_id: String,
    step: WizardStep,
    content: AnamnesisContent,
    teeth: ToothSelection,
}

impl AnamnesisWizard {
    /// Start a new intake prefilled from the patient row.
    pub fn new(patient: &Patient) -> Self {
        let mut content = AnamnesisContent::default();
        content.patient = snapshot_of(patient);
        content.treatment.procedure_name = Some(String::new());

        Self {
            mode: WizardMode::New,
            patient_id: patient.id.clone(),
            step: WizardStep::PatientData,
            content,
            teeth: ToothSelection::new(),
        }
    }

    /// Load an existing anamnesis for editing.
    ///
    /// Patient fields missing from the record fall back to the patient row.
    pub fn edit(patient: &Patient, record: &ClinicalRecord) -> WizardResult<Self> {
        if record.kind != RecordKind::Anamnesis {
            return Err(WizardError::NotAnamnesis(record.id.clone()));
        }
        if record.patient_id != patient.id {
            return Err(WizardError::WrongPatient {
                record_id: record.id.clone(),
                patient_id: patient.id.clone(),
            });
        }

        let fallback = snapshot_of(patient);
        let content = match record.anamnesis() {
            Some(mut content) => {
                let stored = &mut content.patient;
                if stored.name.is_empty() {
                    stored.name = fallback.name;
                }
                fill_blank(&mut stored.birth_date, fallback.birth_date);
                fill_blank(&mut stored.document_id, fallback.document_id);
                fill_blank(&mut stored.phone, fallback.phone);
                fill_blank(&mut stored.email, fallback.email);
                content.medical.blood_type = content
                    .medical
                    .blood_type
                    .filter(|b| !b.trim().is_empty());
                content
            }
            None => AnamnesisContent {
                patient: fallback,
                ..Default::default()
            },
        };
        let teeth = ToothSelection::parse(&content.treatment.selected_teeth);

        Ok(Self {
            mode: WizardMode::Edit {
                record_id: record.id.clone(),
            },
            patient_id: patient.id.clone(),
            step: WizardStep::PatientData,
            content,
            teeth,
        })
    }

    pub fn mode(&self) -> &WizardMode {
        &self.mode
    }

    pub fn steps(&self) -> &'static [WizardStep] {
        match self.mode {
            WizardMode::New => &NEW_STEPS,
            WizardMode::Edit { .. } => &EDIT_STEPS,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_first_step(&self) -> bool {
        self.step_index() == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index() + 1 == self.steps().len()
    }

    fn step_index(&self) -> usize {
        self.steps().iter().position(|s| *s == self.step).unwrap_or(0)
    }

    /// Advance one step. Returns false on the last step.
    pub fn next(&mut self) -> bool {
        let idx = self.step_index();
        match self.steps().get(idx + 1) {
            Some(step) => {
                self.step = *step;
                true
            }
            None => false,
        }
    }

    /// Go back one step. Returns false on the first step.
    pub fn back(&mut self) -> bool {
        let idx = self.step_index();
        if idx == 0 {
            return false;
        }
        self.step = self.steps()[idx - 1];
        true
    }

    /// Editable patient fields.
    pub fn patient_mut(&mut self) -> &mut PatientSnapshot {
        &mut self.content.patient
    }

    pub fn patient(&self) -> &PatientSnapshot {
        &self.content.patient
    }

    pub fn set_referral_source(&mut self, source: Option<ReferralSource>) {
        self.content.patient.referral_source = source.map(|s| s.as_str().to_string());
    }

    /// Answer a checklist question.
    pub fn set_condition(&mut self, id: &str, checked: bool) -> WizardResult<()> {
        let condition =
            medical_condition(id).ok_or_else(|| WizardError::UnknownCondition(id.to_string()))?;
        self.content
            .medical
            .conditions
            .insert(condition.id.to_string(), checked);
        Ok(())
    }

    pub fn has_condition(&self, id: &str) -> bool {
        self.content.medical.has(id)
    }

    pub fn set_blood_type(&mut self, blood_type: Option<BloodType>) {
        self.content.medical.blood_type = blood_type.map(|b| b.as_str().to_string());
    }

    pub fn set_procedure_name(&mut self, name: impl Into<String>) {
        self.content.treatment.procedure_name = Some(name.into());
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.content.treatment.notes = notes.into();
    }

    /// Toggle a tooth on the odontogram.
    pub fn toggle_tooth(&mut self, code: ToothCode) -> bool {
        self.teeth.toggle(code)
    }

    /// Replace the selection wholesale (odontogram change callback).
    pub fn set_teeth(&mut self, teeth: ToothSelection) {
        self.teeth = teeth;
    }

    pub fn teeth(&self) -> &ToothSelection {
        &self.teeth
    }

    pub fn accept_declaration(&mut self, accepted: bool) {
        self.content.signature.declaration_accepted = accepted;
    }

    pub fn declaration_accepted(&self) -> bool {
        self.content.signature.declaration_accepted
    }

    /// Document to store, stamped at `now`.
    pub fn build_content(&self, now: DateTime<Utc>) -> AnamnesisContent {
        let mut content = self.content.clone();
        let today = now.date_naive();

        content.patient.age = content
            .patient
            .birth_date
            .as_deref()
            .and_then(parse_date)
            .map(|birth| age_on(birth, today));
        content.treatment.selected_teeth = self.teeth.to_string();

        let stamp = now.to_rfc3339();
        match self.mode {
            WizardMode::New => {
                content.signature.created_at = Some(stamp);
                content.signature.updated_at = None;
            }
            WizardMode::Edit { .. } => content.signature.updated_at = Some(stamp),
        }
        content
    }

    /// Record title for a submission on `today`.
    pub fn title(&self, today: NaiveDate) -> String {
        let base = format!("Anamnese - {}", today.format("%d/%m/%Y"));
        match self.mode {
            WizardMode::New => base,
            WizardMode::Edit { .. } => format!("{} (Atualizada)", base),
        }
    }

    /// Save the form. Requires the declaration to be accepted.
    pub fn submit(&self, db: &Database, now: DateTime<Utc>) -> WizardResult<ClinicalRecord> {
        if !self.declaration_accepted() {
            return Err(WizardError::DeclarationNotAccepted);
        }

        let title = self.title(now.date_naive());
        let content = serde_json::to_value(self.build_content(now))?;

        match &self.mode {
            WizardMode::New => {
                let mut record = ClinicalRecord::new(
                    self.patient_id.clone(),
                    RecordKind::Anamnesis,
                    title,
                    content,
                );
                record.created_at = now.to_rfc3339();
                db.insert_record(&record).inspect_err(|e| {
                    tracing::error!(patient_id = %self.patient_id, error = %e, "Erro ao salvar anamnese");
                })?;
                tracing::info!(record_id = %record.id, "Saved anamnesis");
                Ok(record)
            }
            WizardMode::Edit { record_id } => {
                let updated = db.update_record(record_id, &title, &content).inspect_err(|e| {
                    tracing::error!(record_id = %record_id, error = %e, "Erro ao atualizar anamnese");
                })?;
                if !updated {
                    return Err(DbError::NotFound(record_id.clone()).into());
                }
                tracing::info!(record_id = %record_id, "Updated anamnesis");
                db.get_record(record_id)?
                    .ok_or_else(|| DbError::NotFound(record_id.clone()).into())
            }
        }
    }
}

fn snapshot_of(patient: &Patient) -> PatientSnapshot {
    PatientSnapshot {
        name: patient.full_name.clone(),
        birth_date: patient.birth_date.clone(),
        age: None,
        document_id: patient.document_id.clone(),
        phone: patient.contact_phone.clone(),
        email: patient.contact_email.clone(),
        referral_source: None,
    }
}

fn fill_blank(field: &mut Option<String>, fallback: Option<String>) {
    if field.as_deref().map_or(true, |s| s.trim().is_empty()) {
        *field = fallback;
    }
}
