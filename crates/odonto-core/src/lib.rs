//! Odonto Core Library
//!
//! Dental-clinic records, odontogram selection and treatment budgets, shared
//! by the clinic's UI shells.
//!
//! # Architecture
//!
//! ```text
//!   Patient list ──► Patient page ──┬──► Anamnesis wizard ──► clinical_records
//!                                   │         (odontogram)
//!                                   ├──► Certificate ───────► clinical_records
//!                                   │
//!                                   └──► Budget builder ────► budgets
//!                                          (ledger, conditions,
//!                                           favorites)     ───► text_presets
//!
//!   clinical_records / budgets ──► PDF export ──► bytes + file name
//! ```
//!
//! Every operation is a single synchronous read or write against the store.
//!
//! # Modules
//!
//! - [`db`]: SQLite store, one `impl Database` block per table
//! - [`models`]: Patient, ClinicalRecord, AnamnesisContent, Budget, Preset
//! - [`odontogram`]: FDI tooth codes, shapes, chart layout and selection
//! - [`wizard`]: New/edit anamnesis form state
//! - [`budget`]: Item ledger, condition list and budget drafts
//! - [`presets`]: Favorites with optimistic add/remove
//! - [`export`]: Anamnesis and budget PDFs
//! - [`config`], [`logging`], [`navigation`]: Host-facing setup

pub mod budget;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod odontogram;
pub mod presets;
pub mod wizard;

// Re-export commonly used types
pub use budget::{BudgetDraft, BudgetLedger, ConditionList, LedgerError, NewItemInput};
pub use config::{ClinicConfig, ConfigError, Professional};
pub use db::{Database, DbError};
pub use export::{PdfError, PdfFile};
pub use logging::init_logging;
pub use models::{
    AnamnesisContent, Budget, BudgetItem, BudgetStatus, ClinicalRecord, NewPatient, Patient,
    PatientError, Preset, RecordKind,
};
pub use odontogram::{Odontogram, ToothCode, ToothSelection, ToothShape};
pub use presets::{PresetBackend, PresetError, PresetStore};
pub use wizard::{AnamnesisWizard, WizardError, WizardStep};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::Utc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum OdontoError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Document error: {0}")]
    Document(String),
}

impl From<DbError> for OdontoError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(id) => OdontoError::NotFound(id),
            DbError::Json(e) => OdontoError::SerializationError(e.to_string()),
            other => OdontoError::DatabaseError(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for OdontoError {
    fn from(e: serde_json::Error) -> Self {
        OdontoError::SerializationError(e.to_string())
    }
}

impl From<LedgerError> for OdontoError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Db(e) => e.into(),
            other => OdontoError::InvalidInput(other.to_string()),
        }
    }
}

impl From<WizardError> for OdontoError {
    fn from(e: WizardError) -> Self {
        match e {
            WizardError::Db(e) => e.into(),
            WizardError::Json(e) => e.into(),
            WizardError::WrongPatient { record_id, .. } => {
                OdontoError::NotFound(format!("record {}", record_id))
            }
            other => OdontoError::InvalidInput(other.to_string()),
        }
    }
}

impl From<PresetError> for OdontoError {
    fn from(e: PresetError) -> Self {
        match e {
            PresetError::Store(e) => e.into(),
            other => OdontoError::DatabaseError(other.to_string()),
        }
    }
}

impl From<PdfError> for OdontoError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::MissingPatientData => OdontoError::InvalidInput(e.to_string()),
            PdfError::Render(msg) => OdontoError::Document(msg),
        }
    }
}

impl From<PatientError> for OdontoError {
    fn from(e: PatientError) -> Self {
        let PatientError::Invalid(fields) = &e;
        let details = fields
            .iter()
            .map(|f| format!("{}: {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        OdontoError::InvalidInput(format!("{} {}", e, details))
    }
}

impl From<ConfigError> for OdontoError {
    fn from(e: ConfigError) -> Self {
        OdontoError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for OdontoError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        OdontoError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

fn core_with(db: Database, config: ClinicConfig) -> Arc<OdontoCore> {
    Arc::new(OdontoCore {
        db: Arc::new(Mutex::new(db)),
        config,
    })
}

/// Open or create a database at the given path with default settings.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<OdontoCore>, OdontoError> {
    let db = Database::open(&path)?;
    Ok(core_with(db, ClinicConfig::default()))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<OdontoCore>, OdontoError> {
    let db = Database::open_in_memory()?;
    Ok(core_with(db, ClinicConfig::default()))
}

/// Open the store and settings described by the environment.
#[uniffi::export]
pub fn open_from_env() -> Result<Arc<OdontoCore>, OdontoError> {
    let config = ClinicConfig::from_env()?;
    let db = match &config.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    Ok(core_with(db, config))
}

/// Install the log subscriber. Safe to call more than once.
#[uniffi::export]
pub fn setup_logging() -> bool {
    init_logging()
}

/// Sum of discounted item values.
#[uniffi::export]
pub fn calculate_budget_total(items: Vec<FfiBudgetItem>) -> f64 {
    let items: Vec<BudgetItem> = items.into_iter().map(Into::into).collect();
    models::calculate_total(&items)
}

/// Name and outline of a tooth. Unknown codes get the default molar outline.
#[uniffi::export]
pub fn tooth_info(code: u8) -> FfiToothInfo {
    ToothCode::raw(code).into()
}

/// Toggle `code` in a selection, returning the new selection.
#[uniffi::export]
pub fn toggle_tooth(selected: Vec<u8>, code: u8) -> Vec<u8> {
    let mut selection: ToothSelection = selected.into_iter().map(ToothCode::raw).collect();
    selection.toggle(ToothCode::raw(code));
    selection.codes().iter().map(|c| c.value()).collect()
}

/// Standalone SVG of the chart with `selected` highlighted.
#[uniffi::export]
pub fn render_odontogram_svg(selected: Vec<u8>) -> String {
    let selection: ToothSelection = selected.into_iter().map(ToothCode::raw).collect();
    Odontogram::new(selection).render_svg()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct OdontoCore {
    db: Arc<Mutex<Database>>,
    config: ClinicConfig,
}

impl OdontoCore {
    fn require_patient(db: &Database, patient_id: &str) -> Result<Patient, OdontoError> {
        db.get_patient(patient_id)?
            .ok_or_else(|| OdontoError::NotFound(format!("patient {}", patient_id)))
    }
}

#[uniffi::export]
impl OdontoCore {
    pub fn clinic_name(&self) -> String {
        self.config.clinic_name.clone()
    }

    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Validate the registration form and insert the patient.
    pub fn register_patient(&self, form: FfiNewPatient) -> Result<FfiPatient, OdontoError> {
        let patient = NewPatient::from(form).into_patient()?;
        let db = self.db.lock()?;
        db.insert_patient(&patient).inspect_err(|e| {
            tracing::error!(error = %e, "Erro ao cadastrar paciente");
        })?;
        Ok(patient.into())
    }

    /// All patients, newest first.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, OdontoError> {
        let db = self.db.lock()?;
        let patients = db.list_patients()?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, OdontoError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&id)?;
        Ok(patient.map(|p| p.into()))
    }

    /// Search patients by name.
    pub fn search_patients(&self, query: String, limit: u32) -> Result<Vec<FfiPatient>, OdontoError> {
        let db = self.db.lock()?;
        let patients = db.search_patients(&query, limit as usize)?;
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Clinical Record Operations
    // =========================================================================

    /// Records of a patient, newest first, optionally of one kind
    /// (`anamnesis`, `certificate`, `exam_upload`).
    pub fn list_records(
        &self,
        patient_id: String,
        kind: Option<String>,
    ) -> Result<Vec<FfiClinicalRecord>, OdontoError> {
        let kind = kind
            .map(|k| {
                RecordKind::parse(&k)
                    .ok_or_else(|| OdontoError::InvalidInput(format!("Unknown record kind: {}", k)))
            })
            .transpose()?;
        let db = self.db.lock()?;
        let records = db.list_records_for_patient(&patient_id, kind)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub fn get_record(&self, id: String) -> Result<Option<FfiClinicalRecord>, OdontoError> {
        let db = self.db.lock()?;
        let record = db.get_record(&id)?;
        Ok(record.map(|r| r.into()))
    }

    /// Create a certificate (atestado) from a title and free-text notes.
    pub fn create_certificate(
        &self,
        patient_id: String,
        title: String,
        notes: String,
    ) -> Result<FfiClinicalRecord, OdontoError> {
        if title.trim().is_empty() {
            return Err(OdontoError::InvalidInput("Informe o título do atestado.".into()));
        }
        let db = self.db.lock()?;
        let record = ClinicalRecord::certificate(patient_id, title, notes);
        db.insert_record(&record).inspect_err(|e| {
            tracing::error!(error = %e, "Erro ao criar prontuário");
        })?;
        Ok(record.into())
    }

    // =========================================================================
    // Anamnesis Operations
    // =========================================================================

    /// Save a completed anamnesis form. A form with `record_id` rewrites
    /// that record; otherwise a new record is created.
    pub fn save_anamnesis(
        &self,
        form: FfiAnamnesisForm,
    ) -> Result<FfiClinicalRecord, OdontoError> {
        let db = self.db.lock()?;
        let patient = Self::require_patient(&db, &form.patient_id)?;

        let mut wizard = match &form.record_id {
            Some(record_id) => {
                let record = db
                    .get_record(record_id)?
                    .ok_or_else(|| OdontoError::NotFound(format!("record {}", record_id)))?;
                AnamnesisWizard::edit(&patient, &record)?
            }
            None => AnamnesisWizard::new(&patient),
        };
        form.apply(&mut wizard)?;

        let record = wizard.submit(&db, Utc::now())?;
        Ok(record.into())
    }

    // =========================================================================
    // Budget Operations
    // =========================================================================

    /// Build and save an itemized budget. `conditions` replaces the default
    /// condition list when given.
    pub fn create_budget(
        &self,
        patient_id: String,
        items: Vec<FfiBudgetItemInput>,
        conditions: Option<Vec<String>>,
    ) -> Result<FfiBudget, OdontoError> {
        let now = Utc::now();
        let mut draft = BudgetDraft::new(
            patient_id,
            now.date_naive(),
            self.config.budget_validity_days,
        );
        for item in items {
            draft.ledger.add_item(item.into())?;
        }
        if let Some(conditions) = conditions {
            draft.conditions = ConditionList::empty();
            for condition in &conditions {
                draft.conditions.add(condition);
            }
        }

        let db = self.db.lock()?;
        let budget = draft.submit(&db, now)?;
        Ok(budget.into())
    }

    /// Save a budget holding only a total and a status.
    pub fn create_quick_budget(
        &self,
        patient_id: String,
        total_value: f64,
        status: String,
    ) -> Result<FfiBudget, OdontoError> {
        let status = parse_status(&status)?;
        let db = self.db.lock()?;
        let budget = budget::quick_budget(&db, &patient_id, total_value, status).inspect_err(|e| {
            tracing::error!(error = %e, "Erro ao criar orçamento");
        })?;
        Ok(budget.into())
    }

    /// Budgets of a patient, newest first.
    pub fn list_budgets(&self, patient_id: String) -> Result<Vec<FfiBudget>, OdontoError> {
        let db = self.db.lock()?;
        let budgets = db.list_budgets_for_patient(&patient_id)?;
        Ok(budgets.into_iter().map(|b| b.into()).collect())
    }

    pub fn update_budget_status(&self, id: String, status: String) -> Result<(), OdontoError> {
        let status = parse_status(&status)?;
        let db = self.db.lock()?;
        if !db.update_budget_status(&id, status)? {
            return Err(OdontoError::NotFound(format!("budget {}", id)));
        }
        Ok(())
    }

    // =========================================================================
    // Preset Operations
    // =========================================================================

    /// Presets of a category, oldest first.
    pub fn list_presets(&self, category: String) -> Result<Vec<FfiPreset>, OdontoError> {
        let db = self.db.lock()?;
        let presets = db.list_presets(&category)?;
        Ok(presets.into_iter().map(|p| p.into()).collect())
    }

    /// Add a preset and return the category's updated list.
    pub fn add_preset(
        &self,
        category: String,
        content: String,
    ) -> Result<Vec<FfiPreset>, OdontoError> {
        let db = self.db.lock()?;
        let mut store = PresetStore::load(category, &*db)?;
        store.add(&*db, &content)?;
        Ok(store.presets().iter().cloned().map(|p| p.into()).collect())
    }

    /// Remove a preset and return the category's updated list.
    pub fn remove_preset(
        &self,
        category: String,
        id: String,
    ) -> Result<Vec<FfiPreset>, OdontoError> {
        let db = self.db.lock()?;
        let mut store = PresetStore::load(category, &*db)?;
        store.remove(&*db, &id)?;
        Ok(store.presets().iter().cloned().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Anamnesis PDF for a stored record.
    pub fn export_anamnesis_pdf(&self, record_id: String) -> Result<FfiPdfFile, OdontoError> {
        let db = self.db.lock()?;
        let record = db
            .get_record(&record_id)?
            .ok_or_else(|| OdontoError::NotFound(format!("record {}", record_id)))?;
        let file = export::render_anamnesis_pdf(&record, &self.config.clinic_name, Utc::now())
            .inspect_err(|e| tracing::error!(record_id = %record_id, error = %e, "Erro ao gerar PDF"))?;
        Ok(file.into())
    }

    /// Budget PDF for a stored budget.
    pub fn export_budget_pdf(&self, budget_id: String) -> Result<FfiPdfFile, OdontoError> {
        let db = self.db.lock()?;
        let budget = db
            .get_budget(&budget_id)?
            .ok_or_else(|| OdontoError::NotFound(format!("budget {}", budget_id)))?;
        let patient = Self::require_patient(&db, &budget.patient_id)?;
        let file = export::render_budget_pdf(
            &budget,
            &patient,
            &self.config.clinic_name,
            &self.config.professional,
            Utc::now(),
        )
        .inspect_err(|e| tracing::error!(budget_id = %budget_id, error = %e, "Erro ao gerar PDF"))?;
        Ok(file.into())
    }
}

fn parse_status(status: &str) -> Result<BudgetStatus, OdontoError> {
    BudgetStatus::parse(status)
        .ok_or_else(|| OdontoError::InvalidInput(format!("Unknown budget status: {}", status)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub full_name: String,
    pub document_id: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub birth_date: Option<String>,
    pub created_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            full_name: patient.full_name,
            document_id: patient.document_id,
            contact_phone: patient.contact_phone,
            contact_email: patient.contact_email,
            birth_date: patient.birth_date,
            created_at: patient.created_at,
        }
    }
}

/// FFI-safe registration form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub full_name: String,
    pub document_id: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub birth_date: Option<String>,
}

impl From<FfiNewPatient> for NewPatient {
    fn from(form: FfiNewPatient) -> Self {
        NewPatient {
            full_name: form.full_name,
            document_id: form.document_id,
            contact_phone: form.contact_phone,
            contact_email: form.contact_email,
            birth_date: form.birth_date,
        }
    }
}

/// FFI-safe clinical record. `content_json` is the stored document.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalRecord {
    pub id: String,
    pub patient_id: String,
    pub kind: String,
    pub title: String,
    pub summary: String,
    pub content_json: String,
    pub created_at: String,
}

impl From<ClinicalRecord> for FfiClinicalRecord {
    fn from(record: ClinicalRecord) -> Self {
        Self {
            summary: record.summary(),
            content_json: record.content.to_string(),
            id: record.id,
            patient_id: record.patient_id,
            kind: record.kind.as_str().to_string(),
            title: record.title,
            created_at: record.created_at,
        }
    }
}

/// FFI-safe anamnesis form submission.
///
/// Blank or absent patient fields keep the values already on file.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAnamnesisForm {
    pub patient_id: String,
    /// Set when editing an existing record
    pub record_id: Option<String>,
    pub name: String,
    pub birth_date: Option<String>,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub referral_source: Option<String>,
    /// Checked condition ids
    pub conditions: Vec<String>,
    pub blood_type: Option<String>,
    pub procedure_name: Option<String>,
    pub selected_teeth: Vec<u8>,
    pub notes: String,
    pub declaration_accepted: bool,
}

impl FfiAnamnesisForm {
    fn apply(&self, wizard: &mut AnamnesisWizard) -> Result<(), OdontoError> {
        let blank_to_none = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());

        // Absent fields keep what the wizard already holds (patient row or
        // stored record).
        let patient = wizard.patient_mut();
        if !self.name.trim().is_empty() {
            patient.name = self.name.clone();
        }
        let fields = [
            (&mut patient.birth_date, &self.birth_date),
            (&mut patient.document_id, &self.document_id),
            (&mut patient.phone, &self.phone),
            (&mut patient.email, &self.email),
        ];
        for (slot, value) in fields {
            if let Some(value) = blank_to_none(value) {
                *slot = Some(value);
            }
        }

        let referral = match blank_to_none(&self.referral_source) {
            Some(key) => Some(models::ReferralSource::parse(&key).ok_or_else(|| {
                OdontoError::InvalidInput(format!("Unknown referral source: {}", key))
            })?),
            None => None,
        };
        wizard.set_referral_source(referral);

        let blood_type = blank_to_none(&self.blood_type)
            .map(|b| b.parse::<models::BloodType>())
            .transpose()
            .map_err(OdontoError::InvalidInput)?;
        wizard.set_blood_type(blood_type);

        for condition in models::MEDICAL_CONDITIONS {
            wizard.set_condition(condition.id, false)?;
        }
        for id in &self.conditions {
            wizard.set_condition(id, true)?;
        }

        if let Some(name) = &self.procedure_name {
            wizard.set_procedure_name(name.clone());
        }
        wizard.set_notes(self.notes.clone());
        wizard.set_teeth(self.selected_teeth.iter().copied().map(ToothCode::raw).collect());
        wizard.accept_declaration(self.declaration_accepted);
        Ok(())
    }
}

/// FFI-safe budget line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBudgetItem {
    pub id: String,
    pub procedure: String,
    pub tooth: String,
    pub value: f64,
    pub discount: f64,
    pub total: f64,
}

impl From<BudgetItem> for FfiBudgetItem {
    fn from(item: BudgetItem) -> Self {
        Self {
            total: item.total(),
            id: item.id,
            procedure: item.procedure,
            tooth: item.tooth,
            value: item.value,
            discount: item.discount,
        }
    }
}

impl From<FfiBudgetItem> for BudgetItem {
    fn from(item: FfiBudgetItem) -> Self {
        BudgetItem {
            id: item.id,
            procedure: item.procedure,
            tooth: item.tooth,
            value: item.value,
            discount: item.discount,
        }
    }
}

/// FFI-safe "add procedure" input. Missing fields are validated by the ledger.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBudgetItemInput {
    pub procedure: String,
    pub tooth: Option<String>,
    pub value: Option<f64>,
    pub discount: Option<f64>,
}

impl From<FfiBudgetItemInput> for NewItemInput {
    fn from(input: FfiBudgetItemInput) -> Self {
        NewItemInput {
            procedure: input.procedure,
            tooth: input.tooth.unwrap_or_default(),
            value: input.value,
            discount: input.discount,
        }
    }
}

/// FFI-safe budget.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBudget {
    pub id: String,
    pub patient_id: String,
    pub number: Option<String>,
    pub status: String,
    pub status_label: String,
    pub total_value: f64,
    pub items: Vec<FfiBudgetItem>,
    pub valid_until: Option<String>,
    pub conditions: Option<String>,
    pub created_at: String,
}

impl From<Budget> for FfiBudget {
    fn from(budget: Budget) -> Self {
        Self {
            id: budget.id,
            patient_id: budget.patient_id,
            number: budget.number,
            status: budget.status.as_str().to_string(),
            status_label: budget.status.label().to_string(),
            total_value: budget.total_value,
            items: budget.items.into_iter().map(|i| i.into()).collect(),
            valid_until: budget.valid_until,
            conditions: budget.conditions,
            created_at: budget.created_at,
        }
    }
}

/// FFI-safe preset.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPreset {
    pub id: String,
    pub category: String,
    pub content: String,
}

impl From<Preset> for FfiPreset {
    fn from(preset: Preset) -> Self {
        Self {
            id: preset.id,
            category: preset.category,
            content: preset.content,
        }
    }
}

/// FFI-safe tooth description.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiToothInfo {
    pub code: u8,
    pub valid: bool,
    pub name: Option<String>,
    pub shape: String,
    pub svg_path: String,
}

impl From<ToothCode> for FfiToothInfo {
    fn from(code: ToothCode) -> Self {
        let shape = code.shape();
        Self {
            code: code.value(),
            valid: code.is_valid(),
            name: code.name(),
            shape: format!("{:?}", shape),
            svg_path: shape.svg_path().to_string(),
        }
    }
}

/// FFI-safe rendered document.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPdfFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl From<PdfFile> for FfiPdfFile {
    fn from(file: PdfFile) -> Self {
        Self {
            file_name: file.file_name,
            bytes: file.bytes,
        }
    }
}
