//! Anamnesis wizard integration tests.

use chrono::{TimeZone, Utc};
use odonto_core::db::Database;
use odonto_core::export::{anamnesis_blocks, blocks_text, render_anamnesis_pdf};
use odonto_core::models::{AnamnesisContent, NewPatient, Patient, RecordKind, ReferralSource};
use odonto_core::odontogram::ToothCode;
use odonto_core::wizard::{AnamnesisWizard, WizardError, WizardStep};
use odonto_core::{
    open_database_in_memory, FfiAnamnesisForm, FfiNewPatient, FfiPatient, OdontoCore, OdontoError,
};

fn register(db: &Database) -> Patient {
    let patient = NewPatient {
        full_name: "Ana Lima".into(),
        document_id: "123.456.789-00".into(),
        contact_phone: "(11) 99999-0000".into(),
        contact_email: "ana@example.com".into(),
        birth_date: Some("2000-06-15".into()),
    }
    .into_patient()
    .unwrap();
    db.insert_patient(&patient).unwrap();
    patient
}

#[test]
fn test_new_anamnesis_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("clinic.db")).unwrap();
    let patient = register(&db);

    let mut wizard = AnamnesisWizard::new(&patient);
    assert_eq!(wizard.steps().len(), 3);
    wizard.set_referral_source(Some(ReferralSource::Instagram));
    assert!(wizard.next());
    wizard.set_condition("hipertensao", true).unwrap();
    assert!(wizard.next());
    assert_eq!(wizard.step(), WizardStep::Treatment);
    assert!(wizard.is_last_step());
    wizard.set_procedure_name("Canal");
    wizard.toggle_tooth(ToothCode::raw(36));
    wizard.toggle_tooth(ToothCode::raw(11));
    wizard.set_notes("Dor ao mastigar");

    let submitted = Utc.with_ymd_and_hms(2024, 6, 14, 9, 30, 0).unwrap();
    assert!(matches!(
        wizard.submit(&db, submitted),
        Err(WizardError::DeclarationNotAccepted)
    ));
    wizard.accept_declaration(true);
    let record = wizard.submit(&db, submitted).unwrap();
    assert_eq!(record.title, "Anamnese - 14/06/2024");

    drop(db);
    let db = Database::open(dir.path().join("clinic.db")).unwrap();
    let stored = db.get_record(&record.id).unwrap().unwrap();
    assert_eq!(stored.kind, RecordKind::Anamnesis);

    let content = stored.anamnesis().unwrap();
    assert_eq!(content.patient.age, Some(23));
    assert_eq!(content.treatment.selected_teeth, "36, 11");
    assert_eq!(content.treatment.procedure_name.as_deref(), Some("Canal"));
    assert!(content.medical.has("hipertensao"));
    assert!(content.signature.declaration_accepted);

    let text = blocks_text(&anamnesis_blocks(&content, "Clínica", submitted));
    assert!(text.contains("COMO NOS CONHECEU: Instagram"));
    assert!(text.contains("[X] Hipertensão?"));
    assert!(text.contains("Procedimento: Canal"));

    let pdf = render_anamnesis_pdf(&stored, "Clínica", submitted).unwrap();
    assert_eq!(pdf.file_name, "anamnese_Ana_Lima_2024-06-14.pdf");
}

#[test]
fn test_edit_keeps_creation_stamp() {
    let db = Database::open_in_memory().unwrap();
    let patient = register(&db);

    let mut wizard = AnamnesisWizard::new(&patient);
    wizard.toggle_tooth(ToothCode::raw(21));
    wizard.accept_declaration(true);
    let created = Utc.with_ymd_and_hms(2024, 6, 14, 9, 0, 0).unwrap();
    let record = wizard.submit(&db, created).unwrap();

    let mut edit = AnamnesisWizard::edit(&patient, &record).unwrap();
    assert_eq!(edit.steps().len(), 4);
    assert_eq!(edit.teeth().to_string(), "21");
    edit.toggle_tooth(ToothCode::raw(22));
    edit.set_condition("diabetes", true).unwrap();
    while edit.next() {}
    assert_eq!(edit.step(), WizardStep::Confirm);

    let updated_at = Utc.with_ymd_and_hms(2024, 7, 1, 15, 0, 0).unwrap();
    let updated = edit.submit(&db, updated_at).unwrap();

    assert_eq!(updated.id, record.id);
    assert_eq!(updated.title, "Anamnese - 01/07/2024 (Atualizada)");
    let content = updated.anamnesis().unwrap();
    assert_eq!(content.treatment.selected_teeth, "21, 22");
    assert_eq!(
        content.signature.created_at.as_deref(),
        Some(created.to_rfc3339().as_str())
    );
    assert_eq!(
        content.signature.updated_at.as_deref(),
        Some(updated_at.to_rfc3339().as_str())
    );
    assert_eq!(db.list_records_for_patient(&patient.id, None).unwrap().len(), 1);
}

#[test]
fn test_unknown_condition_rejected() {
    let patient = Patient::new("Bruno".into());
    let mut wizard = AnamnesisWizard::new(&patient);
    assert!(matches!(
        wizard.set_condition("gripe", true),
        Err(WizardError::UnknownCondition(_))
    ));
}

fn register_via_core(core: &OdontoCore, name: &str, document_id: &str) -> FfiPatient {
    core.register_patient(FfiNewPatient {
        full_name: name.into(),
        document_id: document_id.into(),
        contact_phone: "(11) 97777-1234".into(),
        contact_email: "contato@example.com".into(),
        birth_date: Some("1990-03-02".into()),
    })
    .unwrap()
}

fn blank_form(patient_id: &str, record_id: Option<String>) -> FfiAnamnesisForm {
    FfiAnamnesisForm {
        patient_id: patient_id.into(),
        record_id,
        name: String::new(),
        birth_date: None,
        document_id: None,
        phone: None,
        email: None,
        referral_source: None,
        conditions: Vec::new(),
        blood_type: None,
        procedure_name: None,
        selected_teeth: Vec::new(),
        notes: String::new(),
        declaration_accepted: true,
    }
}

fn stored_content(core: &OdontoCore, record_id: &str) -> AnamnesisContent {
    let record = core.get_record(record_id.into()).unwrap().unwrap();
    serde_json::from_str(&record.content_json).unwrap()
}

#[test]
fn test_edit_with_other_patients_record_is_rejected() {
    let core = open_database_in_memory().unwrap();
    let ana = register_via_core(&core, "Ana Lima", "111.111.111-11");
    let bruno = register_via_core(&core, "Bruno Reis", "222.222.222-22");

    let mut form = blank_form(&ana.id, None);
    form.notes = "Consulta inicial".into();
    let record = core.save_anamnesis(form).unwrap();

    let mut hijack = blank_form(&bruno.id, Some(record.id.clone()));
    hijack.name = "Bruno Reis".into();
    hijack.notes = "Sobrescrito".into();
    assert!(matches!(
        core.save_anamnesis(hijack),
        Err(OdontoError::NotFound(_))
    ));

    let content = stored_content(&core, &record.id);
    assert_eq!(content.patient.name, "Ana Lima");
    assert_eq!(content.treatment.notes, "Consulta inicial");
    assert_eq!(core.get_record(record.id).unwrap().unwrap().patient_id, ana.id);
}

#[test]
fn test_edit_without_patient_fields_keeps_stored_values() {
    let core = open_database_in_memory().unwrap();
    let patient = register_via_core(&core, "Carla Dias", "333.333.333-33");

    let mut form = blank_form(&patient.id, None);
    form.phone = Some("(21) 95555-0000".into());
    let record = core.save_anamnesis(form).unwrap();

    let mut edit = blank_form(&patient.id, Some(record.id.clone()));
    edit.phone = Some("   ".into());
    edit.notes = "Retorno".into();
    core.save_anamnesis(edit).unwrap();

    let content = stored_content(&core, &record.id);
    assert_eq!(content.patient.name, "Carla Dias");
    assert_eq!(content.patient.phone.as_deref(), Some("(21) 95555-0000"));
    assert_eq!(content.patient.document_id.as_deref(), Some("333.333.333-33"));
    assert_eq!(content.patient.email.as_deref(), Some("contato@example.com"));
    assert_eq!(content.patient.birth_date.as_deref(), Some("1990-03-02"));
    assert_eq!(content.treatment.notes, "Retorno");
}
