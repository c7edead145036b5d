//! Anamnesis document.

use chrono::{DateTime, Utc};

use super::{
    anamnesis_file_name, format_date_br, format_generated_at, render_blocks, Block, PdfError,
    PdfFile, PdfResult, SignatureLine,
};
use crate::models::{
    AnamnesisContent, ClinicalRecord, ReferralSource, DECLARATION_TEXT, MEDICAL_CONDITIONS,
};

const EMPTY: &str = "-";

fn or_dash(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY)
        .to_string()
}

/// Lay out an anamnesis document.
pub fn anamnesis_blocks(
    content: &AnamnesisContent,
    clinic_name: &str,
    generated_at: DateTime<Utc>,
) -> Vec<Block> {
    let patient = &content.patient;

    let birth = match patient.birth_date.as_deref().and_then(format_date_br) {
        Some(date) => match patient.age {
            Some(age) => format!("{} ({} anos)", date, age),
            None => date,
        },
        None => EMPTY.to_string(),
    };
    let referral = patient
        .referral_source
        .as_deref()
        .map(|s| ReferralSource::parse(s).map_or(s, |r| r.label()));

    let mut blocks = vec![
        Block::Title {
            text: "Anamnese Odontológica".into(),
            subtitle: Some(clinic_name.to_string()),
        },
        Block::Heading("Dados do Paciente".into()),
        Block::field("NOME", or_dash(Some(&patient.name))),
        Block::field("DATA NASCIMENTO", birth),
        Block::field("CPF", or_dash(patient.document_id.as_deref())),
        Block::field("TELEFONE", or_dash(patient.phone.as_deref())),
        Block::field("EMAIL", or_dash(patient.email.as_deref())),
        Block::field("COMO NOS CONHECEU", or_dash(referral)),
        Block::Heading("Avaliação Médica".into()),
        Block::Checklist(
            MEDICAL_CONDITIONS
                .iter()
                .map(|c| (c.label.to_string(), content.medical.has(c.id)))
                .collect(),
        ),
        Block::field("Tipo Sanguíneo", or_dash(content.medical.blood_type.as_deref())),
        Block::Heading("Tratamento".into()),
    ];

    if let Some(procedure) = content
        .treatment
        .procedure_name
        .as_deref()
        .filter(|p| !p.trim().is_empty())
    {
        blocks.push(Block::field("Procedimento", procedure));
    }
    blocks.push(Block::field(
        "Dentes selecionados",
        or_dash(Some(&content.treatment.selected_teeth)),
    ));
    if !content.treatment.notes.trim().is_empty() {
        blocks.push(Block::Paragraph(format!("Observações: {}", content.treatment.notes)));
    }

    let signed = content
        .signature
        .created_at
        .as_deref()
        .or(content.signature.updated_at.as_deref())
        .and_then(format_date_br)
        .unwrap_or_else(|| EMPTY.to_string());

    blocks.extend([
        Block::Spacer(4.0),
        Block::Paragraph(DECLARATION_TEXT.into()),
        Block::Signatures(vec![
            SignatureLine {
                name: "Assinatura do Paciente".into(),
                role: None,
            },
            SignatureLine {
                name: format!("Data: {}", signed),
                role: None,
            },
        ]),
        Block::Footer(format!(
            "Documento gerado em {}",
            format_generated_at(generated_at)
        )),
    ]);
    blocks
}

/// Render a stored anamnesis record.
///
/// Records without patient data cannot be printed.
pub fn render_anamnesis_pdf(
    record: &ClinicalRecord,
    clinic_name: &str,
    generated_at: DateTime<Utc>,
) -> PdfResult<PdfFile> {
    let content = record.anamnesis().ok_or(PdfError::MissingPatientData)?;

    let blocks = anamnesis_blocks(&content, clinic_name, generated_at);
    let bytes = render_blocks("Anamnese Odontológica", &blocks)?;

    Ok(PdfFile {
        file_name: anamnesis_file_name(&content.patient.name, generated_at.date_naive()),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::blocks_text;
    use crate::models::RecordKind;
    use chrono::TimeZone;
    use serde_json::json;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 16, 0, 0).unwrap()
    }

    fn sample_record() -> ClinicalRecord {
        ClinicalRecord::new(
            "p-1".into(),
            RecordKind::Anamnesis,
            "Anamnese - 14/06/2024".into(),
            json!({
                "dadosPaciente": {
                    "nome": "Ana Lima",
                    "dataNascimento": "2000-06-15",
                    "idade": 23,
                    "cpf": "123.456.789-00",
                    "comoConheceu": "indicacao"
                },
                "avaliacaoMedica": { "diabetes": true, "tipoSanguineo": "O+" },
                "tratamento": { "dentesSelec": "11, 21", "observacoes": "Sensibilidade ao frio" },
                "assinatura": { "declaracaoAceita": true, "dataCriacao": "2024-06-14T10:00:00Z" }
            }),
        )
    }

    #[test]
    fn test_blocks_content() {
        let content = sample_record().anamnesis().unwrap();
        let text = blocks_text(&anamnesis_blocks(&content, "Sorriso Feliz", generated_at()));

        assert!(text.contains("Sorriso Feliz"));
        assert!(text.contains("NOME: Ana Lima"));
        assert!(text.contains("DATA NASCIMENTO: 15/06/2000 (23 anos)"));
        assert!(text.contains("TELEFONE: -"));
        assert!(text.contains("COMO NOS CONHECEU: Indicação"));
        assert!(text.contains("[X] Diabetes?"));
        assert!(text.contains("[ ] Hepatite?"));
        assert!(text.contains("Tipo Sanguíneo: O+"));
        assert!(text.contains("Dentes selecionados: 11, 21"));
        assert!(text.contains("Observações: Sensibilidade ao frio"));
        assert!(text.contains("Data: 14/06/2024"));
        assert!(text.contains("Documento gerado em 14/06/2024 às 16:00:00"));
    }

    #[test]
    fn test_checklist_lists_every_condition() {
        let content = sample_record().anamnesis().unwrap();
        let blocks = anamnesis_blocks(&content, "X", generated_at());
        let checklist = blocks
            .iter()
            .find_map(|b| match b {
                Block::Checklist(items) => Some(items),
                _ => None,
            })
            .unwrap();
        assert_eq!(checklist.len(), 25);
        assert_eq!(checklist.iter().filter(|(_, checked)| *checked).count(), 1);
    }

    #[test]
    fn test_render_file() {
        let file = render_anamnesis_pdf(&sample_record(), "Clínica", generated_at()).unwrap();
        assert_eq!(file.file_name, "anamnese_Ana_Lima_2024-06-14.pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_record_without_patient_data() {
        let record = ClinicalRecord::new(
            "p-1".into(),
            RecordKind::Anamnesis,
            "Antiga".into(),
            json!({ "notes": "texto livre" }),
        );
        let err = render_anamnesis_pdf(&record, "Clínica", generated_at()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Este registro não possui dados completos para gerar PDF."
        );
    }
}
