//! Budget (orçamento) document.

use chrono::{DateTime, Utc};

use super::{
    budget_file_name, format_date_br, format_generated_at, render_blocks, Block, Column, PdfFile,
    PdfResult, SignatureLine,
};
use crate::budget::{format_brl, strip_bullet};
use crate::config::Professional;
use crate::models::{Budget, Patient};

const EMPTY: &str = "-";

const NO_CONDITIONS: &str = "Nenhuma condição específica definida.";

const DISCLAIMER: &str =
    "Este documento é uma proposta de tratamento odontológico e não constitui diagnóstico definitivo.";

fn item_columns() -> Vec<Column> {
    vec![
        Column { title: "Procedimento", x: 0.0, max_chars: 40 },
        Column { title: "Dente(s)", x: 75.0, max_chars: 14 },
        Column { title: "Valor", x: 100.0, max_chars: 14 },
        Column { title: "Desc.", x: 125.0, max_chars: 6 },
        Column { title: "Total", x: 140.0, max_chars: 16 },
    ]
}

fn or_dash(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(EMPTY)
        .to_string()
}

/// Printed total. Quick budgets carry no items, only the stored value.
fn document_total(budget: &Budget) -> f64 {
    if budget.items.is_empty() {
        budget.total_value
    } else {
        budget.items_total()
    }
}

/// Lay out a budget document.
pub fn budget_blocks(
    budget: &Budget,
    patient: &Patient,
    clinic_name: &str,
    professional: &Professional,
    generated_at: DateTime<Utc>,
) -> Vec<Block> {
    let date = format_date_br(&budget.created_at).unwrap_or_else(|| EMPTY.to_string());

    let rows = budget
        .items
        .iter()
        .map(|item| {
            let discount = if item.discount > 0.0 {
                format!("{}%", item.discount)
            } else {
                EMPTY.to_string()
            };
            vec![
                item.procedure.clone(),
                or_dash(Some(&item.tooth)),
                format_brl(item.value),
                discount,
                format_brl(item.total()),
            ]
        })
        .collect();

    let mut blocks = vec![
        Block::Header {
            left: clinic_name.to_string(),
            right: vec![
                "ORÇAMENTO".into(),
                format!("Nº {}", or_dash(budget.number.as_deref())),
                format!("Data: {}", date),
            ],
        },
        Block::Heading("DADOS DO PACIENTE".into()),
        Block::field("Nome", or_dash(Some(&patient.full_name))),
        Block::field("Telefone", or_dash(patient.contact_phone.as_deref())),
        Block::field("Email", or_dash(patient.contact_email.as_deref())),
        Block::field("CPF", or_dash(patient.document_id.as_deref())),
        Block::Heading("PROCEDIMENTOS".into()),
        Block::Table {
            columns: item_columns(),
            rows,
        },
        Block::Total {
            label: "VALOR TOTAL".into(),
            value: format_brl(document_total(budget)),
        },
        Block::Heading("CONDIÇÕES".into()),
    ];

    let conditions: Vec<Block> = budget
        .condition_lines()
        .into_iter()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(|line| Block::Bullet(line.to_string()))
        .collect();
    if conditions.is_empty() {
        blocks.push(Block::Paragraph(NO_CONDITIONS.into()));
    } else {
        blocks.extend(conditions);
    }

    let professional_name = if professional.name.trim().is_empty() {
        "Profissional Responsável".to_string()
    } else {
        professional.name.clone()
    };
    let registry = Some(professional.registry.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    blocks.extend([
        Block::Signatures(vec![
            SignatureLine {
                name: professional_name,
                role: registry,
            },
            SignatureLine {
                name: patient.full_name.clone(),
                role: Some("Paciente".into()),
            },
        ]),
        Block::Paragraph(DISCLAIMER.into()),
        Block::Footer(format!("Gerado em {}", format_generated_at(generated_at))),
    ]);
    blocks
}

/// Render a saved budget for its patient.
pub fn render_budget_pdf(
    budget: &Budget,
    patient: &Patient,
    clinic_name: &str,
    professional: &Professional,
    generated_at: DateTime<Utc>,
) -> PdfResult<PdfFile> {
    let blocks = budget_blocks(budget, patient, clinic_name, professional, generated_at);
    let bytes = render_blocks("Orçamento Odontológico", &blocks)?;
    let number = budget.number.as_deref().unwrap_or(EMPTY);

    Ok(PdfFile {
        file_name: budget_file_name(number, &patient.full_name),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::blocks_text;
    use crate::models::BudgetItem;
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 16, 0, 0).unwrap()
    }

    fn patient() -> Patient {
        let mut patient = Patient::new("João Simões".into());
        patient.contact_phone = Some("(11) 98888-7777".into());
        patient
    }

    fn budget(patient_id: &str) -> Budget {
        let mut budget = Budget::new(patient_id.to_string());
        budget.number = Some("18323200".into());
        budget.created_at = "2024-06-14T10:00:00+00:00".into();
        budget.items = vec![
            BudgetItem {
                id: "a".into(),
                procedure: "Restauração".into(),
                tooth: "11".into(),
                value: 100.0,
                discount: 10.0,
            },
            BudgetItem {
                id: "b".into(),
                procedure: "Limpeza".into(),
                tooth: "-".into(),
                value: 50.0,
                discount: 0.0,
            },
        ];
        budget.total_value = 140.0;
        budget.conditions = Some("• Pagamento à vista\n\n• Validade de 30 dias".into());
        budget
    }

    fn professional() -> Professional {
        Professional {
            name: "Dra. Paula Reis".into(),
            registry: "CRO-SP 12345".into(),
        }
    }

    #[test]
    fn test_blocks_content() {
        let patient = patient();
        let text = blocks_text(&budget_blocks(
            &budget(&patient.id),
            &patient,
            "Sorriso Feliz",
            &professional(),
            generated_at(),
        ));

        assert!(text.contains("Sorriso Feliz"));
        assert!(text.contains("Nº 18323200"));
        assert!(text.contains("Data: 14/06/2024"));
        assert!(text.contains("Nome: João Simões"));
        assert!(text.contains("Email: -"));
        assert!(text.contains("Restauração | 11 | R$ 100,00 | 10% | R$ 90,00"));
        assert!(text.contains("Limpeza | - | R$ 50,00 | - | R$ 50,00"));
        assert!(text.contains("VALOR TOTAL R$ 140,00"));
        assert!(text.contains("• Pagamento à vista"));
        assert!(text.contains("• Validade de 30 dias"));
        assert!(!text.contains("• •"));
        assert!(text.contains("CRO-SP 12345"));
        assert!(text.contains("Paciente"));
        assert!(text.contains(DISCLAIMER));
        assert!(text.contains("Gerado em 14/06/2024 às 16:00:00"));
    }

    #[test]
    fn test_without_conditions() {
        let patient = patient();
        let mut budget = budget(&patient.id);
        budget.conditions = None;
        let text = blocks_text(&budget_blocks(
            &budget,
            &patient,
            "X",
            &Professional::default(),
            generated_at(),
        ));
        assert!(text.contains(NO_CONDITIONS));
        assert!(text.contains("Profissional Responsável"));
    }

    #[test]
    fn test_quick_budget_prints_stored_total() {
        let patient = patient();
        let mut budget = Budget::new(patient.id.clone());
        budget.total_value = 350.0;
        let text = blocks_text(&budget_blocks(
            &budget,
            &patient,
            "X",
            &professional(),
            generated_at(),
        ));
        assert!(text.contains("VALOR TOTAL R$ 350,00"));
        assert!(text.contains("Nº -"));
    }

    #[test]
    fn test_render_file() {
        let patient = patient();
        let file = render_budget_pdf(
            &budget(&patient.id),
            &patient,
            "Clínica",
            &professional(),
            generated_at(),
        )
        .unwrap();
        assert_eq!(file.file_name, "orcamento_18323200_Joao_Simoes.pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
    }

}
