//! Anamnesis (clinical intake) document models.
//!
//! The document is stored as a single JSON value in `clinical_records.content`.
//! Field names on the wire are the ones the clinic's records were first
//! written with, so existing rows keep deserializing.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A yes/no medical condition asked on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedicalCondition {
    /// Key stored in `avaliacaoMedica`
    pub id: &'static str,
    /// Question shown to the patient
    pub label: &'static str,
}

/// The fixed checklist, in display order.
pub const MEDICAL_CONDITIONS: [MedicalCondition; 25] = [
    MedicalCondition { id: "tratamento_medico", label: "Tratamento médico?" },
    MedicalCondition { id: "cirurgia_recente", label: "Cirurgia recente?" },
    MedicalCondition { id: "problema_pele", label: "Problema de pele?" },
    MedicalCondition { id: "doenca_infectocontagiosa", label: "Doença infectocontagiosa?" },
    MedicalCondition { id: "cancer", label: "Câncer?" },
    MedicalCondition { id: "disturbio_circulatorio", label: "Distúrbio circulatório?" },
    MedicalCondition { id: "uso_drogas", label: "Uso de drogas?" },
    MedicalCondition { id: "efeito_alcool", label: "Sob efeito de álcool?" },
    MedicalCondition { id: "dormiu_ontem", label: "Dormiu bem ontem?" },
    MedicalCondition { id: "em_jejum", label: "Em jejum?" },
    MedicalCondition { id: "anemia", label: "Anemia?" },
    MedicalCondition { id: "queloide", label: "Quelóide?" },
    MedicalCondition { id: "vitiligo", label: "Vitiligo?" },
    MedicalCondition { id: "diabetes", label: "Diabetes?" },
    MedicalCondition { id: "alergia_medicamentos", label: "Alergia a medicamentos?" },
    MedicalCondition { id: "depressao_ansiedade", label: "Depressão/ansiedade?" },
    MedicalCondition { id: "convulsoes_epilepsia", label: "Convulsões/epilepsia?" },
    MedicalCondition { id: "cardiopatia", label: "Cardiopatia?" },
    MedicalCondition { id: "hipertensao", label: "Hipertensão?" },
    MedicalCondition { id: "hipotensao", label: "Hipotensão?" },
    MedicalCondition { id: "marcapasso", label: "Marcapasso?" },
    MedicalCondition { id: "hemofilia", label: "Hemofilia?" },
    MedicalCondition { id: "hepatite", label: "Hepatite?" },
    MedicalCondition { id: "gestante", label: "Gestante?" },
    MedicalCondition { id: "amamentando", label: "Amamentando?" },
];

/// Look up a checklist entry by its stored key.
pub fn medical_condition(id: &str) -> Option<&'static MedicalCondition> {
    MEDICAL_CONDITIONS.iter().find(|c| c.id == id)
}

/// ABO/Rh blood type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("Unknown blood type: {}", s))
    }
}

/// How the patient found the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralSource {
    Instagram,
    Facebook,
    Google,
    Referral,
    WalkIn,
    Other,
}

impl ReferralSource {
    pub const ALL: [ReferralSource; 6] = [
        ReferralSource::Instagram,
        ReferralSource::Facebook,
        ReferralSource::Google,
        ReferralSource::Referral,
        ReferralSource::WalkIn,
        ReferralSource::Other,
    ];

    /// Stored key.
    pub fn as_str(self) -> &'static str {
        match self {
            ReferralSource::Instagram => "instagram",
            ReferralSource::Facebook => "facebook",
            ReferralSource::Google => "google",
            ReferralSource::Referral => "indicacao",
            ReferralSource::WalkIn => "passando_frente",
            ReferralSource::Other => "outro",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ReferralSource::Instagram => "Instagram",
            ReferralSource::Facebook => "Facebook",
            ReferralSource::Google => "Google",
            ReferralSource::Referral => "Indicação",
            ReferralSource::WalkIn => "Passando em frente",
            ReferralSource::Other => "Outro",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        ReferralSource::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

/// Full anamnesis document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnamnesisContent {
    #[serde(rename = "dadosPaciente")]
    pub patient: PatientSnapshot,
    #[serde(rename = "avaliacaoMedica", default)]
    pub medical: MedicalEvaluation,
    #[serde(rename = "tratamento", default)]
    pub treatment: Treatment,
    #[serde(rename = "assinatura", default)]
    pub signature: Signature,
}

/// Patient data as captured at intake time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientSnapshot {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "dataNascimento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "idade", default)]
    pub age: Option<i32>,
    #[serde(rename = "cpf", default)]
    pub document_id: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "email", default)]
    pub email: Option<String>,
    #[serde(rename = "comoConheceu", default)]
    pub referral_source: Option<String>,
}

/// Condition checklist plus blood type, stored as one flat object.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MedicalEvaluation {
    #[serde(rename = "tipoSanguineo", default, skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(flatten)]
    pub conditions: BTreeMap<String, bool>,
}

impl MedicalEvaluation {
    pub fn has(&self, id: &str) -> bool {
        self.conditions.get(id).copied().unwrap_or(false)
    }

    /// Checklist entries answered "yes", in checklist order.
    pub fn checked(&self) -> Vec<&'static MedicalCondition> {
        MEDICAL_CONDITIONS.iter().filter(|c| self.has(c.id)).collect()
    }
}

/// Treatment section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    #[serde(rename = "nomeProcedimento", default, skip_serializing_if = "Option::is_none")]
    pub procedure_name: Option<String>,
    /// Comma separated FDI codes, e.g. `"11, 21, 36"`
    #[serde(rename = "dentesSelec", default)]
    pub selected_teeth: String,
    #[serde(rename = "observacoes", default)]
    pub notes: String,
}

/// Signed declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Signature {
    #[serde(rename = "declaracaoAceita", default)]
    pub declaration_accepted: bool,
    #[serde(rename = "dataCriacao", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "dataAtualizacao", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Declaration text printed above the signature.
pub const DECLARATION_TEXT: &str = "Declaro que as informações acima prestadas são verdadeiras e assumo total responsabilidade pelas mesmas, estando ciente de que a omissão de qualquer informação pode comprometer o meu tratamento.";
