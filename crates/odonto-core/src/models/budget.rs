//! Budget (treatment quote) models.

use serde::{Deserialize, Serialize};

/// Budget lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Being prepared
    #[default]
    Draft,
    /// Shown to the patient
    Presented,
    /// Accepted by the patient
    Approved,
    /// Declined by the patient
    Rejected,
}

impl BudgetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetStatus::Draft => "draft",
            BudgetStatus::Presented => "presented",
            BudgetStatus::Approved => "approved",
            BudgetStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(BudgetStatus::Draft),
            "presented" => Some(BudgetStatus::Presented),
            "approved" => Some(BudgetStatus::Approved),
            "rejected" => Some(BudgetStatus::Rejected),
            _ => None,
        }
    }

    /// Badge label.
    pub fn label(self) -> &'static str {
        match self {
            BudgetStatus::Draft => "Rascunho",
            BudgetStatus::Presented => "Apresentado",
            BudgetStatus::Approved => "Aprovado",
            BudgetStatus::Rejected => "Rejeitado",
        }
    }
}

/// One procedure line on a budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetItem {
    /// Generated identifier (used for removal)
    #[serde(default)]
    pub id: String,
    /// Procedure name
    #[serde(rename = "procedimento")]
    pub procedure: String,
    /// Free-text tooth reference ("11", "11, 21", "Sup", "-")
    #[serde(rename = "dente", default)]
    pub tooth: String,
    /// Gross value
    #[serde(rename = "valor")]
    pub value: f64,
    /// Discount percentage (0-100)
    #[serde(rename = "desconto", default)]
    pub discount: f64,
}

impl BudgetItem {
    /// Value after the percentage discount.
    pub fn total(&self) -> f64 {
        self.value * (1.0 - self.discount / 100.0)
    }
}

/// Sum of discounted item values.
pub fn calculate_total(items: &[BudgetItem]) -> f64 {
    items.iter().fold(0.0, |acc, item| acc + item.total())
}

/// A saved budget row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    /// UUID primary key
    pub id: String,
    /// Owning patient
    pub patient_id: String,
    /// Human-facing budget number
    pub number: Option<String>,
    /// Status
    pub status: BudgetStatus,
    /// Total computed by the client at save time (not authoritative)
    pub total_value: f64,
    /// Procedure lines
    pub items: Vec<BudgetItem>,
    /// Expiry date (`YYYY-MM-DD`)
    pub valid_until: Option<String>,
    /// Conditions, one per line
    pub conditions: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Budget {
    /// Create an empty draft budget.
    pub fn new(patient_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            number: None,
            status: BudgetStatus::Draft,
            total_value: 0.0,
            items: Vec::new(),
            valid_until: None,
            conditions: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Total recomputed from the item list.
    pub fn items_total(&self) -> f64 {
        calculate_total(&self.items)
    }

    /// Non-blank condition lines.
    pub fn condition_lines(&self) -> Vec<&str> {
        self.conditions
            .as_deref()
            .map(|c| c.lines().filter(|l| !l.trim().is_empty()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: f64, discount: f64) -> BudgetItem {
        BudgetItem {
            id: uuid::Uuid::new_v4().to_string(),
            procedure: "Restauração".into(),
            tooth: "11".into(),
            value,
            discount,
        }
    }

    #[test]
    fn test_total_with_discounts() {
        let items = vec![item(100.0, 10.0), item(50.0, 0.0)];
        assert!((calculate_total(&items) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_empty() {
        assert_eq!(calculate_total(&[]), 0.0);
    }

    #[test]
    fn test_item_wire_names() {
        let json = serde_json::to_value(item(80.0, 5.0)).unwrap();
        assert_eq!(json["procedimento"], "Restauração");
        assert_eq!(json["dente"], "11");
        assert_eq!(json["valor"], 80.0);
        assert_eq!(json["desconto"], 5.0);
    }

    #[test]
    fn test_item_without_id_deserializes() {
        let item: BudgetItem =
            serde_json::from_str(r#"{"procedimento":"Limpeza","dente":"-","valor":120,"desconto":0}"#)
                .unwrap();
        assert!(item.id.is_empty());
        assert_eq!(item.total(), 120.0);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(BudgetStatus::parse("approved"), Some(BudgetStatus::Approved));
        assert_eq!(BudgetStatus::Presented.label(), "Apresentado");
        assert_eq!(BudgetStatus::default(), BudgetStatus::Draft);
    }

    #[test]
    fn test_condition_lines_skip_blank() {
        let mut budget = Budget::new("p-1".into());
        budget.conditions = Some("• A\n\n  \n• B".into());
        assert_eq!(budget.condition_lines(), vec!["• A", "• B"]);
    }
}
