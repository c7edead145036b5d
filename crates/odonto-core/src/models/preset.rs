//! Text preset models.

use serde::{Deserialize, Serialize};

/// Category for reusable budget conditions.
pub const BUDGET_CONDITION_CATEGORY: &str = "budget_condition";

/// A reusable canned string scoped by category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    pub id: String,
    pub category: String,
    pub content: String,
    pub created_at: String,
}

impl Preset {
    /// Create a preset with a fresh local id.
    pub fn new(category: String, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            content,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
