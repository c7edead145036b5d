//! Budget conditions (payment terms, validity notes).

/// Conditions a new budget starts with.
pub const DEFAULT_CONDITIONS: [&str; 3] = [
    "Orçamento válido por 30 dias",
    "Valores sujeitos a alteração conforme diagnóstico",
    "Formas de pagamento: Dinheiro, PIX, Cartão de Crédito/Débito",
];

const BULLET: &str = "• ";

/// Ordered list of distinct condition lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionList {
    items: Vec<String>,
}

impl Default for ConditionList {
    fn default() -> Self {
        Self {
            items: DEFAULT_CONDITIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ConditionList {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a condition. Blank text and exact duplicates are ignored.
    pub fn add(&mut self, text: &str) -> bool {
        if text.trim().is_empty() || self.items.iter().any(|c| c == text) {
            return false;
        }
        self.items.push(text.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored form: one bulleted line per condition.
    pub fn to_stored(&self) -> String {
        self.items
            .iter()
            .map(|c| format!("{}{}", BULLET, c))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Read the stored form back. Blank lines are dropped.
    pub fn parse_stored(stored: &str) -> Self {
        let mut list = Self::empty();
        for line in stored.lines().map(strip_bullet) {
            list.add(line);
        }
        list
    }
}

/// Condition text without its leading bullet.
pub fn strip_bullet(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix('•').map(str::trim_start).unwrap_or(line)
}
