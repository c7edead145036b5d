//! Set of selected teeth, kept in click order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ToothCode;

/// Insertion-ordered set of tooth codes.
///
/// The stored form is the comma separated string anamnesis records carry
/// (`"11, 21, 36"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToothSelection(Vec<ToothCode>);

impl ToothSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the tooth if absent, remove it if present.
    ///
    /// Returns whether the tooth is selected afterwards.
    pub fn toggle(&mut self, code: ToothCode) -> bool {
        if let Some(idx) = self.0.iter().position(|c| *c == code) {
            self.0.remove(idx);
            false
        } else {
            self.0.push(code);
            true
        }
    }

    pub fn contains(&self, code: ToothCode) -> bool {
        self.0.contains(&code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Codes in click order.
    pub fn codes(&self) -> &[ToothCode] {
        &self.0
    }

    /// Codes in ascending order.
    pub fn sorted(&self) -> Vec<ToothCode> {
        let mut codes = self.0.clone();
        codes.sort_unstable();
        codes
    }

    /// Parse a stored tooth string.
    ///
    /// Each comma separated fragment contributes its leading number
    /// (`" 12a"` → 12); fragments without one are skipped, as are repeats.
    pub fn parse(text: &str) -> Self {
        text.split(',').filter_map(leading_number).map(ToothCode::raw).collect()
    }
}

fn leading_number(fragment: &str) -> Option<u8> {
    let trimmed = fragment.trim_start();
    let digits: &str = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &trimmed[..end],
        None => trimmed,
    };
    digits.parse().ok()
}

impl FromIterator<ToothCode> for ToothSelection {
    fn from_iter<I: IntoIterator<Item = ToothCode>>(iter: I) -> Self {
        let mut selection = Self::new();
        for code in iter {
            if !selection.contains(code) {
                selection.0.push(code);
            }
        }
        selection
    }
}

impl fmt::Display for ToothSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}
