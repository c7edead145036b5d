//! FDI tooth codes, quadrants and anatomical names.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ToothError, ToothResult, ToothShape};

/// Dental quadrant, numbered clockwise from the patient's upper right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperRight,
        Quadrant::UpperLeft,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// Leading FDI digit.
    pub fn digit(self) -> u8 {
        match self {
            Quadrant::UpperRight => 1,
            Quadrant::UpperLeft => 2,
            Quadrant::LowerLeft => 3,
            Quadrant::LowerRight => 4,
        }
    }

    pub fn from_digit(d: u8) -> Option<Self> {
        match d {
            1 => Some(Quadrant::UpperRight),
            2 => Some(Quadrant::UpperLeft),
            3 => Some(Quadrant::LowerLeft),
            4 => Some(Quadrant::LowerRight),
            _ => None,
        }
    }

    pub fn arch(self) -> Arch {
        match self {
            Quadrant::UpperRight | Quadrant::UpperLeft => Arch::Upper,
            Quadrant::LowerLeft | Quadrant::LowerRight => Arch::Lower,
        }
    }

    /// Teeth in chart order (left to right as drawn).
    ///
    /// Right-side quadrants run from the back of the mouth to the midline,
    /// left-side quadrants from the midline outwards.
    pub fn teeth(self) -> [ToothCode; 8] {
        let base = self.digit() * 10;
        let mut teeth = [ToothCode(0); 8];
        for (i, slot) in teeth.iter_mut().enumerate() {
            let position = match self {
                Quadrant::UpperRight | Quadrant::LowerRight => 8 - i as u8,
                Quadrant::UpperLeft | Quadrant::LowerLeft => i as u8 + 1,
            };
            *slot = ToothCode(base + position);
        }
        teeth
    }

    fn side_name(self) -> &'static str {
        match self {
            Quadrant::UpperRight | Quadrant::LowerRight => "Direito",
            Quadrant::UpperLeft | Quadrant::LowerLeft => "Esquerdo",
        }
    }
}

/// Upper or lower jaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Upper,
    Lower,
}

impl Arch {
    pub fn label(self) -> &'static str {
        match self {
            Arch::Upper => "Superior",
            Arch::Lower => "Inferior",
        }
    }
}

/// Anatomical tooth class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToothClass {
    Incisor,
    Canine,
    Premolar,
    Molar,
}

/// A tooth number in FDI notation.
///
/// `ToothCode::new` only accepts the 32 permanent-dentition codes;
/// `ToothCode::raw` keeps whatever number a stored string carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToothCode(u8);

impl ToothCode {
    pub fn new(code: u8) -> ToothResult<Self> {
        if is_valid_fdi(code) {
            Ok(Self(code))
        } else {
            Err(ToothError::InvalidCode(code))
        }
    }

    pub const fn raw(code: u8) -> Self {
        Self(code)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        is_valid_fdi(self.0)
    }

    /// Position counted from the midline (1 = central incisor).
    pub fn position(self) -> u8 {
        self.0 % 10
    }

    pub fn quadrant(self) -> Option<Quadrant> {
        if !self.is_valid() {
            return None;
        }
        Quadrant::from_digit(self.0 / 10)
    }

    pub fn arch(self) -> Option<Arch> {
        self.quadrant().map(Quadrant::arch)
    }

    pub fn class(self) -> Option<ToothClass> {
        if !self.is_valid() {
            return None;
        }
        Some(match self.position() {
            1 | 2 => ToothClass::Incisor,
            3 => ToothClass::Canine,
            4 | 5 => ToothClass::Premolar,
            _ => ToothClass::Molar,
        })
    }

    /// Drawn wider in the chart.
    pub fn is_molar(self) -> bool {
        self.position() >= 6
    }

    pub fn shape(self) -> ToothShape {
        ToothShape::for_code(self)
    }

    /// Portuguese anatomical name, e.g. "Incisivo Central Superior Direito".
    pub fn name(self) -> Option<String> {
        let quadrant = self.quadrant()?;
        let tooth = match self.position() {
            1 => "Incisivo Central",
            2 => "Incisivo Lateral",
            3 => "Canino",
            4 => "1º Pré-Molar",
            5 => "2º Pré-Molar",
            6 => "1º Molar",
            7 => "2º Molar",
            _ => "3º Molar",
        };
        Some(format!(
            "{} {} {}",
            tooth,
            quadrant.arch().label(),
            quadrant.side_name()
        ))
    }
}

impl fmt::Display for ToothCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for ToothCode {
    type Error = ToothError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ToothCode::new(code)
    }
}

/// True for 11-18, 21-28, 31-38 and 41-48.
pub fn is_valid_fdi(code: u8) -> bool {
    matches!(code / 10, 1..=4) && matches!(code % 10, 1..=8)
}

/// All 32 permanent teeth in quadrant order.
pub fn all_teeth() -> impl Iterator<Item = ToothCode> {
    Quadrant::ALL.into_iter().flat_map(|q| {
        let base = q.digit() * 10;
        (1..=8).map(move |p| ToothCode(base + p))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        assert_eq!(all_teeth().count(), 32);
        assert!(all_teeth().all(ToothCode::is_valid));

        for bad in [0, 10, 19, 20, 29, 39, 49, 51, 99] {
            assert_eq!(ToothCode::new(bad), Err(ToothError::InvalidCode(bad)));
        }
    }

    #[test]
    fn test_quadrant_display_order() {
        let codes = |q: Quadrant| q.teeth().map(ToothCode::value);
        assert_eq!(codes(Quadrant::UpperRight), [18, 17, 16, 15, 14, 13, 12, 11]);
        assert_eq!(codes(Quadrant::UpperLeft), [21, 22, 23, 24, 25, 26, 27, 28]);
        assert_eq!(codes(Quadrant::LowerLeft), [31, 32, 33, 34, 35, 36, 37, 38]);
        assert_eq!(codes(Quadrant::LowerRight), [48, 47, 46, 45, 44, 43, 42, 41]);
    }

    #[test]
    fn test_names() {
        let name = |c: u8| ToothCode::raw(c).name();
        assert_eq!(name(11).as_deref(), Some("Incisivo Central Superior Direito"));
        assert_eq!(name(24).as_deref(), Some("1º Pré-Molar Superior Esquerdo"));
        assert_eq!(name(36).as_deref(), Some("1º Molar Inferior Esquerdo"));
        assert_eq!(name(48).as_deref(), Some("3º Molar Inferior Direito"));
        assert_eq!(name(99), None);
    }

    #[test]
    fn test_classes() {
        assert_eq!(ToothCode::raw(12).class(), Some(ToothClass::Incisor));
        assert_eq!(ToothCode::raw(43).class(), Some(ToothClass::Canine));
        assert_eq!(ToothCode::raw(35).class(), Some(ToothClass::Premolar));
        assert_eq!(ToothCode::raw(27).class(), Some(ToothClass::Molar));
        assert!(ToothCode::raw(46).is_molar());
        assert!(!ToothCode::raw(45).is_molar());
    }

    #[test]
    fn test_arch() {
        assert_eq!(ToothCode::raw(28).arch(), Some(Arch::Upper));
        assert_eq!(ToothCode::raw(31).arch(), Some(Arch::Lower));
        assert_eq!(ToothCode::raw(55).arch(), None);
    }
}
