//! Tooth outline shapes (facial view).

use super::{Arch, ToothCode};

/// Outline used to draw a tooth. Paths are in a `0 0 100 150` viewBox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToothShape {
    UpperCentral,
    UpperLateral,
    UpperCanine,
    UpperPremolar,
    UpperMolar,
    LowerIncisor,
    LowerCanine,
    LowerPremolar,
    LowerMolar,
}

/// Width and height of the path coordinate space.
pub const SHAPE_VIEWBOX: (f32, f32) = (100.0, 150.0);

impl ToothShape {
    /// Shape for a tooth code.
    ///
    /// Codes outside the FDI ranges get the default molar outline.
    pub fn for_code(code: ToothCode) -> Self {
        let Some(arch) = code.arch() else {
            return ToothShape::UpperMolar;
        };

        match (arch, code.position()) {
            (Arch::Upper, 1) => ToothShape::UpperCentral,
            (Arch::Upper, 2) => ToothShape::UpperLateral,
            (Arch::Upper, 3) => ToothShape::UpperCanine,
            (Arch::Upper, 4 | 5) => ToothShape::UpperPremolar,
            (Arch::Upper, _) => ToothShape::UpperMolar,
            (Arch::Lower, 1 | 2) => ToothShape::LowerIncisor,
            (Arch::Lower, 3) => ToothShape::LowerCanine,
            (Arch::Lower, 4 | 5) => ToothShape::LowerPremolar,
            (Arch::Lower, _) => ToothShape::LowerMolar,
        }
    }

    /// SVG path data.
    pub fn svg_path(self) -> &'static str {
        match self {
            ToothShape::UpperCentral => "M20,100 L25,140 C35,150 65,150 75,140 L80,100 L85,40 C88,20 80,10 50,10 C20,10 12,20 15,40 Z",
            ToothShape::UpperLateral => "M25,100 L28,130 C35,145 65,145 72,130 L75,100 L80,45 C83,25 75,15 50,15 C25,15 17,25 20,45 Z",
            ToothShape::UpperCanine => "M25,90 L30,130 C40,150 60,150 70,130 L75,90 L85,40 C90,20 70,5 50,5 C30,5 10,20 15,40 Z",
            ToothShape::UpperPremolar => "M20,90 L25,120 C35,140 65,140 75,120 L80,90 L90,50 C95,30 85,15 50,15 C15,15 5,30 10,50 Z",
            ToothShape::UpperMolar => "M10,80 L15,110 C20,135 35,140 45,120 L50,100 L55,120 C65,140 80,135 85,110 L90,80 L95,40 C98,20 85,10 50,10 C15,10 2,20 5,40 Z",
            ToothShape::LowerIncisor => "M30,50 L32,10 C35,2 65,2 68,10 L70,50 L75,110 C78,130 70,140 50,140 C30,140 22,130 25,110 Z",
            ToothShape::LowerCanine => "M25,60 L28,20 C35,5 65,5 72,20 L75,60 L80,110 C83,130 70,145 50,145 C30,145 17,130 20,110 Z",
            ToothShape::LowerPremolar => "M20,60 L25,30 C35,10 65,10 75,30 L80,60 L85,100 C90,120 80,135 50,135 C20,135 10,120 15,100 Z",
            ToothShape::LowerMolar => "M10,70 L15,40 C20,15 35,10 45,30 L50,50 L55,30 C65,10 80,15 85,40 L90,70 L95,110 C98,130 85,140 50,140 C15,140 2,130 5,110 Z",
        }
    }
}
