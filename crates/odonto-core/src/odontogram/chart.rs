//! Chart layout, SVG rendering and the interactive widget state.

use std::fmt::Write as _;

use super::{Arch, Quadrant, ToothCode, ToothSelection, SHAPE_VIEWBOX};

/// Width of an incisor, canine or premolar slot.
pub const NARROW_TOOTH_WIDTH: f32 = 28.0;
/// Width of a molar slot.
pub const MOLAR_TOOTH_WIDTH: f32 = 40.0;

const TOOTH_GAP: f32 = 4.0;
const MIDLINE_GAP: f32 = 16.0;
const LABEL_SPACE: f32 = 20.0;
const ARCH_GAP: f32 = 40.0;
const MARGIN: f32 = 12.0;

/// Quadrants drawn in each row, left to right.
pub const UPPER_ROW: [Quadrant; 2] = [Quadrant::UpperRight, Quadrant::UpperLeft];
pub const LOWER_ROW: [Quadrant; 2] = [Quadrant::LowerRight, Quadrant::LowerLeft];

/// Where a tooth is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ToothSlot {
    pub code: ToothCode,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Lower teeth carry their number underneath
    pub label_below: bool,
}

impl ToothSlot {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

/// Positions for all 32 teeth.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub slots: Vec<ToothSlot>,
    pub width: f32,
    pub height: f32,
}

impl ChartLayout {
    /// Standard two-row layout.
    pub fn standard() -> Self {
        let row_height = MOLAR_TOOTH_WIDTH * aspect();
        let upper_top = MARGIN + LABEL_SPACE;
        let lower_top = upper_top + row_height + ARCH_GAP;

        let mut slots = Vec::with_capacity(32);
        let upper_width = layout_row(&UPPER_ROW, upper_top, row_height, &mut slots);
        let lower_width = layout_row(&LOWER_ROW, lower_top, row_height, &mut slots);

        Self {
            slots,
            width: upper_width.max(lower_width) + MARGIN,
            height: lower_top + row_height + LABEL_SPACE + MARGIN,
        }
    }

    pub fn slot(&self, code: ToothCode) -> Option<&ToothSlot> {
        self.slots.iter().find(|s| s.code == code)
    }

    /// Tooth under a point, if any.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ToothCode> {
        self.slots.iter().find(|s| s.contains(x, y)).map(|s| s.code)
    }
}

fn aspect() -> f32 {
    SHAPE_VIEWBOX.1 / SHAPE_VIEWBOX.0
}

fn tooth_width(code: ToothCode) -> f32 {
    if code.is_molar() {
        MOLAR_TOOTH_WIDTH
    } else {
        NARROW_TOOTH_WIDTH
    }
}

/// Lay out one row; returns its right edge.
fn layout_row(quadrants: &[Quadrant; 2], top: f32, row_height: f32, slots: &mut Vec<ToothSlot>) -> f32 {
    let mut x = MARGIN;

    for (qi, quadrant) in quadrants.iter().enumerate() {
        if qi > 0 {
            x += MIDLINE_GAP - TOOTH_GAP;
        }
        let lower = quadrant.arch() == Arch::Lower;

        for code in quadrant.teeth() {
            let width = tooth_width(code);
            let height = width * aspect();
            // Upper teeth hang from the gum line, lower teeth stand on it
            let y = if lower { top } else { top + row_height - height };

            slots.push(ToothSlot {
                code,
                x,
                y,
                width,
                height,
                label_below: lower,
            });
            x += width + TOOTH_GAP;
        }
    }

    x - TOOTH_GAP
}

/// Count plus sorted chips shown under the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub count: usize,
    pub chips: Vec<ToothCode>,
}

impl SelectionSummary {
    pub fn of(selection: &ToothSelection) -> Self {
        Self {
            count: selection.len(),
            chips: selection.sorted(),
        }
    }
}

/// Render the chart as a standalone SVG document.
pub fn render_chart_svg(
    layout: &ChartLayout,
    selection: &ToothSelection,
    hovered: Option<ToothCode>,
) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = layout.width,
        h = layout.height,
    );

    for slot in &layout.slots {
        let selected = selection.contains(slot.code);
        let (fill, stroke) = match (selected, hovered == Some(slot.code)) {
            (true, _) => ("#3b82f6", "#2563eb"),
            (false, true) => ("#f1f5f9", "#94a3b8"),
            (false, false) => ("#f8fafc", "#cbd5e1"),
        };
        let scale = slot.width / SHAPE_VIEWBOX.0;
        let title = slot.code.name().unwrap_or_default();

        let _ = write!(
            svg,
            r#"<g data-tooth="{code}" transform="translate({x} {y}) scale({scale})"><title>{title}</title><path d="{path}" fill="{fill}" stroke="{stroke}" stroke-width="3" vector-effect="non-scaling-stroke"/></g>"#,
            code = slot.code,
            x = slot.x,
            y = slot.y,
            path = slot.code.shape().svg_path(),
        );

        let label_y = if slot.label_below {
            slot.y + slot.height + LABEL_SPACE * 0.7
        } else {
            slot.y - LABEL_SPACE * 0.3
        };
        let label_color = if selected { "#2563eb" } else { "#94a3b8" };
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="10" font-weight="600" fill="{label_color}">{code}</text>"#,
            x = slot.x + slot.width / 2.0,
            y = label_y,
            code = slot.code,
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Interactive odontogram state.
///
/// Clicks toggle teeth and report the whole updated selection to the
/// change callback. A disabled chart ignores clicks and hovers.
pub struct Odontogram<'a> {
    selection: ToothSelection,
    disabled: bool,
    hovered: Option<ToothCode>,
    layout: ChartLayout,
    on_change: Option<Box<dyn FnMut(&ToothSelection) + 'a>>,
}

impl<'a> Odontogram<'a> {
    pub fn new(selection: ToothSelection) -> Self {
        Self {
            selection,
            disabled: false,
            hovered: None,
            layout: ChartLayout::standard(),
            on_change: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&ToothSelection) + 'a,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn selection(&self) -> &ToothSelection {
        &self.selection
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn hovered(&self) -> Option<ToothCode> {
        self.hovered
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Toggle a tooth. Returns false when the chart is disabled.
    pub fn click(&mut self, code: ToothCode) -> bool {
        if self.disabled {
            return false;
        }

        self.selection.toggle(code);
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.selection);
        }
        true
    }

    pub fn hover(&mut self, code: Option<ToothCode>) {
        if !self.disabled {
            self.hovered = code;
        }
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary::of(&self.selection)
    }

    pub fn render_svg(&self) -> String {
        render_chart_svg(&self.layout, &self.selection, self.hovered)
    }
}
