//! Block layout and A4 rendering with `printpdf`.

use std::io::BufWriter;

use chrono::{DateTime, NaiveDate, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{PdfError, PdfResult};
use crate::models::parse_date;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 20.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const FOOTER_Y: f32 = 10.0;
const RIGHT_COLUMN: f32 = 115.0;
const VALUE_COLUMN: f32 = 70.0;

/// Characters per line for body text at 10pt.
const BODY_CHARS: usize = 95;

/// A table column: header text, x offset from the left margin and the
/// number of characters that fit.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: &'static str,
    pub x: f32,
    pub max_chars: usize,
}

/// A signature slot: rule, then name and optional role underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureLine {
    pub name: String,
    pub role: Option<String>,
}

/// Document content, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Document title with an optional subtitle line
    Title { text: String, subtitle: Option<String> },
    /// Title on the left, metadata lines on the right
    Header { left: String, right: Vec<String> },
    /// Section heading
    Heading(String),
    /// `LABEL: value` row
    Field { label: String, value: String },
    /// Wrapped body text
    Paragraph(String),
    /// Bulleted line
    Bullet(String),
    /// Two-column checklist
    Checklist(Vec<(String, bool)>),
    Table { columns: Vec<Column>, rows: Vec<Vec<String>> },
    /// Emphasized total line
    Total { label: String, value: String },
    /// Up to two signature slots side by side
    Signatures(Vec<SignatureLine>),
    Spacer(f32),
    /// Small print at the bottom of the page
    Footer(String),
}

impl Block {
    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Block::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Visible text of the block, one entry per line of content.
    pub fn text_lines(&self) -> Vec<String> {
        match self {
            Block::Title { text, subtitle } => {
                let mut lines = vec![text.clone()];
                lines.extend(subtitle.clone());
                lines
            }
            Block::Header { left, right } => {
                let mut lines = vec![left.clone()];
                lines.extend(right.iter().cloned());
                lines
            }
            Block::Heading(text) | Block::Paragraph(text) | Block::Footer(text) => vec![text.clone()],
            Block::Field { label, value } => vec![format!("{}: {}", label, value)],
            Block::Bullet(text) => vec![format!("{} {}", BULLET, text)],
            Block::Checklist(items) => items
                .iter()
                .map(|(label, checked)| format!("{} {}", check_mark(*checked), label))
                .collect(),
            Block::Table { columns, rows } => {
                let mut lines = vec![columns.iter().map(|c| c.title).collect::<Vec<_>>().join(" | ")];
                lines.extend(rows.iter().map(|r| r.join(" | ")));
                lines
            }
            Block::Total { label, value } => vec![format!("{} {}", label, value)],
            Block::Signatures(slots) => slots
                .iter()
                .flat_map(|s| std::iter::once(s.name.clone()).chain(s.role.clone()))
                .collect(),
            Block::Spacer(_) => Vec::new(),
        }
    }
}

/// All visible text of a document, newline separated.
pub fn blocks_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .flat_map(Block::text_lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// WinAnsi 0x95, available in the builtin fonts.
const BULLET: &str = "•";

fn check_mark(checked: bool) -> &'static str {
    if checked {
        "[X]"
    } else {
        "[ ]"
    }
}

/// Format a stored date or timestamp as `dd/mm/yyyy`.
pub fn format_date_br(stored: &str) -> Option<String> {
    parse_date(stored).map(|d| d.format("%d/%m/%Y").to_string())
}

pub fn format_day(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy às HH:MM:SS`.
pub fn format_generated_at(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y às %H:%M:%S").to_string()
}

/// Greedy word wrap.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let current_len = current.chars().count();
        if current_len + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Render blocks to PDF bytes.
pub fn render_blocks(title: &str, blocks: &[Block]) -> PdfResult<Vec<u8>> {
    let canvas = PdfCanvas::layout(title, blocks)?;
    tracing::debug!(title, pages = canvas.pages, "Rendered PDF");
    canvas.finish()
}

/// Page-flowing writer over a `printpdf` document.
struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
    /// Repeated at the bottom of every page
    footer: Option<String>,
    footers: usize,
}

impl PdfCanvas {
    fn new(title: &str) -> PdfResult<Self> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfError::Render(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PdfError::Render(format!("PDF font error: {e}")))?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP,
            pages: 1,
            footer: None,
            footers: 0,
        })
    }

    /// Draw every block, closing each page with the document footer.
    fn layout(title: &str, blocks: &[Block]) -> PdfResult<Self> {
        let mut canvas = Self::new(title)?;
        canvas.footer = blocks.iter().find_map(|block| match block {
            Block::Footer(text) => Some(text.clone()),
            _ => None,
        });
        for block in blocks {
            canvas.draw(block);
        }
        canvas.draw_footer();
        Ok(canvas)
    }

    fn draw_footer(&mut self) {
        let Some(text) = self.footer.as_deref() else {
            return;
        };
        self.text_at(text, 8.0, LEFT, FOOTER_Y, false);
        self.footers += 1;
    }

    fn new_page(&mut self) {
        self.draw_footer();
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
    }

    /// Start a new page if `height` does not fit above the bottom margin.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < BOTTOM {
            self.new_page();
        }
    }

    fn text_at(&self, text: &str, size: f32, x: f32, y: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    /// Write one line at the cursor and advance.
    fn line(&mut self, text: &str, size: f32, x: f32, bold: bool, advance: f32) {
        self.ensure_space(advance);
        self.text_at(text, size, x, self.y, bold);
        self.y -= advance;
    }

    fn draw(&mut self, block: &Block) {
        match block {
            Block::Title { text, subtitle } => {
                self.line(text, 18.0, LEFT, true, 7.0);
                if let Some(subtitle) = subtitle {
                    self.line(subtitle, 11.0, LEFT, false, 5.0);
                }
                self.y -= 6.0;
            }
            Block::Header { left, right } => {
                self.ensure_space(6.0 * right.len().max(1) as f32);
                let top = self.y;
                self.text_at(left, 16.0, LEFT, top, true);
                for (i, line) in right.iter().enumerate() {
                    let (size, bold) = if i == 0 { (14.0, true) } else { (9.0, false) };
                    self.text_at(line, size, 150.0, top - 6.0 * i as f32, bold);
                }
                self.y = top - 6.0 * right.len().max(1) as f32 - 6.0;
            }
            Block::Heading(text) => {
                // Keep a heading with at least one line of its section
                self.ensure_space(12.0);
                self.y -= 2.0;
                self.line(text, 12.0, LEFT, true, 4.0);
                self.line(&"_".repeat(85), 8.0, LEFT, false, 6.0);
            }
            Block::Field { label, value } => {
                let lines = wrap_text(value, 60);
                self.ensure_space(5.0);
                self.text_at(&format!("{}:", label), 10.0, LEFT, self.y, false);
                for line in lines {
                    self.line(&line, 10.0, VALUE_COLUMN, true, 5.0);
                }
            }
            Block::Paragraph(text) => {
                for line in wrap_text(text, BODY_CHARS) {
                    self.line(&line, 10.0, LEFT, false, 5.0);
                }
                self.y -= 2.0;
            }
            Block::Bullet(text) => {
                for (i, line) in wrap_text(text, BODY_CHARS - 4).into_iter().enumerate() {
                    self.ensure_space(5.0);
                    if i == 0 {
                        self.text_at(BULLET, 10.0, LEFT + 2.0, self.y, true);
                    }
                    self.line(&line, 10.0, LEFT + 6.0, false, 5.0);
                }
            }
            Block::Checklist(items) => {
                for pair in items.chunks(2) {
                    self.ensure_space(5.5);
                    for (col, (label, checked)) in pair.iter().enumerate() {
                        let x = if col == 0 { LEFT } else { RIGHT_COLUMN };
                        let text = format!("{} {}", check_mark(*checked), label);
                        self.text_at(&text, 10.0, x, self.y, *checked);
                    }
                    self.y -= 5.5;
                }
                self.y -= 2.0;
            }
            Block::Table { columns, rows } => {
                self.ensure_space(12.0);
                for column in columns {
                    self.text_at(column.title, 9.0, LEFT + column.x, self.y, true);
                }
                self.y -= 6.0;
                for row in rows {
                    self.ensure_space(5.5);
                    for (column, cell) in columns.iter().zip(row) {
                        let cell = truncate(cell, column.max_chars);
                        self.text_at(&cell, 9.0, LEFT + column.x, self.y, false);
                    }
                    self.y -= 5.5;
                }
            }
            Block::Total { label, value } => {
                self.ensure_space(10.0);
                self.y -= 3.0;
                self.text_at(label, 12.0, LEFT, self.y, true);
                self.text_at(value, 12.0, 150.0, self.y, true);
                self.y -= 8.0;
            }
            Block::Signatures(slots) => {
                self.ensure_space(30.0);
                self.y -= 15.0;
                let rule_y = self.y;
                for (i, slot) in slots.iter().take(2).enumerate() {
                    let x = if i == 0 { LEFT } else { RIGHT_COLUMN };
                    self.text_at(&"_".repeat(40), 10.0, x, rule_y, false);
                    self.text_at(&slot.name, 10.0, x, rule_y - 5.0, true);
                    if let Some(role) = &slot.role {
                        self.text_at(role, 8.0, x, rule_y - 9.0, false);
                    }
                }
                self.y = rule_y - 14.0;
            }
            Block::Spacer(height) => {
                self.y -= *height;
            }
            Block::Footer(text) => {
                if self.footer.is_none() {
                    self.footer = Some(text.clone());
                }
            }
        }
    }

    fn finish(self) -> PdfResult<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| PdfError::Render(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| PdfError::Render(format!("PDF buffer error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("um dois tres quatro cinco", 10);
        assert_eq!(lines, vec!["um dois", "tres", "quatro", "cinco"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        let lines = wrap_text("ação ação", 9);
        assert_eq!(lines, vec!["ação ação"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Restauração", 20), "Restauração");
        assert_eq!(truncate("Tratamento de canal completo", 10), "Tratame...");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date_br("2000-06-15").as_deref(), Some("15/06/2000"));
        assert_eq!(format_date_br("2024-06-14T10:00:00Z").as_deref(), Some("14/06/2024"));
        assert_eq!(format_date_br("nope"), None);

        let at = Utc.with_ymd_and_hms(2024, 6, 14, 9, 5, 3).unwrap();
        assert_eq!(format_generated_at(at), "14/06/2024 às 09:05:03");
    }

    #[test]
    fn test_checklist_text() {
        let block = Block::Checklist(vec![("Anemia?".into(), true), ("Diabetes?".into(), false)]);
        assert_eq!(block.text_lines(), vec!["[X] Anemia?", "[ ] Diabetes?"]);
    }

    #[test]
    fn test_render_produces_pdf() {
        let blocks = vec![
            Block::Title {
                text: "Teste".into(),
                subtitle: Some("Clínica".into()),
            },
            Block::field("Nome", "Ana"),
            Block::Paragraph("Texto".into()),
        ];
        let bytes = render_blocks("Teste", &blocks).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_long_document_flows_to_new_pages() {
        let mut blocks: Vec<Block> =
            (0..200).map(|i| Block::Paragraph(format!("Linha {i}"))).collect();
        blocks.push(Block::Footer("Gerado em 14/06/2024".into()));

        let canvas = PdfCanvas::layout("Longo", &blocks).unwrap();
        assert!(canvas.pages > 1);
        assert_eq!(canvas.footers, canvas.pages);
        assert!(canvas.finish().unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_document_without_footer() {
        let blocks: Vec<Block> = (0..200).map(|i| Block::Paragraph(format!("Linha {i}"))).collect();
        let canvas = PdfCanvas::layout("Longo", &blocks).unwrap();
        assert!(canvas.pages > 1);
        assert_eq!(canvas.footers, 0);
    }

    #[test]
    fn test_bullet_text() {
        let block = Block::Bullet("Pagamento à vista".into());
        assert_eq!(block.text_lines(), vec!["• Pagamento à vista"]);
    }
}
