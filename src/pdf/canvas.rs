//! Graphics target writing PDF content-stream operators

use crate::layout::{PageFormat, Region};
use crate::render::{FontFace, GraphicsTarget, TextRun};

/// Resource name of the font used for `face`
pub fn font_resource(face: FontFace) -> &'static str {
    match face {
        FontFace::Regular => "F1",
        FontFace::Bold => "F2",
    }
}

/// Collects the content stream of one page.
///
/// PDF user space has its origin at the bottom-left with y pointing up. The
/// canvas flips it once so callers work in page units from the top-left
/// corner, and flips the text matrix so glyphs stay upright.
#[derive(Debug)]
pub struct PdfCanvas {
    content: String,
}

impl PdfCanvas {
    pub fn new(page: &PageFormat) -> Self {
        let mut content = String::new();
        content.push_str("q\n");
        content.push_str(&format!("1 0 0 -1 0 {} cm\n", num(page.height)));
        content.push_str("0 g\n"); // black fill
        Self { content }
    }

    /// Close the graphics state and return the content stream
    pub fn finish(mut self) -> Vec<u8> {
        self.content.push_str("Q\n");
        self.content.into_bytes()
    }
}

impl GraphicsTarget for PdfCanvas {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.content.push_str(&format!("1 0 0 1 {} {} cm\n", num(dx), num(dy)));
    }

    fn clip(&mut self, rect: Region) {
        self.content.push_str(&format!(
            "{} {} {} {} re W n\n",
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        ));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.content.push_str(&format!("{} 0 0 {} 0 0 cm\n", num(sx), num(sy)));
    }

    fn fill_text(&mut self, run: &TextRun) {
        self.content.push_str("BT\n");
        self.content.push_str(&format!("/{} {} Tf\n", font_resource(run.face), num(run.size)));
        self.content.push_str(&format!("1 0 0 -1 {} {} Tm\n", num(run.x), num(run.baseline)));
        self.content.push_str(&format!("({}) Tj\n", escape_pdf_string(&run.text)));
        self.content.push_str("ET\n");
    }

    fn fill_rect(&mut self, rect: Region) {
        self.content.push_str(&format!(
            "{} {} {} {} re f\n",
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height)
        ));
    }
}

/// Operand with at most four decimals, e.g. `72`, `20.5`, `841.89`
fn num(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Escape text for a literal string shown with a WinAnsiEncoding font.
/// Latin-1 characters are written as octal escapes; anything the encoding
/// cannot represent becomes '?'.
fn escape_pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            ' '..='~' => out.push(c),
            '€' => out.push_str("\\200"),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", c as u32)),
            _ => out.push('?'),
        }
    }
    out
}
