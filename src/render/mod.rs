//! Rendering capabilities: laying out marked-up content and painting it
//!
//! The print pipeline never looks inside the markup. It hands a content slice to
//! a [`Renderer`], which lays it out into a surface of bounded width and paints
//! that surface onto a [`GraphicsTarget`] whose coordinate system has already
//! been positioned by a [`RenderTransform`](crate::transform::RenderTransform).

pub mod markup;

pub use markup::{MarkupRenderer, MarkupSurface};

use crate::error::Result;
use crate::layout::Region;

/// Font faces every graphics target must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

/// A run of text in one face and size, positioned by its baseline origin
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub baseline: f64,
    pub face: FontFace,
    pub size: f64,
    pub text: String,
}

/// Surface a renderer paints on.
///
/// Operations compose with the current state the same way a PDF or PostScript
/// graphics state does: `translate` and `scale` modify the current transform,
/// `clip` intersects the clip with a rectangle in the current coordinates.
pub trait GraphicsTarget {
    fn translate(&mut self, dx: f64, dy: f64);
    fn clip(&mut self, rect: Region);
    fn scale(&mut self, sx: f64, sy: f64);
    fn fill_text(&mut self, run: &TextRun);
    fn fill_rect(&mut self, rect: Region);
}

/// Lays out marked-up content and paints the result
pub trait Renderer {
    type Surface;

    /// Lay `content` out into a surface `width` units wide. `min_height` is a
    /// lower bound only; the renderer decides the final height.
    fn layout(&self, content: &str, width: f64, min_height: f64) -> Result<Self::Surface>;

    fn paint(&self, surface: &Self::Surface, target: &mut dyn GraphicsTarget);

    /// Width and height a laid-out surface occupies, in content units
    fn extent(&self, surface: &Self::Surface) -> (f64, f64);
}

/// Advance width of a Helvetica glyph in 1/1000 em.
/// Values follow the standard AFM metrics for the ASCII range; anything else
/// gets an average width.
pub(crate) fn glyph_width(c: char, face: FontFace) -> f64 {
    let regular = match c {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | '[' | ']' | '\\' | 'f' | 't' => 278.0,
        'i' | 'j' | 'l' => 222.0,
        '\'' => 191.0,
        '|' => 260.0,
        '"' => 355.0,
        '(' | ')' | '-' | '`' | 'r' => 333.0,
        '*' => 389.0,
        '{' | '}' => 334.0,
        '^' => 469.0,
        '+' | '<' | '=' | '>' | '~' => 584.0,
        '?' => 556.0,
        '%' => 889.0,
        '&' => 667.0,
        '@' => 1015.0,
        '0'..='9' | '#' | '$' | '_' => 556.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        'm' => 833.0,
        'w' => 722.0,
        'a'..='z' => 556.0,
        'I' => 278.0,
        'J' => 500.0,
        'F' | 'T' | 'Z' => 611.0,
        'L' => 556.0,
        'M' => 833.0,
        'W' => 944.0,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722.0,
        'G' | 'O' | 'Q' => 778.0,
        _ => 556.0,
    };
    match face {
        FontFace::Regular => regular,
        // Helvetica-Bold is roughly 6% wider across the board
        FontFace::Bold => regular * 1.06,
    }
}

/// Width of `text` set in `face` at `size` points
pub(crate) fn text_width(text: &str, face: FontFace, size: f64) -> f64 {
    text.chars().map(|c| glyph_width(c, face)).sum::<f64>() * size / 1000.0
}
