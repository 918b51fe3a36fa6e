//! Page geometry: lengths, regions, scale factors and page formats
//!
//! All page-space values are PostScript points (1/72 inch) with the origin at
//! the top-left corner of the page and y growing downwards.

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// A rectangle on the page, in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Region of the given size anchored at the origin
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Independent horizontal and vertical scale factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Paper sizes known to the backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paper {
    Letter,
    A4,
    Legal,
}

impl Paper {
    /// Paper dimensions as (width, height) in points
    pub fn size_pt(self) -> (f64, f64) {
        match self {
            // 8.5" × 11"
            Paper::Letter => (612.0, 792.0),
            // 210mm × 297mm
            Paper::A4 => (595.28, 841.89),
            // 8.5" × 14"
            Paper::Legal => (612.0, 1008.0),
        }
    }

    /// Recognise a paper from a CUPS-style media name
    /// (`a4`, `Letter`, `na_letter_8.5x11in`, `iso_a4_210x297mm`, ...)
    pub fn from_media_name(media: &str) -> Option<Self> {
        let media = media.to_ascii_lowercase();
        if media.contains("a4") {
            Some(Paper::A4)
        } else if media.contains("legal") {
            Some(Paper::Legal)
        } else if media.contains("letter") {
            Some(Paper::Letter)
        } else {
            None
        }
    }
}

/// Size of a page and the part of it a device can actually mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
    pub imageable: Region,
}

impl PageFormat {
    /// Page of the given paper with the same margin on all sides
    pub fn with_margin(paper: Paper, margin: Length) -> Self {
        let (width, height) = paper.size_pt();
        let m = margin.pt();
        Self {
            width,
            height,
            imageable: Region::new(m, m, (width - 2.0 * m).max(0.0), (height - 2.0 * m).max(0.0)),
        }
    }

    /// US Letter with 1-inch margins
    pub fn letter() -> Self {
        Self::with_margin(Paper::Letter, Length::from_inches(1.0))
    }

    /// A4 with 1-inch margins
    pub fn a4() -> Self {
        Self::with_margin(Paper::A4, Length::from_inches(1.0))
    }
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::letter()
    }
}
