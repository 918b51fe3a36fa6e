//! Headless renderer for the HTML subset tickets are written in
//!
//! Tickets are short receipts and labels, so the renderer only understands what
//! they actually use: running text, line breaks, block elements, bold, headings,
//! horizontal rules and preformatted text. Unknown tags are ignored and their
//! text content is kept.

use crate::error::{Error, Result};
use crate::layout::Region;

use super::{text_width, FontFace, GraphicsTarget, Renderer, TextRun};

/// Fraction of the font size above the baseline
const ASCENT: f64 = 0.8;
const RULE_THICKNESS: f64 = 0.5;

/// Lays tickets out as lines of Helvetica text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkupRenderer {
    /// Body text size in points
    pub font_size: f64,
    /// Line height as a multiple of the tallest run on the line
    pub line_spacing: f64,
}

impl MarkupRenderer {
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            line_spacing: 1.2,
        }
    }
}

/// Something placed on the surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceItem {
    Text(TextRun),
    Rule(Region),
}

/// Result of laying out a ticket
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSurface {
    pub width: f64,
    pub height: f64,
    pub items: Vec<SurfaceItem>,
}

impl MarkupSurface {
    /// Text of every run, one entry per run, in paint order
    pub fn texts(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                SurfaceItem::Text(run) => Some(run.text.as_str()),
                SurfaceItem::Rule(_) => None,
            })
            .collect()
    }
}

impl Renderer for MarkupRenderer {
    type Surface = MarkupSurface;

    fn layout(&self, content: &str, width: f64, min_height: f64) -> Result<MarkupSurface> {
        if !width.is_finite() {
            return Err(Error::Layout(format!("width {width} is not finite")));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(Error::Layout(format!("font size {} is not positive", self.font_size)));
        }

        let mut engine = LayoutEngine::new(*self, width);
        for token in tokenize(content) {
            engine.feed(token);
        }
        Ok(engine.finish(min_height))
    }

    fn paint(&self, surface: &MarkupSurface, target: &mut dyn GraphicsTarget) {
        for item in &surface.items {
            match item {
                SurfaceItem::Text(run) => target.fill_text(run),
                SurfaceItem::Rule(rect) => target.fill_rect(*rect),
            }
        }
    }

    fn extent(&self, surface: &MarkupSurface) -> (f64, f64) {
        (surface.width, surface.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Open { name: String, self_closing: bool },
    Close(String),
}

fn tokenize(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = content;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
            continue;
        }

        if starts_tag(rest) {
            if let Some(end) = rest.find('>') {
                if let Some(token) = parse_tag(&rest[1..end]) {
                    tokens.push(token);
                }
                rest = &rest[end + 1..];
                continue;
            }
        }

        // Plain text up to the next tag, or a lone '<'
        let skip = usize::from(rest.starts_with('<'));
        let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        tokens.push(Token::Text(decode_entities(&rest[..end])));
        rest = &rest[end..];
    }

    tokens
}

fn starts_tag(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

fn parse_tag(inner: &str) -> Option<Token> {
    let inner = inner.trim();
    if inner.starts_with('!') || inner.starts_with('?') {
        return None;
    }

    let (closing, body) = match inner.strip_prefix('/') {
        Some(body) => (true, body.trim_start()),
        None => (false, inner),
    };
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    if closing {
        Some(Token::Close(name))
    } else {
        Some(Token::Open {
            name,
            self_closing: body.ends_with('/'),
        })
    }
}

/// Replace character references. Unknown references are left as written.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest[1..]
            .char_indices()
            .take(11)
            .find(|&(_, c)| c == ';')
            .and_then(|(semi, _)| decode_entity(&rest[1..semi + 1]).map(|c| (c, semi + 2)));

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "euro" => Some('€'),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct Line {
    runs: Vec<TextRun>,
    width: f64,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

struct LayoutEngine {
    renderer: MarkupRenderer,
    width: f64,
    y: f64,
    items: Vec<SurfaceItem>,
    line: Line,
    pending_space: bool,
    bold: usize,
    heading: Option<u8>,
    pre: usize,
    skip: usize,
}

impl LayoutEngine {
    fn new(renderer: MarkupRenderer, width: f64) -> Self {
        Self {
            renderer,
            width,
            y: 0.0,
            items: Vec::new(),
            line: Line::default(),
            pending_space: false,
            bold: 0,
            heading: None,
            pre: 0,
            skip: 0,
        }
    }

    fn face(&self) -> FontFace {
        if self.bold > 0 || self.heading.is_some() {
            FontFace::Bold
        } else {
            FontFace::Regular
        }
    }

    fn size(&self) -> f64 {
        let factor = match self.heading {
            Some(1) => 2.0,
            Some(2) => 1.5,
            Some(3) => 1.17,
            Some(5) => 0.83,
            Some(6) => 0.67,
            _ => 1.0,
        };
        self.renderer.font_size * factor
    }

    fn feed(&mut self, token: Token) {
        match token {
            Token::Text(text) if self.skip == 0 => {
                if self.pre > 0 {
                    self.preformatted(&text);
                } else {
                    self.flow(&text);
                }
            }
            Token::Text(_) => {}
            Token::Open { name, self_closing } => self.open(&name, self_closing),
            Token::Close(name) => self.close(&name),
        }
    }

    fn open(&mut self, name: &str, self_closing: bool) {
        match name {
            "head" | "style" | "script" | "title" if !self_closing => self.skip += 1,
            "br" => self.hard_break(),
            "hr" => self.rule(),
            "b" | "strong" | "th" if !self_closing => self.bold += 1,
            "pre" => {
                self.soft_break();
                if !self_closing {
                    self.pre += 1;
                }
            }
            _ => {
                if let Some(level) = heading_level(name) {
                    self.soft_break();
                    self.heading = Some(level);
                } else if is_block(name) {
                    self.soft_break();
                }
            }
        }
    }

    fn close(&mut self, name: &str) {
        match name {
            "head" | "style" | "script" | "title" => self.skip = self.skip.saturating_sub(1),
            "b" | "strong" => self.bold = self.bold.saturating_sub(1),
            "th" => {
                self.bold = self.bold.saturating_sub(1);
                self.pending_space = true;
            }
            "td" => self.pending_space = true,
            "pre" => {
                self.pre = self.pre.saturating_sub(1);
                self.soft_break();
            }
            _ => {
                if heading_level(name).is_some() {
                    self.soft_break();
                    self.heading = None;
                } else if is_block(name) {
                    self.soft_break();
                }
            }
        }
    }

    /// Running text: whitespace collapses, words wrap at the surface width
    fn flow(&mut self, text: &str) {
        // U+00A0 must survive as a hard space, so only ASCII whitespace separates words
        if text.starts_with(|c: char| c.is_ascii_whitespace()) {
            self.pending_space = true;
        }
        let mut words = text
            .split(|c: char| c.is_ascii_whitespace())
            .filter(|word| !word.is_empty())
            .peekable();
        while let Some(word) = words.next() {
            self.place_word(&word.replace('\u{a0}', " "));
            if words.peek().is_some() {
                self.pending_space = true;
            }
        }
        if text.ends_with(|c: char| c.is_ascii_whitespace()) {
            self.pending_space = true;
        }
    }

    /// Preformatted text: spaces kept, newlines break, no wrapping
    fn preformatted(&mut self, text: &str) {
        let mut segments = text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            let segment = segment.trim_end_matches('\r').replace('\t', "    ");
            if !segment.is_empty() {
                self.pending_space = false;
                self.push_text(&segment);
            }
            if segments.peek().is_some() {
                self.hard_break();
            }
        }
    }

    fn place_word(&mut self, word: &str) {
        let (face, size) = (self.face(), self.size());
        let space = if self.pending_space && !self.line.is_empty() {
            text_width(" ", face, size)
        } else {
            0.0
        };
        let word_width = text_width(word, face, size);

        if !self.line.is_empty() && self.line.width + space + word_width > self.width {
            self.soft_break();
        }
        self.push_text(word);
    }

    /// Append `text` to the current line, honouring a pending space
    fn push_text(&mut self, text: &str) {
        let (face, size) = (self.face(), self.size());
        let space = self.pending_space && !self.line.is_empty();
        let space_width = if space { text_width(" ", face, size) } else { 0.0 };
        self.pending_space = false;

        let x = self.line.width + space_width;
        self.line.width = x + text_width(text, face, size);

        match self.line.runs.last_mut() {
            Some(last) if last.face == face && last.size == size => {
                if space {
                    last.text.push(' ');
                }
                last.text.push_str(text);
            }
            _ => self.line.runs.push(TextRun {
                x,
                baseline: 0.0,
                face,
                size,
                text: text.to_string(),
            }),
        }
    }

    /// End the current line if it holds anything
    fn soft_break(&mut self) {
        if !self.line.is_empty() {
            self.hard_break();
        }
        self.pending_space = false;
    }

    /// End the current line, emitting an empty line if need be
    fn hard_break(&mut self) {
        let line = std::mem::take(&mut self.line);
        let tallest = line
            .runs
            .iter()
            .map(|run| run.size)
            .fold(self.size(), f64::max);
        let baseline = self.y + tallest * ASCENT;

        for mut run in line.runs {
            run.baseline = baseline;
            self.items.push(SurfaceItem::Text(run));
        }
        self.y += tallest * self.renderer.line_spacing;
        self.pending_space = false;
    }

    fn rule(&mut self) {
        self.soft_break();
        let band = self.renderer.font_size * 0.6;
        self.items.push(SurfaceItem::Rule(Region::new(
            0.0,
            self.y + (band - RULE_THICKNESS) / 2.0,
            self.width.max(0.0),
            RULE_THICKNESS,
        )));
        self.y += band;
    }

    fn finish(mut self, min_height: f64) -> MarkupSurface {
        self.soft_break();
        MarkupSurface {
            width: self.width,
            height: self.y.max(min_height),
            items: self.items,
        }
    }
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "center"
            | "blockquote"
            | "section"
            | "header"
            | "footer"
            | "dl"
            | "dt"
            | "dd"
            | "form"
            | "body"
    )
}
