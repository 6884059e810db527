//! Page layout abstractions: positioned words and region-cropped text.
//!
//! The layout engine that reads PDFs lives outside this crate. Anything that
//! can hand over words with bounding boxes implements [`LayoutPage`];
//! [`DocumentLayout`] is the serde-loadable dump of such an engine's output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Vertical distance within which words are considered on the same line.
pub const LINE_TOLERANCE: f64 = 3.0;

/// Default horizontal gap under which neighbouring words are glued together.
pub const DEFAULT_X_TOLERANCE: f64 = 1.0;

/// Advance used by [`PageLayout::with_text`] for synthetic layouts.
const GLYPH_WIDTH: f64 = 5.0;
const GLYPH_HEIGHT: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Word {
    pub fn centre_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn centre_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn page(width: f64, height: f64) -> Self {
        Self {
            x0: 0.0,
            top: 0.0,
            x1: width,
            bottom: height,
        }
    }

    /// True when the word's centre lies inside the box (edges included).
    pub fn holds(&self, word: &Word) -> bool {
        let (x, y) = (word.centre_x(), word.centre_y());
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }
}

pub trait LayoutPage {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn words(&self) -> &[Word];

    /// Text of the words inside `bbox`, line by line.
    fn crop_text(&self, bbox: BBox, x_tolerance: f64) -> String;

    fn text(&self, x_tolerance: f64) -> String {
        self.crop_text(BBox::page(self.width(), self.height()), x_tolerance)
    }
}

pub trait LayoutDocument {
    type Page: LayoutPage;

    /// Pages in document order.
    fn pages(&self) -> &[Self::Page];

    fn page_count(&self) -> usize {
        self.pages().len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl PageLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            words: Vec::new(),
        }
    }

    /// Lay `text` out as one line starting at (`x0`, `top`), one word per
    /// whitespace-separated token, with a fixed glyph advance.
    pub fn with_text(mut self, x0: f64, top: f64, text: &str) -> Self {
        let mut x = x0;
        for token in text.split_whitespace() {
            let width = token.chars().count() as f64 * GLYPH_WIDTH;
            self.words.push(Word {
                text: token.to_string(),
                x0: x,
                x1: x + width,
                top,
                bottom: top + GLYPH_HEIGHT,
            });
            x += width + GLYPH_WIDTH;
        }
        self
    }
}

impl LayoutPage for PageLayout {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn words(&self) -> &[Word] {
        &self.words
    }

    fn crop_text(&self, bbox: BBox, x_tolerance: f64) -> String {
        words_to_text(self.words.iter().filter(|w| bbox.holds(w)), x_tolerance)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn new(pages: Vec<PageLayout>) -> Self {
        Self { pages }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse layout json")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("load layout {}", path.display()))
    }
}

impl LayoutDocument for DocumentLayout {
    type Page = PageLayout;

    fn pages(&self) -> &[PageLayout] {
        &self.pages
    }
}

/// Group words into reading-order lines: top to bottom, then left to right.
pub fn group_lines<'a>(words: impl IntoIterator<Item = &'a Word>) -> Vec<Vec<&'a Word>> {
    let mut words: Vec<&Word> = words.into_iter().collect();
    words.sort_by(|a, b| {
        a.top
            .total_cmp(&b.top)
            .then_with(|| a.x0.total_cmp(&b.x0))
    });

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    let mut line_top = f64::NEG_INFINITY;
    for word in words {
        match lines.last_mut() {
            Some(line) if word.top - line_top <= LINE_TOLERANCE => line.push(word),
            _ => {
                line_top = word.top;
                lines.push(vec![word]);
            }
        }
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    }
    lines
}

/// Render words as text. Neighbours further apart than `x_tolerance` are
/// separated by a space; closer ones are glued.
pub fn words_to_text<'a>(words: impl IntoIterator<Item = &'a Word>, x_tolerance: f64) -> String {
    group_lines(words)
        .iter()
        .map(|line| {
            let mut out = String::new();
            let mut prev: Option<&Word> = None;
            for &word in line {
                if let Some(p) = prev {
                    if word.x0 - p.x1 > x_tolerance {
                        out.push(' ');
                    }
                }
                out.push_str(&word.text);
                prev = Some(word);
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x0: f64, x1: f64, top: f64) -> Word {
        Word {
            text: text.to_string(),
            x0,
            x1,
            top,
            bottom: top + 10.0,
        }
    }

    #[test]
    fn test_words_grouped_into_lines() {
        let words = vec![
            word("SHOP", 60.0, 80.0, 101.5),
            word("COFFEE", 20.0, 50.0, 100.0),
            word("NEXT", 20.0, 40.0, 120.0),
        ];
        assert_eq!(words_to_text(&words, 1.0), "COFFEE SHOP\nNEXT");
    }

    #[test]
    fn test_close_words_are_glued() {
        let words = vec![word("AMOUNT", 10.0, 40.0, 0.0), word("($)", 40.5, 55.0, 0.0)];
        assert_eq!(words_to_text(&words, 1.0), "AMOUNT($)");
        assert_eq!(words_to_text(&words, 0.1), "AMOUNT ($)");
    }

    #[test]
    fn test_crop_keeps_words_centred_inside() {
        let page = PageLayout::new(600.0, 800.0)
            .with_text(10.0, 10.0, "LEFT SIDE")
            .with_text(400.0, 10.0, "RIGHT")
            .with_text(10.0, 500.0, "BELOW");
        let bbox = BBox {
            x0: 0.0,
            top: 0.0,
            x1: 300.0,
            bottom: 100.0,
        };
        assert_eq!(page.crop_text(bbox, 1.0), "LEFT SIDE");
        assert_eq!(page.text(1.0), "LEFT SIDE RIGHT\nBELOW");
    }

    #[test]
    fn test_layout_loads_from_json() {
        let json = r#"{"pages":[{"width":612,"height":792,"words":[
            {"text":"HELLO","x0":10,"x1":40,"top":5,"bottom":15}]}]}"#;
        let doc = DocumentLayout::from_json_str(json).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages()[0].text(1.0), "HELLO");
    }
}
