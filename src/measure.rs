//! Height estimation for wrapped cell text.
//!
//! The page flow trusts these numbers to plan space, and the drawing stage
//! draws exactly the lines `wrap` produced, so a row can never be drawn taller
//! than it was measured.

use crate::pdf::geometry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub line_count: usize,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MeasureError {
    ControlCharacter(char),
    InvalidWidth(f32),
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::ControlCharacter(ch) => {
                write!(f, "unmeasurable control character U+{:04X}", *ch as u32)
            }
            MeasureError::InvalidWidth(w) => write!(f, "invalid line width {w}"),
        }
    }
}

impl std::error::Error for MeasureError {}

/// Glyph metrics source. Implementations only provide per-character advances;
/// wrapping and line height are shared so every backend paginates the same way.
pub trait TextMeasurer: Send + Sync {
    /// Horizontal advance of `ch` in 1000-units per em.
    fn advance_1000(&self, ch: char) -> f32;

    fn word_width(&self, word: &str, font_size: f32) -> f32 {
        word.chars()
            .map(|ch| self.advance_1000(ch) * font_size / 1000.0)
            .sum()
    }

    fn space_width(&self, font_size: f32) -> f32 {
        self.advance_1000(' ') * font_size / 1000.0
    }

    fn line_height(&self, font_size: f32) -> f32 {
        geometry::line_height(font_size)
    }

    /// Greedy word wrap. Words accumulate on a line while its width stays
    /// within `max_width`; a word wider than a whole line gets a line of its own.
    /// Empty text still occupies one (empty) line.
    fn wrap(&self, text: &str, max_width: f32, font_size: f32) -> Result<Vec<String>, MeasureError> {
        if !max_width.is_finite() || max_width <= 0.0 {
            return Err(MeasureError::InvalidWidth(max_width));
        }
        if let Some(ch) = text.chars().find(|c| c.is_control()) {
            return Err(MeasureError::ControlCharacter(ch));
        }

        let space_w = self.space_width(font_size);
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_x: f32 = 0.0;

        for word in text.split_whitespace() {
            let ww = self.word_width(word, font_size);
            if current.is_empty() {
                current.push_str(word);
                current_x = ww;
            } else if current_x + space_w + ww <= max_width {
                current.push(' ');
                current.push_str(word);
                current_x += space_w + ww;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_x = ww;
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        Ok(lines)
    }

    fn measure(&self, text: &str, max_width: f32, font_size: f32) -> Result<Measurement, MeasureError> {
        let line_count = self.wrap(text, max_width, font_size)?.len();
        Ok(Measurement {
            line_count,
            height: line_count as f32 * self.line_height(font_size),
        })
    }
}

/// Fixed-advance metrics: every glyph is `advance` 1000-units wide. Useful as a
/// deterministic stand-in when exact font metrics are not needed.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMetrics {
    pub advance: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { advance: 500.0 }
    }
}

impl TextMeasurer for MonospaceMetrics {
    fn advance_1000(&self, _ch: char) -> f32 {
        self.advance
    }
}
