//! Fixed page geometry. These values must not drift: previously produced
//! reports use exactly this A4 layout.
//!
//! Vertical positions are measured downward from the top edge of the page and
//! converted to PDF user space only when content is emitted.

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

pub const MARGIN_TOP: f32 = 40.0;
pub const MARGIN_BOTTOM: f32 = 40.0;
pub const MARGIN_LEFT: f32 = 40.0;
pub const MARGIN_RIGHT: f32 = 40.0;

/// Rightmost x any column may reach.
pub const CONTENT_RIGHT: f32 = PAGE_WIDTH - MARGIN_RIGHT;
/// Lowest y a row may reach before it has to move to the next page.
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN_BOTTOM;

pub const TITLE_SIZE: f32 = 16.0;
pub const SUBTITLE_SIZE: f32 = 10.0;
pub const LABEL_SIZE: f32 = 10.0;
pub const BODY_SIZE: f32 = 10.0;
pub const SECONDARY_SIZE: f32 = 8.0;

/// Line pitch as a multiple of the font size, shared by measuring and drawing.
pub const LINE_HEIGHT_RATIO: f32 = 1.2;

// Header baselines, relative to the top margin.
pub const TITLE_BASELINE: f32 = 16.0;
pub const SUBTITLE_BASELINE: f32 = 34.0;
pub const LABEL_BASELINE: f32 = 56.0;
pub const RULE_OFFSET: f32 = 64.0;
pub const HEADER_HEIGHT: f32 = 72.0;

/// y where the first row of every page starts.
pub const HEADER_END: f32 = MARGIN_TOP + HEADER_HEIGHT;

/// Vertical space a page offers to rows.
pub const USABLE_ROW_HEIGHT: f32 = CONTENT_BOTTOM - HEADER_END;

/// Added below the tallest measured cell of a row.
pub const ROW_PADDING: f32 = 10.0;

/// Distance between consecutive secondary (small) lines in a cell, and between
/// the last primary line and the first secondary one.
pub const SECONDARY_LEADING: f32 = 10.0;

pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_RATIO
}

/// Convert a top-down y into PDF user space.
pub fn to_pdf_y(y: f32) -> f32 {
    PAGE_HEIGHT - y
}
