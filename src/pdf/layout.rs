use pdf_writer::{Content, Name, Str};

use crate::fonts::FontEntry;
use crate::format::CellSet;
use crate::measure::{MeasureError, TextMeasurer};
use crate::model::{Emphasis, PlacedCell, PlacedLine};
use crate::schema::{ColumnSchema, column_width};

use super::geometry::{BODY_SIZE, ROW_PADDING, SECONDARY_LEADING, SECONDARY_SIZE, to_pdf_y};

pub(super) struct RowLayout {
    pub(super) cells: Vec<PlacedCell>,
    pub(super) height: f32,
    pub(super) fallback: bool,
}

/// Measure every cell of a row and fix where each of its lines will sit.
/// The row is as tall as its tallest cell plus padding, never less than
/// `min_height`. If any cell cannot be measured the row keeps its text on
/// single lines and takes `min_height`.
pub(super) fn layout_row(
    cells: &CellSet,
    columns: &[ColumnSchema],
    measurer: &dyn TextMeasurer,
    min_height: f32,
) -> RowLayout {
    match measure_cells(cells, columns, measurer) {
        Ok((placed, tallest)) => RowLayout {
            cells: placed,
            height: min_height.max(tallest + ROW_PADDING),
            fallback: false,
        },
        Err(e) => {
            log::warn!("Cell measurement failed ({e}); using minimum row height {min_height}");
            RowLayout {
                cells: fallback_cells(cells, columns),
                height: min_height,
                fallback: true,
            }
        }
    }
}

fn measure_cells(
    cells: &CellSet,
    columns: &[ColumnSchema],
    measurer: &dyn TextMeasurer,
) -> Result<(Vec<PlacedCell>, f32), MeasureError> {
    let mut tallest: f32 = 0.0;
    let mut placed = Vec::with_capacity(cells.len());

    for cell in cells {
        let width = column_width(columns, cell.column);
        let body_line_h = measurer.line_height(BODY_SIZE);
        let primary = measurer.wrap(&cell.text, width, BODY_SIZE)?;

        let mut lines: Vec<PlacedLine> = primary
            .into_iter()
            .enumerate()
            .map(|(i, text)| PlacedLine {
                text,
                font_size: BODY_SIZE,
                baseline_offset: (i + 1) as f32 * body_line_h,
            })
            .collect();
        let mut height = lines.len() as f32 * body_line_h;
        let mut baseline = height;

        for extra in &cell.secondary {
            for text in measurer.wrap(extra, width, SECONDARY_SIZE)? {
                baseline += SECONDARY_LEADING;
                height += SECONDARY_LEADING;
                lines.push(PlacedLine {
                    text,
                    font_size: SECONDARY_SIZE,
                    baseline_offset: baseline,
                });
            }
        }

        tallest = tallest.max(height);
        placed.push(PlacedCell {
            column: cell.column,
            x: columns[cell.column].x_offset,
            emphasis: cell.emphasis,
            lines,
        });
    }

    Ok((placed, tallest))
}

/// Unwrapped, sanitized lines for a row whose text could not be measured.
fn fallback_cells(cells: &CellSet, columns: &[ColumnSchema]) -> Vec<PlacedCell> {
    let body_line_h = super::geometry::line_height(BODY_SIZE);
    cells
        .iter()
        .map(|cell| {
            let mut lines = vec![PlacedLine {
                text: strip_controls(&cell.text),
                font_size: BODY_SIZE,
                baseline_offset: body_line_h,
            }];
            let mut baseline = body_line_h;
            for extra in &cell.secondary {
                baseline += SECONDARY_LEADING;
                lines.push(PlacedLine {
                    text: strip_controls(extra),
                    font_size: SECONDARY_SIZE,
                    baseline_offset: baseline,
                });
            }
            PlacedCell {
                column: cell.column,
                x: columns[cell.column].x_offset,
                emphasis: cell.emphasis,
                lines,
            }
        })
        .collect()
}

fn strip_controls(text: &str) -> String {
    text.split(|c: char| c.is_control() || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn set_emphasis_color(content: &mut Content, emphasis: Option<Emphasis>) {
    match emphasis {
        Some(Emphasis::Alert) => {
            content.set_fill_rgb(0.80, 0.10, 0.10);
        }
        Some(Emphasis::Muted) => {
            content.set_fill_gray(0.45);
        }
        None => {
            content.set_fill_gray(0.0);
        }
    }
}

/// Draw one line of text with its baseline at top-down `y`.
pub(super) fn show_line(
    content: &mut Content,
    font: &FontEntry,
    font_size: f32,
    x: f32,
    y: f32,
    text: &str,
) {
    if text.is_empty() {
        return;
    }
    content.begin_text();
    content.set_font(Name(font.pdf_name.as_bytes()), font_size);
    content.next_line(x, to_pdf_y(y));
    content.show(Str(&font.encode(text)));
    content.end_text();
}
