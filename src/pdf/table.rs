use pdf_writer::Content;

use crate::fonts::FontEntry;
use crate::model::RowPlacement;
use crate::schema::ColumnSchema;

use super::geometry::{
    CONTENT_RIGHT, LABEL_BASELINE, LABEL_SIZE, MARGIN_LEFT, MARGIN_TOP, RULE_OFFSET,
    SUBTITLE_BASELINE, SUBTITLE_SIZE, TITLE_BASELINE, TITLE_SIZE, to_pdf_y,
};
use super::layout::{set_emphasis_color, show_line};

/// Title, page subtitle, column labels and the rule under them.
pub(super) fn draw_header(
    content: &mut Content,
    regular: &FontEntry,
    bold: &FontEntry,
    title: &str,
    subtitle: &str,
    columns: &[ColumnSchema],
) {
    content.set_fill_gray(0.0);
    show_line(content, bold, TITLE_SIZE, MARGIN_LEFT, MARGIN_TOP + TITLE_BASELINE, title);

    content.set_fill_gray(0.35);
    show_line(
        content,
        regular,
        SUBTITLE_SIZE,
        MARGIN_LEFT,
        MARGIN_TOP + SUBTITLE_BASELINE,
        subtitle,
    );

    content.set_fill_gray(0.0);
    for col in columns {
        show_line(
            content,
            bold,
            LABEL_SIZE,
            col.x_offset,
            MARGIN_TOP + LABEL_BASELINE,
            col.label,
        );
    }

    let rule_y = to_pdf_y(MARGIN_TOP + RULE_OFFSET);
    content.save_state();
    content.set_line_width(1.0);
    content.move_to(MARGIN_LEFT, rule_y);
    content.line_to(CONTENT_RIGHT, rule_y);
    content.stroke();
    content.restore_state();
}

/// Draw a placed row: each line at its column x and its baseline below the
/// row's top, then a hairline at the row's bottom edge.
pub(super) fn draw_row(content: &mut Content, regular: &FontEntry, row: &RowPlacement) {
    for cell in &row.cells {
        set_emphasis_color(content, cell.emphasis);
        for line in &cell.lines {
            show_line(
                content,
                regular,
                line.font_size,
                cell.x,
                row.y + line.baseline_offset,
                &line.text,
            );
        }
    }
    content.set_fill_gray(0.0);

    let bottom = to_pdf_y(row.y + row.height);
    content.save_state();
    content.set_line_width(0.25);
    content.set_stroke_gray(0.75);
    content.move_to(MARGIN_LEFT, bottom);
    content.line_to(CONTENT_RIGHT, bottom);
    content.stroke();
    content.restore_state();
}
