pub mod geometry;
mod layout;
mod table;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::error::Error;
use crate::fonts::{FontEntry, FontSource, LoadedFonts, register_fonts};
use crate::format::{self, CellSet};
use crate::model::{PageLayout, RenderedDocument, ReportRequest, RowPlacement};
use crate::schema::{self, ColumnSchema};

use geometry::{CONTENT_BOTTOM, HEADER_END, PAGE_HEIGHT, PAGE_WIDTH, USABLE_ROW_HEIGHT};
use layout::{RowLayout, layout_row};
use table::{draw_header, draw_row};

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    pub fonts: FontSource,
    /// Instant stock batches are judged against. Captured once per render
    /// when unset.
    pub render_time: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FlowState {
    AwaitingPage,
    HeaderDrawn,
    RowsFlowing,
    Closed,
}

#[derive(Clone, Copy, Debug)]
struct PageCursor {
    page_number: usize,
    y: f32,
}

/// Everything one render mutates. Owned by a single `render` call and never
/// shared, so independent requests can render in parallel.
struct RenderContext<'a> {
    state: FlowState,
    cursor: PageCursor,
    content: Content,
    finished: Vec<Content>,
    pages: Vec<PageLayout>,
    title: &'a str,
    columns: &'a [ColumnSchema],
    regular: &'a FontEntry,
    bold: &'a FontEntry,
    record_count: usize,
}

impl<'a> RenderContext<'a> {
    fn new(
        title: &'a str,
        columns: &'a [ColumnSchema],
        regular: &'a FontEntry,
        bold: &'a FontEntry,
        record_count: usize,
    ) -> Self {
        Self {
            state: FlowState::AwaitingPage,
            cursor: PageCursor {
                page_number: 0,
                y: geometry::MARGIN_TOP,
            },
            content: Content::new(),
            finished: Vec::new(),
            pages: Vec::new(),
            title,
            columns,
            regular,
            bold,
            record_count,
        }
    }

    /// AwaitingPage → HeaderDrawn.
    fn start_page(&mut self) {
        debug_assert_eq!(self.state, FlowState::AwaitingPage);
        let page_number = self.pages.len() + 1;
        let subtitle = subtitle(page_number, self.record_count);
        self.cursor = PageCursor {
            page_number,
            y: geometry::MARGIN_TOP,
        };
        draw_header(
            &mut self.content,
            self.regular,
            self.bold,
            self.title,
            &subtitle,
            self.columns,
        );
        self.cursor.y = HEADER_END;
        self.pages.push(PageLayout {
            page_number,
            subtitle,
            header_end: HEADER_END,
            rows: Vec::new(),
        });
        self.state = FlowState::HeaderDrawn;
    }

    /// RowsFlowing → AwaitingPage → HeaderDrawn.
    fn break_page(&mut self) {
        self.finished
            .push(std::mem::replace(&mut self.content, Content::new()));
        self.state = FlowState::AwaitingPage;
        self.start_page();
    }

    fn place_row(&mut self, record: usize, row: RowLayout) {
        debug_assert!(matches!(
            self.state,
            FlowState::HeaderDrawn | FlowState::RowsFlowing
        ));
        // A page that has no rows yet takes the row whatever its height, so
        // an oversized row lands alone on a page instead of breaking forever.
        if self.state == FlowState::RowsFlowing && self.cursor.y + row.height > CONTENT_BOTTOM {
            log::debug!(
                "PAGE BREAK before record={} y={:.2} row_h={:.2} → page {}",
                record,
                self.cursor.y,
                row.height,
                self.cursor.page_number + 1
            );
            self.break_page();
        }
        self.state = FlowState::RowsFlowing;

        if row.height > USABLE_ROW_HEIGHT {
            log::warn!(
                "Record {} needs {:.1} units, more than a page offers ({:.1}); it will overflow page {}",
                record,
                row.height,
                USABLE_ROW_HEIGHT,
                self.cursor.page_number
            );
        }

        let placement = RowPlacement {
            record,
            y: self.cursor.y,
            height: row.height,
            fallback: row.fallback,
            cells: row.cells,
        };
        log::debug!(
            "ROW record={} page={} y={:.2} row_h={:.2}",
            record,
            self.cursor.page_number,
            placement.y,
            placement.height
        );
        draw_row(&mut self.content, self.regular, &placement);
        self.cursor.y += placement.height;
        if let Some(page) = self.pages.last_mut() {
            page.rows.push(placement);
        }
    }

    /// Seal the last page. Returns the per-page layouts and content streams.
    fn close(mut self) -> (Vec<PageLayout>, Vec<Content>) {
        debug_assert_ne!(self.state, FlowState::AwaitingPage);
        self.finished.push(self.content);
        self.state = FlowState::Closed;
        (self.pages, self.finished)
    }
}

fn subtitle(page_number: usize, record_count: usize) -> String {
    format!("Page {page_number}, Total: {record_count}")
}

/// Characters drawn with each face, for font subsetting.
fn collect_used_chars(
    title: &str,
    columns: &[ColumnSchema],
    cell_sets: &[CellSet],
) -> (HashSet<char>, HashSet<char>) {
    let mut regular: HashSet<char> = HashSet::new();
    regular.extend("Page, Total: 0123456789".chars());
    for cell in cell_sets.iter().flatten() {
        regular.extend(cell.text.chars());
        for extra in &cell.secondary {
            regular.extend(extra.chars());
        }
    }
    regular.retain(|c| !c.is_control());

    let mut bold: HashSet<char> = title.chars().collect();
    for col in columns {
        bold.extend(col.label.chars());
    }
    (regular, bold)
}

/// Lay out and draw one report. The whole document is built in memory; a
/// render either returns a finished document or an error, never part of one.
pub fn render(request: &ReportRequest, options: &RenderOptions) -> Result<RenderedDocument, Error> {
    let t0 = std::time::Instant::now();
    request.validate()?;

    let render_time = options.render_time.unwrap_or_else(Utc::now);
    let report_type = request.report_type;
    let columns = schema::columns_for(report_type);
    let title = schema::title_for(report_type, request.period);
    let min_height = schema::min_row_height(report_type);

    let fonts = LoadedFonts::load(&options.fonts)?;
    let cell_sets: Vec<CellSet> = request
        .records
        .iter()
        .map(|record| format::format(record, render_time))
        .collect();
    let t_format = t0.elapsed();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let (used_regular, used_bold) = collect_used_chars(&title, columns, &cell_sets);
    let (regular, bold) = register_fonts(&mut pdf, &fonts, &used_regular, &used_bold, &mut alloc)?;
    let t_fonts = t0.elapsed();

    let mut ctx = RenderContext::new(&title, columns, &regular, &bold, request.records.len());
    ctx.start_page();
    for (index, cells) in cell_sets.iter().enumerate() {
        let row = layout_row(cells, columns, &fonts.regular, min_height);
        ctx.place_row(index, row);
    }
    let (pages, contents) = ctx.close();
    let t_layout = t0.elapsed();

    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let mut font_pairs: Vec<(&str, Ref)> = vec![(regular.pdf_name.as_str(), regular.font_ref)];
    if bold.pdf_name != regular.pdf_name {
        font_pairs.push((bold.pdf_name.as_str(), bold.font_ref));
    }

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (name, font_ref) in &font_pairs {
            font_dict.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr(concat!("aidreport-pdf ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();
    let t_assembly = t0.elapsed();

    log::info!(
        "Render {} ({} records → {} pages): format={:.1}ms, fonts={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} bytes)",
        report_type,
        request.records.len(),
        n,
        t_format.as_secs_f64() * 1000.0,
        (t_fonts - t_format).as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(RenderedDocument {
        bytes,
        page_count: n,
        record_count: request.records.len(),
        report_type,
        period: request.period,
        title,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeliveryRecord, DeliveryStatus, Period, Record, ReportType};

    fn deliveries(n: usize) -> ReportRequest {
        ReportRequest {
            report_type: ReportType::Deliveries,
            period: Period { month: 2, year: 2026 },
            records: (0..n)
                .map(|i| {
                    Record::Delivery(DeliveryRecord {
                        id: format!("d{i}"),
                        survey_date: None,
                        beneficiary_name: Some(format!("Person {i}")),
                        status: DeliveryStatus::Delivered,
                        evaluated_by: None,
                        evaluation_date: None,
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn subtitle_text() {
        assert_eq!(subtitle(3, 120), "Page 3, Total: 120");
    }

    #[test]
    fn rows_never_cross_the_bottom_margin() {
        let doc = render(&deliveries(100), &RenderOptions::default()).unwrap();
        assert!(doc.page_count > 1);
        for page in &doc.pages {
            for row in &page.rows {
                assert!(row.y + row.height <= CONTENT_BOTTOM + 1e-3);
            }
        }
    }

    #[test]
    fn every_record_is_placed_once_in_order() {
        let doc = render(&deliveries(75), &RenderOptions::default()).unwrap();
        let order: Vec<usize> = doc
            .pages
            .iter()
            .flat_map(|p| p.rows.iter().map(|r| r.record))
            .collect();
        assert_eq!(order, (0..75).collect::<Vec<_>>());
    }

    #[test]
    fn each_page_starts_below_its_header() {
        let doc = render(&deliveries(60), &RenderOptions::default()).unwrap();
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.page_number, i + 1);
            assert_eq!(page.rows[0].y, HEADER_END);
            assert_eq!(page.subtitle, format!("Page {}, Total: 60", i + 1));
        }
    }

    #[test]
    fn used_chars_cover_cell_text() {
        let cells = vec![vec![crate::format::Cell {
            column: 0,
            text: "Açúcar".into(),
            emphasis: None,
            secondary: vec!["By: Zé".into()],
        }]];
        let (regular, bold) = collect_used_chars("Stock Report - 01/2026", &[], &cells);
        for ch in "AçúcarBy:Zé".chars() {
            assert!(regular.contains(&ch), "{ch}");
        }
        assert!(bold.contains(&'S'));
    }
}
