mod error;
mod fonts;
mod format;
mod measure;
mod model;
mod pdf;
pub mod publish;
pub mod schema;

pub use error::{Error, SinkError, SinkStage};
pub use fonts::{BOLD_FONT_ENV, FONT_ENV, FaceMetrics, FontSource, StandardFont};
pub use format::{
    ANONYMOUS, Cell, CellSet, Emphasis, MISSING, NO_ITEMS, StockTotals, UNTITLED, format, format_date,
    stock_totals,
};
pub use measure::{MeasureError, Measurement, MonospaceMetrics, TextMeasurer};
pub use model::{
    DeliveryRecord, DeliveryStatus, OrderItem, OrderRecord, OrderStatus, PageLayout, Period,
    PlacedCell, PlacedLine, Record, RenderedDocument, ReportRequest, ReportType, RowPlacement,
    StockBatch, StockRecord,
};
pub use pdf::geometry;
pub use pdf::{RenderOptions, render};
pub use schema::{ColumnSchema, columns_for, min_row_height, output_tag, title_for};

use rayon::prelude::*;

/// Render independent requests in parallel. Results come back in request
/// order; one failing request does not affect the others.
pub fn render_all(
    requests: &[ReportRequest],
    options: &RenderOptions,
) -> Vec<Result<RenderedDocument, Error>> {
    let t0 = std::time::Instant::now();
    let results: Vec<_> = requests
        .par_iter()
        .map(|request| render(request, options))
        .collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    log::info!(
        "Rendered {} reports ({} failed) in {:.1}ms",
        requests.len(),
        failed,
        t0.elapsed().as_secs_f64() * 1000.0
    );
    results
}
