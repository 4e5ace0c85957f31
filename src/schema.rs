//! Column layouts, titles and output naming per report type.

use crate::model::{Period, ReportType};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSchema {
    pub label: &'static str,
    pub x_offset: f32,
    pub width_hint: Option<f32>,
}

impl ColumnSchema {
    const fn new(label: &'static str, x_offset: f32, width: f32) -> Self {
        Self {
            label,
            x_offset,
            width_hint: Some(width),
        }
    }
}

/// Name columns are truncated to this many characters in orders and deliveries.
pub const NAME_TRUNCATION: usize = 25;
/// Product names are truncated to this many characters in stock reports.
pub const PRODUCT_TRUNCATION: usize = 30;

// Tuned for the 10pt body size: an orders row can carry a two-line status
// block even when the items text fits on one line.
pub const MIN_ROW_HEIGHT_ORDERS: f32 = 40.0;
pub const MIN_ROW_HEIGHT_DELIVERIES: f32 = 25.0;
pub const MIN_ROW_HEIGHT_STOCK: f32 = 30.0;

const ORDERS_COLUMNS: [ColumnSchema; 4] = [
    ColumnSchema::new("Date", 40.0, 60.0),
    ColumnSchema::new("Beneficiary", 100.0, 120.0),
    ColumnSchema::new("Status", 220.0, 120.0),
    ColumnSchema::new("Items", 340.0, 215.0),
];

const DELIVERIES_COLUMNS: [ColumnSchema; 4] = [
    ColumnSchema::new("Date", 40.0, 70.0),
    ColumnSchema::new("Beneficiary", 110.0, 140.0),
    ColumnSchema::new("Status", 250.0, 130.0),
    ColumnSchema::new("Evaluated by", 380.0, 175.0),
];

const STOCK_COLUMNS: [ColumnSchema; 4] = [
    ColumnSchema::new("Product", 40.0, 170.0),
    ColumnSchema::new("Category", 210.0, 120.0),
    ColumnSchema::new("Valid", 330.0, 100.0),
    ColumnSchema::new("Expired", 430.0, 125.0),
];

pub fn columns_for(report_type: ReportType) -> &'static [ColumnSchema] {
    match report_type {
        ReportType::Orders => &ORDERS_COLUMNS,
        ReportType::Deliveries => &DELIVERIES_COLUMNS,
        ReportType::Stock => &STOCK_COLUMNS,
    }
}

/// Width available to a column's text: its hint, or the distance to the next
/// column (or the right content edge for the last one).
pub fn column_width(columns: &[ColumnSchema], index: usize) -> f32 {
    let col = &columns[index];
    col.width_hint.unwrap_or_else(|| {
        let next = columns
            .get(index + 1)
            .map_or(crate::pdf::geometry::CONTENT_RIGHT, |c| c.x_offset);
        next - col.x_offset
    })
}

pub fn title_for(report_type: ReportType, period: Period) -> String {
    let name = match report_type {
        ReportType::Orders => "Orders Report",
        ReportType::Deliveries => "Deliveries Report",
        ReportType::Stock => "Stock Report",
    };
    format!("{name} - {:02}/{}", period.month, period.year)
}

/// Storage-safe slug used in file and collection names. Orders keep the
/// `auto_backup` tag so existing archives stay addressable.
pub fn output_tag(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Orders => "auto_backup",
        ReportType::Deliveries => "deliveries",
        ReportType::Stock => "stock",
    }
}

pub fn min_row_height(report_type: ReportType) -> f32 {
    match report_type {
        ReportType::Orders => MIN_ROW_HEIGHT_ORDERS,
        ReportType::Deliveries => MIN_ROW_HEIGHT_DELIVERIES,
        ReportType::Stock => MIN_ROW_HEIGHT_STOCK,
    }
}
