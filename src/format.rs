//! Turns one record into the strings drawn in each column.

use chrono::{DateTime, Utc};

pub use crate::model::Emphasis;
use crate::model::{DeliveryRecord, OrderRecord, OrderStatus, Record, StockRecord};
use crate::schema::{NAME_TRUNCATION, PRODUCT_TRUNCATION};

pub const MISSING: &str = "--";
pub const ANONYMOUS: &str = "Anonymous";
pub const UNTITLED: &str = "Untitled";
pub const NO_ITEMS: &str = "No items";

const DATE_FORMAT: &str = "%d/%m/%Y";

/// One column's text for one row. `secondary` lines are drawn below the
/// primary text in the smaller font.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub column: usize,
    pub text: String,
    pub emphasis: Option<Emphasis>,
    pub secondary: Vec<String>,
}

impl Cell {
    fn plain(column: usize, text: impl Into<String>) -> Self {
        Self {
            column,
            text: text.into(),
            emphasis: None,
            secondary: Vec::new(),
        }
    }

    fn with_secondary(mut self, line: String) -> Self {
        self.secondary.push(line);
        self
    }

    fn emphasized(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = Some(emphasis);
        self
    }
}

pub type CellSet = Vec<Cell>;

/// Quantities of a stock record split at the render instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StockTotals {
    pub valid: u64,
    pub expired: u64,
}

impl StockTotals {
    pub fn total(&self) -> u64 {
        self.valid + self.expired
    }
}

/// Batches expiring at or after `render_time` count as valid.
pub fn stock_totals(record: &StockRecord, render_time: DateTime<Utc>) -> StockTotals {
    record
        .batches
        .iter()
        .fold(StockTotals::default(), |mut acc, batch| {
            if batch.expiry_date >= render_time {
                acc.valid += u64::from(batch.quantity);
            } else {
                acc.expired += u64::from(batch.quantity);
            }
            acc
        })
}

/// `render_time` must be the single instant captured for the whole render.
pub fn format(record: &Record, render_time: DateTime<Utc>) -> CellSet {
    match record {
        Record::Order(r) => format_order(r),
        Record::Delivery(r) => format_delivery(r),
        Record::Stock(r) => format_stock(r, render_time),
    }
}

fn format_order(r: &OrderRecord) -> CellSet {
    let status = match r.status {
        OrderStatus::Pending => Cell::plain(2, r.status.token()),
        _ => Cell::plain(2, r.status.token()).with_secondary(format!(
            "By: {} ({})",
            or_placeholder(r.evaluated_by.as_deref(), MISSING),
            date_or_missing(r.evaluation_date)
        )),
    };

    let items = if r.items.is_empty() {
        NO_ITEMS.to_string()
    } else {
        r.items
            .iter()
            .map(|item| format!("{} ({})", item.name, item.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        Cell::plain(0, date_or_missing(r.order_date)),
        Cell::plain(1, beneficiary(r.beneficiary_name.as_deref())),
        status,
        Cell::plain(3, items),
    ]
}

fn format_delivery(r: &DeliveryRecord) -> CellSet {
    let mut evaluator = Cell::plain(3, or_placeholder(r.evaluated_by.as_deref(), MISSING));
    if let Some(date) = r.evaluation_date {
        evaluator = evaluator.with_secondary(format_date(date));
    }

    vec![
        Cell::plain(0, date_or_missing(r.survey_date)),
        Cell::plain(1, beneficiary(r.beneficiary_name.as_deref())),
        Cell::plain(2, r.status.token()),
        evaluator,
    ]
}

fn format_stock(r: &StockRecord, render_time: DateTime<Utc>) -> CellSet {
    let totals = stock_totals(r, render_time);
    let expired_style = if totals.expired > 0 {
        Emphasis::Alert
    } else {
        Emphasis::Muted
    };

    vec![
        Cell::plain(
            0,
            truncate(or_placeholder(r.product_name.as_deref(), UNTITLED), PRODUCT_TRUNCATION),
        ),
        Cell::plain(1, or_placeholder(r.category.as_deref(), MISSING)),
        Cell::plain(2, format!("{} un", totals.valid)).emphasized(Emphasis::Muted),
        Cell::plain(3, format!("{} un", totals.expired)).emphasized(expired_style),
    ]
}

fn beneficiary(name: Option<&str>) -> String {
    truncate(or_placeholder(name, ANONYMOUS), NAME_TRUNCATION)
}

/// Blank strings count as absent.
fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => placeholder,
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

pub fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_or_missing(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(|| MISSING.to_string(), format_date)
}
