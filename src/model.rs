use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReportType {
    Orders,
    Deliveries,
    Stock,
}

impl ReportType {
    pub const ALL: [ReportType; 3] = [ReportType::Orders, ReportType::Deliveries, ReportType::Stock];

    /// Parse the wire tag. Anything outside the closed set is rejected here,
    /// before any rendering work starts.
    pub fn parse(tag: &str) -> Result<Self, Error> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "orders" => Ok(ReportType::Orders),
            "deliveries" => Ok(ReportType::Deliveries),
            "stock" => Ok(ReportType::Stock),
            _ => Err(Error::InvalidSchema(tag.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportType::Orders => "orders",
            ReportType::Deliveries => "deliveries",
            ReportType::Stock => "stock",
        }
    }
}

impl TryFrom<String> for ReportType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ReportType::parse(&value)
    }
}

impl From<ReportType> for String {
    fn from(value: ReportType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OrderStatus {
    pub fn token(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Rejected => "REJECTED",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Cancelled,
    UnderReview,
}

impl DeliveryStatus {
    pub fn token(self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "PENDING",
            DeliveryStatus::Delivered => "DELIVERED",
            DeliveryStatus::Cancelled => "CANCELLED",
            DeliveryStatus::UnderReview => "UNDER_REVIEW",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub beneficiary_name: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub evaluated_by: Option<String>,
    #[serde(default)]
    pub evaluation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub id: String,
    #[serde(default)]
    pub survey_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub beneficiary_name: Option<String>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub evaluated_by: Option<String>,
    #[serde(default)]
    pub evaluation_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockBatch {
    pub quantity: u32,
    pub expiry_date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub batches: Vec<StockBatch>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Order(OrderRecord),
    Delivery(DeliveryRecord),
    Stock(StockRecord),
}

impl Record {
    pub fn report_type(&self) -> ReportType {
        match self {
            Record::Order(_) => ReportType::Orders,
            Record::Delivery(_) => ReportType::Deliveries,
            Record::Stock(_) => ReportType::Stock,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Order(r) => &r.id,
            Record::Delivery(r) => &r.id,
            Record::Stock(r) => &r.id,
        }
    }
}

/// One report to render. The records are already fetched and normalized;
/// every record's variant must match `report_type`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub period: Period,
    pub records: Vec<Record>,
}

#[derive(Deserialize)]
struct RawRequest {
    report_type: String,
    period: Period,
    #[serde(default)]
    records: Vec<serde_json::Value>,
}

impl ReportRequest {
    /// Parse a JSON request. The record payloads are decoded against the
    /// schema selected by the `report_type` tag.
    pub fn from_json(input: &str) -> Result<Self, Error> {
        let raw: RawRequest = serde_json::from_str(input)?;
        let report_type = ReportType::parse(&raw.report_type)?;
        let records = raw
            .records
            .into_iter()
            .map(|value| -> Result<Record, Error> {
                Ok(match report_type {
                    ReportType::Orders => Record::Order(serde_json::from_value(value)?),
                    ReportType::Deliveries => Record::Delivery(serde_json::from_value(value)?),
                    ReportType::Stock => Record::Stock(serde_json::from_value(value)?),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReportRequest {
            report_type,
            period: raw.period,
            records,
        })
    }

    /// Reject records whose variant does not belong to the request's schema.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(1..=12).contains(&self.period.month) {
            return Err(Error::InvalidRequest(format!(
                "month {} is outside 1..=12",
                self.period.month
            )));
        }
        if let Some(bad) = self
            .records
            .iter()
            .find(|r| r.report_type() != self.report_type)
        {
            return Err(Error::InvalidRequest(format!(
                "record {} is a {} record in a {} report",
                bad.id(),
                bad.report_type(),
                self.report_type
            )));
        }
        Ok(())
    }
}

/// A cell's vertical position and text as drawn on a page. Offsets are
/// measured downward from the row's top edge.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font_size: f32,
    pub baseline_offset: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Alert,
    Muted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedCell {
    pub column: usize,
    pub x: f32,
    pub emphasis: Option<Emphasis>,
    pub lines: Vec<PlacedLine>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowPlacement {
    /// Index of the record in the request.
    pub record: usize,
    /// Top of the row, measured downward from the top edge of the page.
    pub y: f32,
    pub height: f32,
    /// True when measurement failed and the minimum row height was used.
    pub fallback: bool,
    pub cells: Vec<PlacedCell>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub page_number: usize,
    pub subtitle: String,
    pub header_end: f32,
    pub rows: Vec<RowPlacement>,
}

/// The finished document and the layout decisions that produced it.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub record_count: usize,
    pub report_type: ReportType,
    pub period: Period,
    pub title: String,
    pub pages: Vec<PageLayout>,
}
