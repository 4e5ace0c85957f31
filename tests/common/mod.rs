#![allow(dead_code)]

use std::sync::Mutex;

use aidreport_pdf::publish::{BlobStore, MetadataSink, ReportMetadata, Sinks, UrlIssuer};
use aidreport_pdf::{
    DeliveryRecord, DeliveryStatus, OrderItem, OrderRecord, OrderStatus, Period, Record,
    ReportRequest, ReportType, SinkError, StockBatch, StockRecord,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn render_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

pub fn march_2026() -> Period {
    Period { month: 3, year: 2026 }
}

pub fn request(report_type: ReportType, records: Vec<Record>) -> ReportRequest {
    ReportRequest {
        report_type,
        period: march_2026(),
        records,
    }
}

pub fn order(id: usize, status: OrderStatus, items: &[(&str, u32)]) -> Record {
    Record::Order(OrderRecord {
        id: format!("o{id}"),
        order_date: Some(render_time() - Duration::days(3)),
        beneficiary_name: Some(format!("Beneficiary {id}")),
        status,
        evaluated_by: (status != OrderStatus::Pending).then(|| "Maria".to_string()),
        evaluation_date: (status != OrderStatus::Pending).then(|| render_time() - Duration::days(1)),
        items: items
            .iter()
            .map(|(name, quantity)| OrderItem {
                name: name.to_string(),
                quantity: *quantity,
            })
            .collect(),
    })
}

pub fn delivery(id: usize, evaluated: bool) -> Record {
    Record::Delivery(DeliveryRecord {
        id: format!("d{id}"),
        survey_date: Some(render_time() - Duration::days(10)),
        beneficiary_name: Some(format!("Family {id}")),
        status: if evaluated {
            DeliveryStatus::Delivered
        } else {
            DeliveryStatus::Pending
        },
        evaluated_by: evaluated.then(|| "Ana".to_string()),
        evaluation_date: evaluated.then(|| render_time() - Duration::days(2)),
    })
}

/// `batches` are (quantity, days from the render instant until expiry).
pub fn stock(id: usize, name: &str, batches: &[(u32, i64)]) -> Record {
    Record::Stock(StockRecord {
        id: format!("s{id}"),
        product_name: Some(name.to_string()),
        category: Some("Food".to_string()),
        batches: batches
            .iter()
            .map(|(quantity, days)| StockBatch {
                quantity: *quantity,
                expiry_date: render_time() + Duration::days(*days),
            })
            .collect(),
    })
}

/// Blob store, URL issuer and metadata sink kept in memory. Any stage can be
/// told to fail.
#[derive(Default)]
pub struct MemorySinks {
    pub blobs: Mutex<Vec<(String, Vec<u8>, String)>>,
    pub records: Mutex<Vec<ReportMetadata>>,
    pub fail_store: bool,
    pub fail_url: bool,
    pub fail_metadata: bool,
}

impl MemorySinks {
    pub fn sinks(&self) -> Sinks<'_> {
        Sinks {
            store: self,
            urls: self,
            metadata: self,
        }
    }
}

impl BlobStore for MemorySinks {
    fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), SinkError> {
        if self.fail_store {
            return Err(SinkError::Rejected("store unavailable".into()));
        }
        self.blobs
            .lock()
            .unwrap()
            .push((path.to_string(), bytes.to_vec(), content_type.to_string()));
        Ok(())
    }
}

impl UrlIssuer for MemorySinks {
    fn retrieval_url(&self, path: &str) -> Result<String, SinkError> {
        if self.fail_url {
            return Err(SinkError::Rejected("signing key missing".into()));
        }
        Ok(format!("mem://{path}"))
    }
}

impl MetadataSink for MemorySinks {
    fn record(&self, metadata: &ReportMetadata) -> Result<(), SinkError> {
        if self.fail_metadata {
            return Err(SinkError::Rejected("metadata store offline".into()));
        }
        self.records.lock().unwrap().push(metadata.clone());
        Ok(())
    }
}
