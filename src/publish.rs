//! Hand a finished document to storage and record where it went.
//!
//! Rendering and persistence fail differently: a build failure means there is
//! nothing to store, while a persistence failure returns the built document in
//! [`Error::NotPersisted`] so the caller can retry without rendering again.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, SinkError, SinkStage};
use crate::model::{Period, RenderedDocument, ReportRequest, ReportType};
use crate::pdf::{RenderOptions, render};
use crate::schema;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub trait BlobStore {
    fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), SinkError>;
}

pub trait UrlIssuer {
    /// A long-lived URL the stored document can be fetched from.
    fn retrieval_url(&self, path: &str) -> Result<String, SinkError>;
}

pub trait MetadataSink {
    fn record(&self, metadata: &ReportMetadata) -> Result<(), SinkError>;
}

/// The three collaborators a report is published through.
#[derive(Clone, Copy)]
pub struct Sinks<'a> {
    pub store: &'a dyn BlobStore,
    pub urls: &'a dyn UrlIssuer,
    pub metadata: &'a dyn MetadataSink,
}

/// Audit/listing entry for one stored report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub title: String,
    pub month: u32,
    pub year: i32,
    pub record_count: usize,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub file_url: String,
    pub storage_path: String,
}

#[derive(Debug)]
pub struct PublishedReport {
    pub document: RenderedDocument,
    pub metadata: ReportMetadata,
}

/// `reports/<tag>_<year>_<month>_<millis>.pdf`
pub fn storage_path(report_type: ReportType, period: Period, generated_at: DateTime<Utc>) -> String {
    format!(
        "reports/{}_{}_{}_{}.pdf",
        schema::output_tag(report_type),
        period.year,
        period.month,
        generated_at.timestamp_millis()
    )
}

/// Requests published together share one generation instant, so two with the
/// same type and period would be stored under the same path.
pub fn ensure_distinct_targets(requests: &[ReportRequest]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for request in requests {
        let key = (request.report_type, request.period.year, request.period.month);
        if !seen.insert(key) {
            return Err(Error::InvalidRequest(format!(
                "more than one {} report for {:02}/{} in the same batch",
                request.report_type, request.period.month, request.period.year
            )));
        }
    }
    Ok(())
}

/// Render a request and publish it. The generation instant is captured once
/// and used both to judge stock expiry and to stamp the stored report.
pub fn publish(
    request: &ReportRequest,
    options: &RenderOptions,
    generated_by: &str,
    sinks: Sinks<'_>,
) -> Result<PublishedReport, Error> {
    let generated_at = options.render_time.unwrap_or_else(Utc::now);
    let options = RenderOptions {
        render_time: Some(generated_at),
        ..options.clone()
    };
    let document = render(request, &options)?;
    persist(document, generated_by, generated_at, sinks)
}

/// Store an already rendered document, issue its URL and write its metadata.
/// Nothing is retried here.
pub fn persist(
    document: RenderedDocument,
    generated_by: &str,
    generated_at: DateTime<Utc>,
    sinks: Sinks<'_>,
) -> Result<PublishedReport, Error> {
    let path = storage_path(document.report_type, document.period, generated_at);

    if let Err(source) = sinks.store.put(&path, &document.bytes, PDF_CONTENT_TYPE) {
        return Err(not_persisted(SinkStage::Store, document, source));
    }

    let file_url = match sinks.urls.retrieval_url(&path) {
        Ok(url) => url,
        Err(source) => return Err(not_persisted(SinkStage::IssueUrl, document, source)),
    };

    let metadata = ReportMetadata {
        title: document.title.clone(),
        month: document.period.month,
        year: document.period.year,
        record_count: document.record_count,
        generated_at,
        generated_by: generated_by.to_string(),
        kind: schema::output_tag(document.report_type).to_string(),
        file_url,
        storage_path: path,
    };

    if let Err(source) = sinks.metadata.record(&metadata) {
        return Err(not_persisted(SinkStage::Metadata, document, source));
    }

    log::info!(
        "Published {} ({} pages, {} bytes) to {}",
        metadata.title,
        document.page_count,
        document.bytes.len(),
        metadata.storage_path
    );

    Ok(PublishedReport { document, metadata })
}

fn not_persisted(stage: SinkStage, document: RenderedDocument, source: SinkError) -> Error {
    log::warn!("Report '{}' built but not persisted: {stage} failed: {source}", document.title);
    Error::NotPersisted {
        stage,
        document: Box::new(document),
        source,
    }
}

/// Blob store backed by a local directory; issues `file://` URLs.
#[derive(Clone, Debug)]
pub struct LocalDirectory {
    root: PathBuf,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> SinkError {
    SinkError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl BlobStore for LocalDirectory {
    fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<(), SinkError> {
        let target = self.resolve(path);
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        }
        std::fs::write(&target, bytes).map_err(|e| io_error(&target, e))?;
        log::debug!("Stored {} ({content_type}, {} bytes)", target.display(), bytes.len());
        Ok(())
    }
}

impl UrlIssuer for LocalDirectory {
    fn retrieval_url(&self, path: &str) -> Result<String, SinkError> {
        let target = self.resolve(path);
        if !target.is_file() {
            return Err(SinkError::Rejected(format!(
                "{} has not been stored",
                target.display()
            )));
        }
        let absolute = std::fs::canonicalize(&target).map_err(|e| io_error(&target, e))?;
        Ok(format!("file://{}", absolute.display()))
    }
}

/// Appends one JSON object per published report.
#[derive(Clone, Debug)]
pub struct JsonLinesMetadata {
    path: PathBuf,
}

impl JsonLinesMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn read_all(&self) -> Result<Vec<ReportMetadata>, SinkError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.path, e)),
        };
        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(SinkError::from))
            .collect()
    }
}

impl MetadataSink for JsonLinesMetadata {
    fn record(&self, metadata: &ReportMetadata) -> Result<(), SinkError> {
        let line = serde_json::to_string(metadata)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| io_error(&self.path, e))?;
        Ok(())
    }
}
