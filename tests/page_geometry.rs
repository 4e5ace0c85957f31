mod common;

use aidreport_pdf::geometry::{PAGE_HEIGHT, PAGE_WIDTH};
use aidreport_pdf::{OrderStatus, RenderOptions, ReportType, render};
use common::{delivery, init_logging, order, render_time, request, stock};
use lopdf::{Document, Object};

fn options() -> RenderOptions {
    RenderOptions {
        render_time: Some(render_time()),
        ..RenderOptions::default()
    }
}

fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r as f32,
        other => panic!("not a number: {other:?}"),
    }
}

fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> Vec<f32> {
    let page = doc.get_dictionary(page_id).expect("page dict");
    page.get(b"MediaBox")
        .and_then(Object::as_array)
        .expect("MediaBox")
        .iter()
        .map(number)
        .collect()
}

#[test]
fn every_page_is_a4_portrait() {
    init_logging();
    let req = request(ReportType::Deliveries, (0..150).map(|i| delivery(i, i % 4 == 0)).collect());
    let rendered = render(&req, &options()).unwrap();

    let doc = Document::load_mem(&rendered.bytes).expect("parse generated pdf");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), rendered.page_count);
    assert!(rendered.page_count > 2);
    for page_id in pages.values() {
        assert_eq!(media_box(&doc, *page_id), vec![0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT]);
    }
}

#[test]
fn page_headers_carry_the_running_subtitle() {
    let req = request(
        ReportType::Stock,
        (0..70).map(|i| stock(i, "Beans", &[(2, 10), (1, -10)])).collect(),
    );
    let rendered = render(&req, &options()).unwrap();
    let doc = Document::load_mem(&rendered.bytes).unwrap();

    for (number, page_id) in doc.get_pages() {
        let content = doc.get_page_content(page_id).expect("page content");
        let needle = format!("Page {number}, Total: 70");
        assert!(
            content.windows(needle.len()).any(|w| w == needle.as_bytes()),
            "page {number} is missing '{needle}'"
        );
        assert!(content.windows(b"Stock Report - 03/2026".len()).any(|w| w == b"Stock Report - 03/2026"));
    }
}

#[test]
fn document_info_names_the_report() {
    let req = request(ReportType::Orders, vec![order(0, OrderStatus::Accepted, &[("Rice", 1)])]);
    let rendered = render(&req, &options()).unwrap();
    let doc = Document::load_mem(&rendered.bytes).unwrap();

    let info_id = doc
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .expect("Info reference");
    let info = doc.get_dictionary(info_id).unwrap();
    match info.get(b"Title").unwrap() {
        Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Orders Report - 03/2026"),
        other => panic!("unexpected Title: {other:?}"),
    }
}

#[test]
fn content_streams_are_compressed() {
    let req = request(ReportType::Deliveries, (0..40).map(|i| delivery(i, true)).collect());
    let rendered = render(&req, &options()).unwrap();
    let doc = Document::load_mem(&rendered.bytes).unwrap();

    for page_id in doc.get_pages().values() {
        let page = doc.get_dictionary(*page_id).unwrap();
        let content_id = page.get(b"Contents").and_then(Object::as_reference).unwrap();
        let stream = doc.get_object(content_id).and_then(Object::as_stream).unwrap();
        let filter = stream.dict.get(b"Filter").and_then(Object::as_name).unwrap();
        assert_eq!(filter, b"FlateDecode");
    }
}
