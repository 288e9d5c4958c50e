//! End-to-end scans over a mixed registry served by `wiremock`.

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dsstock_core::records::{MODEL_TOTAL_SITE, MODEL_UNAVAILABLE};
use dsstock_core::{
    Confidence, HeuristicOverride, ScanProgress, SiteEntry, SiteRegistry, SiteStrategy,
    StockRecord,
};
use dsstock_scraper::{
    run_scan, Fetch, FetchError, FetchSettings, HttpFetcher, OverrideTable, ScanOptions,
};

fn http() -> HttpFetcher {
    HttpFetcher::new(&FetchSettings {
        timeout_secs: 5,
        user_agent: "dsstock-test/0.1".to_string(),
    })
    .expect("failed to build test HttpFetcher")
}

fn next_data(payload: &serde_json::Value) -> String {
    format!(
        r#"<html><body><script id="__NEXT_DATA__" type="application/json">{payload}</script></body></html>"#
    )
}

fn structured(country: &str, base_url: String) -> SiteEntry {
    SiteEntry {
        country: country.to_string(),
        strategy: SiteStrategy::Structured {
            base_url,
            latitude: 46.2276,
            longitude: 2.2137,
            landing_path: None,
        },
    }
}

fn heuristic(country: &str, url: String, kind: Option<HeuristicOverride>) -> SiteEntry {
    SiteEntry {
        country: country.to_string(),
        strategy: SiteStrategy::Heuristic {
            url,
            override_kind: kind,
            proximity_window: None,
        },
    }
}

async fn mount_page(server: &MockServer, at: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_stock(server: &MockServer, model: &str, body_style: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/stock/{model}/{body_style}")))
        .and(query_param("channel", "b2c"))
        .and(query_param("latitude", "46.2276"))
        .and(query_param("longitude", "2.2137"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn landing_payload() -> serde_json::Value {
    json!({"props": {"pageProps": {"range": [
        {"model": {"id": 7, "title": "DS 7"}, "bodyStyle": {"id": 12}},
        {"model": {"id": 9, "title": "DS 9"}, "bodyStyle": {"id": 3}},
        {"card": {"model": {"id": 7, "title": "DS 7"}, "bodyStyle": {"id": 12}}}
    ]}}})
}

#[tokio::test]
async fn structured_site_reports_every_discovered_model_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, next_data(&landing_payload())).await;
    mount_stock(
        &server,
        "7",
        "12",
        ResponseTemplate::new(200).set_body_string(next_data(&json!({"props": {"pageProps": {"offers": {
            "count": 5,
            "filters": {"fuelTypes": [
                {"title": "Essence", "count": 3},
                {"title": "Electrique", "count": 2}
            ]}
        }}}}))),
    )
    .await;
    mount_stock(
        &server,
        "9",
        "3",
        ResponseTemplate::new(200)
            .set_body_string(next_data(&json!({"props": {"pageProps": {"offers": {"count": 0}}}}))),
    )
    .await;

    let registry = SiteRegistry::new(vec![structured("FRANCE", server.uri())]);
    let records = run_scan(&http(), &registry, &ScanOptions::default(), |_| {}).await;

    assert_eq!(
        records,
        vec![
            StockRecord::new("FRANCE", "DS 7", 5, Confidence::ExactApi)
                .with_details("Essence (3), Electrique (2)"),
            StockRecord::new("FRANCE", "DS 9", 0, Confidence::ExactApi),
        ]
    );
}

#[tokio::test]
async fn failed_stock_query_skips_only_that_model() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, next_data(&landing_payload())).await;
    mount_stock(&server, "7", "12", ResponseTemplate::new(500)).await;
    mount_stock(
        &server,
        "9",
        "3",
        ResponseTemplate::new(200)
            .set_body_string(next_data(&json!({"props": {"pageProps": {"offers": [{}, {}]}}}))),
    )
    .await;

    let registry = SiteRegistry::new(vec![structured("ESPAGNE", server.uri())]);
    let records = run_scan(&http(), &registry, &ScanOptions::default(), |_| {}).await;

    assert_eq!(
        records,
        vec![StockRecord::new("ESPAGNE", "DS 9", 2, Confidence::ExactApi)]
    );
}

#[tokio::test]
async fn mixed_registry_yields_records_for_every_site_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/pl", 200, "<span>1 - 12 of 31</span>".to_string()).await;
    mount_page(&server, "/nl", 503, String::new()).await;
    mount_page(
        &server,
        "/de",
        200,
        r#"<li data-model-text="DS 7"></li><li data-model-text="DS 7"></li>"#.to_string(),
    )
    .await;

    let registry = SiteRegistry::new(vec![
        heuristic("POLOGNE", format!("{}/pl", server.uri()), None),
        heuristic("PAYS-BAS", format!("{}/nl", server.uri()), None),
        heuristic("ALLEMAGNE", format!("{}/de", server.uri()), None),
    ]);

    let mut events: Vec<ScanProgress> = Vec::new();
    let records = run_scan(&http(), &registry, &ScanOptions::default(), |p| {
        events.push(p.clone());
    })
    .await;

    assert_eq!(
        records,
        vec![
            StockRecord::new("POLOGNE", MODEL_TOTAL_SITE, 31, Confidence::GlobalEstimate),
            StockRecord::unavailable("PAYS-BAS"),
            StockRecord::new("ALLEMAGNE", "DS 7", 2, Confidence::ExactHtmlTag),
        ]
    );

    let labels: Vec<&str> = events.iter().map(|e| e.site_label.as_str()).collect();
    assert_eq!(labels, ["POLOGNE", "PAYS-BAS", "ALLEMAGNE"]);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.sites_done, i + 1);
        assert_eq!(event.sites_total, 3);
    }
}

#[tokio::test]
async fn unreachable_host_degrades_to_sentinel() {
    // Nothing listens on port 9 locally; the connect fails fast.
    let registry = SiteRegistry::new(vec![heuristic(
        "BELGIQUE",
        "http://127.0.0.1:9/be".to_string(),
        None,
    )]);
    let records = run_scan(&http(), &registry, &ScanOptions::default(), |_| {}).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].model, MODEL_UNAVAILABLE);
    assert!(records[0].is_sentinel());
}

#[tokio::test]
async fn empty_registry_yields_nothing_and_no_progress() {
    let mut calls = 0;
    let records = run_scan(&http(), &SiteRegistry::default(), &ScanOptions::default(), |_| {
        calls += 1;
    })
    .await;
    assert!(records.is_empty());
    assert_eq!(calls, 0);
}

/// Fixed responses keyed by URL.
struct StaticFetcher(HashMap<String, String>);

impl Fetch for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::UnexpectedStatus {
                status: 404,
                url: url.to_owned(),
            })
    }
}

#[tokio::test]
async fn identical_responses_give_identical_scans() {
    let pages = HashMap::from([
        (
            "https://pt.example".to_string(),
            "<p>DS 7 Opera 52 900 €</p>\n<h2>DS 4 Rivoli</h2>".to_string(),
        ),
        (
            "https://uk.example".to_string(),
            r#"<script type="application/ld+json">{"@graph":[{"hasOfferCatalog":{"itemListElement":[{},{},{}]}}]}</script>"#
                .to_string(),
        ),
    ]);
    let fetcher = StaticFetcher(pages);
    let registry = SiteRegistry::new(vec![
        heuristic("PORTUGAL", "https://pt.example".to_string(), None),
        heuristic("ROYAUME-UNI", "https://uk.example".to_string(), None),
        heuristic("IRLANDE", "https://ie.example".to_string(), None),
    ]);
    let options = ScanOptions {
        overrides: OverrideTable::builtin(),
        ..ScanOptions::default()
    };

    let first = run_scan(&fetcher, &registry, &options, |_| {}).await;
    let second = run_scan(&fetcher, &registry, &options, |_| {}).await;

    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            StockRecord::new("PORTUGAL", "DS 4", 1, Confidence::TextEstimate),
            StockRecord::new("PORTUGAL", "DS 7", 1, Confidence::TextEstimate),
            StockRecord::new("ROYAUME-UNI", "Global", 3, Confidence::GlobalEstimate),
            StockRecord::unavailable("IRLANDE"),
        ]
    );
}
