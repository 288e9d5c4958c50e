use serde_json::json;

use super::*;

fn page(payload: &str) -> String {
    format!(
        r#"<html><head></head><body><div id="__next"></div>
<script id="__NEXT_DATA__" type="application/json">{payload}</script>
</body></html>"#
    )
}

#[test]
fn extracts_next_data_payload() {
    let html = page(r#"{"props":{"pageProps":{"ok":true}}}"#);
    let value = extract_embedded_payload(&html, "https://store.example").unwrap();
    assert_eq!(value.pointer("/props/pageProps/ok"), Some(&json!(true)));
}

#[test]
fn payload_marker_attribute_order_does_not_matter() {
    let html = r#"<script type="application/json" id="__NEXT_DATA__">{"a":1}</script>"#;
    let value = extract_embedded_payload(html, "u").unwrap();
    assert_eq!(value, json!({"a": 1}));
}

#[test]
fn missing_marker_is_missing_payload() {
    let html = "<html><script>var x = 1;</script></html>";
    let err = extract_embedded_payload(html, "https://store.example").unwrap_err();
    assert!(matches!(err, ExtractError::MissingPayload { ref url } if url == "https://store.example"));
}

#[test]
fn invalid_json_is_malformed_payload() {
    let html = page("{not json");
    let err = extract_embedded_payload(&html, "u").unwrap_err();
    assert!(matches!(err, ExtractError::MalformedPayload { .. }));
}

#[test]
fn collects_pairs_at_arbitrary_depth() {
    let payload = json!({
        "props": {
            "pageProps": {
                "sections": [
                    {"items": [
                        {"model": {"id": "DS7", "title": "DS 7"}, "bodyStyle": {"id": 12}},
                        {"deeper": {"list": [[{"model": {"id": 4, "title": "DS 4"}, "bodyStyle": {"id": "HB"}}]]}}
                    ]}
                ]
            }
        }
    });
    let refs = collect_model_refs(&payload);
    assert_eq!(
        refs,
        vec![
            ModelRef {
                model_id: "DS7".to_string(),
                body_style_id: "12".to_string(),
                name: "DS 7".to_string(),
            },
            ModelRef {
                model_id: "4".to_string(),
                body_style_id: "HB".to_string(),
                name: "DS 4".to_string(),
            },
        ]
    );
}

#[test]
fn ignores_pairs_that_are_not_objects_or_lack_ids() {
    let payload = json!([
        {"model": "DS 7", "bodyStyle": "SUV"},
        {"model": {"title": "DS 9"}, "bodyStyle": {"id": 1}},
        {"model": {"id": 3, "title": "DS 3"}}
    ]);
    assert!(collect_model_refs(&payload).is_empty());
}

#[test]
fn descends_into_matched_objects() {
    let payload = json!({
        "model": {"id": 1, "title": "DS 3"},
        "bodyStyle": {"id": 1},
        "variants": [{"model": {"id": 2, "title": "DS 4"}, "bodyStyle": {"id": 2}}]
    });
    let names: Vec<String> = collect_model_refs(&payload)
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, ["DS 3", "DS 4"]);
}

#[test]
fn walk_stops_at_depth_bound() {
    let mut value = json!({"model": {"id": 1, "title": "DS 3"}, "bodyStyle": {"id": 1}});
    for _ in 0..(MAX_WALK_DEPTH + 10) {
        value = json!([value]);
    }
    assert!(collect_model_refs(&value).is_empty());
}

#[test]
fn unique_refs_dedupe_on_pair_and_drop_untitled() {
    let r = |m: &str, b: &str, n: &str| ModelRef {
        model_id: m.to_string(),
        body_style_id: b.to_string(),
        name: n.to_string(),
    };
    let refs = vec![
        r("7", "1", "DS 7"),
        r("7", "1", "DS 7 Crossback"),
        r("7", "2", "DS 7"),
        r("9", "1", ""),
    ];
    let unique = unique_model_refs(refs);
    assert_eq!(
        unique,
        vec![r("7", "1", "DS 7 Crossback"), r("7", "2", "DS 7")]
    );
}

#[test]
fn duplicate_pair_keeps_first_position_and_last_title() {
    let r = |m: &str, b: &str, n: &str| ModelRef {
        model_id: m.to_string(),
        body_style_id: b.to_string(),
        name: n.to_string(),
    };
    let refs = vec![
        r("4", "1", "DS 4"),
        r("9", "2", "DS 9"),
        r("4", "1", "N°4"),
        r("4", "1", ""),
    ];
    let unique = unique_model_refs(refs);
    assert_eq!(unique, vec![r("4", "1", "N°4"), r("9", "2", "DS 9")]);
}

#[test]
fn stock_count_from_object_with_fuel_breakdown() {
    let payload = json!({
        "props": {"pageProps": {"offers": {
            "count": 5,
            "filters": {"fuelTypes": [
                {"title": "Essence", "count": 3},
                {"title": "Hybride rechargeable", "count": 2}
            ]}
        }}}
    });
    let summary = parse_stock_payload(&payload);
    assert_eq!(summary.count, 5);
    assert_eq!(summary.details, "Essence (3), Hybride rechargeable (2)");
}

#[test]
fn stock_count_from_offer_list() {
    let payload = json!({"props": {"pageProps": {"offers": [{}, {}, {}]}}});
    let summary = parse_stock_payload(&payload);
    assert_eq!(summary.count, 3);
    assert!(summary.details.is_empty());
}

#[test]
fn zero_count_has_no_details() {
    let payload = json!({
        "props": {"pageProps": {"offers": {
            "count": 0,
            "filters": {"fuelTypes": [{"title": "Essence", "count": 0}]}
        }}}
    });
    assert_eq!(parse_stock_payload(&payload), StockSummary::default());
}

#[test]
fn missing_offers_counts_as_zero() {
    let payload = json!({"props": {"pageProps": {}}});
    assert_eq!(parse_stock_payload(&payload).count, 0);
}

#[test]
fn string_count_is_accepted() {
    let payload = json!({"props": {"pageProps": {"offers": {"count": "12"}}}});
    assert_eq!(parse_stock_payload(&payload).count, 12);
}
