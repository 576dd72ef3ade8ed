use super::*;
use serde_json::json;

#[test]
fn test_normalize_id_accepts_positive_integers() {
    assert_eq!(normalize_id(&json!(7)), Some(7));
    assert_eq!(normalize_id(&json!("42")), Some(42));
    assert_eq!(normalize_id(&json!(" 9 ")), Some(9));
    assert_eq!(normalize_id(&json!(12.0)), Some(12));
}

#[test]
fn test_normalize_id_rejects_malformed() {
    assert_eq!(normalize_id(&json!("abc")), None);
    assert_eq!(normalize_id(&json!(-1)), None);
    assert_eq!(normalize_id(&json!(0)), None);
    assert_eq!(normalize_id(&json!(3.5)), None);
    assert_eq!(normalize_id(&json!(null)), None);
    assert_eq!(normalize_id(&json!([1])), None);
}

#[test]
fn test_normalize_ids_drops_invalid_entries() {
    let raw = json!([3, "x", -2, "5", 0, 8]);
    let ids = normalize_ids(raw.as_array().unwrap());
    assert_eq!(ids, vec![3, 5, 8]);
}

#[test]
fn test_dedup_by_href_keeps_first_position_last_id() {
    let links = vec![
        LinkCandidate::new("a", None),
        LinkCandidate::new("b", Some(2)),
        LinkCandidate::new("a", Some(9)),
        LinkCandidate::new("", Some(1)),
    ];
    let deduped = dedup_by_href(links);
    assert_eq!(
        deduped,
        vec![LinkCandidate::new("a", Some(9)), LinkCandidate::new("b", Some(2))]
    );
}

#[test]
fn test_link_candidate_line_round_trips_through_target_url() {
    let candidate = LinkCandidate::new("https://wplace.live/?lat=1&lng=2", Some(31));
    let target = TargetUrl::parse(&candidate.to_line()).unwrap();
    assert_eq!(target.url, "https://wplace.live/?lat=1&lng=2");
    assert_eq!(target.id, Some(31));
}

#[test]
fn test_target_url_keeps_fragments_without_whitespace() {
    let target = TargetUrl::parse("https://example.com/page#id=4").unwrap();
    assert_eq!(target.url, "https://example.com/page#id=4");
    assert_eq!(target.id, None);
}

#[test]
fn test_target_url_parse_list_skips_blank_lines() {
    let lines = vec![
        "https://a.example\n\n  https://b.example  #id=3 ".to_string(),
        "   ".to_string(),
    ];
    let targets = TargetUrl::parse_list(&lines);
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].url, "https://a.example");
    assert_eq!(targets[1].url, "https://b.example");
    assert_eq!(targets[1].id, Some(3));
}

#[test]
fn test_reference_point_serializes_camel_case_millis() {
    let point = ReferencePoint::new(10.0, 20.5, 1280, 720);
    let value = serde_json::to_value(point).unwrap();
    assert_eq!(value["viewportWidth"], 1280);
    assert!(value["timestamp"].is_i64());

    let back: ReferencePoint = serde_json::from_value(value).unwrap();
    assert_eq!(back.x, 10.0);
    assert_eq!(back.viewport_height, 720);
}

#[test]
fn test_driver_report_parses_page_output() {
    let raw = json!({
        "event": "click_at",
        "click": { "ok": true, "attempts": 1 },
        "claim": { "found": true, "method": "btn.btn-primary", "text": "Claim", "timestamp": 1 },
        "timestamp": 1700000000000u64
    });
    let report: DriverReport = serde_json::from_value(raw).unwrap();
    match report {
        DriverReport::ClickAt { click, claim } => {
            assert!(click.ok);
            assert_eq!(claim.unwrap().text.as_deref(), Some("Claim"));
        }
        other => panic!("unexpected report {:?}", other),
    }
}

#[test]
fn test_driver_report_claim_attempt_flattened() {
    let raw = json!({ "event": "claim_attempt", "found": false, "error": "boom" });
    let report: DriverReport = serde_json::from_value(raw).unwrap();
    assert_eq!(
        report,
        DriverReport::ClaimAttempt {
            claim: ClaimCheck {
                found: false,
                error: Some("boom".to_string()),
                ..Default::default()
            }
        }
    );
}

#[test]
fn test_driver_command_names() {
    assert_eq!(DriverCommand::InstallCapture.name(), "installCapture");
    let point = ReferencePoint::new(1.0, 1.0, 10, 10);
    assert_eq!(DriverCommand::ClickAt(point).name(), "clickAt");
}
