use super::*;
use claimrunner_protocols::ClickOutcome;

#[test]
fn test_agent_script_exposes_command_surface() {
    let script = agent_script();
    assert!(script.contains("window.__claimrunnerAgent"));
    for name in ["dispatch", "readSlot", "extractLinks", "claimedOnPage", "claimControl"] {
        assert!(script.contains(name), "missing {}", name);
    }
    assert!(script.contains("__sc_overlay"));
    assert!(script.contains("2147483647"));
}

#[test]
fn test_agent_call_installs_before_calling() {
    let expr = agent_call("claimControl()");
    assert!(expr.starts_with("(() => {"));
    assert!(expr.contains("if (!window.__claimrunnerAgent)"));
    assert!(expr.ends_with("return window.__claimrunnerAgent.claimControl(); })()"));
}

#[test]
fn test_command_payload() {
    assert_eq!(
        command_payload(&DriverCommand::InstallCapture),
        json!({ "type": "installCapture" })
    );
    assert_eq!(
        command_payload(&DriverCommand::FindAndClickClaim),
        json!({ "type": "findAndClickClaim" })
    );

    let point = ReferencePoint::new(120.0, 48.5, 1280, 720);
    let payload = command_payload(&DriverCommand::ClickAt(point));
    assert_eq!(payload["type"], "clickAt");
    assert_eq!(payload["point"]["x"], 120.0);
    assert_eq!(payload["point"]["viewportHeight"], 720);
}

#[test]
fn test_parse_point_slot() {
    let raw = json!({
        "x": 10, "y": 20, "viewportWidth": 800, "viewportHeight": 600, "timestamp": 1700000000000u64
    });
    match parse_slot(Slot::Point, raw) {
        Some(SlotValue::Point(p)) => {
            assert_eq!(p.x, 10.0);
            assert_eq!(p.viewport_width, 800);
            assert_eq!(p.timestamp.timestamp_millis(), 1_700_000_000_000);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_click_report_slot() {
    let raw = json!({
        "event": "click_at",
        "click": { "ok": true, "attempts": 1 },
        "claim": { "event": "claim_attempt", "found": false, "timestamp": 1 },
        "timestamp": 2
    });
    assert_eq!(
        parse_slot(Slot::LastResult, raw),
        Some(SlotValue::Report(DriverReport::ClickAt {
            click: ClickOutcome {
                ok: true,
                attempts: Some(1),
                error: None
            },
            claim: Some(ClaimCheck::default()),
        }))
    );
}

#[test]
fn test_parse_slot_empty_or_garbage_is_none() {
    assert_eq!(parse_slot(Slot::Point, Value::Null), None);
    assert_eq!(parse_slot(Slot::Point, json!({ "x": "left" })), None);
    assert_eq!(parse_slot(Slot::LastResult, json!({ "event": "mystery" })), None);
}

#[test]
fn test_parse_links_dedups_by_href() {
    let raw = json!([
        { "href": "https://wplace.live/?lat=1", "id": 5 },
        { "href": "https://wplace.live/?lat=2", "id": null },
        { "href": "https://wplace.live/?lat=1", "id": 6 }
    ]);
    let links = parse_links(raw).unwrap();
    assert_eq!(
        links,
        vec![
            LinkCandidate::new("https://wplace.live/?lat=1", Some(6)),
            LinkCandidate::new("https://wplace.live/?lat=2", None),
        ]
    );
}

#[test]
fn test_parse_links_rejects_wrong_shape() {
    let err = parse_links(json!({ "links": [] })).unwrap_err();
    assert_eq!(err.code(), "page_eval_error");
}

#[test]
fn test_parse_claimed_sorts_and_drops_invalid() {
    let ids = parse_claimed(json!([12, 3, 0, 3, "7"])).unwrap();
    assert_eq!(ids, vec![3, 7, 12]);
}

#[test]
fn test_parse_claimed_rejects_non_array() {
    assert!(parse_claimed(json!(null)).is_err());
}
