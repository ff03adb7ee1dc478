//! The render envelope as a websocket client would receive it.

use tinytalk::engine::{TinyObject, TinylandEngine};
use tinytalk::server::render::render_envelope;
use tinytalk::tinytalk_parser::parse_rule;

#[test]
fn envelope_groups_markers_and_virtual_objects() {
    let mut engine = TinylandEngine::new();
    engine.load_rule(
        parse_rule("when [#marker x y] create [#ball x: x, y: y]").expect("rule parses"),
    );
    engine.create(
        "marker-7",
        TinyObject::new(["marker"])
            .with_attr("x", 0.25)
            .with_attr("y", 0.75),
    );
    while engine.execute_loop() {}

    let envelope = render_envelope(engine.scene());
    let text = serde_json::to_string(&envelope).expect("envelope serializes");
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("round trips");

    assert_eq!(parsed["type"], "render");
    let payload = &parsed["payload"];
    assert!(payload["appMarkers"]["marker-7"].is_object());
    assert_eq!(payload["appMarkers"]["marker-7"]["x"], 0.25);
    let virtuals = payload["virtualObjects"]
        .as_object()
        .expect("virtualObjects is a map");
    assert_eq!(virtuals.len(), 1);
    let ball = virtuals.values().next().expect("one ball");
    assert_eq!(ball["type"], "ball");
    assert_eq!(ball["x"], 0.25);
    assert_eq!(ball["y"], 0.75);
}

#[test]
fn envelope_reflects_updates() {
    let mut engine = TinylandEngine::new();
    engine.create("marker-1", TinyObject::new(["marker"]).with_attr("x", 0.0));
    let mut patch = indexmap::IndexMap::new();
    patch.insert("x".to_string(), tinytalk::engine::AttrValue::Num(0.9));
    engine.update("marker-1", patch).expect("marker exists");

    let envelope = render_envelope(engine.scene());
    assert_eq!(envelope["payload"]["appMarkers"]["marker-1"]["x"], 0.9);
}
