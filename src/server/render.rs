//! Scene serialization for the render edge.

use serde_json::{json, Value};

use crate::engine::Scene;

/// Group the scene for the renderer: physical markers under `appMarkers`,
/// everything else under `virtualObjects`.
pub fn format_scene(scene: &Scene) -> Value {
    let mut app_markers = serde_json::Map::new();
    let mut virtual_objects = serde_json::Map::new();
    for (id, object) in scene.iter() {
        let value = serde_json::to_value(object).unwrap_or(Value::Null);
        if object.tags.iter().any(|tag| tag == "marker") {
            app_markers.insert(id.clone(), value);
        } else {
            virtual_objects.insert(id.clone(), value);
        }
    }
    json!({
        "appMarkers": app_markers,
        "virtualObjects": virtual_objects,
    })
}

/// The envelope broadcast to websocket clients after a non-empty drain.
pub fn render_envelope(scene: &Scene) -> Value {
    json!({
        "type": "render",
        "payload": format_scene(scene),
    })
}
