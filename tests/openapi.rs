use std::collections::BTreeSet;

use inventory_reservation_api::routes::doc::ApiDoc;
use serde_json::Value;
use utoipa::OpenApi;

fn collect_refs(value: &Value, refs: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("$ref", Value::String(target)) => {
                        refs.insert(target.clone());
                    }
                    _ => collect_refs(child, refs),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_refs(item, refs)),
        _ => {}
    }
}

#[test]
fn every_schema_reference_resolves() {
    let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialize openapi");
    let schemas = doc["components"]["schemas"]
        .as_object()
        .expect("components.schemas");

    let mut refs = BTreeSet::new();
    collect_refs(&doc, &mut refs);
    assert!(!refs.is_empty());

    let dangling: Vec<_> = refs
        .iter()
        .filter_map(|target| target.strip_prefix("#/components/schemas/"))
        .filter(|name| !schemas.contains_key(*name))
        .collect();
    assert!(dangling.is_empty(), "unresolved schema refs: {dangling:?}");
}

#[test]
fn health_and_cart_envelopes_are_registered() {
    let doc = serde_json::to_value(ApiDoc::openapi()).expect("serialize openapi");
    let schemas = doc["components"]["schemas"]
        .as_object()
        .expect("components.schemas");

    for name in ["HealthData", "ReleasedLine", "CartItem"] {
        assert!(schemas.contains_key(name), "{name} missing");
        assert!(
            schemas
                .keys()
                .any(|key| key.starts_with("ApiResponse") && key.contains(name)),
            "ApiResponse<{name}> missing"
        );
    }
}
