//! Verify the pure building blocks against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector file lists named cases with inputs and expected outputs.
//! Reconciliation results are compared as parsed JSON, so field ordering
//! never causes false negatives.

use gateway_admin_core::resources::CA_CERTIFICATE;
use gateway_admin_core::{cursor, mode, query, Filter, HttpMethod, ResourceModel, CREATE_SENTINEL};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Build a `Filter` from its vector representation.
fn parse_filter(raw: &Value) -> Option<Filter> {
    if raw.is_null() {
        return None;
    }
    if let Some(query) = raw.get("raw") {
        return Some(Filter::raw(query.as_str().unwrap()));
    }
    let fields = raw["fields"].as_object().unwrap();
    let filter = fields.iter().fold(Filter::fields(), |filter, (key, value)| match value.as_str() {
        Some(value) => filter.with(key.as_str(), value),
        None => filter.without(key.as_str()),
    });
    Some(filter)
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

#[test]
fn cursor_test_vectors() {
    let raw = include_str!("../../test-vectors/cursor.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let next = case["next"].as_str();
        let expected = case["expected_offset"].as_str().unwrap();

        assert_eq!(cursor::decode(next), expected, "{name}: offset");
        assert_eq!(cursor::decode(next), cursor::decode(next), "{name}: repeatable");
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let filter = parse_filter(&case["filter"]);
        let expected = case["expected"].as_str().unwrap();

        assert_eq!(query::build(filter.as_ref()), expected, "{name}: query string");
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[test]
fn mode_test_vectors() {
    let raw = include_str!("../../test-vectors/mode.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let collection = vectors["collection"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let param = case["param"].as_str().unwrap();
        let expected = &case["expected"];

        let target = mode::resolve(param, CREATE_SENTINEL, collection);
        assert_eq!(target.mode.is_create(), expected["create"].as_bool().unwrap(), "{name}: mode");
        assert_eq!(target.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(target.endpoint, expected["endpoint"].as_str().unwrap(), "{name}: endpoint");
        assert_eq!(target.display_id, param, "{name}: display id");
        assert_eq!(target.mode.title("CA Certificate"), expected["title"].as_str().unwrap(), "{name}: title");
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[test]
fn reconcile_test_vectors() {
    let raw = include_str!("../../test-vectors/reconcile.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let mut model = ResourceModel::new(CA_CERTIFICATE.schema);
        model.reconcile(&case["record"]);

        assert_eq!(Value::Object(model.to_payload()), case["expected"], "{name}: model");
        assert_eq!(model.keys().count(), CA_CERTIFICATE.schema.len(), "{name}: key set");
    }
}
