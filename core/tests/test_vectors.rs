//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use hal_sync_core::{ApiError, CollectionClient, HttpMethod, HttpResponse, NewUser, User};
use pretty_assertions::assert_eq;

const BASE_URL: &str = "http://localhost:5173";

fn client() -> CollectionClient {
    CollectionClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_error(name: &str, expected: &str, err: ApiError) {
    match expected {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "Status" => assert!(matches!(err, ApiError::Status { .. }), "{name}: expected Status"),
        "Deserialization" => assert!(
            matches!(err, ApiError::Deserialization(_)),
            "{name}: expected Deserialization"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_users();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_list_users(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err());
            continue;
        }
        let users = result.unwrap().items;
        let expected: Vec<User> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(users, expected, "{name}: parsed result");

        let rows: Vec<String> = users.iter().map(User::display_row).collect();
        let expected_rows: Vec<String> =
            serde_json::from_value(case["expected_rows"].clone()).unwrap();
        assert_eq!(rows, expected_rows, "{name}: rows");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let raw = include_str!("../../test-vectors/create.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: NewUser = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_create_user(&input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected_req["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let result = c.parse_create_user(simulated(case));
        match case.get("expected_error") {
            Some(expected_error) => {
                assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err())
            }
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let raw = include_str!("../../test-vectors/delete.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: User = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_delete_user(&input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let result = c.parse_delete_user(simulated(case));
        match case.get("expected_error") {
            Some(expected_error) => {
                assert_error(name, expected_error.as_str().unwrap(), result.unwrap_err())
            }
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}
