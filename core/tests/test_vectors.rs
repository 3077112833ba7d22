//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use greentrade_core::{
    ApiError, ErrorKind, GreenTradeClient, HttpMethod, HttpResponse, NewSupplier, Product, ProductFilter, Supplier,
};

const BASE_URL: &str = "http://localhost:8000/api";

fn client() -> GreenTradeClient {
    GreenTradeClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Validation" => ErrorKind::Validation,
        "NotFound" => ErrorKind::NotFound,
        "Server" => ErrorKind::Server,
        other => panic!("unknown error kind: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_error(name: &str, err: &ApiError, expected: &serde_json::Value) {
    assert_eq!(err.kind(), parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");
    assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
}

// ---------------------------------------------------------------------------
// List products
// ---------------------------------------------------------------------------

#[test]
fn list_products_test_vectors() {
    let raw = include_str!("../../test-vectors/list_products.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let filter = ProductFilter {
            category: input["category"].as_str().map(|s| s.parse().unwrap()),
            certification_status: input["certification_status"].as_str().map(|s| s.parse().unwrap()),
        };
        let expected_req = &case["expected_request"];

        let req = c.build_list_products(&filter);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        let products = c.parse_list_products(simulated(case)).unwrap();
        let expected: Vec<Product> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(products, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Create supplier
// ---------------------------------------------------------------------------

#[test]
fn create_supplier_test_vectors() {
    let raw = include_str!("../../test-vectors/create_supplier.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: NewSupplier = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_create_supplier(&input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");

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

        let result = c.parse_create_supplier(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: Supplier = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete product
// ---------------------------------------------------------------------------

#[test]
fn delete_product_test_vectors() {
    let raw = include_str!("../../test-vectors/delete_product.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let expected_req = &case["expected_request"];

        let req = c.build_delete_product(id);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        let result = c.parse_delete_product(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, &result.unwrap_err(), expected_error);
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Error normalization
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse::new(
            case["status"].as_u64().unwrap() as u16,
            case["body"].as_str().unwrap(),
        );
        let err = ApiError::from_response(&response);
        assert_error(name, &err, &case["expected_error"]);
        assert!(!err.is_transient(), "{name}: responses are never transient");
    }
}
