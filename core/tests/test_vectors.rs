//! Verify build/parse methods against the JSON vectors in `test-vectors/`.
//!
//! Each case names an operation, its inputs, the request it must produce, a
//! simulated response and the expected parse result or error. Bodies and
//! results are compared as parsed JSON so field order does not matter.

use chrono::{TimeZone, Utc};
use serde_json::Value;
use todo_core::{
    ApiError, HttpMethod, HttpRequest, HttpResponse, NewTodo, TodoApi, TodoId, TodoPatch,
};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn build(api: &TodoApi, case: &Value) -> HttpRequest {
    let id = || TodoId::Number(case["input_id"].as_u64().unwrap());
    match case["operation"].as_str().unwrap() {
        "list" => api.build_list_todos(),
        "create" => {
            let input: NewTodo = serde_json::from_value(case["input"].clone()).unwrap();
            let now = Utc
                .timestamp_millis_opt(case["now_ms"].as_i64().unwrap())
                .unwrap();
            api.build_create_todo_at(&input, now).unwrap()
        }
        "update" => {
            let input: TodoPatch = serde_json::from_value(case["input"].clone()).unwrap();
            api.build_update_todo(&id(), &input).unwrap()
        }
        "toggle" => api
            .build_toggle_todo(&id(), case["input"].as_bool().unwrap())
            .unwrap(),
        "delete" => api.build_delete_todo(&id()),
        other => panic!("unknown operation: {other}"),
    }
}

fn parse(api: &TodoApi, operation: &str, response: HttpResponse) -> Result<Value, ApiError> {
    match operation {
        "list" => api.parse_list_todos(response).map(|t| serde_json::to_value(t).unwrap()),
        "create" => api.parse_create_todo(response).map(|t| serde_json::to_value(t).unwrap()),
        "update" | "toggle" => api.parse_update_todo(response).map(|t| serde_json::to_value(t).unwrap()),
        "delete" => api.parse_delete_todo(response).map(|()| Value::Null),
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let api = TodoApi::new(base_url);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&api, case);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        let body = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str::<Value>(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(body, expected_req["body"], "{name}: body");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = parse(&api, operation, response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
                "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let value = result.unwrap();
            let expected = case.get("expected_result").cloned().unwrap_or(Value::Null);
            assert_eq!(value, expected, "{name}: parsed result");
        }
    }
}
