// Integration tests for Form Filter: handler + mocked forms API

use actix_web::{http::StatusCode, test, web, App};
use form_filter::core::PageAggregator;
use form_filter::routes::{configure_routes, AppState};
use form_filter::services::FormsApiClient;
use form_filter::SubmissionSet;
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const FORM_PATH: &str = "/v1/api/forms/cLZojxk94ous/submissions";

fn submission(id: &str, email: &str, employees: f64) -> Value {
    json!({
        "submissionId": id,
        "submissionTime": "2024-05-16T23:20:05.324Z",
        "questions": [
            { "id": "email", "name": "Email", "type": "EmailInput", "value": email },
            { "id": "employees", "name": "Employees", "type": "NumberInput", "value": employees }
        ],
        "calculations": [],
        "urlParameters": [{ "id": "ref", "name": "ref", "value": "newsletter" }]
    })
}

fn page(responses: Vec<Value>, page_count: usize) -> String {
    json!({
        "responses": responses,
        "totalResponses": 500,
        "pageCount": page_count
    })
    .to_string()
}

fn state(url: String, page_step: usize) -> AppState {
    AppState {
        forms_api: Arc::new(
            FormsApiClient::new(url, "test_key".to_string(), Duration::from_secs(5)).unwrap(),
        ),
        aggregator: PageAggregator::new(page_step),
        default_limit: 150,
        request_timeout: Duration::from_secs(10),
    }
}

fn uri(query: &str) -> String {
    format!("/cLZojxk94ous/filteredResponses?{}", query)
}

fn filters_param(filters: &Value) -> String {
    format!("filters={}", urlencoding::encode(&filters.to_string()))
}

#[actix_web::test]
async fn test_filters_and_paginates_single_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", FORM_PATH)
        .match_header("authorization", "Bearer test_key")
        .match_query(Matcher::Regex("^status=finished$".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(
            vec![
                submission("1", "a@x.io", 5.0),
                submission("2", "b@x.io", 50.0),
                submission("3", "c@x.io", 12.0),
                submission("4", "d@x.io", 30.0),
            ],
            1,
        ))
        .expect(1)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(server.url(), 150)))
            .configure(configure_routes),
    )
    .await;

    let filters = json!([{ "id": "employees", "condition": "greater_than", "value": 10 }]);
    let req = test::TestRequest::get()
        .uri(&uri(&format!("{}&limit=2&offset=1&status=finished", filters_param(&filters))))
        .to_request();
    let body: SubmissionSet = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<_> = body.responses.iter().map(|s| s.submission_id.as_str()).collect();
    assert_eq!(ids, vec!["3", "4"]);
    assert_eq!(body.total_responses, 2);
    // three submissions passed the filter
    assert_eq!(body.page_count, 2);
    mock.assert_async().await;
}

#[actix_web::test]
async fn test_double_encoded_filters() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", FORM_PATH)
        .with_status(200)
        .with_body(page(
            vec![submission("1", "a@x.io", 5.0), submission("2", "b@x.io", 50.0)],
            1,
        ))
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(server.url(), 150)))
            .configure(configure_routes),
    )
    .await;

    let filters = json!([{ "id": "email", "condition": "equals", "value": "b@x.io" }]);
    let twice = Value::String(filters.to_string());

    let req = test::TestRequest::get().uri(&uri(&filters_param(&twice))).to_request();
    let body: SubmissionSet = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.responses.len(), 1);
    assert_eq!(body.responses[0].submission_id, "2");
    assert_eq!(body.page_count, 1);
}

#[actix_web::test]
async fn test_aggregates_every_upstream_page() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", FORM_PATH)
        .match_query(Matcher::Regex("^$".into()))
        .with_status(200)
        .with_body(page(vec![submission("1", "a@x.io", 1.0), submission("2", "b@x.io", 2.0)], 3))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", FORM_PATH)
        .match_query(Matcher::UrlEncoded("offset".into(), "2".into()))
        .with_status(200)
        .with_body(page(vec![submission("3", "c@x.io", 3.0), submission("4", "d@x.io", 4.0)], 3))
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("GET", FORM_PATH)
        .match_query(Matcher::UrlEncoded("offset".into(), "4".into()))
        .with_status(200)
        .with_body(page(vec![submission("5", "e@x.io", 5.0)], 3))
        .expect(1)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(server.url(), 2)))
            .configure(configure_routes),
    )
    .await;

    let filters = json!([{ "id": "employees", "condition": "does_not_equal", "value": 2 }]);
    let req = test::TestRequest::get()
        .uri(&uri(&format!("{}&limit=10", filters_param(&filters))))
        .to_request();
    let body: SubmissionSet = test::call_and_read_body_json(&app, req).await;

    let ids: Vec<_> = body.responses.iter().map(|s| s.submission_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3", "4", "5"]);
    assert_eq!(body.total_responses, 4);
    assert_eq!(body.page_count, 1);

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[actix_web::test]
async fn test_type_mismatch_rejects_submission_only() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", FORM_PATH)
        .with_status(200)
        .with_body(page(vec![submission("1", "a@x.io", 5.0)], 1))
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(server.url(), 150)))
            .configure(configure_routes),
    )
    .await;

    let filters = json!([{ "id": "employees", "condition": "equals", "value": "5" }]);
    let req = test::TestRequest::get().uri(&uri(&filters_param(&filters))).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: SubmissionSet = test::read_body_json(resp).await;
    assert!(body.responses.is_empty());
    assert_eq!(body.page_count, 0);
}

#[actix_web::test]
async fn test_malformed_filters_is_bad_request() {
    let server = Server::new_async().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(server.url(), 150)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&uri(&format!("filters={}", urlencoding::encode("[{\"id\":"))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&uri("limit=abc")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.as_str().unwrap().contains("limit"));
}

#[actix_web::test]
async fn test_upstream_failure_is_generic_500() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", FORM_PATH)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state(server.url(), 150)))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri(&uri("limit=5")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!("Internal Server Error"));
}
