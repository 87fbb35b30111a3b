//! Tests for the pixel API client.

use super::{PixelCreateInput, PixelUpdateInput};
use crate::context::CallContext;
use crate::executor::Error;
use crate::test_fixtures::{GRAPH_ID, MockClient, TOKEN, body_text, pixela, token_header};
use std::sync::Arc;

fn ctx() -> CallContext {
    CallContext::background()
}

#[tokio::test]
async fn create_posts_to_graph() {
    let mock = Arc::new(MockClient::ok());
    let client = pixela(&mock);
    let input = PixelCreateInput {
        graph_id: GRAPH_ID.to_string(),
        date: "20180915".to_string(),
        quantity: "5".to_string(),
        optional_data: Some(r#"{"key":"value"}"#.to_string()),
    };

    let result = client.pixel().create(&ctx(), &input).await.unwrap();

    assert!(result.is_success);
    let req = mock.last_request();
    assert_eq!(req.method, http::Method::POST);
    assert_eq!(
        req.url.as_str(),
        "https://pixe.la/v1/users/user/graphs/graph-id"
    );
    assert_eq!(token_header(&req), Some(TOKEN));
    assert_eq!(
        body_text(&req),
        r#"{"date":"20180915","quantity":"5","optionalData":"{\"key\":\"value\"}"}"#
    );
}

#[tokio::test]
async fn increment_and_decrement_send_empty_content() {
    let mock = Arc::new(MockClient::ok());
    let client = pixela(&mock);

    client.pixel().increment(&ctx(), GRAPH_ID).await.unwrap();
    client.pixel().decrement(&ctx(), GRAPH_ID).await.unwrap();

    let requests = mock.captured_requests();
    assert_eq!(
        requests[0].url.as_str(),
        "https://pixe.la/v1/users/user/graphs/graph-id/increment"
    );
    assert_eq!(
        requests[1].url.as_str(),
        "https://pixe.la/v1/users/user/graphs/graph-id/decrement"
    );
    for req in &requests {
        assert_eq!(req.method, http::Method::PUT);
        assert_eq!(req.headers.get(http::header::CONTENT_LENGTH).unwrap(), "0");
        assert!(req.body.is_empty());
    }
}

#[tokio::test]
async fn get_decodes_quantity() {
    let body = r#"{"quantity":"5","optionalData":"{\"key\":\"value\"}"}"#;
    let mock = Arc::new(MockClient::status(200, body));
    let client = pixela(&mock);

    let quantity = client
        .pixel()
        .get(&ctx(), GRAPH_ID, "20180915")
        .await
        .unwrap();

    assert_eq!(quantity.quantity, "5");
    assert_eq!(quantity.optional_data, r#"{"key":"value"}"#);
    assert!(quantity.result.is_success);
    assert_eq!(quantity.result.status_code, 200);
    assert_eq!(
        mock.last_request().url.as_str(),
        "https://pixe.la/v1/users/user/graphs/graph-id/20180915"
    );
}

#[tokio::test]
async fn get_reports_api_failure() {
    let mock = Arc::new(MockClient::api_failed());
    let client = pixela(&mock);

    let quantity = client
        .pixel()
        .get(&ctx(), GRAPH_ID, "20180915")
        .await
        .unwrap();

    assert!(quantity.quantity.is_empty());
    assert!(!quantity.result.is_success);
    assert_eq!(quantity.result.message, "failed.");
}

#[tokio::test]
async fn get_page_not_found_is_decode_error() {
    let mock = Arc::new(MockClient::page_not_found());
    let client = pixela(&mock);

    let err = client
        .pixel()
        .get(&ctx(), GRAPH_ID, "20180915")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn update_puts_to_date() {
    let mock = Arc::new(MockClient::ok());
    let client = pixela(&mock);
    let input = PixelUpdateInput {
        graph_id: GRAPH_ID.to_string(),
        date: "20180915".to_string(),
        quantity: Some("7".to_string()),
        optional_data: None,
    };

    client.pixel().update(&ctx(), &input).await.unwrap();

    let req = mock.last_request();
    assert_eq!(req.method, http::Method::PUT);
    assert_eq!(
        req.url.as_str(),
        "https://pixe.la/v1/users/user/graphs/graph-id/20180915"
    );
    assert_eq!(body_text(&req), r#"{"quantity":"7"}"#);
}

#[tokio::test]
async fn delete_removes_date() {
    let mock = Arc::new(MockClient::api_failed());
    let client = pixela(&mock);

    let result = client
        .pixel()
        .delete(&ctx(), GRAPH_ID, "20180915")
        .await
        .unwrap();

    assert!(!result.is_success);
    let req = mock.last_request();
    assert_eq!(req.method, http::Method::DELETE);
    assert_eq!(
        req.url.as_str(),
        "https://pixe.la/v1/users/user/graphs/graph-id/20180915"
    );
}
