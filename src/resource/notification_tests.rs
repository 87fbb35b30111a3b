//! Tests for the notification API client.

use super::{
    NotificationCondition, NotificationCreateInput, NotificationTarget, NotificationUpdateInput,
};
use crate::context::CallContext;
use crate::test_fixtures::{GRAPH_ID, MockClient, TOKEN, body_text, pixela, token_header};
use std::sync::Arc;

fn ctx() -> CallContext {
    CallContext::background()
}

#[tokio::test]
async fn create_posts_rule() {
    let mock = Arc::new(MockClient::ok());
    let client = pixela(&mock);
    let input = NotificationCreateInput {
        graph_id: GRAPH_ID.to_string(),
        id: "notification-id".to_string(),
        name: "notification-name".to_string(),
        target: NotificationTarget::Quantity,
        condition: NotificationCondition::GreaterThan,
        threshold: "3".to_string(),
        remind_by: Some("21".to_string()),
        channel_id: "channel-id".to_string(),
    };

    let result = client.notification().create(&ctx(), &input).await.unwrap();

    assert!(result.is_success);
    let req = mock.last_request();
    assert_eq!(req.method, http::Method::POST);
    assert_eq!(
        req.url.as_str(),
        "https://pixe.la/users/user/graphs/graph-id/notifications"
    );
    assert_eq!(token_header(&req), Some(TOKEN));
    let body: serde_json::Value = serde_json::from_str(&body_text(&req)).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "id": "notification-id",
            "name": "notification-name",
            "target": "quantity",
            "condition": ">",
            "threshold": "3",
            "remindBy": "21",
            "channelID": "channel-id"
        })
    );
}

#[tokio::test]
async fn get_all_decodes_rules() {
    let body = r#"{"notifications":[{"id":"n1","name":"over","target":"quantity",
        "condition":"multipleOf","threshold":"5","remindBy":"","channelID":"c1"}]}"#;
    let mock = Arc::new(MockClient::status(200, body));
    let client = pixela(&mock);

    let definitions = client
        .notification()
        .get_all(&ctx(), GRAPH_ID)
        .await
        .unwrap();

    assert_eq!(definitions.notifications.len(), 1);
    assert_eq!(definitions.notifications[0].condition, "multipleOf");
    assert_eq!(definitions.notifications[0].channel_id, "c1");
    assert!(definitions.result.is_success);
    assert_eq!(mock.last_request().method, http::Method::GET);
}

#[tokio::test]
async fn get_all_reports_api_failure() {
    let mock = Arc::new(MockClient::api_failed());
    let client = pixela(&mock);

    let definitions = client
        .notification()
        .get_all(&ctx(), GRAPH_ID)
        .await
        .unwrap();

    assert!(definitions.notifications.is_empty());
    assert!(!definitions.result.is_success);
}

#[tokio::test]
async fn update_puts_set_fields() {
    let mock = Arc::new(MockClient::ok());
    let client = pixela(&mock);
    let input = NotificationUpdateInput {
        graph_id: GRAPH_ID.to_string(),
        id: "n1".to_string(),
        condition: Some(NotificationCondition::LessThan),
        threshold: Some("1".to_string()),
        ..Default::default()
    };

    client.notification().update(&ctx(), &input).await.unwrap();

    let req = mock.last_request();
    assert_eq!(req.method, http::Method::PUT);
    assert_eq!(
        req.url.as_str(),
        "https://pixe.la/users/user/graphs/graph-id/notifications/n1"
    );
    assert_eq!(body_text(&req), r#"{"condition":"<","threshold":"1"}"#);
}

#[tokio::test]
async fn delete_targets_rule() {
    let mock = Arc::new(MockClient::ok());
    let client = pixela(&mock);

    client
        .notification()
        .delete(&ctx(), GRAPH_ID, "n1")
        .await
        .unwrap();

    let req = mock.last_request();
    assert_eq!(req.method, http::Method::DELETE);
    assert_eq!(
        req.url.as_str(),
        "https://pixe.la/users/user/graphs/graph-id/notifications/n1"
    );
}
