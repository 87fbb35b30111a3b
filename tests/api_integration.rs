//! End-to-end tests of the reqwest transport against a local mock server.

use std::time::Duration;

use pixela::resource::{
    GraphColor, GraphCreateInput, GraphSvgInput, GraphType, PixelDatesInput, Pixels,
};
use pixela::time::InstantSleeper;
use pixela::transport::ReqwestClient;
use pixela::{CallContext, Error, Pixela, RetryPolicy};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const OK_BODY: &str = r#"{"message":"Success.","isSuccess":true}"#;
const REJECTED_BODY: &str =
    r#"{"message":"Please retry this request.","isSuccess":false,"isRejected":true}"#;

/// Routes the executor's `debug!` events to the test output when
/// `RUST_LOG` is set, e.g. `RUST_LOG=pixela=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn client(server: &MockServer, max_retry: i64) -> Pixela<ReqwestClient, InstantSleeper> {
    init_tracing();
    Pixela::builder("user", "token")
        .with_base_url(server.uri())
        .with_retry_policy(RetryPolicy::new().with_max_retry(max_retry))
        .with_sleeper(InstantSleeper)
        .build()
        .unwrap()
}

fn graph_input() -> GraphCreateInput {
    GraphCreateInput::new("g1", "graph", "commit", GraphType::Int, GraphColor::Shibafu)
}

fn no_token(req: &Request) -> bool {
    !req.headers.contains_key("x-user-token")
}

#[tokio::test]
async fn create_graph_sends_token_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user/graphs"))
        .and(header("x-user-token", "token"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "id": "g1",
            "name": "graph",
            "unit": "commit",
            "type": "int",
            "color": "shibafu"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 0)
        .graph()
        .create(&CallContext::background(), &graph_input())
        .await
        .unwrap();

    assert!(result.is_success);
    assert_eq!(result.message, "Success.");
    assert_eq!(result.status_code, 200);
}

#[tokio::test]
async fn rejected_calls_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string(REJECTED_BODY))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 5)
        .graph()
        .create(&CallContext::background(), &graph_input())
        .await
        .unwrap();

    assert!(result.is_success);
}

#[tokio::test]
async fn exhausted_retries_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string(REJECTED_BODY))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .pixel()
        .increment(&CallContext::background(), "g1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Rejected { attempts: 3 }));
}

#[tokio::test]
async fn plain_503_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 5)
        .pixel()
        .increment(&CallContext::background(), "g1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn increment_sends_zero_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/users/user/graphs/g1/increment"))
        .and(header("content-length", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, 0)
        .pixel()
        .increment(&CallContext::background(), "g1")
        .await
        .unwrap();

    assert!(result.is_success);
}

#[tokio::test]
async fn webhook_invoke_and_stats_send_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/users/user/webhooks/hash"))
        .and(no_token)
        .respond_with(ResponseTemplate::new(200).set_body_string(OK_BODY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user/graphs/g1/stats"))
        .and(no_token)
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"totalPixelsCount":3}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, 0);
    let ctx = CallContext::background();

    assert!(client.webhook().invoke(&ctx, "hash").await.unwrap().is_success);
    assert_eq!(client.graph().stats(&ctx, "g1").await.unwrap().total_pixels_count, 3);
}

#[tokio::test]
async fn pixel_dates_with_body_uses_query_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user/graphs/g1/pixels"))
        .and(query_param("withBody", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"pixels":[{"date":"20180101","quantity":"1","optionalData":""}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let input = PixelDatesInput {
        id: "g1".to_string(),
        with_body: true,
        ..Default::default()
    };
    let dates = client(&server, 0)
        .graph()
        .get_pixel_dates(&CallContext::background(), &input)
        .await
        .unwrap();

    assert!(matches!(dates.pixels, Pixels::WithBody(ref entries) if entries.len() == 1));
}

#[tokio::test]
async fn svg_error_status_is_strict() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/users/user/graphs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
        .expect(1)
        .mount(&server)
        .await;

    let input = GraphSvgInput {
        id: "missing".to_string(),
        ..Default::default()
    };
    let err = client(&server, 5)
        .graph()
        .get_svg(&CallContext::background(), &input)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(http::StatusCode::NOT_FOUND));
    assert_eq!(err.to_string(), "failed to call API: 404 page not found");
}

#[tokio::test]
async fn cancellation_interrupts_slow_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(OK_BODY)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let ctx = CallContext::background().with_cancellation(token.clone());
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let err = client(&server, 0)
        .graph()
        .create(&ctx, &graph_input())
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn deadline_interrupts_slow_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(OK_BODY)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let ctx = CallContext::background().with_timeout(Duration::from_millis(100));

    let err = client(&server, 0)
        .graph()
        .create(&ctx, &graph_input())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeadlineExceeded));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Pixela::builder("user", "token")
        .with_base_url(format!("http://{addr}"))
        .with_sleeper(InstantSleeper)
        .build()
        .unwrap();

    let err = client
        .user()
        .delete(&CallContext::background())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert!(err.to_string().starts_with("failed http call:"));
}
