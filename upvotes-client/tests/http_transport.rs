//! HTTP transport tests against a one-shot local TCP responder.

use reqwest::header::{HeaderName, HeaderValue};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use upvotes_client::{HttpToggleClient, ToggleFailure, ToggleTransport};
use upvotes_shared::types::{ResourceId, ResourceRef, VoteState};

/// Accepts one connection, captures the request head and answers with
/// `status` and `body`.
async fn respond_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn comment_7() -> ResourceRef {
    ResourceRef::comment(ResourceId::new(7).unwrap())
}

#[tokio::test]
async fn test_successful_toggle_round_trip() {
    let (base_url, server) = respond_once(
        "200 OK",
        r#"{"success":true,"message":"Comment updated successfully","data":{"isUpvoted":true,"points":3}}"#,
    )
    .await;
    let client = HttpToggleClient::new(base_url).with_header(
        HeaderName::from_static("x-actor-id"),
        HeaderValue::from_static("u1"),
    );

    let state = client.toggle(comment_7()).await.unwrap();

    assert_eq!(state, VoteState::new(true, 3));
    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("post /api/comments/7/upvote http/1.1"));
    assert!(request.contains("x-actor-id: u1"));
}

#[tokio::test]
async fn test_not_found_response() {
    let (base_url, server) =
        respond_once("404 Not Found", r#"{"success":false,"message":"Comment not found"}"#).await;

    let result = HttpToggleClient::new(base_url).toggle(comment_7()).await;

    assert_eq!(result, Err(ToggleFailure::NotFound(comment_7())));
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let result = HttpToggleClient::new(base_url).toggle(comment_7()).await;

    assert!(matches!(result, Err(ToggleFailure::Network(_))));
}
