//! `HttpTransport` against a real socket
//!
//! Each test serves one canned HTTP response from a local listener so the
//! status, body and connection-failure mappings run through `reqwest`.

use kadena_client::{ClientConfig, ClientError, HttpTransport, KadenaClient, Transport};
use serde_json::json;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Serve exactly one response, then close
async fn one_shot_server(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    addr
}

/// Consume headers and any `Content-Length` body
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return;
            }
        }
    }
}

/// Plain client that never routes loopback traffic through a proxy
fn direct_transport() -> HttpTransport {
    HttpTransport::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
}

/// An address nothing is listening on
async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[tokio::test]
async fn test_success_body_is_parsed() {
    let addr = one_shot_server("200 OK", "application/json", r#"{"requestKeys":["abc"]}"#).await;
    let url = format!("http://{addr}/send");

    let body = direct_transport().post(&url, &json!({ "cmds": [] })).await.unwrap();
    assert_eq!(body, json!({ "requestKeys": ["abc"] }));
}

#[tokio::test]
async fn test_error_status_keeps_raw_body() {
    let addr = one_shot_server(
        "400 Bad Request",
        "text/plain",
        "Validation failed: hash mismatch",
    )
    .await;
    let url = format!("http://{addr}/local");

    match direct_transport().post(&url, &json!({})).await {
        Err(ClientError::Http {
            url: failed,
            status,
            body,
        }) => {
            assert_eq!(failed, url);
            assert_eq!(status, 400);
            assert_eq!(body, "Validation failed: hash mismatch");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let addr = one_shot_server("200 OK", "application/json", "not json {").await;
    let url = format!("http://{addr}/config");

    let result = direct_transport().get(&url).await;
    assert!(matches!(result, Err(ClientError::MalformedResponse { .. })));
}

#[tokio::test]
async fn test_connect_discovers_network_over_http() {
    let addr =
        one_shot_server("200 OK", "application/json", r#"{"chainwebVersion":"testnet04"}"#).await;

    let config = ClientConfig::new(format!("http://{addr}/"));
    let client = KadenaClient::connect_with(config, direct_transport()).await.unwrap();
    assert_eq!(client.network_id(), "testnet04");
    assert_eq!(client.base_url(), format!("http://{addr}"));
}

#[tokio::test]
async fn test_connect_to_closed_port_is_unreachable() {
    let addr = closed_addr().await;

    let config = ClientConfig::new(format!("http://{addr}"));
    match KadenaClient::connect_with(config, direct_transport()).await {
        Err(ClientError::NetworkUnreachable { url, .. }) => {
            assert_eq!(url, format!("http://{addr}/config"));
        }
        other => panic!("expected NetworkUnreachable, got {other:?}"),
    }
}
