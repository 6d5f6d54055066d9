use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use bti_assistant::analysis::{
    credentials::StaticCredentialProvider,
    error::AnalysisErrorKind,
    prompt::build_request,
    transport::CompletionTransport,
    types::AnalysisConfig,
};

use crate::support::{COMPLETION_PATH, TEST_FOLDER, completion_body, config_for};

#[tokio::test]
async fn given_valid_credential_when_send_then_wire_contract_is_met_and_first_text_returned() {
    let server = MockServer::start_async().await;
    let config = config_for(server.url(COMPLETION_PATH));
    let request = build_request(&config, "Можно ли снести перегородку между кухней и комнатой?");
    let expected_body = serde_json::to_value(&request).expect("request should serialize");

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(COMPLETION_PATH)
                .header("content-type", "application/json")
                .header("authorization", "Bearer token-1")
                .header("x-folder-id", TEST_FOLDER)
                .json_body(expected_body);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "result": {
                        "alternatives": [
                            {"message": {"text": "первый"}},
                            {"message": {"text": "второй"}}
                        ]
                    }
                }));
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let text = transport
        .send(&request, &StaticCredentialProvider::new("token-1"))
        .await
        .expect("send should succeed");

    mock.assert_async().await;
    assert_eq!(text, "первый");
}

#[tokio::test]
async fn given_provider_rejects_when_send_then_remote_error_carries_status_and_body() {
    let server = MockServer::start_async().await;
    let config = config_for(server.url(COMPLETION_PATH));
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETION_PATH);
            then.status(401)
                .body(r#"{"error":{"grpcCode":16,"message":"Unauthenticated"}}"#);
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("bad"))
        .await
        .expect_err("401 should fail");

    assert_eq!(err.kind, AnalysisErrorKind::Remote);
    assert_eq!(err.http_status, Some(401));
    assert!(err.body.as_deref().unwrap_or_default().contains("Unauthenticated"));
    assert!(err.message.contains("Unauthenticated"));
}

#[tokio::test]
async fn given_no_alternatives_when_send_then_empty_response() {
    let server = MockServer::start_async().await;
    let config = config_for(server.url(COMPLETION_PATH));
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETION_PATH);
            then.status(200).json_body(json!({"result": {"alternatives": []}}));
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("t"))
        .await
        .expect_err("empty alternatives should fail");

    assert_eq!(err.kind, AnalysisErrorKind::EmptyResponse);
}

#[tokio::test]
async fn given_non_json_success_body_when_send_then_transport_error() {
    let server = MockServer::start_async().await;
    let config = config_for(server.url(COMPLETION_PATH));
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETION_PATH);
            then.status(200).body("<html>gateway</html>");
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("t"))
        .await
        .expect_err("html body should fail");

    assert_eq!(err.kind, AnalysisErrorKind::Transport);
}

#[tokio::test]
async fn given_any_2xx_status_when_send_then_body_is_accepted() {
    let server = MockServer::start_async().await;
    let config = config_for(server.url(COMPLETION_PATH));
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETION_PATH);
            then.status(202).json_body(completion_body("{}"));
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let text = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("t"))
        .await
        .expect("202 should be treated as success");

    assert_eq!(text, "{}");
}

#[tokio::test]
async fn given_blank_credential_when_send_then_no_request_is_made() {
    let server = MockServer::start_async().await;
    let config = config_for(server.url(COMPLETION_PATH));
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETION_PATH);
            then.status(200).json_body(completion_body("{}"));
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("  \t "))
        .await
        .expect_err("blank credential should fail");

    assert_eq!(err.kind, AnalysisErrorKind::NoCredential);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn given_slow_provider_when_send_then_timeout_is_transport_error() {
    let server = MockServer::start_async().await;
    let config = AnalysisConfig {
        request_timeout_ms: 100,
        ..config_for(server.url(COMPLETION_PATH))
    };
    server
        .mock_async(|when, then| {
            when.method(POST).path(COMPLETION_PATH);
            then.status(200)
                .delay(Duration::from_millis(1_500))
                .json_body(completion_body("{}"));
        })
        .await;

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("t"))
        .await
        .expect_err("slow provider should time out");

    assert_eq!(err.kind, AnalysisErrorKind::Transport);
    assert!(err.message.contains("timed out"), "unexpected message: {}", err.message);
}

#[tokio::test]
async fn given_unreachable_endpoint_when_send_then_transport_error() {
    let config = config_for(format!("http://127.0.0.1:1{COMPLETION_PATH}"));

    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("t"))
        .await
        .expect_err("closed port should fail");

    assert_eq!(err.kind, AnalysisErrorKind::Transport);
}

async fn read_request(stream: &mut TcpStream) {
    let mut received = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = stream.read(&mut chunk).await.expect("request should be readable");
        if read == 0 {
            return;
        }
        received.extend_from_slice(&chunk[..read]);

        let text = String::from_utf8_lossy(&received);
        let Some(head_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..head_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if received.len() >= head_end + 4 + content_length {
            return;
        }
    }
}

#[tokio::test]
async fn given_rejecting_status_with_truncated_body_when_send_then_remote_error_keeps_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("client should connect");
        read_request(&mut stream).await;
        stream
            .write_all(b"HTTP/1.1 503 Service Unavailable\r\ncontent-length: 100\r\n\r\nupstream")
            .await
            .expect("partial response should be written");
        stream.shutdown().await.ok();
    });

    let config = config_for(format!("http://{address}{COMPLETION_PATH}"));
    let transport = CompletionTransport::new(&config).expect("transport should build");
    let err = transport
        .send(&build_request(&config, "вопрос"), &StaticCredentialProvider::new("t"))
        .await
        .expect_err("truncated body should fail");
    server.await.expect("server task should not panic");

    assert_eq!(err.kind, AnalysisErrorKind::Remote);
    assert_eq!(err.http_status, Some(503));
}
