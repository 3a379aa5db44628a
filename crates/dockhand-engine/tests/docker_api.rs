//! DockerClient against a fake Engine API served by axum.
//!
//! The fake daemon records every request line so the tests can assert the
//! exact paths and query strings the client sends.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use dockhand_engine::{
    remove_all_containers, remove_dangling_images, DockerClient, EngineClient, EngineEndpoint,
    EngineError, Filters,
};
use serde_json::json;

type Log = Arc<Mutex<Vec<String>>>;

fn record(log: &Log, method: &Method, uri: &Uri) {
    log.lock().unwrap().push(format!("{method} {uri}"));
}

fn fake_daemon(log: Log) -> Router {
    Router::new()
        .route(
            "/_ping",
            get(|State(log): State<Log>, method: Method, uri: Uri| async move {
                record(&log, &method, &uri);
                "OK"
            }),
        )
        .route(
            "/containers/json",
            get(|State(log): State<Log>, method: Method, uri: Uri| async move {
                record(&log, &method, &uri);
                Json(json!([
                    {"Id": "c1", "Names": ["/web"], "Image": "nginx", "State": "exited", "Status": "Exited (0)"},
                    {"Id": "busy", "Names": ["/db"], "Image": "postgres", "State": "exited"}
                ]))
            }),
        )
        .route(
            "/containers/{id}",
            delete(
                |State(log): State<Log>, Path(id): Path<String>, method: Method, uri: Uri| async move {
                    record(&log, &method, &uri);
                    if id == "busy" {
                        (
                            StatusCode::CONFLICT,
                            Json(json!({"message": "container busy is in use"})),
                        )
                            .into_response()
                    } else {
                        StatusCode::NO_CONTENT.into_response()
                    }
                },
            ),
        )
        .route(
            "/images/json",
            get(|State(log): State<Log>, method: Method, uri: Uri| async move {
                record(&log, &method, &uri);
                Json(json!([
                    {"Id": "sha256:aaa", "RepoTags": null, "Size": 1024},
                    {"Id": "sha256:bbb", "RepoTags": ["<none>:<none>"]}
                ]))
            }),
        )
        .route(
            "/images/{id}",
            delete(|State(log): State<Log>, method: Method, uri: Uri| async move {
                record(&log, &method, &uri);
                Json(json!([{"Deleted": "sha256:aaa"}]))
            }),
        )
        .fallback(|uri: Uri| async move {
            (StatusCode::NOT_FOUND, format!("page not found: {uri}"))
        })
        .with_state(log)
}

async fn tcp_client() -> (DockerClient, Log) {
    let log = Log::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to random port");
    let addr = listener.local_addr().unwrap();
    let router = fake_daemon(log.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = DockerClient::connect(EngineEndpoint::Tcp(addr.to_string())).unwrap();
    (client, log)
}

fn requests(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn ping_over_tcp() {
    let (client, log) = tcp_client().await;
    client.ping().await.unwrap();
    assert_eq!(requests(&log), vec!["GET /_ping".to_string()]);
}

#[tokio::test]
async fn ping_over_unix_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("engine.sock");
    let listener = tokio::net::UnixListener::bind(&socket).unwrap();
    let log = Log::default();
    let router = fake_daemon(log.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = DockerClient::connect(EngineEndpoint::Unix(socket)).unwrap();
    client.ping().await.unwrap();
    assert_eq!(requests(&log), vec!["GET /_ping".to_string()]);
}

#[tokio::test]
async fn list_containers_adds_status_filter_unless_running_included() {
    let (client, log) = tcp_client().await;

    let stopped = client.list_containers(true, false, &Filters::new()).await.unwrap();
    assert_eq!(stopped.len(), 2);
    assert_eq!(stopped[0].id, "c1");
    assert_eq!(stopped[0].names, vec!["/web".to_string()]);

    client.list_containers(true, true, &Filters::new()).await.unwrap();

    assert_eq!(
        requests(&log),
        vec![
            "GET /containers/json?all=1&filters=%7B%22status%22%3A%5B%22created%22%2C%22exited%22%2C%22dead%22%5D%7D".to_string(),
            "GET /containers/json?all=1".to_string(),
        ]
    );
}

#[tokio::test]
async fn remove_container_sends_force_and_volume_flags() {
    let (client, log) = tcp_client().await;
    client.remove_container("c1", true, false).await.unwrap();
    assert_eq!(
        requests(&log),
        vec!["DELETE /containers/c1?force=1&v=0".to_string()]
    );
}

#[tokio::test]
async fn remove_container_surfaces_engine_message() {
    let (client, _log) = tcp_client().await;
    let err = client.remove_container("busy", false, false).await.unwrap_err();
    match err {
        EngineError::Api { status, message } => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(message, "container busy is in use");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unknown_route_keeps_plain_text_message() {
    let (client, _log) = tcp_client().await;
    let err = client.remove_image("", false).await.unwrap_err();
    assert!(matches!(err, EngineError::Api { status, .. } if status == StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn list_images_decodes_dangling_images() {
    let (client, log) = tcp_client().await;
    let images = client
        .list_images(true, &Filters::single("dangling", "true"))
        .await
        .unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].repo_tags, None);
    assert_eq!(
        requests(&log),
        vec!["GET /images/json?all=1&filters=%7B%22dangling%22%3A%5B%22true%22%5D%7D".to_string()]
    );
}

#[tokio::test]
async fn remove_all_containers_end_to_end() {
    let (client, log) = tcp_client().await;
    let mut out = Vec::new();

    let report = remove_all_containers(&client, false, &mut out).await.unwrap();

    assert_eq!(report.removed, vec!["c1".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "busy");
    assert_eq!(String::from_utf8(out).unwrap(), "c1\nbusy\n");
    assert_eq!(requests(&log).len(), 3);
}

#[tokio::test]
async fn remove_dangling_images_end_to_end() {
    let (client, log) = tcp_client().await;
    let mut out = Vec::new();

    let report = remove_dangling_images(&client, true, &mut out).await.unwrap();

    assert_eq!(
        report.removed,
        vec!["sha256:aaa".to_string(), "sha256:bbb".to_string()]
    );
    let requests = requests(&log);
    assert_eq!(requests[1], "DELETE /images/sha256%3Aaaa?force=1");
    assert_eq!(requests[2], "DELETE /images/sha256%3Abbb?force=1");
}
