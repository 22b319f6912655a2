use std::{
    convert::Infallible,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, RwLock,
    },
};

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use hyper::service::{make_service_fn, service_fn};
use hyper::{body, Body, Method, Request, Response, Server, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const MOCK_TOKEN: &str = "mock-jwt-token";
pub const CLOUD_EXECUTION_KEY: &str = "EXEC-42";
pub const SERVER_EXECUTION_KEY: &str = "EXEC-77";

/// In-memory stand-in for both service flavors: a cloud token exchange plus
/// the cloud and Jira import endpoints, with request capture for assertions.
#[derive(Clone)]
pub struct MockService {
    inner: Arc<ServiceState>,
}

struct ServiceState {
    client_id: String,
    client_secret: String,
    jira_user: String,
    jira_password: String,
    captured: RwLock<Vec<CapturedImport>>,
    auth_calls: AtomicUsize,
    reject_imports: AtomicBool,
}

#[derive(Clone, Debug)]
pub struct CapturedImport {
    pub path: String,
    pub authorization: String,
    pub body: Value,
}

impl MockService {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        jira_user: impl Into<String>,
        jira_password: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceState {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
                jira_user: jira_user.into(),
                jira_password: jira_password.into(),
                captured: RwLock::new(Vec::new()),
                auth_calls: AtomicUsize::new(0),
                reject_imports: AtomicBool::new(false),
            }),
        }
    }

    pub fn captured(&self) -> Vec<CapturedImport> {
        self.inner
            .captured
            .read()
            .expect("mock capture lock poisoned")
            .clone()
    }

    pub fn auth_calls(&self) -> usize {
        self.inner.auth_calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent import request fail with HTTP 400.
    pub fn reject_imports(&self, reject: bool) {
        self.inner.reject_imports.store(reject, Ordering::SeqCst);
    }

    fn expected_basic(&self) -> String {
        let credentials = format!("{}:{}", self.inner.jira_user, self.inner.jira_password);
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }

    fn capture(&self, path: &str, authorization: &str, body: Value) {
        self.inner
            .captured
            .write()
            .expect("mock capture lock poisoned")
            .push(CapturedImport {
                path: path.to_owned(),
                authorization: authorization.to_owned(),
                body,
            });
    }
}

pub struct MockXrayServer {
    url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MockXrayServer {
    pub async fn start(service: MockService) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock service listener")?;
        let addr = listener
            .local_addr()
            .context("failed to read mock listener address")?;
        let std_listener = listener
            .into_std()
            .context("failed to convert mock listener")?;
        std_listener
            .set_nonblocking(true)
            .context("failed to set mock listener non-blocking")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let make_service = make_service_fn(move |_| {
            let service = service.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| serve_request(service.clone(), req)))
            }
        });

        let server = Server::from_tcp(std_listener)
            .context("failed to build mock HTTP server")?
            .serve(make_service);
        let graceful = server.with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        let handle = tokio::spawn(async move {
            if let Err(err) = graceful.await {
                eprintln!("mock service stopped: {err}");
            }
        });

        Ok(Self {
            url: format!("http://{}", addr),
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

async fn serve_request(
    service: MockService,
    req: Request<Body>,
) -> Result<Response<Body>, Infallible> {
    if req.method() != Method::POST {
        return Ok(plain_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Unsupported method",
        ));
    }

    let path = req.uri().path().to_owned();
    let authorization = req
        .headers()
        .get(hyper::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let bytes = match body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return Ok(plain_response(
                StatusCode::BAD_REQUEST,
                format!("failed to read body: {err}"),
            ));
        }
    };

    let payload: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            return Ok(plain_response(
                StatusCode::BAD_REQUEST,
                format!("invalid JSON payload: {err}"),
            ));
        }
    };

    let response = match path.as_str() {
        "/api/v1/authenticate" => handle_authenticate(&service, &payload),
        "/api/v1/import/execution" => handle_cloud_import(&service, &authorization, payload),
        "/rest/raven/1.0/import/execution" => {
            handle_server_import(&service, &authorization, payload)
        }
        _ => plain_response(StatusCode::NOT_FOUND, format!("unknown path {path}")),
    };

    Ok(response)
}

fn handle_authenticate(service: &MockService, payload: &Value) -> Response<Body> {
    service.inner.auth_calls.fetch_add(1, Ordering::SeqCst);

    let client_id = payload.get("client_id").and_then(Value::as_str);
    let client_secret = payload.get("client_secret").and_then(Value::as_str);

    if client_id == Some(service.inner.client_id.as_str())
        && client_secret == Some(service.inner.client_secret.as_str())
    {
        json_response(StatusCode::OK, json!(MOCK_TOKEN))
    } else {
        json_response(
            StatusCode::UNAUTHORIZED,
            json!({"error": "invalid client credentials"}),
        )
    }
}

fn handle_cloud_import(
    service: &MockService,
    authorization: &str,
    payload: Value,
) -> Response<Body> {
    if authorization != format!("Bearer {MOCK_TOKEN}") {
        return json_response(
            StatusCode::UNAUTHORIZED,
            json!({"error": "missing or invalid token"}),
        );
    }
    if service.inner.reject_imports.load(Ordering::SeqCst) {
        return json_response(StatusCode::BAD_REQUEST, json!({"error": "malformed report"}));
    }

    service.capture("/api/v1/import/execution", authorization, payload);
    json_response(
        StatusCode::OK,
        json!({"id": "10200", "key": CLOUD_EXECUTION_KEY, "self": "http://mock/execution/10200"}),
    )
}

fn handle_server_import(
    service: &MockService,
    authorization: &str,
    payload: Value,
) -> Response<Body> {
    if authorization != service.expected_basic() {
        return json_response(
            StatusCode::UNAUTHORIZED,
            json!({"error": "invalid basic credentials"}),
        );
    }
    if service.inner.reject_imports.load(Ordering::SeqCst) {
        return json_response(StatusCode::BAD_REQUEST, json!({"error": "malformed report"}));
    }

    service.capture("/rest/raven/1.0/import/execution", authorization, payload);
    json_response(
        StatusCode::OK,
        json!({"testExecIssue": {"id": "10200", "key": SERVER_EXECUTION_KEY}}),
    )
}

fn json_response(status: StatusCode, value: Value) -> Response<Body> {
    let mut response = Response::new(Body::from(value.to_string()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

fn plain_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    let mut response = Response::new(Body::from(message.into()));
    *response.status_mut() = status;
    response
}
