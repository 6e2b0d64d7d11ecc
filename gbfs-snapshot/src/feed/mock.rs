//! In-process GBFS feed server for tests.
//!
//! Serves scripted replies per path on `127.0.0.1` and counts requests, so
//! tests can drive the retry logic through real HTTP.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One scripted HTTP response.
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: String,
}

impl Reply {
    /// 200 with a JSON content type.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type", "application/json".to_string())],
            body: body.into(),
        }
    }

    /// Bare status with an empty body.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Add a response header.
    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in self.headers {
            if let Ok(value) = HeaderValue::from_str(&value) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(name), value);
            }
        }
        response
    }
}

#[derive(Default)]
struct Routes {
    scripts: HashMap<String, VecDeque<Reply>>,
    hits: HashMap<String, usize>,
}

type Shared = Arc<Mutex<Routes>>;

/// A running mock feed. The server stops when this is dropped.
pub struct MockFeed {
    addr: SocketAddr,
    routes: Shared,
    task: JoinHandle<()>,
}

impl MockFeed {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let routes = Shared::default();
        let app = Router::new().fallback(serve).with_state(routes.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, routes, task }
    }

    /// Queue replies for `path`. The last reply repeats once the rest are used.
    pub fn script(&self, path: &str, replies: Vec<Reply>) {
        let mut routes = self.routes.lock().unwrap();
        routes.scripts.insert(path.to_string(), replies.into());
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        let routes = self.routes.lock().unwrap();
        routes.hits.get(path).copied().unwrap_or(0)
    }

    /// Total requests received on any path.
    pub fn total_hits(&self) -> usize {
        let routes = self.routes.lock().unwrap();
        routes.hits.values().sum()
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Feed root laid out like a real GBFS host.
    pub fn base_url(&self) -> String {
        self.url("/gbfs/en/")
    }
}

impl Drop for MockFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(State(routes): State<Shared>, uri: Uri) -> Response {
    let path = uri.path().to_string();

    let reply = {
        let mut routes = routes.lock().unwrap();
        *routes.hits.entry(path.clone()).or_default() += 1;
        match routes.scripts.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        }
    };

    match reply {
        Some(reply) => reply.into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain")],
            format!("no script for {path}"),
        )
            .into_response(),
    }
}

/// Root URL of a port nothing is listening on.
pub async fn unreachable_root() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
