// ==========================================
// 上游 Bling API 桩服务 - 用于客户端与路由测试
// ==========================================
// 监听 127.0.0.1 随机端口,记录所有请求,按脚本返回响应
// 脚本耗尽后: POST 返回 201 {"data":{"id":N}}，GET 返回 200 {"data":[]}
// ==========================================

use axum::body::Bytes;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct StubRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct StubInner {
    requests: Mutex<Vec<StubRequest>>,
    responses: Mutex<VecDeque<(u16, String)>>,
}

#[derive(Clone)]
pub struct StubUpstream {
    pub base_url: String,
    inner: Arc<StubInner>,
}

impl StubUpstream {
    /// 启动桩服务
    pub async fn start() -> Self {
        let inner = Arc::new(StubInner::default());
        let app = Router::new().fallback(record).with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/Api/v3", addr),
            inner,
        }
    }

    /// 追加一个预设响应
    pub fn respond(&self, status: u16, body: &str) {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<StubRequest> {
        self.inner.requests.lock().unwrap().clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn record(
    State(inner): State<Arc<StubInner>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let count = {
        let mut requests = inner.requests.lock().unwrap();
        requests.push(StubRequest {
            method: method.clone(),
            path: uri.path().to_string(),
            authorization: header(&headers, "authorization"),
            content_type: header(&headers, "content-type"),
            accept: header(&headers, "accept"),
            body: String::from_utf8_lossy(&body).to_string(),
        });
        requests.len()
    };

    let scripted = inner.responses.lock().unwrap().pop_front();
    let (status, body) = scripted.unwrap_or_else(|| {
        if method == Method::POST {
            (201, format!(r#"{{"data":{{"id":{}}}}}"#, count))
        } else {
            (200, r#"{"data":[]}"#.to_string())
        }
    });

    (
        StatusCode::from_u16(status).unwrap(),
        [("content-type", "application/json")],
        body,
    )
}
