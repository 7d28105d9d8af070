// ==========================================
// Bling 批量导入网关 - 请求限流中间件
// ==========================================
// 职责: 按客户端 IP 的滑动窗口限额（默认 15 分钟 100 次）
// 客户端标识: X-Forwarded-For 第一项 → 连接地址 → anonymous
// ==========================================

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::{ApiError, ApiResult};
use crate::app::state::AppState;
use crate::config::RateLimitConfig;

const FORWARDED_FOR: &str = "x-forwarded-for";

// 超过该数量的客户端键时清理过期窗口
const PRUNE_THRESHOLD: usize = 1024;

/// 滑动窗口限流器
#[derive(Debug)]
pub struct RateLimiter {
    windows: HashMap<String, VecDeque<Instant>>,
    window: Duration,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: HashMap::new(),
            window,
            max_requests,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.window_secs), config.max_requests)
    }

    /// 记录一次请求
    ///
    /// # 返回
    /// - Ok(()): 未超限
    /// - Err(retry_after_secs): 超限,距窗口内最早一次请求过期的秒数
    pub fn check(&mut self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&mut self, key: &str, now: Instant) -> Result<(), u64> {
        if self.max_requests == 0 {
            return Ok(());
        }

        let window = self.window;
        if self.windows.len() > PRUNE_THRESHOLD {
            self.windows.retain(|_, hits| {
                hits.back()
                    .is_some_and(|last| now.duration_since(*last) < window)
            });
        }

        let hits = self.windows.entry(key.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|first| now.duration_since(*first) >= window)
        {
            hits.pop_front();
        }

        if hits.len() as u32 >= self.max_requests {
            let retry_after = hits
                .front()
                .map(|first| window.saturating_sub(now.duration_since(*first)))
                .unwrap_or(window);
            return Err(ceil_secs(retry_after));
        }

        hits.push_back(now);
        Ok(())
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs() + u64::from(duration.subsec_nanos() > 0);
    secs.max(1)
}

/// 提取限流键
fn client_key(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// 限流中间件；超限返回 429
pub async fn limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match check_request(&state, &req) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

fn check_request(state: &AppState, req: &Request) -> ApiResult<()> {
    let key = client_key(req);
    let mut limiter = state
        .rate_limiter
        .lock()
        .map_err(|_| ApiError::Internal("rate limiter lock".into()))?;

    limiter.check(&key).map_err(|retry_after| {
        tracing::warn!(client = %key, retry_after, "请求超出限额");
        ApiError::RateLimited { retry_after }
    })
}
