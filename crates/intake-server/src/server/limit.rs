//! Per-client fixed-window admission control.
//!
//! A [`RateLimiter`] counts requests per client key inside a fixed window.
//! Once a client exceeds the ceiling, further requests are rejected for the
//! remainder of that window. The limiter sits in front of the intake
//! endpoints as axum middleware and never sees application semantics.
//!
//! The client key is the first hop of `x-forwarded-for` when present
//! (deployments behind a proxy), otherwise the socket peer address.

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use intake_core::Error;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::server::routes::AppState;

/// Prune the window map once it holds this many entries.
const PRUNE_THRESHOLD: usize = 1024;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client address.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request for `key` and reports whether it is admitted.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        // Expired windows for inactive clients would otherwise accumulate
        // forever.
        if windows.len() >= PRUNE_THRESHOLD {
            windows.retain(|_, w| now.duration_since(w.started) < self.window);
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.max_requests
    }
}

/// Axum middleware applying admission control to the intake endpoints.
pub async fn admission(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    if state.limiter.check(&key) {
        next.run(req).await
    } else {
        tracing::debug!(client = %key, "rate limit exceeded");
        Error::RateLimitExceeded.into_response()
    }
}

/// Derives the admission-control key for a request.
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
    {
        let first_hop = forwarded.trim();
        if !first_hop.is_empty() {
            return first_hop.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(forwarded: Option<&str>) -> Request {
        let builder = axum::http::Request::builder().uri("/apply");
        let builder = match forwarded {
            Some(value) => builder.header("x-forwarded-for", value),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn admits_up_to_the_ceiling_then_rejects() {
        let limiter = RateLimiter::new(Duration::from_secs(300), 3);
        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1"));
        }
        assert!(!limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn windows_are_scoped_per_client() {
        let limiter = RateLimiter::new(Duration::from_secs(300), 1);
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(Duration::from_millis(10), 1);
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        std::thread::sleep(Duration::from_millis(15));
        assert!(limiter.check("10.0.0.1"));
    }

    #[test]
    fn forwarded_header_takes_precedence() {
        let req = request(Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_key(&req), "203.0.113.7");
    }

    #[test]
    fn missing_peer_info_falls_back_to_unknown() {
        let req = request(None);
        assert_eq!(client_key(&req), "unknown");
    }
}
