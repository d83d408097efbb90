//! Per-client rate limiting for the `/api` surface.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use pulse_infra::config::RateLimitConfig;

use crate::app::errors;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP.
///
/// A client's window opens with its first request and admits at most
/// `max_requests` until `window` has elapsed, at which point the count
/// starts over.
#[derive(Debug)]
pub struct IpRateLimiter {
    window: Duration,
    max_requests: u32,
    clients: DashMap<IpAddr, Window>,
}

impl IpRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: config.window,
            max_requests: config.max_requests,
            clients: DashMap::new(),
        }
    }

    pub fn check(&self, ip: IpAddr) -> bool {
        self.check_at(ip, Instant::now())
    }

    /// Count one request from `ip` at `now`; `false` once the window is full.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut entry = self.clients.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }
        if entry.count < self.max_requests {
            entry.count += 1;
            true
        } else {
            false
        }
    }

    /// Drop every client whose window has closed. Returns how many were removed.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, w| now.duration_since(w.started) < self.window);
        before - self.clients.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

/// One limiter shared by all requests.
pub fn rate_limiter(config: &RateLimitConfig) -> Arc<IpRateLimiter> {
    Arc::new(IpRateLimiter::new(config))
}

/// Evict closed windows once per window length. The task ends when the
/// limiter is dropped. Must be called inside a Tokio runtime.
pub fn spawn_eviction(limiter: &Arc<IpRateLimiter>) -> JoinHandle<()> {
    let period = limiter.window;
    let limiter: Weak<IpRateLimiter> = Arc::downgrade(limiter);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let Some(limiter) = limiter.upgrade() else {
                break;
            };
            let evicted = limiter.evict_expired(Instant::now());
            if evicted > 0 {
                debug!(evicted, remaining = limiter.tracked_clients(), "rate limit windows evicted");
            }
        }
    })
}

pub async fn rate_limit(State(limiter): State<Arc<IpRateLimiter>>, req: Request, next: Next) -> Response {
    let ip = client_ip(&req);
    if limiter.check(ip) {
        next.run(req).await
    } else {
        debug!(%ip, "rate limit exceeded");
        errors::too_many_requests()
    }
}

/// Socket peer address, else the first `X-Forwarded-For` entry.
pub fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .or_else(|| forwarded_for(req.headers()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn limiter(window_ms: u64, max_requests: u32) -> Arc<IpRateLimiter> {
        rate_limiter(&RateLimitConfig {
            window: Duration::from_millis(window_ms),
            max_requests,
        })
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), ip("203.0.113.7"));
    }

    #[test]
    fn peer_address_wins_over_header() {
        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(client_ip(&req), ip("192.0.2.1"));
    }

    #[test]
    fn limiter_allows_max_requests_per_client() {
        let limiter = limiter(900_000, 3);
        let now = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at(ip("192.0.2.1"), now));
        }
        assert!(!limiter.check_at(ip("192.0.2.1"), now));
        assert!(limiter.check_at(ip("192.0.2.2"), now));
    }

    #[test]
    fn full_window_rejects_until_it_closes() {
        let limiter = limiter(1_000, 4);
        let a = ip("192.0.2.1");
        let start = Instant::now();

        for _ in 0..4 {
            assert!(limiter.check_at(a, start));
        }
        // No refill inside the window, however the requests are spread.
        for ms in (10..1_000).step_by(10) {
            assert!(!limiter.check_at(a, start + Duration::from_millis(ms)), "admitted at {ms}ms");
        }

        let next = start + Duration::from_millis(1_000);
        for _ in 0..4 {
            assert!(limiter.check_at(a, next));
        }
        assert!(!limiter.check_at(a, next));
    }

    #[test]
    fn eviction_drops_only_closed_windows() {
        let limiter = limiter(1_000, 5);
        let start = Instant::now();
        limiter.check_at(ip("192.0.2.1"), start);
        limiter.check_at(ip("192.0.2.2"), start + Duration::from_millis(500));
        assert_eq!(limiter.tracked_clients(), 2);

        assert_eq!(limiter.evict_expired(start + Duration::from_millis(1_000)), 1);
        assert_eq!(limiter.tracked_clients(), 1);

        assert_eq!(limiter.evict_expired(start + Duration::from_millis(1_500)), 1);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn eviction_task_clears_stale_clients() {
        let limiter = limiter(1_000, 5);
        assert!(limiter.check(ip("192.0.2.1")));
        assert!(limiter.check(ip("2001:db8::1")));

        let task = spawn_eviction(&limiter);
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(limiter.tracked_clients(), 0);

        drop(limiter);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(task.is_finished());
    }
}
