use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

// Requests per second per client, configurable via RATE_LIMIT_PER_SEC
static MAX_REQUESTS_PER_WINDOW: Lazy<u32> = Lazy::new(|| {
    std::env::var("RATE_LIMIT_PER_SEC")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10)
});

static RATE_LIMITER: Lazy<DashMap<String, (u32, Instant)>> = Lazy::new(DashMap::new);

/// Per-IP fixed-window limiter. The public tracking endpoint sits behind
/// this too, so the window must fit a dashboard's burst of parallel calls.
pub async fn global_rate_limiter(request: Request, next: Next) -> Result<Response, StatusCode> {
    let ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            request
                .extensions()
                .get::<std::net::SocketAddr>()
                .map(|addr| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());

    let now = Instant::now();
    let mut entry = RATE_LIMITER.entry(ip.clone()).or_insert((0, now));

    if now.duration_since(entry.1) > WINDOW {
        *entry = (1, now);
    } else {
        entry.0 += 1;
    }

    if entry.0 > *MAX_REQUESTS_PER_WINDOW {
        drop(entry);
        tracing::warn!(ip = %ip, "rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(request).await)
}
