//! HTTP retry wrapper for the remote transport
//!
//! Retry is a transport concern: the resolution layers above `RemoteListing`
//! never retry, so rate limiting (429) and transient server errors (5xx) are
//! absorbed here, with Retry-After support and jittered exponential backoff.
//! Non-retryable statuses pass through untouched.

use std::time::Duration;

use reqwest::{Client, Request, Response};

/// Bounds for the retry loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retry attempts after the initial send
    pub max_retries: u32,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Cap on any single delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

fn is_retryable(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Numeric Retry-After header, capped at five minutes. HTTP-date values are
/// ignored; numeric seconds cover the overwhelming majority of real traffic.
fn retry_after(response: &Response) -> Option<Duration> {
    let value = response.headers().get("retry-after")?.to_str().ok()?;
    let secs: u64 = value.parse().ok()?;
    Some(Duration::from_secs(secs.min(300)))
}

/// Exponential backoff for `attempt` with 10-30% jitter.
fn backoff(attempt: u32, policy: &RetryPolicy) -> Duration {
    let base = policy.base_delay_ms as f64 * 2f64.powi(attempt as i32);
    let capped = base.min(policy.max_delay_ms as f64);
    let jitter = capped * (0.1 + rand::random::<f64>() * 0.2);
    Duration::from_millis((capped + jitter) as u64)
}

/// Send `request`, retrying on 429/5xx within the policy's bounds.
///
/// The request body must be in-memory bytes (no streams); it is captured
/// once and replayed on each retry.
pub async fn send_with_retry(
    client: &Client,
    request: Request,
    policy: &RetryPolicy,
) -> Result<Response, reqwest::Error> {
    let method = request.method().clone();
    let url = request.url().clone();
    let headers = request.headers().clone();
    let body = request
        .body()
        .and_then(|b| b.as_bytes())
        .map(|b| b.to_vec());

    let mut response = client.execute(request).await?;

    for attempt in 0..policy.max_retries {
        if !is_retryable(response.status().as_u16()) {
            return Ok(response);
        }

        let delay = retry_after(&response).unwrap_or_else(|| backoff(attempt, policy));
        tracing::debug!(
            "{} {} returned {}, retry {}/{} in {:?}",
            method,
            url,
            response.status(),
            attempt + 1,
            policy.max_retries,
            delay
        );
        tokio::time::sleep(delay).await;

        let mut retry = client.request(method.clone(), url.clone()).headers(headers.clone());
        if let Some(ref bytes) = body {
            retry = retry.body(bytes.clone());
        }
        response = retry.send().await?;
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 500, 502, 503, 504] {
            assert!(is_retryable(status));
        }
        for status in [200, 201, 204, 400, 401, 403, 404] {
            assert!(!is_retryable(status));
        }
    }

    #[test]
    fn test_backoff_stays_bounded() {
        let policy = RetryPolicy::default();
        for attempt in 0..12 {
            let delay = backoff(attempt, &policy);
            // Cap plus maximum jitter share.
            assert!(delay.as_millis() as f64 <= policy.max_delay_ms as f64 * 1.3);
        }
    }

    #[test]
    fn test_backoff_grows_with_attempts() {
        let policy = RetryPolicy { max_retries: 3, base_delay_ms: 100, max_delay_ms: 60_000 };
        let early = backoff(0, &policy);
        let late = backoff(5, &policy);
        assert!(late > early);
    }
}
