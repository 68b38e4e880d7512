//! Timeout and polling helpers for page operations

use anyhow::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::trace;

use crate::session::BrowseSession;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const QUERY_FLOOR: Duration = Duration::from_secs(1);

/// Wrap a session operation with an explicit timeout.
///
/// Distinguishes between the operation failing and the budget running out
/// in the returned error message.
pub async fn with_timeout<F, T>(operation: F, timeout: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {:.2}s",
            timeout.as_secs_f64()
        )),
    }
}

/// Poll until any of `selectors` matches at least one element.
///
/// Returns the selector that matched, or `None` once `timeout` elapses. The
/// page is always checked at least once, so a zero timeout still sees
/// content that is already there. Query errors count as "not present yet".
pub async fn wait_for_any_selector<S>(
    session: &S,
    selectors: &[&'static str],
    timeout: Duration,
) -> Option<&'static str>
where
    S: BrowseSession + ?Sized,
{
    let start = Instant::now();

    loop {
        for selector in selectors {
            let budget = timeout.saturating_sub(start.elapsed()).max(QUERY_FLOOR);
            match with_timeout(session.query(selector), budget, selector).await {
                Ok(found) if !found.is_empty() => {
                    trace!("'{selector}' present after {:?}", start.elapsed());
                    return Some(selector);
                }
                Ok(_) => {}
                Err(e) => trace!("Polling '{selector}' failed: {e}"),
            }
        }

        if start.elapsed() >= timeout {
            return None;
        }
        tokio::time::sleep(POLL_INTERVAL.min(timeout.saturating_sub(start.elapsed()))).await;
    }
}

/// Sleep for `delay` unless it is zero
pub async fn settle(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
