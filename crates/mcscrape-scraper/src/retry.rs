//! Fixed-delay retry used by the resolver.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Run `operation` up to `max_attempts` times, sleeping `delay` between
/// attempts. Returns the first success or the last error.
///
/// `max_attempts` below 1 is treated as 1. `operation` receives the 1-based
/// attempt number.
pub(crate) async fn retry_with_fixed_delay<T, E, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if attempt >= max_attempts => return Err(err),
            Err(err) => {
                tracing::warn!(
                    symbol = label,
                    attempt,
                    max_attempts,
                    error = %err,
                    "attempt failed, retrying"
                );
            }
        }
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_fixed_delay(3, Duration::ZERO, "TCS", |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, String>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn passes_attempt_numbers_from_one() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let _ = retry_with_fixed_delay(3, Duration::ZERO, "TCS", |attempt| {
            let s = Arc::clone(&s);
            async move {
                s.lock().unwrap().push(attempt);
                Err::<(), String>("nope".to_owned())
            }
        })
        .await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_fixed_delay(0, Duration::ZERO, "TCS", |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<(), String>("down".to_owned())
            }
        })
        .await;
        assert_eq!(result.unwrap_err(), "down");
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
