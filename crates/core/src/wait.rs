//! Polling helper for screens that settle asynchronously.

use std::future::Future;
use std::time::Duration;

use appdrive_runtime::{Error, Result};
use tokio::time::Instant;
use tracing::trace;

/// Re-runs `check` until it succeeds or `timeout` elapses.
///
/// `check` runs at least once. On expiry the last error is wrapped in
/// [`Error::Timeout`].
pub async fn spin_wait<T, F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let deadline = Instant::now() + timeout;
	let mut attempts = 0u32;

	loop {
		attempts += 1;
		let err = match check().await {
			Ok(value) => return Ok(value),
			Err(err) => err,
		};

		trace!(target = "appdrive", attempts, error = %err, "spin_wait retry");
		if Instant::now() + interval > deadline {
			return Err(Error::Timeout(format!(
				"condition not met after {} attempts in {}ms: {err}",
				attempts,
				timeout.as_millis()
			)));
		}
		tokio::time::sleep(interval).await;
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicU32, Ordering};

	use appdrive_protocol::Status;

	use super::*;

	#[tokio::test]
	async fn returns_once_check_passes() {
		let calls = Arc::new(AtomicU32::new(0));
		let counter = Arc::clone(&calls);

		let value = spin_wait(Duration::from_secs(2), Duration::from_millis(5), move || {
			let counter = Arc::clone(&counter);
			async move {
				if counter.fetch_add(1, Ordering::SeqCst) < 2 {
					Err(Error::remote(Status::NoSuchElement))
				} else {
					Ok("Buttons")
				}
			}
		})
		.await
		.unwrap();

		assert_eq!(value, "Buttons");
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test]
	async fn times_out_with_last_error() {
		let err = spin_wait(Duration::from_millis(30), Duration::from_millis(10), || async {
			Err::<(), _>(Error::remote(Status::NoSuchElement))
		})
		.await
		.unwrap_err();

		assert!(err.is_timeout());
		assert!(err.to_string().contains("status: 7"), "got: {err}");
	}

	#[tokio::test]
	async fn zero_timeout_still_checks_once() {
		let calls = AtomicU32::new(0);
		let result = spin_wait(Duration::ZERO, Duration::from_millis(10), || {
			calls.fetch_add(1, Ordering::SeqCst);
			async { Ok(()) }
		})
		.await;
		assert!(result.is_ok());
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
