//! Timing and duration assertions
//!
//! - [`measure_async`]: time a future
//! - [`assert_duration_below`]: assert an operation finished in time
//! - [`assert_duration_above`]: assert an operation actually waited

use std::{
    future::Future,
    time::{Duration, Instant},
};

/// Measures the duration of an async operation
///
/// ```ignore
/// let (result, elapsed) = measure_async("capture", client.capture()).await;
/// assert_duration_below(elapsed, Duration::from_secs(3), "capture");
/// ```
pub async fn measure_async<F, T>(name: &str, future: F) -> (T, Duration)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let result = future.await;
    let elapsed = start.elapsed();
    println!("[TIMING] {}: {:.2}ms", name, elapsed.as_secs_f64() * 1000.0);
    (result, elapsed)
}

/// Asserts that a duration is below a threshold
///
/// ```
/// use snaptable_test_utils::timing::assert_duration_below;
/// use std::time::Duration;
///
/// assert_duration_below(Duration::from_millis(500), Duration::from_secs(1), "capture");
/// ```
///
/// # Panics
///
/// Panics if `actual > threshold` with a message showing the excess time.
pub fn assert_duration_below(actual: Duration, threshold: Duration, operation: &str) {
    assert!(
        actual <= threshold,
        "{} took {:.3}s, expected <={:.3}s ({}ms over threshold)",
        operation,
        actual.as_secs_f64(),
        threshold.as_secs_f64(),
        (actual.as_millis() as i128) - (threshold.as_millis() as i128)
    );
}

/// Asserts that a duration is above a minimum
///
/// # Panics
///
/// Panics if `actual < minimum`.
pub fn assert_duration_above(actual: Duration, minimum: Duration, operation: &str) {
    assert!(
        actual >= minimum,
        "{} took {:.3}s, expected >={:.3}s (suspiciously fast)",
        operation,
        actual.as_secs_f64(),
        minimum.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_measure_async() {
        let (result, duration) = measure_async("sleep", async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            "done"
        })
        .await;
        assert_eq!(result, "done");
        assert_duration_above(duration, Duration::from_millis(20), "sleep");
    }

    #[test]
    fn test_assert_duration_below_success() {
        assert_duration_below(Duration::from_millis(500), Duration::from_secs(1), "test");
    }

    #[test]
    #[should_panic(expected = "over threshold")]
    fn test_assert_duration_below_panics() {
        assert_duration_below(Duration::from_secs(2), Duration::from_secs(1), "test");
    }
}
