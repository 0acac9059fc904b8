//! Spread a bursty event stream so consecutive items are at least `interval` apart.

use std::time::Duration;

use futures::{Stream, StreamExt};
use tokio::time::{Instant, sleep_until};

/// Delays (never drops) items so that two outputs are separated by at least `interval`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    next_permitted: Option<Instant>,
}

impl RateLimiter {
    /// Create a limiter enforcing `interval` between two emitted items.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_permitted: None,
        }
    }

    /// Reserve the next emission slot for an item that arrived at `now`.
    ///
    /// The returned instant is never earlier than `now` and the reservation
    /// pointer only moves forward.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let release = match self.next_permitted {
            Some(next) if next > now => next,
            _ => now,
        };
        self.next_permitted = Some(release + self.interval);
        release
    }

    /// Wrap `input`, yielding every item in order once its slot is reached.
    pub fn limit<S>(mut self, input: S) -> impl Stream<Item = S::Item>
    where
        S: Stream,
    {
        async_stream::stream! {
            futures::pin_mut!(input);
            while let Some(item) = input.next().await {
                let release = self.schedule(Instant::now());
                sleep_until(release).await;
                yield item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::UnboundedReceiverStream;

    use super::*;

    const INTERVAL: Duration = Duration::from_millis(12_000);

    #[test]
    fn schedule_never_moves_backwards() {
        let mut limiter = RateLimiter::new(INTERVAL);
        let start = Instant::now();

        assert_eq!(limiter.schedule(start), start);
        assert_eq!(limiter.schedule(start + Duration::from_millis(100)), start + INTERVAL);
        assert_eq!(limiter.schedule(start + Duration::from_millis(200)), start + INTERVAL * 2);
        let late = start + INTERVAL * 10;
        assert_eq!(limiter.schedule(late), late);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_is_spread_without_dropping_items() {
        let start = Instant::now();
        let limited = RateLimiter::new(INTERVAL).limit(stream::iter(1..=4));
        let emitted: Vec<_> = limited.map(|item| (item, start.elapsed())).collect().await;

        assert_eq!(
            emitted,
            vec![
                (1, Duration::ZERO),
                (2, INTERVAL),
                (3, INTERVAL * 2),
                (4, INTERVAL * 3),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn sparse_items_pass_immediately() {
        let (tx, rx) = mpsc::unbounded_channel();
        let limited = RateLimiter::new(INTERVAL).limit(UnboundedReceiverStream::new(rx));
        futures::pin_mut!(limited);
        let start = Instant::now();

        tx.send("a").unwrap();
        assert_eq!(limited.next().await, Some("a"));
        assert_eq!(start.elapsed(), Duration::ZERO);

        tokio::time::sleep(INTERVAL * 2).await;
        tx.send("b").unwrap();
        assert_eq!(limited.next().await, Some("b"));
        assert_eq!(start.elapsed(), INTERVAL * 2);

        tx.send("c").unwrap();
        assert_eq!(limited.next().await, Some("c"));
        assert_eq!(start.elapsed(), INTERVAL * 3);
    }
}
