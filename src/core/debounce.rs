//! Restartable trailing-edge debounce for input streams.

use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Collapses a burst of values into the latest one after a quiet period.
///
/// Each [`push`](Debouncer::push) replaces the pending value and restarts
/// the timer; [`settled`](Debouncer::settled) resolves with the value once
/// the quiet period elapses, or stays pending forever when nothing was
/// pushed (intended for use inside `tokio::select!`). A zero delay fires
/// immediately.
pub struct Debouncer<T> {
    delay: Duration,
    latest: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: None,
            deadline: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.latest = Some(value);
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub async fn settled(&mut self) -> T {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.deadline = None;
                self.latest
                    .take()
                    .expect("deadline is only armed together with a value")
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_latest_value_wins() {
        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        debouncer.push(1);
        debouncer.push(2);
        debouncer.push(3);
        assert_eq!(debouncer.settled().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_restarts_the_timer() {
        let mut debouncer = Debouncer::new(Duration::from_millis(250));
        debouncer.push("a");
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.push("b");

        let before = Instant::now();
        let value = debouncer.settled().await;
        assert_eq!(value, "b");
        // The second push re-armed a full quiet period.
        assert!(Instant::now() - before >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_fires_immediately() {
        let mut debouncer = Debouncer::new(Duration::ZERO);
        debouncer.push(42);
        assert_eq!(debouncer.settled().await, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_debouncer_stays_pending() {
        let mut debouncer = Debouncer::<i32>::new(Duration::from_millis(10));
        let settled = debouncer.settled();
        tokio::pin!(settled);
        let raced = tokio::time::timeout(Duration::from_millis(50), &mut settled).await;
        assert!(raced.is_err());
    }
}
