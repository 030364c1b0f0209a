//! Per-domain request spacing.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Keeps requests to the same domain at least `delay` apart.
///
/// State lives as long as the limiter, so spacing holds across queries.
/// The next free slot is reserved under the lock and the sleep happens
/// outside it, so concurrent callers queue up instead of bursting.
#[derive(Debug)]
pub struct DomainRateLimiter {
    delay: Duration,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl DomainRateLimiter {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until `domain` may be contacted again and books the slot.
    pub async fn acquire(&self, domain: &str) {
        let slot = self.reserve(domain);
        if slot > Instant::now() {
            tracing::debug!(domain, wait_ms = ?(slot - Instant::now()).as_millis(), "rate limit wait");
            tokio::time::sleep_until(slot).await;
        }
    }

    fn reserve(&self, domain: &str) -> Instant {
        let now = Instant::now();
        let mut slots = self
            .next_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = slots
            .get(domain)
            .copied()
            .filter(|s| *s > now)
            .unwrap_or(now);
        slots.insert(domain.to_string(), slot + self.delay);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_request_to_a_domain_does_not_wait() {
        let limiter = DomainRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("andymark.com").await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn same_domain_requests_are_spaced() {
        let limiter = DomainRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("andymark.com").await;
        limiter.acquire("andymark.com").await;
        limiter.acquire("andymark.com").await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(start.elapsed() < Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn domains_are_limited_independently() {
        let limiter = DomainRateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.acquire("andymark.com").await;
        limiter.acquire("wcproducts.com").await;
        limiter.acquire("store.ctr-electronics.com").await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn slot_is_free_again_after_the_delay() {
        let limiter = DomainRateLimiter::new(Duration::from_millis(500));
        limiter.acquire("andymark.com").await;
        tokio::time::advance(Duration::from_millis(600)).await;
        let start = Instant::now();
        limiter.acquire("andymark.com").await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_queue_up() {
        let limiter = std::sync::Arc::new(DomainRateLimiter::new(Duration::from_millis(200)));
        let start = Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.acquire("revrobotics.com").await })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }
        assert!(start.elapsed() >= Duration::from_millis(600));
    }
}
