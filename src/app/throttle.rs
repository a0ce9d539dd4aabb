use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Global minimum-interval limiter on the create path. One shared last-call
/// timestamp across all callers, deliberately not per-user: it protects a
/// shared downstream resource, it is not a fairness mechanism.
pub struct ThrottleGate {
    delay: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl ThrottleGate {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_call: Mutex::new(None),
        }
    }

    /// Returns `true` and records "now" when at least `delay` has elapsed
    /// since the previous accepted call. Rejected callers get no queueing
    /// and no retry; they are turned away immediately.
    ///
    /// The read-modify-write of the timestamp happens under one lock, so two
    /// near-simultaneous calls cannot both observe a stale value and both
    /// pass.
    pub fn acquire(&self) -> bool {
        let mut last_call = self.last_call.lock().expect("throttle lock poisoned");
        let now = Instant::now();
        match *last_call {
            Some(previous) if now.duration_since(previous) < self.delay => false,
            _ => {
                *last_call = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_is_accepted() {
        let gate = ThrottleGate::new(Duration::from_millis(50));
        assert!(gate.acquire());
    }

    #[test]
    fn second_call_within_delay_is_rejected() {
        let gate = ThrottleGate::new(Duration::from_secs(60));
        assert!(gate.acquire());
        assert!(!gate.acquire());
    }

    #[test]
    fn call_after_delay_is_accepted() {
        let gate = ThrottleGate::new(Duration::from_millis(10));
        assert!(gate.acquire());
        std::thread::sleep(Duration::from_millis(20));
        assert!(gate.acquire());
    }

    #[test]
    fn zero_delay_never_rejects() {
        let gate = ThrottleGate::new(Duration::ZERO);
        for _ in 0..10 {
            assert!(gate.acquire());
        }
    }

    #[test]
    fn concurrent_burst_admits_exactly_one() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let gate = Arc::new(ThrottleGate::new(Duration::from_secs(60)));
        let accepted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                let accepted = accepted.clone();
                std::thread::spawn(move || {
                    if gate.acquire() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }
}
