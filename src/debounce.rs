use std::time::{Duration, Instant};

/// Trailing-edge debounce driven by the frame loop.
///
/// Every `call` replaces the pending arguments and restarts the quiet period.
/// `poll` hands the arguments back exactly once, after `wait` has passed since the
/// most recent call. There is no leading-edge firing.
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: None,
        }
    }

    pub fn set_wait(&mut self, wait: Duration) {
        self.wait = wait;
    }

    pub fn call(&mut self, args: T, now: Instant) {
        self.pending = Some((args, now));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, called_at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*called_at) < self.wait {
            return None;
        }
        self.pending.take().map(|(args, _)| args)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending call fires, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, called_at)| self.wait.saturating_sub(now.saturating_duration_since(*called_at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(300);

    #[test]
    fn test_burst_fires_once_with_last_args() {
        let mut debouncer = Debouncer::new(WAIT);
        let start = Instant::now();
        let mut fired = Vec::new();

        for i in 0..10u32 {
            let now = start + Duration::from_millis(i as u64 * 50);
            debouncer.call(i, now);
            if let Some(v) = debouncer.poll(now) {
                fired.push(v);
            }
        }
        assert!(fired.is_empty());

        let last_call = start + Duration::from_millis(450);
        assert_eq!(debouncer.poll(last_call + WAIT - Duration::from_millis(1)), None);
        if let Some(v) = debouncer.poll(last_call + WAIT) {
            fired.push(v);
        }
        if let Some(v) = debouncer.poll(last_call + WAIT * 4) {
            fired.push(v);
        }
        assert_eq!(fired, vec![9]);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_never_fires_without_pause() {
        let mut debouncer = Debouncer::new(WAIT);
        let start = Instant::now();
        for i in 0..100u64 {
            let now = start + Duration::from_millis(i * 200);
            assert_eq!(debouncer.poll(now), None);
            debouncer.call((), now);
        }
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_separate_bursts_fire_separately() {
        let mut debouncer = Debouncer::new(WAIT);
        let start = Instant::now();
        debouncer.call("a", start);
        assert_eq!(debouncer.poll(start + WAIT), Some("a"));
        debouncer.call("b", start + WAIT * 2);
        assert_eq!(debouncer.poll(start + WAIT * 2), None);
        assert_eq!(debouncer.poll(start + WAIT * 3), Some("b"));
    }

    #[test]
    fn test_cancel_and_remaining() {
        let mut debouncer = Debouncer::new(WAIT);
        let start = Instant::now();
        assert_eq!(debouncer.remaining(start), None);
        debouncer.call(1, start);
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + WAIT * 2), None);
    }
}
