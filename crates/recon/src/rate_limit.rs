//! Fixed-delay rate limiting over an injectable clock.
//!
//! Every outbound call is preceded by one `wait()`. The delay never adapts to
//! server responses.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Time source used for sleeping between outbound calls.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested sleeps instead of performing them. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.borrow().len()
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

pub struct RateLimiter {
    delay: Duration,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").field("delay", &self.delay).finish()
    }
}

impl RateLimiter {
    pub fn new(delay: Duration, clock: Box<dyn Clock>) -> Self {
        Self { delay, clock }
    }

    pub fn system(delay: Duration) -> Self {
        Self::new(delay, Box::new(SystemClock))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep the configured delay. Call before each outbound request.
    pub fn wait(&self) {
        self.clock.sleep(self.delay);
    }
}
