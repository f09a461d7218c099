//! Fixed-deadline time budgets for groups of network operations

use dugout_common::{DugoutError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// A deadline shared by every operation run under it.
///
/// Unlike a per-call timeout, the clock starts when the budget is created:
/// once it has elapsed every later operation fails with `Timeout` immediately.
#[derive(Debug, Clone)]
pub struct Budget {
    name: &'static str,
    duration: Duration,
    deadline: Instant,
}

impl Budget {
    /// Start a budget now
    pub fn start(name: &'static str, duration: Duration) -> Self {
        Self {
            name,
            duration,
            deadline: Instant::now() + duration,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Run `operation` against the deadline, mapping expiry to `DugoutError::Timeout`
    pub async fn run<T, F>(&self, operation: &str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_elapsed() {
            return Err(self.timeout_error(operation));
        }

        match tokio::time::timeout_at(self.deadline, future).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error(operation)),
        }
    }

    fn timeout_error(&self, operation: &str) -> DugoutError {
        DugoutError::Timeout(format!(
            "{} exceeded the {} budget of {:?}",
            operation, self.name, self.duration
        ))
    }
}
