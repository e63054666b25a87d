//! Bounded polling waits.
//!
//! Waiting is a synchronous polling loop with an explicit timeout and poll
//! interval; on expiry it fails with [`PageError::Timeout`] and is never
//! retried beyond the configured polling. There is no cancellation
//! primitive other than the timeout itself.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::driver::Handle;
use crate::result::{PageError, PageResult};

/// Default timeout for visibility waits (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Re-check this often
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Block until the handle reports itself displayed.
///
/// Driver failures during a poll propagate immediately.
pub(crate) fn wait_displayed(handle: &Handle, options: &WaitOptions) -> PageResult<()> {
    let started = Instant::now();
    loop {
        if handle.is_displayed()? {
            trace!(elapsed_ms = started.elapsed().as_millis() as u64, "element visible");
            return Ok(());
        }
        if started.elapsed() >= options.timeout {
            return Err(PageError::Timeout {
                ms: options.timeout.as_millis() as u64,
            });
        }
        std::thread::sleep(options.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPage;
    use std::sync::Arc;

    fn fast_options() -> WaitOptions {
        WaitOptions::new()
            .with_timeout(Duration::from_millis(40))
            .with_poll_interval(Duration::from_millis(1))
    }

    #[test]
    fn defaults() {
        let options = WaitOptions::default();
        assert_eq!(options.timeout, Duration::from_millis(5_000));
        assert_eq!(options.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn returns_once_visible() {
        let page = MockPage::new();
        let node = page.node("n");
        node.set_visible_after(3);
        let handle: Handle = node;

        assert!(wait_displayed(&handle, &fast_options()).is_ok());
    }

    #[test]
    fn times_out_when_never_visible() {
        let page = MockPage::new();
        let node = page.node("n");
        node.set_visible(false);
        let handle: Handle = node;

        let err = wait_displayed(&handle, &fast_options()).unwrap_err();
        assert!(matches!(err, PageError::Timeout { ms: 40 }));
    }

    #[test]
    fn immediately_visible_element_needs_one_poll() {
        let page = MockPage::new();
        let node = page.node("n");
        let handle: Handle = node.clone();

        wait_displayed(&handle, &fast_options()).unwrap();
        assert_eq!(node.calls(), ["n.is_displayed"]);
    }
}
