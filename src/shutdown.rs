//! Cooperative shutdown and interruptible pauses.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Waits that end early when shutdown is requested.
pub trait Pause {
    /// Wait for `duration`. Returns `false` if the wait was cut short by shutdown.
    fn pause(&self, duration: Duration) -> bool;

    /// Whether shutdown has been requested.
    fn stopping(&self) -> bool;
}

type Hook = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct State {
    stopped: Mutex<bool>,
    wake: Condvar,
    hooks: Mutex<Vec<Hook>>,
}

/// Shared shutdown flag, set from the signal handler.
///
/// Hooks registered with [`Shutdown::on_trigger`] run once on the
/// triggering thread. They unblock work that a pause cannot interrupt,
/// such as a read from a silent child process.
#[derive(Clone, Default)]
pub struct Shutdown {
    state: Arc<State>,
}

impl std::fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shutdown")
            .field("triggered", &self.is_triggered())
            .finish_non_exhaustive()
    }
}

impl Shutdown {
    /// Create an untriggered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown, wake any pause in progress and run the hooks.
    ///
    /// Returns `false` if shutdown had already been requested.
    pub fn trigger(&self) -> bool {
        {
            let mut stopped = self
                .state
                .stopped
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if *stopped {
                return false;
            }
            *stopped = true;
        }
        self.state.wake.notify_all();

        let hooks = std::mem::take(
            &mut *self
                .state
                .hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for hook in hooks {
            hook();
        }
        true
    }

    /// Run `hook` when shutdown is requested, or now if it already was.
    pub fn on_trigger(&self, hook: impl FnOnce() + Send + 'static) {
        if self.is_triggered() {
            hook();
            return;
        }
        let mut hooks = self
            .state
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Re-check under the hook lock; `trigger` drains it after setting the flag.
        if self.is_triggered() {
            drop(hooks);
            hook();
        } else {
            hooks.push(Box::new(hook));
        }
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        *self
            .state
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Pause for Shutdown {
    fn pause(&self, duration: Duration) -> bool {
        let guard = self
            .state
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (stopped, _) = self
            .state
            .wake
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !*stopped
    }

    fn stopping(&self) -> bool {
        self.is_triggered()
    }
}
