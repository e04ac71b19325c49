use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::SourceError;

/// Timeout applied to ordinary source calls unless the rc file overrides it
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

type CancelHook = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct CancelState {
    cancelled: AtomicBool,
    hooks: Mutex<Vec<CancelHook>>,
}

/// Cooperative cancellation shared between the signal handler and the invocation
///
/// Cancelling runs every registered hook once; hooks registered after
/// cancellation run immediately.
#[derive(Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if self.state.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        let hooks = self
            .state
            .hooks
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        for hook in hooks.iter() {
            hook();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// Register a hook that aborts in-flight work (e.g. a SQLite interrupt handle)
    pub fn on_cancel<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_cancelled() {
            hook();
            return;
        }
        self.state
            .hooks
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push(Box::new(hook));
    }
}

/// Invocation-scoped context threaded through every task source call
#[derive(Clone)]
pub struct Context {
    timeout: Duration,
    cancel: CancelToken,
}

impl Context {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cancel,
        }
    }

    /// Same cancellation, different per-call timeout
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            cancel: self.cancel.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Fail fast once the invocation has been interrupted
    pub fn check(&self) -> Result<(), SourceError> {
        if self.cancel.is_cancelled() {
            Err(SourceError::Interrupted)
        } else {
            Ok(())
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(CancelToken::new())
    }
}
