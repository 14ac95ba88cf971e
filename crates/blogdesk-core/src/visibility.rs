//! One-shot lazy-load trigger driven by viewport visibility.
//!
//! A [`VisibilityTrigger`] starts out not triggered and moves to triggered
//! exactly once, when the first of these happens:
//!
//! - the observer reports an intersecting entry,
//! - the fallback delay elapses,
//! - [`VisibilityTrigger::force_load`] is called,
//! - the observer reports that it cannot observe the viewport.
//!
//! The callback runs on that transition and never again. Errors and panics
//! raised by the callback are logged and swallowed. Observation is
//! disconnected as soon as the trigger fires or the trigger is dropped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::traits::{IntersectionEntry, ObserveOptions, ViewportObserver};

/// Error type a load callback may return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

type Callback = Box<dyn FnOnce() -> Result<(), CallbackError> + Send>;

/// Default time after which loading happens even without intersection.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(6000);

/// Options for a [`VisibilityTrigger`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    pub observe: ObserveOptions,
    pub fallback_delay: Duration,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            observe: ObserveOptions::default(),
            fallback_delay: DEFAULT_FALLBACK_DELAY,
        }
    }
}

/// What moved a trigger into the triggered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCause {
    Intersection,
    Fallback,
    Manual,
    Unsupported,
}

struct Shared {
    triggered: AtomicBool,
    callback: Mutex<Option<Callback>>,
    released: Notify,
}

impl Shared {
    /// Returns false if the trigger had already fired.
    fn fire(&self, cause: TriggerCause) -> bool {
        if self.triggered.swap(true, Ordering::AcqRel) {
            return false;
        }

        debug!(?cause, "Visibility trigger fired");

        let callback = self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(callback) = callback {
            match panic::catch_unwind(AssertUnwindSafe(callback)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Load callback failed"),
                Err(_) => warn!("Load callback panicked"),
            }
        }

        true
    }
}

/// Handle owned by the view that wants to lazy-load its content.
///
/// Dropping the handle tears the observation down and cancels the fallback
/// timer if the trigger has not fired yet.
pub struct VisibilityTrigger {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl VisibilityTrigger {
    /// Start watching with `observer` and run `callback` once on trigger.
    ///
    /// The fallback timer starts immediately.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn observe<O, F>(observer: O, options: VisibilityOptions, callback: F) -> Self
    where
        O: ViewportObserver,
        F: FnOnce() -> Result<(), CallbackError> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            triggered: AtomicBool::new(false),
            callback: Mutex::new(Some(Box::new(callback))),
            released: Notify::new(),
        });

        let task = tokio::spawn(watch(observer, options, Arc::clone(&shared)));

        Self { shared, task }
    }

    /// Returns true once the trigger has fired.
    pub fn is_visible(&self) -> bool {
        self.shared.triggered.load(Ordering::Acquire)
    }

    /// Fire now if the trigger has not fired yet.
    pub fn force_load(&self) {
        if self.shared.fire(TriggerCause::Manual) {
            self.shared.released.notify_one();
        }
    }
}

impl Drop for VisibilityTrigger {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for VisibilityTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTrigger")
            .field("triggered", &self.is_visible())
            .finish()
    }
}

/// Disconnects the observer when dropped, including on task abort.
struct Observation<O: ViewportObserver> {
    observer: O,
    active: bool,
}

impl<O: ViewportObserver> Drop for Observation<O> {
    fn drop(&mut self) {
        if self.active {
            self.observer.disconnect();
            debug!("Viewport observation released");
        }
    }
}

async fn next_entry(
    entries: &mut Option<mpsc::UnboundedReceiver<IntersectionEntry>>,
) -> Option<IntersectionEntry> {
    match entries {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

async fn watch<O: ViewportObserver>(observer: O, options: VisibilityOptions, shared: Arc<Shared>) {
    let fallback = tokio::time::sleep(options.fallback_delay);
    tokio::pin!(fallback);

    let mut observation = Observation {
        observer,
        active: false,
    };

    let mut entries = match observation.observer.observe(&options.observe) {
        Some(rx) => {
            observation.active = true;
            Some(rx)
        }
        None => {
            debug!("Viewport observation unsupported");
            shared.fire(TriggerCause::Unsupported);
            return;
        }
    };

    loop {
        tokio::select! {
            entry = next_entry(&mut entries), if entries.is_some() => match entry {
                Some(entry) if entry.is_intersecting => {
                    shared.fire(TriggerCause::Intersection);
                    break;
                }
                Some(_) => {}
                // Observer went away; only the fallback can fire now.
                None => entries = None,
            },
            () = &mut fallback => {
                shared.fire(TriggerCause::Fallback);
                break;
            }
            () = shared.released.notified() => break,
        }
    }
}
