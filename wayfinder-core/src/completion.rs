//! One-shot completion gate for callback-style reporting.
//!
//! A [`Completion`] is handed to a plugin's `prepare` phase (and to callback
//! style actions). It may be cloned and moved anywhere, but only the first
//! report is delivered; later reports are ignored. The paired [`Verdict`]
//! resolves to the delivered value, or to `false` if every handle was dropped
//! without reporting.

use futures::channel::oneshot;
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    task::{Context, Poll},
};

struct Gate {
    fired: AtomicBool,
    sender: Mutex<Option<oneshot::Sender<bool>>>,
}

/// A cloneable handle that reports a single success or failure.
#[derive(Clone)]
pub struct Completion {
    gate: Arc<Gate>,
}

impl Completion {
    /// Create a completion handle and the verdict it reports to.
    pub fn channel() -> (Self, Verdict) {
        let (tx, rx) = oneshot::channel();
        let completion = Self {
            gate: Arc::new(Gate {
                fired: AtomicBool::new(false),
                sender: Mutex::new(Some(tx)),
            }),
        };
        (completion, Verdict { receiver: rx })
    }

    /// Report the outcome.
    ///
    /// Returns `true` if this call delivered the outcome, `false` if an earlier
    /// report already did.
    pub fn complete(&self, ok: bool) -> bool {
        if self
            .gate
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let sender = match self.gate.sender.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(sender) = sender {
            // The receiver may already be gone; the report is still consumed.
            let _ = sender.send(ok);
        }
        true
    }

    /// Report success.
    pub fn succeed(&self) -> bool {
        self.complete(true)
    }

    /// Report failure.
    pub fn fail(&self) -> bool {
        self.complete(false)
    }

    /// Whether an outcome has been reported through any clone of this handle.
    pub fn is_complete(&self) -> bool {
        self.gate.fired.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("complete", &self.is_complete())
            .finish()
    }
}

/// The receiving side of a [`Completion`].
///
/// Resolves to the first reported outcome, or `false` when all handles are
/// dropped without reporting.
#[derive(Debug)]
#[must_use = "a verdict does nothing unless awaited"]
pub struct Verdict {
    receiver: oneshot::Receiver<bool>,
}

impl Future for Verdict {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or(false))
    }
}
