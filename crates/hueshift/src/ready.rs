//! Single-shot readiness subscriptions.
//!
//! [`wait_for`] registers interest in something appearing (a page element,
//! typically). The host calls [`Readiness::poke`] whenever the world may
//! have changed; the first poke whose probe succeeds resolves the paired
//! [`Ready`] future. There is no timeout and no cancellation: an entity that
//! never appears leaves the future pending forever.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let present = Rc::new(Cell::new(false));
//! let probe = Rc::clone(&present);
//! let (mut readiness, _ready) = hueshift::ready::wait_for(move || probe.get().then_some("el"));
//!
//! assert!(!readiness.poke());
//! present.set(true);
//! assert!(readiness.poke());
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

type Probe<T> = Box<dyn FnMut() -> Option<T>>;

/// The observing half: re-runs the probe on every poke until it succeeds.
pub struct Readiness<T> {
    probe: Probe<T>,
    sender: Option<oneshot::Sender<T>>,
}

impl<T> Readiness<T> {
    /// Re-runs the probe. Returns `true` once resolved; later pokes do
    /// nothing and keep returning `true`.
    pub fn poke(&mut self) -> bool {
        if self.sender.is_none() {
            return true;
        }
        let Some(value) = (self.probe)() else {
            return false;
        };
        if let Some(sender) = self.sender.take() {
            // a dropped receiver just means nobody is waiting any more
            let _ = sender.send(value);
        }
        debug!("Readiness resolved");
        true
    }

    pub const fn is_resolved(&self) -> bool {
        self.sender.is_none()
    }
}

impl<T> fmt::Debug for Readiness<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Readiness")
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

/// The waiting half. Resolves to `Some(value)` exactly once, or to `None`
/// if the [`Readiness`] is dropped before its probe succeeds.
#[derive(Debug)]
pub struct Ready<T>(oneshot::Receiver<T>);

impl<T> Future for Ready<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(Result::ok)
    }
}

/// Subscribes to `probe` becoming `Some`. The probe runs once immediately,
/// so an entity that already exists resolves without any poke.
pub fn wait_for<T, F>(probe: F) -> (Readiness<T>, Ready<T>)
where
    F: FnMut() -> Option<T> + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let mut readiness = Readiness {
        probe: Box::new(probe),
        sender: Some(sender),
    };
    readiness.poke();
    (readiness, Ready(receiver))
}
