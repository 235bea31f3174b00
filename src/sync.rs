//! History synchronization and the engine facade.
//!
//! [`Navigator`] bundles a [`Dispatcher`] with the injected host
//! [`HistoryStack`]:
//!
//! - `navigate` / `navigate_replace` apply the stack mutation and resolve in
//!   one synchronous step, so no stale state is observable in between and
//!   repeated calls resolve strictly in call order
//! - `init` subscribes to user-driven back/forward traversal and performs
//!   the single initial resolution of the starting location
//!
//! After any completed navigation or handled pop event, the visible
//! location, the stack's current entry, and the current resolved route
//! agree.

use std::collections::HashMap;
use std::rc::Rc;

use crate::dispatch::{Dispatcher, NavigationObserver, ResolvedRoute};
use crate::error::{DispatchError, HandlerError, PatternError};
use crate::history::{HistoryStack, NavigationIntent, NavigationMode, PopEvent};

/// The navigation engine: route registry, dispatch, and history sync behind
/// one handle.
///
/// Constructed at startup, torn down (pop listener detached) on drop.
/// Engines are independent; several can coexist against separate history
/// stacks (e.g. embedded sub-apps).
pub struct Navigator {
    dispatcher: Rc<Dispatcher>,
    history: Rc<dyn HistoryStack>,
}

impl Navigator {
    /// Creates an engine over `history`, redirecting resolution misses to
    /// `fallback`.
    pub fn new(history: Rc<dyn HistoryStack>, fallback: &str) -> Self {
        Self {
            dispatcher: Rc::new(Dispatcher::new(Rc::clone(&history), fallback)),
            history,
        }
    }

    /// Sets the observer notified after each successful resolution.
    pub fn with_observer(self, observer: Rc<dyn NavigationObserver>) -> Self {
        self.dispatcher.set_observer(observer);
        self
    }

    /// Registers a route. Call once per logical page before
    /// [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::register`].
    pub fn register<F>(&self, template: &str, handler: F) -> Result<(), PatternError>
    where
        F: Fn(&HashMap<String, String>, &ResolvedRoute) -> Result<(), HandlerError> + 'static,
    {
        self.dispatcher.register(template, handler)
    }

    /// Navigates with push semantics: a new history entry, then resolution.
    ///
    /// Returns `Ok(true)` when a registered route matched; see
    /// [`Dispatcher::resolve`] for miss and error behavior.
    pub fn navigate(&self, path: &str) -> Result<bool, DispatchError> {
        self.apply(NavigationIntent::new(path, NavigationMode::Push))
    }

    /// Navigates with replace semantics: the current entry is overwritten.
    pub fn navigate_replace(&self, path: &str) -> Result<bool, DispatchError> {
        self.apply(NavigationIntent::new(path, NavigationMode::Replace))
    }

    /// Subscribes to back/forward traversal, then resolves the starting
    /// location exactly once.
    ///
    /// A pop event re-resolves the marker attached to the entry landed on;
    /// when the entry carries no marker (a page that loaded without going
    /// through this engine), the visible location is the source of truth.
    /// A failed resolution is contained to its event - the listener stays
    /// attached and later events are still handled.
    pub fn init(&self) -> Result<bool, DispatchError> {
        let dispatcher = Rc::downgrade(&self.dispatcher);
        self.history.subscribe(Box::new(move |event: PopEvent| {
            let Some(dispatcher) = dispatcher.upgrade() else {
                return;
            };
            let path = event.marker.unwrap_or(event.location);
            if let Err(_err) = dispatcher.resolve(&path) {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::warn_1(&format!("webnav: {_err}").into());
            }
        }));
        self.dispatcher.resolve(&self.history.location_path())
    }

    /// Returns the current resolved route, if any resolution has succeeded.
    pub fn current_route(&self) -> Option<ResolvedRoute> {
        self.dispatcher.current_route()
    }

    /// Path of the most recent resolution miss, for not-found reporting.
    pub fn last_missed_path(&self) -> Option<String> {
        self.dispatcher.last_missed_path()
    }

    /// Asks the host stack to go back one entry; the resulting pop event
    /// drives the re-resolution.
    pub fn back(&self) {
        self.history.go_back();
    }

    /// Detaches the pop listener. Also runs on drop.
    pub fn detach(&self) {
        self.history.detach();
    }

    fn apply(&self, intent: NavigationIntent) -> Result<bool, DispatchError> {
        match intent.mode {
            NavigationMode::Push => self.history.push(&intent.path),
            NavigationMode::Replace => self.history.replace(&intent.path),
        }
        self.dispatcher.resolve(&intent.path)
    }
}

impl Drop for Navigator {
    fn drop(&mut self) {
        self.history.detach();
    }
}
