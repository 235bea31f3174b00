//! Host navigation-stack abstraction and implementations.
//!
//! The engine never talks to `window.history` directly; it goes through the
//! [`HistoryStack`] capability so the dispatcher/synchronizer pair can be
//! exercised against an in-memory stack. Two implementations:
//!
//! - [`MemoryHistory`] - in-memory stack for tests and embedded sub-apps
//! - [`BrowserHistory`] - `web_sys` binding to the real browser stack
//!   (wasm32 targets only)
//!
//! Every entry the engine creates carries a [`HistoryMarker`] so that a
//! back/forward transition can re-derive the intended path even when the
//! visible URL has been rewritten since.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

/// Whether a navigation creates a new history entry or overwrites the
/// current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Append a new entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// A requested navigation: a path plus push/replace semantics.
///
/// Ephemeral - built by the synchronizer and consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    /// The requested path.
    pub path: String,
    /// Whether to push a new entry or replace the current one.
    pub mode: NavigationMode,
}

impl NavigationIntent {
    /// Creates an intent for `path` with the given mode.
    pub fn new(path: impl Into<String>, mode: NavigationMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}

/// Marker attached to every history entry the engine creates.
///
/// Serialized into the entry's state so a later back/forward transition can
/// recover the path that was resolved when the entry was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMarker {
    /// The path this entry was created for.
    pub path: String,
}

/// A user-driven back/forward transition, as observed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopEvent {
    /// Marker path of the entry landed on; `None` when the entry was not
    /// created by this engine (e.g. a direct page load).
    pub marker: Option<String>,
    /// Path visible in the address bar after the transition.
    pub location: String,
}

/// Callback invoked once per user-driven back/forward transition.
pub type PopListener = Box<dyn Fn(PopEvent)>;

/// Host capability for the browser's navigation stack.
///
/// The stack itself is owned by the host: an append-only ledger with random
/// access via back/forward. The engine's only obligations are to attach a
/// marker to each entry it creates and to observe transitions.
pub trait HistoryStack {
    /// Appends a new entry carrying `path` and makes it current.
    fn push(&self, path: &str);

    /// Overwrites the current entry with `path`.
    fn replace(&self, path: &str);

    /// Returns the path currently visible in the address bar.
    fn location_path(&self) -> String;

    /// Subscribes to back/forward transitions. One listener at a time; a
    /// second call replaces the first.
    fn subscribe(&self, listener: PopListener);

    /// Removes the subscribed listener, if any.
    fn detach(&self);

    /// Asks the host to go back one entry. The resulting transition is
    /// delivered through the subscribed listener (synchronously for
    /// [`MemoryHistory`], asynchronously in the browser).
    fn go_back(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    path: String,
    marker: Option<String>,
}

/// In-memory navigation stack.
///
/// Mirrors the browser semantics: `push` truncates any forward tail before
/// appending, `replace` rewrites the current entry in place, and
/// [`back`](MemoryHistory::back) / [`forward`](MemoryHistory::forward)
/// simulate user traversal by moving the cursor and firing the subscribed
/// listener with the landed entry's marker.
pub struct MemoryHistory {
    entries: RefCell<Vec<Entry>>,
    cursor: Cell<usize>,
    listener: RefCell<Option<PopListener>>,
}

impl MemoryHistory {
    /// Creates a stack with a single current entry for `initial_path`.
    ///
    /// The initial entry carries no marker, like a page loaded directly
    /// without going through the engine.
    pub fn new(initial_path: &str) -> Self {
        Self {
            entries: RefCell::new(vec![Entry {
                path: initial_path.to_string(),
                marker: None,
            }]),
            cursor: Cell::new(0),
            listener: RefCell::new(None),
        }
    }

    /// Simulates a direct page load: a new current entry with no marker.
    pub fn visit(&self, path: &str) {
        self.append(Entry {
            path: path.to_string(),
            marker: None,
        });
    }

    /// Moves one entry back, firing the listener. Returns `false` at the
    /// oldest entry.
    pub fn back(&self) -> bool {
        if self.cursor.get() == 0 {
            return false;
        }
        self.cursor.set(self.cursor.get() - 1);
        self.fire();
        true
    }

    /// Moves one entry forward, firing the listener. Returns `false` at the
    /// newest entry.
    pub fn forward(&self) -> bool {
        if self.cursor.get() + 1 >= self.entries.borrow().len() {
            return false;
        }
        self.cursor.set(self.cursor.get() + 1);
        self.fire();
        true
    }

    /// Number of entries in the stack.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the stack is empty (never true after construction).
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Entry paths, oldest first.
    pub fn paths(&self) -> Vec<String> {
        self.entries.borrow().iter().map(|e| e.path.clone()).collect()
    }

    fn append(&self, entry: Entry) {
        let mut entries = self.entries.borrow_mut();
        entries.truncate(self.cursor.get() + 1);
        entries.push(entry);
        self.cursor.set(entries.len() - 1);
    }

    fn fire(&self) {
        let event = {
            let entries = self.entries.borrow();
            let entry = &entries[self.cursor.get()];
            PopEvent {
                marker: entry.marker.clone(),
                location: entry.path.clone(),
            }
        };
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(event);
        }
    }
}

impl HistoryStack for MemoryHistory {
    fn push(&self, path: &str) {
        self.append(Entry {
            path: path.to_string(),
            marker: Some(path.to_string()),
        });
    }

    fn replace(&self, path: &str) {
        let mut entries = self.entries.borrow_mut();
        entries[self.cursor.get()] = Entry {
            path: path.to_string(),
            marker: Some(path.to_string()),
        };
    }

    fn location_path(&self) -> String {
        self.entries.borrow()[self.cursor.get()].path.clone()
    }

    fn subscribe(&self, listener: PopListener) {
        *self.listener.borrow_mut() = Some(listener);
    }

    fn detach(&self) {
        self.listener.borrow_mut().take();
    }

    fn go_back(&self) {
        self.back();
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    use super::{HistoryMarker, HistoryStack, PopEvent, PopListener};

    /// Binding to the real browser navigation stack.
    ///
    /// The marker is stored as the entry's serialized state, the same state
    /// object `popstate` hands back on traversal. The popstate closure is
    /// held (not leaked) so [`detach`](HistoryStack::detach) can remove the
    /// listener at teardown.
    pub struct BrowserHistory {
        closure: RefCell<Option<Closure<dyn Fn(web_sys::PopStateEvent)>>>,
    }

    impl BrowserHistory {
        /// Creates an unsubscribed binding.
        pub fn new() -> Self {
            Self {
                closure: RefCell::new(None),
            }
        }

        fn with_history(f: impl FnOnce(&web_sys::History)) {
            if let Some(window) = web_sys::window()
                && let Ok(history) = window.history()
            {
                f(&history);
            }
        }

        fn marker_state(path: &str) -> wasm_bindgen::JsValue {
            let marker = HistoryMarker {
                path: path.to_string(),
            };
            match serde_json::to_string(&marker) {
                Ok(json) => wasm_bindgen::JsValue::from_str(&json),
                Err(_) => wasm_bindgen::JsValue::NULL,
            }
        }

        fn current_pathname() -> String {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_string())
        }
    }

    impl Default for BrowserHistory {
        fn default() -> Self {
            Self::new()
        }
    }

    impl HistoryStack for BrowserHistory {
        fn push(&self, path: &str) {
            Self::with_history(|history| {
                let _ = history.push_state_with_url(&Self::marker_state(path), "", Some(path));
            });
        }

        fn replace(&self, path: &str) {
            Self::with_history(|history| {
                let _ = history.replace_state_with_url(&Self::marker_state(path), "", Some(path));
            });
        }

        fn location_path(&self) -> String {
            Self::current_pathname()
        }

        fn subscribe(&self, listener: PopListener) {
            self.detach();
            let closure = Closure::wrap(Box::new(move |event: web_sys::PopStateEvent| {
                let marker = event
                    .state()
                    .as_string()
                    .and_then(|json| serde_json::from_str::<HistoryMarker>(&json).ok())
                    .map(|m| m.path);
                listener(PopEvent {
                    marker,
                    location: Self::current_pathname(),
                });
            }) as Box<dyn Fn(web_sys::PopStateEvent)>);

            if let Some(window) = web_sys::window() {
                let _ = window.add_event_listener_with_callback(
                    "popstate",
                    closure.as_ref().unchecked_ref(),
                );
            }
            *self.closure.borrow_mut() = Some(closure);
        }

        fn detach(&self) {
            if let Some(closure) = self.closure.borrow_mut().take()
                && let Some(window) = web_sys::window()
            {
                let _ = window.remove_event_listener_with_callback(
                    "popstate",
                    closure.as_ref().unchecked_ref(),
                );
            }
        }

        fn go_back(&self) {
            Self::with_history(|history| {
                let _ = history.back();
            });
        }
    }
}
