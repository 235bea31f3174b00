//! Route registry and path resolution.
//!
//! [`Dispatcher`] owns the ordered list of (pattern, handler) pairs, the
//! single current [`ResolvedRoute`], and the miss fallback. Routes are tried
//! in registration order and the first match wins - the dispatcher does not
//! infer specificity, so more specific templates must be registered before
//! more general or wildcard ones.
//!
//! Each field sits behind its own `RefCell` and no borrow is held across a
//! handler invocation, so a handler may itself trigger navigation
//! (single-threaded, run-to-completion; see the crate docs).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{DispatchError, HandlerError, PatternError};
use crate::history::HistoryStack;
use crate::pattern::RoutePattern;

/// Handler invoked when its route wins a resolution.
///
/// Receives the extracted parameters and the committed [`ResolvedRoute`].
pub type RouteHandler =
    Rc<dyn Fn(&HashMap<String, String>, &ResolvedRoute) -> Result<(), HandlerError>>;

/// Collaborator told about every successful resolution, so presentational
/// highlighting (sidebar, menu) can follow the current route.
///
/// The call is infallible by signature and must not panic; whatever fallible
/// work an implementation does, it keeps to itself.
pub trait NavigationObserver {
    /// Called with the resolved path after each successful resolution.
    fn update_active(&self, path: &str);
}

/// The outcome of a successful dispatch.
///
/// Exactly one is current at any time; it is replaced whole, never merged,
/// on every successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// The resolved path.
    pub path: String,
    /// Extracted path parameters, keyed by template parameter name.
    pub params: HashMap<String, String>,
    /// Remainder captured by a trailing wildcard, when the matched template
    /// had one.
    pub wildcard: Option<String>,
}

/// An immutable (pattern, handler) pairing, held for the session lifetime.
struct Route {
    pattern: RoutePattern,
    handler: RouteHandler,
}

/// Ordered route registry with first-match-wins resolution.
pub struct Dispatcher {
    /// Registered routes in insertion order. Ordering is load-bearing: it is
    /// the resolution tie-break.
    routes: RefCell<Vec<Route>>,
    current: RefCell<Option<ResolvedRoute>>,
    /// Most recent resolution miss, kept for not-found reporting.
    last_miss: RefCell<Option<String>>,
    fallback: String,
    observer: RefCell<Option<Rc<dyn NavigationObserver>>>,
    history: Rc<dyn HistoryStack>,
}

impl Dispatcher {
    /// Creates a dispatcher that redirects resolution misses to `fallback`.
    pub fn new(history: Rc<dyn HistoryStack>, fallback: impl Into<String>) -> Self {
        Self {
            routes: RefCell::new(Vec::new()),
            current: RefCell::new(None),
            last_miss: RefCell::new(None),
            fallback: fallback.into(),
            observer: RefCell::new(None),
            history,
        }
    }

    /// Sets the navigation observer notified after each resolution.
    pub fn set_observer(&self, observer: Rc<dyn NavigationObserver>) {
        *self.observer.borrow_mut() = Some(observer);
    }

    /// Compiles `template` and appends the route.
    ///
    /// # Errors
    ///
    /// A template that fails to compile is rejected with [`PatternError`]
    /// and the route is not added; previously registered routes are
    /// unaffected.
    pub fn register<F>(&self, template: &str, handler: F) -> Result<(), PatternError>
    where
        F: Fn(&HashMap<String, String>, &ResolvedRoute) -> Result<(), HandlerError> + 'static,
    {
        let pattern = RoutePattern::compile(template)?;
        self.routes.borrow_mut().push(Route {
            pattern,
            handler: Rc::new(handler),
        });
        Ok(())
    }

    /// Resolves `path` to the first matching route.
    ///
    /// On a match: the [`ResolvedRoute`] is committed as current, the
    /// handler runs exactly once, the observer is notified, and `Ok(true)`
    /// is returned. On a miss: the attempted path is recorded (see
    /// [`last_missed_path`](Self::last_missed_path)), one fallback
    /// navigation replaces the current history entry with the fallback path
    /// so the missed path does not survive in history, the fallback is
    /// resolved in its place, and `Ok(false)` is returned for the original
    /// attempt. A miss on the fallback path itself stops there rather than
    /// looping.
    ///
    /// # Errors
    ///
    /// A handler failure is propagated as [`DispatchError::Handler`]; the
    /// current route has already been committed by then.
    pub fn resolve(&self, path: &str) -> Result<bool, DispatchError> {
        let Some((handler, route)) = self.find_match(path) else {
            *self.last_miss.borrow_mut() = Some(path.to_string());
            if path == self.fallback {
                return Ok(false);
            }
            self.history.replace(&self.fallback);
            self.resolve(&self.fallback)?;
            return Ok(false);
        };

        // Commit before the handler runs; a handler failure leaves routing
        // state consistent.
        *self.current.borrow_mut() = Some(route.clone());

        let outcome = handler(&route.params, &route).map_err(|source| DispatchError::Handler {
            path: path.to_string(),
            source,
        });

        // Observer runs regardless of the handler outcome and cannot alter it.
        self.notify_observer(&route.path);

        outcome.map(|()| true)
    }

    /// Returns the current resolved route, if any resolution has succeeded.
    pub fn current_route(&self) -> Option<ResolvedRoute> {
        self.current.borrow().clone()
    }

    /// Path of the most recent resolution miss.
    ///
    /// Retained until the next miss, so a not-found handler on the fallback
    /// route can still report the attempted path.
    pub fn last_missed_path(&self) -> Option<String> {
        self.last_miss.borrow().clone()
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.borrow().len()
    }

    /// The configured fallback path.
    pub fn fallback_path(&self) -> &str {
        &self.fallback
    }

    /// Finds the first matching route, cloning what resolution needs so no
    /// registry borrow outlives this call.
    fn find_match(&self, path: &str) -> Option<(RouteHandler, ResolvedRoute)> {
        let routes = self.routes.borrow();
        routes.iter().find_map(|route| {
            route.pattern.matches(path).map(|m| {
                (
                    Rc::clone(&route.handler),
                    ResolvedRoute {
                        path: path.to_string(),
                        params: m.params,
                        wildcard: m.wildcard,
                    },
                )
            })
        })
    }

    fn notify_observer(&self, path: &str) {
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer.update_active(path);
        }
    }
}
