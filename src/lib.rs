//! Client-side navigation engine.
//!
//! Resolves a browser location to a handler and a parameter set - it never
//! produces markup. Three pieces, wired bottom-up:
//!
//! - [`RoutePattern`] - compiles a declarative template (`/users/:id`,
//!   `/docs/*`) into an anchored whole-path matcher
//! - [`Dispatcher`] - ordered route registry with first-match-wins
//!   resolution and a replace-mode fallback on miss
//! - [`Navigator`] - keeps the current route, the address bar, and the host
//!   navigation stack consistent across programmatic navigation and
//!   user-driven back/forward traversal
//!
//! The browser's history is injected through the [`HistoryStack`]
//! capability: [`MemoryHistory`] backs tests and embedded sub-apps, while
//! `BrowserHistory` binds to `window.history` on wasm32 targets.
//!
//! Everything is single-threaded and run-to-completion: entry points resolve
//! synchronously and cannot interleave, and the only asynchronous boundary
//! is a user-driven back/forward event arriving later as a discrete event.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use webnav::{MemoryHistory, Navigator};
//!
//! let history = Rc::new(MemoryHistory::new("/"));
//! let nav = Navigator::new(Rc::clone(&history) as Rc<dyn webnav::HistoryStack>, "/");
//!
//! nav.register("/", |_, _| Ok(()))?;
//! nav.register("/lessons/:id", |params, _| {
//!     let _lesson = &params["id"];
//!     Ok(())
//! })?;
//!
//! nav.init()?;
//! nav.navigate("/lessons/3")?;
//! assert_eq!(nav.current_route().unwrap().path, "/lessons/3");
//!
//! history.back(); // user presses the back button
//! assert_eq!(nav.current_route().unwrap().path, "/");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dispatch;
pub mod error;
pub mod history;
pub mod pattern;
pub mod sync;

pub use dispatch::{Dispatcher, NavigationObserver, ResolvedRoute, RouteHandler};
pub use error::{DispatchError, HandlerError, PatternError};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use history::{
    HistoryMarker, HistoryStack, MemoryHistory, NavigationIntent, NavigationMode, PopEvent,
    PopListener,
};
pub use pattern::{PathMatch, RoutePattern};
pub use sync::Navigator;
