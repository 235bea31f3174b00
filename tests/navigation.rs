//! End-to-end navigation tests against an in-memory history stack.
//!
//! Exercises the engine the way the browser would: programmatic pushes and
//! replaces interleaved with simulated user back/forward traversal.

use std::cell::RefCell;
use std::rc::Rc;

use webnav::{HistoryStack, MemoryHistory, NavigationObserver, Navigator, ResolvedRoute};

/// Engine over a fresh stack, with handlers that log every invocation.
fn engine(initial: &str) -> (Rc<MemoryHistory>, Navigator, Rc<RefCell<Vec<String>>>) {
    let history = Rc::new(MemoryHistory::new(initial));
    let hits: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let nav = Navigator::new(Rc::clone(&history) as Rc<dyn HistoryStack>, "/");

    let log = Rc::clone(&hits);
    nav.register("/", move |_, _| {
        log.borrow_mut().push("home".to_string());
        Ok(())
    })
    .unwrap();

    let log = Rc::clone(&hits);
    nav.register("/item/:id", move |params, _| {
        log.borrow_mut().push(format!("item:{}", params["id"]));
        Ok(())
    })
    .unwrap();

    let log = Rc::clone(&hits);
    nav.register("/item/new", move |_, _| {
        log.borrow_mut().push("new-item".to_string());
        Ok(())
    })
    .unwrap();

    let log = Rc::clone(&hits);
    nav.register("/docs/*", move |_, route| {
        log.borrow_mut()
            .push(format!("docs:{}", route.wildcard.clone().unwrap_or_default()));
        Ok(())
    })
    .unwrap();

    (history, nav, hits)
}

#[test]
fn back_event_re_resolves_without_mutating_the_stack() {
    let (history, nav, hits) = engine("/");
    nav.init().unwrap();

    nav.navigate("/item/1").unwrap();
    nav.navigate("/item/2").unwrap();
    assert_eq!(history.len(), 3);

    history.back();

    // The back event re-resolved /item/1 exactly once, observing the stack
    // rather than pushing or replacing.
    assert_eq!(nav.current_route().unwrap().path, "/item/1");
    assert_eq!(history.len(), 3);
    assert_eq!(history.location_path(), "/item/1");
    assert_eq!(
        *hits.borrow(),
        vec!["home", "item:1", "item:2", "item:1"]
    );

    history.forward();
    assert_eq!(nav.current_route().unwrap().path, "/item/2");
}

#[test]
fn registration_order_beats_specificity() {
    let (_, nav, hits) = engine("/");
    nav.init().unwrap();

    nav.navigate("/item/new").unwrap();

    // "/item/:id" was registered before "/item/new", so the parameter route
    // wins with {id: "new"}; callers wanting the literal first must register
    // it first.
    assert_eq!(*hits.borrow(), vec!["home", "item:new"]);
}

#[test]
fn miss_falls_back_with_replace_semantics() {
    let (history, nav, _) = engine("/");
    nav.init().unwrap();
    nav.navigate("/item/7").unwrap();

    assert!(!nav.navigate("/missing/page").unwrap());

    // The missed path was pushed, then replaced by the fallback: it must not
    // survive anywhere in history.
    assert_eq!(history.paths(), vec!["/", "/item/7", "/"]);
    assert_eq!(nav.current_route().unwrap().path, "/");
    assert_eq!(nav.last_missed_path(), Some("/missing/page".to_string()));
}

#[test]
fn repeated_navigation_is_idempotent() {
    let (_, nav, hits) = engine("/");
    nav.init().unwrap();

    nav.navigate("/item/7").unwrap();
    let first = nav.current_route().unwrap();
    nav.navigate("/item/7").unwrap();
    let second = nav.current_route().unwrap();

    assert_eq!(first, second);
    assert_eq!(*hits.borrow(), vec!["home", "item:7", "item:7"]);
}

#[test]
fn markerless_entry_falls_back_to_visible_location() {
    let (history, nav, _) = engine("/");
    nav.init().unwrap();
    nav.navigate("/item/1").unwrap();

    // A direct page load lands an entry that carries no engine marker.
    history.visit("/item/2");
    history.back();
    history.forward();

    // The pop onto the marker-less entry resolved the visible location.
    assert_eq!(nav.current_route().unwrap().path, "/item/2");
}

#[test]
fn wildcard_routes_capture_the_remainder() {
    let (_, nav, hits) = engine("/");
    nav.init().unwrap();

    nav.navigate("/docs/guide/ch1/intro").unwrap();

    assert_eq!(*hits.borrow(), vec!["home", "docs:guide/ch1/intro"]);
    assert_eq!(
        nav.current_route().unwrap().wildcard,
        Some("guide/ch1/intro".to_string())
    );
}

#[test]
fn pop_listener_survives_a_failing_handler() {
    let history = Rc::new(MemoryHistory::new("/"));
    let nav = Navigator::new(Rc::clone(&history) as Rc<dyn HistoryStack>, "/");
    nav.register("/", |_, _| Ok(())).unwrap();
    nav.register("/ok", |_, _| Ok(())).unwrap();
    nav.register("/boom", |_, _| Err("handler failed".into()))
        .unwrap();
    nav.init().unwrap();

    nav.navigate("/ok").unwrap();
    // The failure is surfaced to the caller of navigate...
    let err = nav.navigate("/boom").unwrap_err();
    assert!(err.to_string().contains("handler failed"));
    // ...but the route was committed before the handler ran.
    assert_eq!(nav.current_route().unwrap().path, "/boom");

    // A pop event hitting the failing handler is contained to that event.
    history.back();
    assert_eq!(nav.current_route().unwrap().path, "/ok");
    history.forward();
    assert_eq!(nav.current_route().unwrap().path, "/boom");

    // The listener is still attached and later events still resolve.
    history.back();
    assert_eq!(nav.current_route().unwrap().path, "/ok");
}

#[test]
fn observer_is_notified_for_every_successful_resolution() {
    struct Sidebar(RefCell<Vec<String>>);
    impl NavigationObserver for Sidebar {
        fn update_active(&self, path: &str) {
            self.0.borrow_mut().push(path.to_string());
        }
    }

    let (history, nav, _) = engine("/");
    let sidebar = Rc::new(Sidebar(RefCell::new(Vec::new())));
    let nav = nav.with_observer(Rc::clone(&sidebar) as Rc<dyn NavigationObserver>);

    nav.init().unwrap();
    nav.navigate("/item/4").unwrap();
    nav.navigate("/missing").unwrap();
    history.back();

    assert_eq!(
        *sidebar.0.borrow(),
        vec!["/", "/item/4", "/", "/item/4"]
    );
}

#[test]
fn engine_back_delegates_to_the_host_stack() {
    let (history, nav, _) = engine("/");
    nav.init().unwrap();
    nav.navigate("/item/1").unwrap();
    nav.navigate("/item/2").unwrap();

    nav.back();

    assert_eq!(history.location_path(), "/item/1");
    assert_eq!(nav.current_route().unwrap().path, "/item/1");
}

#[test]
fn resolved_route_params_reach_handlers_and_queries() {
    let (_, nav, _) = engine("/");
    nav.init().unwrap();
    nav.navigate("/item/42").unwrap();

    let route = nav.current_route().unwrap();
    assert_eq!(route.path, "/item/42");
    assert_eq!(route.params.get("id"), Some(&"42".to_string()));
    assert_eq!(route.wildcard, None);
    assert_eq!(
        route,
        ResolvedRoute {
            path: "/item/42".to_string(),
            params: route.params.clone(),
            wildcard: None,
        }
    );
}
