//! Error types for the navigation engine.
//!
//! Two failure domains with different lifecycles:
//!
//! - [`PatternError`] - a route template that fails to compile, reported at
//!   registration time before the route is added
//! - [`DispatchError`] - a failure surfaced while resolving a path

use thiserror::Error;

/// Boxed error returned by route handlers.
///
/// The engine is single-threaded (browser event loop), so handler errors
/// are not required to be `Send + Sync`.
pub type HandlerError = Box<dyn std::error::Error>;

/// Errors raised while compiling a route template.
///
/// These are configuration errors: the registration call fails, the route is
/// not added, and the rest of the engine is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A segment consists of `:` with no name after it.
    #[error("empty parameter name in template '{template}'")]
    EmptyParamName {
        /// The offending template.
        template: String,
    },

    /// The same `:name` appears more than once in one template.
    #[error("duplicate parameter name '{name}' in template '{template}'")]
    DuplicateParam {
        /// The offending template.
        template: String,
        /// The repeated parameter name.
        name: String,
    },

    /// `*` used anywhere other than as the final character of the template.
    #[error("wildcard '*' must be the final character of template '{template}'")]
    WildcardNotTrailing {
        /// The offending template.
        template: String,
    },

    /// The generated regex failed to compile.
    #[error("failed to compile template '{template}': {message}")]
    Regex {
        /// The offending template.
        template: String,
        /// Error message from the regex engine.
        message: String,
    },
}

/// Errors surfaced by path resolution.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The matched route's handler failed.
    ///
    /// The resolved route was already committed as current before the
    /// handler ran, so routing state stays consistent; recovering the
    /// presentation is the handler's own responsibility.
    #[error("handler for '{path}' failed: {source}")]
    Handler {
        /// The path that was being resolved.
        path: String,
        /// The handler's error.
        source: HandlerError,
    },
}
