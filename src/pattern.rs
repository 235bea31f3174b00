//! Route template compilation and path matching.
//!
//! Templates are `/`-delimited paths built from three segment kinds:
//!
//! - literal text, matched exactly
//! - `:name` - a named parameter capturing one non-empty, slash-free segment
//! - a trailing `*` - a wildcard capturing the rest of the path, including
//!   further `/`
//!
//! A compiled [`RoutePattern`] is an anchored whole-path matcher: the
//! candidate path must be consumed start to end, never as a substring.
//! Matching is positional (unnamed capture groups), with parameter names
//! recorded in template order.

use std::collections::HashMap;
use std::fmt;

use crate::error::PatternError;

/// A successful match of a concrete path against a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// Parameter name to captured value. The key set equals the set of
    /// `:name` segments declared by the template.
    pub params: HashMap<String, String>,
    /// Captured parameter values in template order.
    pub values: Vec<String>,
    /// Remainder captured by a trailing wildcard, when the template has one.
    pub wildcard: Option<String>,
}

/// A compiled route template.
///
/// Captured values are taken verbatim from the path; the pattern performs no
/// percent-decoding of its own.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    /// The original template string.
    template: String,
    /// Compiled anchored regex.
    regex: regex::Regex,
    /// Parameter names in template order.
    param_names: Vec<String>,
    /// Whether the template ends in a `*` wildcard.
    has_wildcard: bool,
}

impl RoutePattern {
    /// Compiles a template into a whole-path matcher.
    ///
    /// The empty template is normalized to `/`, so it matches only the root
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] when a parameter name is empty, a parameter
    /// name repeats within the template, or `*` appears anywhere other than
    /// as the final character.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let template = if template.is_empty() { "/" } else { template };

        let (body, has_wildcard) = match template.strip_suffix('*') {
            Some(body) => (body, true),
            None => (template, false),
        };
        if body.contains('*') {
            return Err(PatternError::WildcardNotTrailing {
                template: template.to_string(),
            });
        }

        let mut regex_str = String::from("^");
        let mut param_names: Vec<String> = Vec::new();

        for (i, segment) in body.split('/').enumerate() {
            if i > 0 {
                regex_str.push('/');
            }
            match segment.strip_prefix(':') {
                Some(name) => {
                    if name.is_empty() {
                        return Err(PatternError::EmptyParamName {
                            template: template.to_string(),
                        });
                    }
                    if param_names.iter().any(|n| n == name) {
                        return Err(PatternError::DuplicateParam {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                    param_names.push(name.to_string());
                    regex_str.push_str("([^/]+)");
                }
                None => regex_str.push_str(&regex::escape(segment)),
            }
        }
        if has_wildcard {
            regex_str.push_str("(.*)");
        }
        regex_str.push('$');

        let regex = regex::Regex::new(&regex_str).map_err(|e| PatternError::Regex {
            template: template.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
            has_wildcard,
        })
    }

    /// Tests `path` against this pattern, extracting captures on success.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        let caps = self.regex.captures(path)?;

        let mut params = HashMap::with_capacity(self.param_names.len());
        let mut values = Vec::with_capacity(self.param_names.len());
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.insert(name.clone(), m.as_str().to_string());
                values.push(m.as_str().to_string());
            }
        }

        let wildcard = if self.has_wildcard {
            caps.get(self.param_names.len() + 1)
                .map(|m| m.as_str().to_string())
        } else {
            None
        };

        Some(PathMatch {
            params,
            values,
            wildcard,
        })
    }

    /// Whether `path` would match, without extracting captures.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Substitutes parameter values back into the template to build a
    /// concrete path.
    ///
    /// Returns `None` when a declared parameter is missing from `params`.
    /// For a wildcard template only the fixed prefix is produced.
    pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
        let body = self
            .template
            .strip_suffix('*')
            .unwrap_or(&self.template);

        let mut out = String::new();
        for (i, segment) in body.split('/').enumerate() {
            if i > 0 {
                out.push('/');
            }
            match segment.strip_prefix(':') {
                Some(name) => out.push_str(params.get(name)?),
                None => out.push_str(segment),
            }
        }
        Some(out)
    }

    /// Returns the original template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the parameter names in template order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Whether this pattern captures nothing (literal segments only).
    pub fn is_exact(&self) -> bool {
        self.param_names.is_empty() && !self.has_wildcard
    }
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for RoutePattern {}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.template)
    }
}
