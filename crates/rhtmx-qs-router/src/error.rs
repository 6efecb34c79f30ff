//! Error types for route compilation and querystring parsing

use std::fmt;

use thiserror::Error;

/// Which token family a host sub-pattern belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// `:name` tokens
    Named,
    /// `*name` tokens
    Splat,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Named => f.write_str("named"),
            ShapeKind::Splat => f.write_str("splat"),
        }
    }
}

/// Errors raised while compiling a route template
///
/// These indicate a programming error (the host compiler no longer emits
/// the sub-patterns the rewrite step relies on), never bad user input, so
/// they are always returned to the caller.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The host emitted a different number of a known sub-pattern than the
    /// template has tokens of that kind
    #[error(
        "host compiler produced an unexpected {kind} shape for `{template}`: \
         expected {expected} occurrence(s) of `{shape}`, found {found} in `{pattern}`"
    )]
    UnexpectedShape {
        template: String,
        kind: ShapeKind,
        shape: &'static str,
        expected: usize,
        found: usize,
        pattern: String,
    },

    /// The host pattern is not anchored with `^...$`
    #[error("host compiler pattern for `{template}` is not anchored: `{pattern}`")]
    Unanchored { template: String, pattern: String },

    /// The rewritten pattern failed to build
    #[error("invalid route pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// Errors raised while parsing a querystring
///
/// `QuerystringCodec::deserialize` recovers from all of these locally;
/// only `QuerystringCodec::parse` exposes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuerystringError {
    /// `%` not followed by two hex digits
    #[error("invalid percent escape at byte {position}")]
    InvalidEscape { position: usize },

    /// Percent-decoded bytes are not valid UTF-8
    #[error("decoded querystring is not valid UTF-8")]
    InvalidUtf8,

    /// A `key=value` pair with nothing before the `=`
    #[error("empty key in pair at byte {position}")]
    EmptyKey { position: usize },
}
