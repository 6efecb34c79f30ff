//! # RHTMX Querystring Router
//!
//! Querystring support for `:name` / `*splat` route templates:
//! - Compiled patterns capture an optional trailing `?...` querystring
//!   (`page/:id` matches `page/9?show=true`)
//! - Extracted parameters end with the decoded querystring map
//! - Fragments are built from positional or named values, with leftover
//!   named values serialized as the querystring
//! - Pluggable querystring codecs (`key=a|b` or `key[]=a&key[]=b`)
//!
//! ## Host Router Contract
//!
//! Compilation starts from a host router's own template regex and
//! rewrites its named (`([^/]+)`) and splat (`(.*?)`) sub-patterns. A host
//! that emits anything else is rejected with [`RouteError`] instead of
//! producing a subtly wrong matcher.
//!
//! ## Example
//!
//! ```
//! use rhtmx_qs_router::{QueryMap, QueryRoutes, QueryValue, RouteParam};
//!
//! let mut routes = QueryRoutes::new();
//!
//! let fragment = routes.to_fragment_named(
//!     "page/:id",
//!     &QueryMap::from([("id", QueryValue::from(9)), ("show", QueryValue::from(true))]),
//! );
//! assert_eq!(fragment, "page/9?show=true");
//!
//! let params = routes.match_fragment("page/:id", &fragment).unwrap().unwrap();
//! assert_eq!(params.get(0), Some(&RouteParam::from("9")));
//! assert_eq!(params.query().and_then(|q| q.get_str("show")), Some("true"));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
mod diagnostics;
mod error;
pub mod querystring;
pub mod route;

pub use config::{ArrayStyle, Config, QuerystringConfig};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use error::{QuerystringError, RouteError, ShapeKind};
pub use querystring::{BracketCodec, DelimitedCodec, QueryMap, QueryValue, QuerystringCodec};
pub use route::{
    BaseRouter, CompiledPattern, FragmentArgs, HostRouter, ParameterList, RouteParam, RouteToken,
    TokenKind,
};

// ============================================================================
// QueryRoutes
// ============================================================================

/// Querystring-aware routing on top of a host router
///
/// Owns the host primitives, the codec, the diagnostic sink for rejected
/// querystrings and a cache of compiled patterns keyed by template.
pub struct QueryRoutes {
    host: Box<dyn HostRouter>,
    codec: Box<dyn QuerystringCodec>,
    diagnostics: Option<Box<dyn Diagnostics>>,
    compiled: HashMap<String, CompiledPattern>,
}

impl QueryRoutes {
    /// Creates routes with the reference host, the delimited codec and
    /// `tracing` diagnostics
    pub fn new() -> Self {
        Self {
            host: Box::new(BaseRouter),
            codec: Box::new(DelimitedCodec::default()),
            diagnostics: Some(Box::new(TracingDiagnostics)),
            compiled: HashMap::new(),
        }
    }

    /// Creates routes configured from a [`QuerystringConfig`]
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_qs_router::{Config, QueryMap, QueryRoutes, QueryValue};
    ///
    /// let config = Config::from_toml_str("[querystring]\narray_style = \"bracket\"").unwrap();
    /// let routes = QueryRoutes::from_config(&config.querystring);
    ///
    /// let qs = routes.to_querystring(&QueryMap::from([("t", QueryValue::from(["a", "b"]))]));
    /// assert_eq!(qs, "t%5B%5D=a&t%5B%5D=b");
    /// ```
    pub fn from_config(config: &QuerystringConfig) -> Self {
        let routes = Self::new().with_boxed_codec(config.codec());
        if config.log_parse_errors {
            routes
        } else {
            routes.without_diagnostics()
        }
    }

    // ========================================================================
    // Functional Builder Methods
    // ========================================================================

    /// Replaces the host router (clears the compiled-pattern cache)
    pub fn with_host(mut self, host: impl HostRouter + 'static) -> Self {
        self.host = Box::new(host);
        self.compiled.clear();
        self
    }

    /// Replaces the querystring codec
    pub fn with_codec(self, codec: impl QuerystringCodec + 'static) -> Self {
        self.with_boxed_codec(Box::new(codec))
    }

    /// Replaces the querystring codec with an already boxed one
    pub fn with_boxed_codec(mut self, codec: Box<dyn QuerystringCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replaces the sink that receives rejected querystrings
    pub fn with_diagnostics(mut self, sink: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Some(Box::new(sink));
        self
    }

    /// Drops rejected querystrings silently
    pub fn without_diagnostics(mut self) -> Self {
        self.diagnostics = None;
        self
    }

    // ========================================================================
    // Compilation & Matching
    // ========================================================================

    /// Compiles a template without touching the cache
    pub fn compile(&self, template: &str) -> Result<CompiledPattern, RouteError> {
        route::compile(self.host.as_ref(), template)
    }

    /// Returns the compiled pattern for a template, compiling it once
    ///
    /// The cache keeps one entry per distinct template and never evicts.
    /// Templates built from user input grow it without bound; call
    /// [`clear_cache`](Self::clear_cache) or use [`compile`](Self::compile).
    pub fn compiled(&mut self, template: &str) -> Result<&CompiledPattern, RouteError> {
        let pattern: &CompiledPattern = match self.compiled.entry(template.to_string()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => slot.insert(route::compile(self.host.as_ref(), template)?),
        };
        Ok(pattern)
    }

    /// Extracts parameters for `path`, or `None` when it does not match
    pub fn extract(&self, compiled: &CompiledPattern, path: &str) -> Option<ParameterList> {
        route::extract(
            self.host.as_ref(),
            self.codec.as_ref(),
            self.diagnostics.as_deref(),
            compiled,
            path,
        )
    }

    /// Compiles `template` (cached) and extracts parameters for `path`
    pub fn match_fragment(
        &mut self,
        template: &str,
        path: &str,
    ) -> Result<Option<ParameterList>, RouteError> {
        self.compiled(template)?;
        Ok(self
            .compiled
            .get(template)
            .and_then(|compiled| self.extract(compiled, path)))
    }

    /// Number of cached compiled patterns
    pub fn cached_patterns(&self) -> usize {
        self.compiled.len()
    }

    pub fn clear_cache(&mut self) {
        self.compiled.clear();
    }

    // ========================================================================
    // Fragment Building
    // ========================================================================

    /// Builds a fragment from a template and tagged arguments
    pub fn to_fragment(&self, template: &str, args: &FragmentArgs) -> String {
        route::to_fragment(self.codec.as_ref(), template, args)
    }

    /// Builds a fragment by looking tokens up by name in `params`
    ///
    /// `params` is left untouched; unconsumed entries become the querystring.
    pub fn to_fragment_named(&self, template: &str, params: &QueryMap) -> String {
        self.to_fragment(template, &FragmentArgs::Named(params.clone()))
    }

    /// Builds a fragment from positional values plus an optional querystring
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_qs_router::{QueryMap, QueryRoutes};
    ///
    /// let routes = QueryRoutes::new();
    /// let qs = QueryMap::from([("c", "d")]);
    ///
    /// assert_eq!(routes.to_fragment_positional("page/:a/:b", &["1", "2"], Some(&qs)), "page/1/2?c=d");
    /// assert_eq!(routes.to_fragment_positional("page/:a/:b", &["1"], None), "page/1/");
    /// ```
    pub fn to_fragment_positional<S: ToString>(
        &self,
        template: &str,
        values: &[S],
        query: Option<&QueryMap>,
    ) -> String {
        let args = FragmentArgs::Positional {
            values: values.iter().map(ToString::to_string).collect(),
            query: query.cloned(),
        };
        self.to_fragment(template, &args)
    }

    // ========================================================================
    // Querystring Codec
    // ========================================================================

    /// Serializes a map with the configured codec
    pub fn to_querystring(&self, params: &QueryMap) -> String {
        self.codec.serialize(params)
    }

    /// Parses a querystring with the configured codec, never failing
    pub fn from_querystring(&self, querystring: &str) -> QueryMap {
        self.codec.deserialize(querystring, self.diagnostics.as_deref())
    }
}

impl Default for QueryRoutes {
    fn default() -> Self {
        Self::new()
    }
}
