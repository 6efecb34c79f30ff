/// Parameter extraction
///
/// Turns the raw captures of a [`CompiledPattern`] into a [`ParameterList`],
/// decoding a trailing querystring capture into a [`QueryMap`].
use std::collections::HashMap;

use super::compiler::CompiledPattern;
use super::host::HostRouter;
use crate::diagnostics::Diagnostics;
use crate::querystring::{QueryMap, QuerystringCodec};

/// One extracted parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteParam {
    /// Raw text captured for a token
    Segment(String),
    /// Decoded trailing querystring
    Query(QueryMap),
}

impl RouteParam {
    pub fn as_segment(&self) -> Option<&str> {
        match self {
            RouteParam::Segment(value) => Some(value),
            RouteParam::Query(_) => None,
        }
    }

    pub fn as_query(&self) -> Option<&QueryMap> {
        match self {
            RouteParam::Query(params) => Some(params),
            RouteParam::Segment(_) => None,
        }
    }
}

impl From<&str> for RouteParam {
    fn from(value: &str) -> Self {
        RouteParam::Segment(value.to_string())
    }
}

impl From<QueryMap> for RouteParam {
    fn from(params: QueryMap) -> Self {
        RouteParam::Query(params)
    }
}

/// Ordered parameters extracted from one path
///
/// One [`RouteParam::Segment`] per template token, followed by a
/// [`RouteParam::Query`] only when the path carried a `?...` suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList(Vec<RouteParam>);

impl ParameterList {
    pub fn get(&self, index: usize) -> Option<&RouteParam> {
        self.0.get(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteParam> {
        self.0.iter()
    }

    /// Token captures, in template order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(RouteParam::as_segment)
    }

    /// The decoded querystring, if the path had one
    pub fn query(&self) -> Option<&QueryMap> {
        self.0.last().and_then(RouteParam::as_query)
    }

    /// Pairs token captures with the token names of `compiled`
    pub fn named(&self, compiled: &CompiledPattern) -> HashMap<String, String> {
        compiled
            .token_names()
            .zip(self.segments())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    pub fn into_vec(self) -> Vec<RouteParam> {
        self.0
    }
}

impl From<Vec<RouteParam>> for ParameterList {
    fn from(params: Vec<RouteParam>) -> Self {
        Self(params)
    }
}

impl IntoIterator for ParameterList {
    type Item = RouteParam;
    type IntoIter = std::vec::IntoIter<RouteParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Extracts parameters for `path`, or `None` when it does not match
///
/// The last raw capture is the querystring group added at compile time.
/// When it starts with `?` the remainder is decoded through `codec`
/// (failures go to `sink` and yield an empty map); when it did not
/// participate no slot is added.
pub fn extract(
    host: &dyn HostRouter,
    codec: &dyn QuerystringCodec,
    sink: Option<&dyn Diagnostics>,
    compiled: &CompiledPattern,
    path: &str,
) -> Option<ParameterList> {
    let mut raw = host.extract_parameters(compiled.as_regex(), path)?;

    let trailing = match raw.pop() {
        Some(Some(last)) => match last.strip_prefix('?') {
            Some(querystring) => Some(RouteParam::Query(codec.deserialize(querystring, sink))),
            None => Some(RouteParam::Segment(last)),
        },
        _ => None,
    };

    let params = raw
        .into_iter()
        .map(|capture| RouteParam::Segment(capture.unwrap_or_default()))
        .chain(trailing)
        .collect();

    Some(ParameterList(params))
}
