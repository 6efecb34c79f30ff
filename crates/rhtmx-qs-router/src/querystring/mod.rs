/// Querystring codecs
///
/// The rest of the crate only depends on the [`QuerystringCodec`] trait, so
/// a different wire format can be swapped in without touching route
/// compilation, extraction or fragment building.
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::error::QuerystringError;

pub mod bracket;
pub mod delimited;

pub use bracket::BracketCodec;
pub use delimited::DelimitedCodec;

/// Default join/split delimiter for multi-valued entries
pub const DEFAULT_ARRAY_DELIMITER: &str = "|";

/// A querystring value: one string, or an ordered list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// Returns the single value, or the first of a list
    pub fn first(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value),
            QueryValue::Multi(values) => values.first().map(String::as_str),
        }
    }

    /// Returns every value in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Joins the values with `separator`
    pub fn join(&self, separator: &str) -> String {
        match self {
            QueryValue::Single(value) => value.clone(),
            QueryValue::Multi(values) => values.join(separator),
        }
    }

    /// Appends a value, turning a single value into a list
    pub fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = QueryValue::Multi(vec![first, value]);
            }
            QueryValue::Multi(values) => values.push(value),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(","))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Single(value.clone())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(values: [&str; N]) -> Self {
        QueryValue::Multi(values.iter().map(|v| v.to_string()).collect())
    }
}

// Numbers and bools travel as their string form; matching never gives
// the original type back.
macro_rules! query_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Single(value.to_string())
                }
            }
        )*
    };
}

query_value_from_display!(bool, i32, i64, u16, u32, u64, usize, f32, f64);

/// Flat map of querystring keys to values
///
/// Keys are unique and iterate in sorted order, which keeps serialization
/// deterministic.
///
/// # Examples
///
/// ```
/// use rhtmx_qs_router::{QueryMap, QueryValue};
///
/// let mut params = QueryMap::from([("id", 9)]);
/// params.insert("show", true);
///
/// assert_eq!(params.get("id"), Some(&QueryValue::from("9")));
/// assert_eq!(params.get_str("show"), Some("true"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryMap(BTreeMap<String, QueryValue>);

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Option<QueryValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Adds a value under `key`, accumulating repeated keys into a list
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(QueryValue::Single(value));
            }
            btree_map::Entry::Occupied(mut slot) => slot.get_mut().push(value),
        }
    }

    /// Adds a value under `key`, always storing a list
    pub fn append_multi(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(QueryValue::Multi(vec![value]));
            }
            btree_map::Entry::Occupied(mut slot) => slot.get_mut().push(value),
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// Returns the first value stored under `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(QueryValue::first)
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryMap
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryMap
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for QueryMap {
    type Item = (String, QueryValue);
    type IntoIter = btree_map::IntoIter<String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryMap {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Serialize/deserialize pair defining the querystring wire format
pub trait QuerystringCodec: Send + Sync {
    /// Serializes a map into `key=value&key2=value2` form
    ///
    /// An empty map serializes to an empty string.
    fn serialize(&self, params: &QueryMap) -> String;

    /// Parses a querystring (without or with a leading `?`)
    fn parse(&self, querystring: &str) -> Result<QueryMap, QuerystringError>;

    /// Separator used when a list has to be written as a single value
    fn array_delimiter(&self) -> &str {
        DEFAULT_ARRAY_DELIMITER
    }

    /// Parses a querystring, never failing
    ///
    /// Malformed input is reported to `sink` exactly once and yields an
    /// empty map.
    fn deserialize(&self, querystring: &str, sink: Option<&dyn Diagnostics>) -> QueryMap {
        match self.parse(querystring) {
            Ok(params) => params,
            Err(error) => {
                if let Some(sink) = sink {
                    sink.querystring_rejected(querystring, &error);
                }
                QueryMap::new()
            }
        }
    }
}

/// Splits a querystring into raw `(key, value, offset)` triples
///
/// Empty pairs are skipped, a pair without `=` has an empty value, and the
/// offset is the byte position of the pair in `querystring`.
pub(crate) fn raw_pairs(querystring: &str) -> impl Iterator<Item = (&str, &str, usize)> {
    let start = usize::from(querystring.starts_with('?'));
    let body = &querystring[start..];

    body.split('&')
        .scan(start, |offset, pair| {
            let position = *offset;
            *offset += pair.len() + 1;
            Some((pair, position))
        })
        .filter(|(pair, _)| !pair.is_empty())
        .map(|(pair, position)| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key, value, position)
        })
}

/// Decodes one form-encoded component (`+` is a space)
///
/// Unlike a lenient decoder, a `%` without two hex digits after it is an
/// error. `offset` is added to reported positions.
pub(crate) fn decode_component(component: &str, offset: usize) -> Result<String, QuerystringError> {
    let bytes = component.as_bytes();
    let mut index = 0;
    while let Some(found) = bytes[index..].iter().position(|&b| b == b'%') {
        let at = index + found;
        let valid = bytes
            .get(at + 1..at + 3)
            .map(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            .unwrap_or(false);
        if !valid {
            return Err(QuerystringError::InvalidEscape { position: offset + at });
        }
        index = at + 3;
    }

    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| QuerystringError::InvalidUtf8)
}

/// Percent-encodes one key or value
pub(crate) fn encode_component(component: &str) -> String {
    urlencoding::encode(component).into_owned()
}
