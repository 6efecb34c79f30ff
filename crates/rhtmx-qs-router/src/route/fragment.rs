/// Fragment building
///
/// Substitutes template tokens and appends leftover parameters as a
/// querystring.
use super::token::{substitute, tokenize, TokenKind};
use crate::querystring::{QueryMap, QueryValue, QuerystringCodec};

/// Arguments for building a fragment
///
/// # Examples
///
/// ```
/// use rhtmx_qs_router::{FragmentArgs, QueryMap};
///
/// // Named: tokens are looked up by name, the rest becomes the querystring
/// let named = FragmentArgs::named(QueryMap::from([("id", "9"), ("show", "true")]));
///
/// // Positional: tokens are filled left to right, the map is appended as-is
/// let positional = FragmentArgs::positional(["1", "2"]).with_query(QueryMap::from([("c", "d")]));
/// # let _ = (named, positional);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentArgs {
    /// Values for tokens in declaration order, plus an optional querystring map
    Positional {
        values: Vec<String>,
        query: Option<QueryMap>,
    },
    /// Token values by name; unconsumed entries become the querystring
    Named(QueryMap),
}

impl FragmentArgs {
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        FragmentArgs::Positional {
            values: values.into_iter().map(|v| v.to_string()).collect(),
            query: None,
        }
    }

    pub fn named(params: QueryMap) -> Self {
        FragmentArgs::Named(params)
    }

    /// Attaches a querystring map to positional arguments
    ///
    /// For named arguments the entries are merged into the map, where the
    /// ones not consumed by a token end up in the querystring anyway.
    pub fn with_query(self, extra: QueryMap) -> Self {
        match self {
            FragmentArgs::Positional { values, .. } => FragmentArgs::Positional {
                values,
                query: Some(extra),
            },
            FragmentArgs::Named(mut params) => {
                for (key, value) in extra {
                    params.insert(key, value);
                }
                FragmentArgs::Named(params)
            }
        }
    }
}

/// Builds a fragment from `template` and `args`
///
/// Missing values substitute an empty string. The caller's map is never
/// modified; named mode works on a copy.
pub fn to_fragment(codec: &dyn QuerystringCodec, template: &str, args: &FragmentArgs) -> String {
    let tokens = tokenize(template);

    let (mut fragment, leftover) = match args {
        FragmentArgs::Named(params) => {
            let mut remaining = params.clone();
            let path = substitute(template, &tokens, |_, token| {
                remaining
                    .remove(&token.name)
                    .map(|value| render_value(codec, token.kind, &value))
                    .unwrap_or_default()
            });
            (path, remaining)
        }
        FragmentArgs::Positional { values, query } => {
            let path = substitute(template, &tokens, |index, _| {
                values.get(index).cloned().unwrap_or_default()
            });
            (path, query.clone().unwrap_or_default())
        }
    };

    if !leftover.is_empty() {
        fragment.push(if fragment.contains('?') { '&' } else { '?' });
        fragment.push_str(&codec.serialize(&leftover));
    }

    tracing::trace!(template, %fragment, "built route fragment");
    fragment
}

/// Renders a token value; lists span segments for splats
fn render_value(codec: &dyn QuerystringCodec, kind: TokenKind, value: &QueryValue) -> String {
    match kind {
        TokenKind::Named => value.join(codec.array_delimiter()),
        TokenKind::Splat => value.join("/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::querystring::{BracketCodec, DelimitedCodec};

    fn build(template: &str, args: FragmentArgs) -> String {
        to_fragment(&DelimitedCodec::default(), template, &args)
    }

    #[test]
    fn test_positional_missing_argument() {
        assert_eq!(build("page/:a/:b", FragmentArgs::positional([1])), "page/1/");
    }

    #[test]
    fn test_positional_with_query() {
        let args = FragmentArgs::positional([1, 2]).with_query(QueryMap::from([("c", "d")]));
        assert_eq!(build("page/:a/:b", args), "page/1/2?c=d");
    }

    #[test]
    fn test_positional_ignores_surplus_values() {
        assert_eq!(build("page/:a", FragmentArgs::positional(["x", "y"])), "page/x");
    }

    #[test]
    fn test_positional_empty_query_appends_nothing() {
        let args = FragmentArgs::positional(["x"]).with_query(QueryMap::new());
        assert_eq!(build("page/:a", args), "page/x");
    }

    #[test]
    fn test_named_leftover_as_querystring() {
        let args = FragmentArgs::named(QueryMap::from([
            ("id", QueryValue::from(9)),
            ("show", QueryValue::from(true)),
        ]));
        assert_eq!(build("page/:id", args), "page/9?show=true");
    }

    #[test]
    fn test_named_missing_key_substitutes_empty() {
        let args = FragmentArgs::named(QueryMap::from([("a", "1")]));
        assert_eq!(build("page/:a/:b", args), "page/1/");
    }

    #[test]
    fn test_named_does_not_mutate_caller_map() {
        let params = QueryMap::from([("id", "9"), ("show", "true")]);
        let args = FragmentArgs::named(params.clone());
        build("page/:id", args.clone());
        assert_eq!(args, FragmentArgs::Named(params));
    }

    #[test]
    fn test_named_token_followed_by_non_ascii_literal() {
        let args = FragmentArgs::named(QueryMap::from([("id", QueryValue::from(9))]));
        assert_eq!(build("page/:idé", args), "page/9é");
    }

    #[test]
    fn test_named_list_values() {
        let args = FragmentArgs::named(QueryMap::from([
            ("path", QueryValue::from(["a", "b"])),
            ("ids", QueryValue::from(["1", "2"])),
        ]));
        assert_eq!(build("files/*path/:ids", args), "files/a/b/1|2");
    }

    #[test]
    fn test_existing_question_mark_uses_ampersand() {
        let args = FragmentArgs::named(QueryMap::from([("b", "2")]));
        assert_eq!(build("search?a=1", args), "search?a=1&b=2");
    }

    #[test]
    fn test_named_with_query_merges() {
        let args = FragmentArgs::named(QueryMap::from([("id", "9")]))
            .with_query(QueryMap::from([("tab", "x")]));
        assert_eq!(build("page/:id", args), "page/9?tab=x");
    }

    #[test]
    fn test_bracket_codec_leftover() {
        let args = FragmentArgs::named(QueryMap::from([
            ("id", QueryValue::from("3")),
            ("tags", QueryValue::from(["a", "b"])),
        ]));
        assert_eq!(
            to_fragment(&BracketCodec, "item/:id", &args),
            "item/3?tags%5B%5D=a&tags%5B%5D=b"
        );
    }
}
