/// Token scanning for route templates
///
/// Pure functional parsing of `:name` and `*name` markers.
/// All functions are **pure**: same input → same output, no side effects.
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

/// `:name` or `*name`, where the name is one or more ASCII word characters
static ROUTE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[:*][A-Za-z0-9_]+").unwrap()
});

/// Kind of placeholder in a route template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `:name` - exactly one path segment
    Named,
    /// `*name` - any remainder of the path, across separators
    Splat,
}

/// A placeholder found in a route template
///
/// # Examples
///
/// ```
/// use rhtmx_qs_router::route::token::{tokenize, TokenKind};
///
/// let tokens = tokenize("docs/:section/*path");
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].name, "section");
/// assert_eq!(tokens[1].kind, TokenKind::Splat);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteToken {
    pub kind: TokenKind,
    /// Name without the `:` / `*` marker
    pub name: String,
    /// Byte range of the marker and name in the template
    pub span: Range<usize>,
}

/// Classifies a single marker like `:id` or `*path` (pure function)
///
/// Returns `None` for anything that is not a marker followed by a name.
pub fn classify_token(marker: &str) -> Option<(TokenKind, &str)> {
    let kind = match marker.chars().next()? {
        ':' => TokenKind::Named,
        '*' => TokenKind::Splat,
        _ => return None,
    };
    let name = &marker[1..];
    let is_word = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_word.then_some((kind, name))
}

/// Scans a template for tokens, in declaration order
pub fn tokenize(template: &str) -> Vec<RouteToken> {
    ROUTE_TOKEN
        .find_iter(template)
        .filter_map(|found| {
            classify_token(found.as_str()).map(|(kind, name)| RouteToken {
                kind,
                name: name.to_string(),
                span: found.range(),
            })
        })
        .collect()
}

/// Rewrites every token through `replace`, keeping literal text as-is
///
/// `replace` receives the token and its position among the tokens.
pub fn substitute<F>(template: &str, tokens: &[RouteToken], mut replace: F) -> String
where
    F: FnMut(usize, &RouteToken) -> String,
{
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for (index, token) in tokens.iter().enumerate() {
        out.push_str(&template[last..token.span.start]);
        out.push_str(&replace(index, token));
        last = token.span.end;
    }
    out.push_str(&template[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_named() {
        assert_eq!(classify_token(":id"), Some((TokenKind::Named, "id")));
    }

    #[test]
    fn test_classify_splat() {
        assert_eq!(classify_token("*path"), Some((TokenKind::Splat, "path")));
    }

    #[test]
    fn test_classify_static() {
        assert_eq!(classify_token("about"), None);
        assert_eq!(classify_token(":"), None);
        assert_eq!(classify_token("*a-b"), None);
    }

    #[test]
    fn test_tokenize_static_template() {
        assert!(tokenize("about/team").is_empty());
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("page/:a/:b");
        assert_eq!(tokens[0].span, 5..7);
        assert_eq!(tokens[1].span, 8..10);
    }

    #[test]
    fn test_tokenize_adjacent_prefix_names() {
        let names: Vec<_> = tokenize(":a/:ab").into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "ab"]);
    }

    #[test]
    fn test_tokenize_stops_at_non_word() {
        let tokens = tokenize("files/*path.json");
        assert_eq!(tokens[0].name, "path");
        assert_eq!(tokens[0].span, 6..11);
    }

    #[test]
    fn test_tokenize_stops_at_non_ascii() {
        let tokens = tokenize("page/:idé");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "id");
        assert_eq!(tokens[0].span, 5..8);
    }

    #[test]
    fn test_classify_rejects_non_ascii_name() {
        assert_eq!(classify_token(":idé"), None);
    }

    #[test]
    fn test_substitute_keeps_literals() {
        let template = "page/:a/x/:b";
        let tokens = tokenize(template);
        let out = substitute(template, &tokens, |index, _| index.to_string());
        assert_eq!(out, "page/0/x/1");
    }
}
