/// Route pattern compilation
///
/// Takes the host router's regex for a template and rewrites it so that a
/// trailing `?...` querystring is captured as one extra group instead of
/// being swallowed by a named token or a splat.
use regex::Regex;

use super::host::{HostRouter, NAMED_SHAPE, SPLAT_SHAPE};
use super::token::{tokenize, RouteToken, TokenKind};
use crate::error::{RouteError, ShapeKind};

/// Named tokens stop at separators and at the querystring delimiter
pub const QS_NAMED_SHAPE: &str = "([^/?]*)";
/// Splats may span separators but stop at the querystring delimiter
pub const QS_SPLAT_SHAPE: &str = "([^?]*)";
/// Final group: optional `?` plus the rest of the input
pub const QUERYSTRING_GROUP: &str = r"(\?.*)?";

/// A route template compiled into a querystring-aware matcher
///
/// Created once per template and never mutated, so one instance can be
/// shared across any number of match attempts.
///
/// # Examples
///
/// ```
/// use rhtmx_qs_router::route::compile;
/// use rhtmx_qs_router::route::host::BaseRouter;
///
/// let compiled = compile(&BaseRouter, "page/:id").unwrap();
/// assert_eq!(compiled.as_regex().as_str(), r"^page/([^/?]*)(\?.*)?$");
/// assert!(compiled.is_match("page/9?show=true"));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    regex: Regex,
    tokens: Vec<RouteToken>,
}

impl CompiledPattern {
    /// The template this pattern was compiled from
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Tokens in declaration order
    pub fn tokens(&self) -> &[RouteToken] {
        &self.tokens
    }

    pub fn token_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|token| token.name.as_str())
    }

    pub fn named_count(&self) -> usize {
        self.count(TokenKind::Named)
    }

    pub fn splat_count(&self) -> usize {
        self.count(TokenKind::Splat)
    }

    /// Number of capture groups: one per token plus the querystring group
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    fn count(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|token| token.kind == kind).count()
    }
}

/// Compiles a template through `host`, adding the querystring group
///
/// Fails when the host output does not have the expected shapes; the
/// rewrite never guesses.
pub fn compile(host: &dyn HostRouter, template: &str) -> Result<CompiledPattern, RouteError> {
    let tokens = tokenize(template);
    let host_regex = host.route_to_regex(template)?;
    let source = host_regex.as_str();

    let body = source
        .strip_prefix('^')
        .and_then(|rest| rest.strip_suffix('$'))
        // an odd run of backslashes means the `$` was a literal
        .filter(|body| body.chars().rev().take_while(|&c| c == '\\').count() % 2 == 0)
        .ok_or_else(|| RouteError::Unanchored {
            template: template.to_string(),
            pattern: source.to_string(),
        })?;

    let expect_shape = |kind: ShapeKind, shape: &'static str, expected: usize| {
        let found = body.matches(shape).count();
        if found == expected {
            Ok(())
        } else {
            Err(RouteError::UnexpectedShape {
                template: template.to_string(),
                kind,
                shape,
                expected,
                found,
                pattern: source.to_string(),
            })
        }
    };
    let named = tokens.iter().filter(|t| t.kind == TokenKind::Named).count();
    expect_shape(ShapeKind::Named, NAMED_SHAPE, named)?;
    expect_shape(ShapeKind::Splat, SPLAT_SHAPE, tokens.len() - named)?;

    let rewritten = body
        .replace(NAMED_SHAPE, QS_NAMED_SHAPE)
        .replace(SPLAT_SHAPE, QS_SPLAT_SHAPE);
    let regex = Regex::new(&format!("^{rewritten}{QUERYSTRING_GROUP}$"))?;

    tracing::debug!(template, pattern = %regex, "compiled route pattern");

    Ok(CompiledPattern {
        template: template.to_string(),
        regex,
        tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::host::BaseRouter;

    /// Host that emits the older `([^\/]+)` spelling for named tokens
    struct EscapedSlashHost;

    impl HostRouter for EscapedSlashHost {
        fn route_to_regex(&self, template: &str) -> Result<Regex, regex::Error> {
            let source = BaseRouter.route_to_regex(template)?;
            Regex::new(&source.as_str().replace(NAMED_SHAPE, r"([^\/]+)"))
        }
    }

    /// Host that forgets the end anchor
    struct UnanchoredHost;

    impl HostRouter for UnanchoredHost {
        fn route_to_regex(&self, template: &str) -> Result<Regex, regex::Error> {
            let source = BaseRouter.route_to_regex(template)?;
            Regex::new(source.as_str().trim_end_matches('$'))
        }
    }

    /// Host that matches splats greedily
    struct GreedySplatHost;

    impl HostRouter for GreedySplatHost {
        fn route_to_regex(&self, template: &str) -> Result<Regex, regex::Error> {
            let source = BaseRouter.route_to_regex(template)?;
            Regex::new(&source.as_str().replace(SPLAT_SHAPE, "(.*)"))
        }
    }

    #[test]
    fn test_named_rewrite() {
        let compiled = compile(&BaseRouter, "page/:a/:b").unwrap();
        assert_eq!(
            compiled.as_regex().as_str(),
            r"^page/([^/?]*)/([^/?]*)(\?.*)?$"
        );
        assert_eq!(compiled.named_count(), 2);
        assert_eq!(compiled.capture_count(), 3);
    }

    #[test]
    fn test_splat_rewrite() {
        let compiled = compile(&BaseRouter, "files/*path").unwrap();
        assert_eq!(compiled.as_regex().as_str(), r"^files/([^?]*)(\?.*)?$");
        assert_eq!(compiled.splat_count(), 1);
    }

    #[test]
    fn test_zero_tokens_keeps_querystring_group() {
        let compiled = compile(&BaseRouter, "about").unwrap();
        assert_eq!(compiled.capture_count(), 1);
        assert!(compiled.is_match("about"));
        assert!(compiled.is_match("about?x=1"));
        assert!(!compiled.is_match("about/x"));
    }

    #[test]
    fn test_named_does_not_swallow_querystring() {
        let compiled = compile(&BaseRouter, "page/:id").unwrap();
        let caps = compiled.as_regex().captures("page/9?show=true").unwrap();
        assert_eq!(&caps[1], "9");
        assert_eq!(&caps[2], "?show=true");
    }

    #[test]
    fn test_splat_spans_separators_but_not_querystring() {
        let compiled = compile(&BaseRouter, "files/*path").unwrap();
        let caps = compiled.as_regex().captures("files/a/b/c.txt?v=2").unwrap();
        assert_eq!(&caps[1], "a/b/c.txt");
        assert_eq!(&caps[2], "?v=2");
    }

    #[test]
    fn test_token_names_in_order() {
        let compiled = compile(&BaseRouter, ":lang/docs/*rest").unwrap();
        assert_eq!(compiled.token_names().collect::<Vec<_>>(), vec!["lang", "rest"]);
        assert_eq!(compiled.template(), ":lang/docs/*rest");
    }

    #[test]
    fn test_unexpected_named_shape_fails() {
        let err = compile(&EscapedSlashHost, "page/:id").unwrap_err();
        assert!(matches!(
            err,
            RouteError::UnexpectedShape { kind: ShapeKind::Named, expected: 1, found: 0, .. }
        ));
        assert!(err.to_string().contains("([^/]+)"));
    }

    #[test]
    fn test_unexpected_splat_shape_fails() {
        let err = compile(&GreedySplatHost, "files/*path").unwrap_err();
        assert!(matches!(
            err,
            RouteError::UnexpectedShape { kind: ShapeKind::Splat, .. }
        ));
    }

    #[test]
    fn test_unexpected_shape_ignored_without_tokens() {
        assert!(compile(&EscapedSlashHost, "about").is_ok());
    }

    #[test]
    fn test_unanchored_host_fails() {
        let err = compile(&UnanchoredHost, "page/:id").unwrap_err();
        assert!(matches!(err, RouteError::Unanchored { .. }));
    }
}
