/// Host router primitives
///
/// The querystring layer sits on top of a host router that already knows
/// how to turn a template into a regex and how to pull captures out of a
/// matched path. [`HostRouter`] is that contract; [`BaseRouter`] is the
/// reference host.
use regex::Regex;

use super::token::{tokenize, TokenKind};

/// Sub-pattern the host emits for a `:name` token
pub const NAMED_SHAPE: &str = "([^/]+)";
/// Sub-pattern the host emits for a `*name` token
pub const SPLAT_SHAPE: &str = "(.*?)";

/// Template-to-regex and capture-extraction primitives of a host router
///
/// Implementors must emit exactly [`NAMED_SHAPE`] for every named token
/// and [`SPLAT_SHAPE`] for every splat, anchored with `^...$`. The
/// compiler checks this and refuses anything else.
pub trait HostRouter: Send + Sync {
    /// Converts a route template into the host's own matcher
    fn route_to_regex(&self, template: &str) -> Result<Regex, regex::Error>;

    /// Returns every capture group of `pattern` for `fragment`, in order
    ///
    /// `None` when the fragment does not match; groups that did not
    /// participate are `None` entries.
    fn extract_parameters(&self, pattern: &Regex, fragment: &str) -> Option<Vec<Option<String>>> {
        let captures = pattern.captures(fragment)?;
        Some(
            (1..captures.len())
                .map(|i| captures.get(i).map(|m| m.as_str().to_string()))
                .collect(),
        )
    }
}

/// Reference host router
///
/// Literal text is regex-escaped, named tokens match one non-empty
/// segment, splats match lazily across segments.
///
/// # Examples
///
/// ```
/// use rhtmx_qs_router::route::host::{BaseRouter, HostRouter};
///
/// let regex = BaseRouter.route_to_regex("page/:id").unwrap();
/// assert_eq!(regex.as_str(), "^page/([^/]+)$");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseRouter;

impl HostRouter for BaseRouter {
    fn route_to_regex(&self, template: &str) -> Result<Regex, regex::Error> {
        let tokens = tokenize(template);
        let mut source = String::from("^");
        let mut last = 0;
        for token in &tokens {
            source.push_str(&regex::escape(&template[last..token.span.start]));
            source.push_str(match token.kind {
                TokenKind::Named => NAMED_SHAPE,
                TokenKind::Splat => SPLAT_SHAPE,
            });
            last = token.span.end;
        }
        source.push_str(&regex::escape(&template[last..]));
        source.push('$');

        Regex::new(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_route_is_anchored() {
        let regex = BaseRouter.route_to_regex("about").unwrap();
        assert_eq!(regex.as_str(), "^about$");
    }

    #[test]
    fn test_literals_are_escaped() {
        let regex = BaseRouter.route_to_regex("v1.0/(x)?").unwrap();
        assert!(regex.is_match("v1.0/(x)?"));
        assert!(!regex.is_match("v1x0/(x)?"));
    }

    #[test]
    fn test_splat_shape() {
        let regex = BaseRouter.route_to_regex("files/*path").unwrap();
        assert_eq!(regex.as_str(), "^files/(.*?)$");
    }

    #[test]
    fn test_extract_parameters_in_order() {
        let regex = BaseRouter.route_to_regex("page/:a/:b").unwrap();
        assert_eq!(
            BaseRouter.extract_parameters(&regex, "page/1/2"),
            Some(vec![Some("1".to_string()), Some("2".to_string())])
        );
        assert_eq!(BaseRouter.extract_parameters(&regex, "other/1/2"), None);
    }
}
