/// Route module for querystring-aware templates
///
/// Contains pure functional components for compiling templates, matching
/// paths and building fragments:
/// - `token` - scanning `:name` / `*name` markers
/// - `host` - the host router contract and its reference implementation
/// - `compiler` - rewriting host regexes to capture a trailing querystring
/// - `extractor` - turning captures into a parameter list
/// - `fragment` - substituting tokens and appending leftover params

pub mod compiler;
pub mod extractor;
pub mod fragment;
pub mod host;
pub mod token;

// Re-export commonly used types
pub use compiler::{compile, CompiledPattern};
pub use extractor::{extract, ParameterList, RouteParam};
pub use fragment::{to_fragment, FragmentArgs};
pub use host::{BaseRouter, HostRouter};
pub use token::{classify_token, tokenize, RouteToken, TokenKind};
