/* src/runtime/engine/rust/src/lib.rs */

pub mod definition;
pub mod edge;
pub mod errors;
pub mod manifest;
pub mod matchers;

// Public API re-exports
pub use definition::{EdgeFunctionDefinition, EdgeMatcher, MatcherSource};
pub use edge::{
  AppPathRoutesManifest, PageRegexMap, PatternSource, ResolvedPattern,
  ensure_optional_trailing_slash, get_edge_function_pattern_for_page,
  resolve_edge_function_pattern, route_for_page,
};
pub use errors::ResolveError;
pub use manifest::{
  EdgeFunctionRoute, EdgeFunctionsManifest, MiddlewareManifest, RoutesManifest,
  build_edge_functions_manifest, build_edge_functions_manifest_json, build_page_regex_map,
  middleware_patterns, sanitize_function_name,
};
pub use matchers::{has_lookahead, make_locale_optional, strip_lookahead};
