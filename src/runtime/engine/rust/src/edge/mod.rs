/* src/runtime/engine/rust/src/edge/mod.rs */

//! Pick the path pattern an edge function is routed by.
//!
//! Patterns from the page regex map (routes-manifest) are preferred: they
//! already allow a trailing slash and use positional groups only. A function's
//! own matcher is the fallback, and gets the trailing slash added here.


use std::collections::BTreeMap;

use serde::Serialize;

use crate::definition::{EdgeFunctionDefinition, MatcherSource};
use crate::errors::ResolveError;

/// Page identifier -> route regex, e.g. `/blog/[author]` -> `^/blog/([^/]+?)(?:/)?$`.
pub type PageRegexMap = BTreeMap<String, String>;

/// App-directory page key -> page identifier, e.g. `/blog/[author]/page` -> `/blog/[author]`.
pub type AppPathRoutesManifest = BTreeMap<String, String>;

const OPTIONAL_SLASH_GROUP: &str = "(?:/)?$";
const OPTIONAL_SLASH: &str = "/?$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternSource {
  /// Taken verbatim from the page regex map.
  PageRegexMap,
  /// First entry of the definition's `matchers`.
  Matcher,
  /// The v1 `regexp` field of the definition.
  LegacyRegexp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPattern {
  pub pattern: String,
  pub source: PatternSource,
  /// Page identifier after app-directory translation.
  pub route: String,
}

/// Translate an app-directory page key (`/x/page`) to its page identifier.
/// Keys the manifest does not know are already page identifiers.
pub fn route_for_page<'a>(
  app_path_routes_manifest: &'a AppPathRoutesManifest,
  page: &'a str,
) -> &'a str {
  app_path_routes_manifest.get(page).map_or(page, String::as_str)
}

/// Resolve the routing pattern for one edge function, keeping track of where it came from.
pub fn resolve_edge_function_pattern(
  page_regex_map: &PageRegexMap,
  app_path_routes_manifest: &AppPathRoutesManifest,
  definition: &EdgeFunctionDefinition,
) -> Result<ResolvedPattern, ResolveError> {
  let route = route_for_page(app_path_routes_manifest, &definition.page);

  let (base, source) = if let Some(regex) = page_regex_map.get(route) {
    (regex.as_str(), PatternSource::PageRegexMap)
  } else {
    match &definition.source {
      MatcherSource::Matchers(matchers) => match matchers.first() {
        Some(first) => (first.regexp.as_str(), PatternSource::Matcher),
        None => return Err(unresolved(definition, route)),
      },
      MatcherSource::LegacyRegexp(regexp) => (regexp.as_str(), PatternSource::LegacyRegexp),
      MatcherSource::FromPage => return Err(unresolved(definition, route)),
    }
  };

  Ok(ResolvedPattern {
    pattern: ensure_optional_trailing_slash(base),
    source,
    route: route.to_string(),
  })
}

/// Routing pattern for one edge function.
pub fn get_edge_function_pattern_for_page(
  page_regex_map: &PageRegexMap,
  app_path_routes_manifest: &AppPathRoutesManifest,
  definition: &EdgeFunctionDefinition,
) -> Result<String, ResolveError> {
  resolve_edge_function_pattern(page_regex_map, app_path_routes_manifest, definition)
    .map(|resolved| resolved.pattern)
}

/// Let an end-anchored pattern also accept a single trailing slash.
///
/// `^/api/og$` becomes `^/api/og/?$`. Patterns that already allow the slash,
/// end in `/$`, end in an escaped `\$` or have no end anchor are returned as-is.
pub fn ensure_optional_trailing_slash(pattern: &str) -> String {
  if pattern.ends_with(OPTIONAL_SLASH_GROUP) || pattern.ends_with(OPTIONAL_SLASH) {
    return pattern.to_string();
  }
  let Some(body) = pattern.strip_suffix('$') else {
    return pattern.to_string();
  };
  let escapes = body.bytes().rev().take_while(|&b| b == b'\\').count();
  if escapes % 2 == 1 || body.ends_with('/') {
    return pattern.to_string();
  }
  format!("{body}{OPTIONAL_SLASH}")
}

fn unresolved(definition: &EdgeFunctionDefinition, route: &str) -> ResolveError {
  ResolveError::UnresolvedRoute {
    name: definition.name.clone(),
    page: definition.page.clone(),
    route: route.to_string(),
  }
}
