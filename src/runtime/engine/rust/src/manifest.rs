/* src/runtime/engine/rust/src/manifest.rs */

//! Framework build manifests in, edge functions manifest out.
//! Pure functions over already-parsed data; loading files is the caller's job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definition::{EdgeFunctionDefinition, MatcherSource};
use crate::edge::{AppPathRoutesManifest, PageRegexMap, resolve_edge_function_pattern};
use crate::errors::ResolveError;
use crate::matchers::{make_locale_optional, strip_lookahead};

// --- Input manifests ---

/// `server/middleware-manifest.json`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiddlewareManifest {
  #[serde(default)]
  pub version: u32,
  #[serde(default)]
  pub sorted_middleware: Vec<String>,
  #[serde(default)]
  pub middleware: BTreeMap<String, EdgeFunctionDefinition>,
  #[serde(default)]
  pub functions: BTreeMap<String, EdgeFunctionDefinition>,
}

/// `routes-manifest.json`, reduced to what edge routing reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesManifest {
  #[serde(default)]
  pub static_routes: Vec<RouteRegex>,
  #[serde(default)]
  pub dynamic_routes: Vec<RouteRegex>,
  #[serde(default)]
  pub data_routes: Vec<DataRouteRegex>,
  #[serde(default)]
  pub i18n: Option<I18nRoutes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteRegex {
  pub page: String,
  pub regex: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRouteRegex {
  pub page: String,
  pub data_route_regex: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18nRoutes {
  #[serde(default)]
  pub locales: Vec<String>,
  #[serde(default)]
  pub default_locale: String,
}

// --- Output manifest ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeFunctionsManifest {
  pub version: u32,
  pub functions: Vec<EdgeFunctionRoute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeFunctionRoute {
  pub function: String,
  pub name: String,
  pub pattern: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cache: Option<String>,
}

/// Page identifier -> regex from the routes manifest.
/// Dynamic routes first, then static ones; a later entry for the same page wins.
pub fn build_page_regex_map(routes: &RoutesManifest) -> PageRegexMap {
  routes
    .dynamic_routes
    .iter()
    .chain(routes.static_routes.iter())
    .map(|route| (route.page.clone(), route.regex.clone()))
    .collect()
}

/// Deployable function name for a definition: `pages/api/og` -> `next_pages_api_og`.
pub fn sanitize_function_name(name: &str) -> String {
  let body: String =
    name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect();
  format!("next_{body}")
}

/// Route patterns for a middleware definition, one per matcher.
///
/// With i18n enabled the locale segment is made optional. Lookaheads are always
/// stripped since the edge runtime cannot evaluate them; the middleware itself
/// re-checks the full matcher.
pub fn middleware_patterns(definition: &EdgeFunctionDefinition, i18n: bool) -> Vec<String> {
  let localize = i18n && !matches!(definition.source, MatcherSource::LegacyRegexp(_));
  definition
    .source
    .regexps()
    .into_iter()
    .map(|regexp| {
      if localize {
        strip_lookahead(&make_locale_optional(regexp))
      } else {
        strip_lookahead(regexp)
      }
    })
    .collect()
}

/// Assemble the edge functions manifest from the framework's build manifests.
///
/// Middleware entries come first, in `sortedMiddleware` order, then every edge
/// function (edge SSR pages and API routes) in name order. A function whose page
/// cannot be resolved fails the whole assembly.
pub fn build_edge_functions_manifest(
  middleware: &MiddlewareManifest,
  routes: &RoutesManifest,
  app_path_routes_manifest: &AppPathRoutesManifest,
) -> Result<EdgeFunctionsManifest, ResolveError> {
  let mut functions = Vec::new();
  let i18n = routes.i18n.is_some();

  for key in &middleware.sorted_middleware {
    let Some(definition) = middleware.middleware.get(key) else {
      continue;
    };
    let function = sanitize_function_name(&definition.name);
    for pattern in middleware_patterns(definition, i18n) {
      functions.push(EdgeFunctionRoute {
        function: function.clone(),
        name: definition.name.clone(),
        pattern,
        cache: None,
      });
    }
  }

  let page_regex_map = build_page_regex_map(routes);
  for definition in middleware.functions.values() {
    let function = sanitize_function_name(&definition.name);
    let resolved =
      resolve_edge_function_pattern(&page_regex_map, app_path_routes_manifest, definition)?;
    let app_dir = app_path_routes_manifest.contains_key(&definition.page);
    functions.push(EdgeFunctionRoute {
      function: function.clone(),
      name: definition.name.clone(),
      pattern: resolved.pattern,
      cache: app_dir.then(|| "manual".to_string()),
    });

    // pages-dir routes also answer on their `/_next/data/...json` route
    if let Some(data) = routes.data_routes.iter().find(|r| r.page == definition.page) {
      functions.push(EdgeFunctionRoute {
        function,
        name: definition.name.clone(),
        pattern: data.data_route_regex.clone(),
        cache: None,
      });
    }
  }

  Ok(EdgeFunctionsManifest { version: 1, functions })
}

/// Parse the three manifests from JSON text and assemble the edge functions manifest.
/// An empty `app_path_routes_json` stands for a build without an app directory.
pub fn build_edge_functions_manifest_json(
  middleware_json: &str,
  routes_json: &str,
  app_path_routes_json: &str,
) -> Result<EdgeFunctionsManifest, ResolveError> {
  let middleware: MiddlewareManifest = serde_json::from_str(middleware_json)
    .map_err(|e| ResolveError::InvalidManifest(format!("middleware manifest: {e}")))?;
  let routes: RoutesManifest = serde_json::from_str(routes_json)
    .map_err(|e| ResolveError::InvalidManifest(format!("routes manifest: {e}")))?;
  let app_path_routes: AppPathRoutesManifest = if app_path_routes_json.trim().is_empty() {
    AppPathRoutesManifest::new()
  } else {
    serde_json::from_str(app_path_routes_json)
      .map_err(|e| ResolveError::InvalidManifest(format!("app path routes manifest: {e}")))?
  };
  build_edge_functions_manifest(&middleware, &routes, &app_path_routes)
}
