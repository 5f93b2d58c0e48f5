/* src/cli/core/src/edge.rs */

use std::path::Path;

use anyhow::{Context, Result, bail};
use edge_router_engine::{
  AppPathRoutesManifest, EdgeFunctionsManifest, MiddlewareManifest, ResolvedPattern,
  RoutesManifest, build_edge_functions_manifest, build_page_regex_map, has_lookahead,
  resolve_edge_function_pattern,
};
use serde::de::DeserializeOwned;

use crate::config::RunSettings;
use crate::ui::{self, DIM, RESET};

const MIDDLEWARE_MANIFEST: &str = "server/middleware-manifest.json";
const ROUTES_MANIFEST: &str = "routes-manifest.json";
const APP_PATH_ROUTES_MANIFEST: &str = "app-path-routes-manifest.json";

/// Everything edge routing reads from a `.next` build directory.
pub(crate) struct BuildManifests {
  pub(crate) middleware: MiddlewareManifest,
  pub(crate) routes: RoutesManifest,
  pub(crate) app_path_routes: AppPathRoutesManifest,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Load the build manifests. The app-path routes manifest only exists for
/// builds with an app directory, so its absence is not an error.
pub(crate) fn load_build_manifests(next_dir: &Path) -> Result<BuildManifests> {
  if !next_dir.is_dir() {
    bail!("build directory {} does not exist (run the framework build first)", next_dir.display());
  }
  let middleware = read_json(&next_dir.join(MIDDLEWARE_MANIFEST))?;
  let routes = read_json(&next_dir.join(ROUTES_MANIFEST))?;

  let app_path = next_dir.join(APP_PATH_ROUTES_MANIFEST);
  let app_path_routes = if app_path.is_file() { read_json(&app_path)? } else { Default::default() };

  Ok(BuildManifests { middleware, routes, app_path_routes })
}

/// Warn about middleware matchers that lose their lookahead on the edge.
fn report_loosened_matchers(middleware: &MiddlewareManifest) {
  for definition in middleware.middleware.values() {
    for regexp in definition.source.regexps() {
      if has_lookahead(regexp) {
        ui::warn(&format!(
          "middleware \"{}\" matcher uses a lookahead; routing with a looser pattern, \
           the middleware re-checks the full matcher",
          definition.name
        ));
        ui::detail(&format!("{DIM}{regexp}{RESET}"));
      }
    }
  }
}

pub(crate) fn assemble(manifests: &BuildManifests) -> Result<EdgeFunctionsManifest> {
  build_edge_functions_manifest(
    &manifests.middleware,
    &manifests.routes,
    &manifests.app_path_routes,
  )
  .context("failed to assemble edge functions manifest")
}

/// `edge-router manifest`
pub(crate) fn run_manifest(settings: &RunSettings) -> Result<()> {
  ui::step(1, 3, &format!("reading manifests from {}", settings.next_dir.display()));
  let manifests = load_build_manifests(&settings.next_dir)?;
  if manifests.routes.i18n.is_some() {
    ui::detail("i18n enabled, locale segments made optional");
  }
  report_loosened_matchers(&manifests.middleware);

  ui::step(2, 3, "resolving edge function patterns");
  let manifest = assemble(&manifests)?;
  for route in &manifest.functions {
    ui::detail(&format!("{}  {DIM}{}{RESET}", route.function, route.pattern));
  }

  ui::step(3, 3, "writing edge functions manifest");
  write_manifest(&settings.out_file, &manifest)?;
  ui::ok(&format!("{}  ({} routes)", settings.out_file.display(), manifest.functions.len()));
  Ok(())
}

pub(crate) fn write_manifest(out_file: &Path, manifest: &EdgeFunctionsManifest) -> Result<()> {
  if let Some(dir) = out_file.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
  }
  let json = serde_json::to_string_pretty(manifest).context("failed to serialize manifest")?;
  std::fs::write(out_file, format!("{json}\n"))
    .with_context(|| format!("failed to write {}", out_file.display()))
}

/// Resolve the pattern of the edge function declared for `page`.
/// Both the function key and the definition's `page` are accepted.
pub(crate) fn resolve_page(manifests: &BuildManifests, page: &str) -> Result<ResolvedPattern> {
  let definition = manifests
    .middleware
    .functions
    .get(page)
    .or_else(|| manifests.middleware.functions.values().find(|d| d.page == page))
    .with_context(|| format!("no edge function is declared for page {page}"))?;
  let page_regex_map = build_page_regex_map(&manifests.routes);
  let resolved =
    resolve_edge_function_pattern(&page_regex_map, &manifests.app_path_routes, definition)?;
  Ok(resolved)
}

/// `edge-router pattern`
pub(crate) fn run_pattern(next_dir: &Path, page: &str) -> Result<()> {
  let manifests = load_build_manifests(next_dir)?;
  let resolved = resolve_page(&manifests, page)?;
  ui::arrow(&format!("{page}  {DIM}(route {}, from {:?}){RESET}", resolved.route, resolved.source));
  ui::ok(&resolved.pattern);
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use edge_router_engine::PatternSource;

  use super::*;

  fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }

  fn next_build(with_app_dir: bool) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
      dir.path(),
      MIDDLEWARE_MANIFEST,
      r#"{
        "version": 2,
        "sortedMiddleware": ["/"],
        "middleware": {
          "/": {
            "name": "middleware",
            "page": "/",
            "matchers": [{ "regexp": "^(?:\\/(_next\\/data\\/[^/]{1,}))?\\/shows(?:\\/((?!99|88).*))(.json)?[\\/#\\?]?$" }]
          }
        },
        "functions": {
          "/api/og": {
            "name": "pages/api/og",
            "page": "/api/og",
            "matchers": [{ "regexp": "^/api/og$" }]
          },
          "/app-edge/[id]/page": {
            "name": "app/app-edge/[id]/page",
            "page": "/app-edge/[id]/page",
            "matchers": [{ "regexp": "^/app\\-edge/(?<id>[^/]+?)$" }]
          }
        }
      }"#,
    );
    write(
      dir.path(),
      ROUTES_MANIFEST,
      r#"{
        "staticRoutes": [],
        "dynamicRoutes": [{ "page": "/app-edge/[id]", "regex": "^/app\\-edge/([^/]+?)(?:/)?$" }],
        "dataRoutes": []
      }"#,
    );
    if with_app_dir {
      write(dir.path(), APP_PATH_ROUTES_MANIFEST, r#"{ "/app-edge/[id]/page": "/app-edge/[id]" }"#);
    }
    dir
  }

  #[test]
  fn missing_build_dir_is_reported() {
    let err = load_build_manifests(Path::new("/nonexistent/.next")).err().unwrap();
    assert!(err.to_string().contains("does not exist"));
  }

  #[test]
  fn app_path_manifest_is_optional() {
    let dir = next_build(false);
    let manifests = load_build_manifests(dir.path()).unwrap();
    assert!(manifests.app_path_routes.is_empty());
    // Without translation the app page falls back to its own matcher
    let resolved = resolve_page(&manifests, "/app-edge/[id]/page").unwrap();
    assert_eq!(resolved.pattern, "^/app\\-edge/(?<id>[^/]+?)/?$");
    assert_eq!(resolved.source, PatternSource::Matcher);
  }

  #[test]
  fn resolve_page_through_app_manifest() {
    let dir = next_build(true);
    let manifests = load_build_manifests(dir.path()).unwrap();
    let resolved = resolve_page(&manifests, "/app-edge/[id]/page").unwrap();
    assert_eq!(resolved.pattern, "^/app\\-edge/([^/]+?)(?:/)?$");
    assert_eq!(resolved.source, PatternSource::PageRegexMap);
  }

  #[test]
  fn resolve_unknown_page_fails() {
    let dir = next_build(true);
    let manifests = load_build_manifests(dir.path()).unwrap();
    let err = resolve_page(&manifests, "/nope").unwrap_err();
    assert!(err.to_string().contains("no edge function is declared for page /nope"));
  }

  #[test]
  fn invalid_json_names_the_file() {
    let dir = next_build(true);
    write(dir.path(), ROUTES_MANIFEST, "{ not json");
    let err = load_build_manifests(dir.path()).err().unwrap();
    assert!(err.to_string().contains("routes-manifest.json"));
  }

  #[test]
  fn run_manifest_writes_output() {
    let dir = next_build(true);
    let out_file: PathBuf = dir.path().join("out/edge/manifest.json");
    let settings = RunSettings { next_dir: dir.path().to_path_buf(), out_file: out_file.clone() };
    run_manifest(&settings).unwrap();

    let written: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&out_file).unwrap()).unwrap();
    let functions = written["functions"].as_array().unwrap();
    assert_eq!(written["version"], 1);
    assert_eq!(functions.len(), 3);
    assert_eq!(functions[0]["function"], "next_middleware");
    assert!(!functions[0]["pattern"].as_str().unwrap().contains("(?!"));
    assert_eq!(functions[1]["pattern"], "^/api/og/?$");
    assert_eq!(functions[2]["cache"], "manual");
  }
}
