/* src/runtime/engine/wasm/src/lib.rs */

use edge_router_engine::{AppPathRoutesManifest, EdgeFunctionDefinition, PageRegexMap};
use wasm_bindgen::prelude::*;

fn error_json(message: &str) -> String {
  serde_json::json!({ "error": message }).to_string()
}

// --- Matcher rewrites ---

#[wasm_bindgen]
pub fn make_locale_optional(regex: &str) -> String {
  edge_router_engine::make_locale_optional(regex)
}

#[wasm_bindgen]
pub fn strip_lookahead(regex: &str) -> String {
  edge_router_engine::strip_lookahead(regex)
}

// --- Edge function patterns ---

/// Returns the pattern as a JSON string, or `{"error": "..."}`.
#[wasm_bindgen]
pub fn get_edge_function_pattern_for_page(
  page_regex_map_json: &str,
  app_path_routes_manifest_json: &str,
  definition_json: &str,
) -> String {
  let page_regex_map: PageRegexMap = match serde_json::from_str(page_regex_map_json) {
    Ok(map) => map,
    Err(e) => return error_json(&format!("page regex map: {e}")),
  };
  // Empty input means a build without an app directory
  let app_path_routes: AppPathRoutesManifest = if app_path_routes_manifest_json.trim().is_empty() {
    AppPathRoutesManifest::default()
  } else {
    match serde_json::from_str(app_path_routes_manifest_json) {
      Ok(manifest) => manifest,
      Err(e) => return error_json(&format!("app path routes manifest: {e}")),
    }
  };
  let definition: EdgeFunctionDefinition = match serde_json::from_str(definition_json) {
    Ok(def) => def,
    Err(e) => return error_json(&format!("edge function definition: {e}")),
  };
  match edge_router_engine::get_edge_function_pattern_for_page(
    &page_regex_map,
    &app_path_routes,
    &definition,
  ) {
    Ok(pattern) => serde_json::Value::String(pattern).to_string(),
    Err(e) => error_json(&e.to_string()),
  }
}

#[wasm_bindgen]
pub fn build_edge_functions_manifest(
  middleware_json: &str,
  routes_json: &str,
  app_path_routes_json: &str,
) -> String {
  match edge_router_engine::build_edge_functions_manifest_json(
    middleware_json,
    routes_json,
    app_path_routes_json,
  ) {
    Ok(manifest) => serde_json::to_string(&manifest).unwrap_or_else(|e| error_json(&e.to_string())),
    Err(e) => error_json(&e.to_string()),
  }
}
