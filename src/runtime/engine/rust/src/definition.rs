/* src/runtime/engine/rust/src/definition.rs */

//! Edge function definitions as found in `middleware-manifest.json`.
//! The manifest has carried matcher information in several shapes over time;
//! they are folded into [`MatcherSource`] at deserialization time.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMatcher {
  pub regexp: String,
  #[serde(default)]
  pub original_source: Option<String>,
  #[serde(default)]
  pub locale: Option<bool>,
}

impl EdgeMatcher {
  pub fn new(regexp: impl Into<String>) -> Self {
    Self { regexp: regexp.into(), original_source: None, locale: None }
  }
}

/// Where a definition's path pattern comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherSource {
  /// Current shape. Never empty; the first matcher is authoritative.
  Matchers(Vec<EdgeMatcher>),
  /// v1 manifests: a single `regexp` on the definition itself.
  LegacyRegexp(String),
  /// No matcher data; the pattern has to come from the page regex map.
  FromPage,
}

impl MatcherSource {
  /// Every regexp the definition declares, in manifest order.
  pub fn regexps(&self) -> Vec<&str> {
    match self {
      Self::Matchers(matchers) => matchers.iter().map(|m| m.regexp.as_str()).collect(),
      Self::LegacyRegexp(regexp) => vec![regexp.as_str()],
      Self::FromPage => Vec::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDefinition")]
pub struct EdgeFunctionDefinition {
  pub name: String,
  pub page: String,
  pub env: Vec<String>,
  pub files: Vec<String>,
  pub wasm: Vec<Value>,
  pub assets: Vec<Value>,
  pub source: MatcherSource,
}

impl EdgeFunctionDefinition {
  pub fn new(name: impl Into<String>, page: impl Into<String>, source: MatcherSource) -> Self {
    Self {
      name: name.into(),
      page: page.into(),
      env: Vec::new(),
      files: Vec::new(),
      wasm: Vec::new(),
      assets: Vec::new(),
      source,
    }
  }
}

#[derive(Deserialize)]
struct RawDefinition {
  name: String,
  page: String,
  #[serde(default)]
  env: Vec<String>,
  #[serde(default)]
  files: Vec<String>,
  #[serde(default)]
  wasm: Vec<Value>,
  #[serde(default)]
  assets: Vec<Value>,
  #[serde(default)]
  matchers: Option<Vec<EdgeMatcher>>,
  #[serde(default)]
  regexp: Option<String>,
}

impl From<RawDefinition> for EdgeFunctionDefinition {
  fn from(raw: RawDefinition) -> Self {
    let source = match (raw.matchers, raw.regexp) {
      (Some(matchers), _) if !matchers.is_empty() => MatcherSource::Matchers(matchers),
      (_, Some(regexp)) => MatcherSource::LegacyRegexp(regexp),
      _ => MatcherSource::FromPage,
    };
    Self {
      name: raw.name,
      page: raw.page,
      env: raw.env,
      files: raw.files,
      wasm: raw.wasm,
      assets: raw.assets,
      source,
    }
  }
}
