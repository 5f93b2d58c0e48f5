/* src/runtime/engine/rust/src/errors.rs */

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
  /// No pattern in the page regex map and no matcher on the definition.
  UnresolvedRoute { name: String, page: String, route: String },
  /// A manifest handed in as JSON text did not parse.
  InvalidManifest(String),
}

impl ResolveError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::UnresolvedRoute { .. } => "UNRESOLVED_ROUTE",
      Self::InvalidManifest(_) => "INVALID_MANIFEST",
    }
  }
}

impl fmt::Display for ResolveError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnresolvedRoute { name, page, route } if page == route => {
        write!(f, "{}: edge function \"{name}\" has no pattern for page {page}", self.code())
      }
      Self::UnresolvedRoute { name, page, route } => write!(
        f,
        "{}: edge function \"{name}\" has no pattern for page {page} (route {route})",
        self.code()
      ),
      Self::InvalidManifest(msg) => write!(f, "{}: {msg}", self.code()),
    }
  }
}

impl std::error::Error for ResolveError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unresolved_display_same_route() {
    let err = ResolveError::UnresolvedRoute {
      name: "pages/missing".into(),
      page: "/missing".into(),
      route: "/missing".into(),
    };
    assert_eq!(
      err.to_string(),
      "UNRESOLVED_ROUTE: edge function \"pages/missing\" has no pattern for page /missing"
    );
  }

  #[test]
  fn unresolved_display_translated_route() {
    let err = ResolveError::UnresolvedRoute {
      name: "app/gone/page".into(),
      page: "/gone/page".into(),
      route: "/gone".into(),
    };
    assert!(err.to_string().ends_with("(route /gone)"));
  }

  #[test]
  fn invalid_manifest_code() {
    let err = ResolveError::InvalidManifest("expected value".into());
    assert_eq!(err.code(), "INVALID_MANIFEST");
    assert_eq!(err.to_string(), "INVALID_MANIFEST: expected value");
  }
}
