/* src/cli/core/src/config.rs */

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "edge-router.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouterConfig {
  #[serde(default)]
  pub project: Option<ProjectConfig>,
  #[serde(default)]
  pub build: BuildSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
  #[serde(default = "default_next_dir")]
  pub next_dir: String,
  #[serde(default = "default_out_file")]
  pub out_file: String,
}

impl Default for BuildSection {
  fn default() -> Self {
    Self { next_dir: default_next_dir(), out_file: default_out_file() }
  }
}

impl BuildSection {
  pub fn validate(&self) -> Result<()> {
    if self.next_dir.trim().is_empty() {
      bail!("build.next_dir must not be empty");
    }
    if self.out_file.trim().is_empty() {
      bail!("build.out_file must not be empty");
    }
    Ok(())
  }
}

fn default_next_dir() -> String {
  ".next".to_string()
}

fn default_out_file() -> String {
  ".netlify/edge-functions/manifest.json".to_string()
}

/// Walk upward from `start` to find `edge-router.toml`, like Cargo.toml discovery
pub fn find_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("{CONFIG_FILE} not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_config(path: &Path) -> Result<RouterConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: RouterConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  config.build.validate()?;
  Ok(config)
}

/// Resolved settings for one run: config file values with CLI flags on top.
/// Relative paths are anchored at the directory holding the config file.
#[derive(Debug, Clone)]
pub struct RunSettings {
  pub next_dir: PathBuf,
  pub out_file: PathBuf,
}

impl RunSettings {
  pub fn resolve(
    config: Option<(PathBuf, RouterConfig)>,
    next_dir: Option<PathBuf>,
    out_file: Option<PathBuf>,
  ) -> Self {
    let (base_dir, build) = match config {
      Some((path, cfg)) => {
        let base = path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        (base, cfg.build)
      }
      None => (PathBuf::from("."), BuildSection::default()),
    };
    Self {
      next_dir: next_dir.unwrap_or_else(|| base_dir.join(&build.next_dir)),
      out_file: out_file.unwrap_or_else(|| base_dir.join(&build.out_file)),
    }
  }
}
