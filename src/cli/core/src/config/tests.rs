/* src/cli/core/src/config/tests.rs */

use super::*;

#[test]
fn parse_full_config() {
  let toml_str = r#"
[project]
name = "my-site"

[build]
next_dir = "web/.next"
out_file = "dist/edge.json"
"#;
  let config: RouterConfig = toml::from_str(toml_str).unwrap();
  assert_eq!(config.project.unwrap().name, "my-site");
  assert_eq!(config.build.next_dir, "web/.next");
  assert_eq!(config.build.out_file, "dist/edge.json");
  assert!(config.build.validate().is_ok());
}

#[test]
fn parse_defaults() {
  let config: RouterConfig = toml::from_str("").unwrap();
  assert!(config.project.is_none());
  assert_eq!(config.build.next_dir, ".next");
  assert_eq!(config.build.out_file, ".netlify/edge-functions/manifest.json");
}

#[test]
fn empty_next_dir_rejected() {
  let toml_str = r#"
[build]
next_dir = ""
"#;
  let config: RouterConfig = toml::from_str(toml_str).unwrap();
  let err = config.build.validate().unwrap_err();
  assert!(err.to_string().contains("next_dir must not be empty"));
}

#[test]
fn find_config_walks_upward() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join(CONFIG_FILE), "[build]\nnext_dir = \"out\"\n").unwrap();
  let nested = dir.path().join("a/b");
  std::fs::create_dir_all(&nested).unwrap();

  let found = find_config(&nested).unwrap();
  assert_eq!(found, dir.path().canonicalize().unwrap().join(CONFIG_FILE));
  let config = load_config(&found).unwrap();
  assert_eq!(config.build.next_dir, "out");
}

#[test]
fn load_config_reports_invalid_values() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join(CONFIG_FILE);
  std::fs::write(&path, "[build]\nout_file = \" \"\n").unwrap();
  let err = load_config(&path).unwrap_err();
  assert!(err.to_string().contains("out_file"));
}

#[test]
fn settings_anchor_relative_paths_at_config_dir() {
  let cfg: RouterConfig = toml::from_str("[build]\nnext_dir = \"site/.next\"\n").unwrap();
  let settings =
    RunSettings::resolve(Some((PathBuf::from("/repo/edge-router.toml"), cfg)), None, None);
  assert_eq!(settings.next_dir, PathBuf::from("/repo/site/.next"));
  assert_eq!(settings.out_file, PathBuf::from("/repo/.netlify/edge-functions/manifest.json"));
}

#[test]
fn settings_flags_override_config() {
  let settings = RunSettings::resolve(
    Some((PathBuf::from("/repo/edge-router.toml"), RouterConfig::default())),
    Some(PathBuf::from("/tmp/.next")),
    Some(PathBuf::from("/tmp/out.json")),
  );
  assert_eq!(settings.next_dir, PathBuf::from("/tmp/.next"));
  assert_eq!(settings.out_file, PathBuf::from("/tmp/out.json"));
}

#[test]
fn settings_without_config_use_cwd_defaults() {
  let settings = RunSettings::resolve(None, None, None);
  assert_eq!(settings.next_dir, PathBuf::from("./.next"));
}
