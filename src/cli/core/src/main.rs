/* src/cli/core/src/main.rs */

mod config;
mod edge;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::{RouterConfig, RunSettings, find_config, load_config};

#[derive(Parser)]
#[command(name = "edge-router", about = "Edge function routing for framework builds")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Assemble the edge functions manifest from a build directory
  Manifest {
    /// Path to edge-router.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Framework build directory (default: .next)
    #[arg(short, long)]
    next_dir: Option<PathBuf>,
    /// Output file for the edge functions manifest
    #[arg(short, long)]
    out: Option<PathBuf>,
  },
  /// Print the routing pattern of one edge function
  Pattern {
    /// Page identifier or function key, e.g. /edge/[id] or /blog/[author]/page
    #[arg(short, long)]
    page: String,
    /// Path to edge-router.toml (auto-detected if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Framework build directory (default: .next)
    #[arg(short, long)]
    next_dir: Option<PathBuf>,
  },
  /// Make the locale segment of a route regex optional
  Optionalize {
    regex: String,
  },
  /// Remove lookahead assertions from a route regex
  Strip {
    regex: String,
  },
}

/// Explicit config must load; an auto-detected one is optional.
fn resolve_config(explicit: Option<PathBuf>) -> Result<Option<(PathBuf, RouterConfig)>> {
  if let Some(path) = explicit {
    let config = load_config(&path)?;
    return Ok(Some((path, config)));
  }
  let Ok(cwd) = std::env::current_dir() else {
    return Ok(None);
  };
  match find_config(&cwd) {
    Ok(path) => {
      let config = load_config(&path)?;
      Ok(Some((path, config)))
    }
    Err(_) => Ok(None),
  }
}

fn report_project(config: Option<&(PathBuf, RouterConfig)>) {
  if let Some((path, cfg)) = config {
    let name = cfg.project.as_ref().map_or("unnamed project", |p| p.name.as_str());
    ui::arrow(&format!("{name} ({})", path.display()));
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Command::Manifest { config, next_dir, out } => {
      ui::banner("manifest");
      let config = resolve_config(config)?;
      report_project(config.as_ref());
      let settings = RunSettings::resolve(config, next_dir, out);
      edge::run_manifest(&settings)?;
      ui::blank();
    }
    Command::Pattern { page, config, next_dir } => {
      let settings = RunSettings::resolve(resolve_config(config)?, next_dir, None);
      edge::run_pattern(&settings.next_dir, &page)?;
    }
    Command::Optionalize { regex } => {
      println!("{}", edge_router_engine::make_locale_optional(&regex));
    }
    Command::Strip { regex } => {
      println!("{}", edge_router_engine::strip_lookahead(&regex));
    }
  }
  Ok(())
}

fn main() {
  let cli = Cli::parse();
  if let Err(e) = run(cli) {
    ui::fail(&format!("{e:#}"));
    std::process::exit(1);
  }
}
