use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::SkillsyncConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "skillsync.toml",
    "skillsync.yaml",
    "skillsync.yml",
    "skillsync.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<SkillsyncConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Load the explicit config, or discover one in the standard locations.
///
/// Search order when `explicit` is `None`:
/// 1. `./skillsync.{toml,yaml,yml,json}`
/// 2. `<repo_root>/skillsync.{toml,yaml,yml,json}`
/// 3. `~/.config/skillsync/skillsync.{toml,yaml,yml,json}`
///
/// Returns the defaults and `None` when no file exists. A file that exists
/// but fails to parse is an error.
pub fn discover_and_load(
    explicit: Option<&Path>,
    repo_root: &Path,
) -> Result<(SkillsyncConfig, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => find_config_file(repo_root),
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let cfg = load_config(&path)?;
            Ok((cfg, Some(path)))
        },
        None => {
            debug!("no config file found, using defaults");
            Ok((SkillsyncConfig::default(), None))
        },
    }
}

/// Find the first config file in the standard locations.
pub fn find_config_file(repo_root: &Path) -> Option<PathBuf> {
    let mut dirs = vec![PathBuf::from("."), repo_root.to_path_buf()];
    if let Some(dir) = config_dir() {
        dirs.push(dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.is_file())
}

/// Returns the user-global config directory (`~/.config/skillsync/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "skillsync").map(|d| d.config_dir().to_path_buf())
}

/// Serialize `config` to pretty TOML.
pub fn to_toml(config: &SkillsyncConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

pub(crate) fn parse_config(raw: &str, path: &Path) -> Result<SkillsyncConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::UnsupportedFormat(other.to_string())),
    }
}
