//! Configuration loading, env substitution, per-machine policy lists, and
//! validation.
//!
//! Config files: `skillsync.toml`, `skillsync.yaml`, or `skillsync.json`
//! Searched in `./`, then the repository root, then `~/.config/skillsync/`.
//!
//! Policy lists (exclusions, blocklists) are plain text files read once per
//! invocation into a [`Policy`] value that callers pass into the engines.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod policy;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, find_config_file, load_config, to_toml},
    policy::{NameList, Policy},
    schema::{
        AuditConfig, DiscoveryConfig, InstalledRootConfig, MirrorConfig, PolicyConfig,
        SkillsyncConfig,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
