//! Configuration validation engine.
//!
//! Detects unknown/misspelled keys and semantic problems in the mirror
//! topology (duplicate names, an installed root pointing at the repo store).

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use crate::{
    env_subst::substitute_env, loader::parse_config, policy::Policy, schema::SkillsyncConfig,
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "syntax", "unknown-field", "mirror", "policy-file"
    pub category: &'static str,
    /// Dotted path, e.g. "mirrors[0].installed"
    pub path: String,
    pub message: String,
}

/// Result of validating a configuration file.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Schema tree for unknown-field detection ─────────────────────────────────

enum KnownKeys {
    Struct(HashMap<&'static str, KnownKeys>),
    Array(Box<KnownKeys>),
    Leaf,
}

fn build_schema_map() -> KnownKeys {
    use KnownKeys::{Array, Leaf, Struct};

    let installed = Struct(HashMap::from([("name", Leaf), ("path", Leaf)]));
    let mirror = Struct(HashMap::from([
        ("name", Leaf),
        ("repo", Leaf),
        ("installed", Array(Box::new(installed))),
    ]));

    Struct(HashMap::from([
        (
            "policy",
            Struct(HashMap::from([
                ("exclude_files", Leaf),
                ("blocklist_files", Leaf),
            ])),
        ),
        (
            "discovery",
            Struct(HashMap::from([("manifest", Leaf), ("report", Leaf)])),
        ),
        ("audit", Struct(HashMap::from([("paths", Leaf)]))),
        ("mirrors", Array(Box::new(mirror))),
    ]))
}

/// Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

fn suggest<'a>(needle: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|c| (c, levenshtein(needle, c)))
        .filter(|(_, d)| *d <= 3)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}

/// Validate the config file at `path` (or the defaults when `None`).
pub fn validate(path: Option<&Path>, repo_root: &Path) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let Some(path) = path else {
        check_semantics(&SkillsyncConfig::default(), repo_root, &mut diagnostics);
        return ValidationResult {
            diagnostics,
            config_path: None,
        };
    };

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => substitute_env(&raw),
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message: format!("failed to read {}: {e}", path.display()),
            });
            return ValidationResult {
                diagnostics,
                config_path: Some(path.to_path_buf()),
            };
        },
    };

    validate_str(&raw, path, repo_root, &mut diagnostics);
    ValidationResult {
        diagnostics,
        config_path: Some(path.to_path_buf()),
    }
}

fn validate_str(raw: &str, path: &Path, repo_root: &Path, diagnostics: &mut Vec<Diagnostic>) {
    match raw_value(raw, path) {
        Ok(value) => check_unknown_fields(&value, &build_schema_map(), "", diagnostics),
        Err(message) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "syntax",
                path: String::new(),
                message,
            });
            return;
        },
    }

    match parse_config(raw, path) {
        Ok(config) => check_semantics(&config, repo_root, diagnostics),
        Err(e) => diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "syntax",
            path: String::new(),
            message: e.to_string(),
        }),
    }
}

fn raw_value(raw: &str, path: &Path) -> Result<serde_json::Value, String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
    match ext {
        "toml" => toml::from_str::<toml::Value>(raw)
            .map_err(|e| e.to_string())
            .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string())),
        "yaml" | "yml" => serde_yaml::from_str::<serde_json::Value>(raw).map_err(|e| e.to_string()),
        "json" => serde_json::from_str(raw).map_err(|e| e.to_string()),
        other => Err(format!("unsupported config format: .{other}")),
    }
}

fn check_unknown_fields(
    value: &serde_json::Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match (schema, value) {
        (KnownKeys::Struct(fields), serde_json::Value::Object(map)) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                match fields.get(key.as_str()) {
                    Some(child_schema) => {
                        check_unknown_fields(child, child_schema, &path, diagnostics);
                    },
                    None => {
                        let message = match suggest(key, fields.keys().copied()) {
                            Some(hint) => format!("unknown field; did you mean \"{hint}\"?"),
                            None => "unknown field".to_string(),
                        };
                        diagnostics.push(Diagnostic {
                            severity: Severity::Warning,
                            category: "unknown-field",
                            path,
                            message,
                        });
                    },
                }
            }
        },
        (KnownKeys::Array(item), serde_json::Value::Array(items)) => {
            for (i, child) in items.iter().enumerate() {
                check_unknown_fields(child, item, &format!("{prefix}[{i}]"), diagnostics);
            }
        },
        _ => {},
    }
}

fn check_semantics(config: &SkillsyncConfig, repo_root: &Path, diagnostics: &mut Vec<Diagnostic>) {
    if config.mirrors.is_empty() {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "mirror",
            path: "mirrors".into(),
            message: "no mirrors configured; sync has nothing to do".into(),
        });
    }

    let mut mirror_names = HashSet::new();
    for (i, mirror) in config.mirrors.iter().enumerate() {
        let at = format!("mirrors[{i}]");
        if !mirror_names.insert(mirror.name.as_str()) {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "mirror",
                path: format!("{at}.name"),
                message: format!("duplicate mirror name \"{}\"", mirror.name),
            });
        }
        if mirror.installed.is_empty() {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "mirror",
                path: format!("{at}.installed"),
                message: format!("mirror \"{}\" has no installed roots", mirror.name),
            });
        }

        let repo_dir = SkillsyncConfig::resolve(repo_root, &mirror.repo);
        let mut root_names = HashSet::new();
        for (j, root) in mirror.installed.iter().enumerate() {
            let root_at = format!("{at}.installed[{j}]");
            if root.name == "repo" || !root_names.insert(root.name.as_str()) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    category: "mirror",
                    path: format!("{root_at}.name"),
                    message: format!("root name \"{}\" is not unique in this mirror", root.name),
                });
            }
            if SkillsyncConfig::resolve(repo_root, &root.path) == repo_dir {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    category: "mirror",
                    path: format!("{root_at}.path"),
                    message: "installed root is the repo store itself".into(),
                });
            }
        }
    }

    let policy_files = config
        .policy
        .exclude_files
        .iter()
        .map(|p| ("policy.exclude_files", p))
        .chain(
            config
                .policy
                .blocklist_files
                .iter()
                .map(|p| ("policy.blocklist_files", p)),
        )
        .chain(std::iter::once(("discovery.manifest", &config.discovery.manifest)));
    for (key, raw) in policy_files {
        let resolved = SkillsyncConfig::resolve(repo_root, raw);
        if !resolved.exists() {
            diagnostics.push(Diagnostic {
                severity: Severity::Info,
                category: "policy-file",
                path: key.into(),
                message: format!("{} does not exist", resolved.display()),
            });
        }
    }

    if let Err(e) = Policy::load(config, repo_root) {
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "policy-file",
            path: "policy".into(),
            message: e.to_string(),
        });
    }
}
