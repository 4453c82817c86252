//! Per-project artifact inventory.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use {regex::Regex, tracing::debug};

use crate::error::{Context, Result};

/// An artifact category found in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Commands,
    Skills,
    Agents,
    Instructions,
    Scripts,
    Targets,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Commands,
        Self::Skills,
        Self::Agents,
        Self::Instructions,
        Self::Scripts,
        Self::Targets,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::Skills => "skills",
            Self::Agents => "agents",
            Self::Instructions => "instructions",
            Self::Scripts => "scripts",
            Self::Targets => "targets",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const INSTRUCTION_FILES: &[&str] = &[
    "CLAUDE.md",
    "AGENTS.md",
    "GEMINI.md",
    ".cursorrules",
    ".github/copilot-instructions.md",
];
const SCRIPT_DIRS: &[&str] = &["scripts", "bin", "tools"];
const MAKEFILES: &[&str] = &["GNUmakefile", "makefile", "Makefile"];
const JUSTFILES: &[&str] = &["justfile", "Justfile"];
const JUST_DIRECTIVES: &[&str] = &["set", "alias", "export", "import", "mod"];

/// One discovered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Identity used when tagging against the collection.
    pub key: String,
}

impl Item {
    fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
        }
    }

    fn with_key(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInventory {
    pub path: PathBuf,
    /// One entry per [`Category::ALL`], in that order.
    pub categories: Vec<(Category, Vec<Item>)>,
}

impl ProjectInventory {
    pub fn items(&self, category: Category) -> &[Item] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items.as_slice())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Compiled target-line patterns, built once per discovery run.
#[derive(Debug, Clone)]
pub struct TargetParser {
    make: Regex,
    just: Regex,
}

impl TargetParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            make: Regex::new(r"^([^\s:#=][^:#=]*?)\s*:")?,
            just: Regex::new(r"^@?([A-Za-z_][A-Za-z0-9_-]*)(\s[^:]*)?:")?,
        })
    }

    /// Rule names from a Makefile, first-seen order, no duplicates. A rule
    /// line may name several targets before the colon.
    pub fn make_targets(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for line in text.lines() {
            let Some(caps) = self.make.captures(line) else {
                continue;
            };
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let rest = &line[whole.end()..];
            if rest.starts_with('=') || rest.starts_with(":=") {
                continue;
            }
            for name in name.as_str().split_whitespace() {
                if name.starts_with('.') || name.contains('%') {
                    continue;
                }
                push_unique(&mut out, name);
            }
        }
        out
    }

    /// Recipe names from a justfile, first-seen order, no duplicates.
    pub fn just_recipes(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        for line in text.lines() {
            let Some(caps) = self.just.captures(line) else {
                continue;
            };
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if line[whole.end()..].starts_with('=') {
                continue;
            }
            let name = name.as_str();
            if JUST_DIRECTIVES.contains(&name) {
                continue;
            }
            push_unique(&mut out, name);
        }
        out
    }
}

fn push_unique(out: &mut Vec<String>, name: &str) {
    if !out.iter().any(|n| n == name) {
        out.push(name.to_string());
    }
}

/// Inventory all six categories under `project`.
pub fn inventory(project: &Path, targets: &TargetParser) -> Result<ProjectInventory> {
    let claude = project.join(".claude");
    let categories = vec![
        (Category::Commands, markdown_stems(&claude.join("commands"))?),
        (Category::Skills, skill_dirs(&claude.join("skills"))?),
        (Category::Agents, markdown_stems(&claude.join("agents"))?),
        (Category::Instructions, instruction_files(project)),
        (Category::Scripts, scripts(project)?),
        (Category::Targets, build_targets(project, targets)?),
    ];
    debug!(project = %project.display(), "inventoried project");
    Ok(ProjectInventory {
        path: project.to_path_buf(),
        categories,
    })
}

/// Sorted, non-hidden entries of `dir`. A missing directory is empty.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", dir.display())),
    };
    let mut paths = Vec::new();
    for entry in read {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_none_or(|n| n.starts_with('.'));
        if !hidden {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn stem(path: &Path) -> Option<String> {
    path.file_stem()?.to_str().map(str::to_string)
}

fn markdown_stems(dir: &Path) -> Result<Vec<Item>> {
    Ok(sorted_entries(dir)?
        .iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "md"))
        .filter_map(|p| stem(p))
        .map(Item::named)
        .collect())
}

fn skill_dirs(dir: &Path) -> Result<Vec<Item>> {
    Ok(sorted_entries(dir)?
        .iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
        .map(Item::named)
        .collect())
}

fn instruction_files(project: &Path) -> Vec<Item> {
    INSTRUCTION_FILES
        .iter()
        .filter(|rel| project.join(rel).is_file())
        .map(|rel| Item::with_key(*rel, stem(Path::new(rel)).unwrap_or_default()))
        .collect()
}

fn scripts(project: &Path) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    for dir in SCRIPT_DIRS {
        for path in sorted_entries(&project.join(dir))? {
            if !path.is_file() {
                continue;
            }
            let (Some(name), Some(key)) = (
                path.file_name().and_then(|n| n.to_str()),
                stem(&path),
            ) else {
                continue;
            };
            items.push(Item::with_key(name, key));
        }
    }
    Ok(items)
}

fn first_existing(project: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|n| project.join(n))
        .find(|p| p.is_file())
}

fn build_targets(project: &Path, parser: &TargetParser) -> Result<Vec<Item>> {
    let mut names = Vec::new();
    if let Some(path) = first_existing(project, MAKEFILES) {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        names.extend(parser.make_targets(&text));
    }
    if let Some(path) = first_existing(project, JUSTFILES) {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for name in parser.just_recipes(&text) {
            push_unique(&mut names, &name);
        }
    }
    Ok(names.into_iter().map(Item::named).collect())
}
