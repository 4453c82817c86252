//! Typed audit rules applied as a pure function over lines.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use {regex::Regex, skillsync_config::NameList};

use crate::error::Result;

/// `/home/<user>/Documents/...`
const HOME_DOCUMENTS: &str = r"/home/[^/\s]+/Documents/";
/// `-home-<user>-Documents-<segment>`, the dash-flattened form assistants
/// use for per-project state directories.
const HOME_DOCUMENTS_FLAT: &str = r"-home-[^\s/]+?-Documents-[^\s/]+";

/// How many leading bytes are inspected for a NUL when sniffing binaries.
const BINARY_SNIFF_LEN: usize = 8192;

#[derive(Debug, Clone)]
pub enum Rule {
    /// Verbatim, case-sensitive substring. Never interpreted as a pattern.
    Literal(String),
    /// Precompiled personal-path shape.
    PathShape { name: &'static str, pattern: Regex },
}

impl Rule {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Literal(term) => line.contains(term.as_str()),
            Self::PathShape { pattern, .. } => pattern.is_match(line),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(term) => write!(f, "term \"{term}\""),
            Self::PathShape { name, .. } => write!(f, "path {name}"),
        }
    }
}

/// One offending line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub text: String,
    /// Label of the first rule that matched.
    pub rule: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.text)
    }
}

/// Blocklist literals plus the unconditional personal-path shapes.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build from blocklist terms. With no terms the set still holds the two
    /// path rules, so it is never empty.
    pub fn new(terms: &NameList) -> Result<Self> {
        let mut rules: Vec<Rule> = terms.iter().map(|t| Rule::Literal(t.to_string())).collect();
        rules.push(Rule::PathShape {
            name: "home-documents",
            pattern: Regex::new(HOME_DOCUMENTS)?,
        });
        rules.push(Rule::PathShape {
            name: "home-documents-flat",
            pattern: Regex::new(HOME_DOCUMENTS_FLAT)?,
        });
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn first_match(&self, line: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(line))
    }

    /// Lazily yield one violation per matching line of `text`. Calling it
    /// again restarts the scan.
    pub fn scan<'a>(
        &'a self,
        path: &'a Path,
        text: &'a str,
    ) -> impl Iterator<Item = Violation> + 'a {
        text.lines().enumerate().filter_map(move |(i, line)| {
            self.first_match(line).map(|rule| Violation {
                path: path.to_path_buf(),
                line: i + 1,
                text: line.to_string(),
                rule: rule.to_string(),
            })
        })
    }

    /// Scan raw file content. Binary-looking content yields nothing.
    pub fn scan_bytes(&self, path: &Path, bytes: &[u8]) -> Vec<Violation> {
        if looks_binary(bytes) {
            tracing::debug!(path = %path.display(), "skipping binary file");
            return Vec::new();
        }
        let text = String::from_utf8_lossy(bytes);
        self.scan(path, &text).collect()
    }
}

fn looks_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_SNIFF_LEN)].contains(&0)
}
