//! Classify discovered artifacts against what is already collected.

use std::{collections::HashSet, fmt};

use {skillsync_config::NameList, skillsync_skills::MirrorSet};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTag {
    Collected,
    Excluded,
    New,
}

impl ScanTag {
    pub fn label(self) -> &'static str {
        match self {
            Self::Collected => "COLLECTED",
            Self::Excluded => "EXCLUDED",
            Self::New => "NEW",
        }
    }
}

impl fmt::Display for ScanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.label())
    }
}

/// Names present in any root of any mirror, plus the exclusion list.
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    collected: HashSet<String>,
    exclusions: NameList,
}

impl Tagger {
    pub fn new(mirrors: &[MirrorSet], exclusions: &NameList) -> Result<Self> {
        let mut collected = HashSet::new();
        for mirror in mirrors {
            for root in mirror.roots() {
                collected.extend(root.skills()?.iter().map(|s| s.name().to_string()));
            }
        }
        Ok(Self {
            collected,
            exclusions: exclusions.clone(),
        })
    }

    /// COLLECTED wins over EXCLUDED.
    pub fn tag(&self, key: &str) -> ScanTag {
        if self.collected.contains(key) {
            ScanTag::Collected
        } else if self.exclusions.contains(key) {
            ScanTag::Excluded
        } else {
            ScanTag::New
        }
    }
}
