//! Directional reconciliation between the repo store and installed roots.
//!
//! Both directions are planned first and applied second, so a dry run prints
//! exactly what a real run would do.

use std::collections::{HashMap, HashSet};

use {
    skillsync_config::NameList,
    tracing::{debug, info, warn},
};

use crate::{
    error::Result,
    types::{MirrorRoot, MirrorSet, SkillUnit},
};

/// Whether a copy creates or replaces the destination unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Updated,
}

#[derive(Debug, Clone)]
pub enum SyncAction {
    Copy {
        mirror: String,
        source_root: String,
        source: SkillUnit,
        dest: MirrorRoot,
        change: Change,
    },
    /// Pull found an excluded name; its repo copy must go.
    RemoveExcluded {
        mirror: String,
        target: SkillUnit,
        root: MirrorRoot,
    },
}

impl SyncAction {
    /// One-line description for dry runs and debug logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Copy {
                mirror,
                source_root,
                source,
                dest,
                change,
            } => {
                let verb = match change {
                    Change::Added => "add",
                    Change::Updated => "update",
                };
                format!(
                    "{verb} {mirror}/{} ({source_root} -> {})",
                    source.name(),
                    dest.name
                )
            },
            Self::RemoveExcluded {
                mirror,
                target,
                root,
            } => format!("remove {mirror}/{} from {} (excluded)", target.name(), root.name),
        }
    }
}

/// Counts for one destination root of one mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub excluded: usize,
    /// Excluded names whose repo copy was deleted.
    pub removed: usize,
    pub collisions: usize,
}

#[derive(Debug, Clone)]
pub struct SummaryRow {
    pub mirror: String,
    /// Destination root: `repo` for pull, the installed root for push.
    pub root: String,
    pub counts: SyncCounts,
}

/// Same name found in two installed roots with different content.
#[derive(Debug, Clone)]
pub struct Collision {
    pub mirror: String,
    pub name: String,
    pub winner: String,
    pub loser: String,
}

#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub actions: Vec<SyncAction>,
    pub summary: Vec<SummaryRow>,
    pub collisions: Vec<Collision>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn totals(&self) -> SyncCounts {
        self.summary
            .iter()
            .fold(SyncCounts::default(), |mut acc, row| {
                acc.added += row.counts.added;
                acc.updated += row.counts.updated;
                acc.unchanged += row.counts.unchanged;
                acc.excluded += row.counts.excluded;
                acc.removed += row.counts.removed;
                acc.collisions += row.counts.collisions;
                acc
            })
    }
}

/// Plan bringing installed state into the repo store.
///
/// Installed roots are visited in configured order and the first root to
/// provide a name wins. Excluded names are never copied and any existing repo
/// copy is removed.
pub fn plan_pull(mirrors: &[MirrorSet], exclusions: &NameList) -> Result<SyncPlan> {
    let mut plan = SyncPlan::default();

    for mirror in mirrors {
        let repo_skills = mirror.repo.skills()?;
        let repo_index: HashMap<&str, &SkillUnit> =
            repo_skills.iter().map(|s| (s.name(), s)).collect();
        let mut winners: HashMap<String, (SkillUnit, String)> = HashMap::new();
        let mut excluded: HashSet<String> = HashSet::new();
        let mut counts = SyncCounts::default();

        for root in &mirror.installed {
            for skill in root.skills()? {
                let name = skill.name().to_string();

                if exclusions.contains(&name) {
                    if excluded.insert(name) {
                        counts.excluded += 1;
                    }
                    continue;
                }

                if let Some((winner, winner_root)) = winners.get(&name) {
                    if !winner.content_equals(&skill)? {
                        warn!(
                            mirror = %mirror.name,
                            skill = %name,
                            winner = %winner_root,
                            loser = %root.name,
                            "installed roots disagree; keeping higher-precedence copy"
                        );
                        counts.collisions += 1;
                        plan.collisions.push(Collision {
                            mirror: mirror.name.clone(),
                            name: name.clone(),
                            winner: winner_root.clone(),
                            loser: root.name.clone(),
                        });
                    }
                    continue;
                }
                winners.insert(name.clone(), (skill.clone(), root.name.clone()));

                let change = match repo_index.get(name.as_str()) {
                    None => Change::Added,
                    Some(existing) if existing.content_equals(&skill)? => {
                        counts.unchanged += 1;
                        continue;
                    },
                    Some(_) => Change::Updated,
                };
                bump(&mut counts, change);
                plan.actions.push(SyncAction::Copy {
                    mirror: mirror.name.clone(),
                    source_root: root.name.clone(),
                    source: skill,
                    dest: mirror.repo.clone(),
                    change,
                });
            }
        }

        // Excluded names leave the repo store whether or not any installed
        // root still holds them.
        for existing in repo_skills.iter().filter(|s| exclusions.contains(s.name())) {
            if excluded.insert(existing.name().to_string()) {
                counts.excluded += 1;
            }
            counts.removed += 1;
            plan.actions.push(SyncAction::RemoveExcluded {
                mirror: mirror.name.clone(),
                target: existing.clone(),
                root: mirror.repo.clone(),
            });
        }

        plan.summary.push(SummaryRow {
            mirror: mirror.name.clone(),
            root: mirror.repo.name.clone(),
            counts,
        });
    }

    Ok(plan)
}

/// Plan deploying the repo store to every installed root.
///
/// No exclusion filtering: exclusions gate what the repo holds, not what gets
/// deployed. Names that exist only in an installed root are left alone.
pub fn plan_push(mirrors: &[MirrorSet]) -> Result<SyncPlan> {
    let mut plan = SyncPlan::default();

    for mirror in mirrors {
        let repo_skills = mirror.repo.skills()?;

        for root in &mirror.installed {
            let installed_index = index_by_name(root.skills()?);
            let mut counts = SyncCounts::default();

            for skill in &repo_skills {
                let change = match installed_index.get(skill.name()) {
                    None => Change::Added,
                    Some(existing) if existing.content_equals(skill)? => {
                        counts.unchanged += 1;
                        continue;
                    },
                    Some(_) => Change::Updated,
                };
                bump(&mut counts, change);
                plan.actions.push(SyncAction::Copy {
                    mirror: mirror.name.clone(),
                    source_root: mirror.repo.name.clone(),
                    source: skill.clone(),
                    dest: root.clone(),
                    change,
                });
            }

            plan.summary.push(SummaryRow {
                mirror: mirror.name.clone(),
                root: root.name.clone(),
                counts,
            });
        }
    }

    Ok(plan)
}

/// Execute a plan in order. The first failure aborts; earlier actions are
/// not rolled back.
pub fn apply(plan: &SyncPlan) -> Result<()> {
    for action in &plan.actions {
        debug!(action = %action.describe(), "applying");
        match action {
            SyncAction::Copy { source, dest, .. } => {
                source.copy_to(dest)?;
            },
            SyncAction::RemoveExcluded { target, root, .. } => {
                target.remove_from(root)?;
            },
        }
    }
    info!(actions = plan.actions.len(), "sync applied");
    Ok(())
}

fn bump(counts: &mut SyncCounts, change: Change) {
    match change {
        Change::Added => counts.added += 1,
        Change::Updated => counts.updated += 1,
    }
}

fn index_by_name(skills: Vec<SkillUnit>) -> HashMap<String, SkillUnit> {
    skills
        .into_iter()
        .map(|s| (s.name().to_string(), s))
        .collect()
}
