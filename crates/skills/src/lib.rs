//! Skill units, mirror roots, and the sync engine.
//!
//! A skill is either a directory (identity = directory name) or a single
//! document (identity = file stem). The same logical collection lives in a
//! repo store and one or more installed roots; `pull` and `push` reconcile
//! them, `diff` and `status` only look.

pub mod diff;
pub mod error;
pub mod status;
pub mod sync;
pub mod tree;
pub mod types;

pub use {
    diff::{DeltaKind, DiffReport, DiffStatus, diff},
    error::{Error, Result},
    status::{StatusMatrix, status},
    sync::{SyncAction, SyncPlan, apply, plan_pull, plan_push},
    types::{MirrorRoot, MirrorSet, SkillUnit},
};
