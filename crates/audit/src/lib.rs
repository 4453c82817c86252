//! Blocks private identifiers and personal paths from reaching the shared
//! repository.

pub mod engine;
pub mod error;
pub mod git;
pub mod hook;
pub mod rules;

pub use {
    engine::{AuditReport, check, pre_commit},
    error::{Error, Result},
    hook::{HOOK_NAME, HookInstall, HookOutcome, hook_script, install_hook},
    rules::{Rule, RuleSet, Violation},
};
