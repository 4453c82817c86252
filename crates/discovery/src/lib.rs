//! Crawls other projects listed in a manifest for skill candidates that are
//! not yet collected.

pub mod discover;
pub mod error;
pub mod inventory;
pub mod manifest;
pub mod render;
pub mod tag;

pub use {
    discover::{Discovery, SkipReason, SkippedProject, discover},
    error::{Error, Result},
    inventory::{Category, Item, ProjectInventory, TargetParser, inventory},
    manifest::{ManifestEntry, load as load_manifest, parse as parse_manifest},
    render::{SCAN_PREVIEW, check_table, report_markdown, scan_text},
    tag::{ScanTag, Tagger},
};
