//! Text and markdown renderings of a discovery run.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::{
    discover::Discovery,
    inventory::{Category, Item, ProjectInventory},
    tag::{ScanTag, Tagger},
};

/// Items listed per category by [`scan_text`] before eliding the rest.
pub const SCAN_PREVIEW: usize = 5;

const PROJECT_HEADER: &str = "PROJECT";
const TOTAL_LABEL: &str = "TOTAL";

/// Human summary: non-empty projects, non-empty categories, first few items.
pub fn scan_text(discovery: &Discovery, tagger: &Tagger) -> String {
    let mut out = String::new();
    for project in discovery.non_empty() {
        let _ = writeln!(
            out,
            "== {} ({} artifacts) ==",
            project.path.display(),
            project.total()
        );
        for (category, items) in non_empty_categories(project) {
            let _ = writeln!(out, "  {category} ({})", items.len());
            for item in items.iter().take(SCAN_PREVIEW) {
                let _ = writeln!(out, "    {} {}", tagger.tag(&item.key), item.name);
            }
            if items.len() > SCAN_PREVIEW {
                let _ = writeln!(out, "    ... and {} more", items.len() - SCAN_PREVIEW);
            }
        }
        out.push('\n');
    }
    out
}

/// Fixed-width count table with a totals row. Projects with no artifacts
/// still get a zero row.
pub fn check_table(discovery: &Discovery) -> String {
    let names: Vec<String> = discovery
        .projects
        .iter()
        .map(|p| p.path.display().to_string())
        .collect();
    let name_width = names
        .iter()
        .map(String::len)
        .chain([PROJECT_HEADER.len(), TOTAL_LABEL.len()])
        .max()
        .unwrap_or_default();
    let widths: Vec<usize> = Category::ALL.iter().map(|c| c.label().len().max(5)).collect();

    let mut out = String::new();
    let _ = write!(out, "{:<name_width$}", PROJECT_HEADER);
    for (category, width) in Category::ALL.iter().zip(&widths) {
        let _ = write!(out, "  {:>width$}", category.label().to_uppercase());
    }
    out.push('\n');

    let mut totals = [0usize; Category::ALL.len()];
    for (project, name) in discovery.projects.iter().zip(&names) {
        let _ = write!(out, "{name:<name_width$}");
        for (i, (category, width)) in Category::ALL.iter().zip(&widths).enumerate() {
            let count = project.items(*category).len();
            totals[i] += count;
            let _ = write!(out, "  {count:>width$}");
        }
        out.push('\n');
    }

    let _ = write!(out, "{:<name_width$}", TOTAL_LABEL);
    for (total, width) in totals.iter().zip(&widths) {
        let _ = write!(out, "  {total:>width$}");
    }
    out.push('\n');
    out
}

/// Full markdown report: every item of every non-empty project, tagged.
pub fn report_markdown(
    discovery: &Discovery,
    tagger: &Tagger,
    generated: DateTime<Local>,
) -> String {
    let mut out = String::from("# Skill Scan Report\n\n");
    let _ = writeln!(out, "Generated: {}\n", generated.format("%Y-%m-%d %H:%M:%S %:z"));
    out.push_str("Legend:\n\n");
    for (tag, meaning) in [
        (ScanTag::Collected, "already present in a mirror root"),
        (ScanTag::Excluded, "listed in an exclusion file"),
        (ScanTag::New, "not collected yet"),
    ] {
        let _ = writeln!(out, "- `{tag}` {meaning}");
    }
    out.push('\n');

    let mut any = false;
    for project in discovery.non_empty() {
        any = true;
        let _ = writeln!(out, "## {}\n", project.path.display());
        for (category, items) in non_empty_categories(project) {
            let _ = writeln!(out, "### {category} ({})\n", items.len());
            for item in items {
                let _ = writeln!(out, "- `{}` {}", tagger.tag(&item.key), item.name);
            }
            out.push('\n');
        }
    }
    if !any {
        out.push_str("_No artifacts found._\n");
    }
    out
}

fn non_empty_categories(
    project: &ProjectInventory,
) -> impl Iterator<Item = (Category, &[Item])> {
    project
        .categories
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(category, items)| (*category, items.as_slice()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, skillsync_config::NameList, std::path::PathBuf};

    fn item(name: &str) -> Item {
        Item {
            name: name.into(),
            key: name.into(),
        }
    }

    fn project(path: &str, commands: &[&str], targets: &[&str]) -> ProjectInventory {
        let categories = Category::ALL
            .iter()
            .map(|c| {
                let items: Vec<Item> = match c {
                    Category::Commands => commands.iter().map(|n| item(n)).collect(),
                    Category::Targets => targets.iter().map(|n| item(n)).collect(),
                    _ => Vec::new(),
                };
                (*c, items)
            })
            .collect();
        ProjectInventory {
            path: PathBuf::from(path),
            categories,
        }
    }

    fn fixture() -> Discovery {
        Discovery {
            projects: vec![
                project("/src/api", &["a", "b", "c", "d", "e", "f", "g"], &["build"]),
                project("/src/empty", &[], &[]),
            ],
            skipped: Vec::new(),
        }
    }

    fn tagger() -> Tagger {
        Tagger::new(&[], &NameList::parse("b\n")).unwrap()
    }

    #[test]
    fn scan_previews_five_items() {
        let text = scan_text(&fixture(), &tagger());
        assert!(text.contains("== /src/api (8 artifacts) =="));
        assert!(text.contains("  commands (7)\n    [NEW] a\n    [EXCLUDED] b\n"));
        assert!(text.contains("    [NEW] e\n    ... and 2 more\n"));
        assert!(!text.contains("[NEW] f"));
        assert!(text.contains("  targets (1)\n    [NEW] build\n"));
        assert!(!text.contains("/src/empty"));
    }

    #[test]
    fn check_includes_zero_rows_and_totals() {
        let table = check_table(&fixture());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("PROJECT   "));
        assert!(lines[0].contains("COMMANDS"));
        assert!(lines[2].starts_with("/src/empty"));
        assert!(lines[3].starts_with("TOTAL"));
        let cells: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(cells, vec!["TOTAL", "7", "0", "0", "0", "0", "1"]);
        let width = lines[0].len();
        assert!(lines.iter().all(|l| l.len() == width));
    }

    #[test]
    fn report_lists_everything() {
        let md = report_markdown(&fixture(), &tagger(), Local::now());
        assert!(md.starts_with("# Skill Scan Report\n\nGenerated: "));
        assert!(md.contains("- `[COLLECTED]` already present in a mirror root"));
        assert!(md.contains("## /src/api\n\n### commands (7)\n\n- `[NEW]` a\n- `[EXCLUDED]` b\n"));
        assert!(md.contains("- `[NEW]` g\n"));
        assert!(!md.contains("/src/empty"));

        let empty = report_markdown(&Discovery::default(), &tagger(), Local::now());
        assert!(empty.contains("_No artifacts found._"));
    }
}
