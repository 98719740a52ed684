//! Validate every post and report what failed

use anyhow::Result;

use crate::content::{LoadErrors, LoadFailure, LoadMode};
use crate::Quire;

/// Load the content directory and report each failing file.
///
/// In strict mode any failure is returned as an error so the process exits
/// non-zero; in permissive mode failures are only reported.
pub fn run(quire: &Quire, mode: LoadMode) -> Result<()> {
    let mut report = quire.load();
    // Duplicate ids break the whole collection, so they lead the report
    report.failures.sort_by_key(|f| !f.is_duplicate());

    for line in report_lines(&report.failures) {
        println!("{}", line);
    }

    let published = report.collection.list_published().len();
    let drafts = report.collection.list_drafts().len();
    println!(
        "{} valid ({} published, {} drafts), {} failed",
        report.collection.len(),
        published,
        drafts,
        report.failures.len()
    );

    if mode == LoadMode::Strict && !report.is_clean() {
        return Err(LoadErrors {
            failures: report.failures,
        }
        .into());
    }

    Ok(())
}

fn report_lines(failures: &[LoadFailure]) -> Vec<String> {
    failures
        .iter()
        .map(|failure| {
            if failure.is_duplicate() {
                format!("  ✗ [DUPLICATE ID] {}", failure)
            } else {
                format!("  ✗ {}", failure)
            }
        })
        .collect()
}
