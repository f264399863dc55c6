//! Scan command

use super::{print_json, PASS, WARN};
use super::text::TextArgs;
use anyhow::Result;
use console::style;
use schoolgate_validate::{matching_patterns, PatternKind};
use serde::Serialize;

#[derive(Serialize)]
struct ScanReport {
    suspicious: bool,
    patterns: Vec<PatternKind>,
}

/// Report the matching detectors. Suspicious input fails the command.
pub fn scan(args: TextArgs, json: bool) -> Result<bool> {
    let patterns = matching_patterns(&args.input);
    let report = ScanReport {
        suspicious: !patterns.is_empty(),
        patterns,
    };

    if json {
        print_json(&report)?;
    } else if report.suspicious {
        let names: Vec<_> = report.patterns.iter().map(PatternKind::as_str).collect();
        println!(
            "{}{} {}",
            WARN,
            style("suspicious").yellow().bold(),
            style(names.join(", ")).dim()
        );
    } else {
        println!("{}{}", PASS, style("no detector matched").green());
    }

    Ok(!report.suspicious)
}
