//! Report rendering for the check command.

use anyhow::Result;
use migration_guard_core::{Issue, IssueDiagnostic, Report};
use miette::GraphicalReportHandler;

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Rich => print_rich(report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    for issue in &report.issues {
        println!("{}", issue.format_styled(true));
    }

    print!("{}", report.format_digest());
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

/// Issue lines only; the digest is left out so the output stays greppable.
fn print_compact(report: &Report) {
    for issue in &report.issues {
        println!("{issue}");
    }
}

fn print_rich(report: &Report) {
    let handler = GraphicalReportHandler::new();

    for issue in &report.issues {
        match render_issue(&handler, report, issue) {
            Some(rendered) => println!("{rendered}"),
            None => println!("{}", issue.format()),
        }
    }

    print!("{}", report.format_digest());
}

/// Renders one issue over its source file, or `None` when the file can no
/// longer be read.
fn render_issue(handler: &GraphicalReportHandler, report: &Report, issue: &Issue) -> Option<String> {
    let content = std::fs::read_to_string(report.root_path.join(&issue.location.file)).ok()?;
    let diagnostic = IssueDiagnostic::new(issue, content);

    let mut rendered = String::new();
    handler.render_report(&mut rendered, &diagnostic).ok()?;
    Some(rendered)
}
