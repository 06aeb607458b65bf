//! Rich terminal output formatting

use crate::runner::{ExportSummary, UserOutcome, UserReport};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for long-running operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Create a progress bar for per-user exports
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Print section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(format!("━━━ {} ━━━", title)).cyan().bold());
    println!();
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

/// Print warning message
pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print info message
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Print the result line(s) for one user
pub fn print_user_report(report: &UserReport) {
    let id = &report.identifier;
    match &report.outcome {
        UserOutcome::Exported {
            account,
            path,
            records,
            decode_failures,
            template_mismatches,
        } => {
            print_success(&format!(
                "{} ({}): {} certificate(s) → {}",
                id,
                account,
                records,
                style(path.display()).dim()
            ));
            for (index, error) in decode_failures {
                print_warning(&format!("  certificate #{} skipped: {}", index, error));
            }
            if *template_mismatches > 0 {
                print_warning(&format!(
                    "  {} certificate(s) with unrecognized template information",
                    template_mismatches
                ));
            }
        }
        UserOutcome::NoCertificates { account } => {
            print_warning(&format!("{} ({}): no certificates issued", id, account));
        }
        UserOutcome::NotFound => {
            print_warning(&format!("{}: user not found in directory", id));
        }
        UserOutcome::Failed(error) => {
            print_error(&format!("{}: {}", id, error));
        }
    }
}

/// Print run summary
pub fn print_export_summary(summary: &ExportSummary) {
    print_header("Export Summary");

    println!("  Users requested: {}", style(summary.total()).bold());
    println!("  Reports written: {}", style(summary.exported()).green());
    println!(
        "  Certificates exported: {}",
        style(summary.certificates_exported()).green()
    );
    println!(
        "  Without certificates: {}",
        style(summary.no_certificates()).yellow()
    );
    println!("  Not found: {}", style(summary.not_found()).yellow());
    println!("  Failed: {}", style(summary.failed()).red());
}
