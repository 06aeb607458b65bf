//! user-cert-report - export directory users' certificates with their
//! certificate template metadata

use anyhow::Context;
use clap::Parser;
use console::style;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use user_cert_report::certificate::CertificateDecoder;
use user_cert_report::cli::Cli;
use user_cert_report::config;
use user_cert_report::directory::{DirectoryLookup, LdifDirectory};
use user_cert_report::output::{
    create_progress_bar, create_spinner, print_export_summary, print_header, print_info,
    print_user_report, print_warning,
};
use user_cert_report::processor::BatchProcessor;
use user_cert_report::report::{resolve_output_dir, ReportWriter};
use user_cert_report::runner::{ExportSummary, Exporter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match run(cli).await {
        Ok(summary) if summary.has_failures() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExportSummary> {
    let mut settings = config::load_config(cli.config.as_deref())?;
    cli.apply_to(&mut settings);

    let identifiers = cli.identifiers()?;
    if identifiers.is_empty() {
        anyhow::bail!("No user identities given");
    }

    let output = resolve_output_dir(&settings.report.output_dir())?;
    if let Some(requested) = &output.fallback_from {
        print_warning(&format!(
            "{} is a file, writing reports to {}",
            requested.display(),
            output.path.display()
        ));
    }

    let ldif = settings
        .directory
        .ldif
        .clone()
        .context("No directory source: pass --ldif or set [directory] ldif in the settings file")?;

    let spinner = create_spinner(&format!("Reading {}", ldif.display()));
    let directory = LdifDirectory::load(&ldif);
    spinner.finish_and_clear();
    let directory = directory?;

    // Directory template objects first, then settings, then --template-name
    let mut names = directory.template_names();
    names.merge(&settings.template_names());
    names.merge(&cli.template_names()?);
    debug!(templates = names.len(), users = directory.users().len(), "directory loaded");

    let writer = ReportWriter::new(output.path.clone(), settings.report.clone());
    let exporter = Arc::new(Exporter::new(
        Arc::new(directory),
        BatchProcessor::new(CertificateDecoder::new(names)),
        writer,
    ));

    print_header("Certificate Export");
    print_info(&format!(
        "Exporting {} user(s) as {} to {}",
        identifiers.len(),
        settings.report.format,
        output.path.display()
    ));
    println!();

    let pb = create_progress_bar(identifiers.len() as u64, "Exporting");
    let summary = exporter
        .run(identifiers, settings.run.parallel, |report| {
            pb.suspend(|| print_user_report(report));
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    print_export_summary(&summary);
    Ok(summary)
}
