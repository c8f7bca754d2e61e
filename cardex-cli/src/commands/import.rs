use crate::config::ImportConfig;
use anyhow::{bail, Context, Result};
use clap::Args;
use importers::{build_record, slot_keys};
use resolver::{ContactIndex, ImportOptions, ImportOutcome, ImportSession, ImportSummary};
use shared_types::PropertyRecord;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// vCard files (or JSON contact snapshots) to import
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Resolve duplicates and report, but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Drop duplicates instead of merging them into the existing contact
    #[arg(long)]
    pub no_merge: bool,

    /// Insert every record without duplicate detection
    #[arg(long)]
    pub keep_duplicates: bool,

    /// JSON array of contacts already known (plain contacts or property records)
    #[arg(long)]
    pub existing: Option<PathBuf>,

    /// Write the resolved contact set here as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write object-store property records instead of plain contacts
    #[arg(long)]
    pub properties: bool,
}

impl ImportArgs {
    pub fn options(&self, config: &ImportConfig) -> ImportOptions {
        ImportOptions {
            skip_duplicates: config.skip_duplicates && !self.keep_duplicates,
            merge: config.merge && !self.no_merge,
        }
    }
}

#[derive(Debug)]
pub struct ImportReport {
    pub lines: Vec<String>,
    pub summary: ImportSummary,
    pub total: usize,
}

pub fn run(args: &ImportArgs, config: &ImportConfig) -> Result<()> {
    let report = execute(args, config)?;

    for line in &report.lines {
        println!("{}", line);
    }
    println!();
    println!("{}", summary_line(&report.summary, report.total));

    Ok(())
}

pub fn execute(args: &ImportArgs, config: &ImportConfig) -> Result<ImportReport> {
    let incoming = super::read_inputs(&args.files);
    if incoming.is_empty() {
        bail!("No contacts found in provided files");
    }

    let existing = match &args.existing {
        Some(path) => super::read_stored(path)?,
        None => Vec::new(),
    };
    tracing::info!(
        "Resolving {} incoming against {} existing contact(s)",
        incoming.len(),
        existing.len()
    );

    let total = incoming.len();
    let mut session = ImportSession::new(existing, args.options(config));
    let mut lines = Vec::with_capacity(total);

    for contact in incoming {
        let name = contact.display_name();
        let outcome = session.import(contact);
        lines.push(outcome_line(&name, &outcome, session.index()));
    }

    for id in session.take_dirty() {
        if session.is_existing(id) {
            if let Some(contact) = session.index().get(id) {
                lines.push(format!("* {} {} needs update", id, contact.display_name()));
            }
        }
    }

    let summary = session.summary();

    if args.dry_run {
        lines.push("Dry run: nothing written".to_string());
    } else if let Some(output) = &args.output {
        let contacts = session.into_contacts();
        let json = if args.properties {
            let phone_keys = slot_keys("phone", config.phone_slots);
            let email_keys = slot_keys("email", config.email_slots);
            let records: Vec<PropertyRecord> = contacts
                .iter()
                .map(|c| build_record(c, &phone_keys, &email_keys))
                .collect();
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string_pretty(&contacts)?
        };

        std::fs::write(output, json)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        lines.push(format!("Wrote {} contact(s) to {}", contacts.len(), output.display()));
    }

    Ok(ImportReport {
        lines,
        summary,
        total,
    })
}

pub fn outcome_line(name: &str, outcome: &ImportOutcome, index: &ContactIndex) -> String {
    let target = |id| {
        index
            .get(id)
            .map(|c| c.display_name())
            .unwrap_or_default()
    };

    match outcome {
        ImportOutcome::Inserted(id) => format!("+ {} {}", id, name),
        ImportOutcome::Merged {
            into,
            reason,
            changed_fields,
        } if changed_fields.is_empty() => {
            format!("= {} into {} {} ({}, nothing new)", name, into, target(*into), reason)
        }
        ImportOutcome::Merged {
            into,
            reason,
            changed_fields,
        } => format!(
            "~ {} into {} {} ({}: {})",
            name,
            into,
            target(*into),
            reason,
            changed_fields.join(", ")
        ),
        ImportOutcome::Skipped {
            duplicate_of,
            reason,
        } => format!(
            "- {} duplicate of {} {} ({})",
            name,
            duplicate_of,
            target(*duplicate_of),
            reason
        ),
    }
}

/// Duplicates merged without adding anything count as skipped.
pub fn summary_line(summary: &ImportSummary, total: usize) -> String {
    format!(
        "Imported {}/{} contacts (merged {}, skipped {})",
        summary.inserted,
        total,
        summary.merged,
        summary.skipped + summary.unchanged
    )
}
