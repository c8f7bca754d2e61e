use anyhow::Result;
use clap::Args;
use resolver::normalize::UNNAMED_NAME_KEY;
use resolver::{compare, normalize_name};
use shared_types::{Address, Contact};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// vCard files (or JSON contact snapshots) to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Only show names containing this text (compared after normalization)
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

pub fn run(args: &DiffArgs) -> Result<()> {
    let contacts = super::read_inputs(&args.files);
    if contacts.is_empty() {
        println!("No contacts found");
        return Ok(());
    }

    print!("{}", render(&contacts, args.name.as_deref())?);
    Ok(())
}

/// Groups contacts by normalized display name and renders every group with
/// more than one member. Unnamed contacts are never grouped.
pub fn render(contacts: &[Contact], name_filter: Option<&str>) -> Result<String> {
    let filter = name_filter.map(normalize_name).filter(|f| !f.is_empty());
    if let (Some(raw), Some(normalized)) = (name_filter, &filter) {
        tracing::debug!("Filter {:?} normalized to {:?}", raw, normalized);
    }

    let mut by_name: BTreeMap<String, Vec<&Contact>> = BTreeMap::new();
    for contact in contacts {
        let key = normalize_name(&contact.display_name());
        if key.is_empty() || key == UNNAMED_NAME_KEY {
            continue;
        }
        if let Some(filter) = &filter {
            if !key.contains(filter.as_str()) {
                continue;
            }
        }
        by_name.entry(key).or_default().push(contact);
    }

    let mut out = String::new();
    let groups: Vec<&Vec<&Contact>> = by_name.values().filter(|g| g.len() > 1).collect();

    if groups.is_empty() {
        writeln!(out, "No duplicate contacts found")?;
        return Ok(out);
    }

    for group in groups {
        writeln!(out, "=== {} ({} contacts) ===", group[0].display_name(), group.len())?;

        for (i, contact) in group.iter().enumerate() {
            writeln!(out)?;
            match &contact.object_id {
                Some(id) => writeln!(out, "[{}] ID: {}", i + 1, id)?,
                None => writeln!(out, "[{}]", i + 1)?,
            }
            write_contact(&mut out, contact)?;
        }

        writeln!(out, "\n--- Differences ---")?;
        let base = group[0];
        for (i, other) in group.iter().enumerate().skip(1) {
            writeln!(out, "\n[1] vs [{}]: {} match", i + 1, compare(base, other))?;
            write_diff(&mut out, base, other)?;
        }
        writeln!(out)?;
    }

    Ok(out)
}

fn write_contact(out: &mut String, c: &Contact) -> std::fmt::Result {
    if !c.given_name.is_empty() || !c.family_name.is_empty() {
        writeln!(out, "  Name: {} {}", c.given_name, c.family_name)?;
    }
    if !c.organization.is_empty() {
        writeln!(out, "  Organization: {}", c.organization)?;
    }
    if !c.title.is_empty() {
        writeln!(out, "  Title: {}", c.title)?;
    }
    for (i, phone) in c.phones.iter().enumerate() {
        writeln!(out, "  Phone {}: {}", i + 1, phone)?;
    }
    for (i, email) in c.emails.iter().enumerate() {
        writeln!(out, "  Email {}: {}", i + 1, email)?;
    }
    let address = first_address(c);
    if !address.is_empty() {
        writeln!(out, "  Address: {}", address)?;
    }
    for (i, url) in c.urls.iter().enumerate() {
        writeln!(out, "  URL {}: {}", i + 1, url)?;
    }
    if !c.birthday.is_empty() {
        writeln!(out, "  Birthday: {}", c.birthday)?;
    }
    if !c.note.is_empty() {
        writeln!(out, "  Note: {}", truncate(&c.note, 50))?;
    }
    Ok(())
}

fn write_diff(out: &mut String, a: &Contact, b: &Contact) -> std::fmt::Result {
    let fields = [
        ("GivenName", &a.given_name, &b.given_name),
        ("FamilyName", &a.family_name, &b.family_name),
        ("MiddleName", &a.middle_name, &b.middle_name),
        ("Prefix", &a.prefix, &b.prefix),
        ("Suffix", &a.suffix, &b.suffix),
        ("Organization", &a.organization, &b.organization),
        ("Title", &a.title, &b.title),
        ("Birthday", &a.birthday, &b.birthday),
    ];
    for (name, left, right) in fields {
        diff_field(out, name, left, right)?;
    }

    diff_list(out, "Phones", &a.phones, &b.phones)?;
    diff_list(out, "Emails", &a.emails, &b.emails)?;
    diff_list(out, "URLs", &a.urls, &b.urls)?;

    diff_field(out, "Address", &first_address(a), &first_address(b))?;
    diff_field(out, "Note", &truncate(&a.note, 30), &truncate(&b.note, 30))
}

fn diff_field(out: &mut String, name: &str, a: &str, b: &str) -> std::fmt::Result {
    if a == b {
        return Ok(());
    }
    match (a.is_empty(), b.is_empty()) {
        (true, _) => writeln!(out, "  {}: (empty) -> {:?}", name, b),
        (_, true) => writeln!(out, "  {}: {:?} -> (empty)", name, a),
        _ => writeln!(out, "  {}: {:?} -> {:?}", name, a, b),
    }
}

fn diff_list(out: &mut String, name: &str, a: &[String], b: &[String]) -> std::fmt::Result {
    let in_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let in_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    for value in a.iter().filter(|v| !in_b.contains(v.as_str())) {
        writeln!(out, "  {}: -{}", name, value)?;
    }
    for value in b.iter().filter(|v| !in_a.contains(v.as_str())) {
        writeln!(out, "  {}: +{}", name, value)?;
    }
    Ok(())
}

fn first_address(c: &Contact) -> String {
    c.addresses
        .first()
        .map(Address::parts)
        .unwrap_or_default()
        .join(", ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars).collect();
    short.push_str("...");
    short
}
