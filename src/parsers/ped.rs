use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use crate::family::{Family, Person};
use crate::parsers::open_file;

/// Parse a pedigree sample sheet into families, one per affected proband.
///
/// Whitespace-separated columns:
/// `family_id person_id dad_id mum_id sex affected vcf_path`
/// where a dad/mum id of `0` means the parent is not in the pedigree.
pub fn parse_ped(path: &Path) -> Result<Vec<Family>> {
    let reader = open_file(path)?;

    let mut members_by_family: HashMap<String, HashMap<String, Person>> = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            bail!(
                "{} line {}: expected 7 columns, found {}",
                path.display(),
                lineno + 1,
                fields.len()
            );
        }
        let person = Person::new(
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            fields[4],
            fields[5],
            Path::new(fields[6]),
        )
        .with_context(|| format!("{} line {}", path.display(), lineno + 1))?;
        members_by_family
            .entry(fields[0].to_string())
            .or_default()
            .insert(fields[1].to_string(), person);
    }

    // a proband is an affected member who is not themselves listed as a parent
    let mut families = Vec::new();
    for members in members_by_family.values() {
        let parent_ids: HashSet<&str> = members.values().flat_map(|p| p.parents()).collect();
        for person in members.values() {
            if !person.is_affected() || parent_ids.contains(person.id()) {
                continue;
            }
            let mum = members.get(person.mum_id()).cloned();
            let dad = members.get(person.dad_id()).cloned();
            families.push(Family::new(person.clone(), mum, dad));
        }
    }
    if families.is_empty() {
        bail!("no affected probands found in {}", path.display());
    }
    families.sort_by(|a, b| {
        (a.id(), a.proband().id()).cmp(&(b.id(), b.proband().id()))
    });
    Ok(families)
}
