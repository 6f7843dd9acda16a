use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::TriageError;

/// One sequenced individual from the pedigree sample sheet.
///
/// A person may appear in more than one family when they are a parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    family_id: String,
    person_id: String,
    dad_id: String,
    mum_id: String,
    sex: String,
    x_count: u8,
    affected: bool,
    vcf_path: PathBuf,
}

impl Person {
    /// Build a person, converting the two-valued affected code to a bool.
    /// Any code other than '1' (unaffected) or '2' (affected) is rejected.
    pub fn new(
        family_id: &str,
        person_id: &str,
        dad_id: &str,
        mum_id: &str,
        sex: &str,
        affected: &str,
        vcf_path: &Path,
    ) -> Result<Self, TriageError> {
        let affected = match affected {
            "2" => true,
            "1" => false,
            other => return Err(TriageError::UnknownAffectedStatus(other.to_string())),
        };
        let x_count = sex.matches('X').count() as u8;

        Ok(Self {
            family_id: family_id.to_string(),
            person_id: person_id.to_string(),
            dad_id: dad_id.to_string(),
            mum_id: mum_id.to_string(),
            sex: sex.to_string(),
            x_count,
            affected,
            vcf_path: vcf_path.to_path_buf(),
        })
    }

    pub fn id(&self) -> &str {
        &self.person_id
    }

    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    pub fn mum_id(&self) -> &str {
        &self.mum_id
    }

    pub fn dad_id(&self) -> &str {
        &self.dad_id
    }

    pub fn sex(&self) -> &str {
        &self.sex
    }

    /// X chromosome count used by the hemizygous and X-linked filters
    pub fn x_count(&self) -> u8 {
        self.x_count
    }

    pub fn is_male(&self) -> bool {
        self.x_count == 1
    }

    pub fn is_affected(&self) -> bool {
        self.affected
    }

    pub fn vcf_path(&self) -> &Path {
        &self.vcf_path
    }

    /// Ids of parents present in the pedigree; "0" means no such parent
    pub fn parents(&self) -> Vec<&str> {
        let mut parent_ids = Vec::new();
        if self.mum_id != "0" {
            parent_ids.push(self.mum_id.as_str());
        }
        if self.dad_id != "0" {
            parent_ids.push(self.dad_id.as_str());
        }
        parent_ids
    }
}

/// Immutable trio: proband plus optional mum and dad.
///
/// Only the trio genotype assembler branches on the presence predicates;
/// everything downstream reads the assembled signatures instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Family {
    proband: Person,
    mum: Option<Person>,
    dad: Option<Person>,
}

impl Family {
    pub fn new(proband: Person, mum: Option<Person>, dad: Option<Person>) -> Self {
        Self { proband, mum, dad }
    }

    pub fn proband(&self) -> &Person {
        &self.proband
    }

    pub fn mum(&self) -> Option<&Person> {
        self.mum.as_ref()
    }

    pub fn dad(&self) -> Option<&Person> {
        self.dad.as_ref()
    }

    pub fn has_mum(&self) -> bool {
        self.mum.is_some()
    }

    pub fn has_dad(&self) -> bool {
        self.dad.is_some()
    }

    pub fn has_both_parents(&self) -> bool {
        self.mum.is_some() && self.dad.is_some()
    }

    pub fn has_no_parents(&self) -> bool {
        self.mum.is_none() && self.dad.is_none()
    }

    pub fn id(&self) -> &str {
        self.proband.family_id()
    }
}
