//! Identity table: raw source identifiers to providers, clinics and the
//! organization.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::util::open_reference_table;
use crate::error::{ReportError, Result};
use crate::reader::read_rows_from_file;
use crate::schema::NAMES_COLUMNS;

/// Kind of entity a row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    /// A single provider
    Individual,
    /// A clinic
    Clinic,
    /// The organization-wide rollup
    Organization,
}

impl EntityType {
    /// Label used in output documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Clinic => "Clinic",
            Self::Organization => "Organization",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    /// Parse an identity table `Type` cell
    ///
    /// The organization row is labelled `FCN` in existing tables;
    /// `Organization` is accepted as well.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "clinic" => Ok(Self::Clinic),
            "fcn" | "organization" | "organisation" => Ok(Self::Organization),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

/// Resolved identity of a raw source identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Canonical display name
    pub name: String,
    /// Entity type
    pub entity_type: EntityType,
    /// Owning clinic, only ever set for individuals
    pub clinic: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamesRow {
    #[serde(rename = "MeridiosName")]
    key: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Type")]
    entity_type: Option<String>,
    #[serde(rename = "Clinic")]
    clinic: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Sort key placing providers by surname, the second word of the name
#[must_use]
pub fn surname_key(name: &str) -> (&str, &str) {
    let surname = name.split_whitespace().nth(1).unwrap_or(name);
    (surname, name)
}

/// Immutable mapping from raw identifier to [`Identity`]
#[derive(Debug, Clone, Default)]
pub struct IdentityTable {
    entries: FxHashMap<String, Identity>,
    by_name: FxHashMap<String, Identity>,
}

impl IdentityTable {
    /// Load the identity table from a CSV file
    ///
    /// # Errors
    /// Fails if the file is missing, lacks a required column, repeats a key,
    /// or contains a row without name or with an unknown type.
    pub fn load(path: &Path) -> Result<Self> {
        let file = open_reference_table(path)?;
        let rows: Vec<NamesRow> = read_rows_from_file(path, file, &NAMES_COLUMNS)?;

        let mut table = Self::default();
        for row in rows {
            let Some(key) = non_blank(row.key) else {
                continue;
            };
            let identity = Self::identity_from_row(&key, row.name, row.entity_type, row.clinic)?;
            if table.entries.contains_key(&key) {
                return Err(ReportError::DuplicateReferenceKey {
                    path: path.to_path_buf(),
                    key,
                });
            }
            table.insert(key, identity)?;
        }

        log::info!(
            "Loaded {} identities ({} distinct entities) from {}",
            table.entries.len(),
            table.by_name.len(),
            path.display()
        );
        Ok(table)
    }

    /// Build a table from already resolved entries
    ///
    /// # Errors
    /// Fails on a repeated key or on two keys that name the same entity with
    /// a different type or clinic.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Identity)>,
    {
        let mut table = Self::default();
        for (key, identity) in entries {
            if table.entries.contains_key(&key) {
                return Err(ReportError::InvalidReferenceRow {
                    key,
                    reason: "duplicate key".to_string(),
                });
            }
            table.insert(key, identity)?;
        }
        Ok(table)
    }

    fn identity_from_row(
        key: &str,
        name: Option<String>,
        entity_type: Option<String>,
        clinic: Option<String>,
    ) -> Result<Identity> {
        let invalid = |reason: String| ReportError::InvalidReferenceRow {
            key: key.to_string(),
            reason,
        };

        let name = non_blank(name).ok_or_else(|| invalid("missing Name".to_string()))?;
        let entity_type = non_blank(entity_type)
            .ok_or_else(|| invalid("missing Type".to_string()))?
            .parse::<EntityType>()
            .map_err(invalid)?;
        let clinic = match entity_type {
            EntityType::Individual => non_blank(clinic),
            EntityType::Clinic | EntityType::Organization => None,
        };

        Ok(Identity {
            name,
            entity_type,
            clinic,
        })
    }

    fn insert(&mut self, key: String, identity: Identity) -> Result<()> {
        match self.by_name.get(&identity.name) {
            Some(existing) if existing != &identity => {
                return Err(ReportError::InvalidReferenceRow {
                    key,
                    reason: format!(
                        "'{}' is already defined with a different type or clinic",
                        identity.name
                    ),
                });
            }
            Some(_) => {}
            None => {
                self.by_name.insert(identity.name.clone(), identity.clone());
            }
        }
        self.entries.insert(key, identity);
        Ok(())
    }

    /// Resolve a raw source identifier
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<&Identity> {
        self.entries.get(raw.trim())
    }

    /// Look up an entity by canonical name
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Identity> {
        self.by_name.get(name)
    }

    /// Number of raw identifiers in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All individual providers, sorted by surname
    #[must_use]
    pub fn individuals(&self) -> Vec<&Identity> {
        self.by_name
            .values()
            .filter(|identity| identity.entity_type == EntityType::Individual)
            .sorted_by(|a, b| surname_key(&a.name).cmp(&surname_key(&b.name)))
            .collect_vec()
    }

    /// Names of the individual providers owned by a clinic, sorted by surname
    #[must_use]
    pub fn providers_of_clinic(&self, clinic: &str) -> Vec<String> {
        self.individuals()
            .into_iter()
            .filter(|identity| identity.clinic.as_deref() == Some(clinic))
            .map(|identity| identity.name.clone())
            .collect_vec()
    }
}
