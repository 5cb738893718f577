// 🧾 Party Database - address book + private marks
// Two JSON files, both read fresh on every call:
//
//   addresses.json     { "<party name>": ["<address>", "<tin>"] }
//   pvtaddresses.json  { "<private mark>": "<party name>" }
//
// Private marks keep their file order. When several marks point at the same
// party, the first one wins in the GST code report.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::files::write_atomic;

// ============================================================================
// PARTY RECORD
// ============================================================================

/// Address + TIN for one party. Stored on disk as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct PartyRecord {
    pub address: String,
    pub tin: String,
}

impl PartyRecord {
    pub fn new(address: impl Into<String>, tin: impl Into<String>) -> Self {
        PartyRecord {
            address: address.into(),
            tin: tin.into(),
        }
    }
}

impl From<(String, String)> for PartyRecord {
    fn from((address, tin): (String, String)) -> Self {
        PartyRecord { address, tin }
    }
}

impl From<PartyRecord> for (String, String) {
    fn from(record: PartyRecord) -> Self {
        (record.address, record.tin)
    }
}

/// Mapping A, sorted by party name.
pub type Addresses = BTreeMap<String, PartyRecord>;

// ============================================================================
// PRIVATE MARKS
// ============================================================================

/// Mapping B: private mark -> party, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivateMarks {
    entries: Vec<(String, String)>,
}

impl PrivateMarks {
    pub fn new() -> Self {
        PrivateMarks::default()
    }

    /// Parse the JSON object form, keeping key order.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Map<String, Value> =
            serde_json::from_str(content).context("Private marks must be a JSON object")?;

        let mut marks = PrivateMarks::new();
        for (mark, target) in raw {
            match target {
                Value::String(target) => marks.entries.push((mark, target)),
                other => bail!("Private mark '{}' maps to a non-string value: {}", mark, other),
            }
        }
        Ok(marks)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut raw = Map::new();
        for (mark, target) in &self.entries {
            raw.insert(mark.clone(), Value::String(target.clone()));
        }
        serde_json::to_string(&raw).context("Failed to serialize private marks")
    }

    /// Insert or repoint a mark. An existing mark keeps its position.
    pub fn set(&mut self, mark: impl Into<String>, target: impl Into<String>) {
        let mark = mark.into();
        let target = target.into();
        match self.entries.iter_mut().find(|(m, _)| *m == mark) {
            Some(entry) => entry.1 = target,
            None => self.entries.push((mark, target)),
        }
    }

    pub fn get(&self, mark: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| m == mark)
            .map(|(_, target)| target.as_str())
    }

    pub fn marks(&self) -> Vec<String> {
        self.entries.iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, t)| (m.as_str(), t.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<M: Into<String>, T: Into<String>> FromIterator<(M, T)> for PrivateMarks {
    fn from_iter<I: IntoIterator<Item = (M, T)>>(iter: I) -> Self {
        let mut marks = PrivateMarks::new();
        for (mark, target) in iter {
            marks.set(mark, target);
        }
        marks
    }
}

// ============================================================================
// FILE ACCESS
// ============================================================================

pub fn load_addresses(path: &Path) -> Result<Addresses> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read address book: {:?}", path))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse address book: {:?}", path))
}

pub fn load_private_marks(path: &Path) -> Result<PrivateMarks> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read private marks: {:?}", path))?;

    PrivateMarks::from_json(&content)
        .with_context(|| format!("Failed to parse private marks: {:?}", path))
}

// ============================================================================
// PARTY DATABASE
// ============================================================================

/// Read/write access to the two party files.
pub struct PartyDatabase {
    addresses_path: PathBuf,
    marks_path: PathBuf,
}

impl PartyDatabase {
    pub fn new(addresses_path: impl Into<PathBuf>, marks_path: impl Into<PathBuf>) -> Self {
        PartyDatabase {
            addresses_path: addresses_path.into(),
            marks_path: marks_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        PartyDatabase::new(config.addresses_path(), config.private_marks_path())
    }

    pub fn addresses(&self) -> Result<Addresses> {
        load_addresses(&self.addresses_path)
    }

    pub fn private_marks(&self) -> Result<PrivateMarks> {
        load_private_marks(&self.marks_path)
    }

    /// Address + TIN for a party, if it is known.
    pub fn party_details(&self, name: &str) -> Result<Option<PartyRecord>> {
        Ok(self.addresses()?.remove(name))
    }

    /// Create or overwrite a party, optionally pointing a private mark at it.
    pub fn set_party_details(
        &self,
        name: &str,
        address: &str,
        tin: &str,
        mark: Option<&str>,
    ) -> Result<()> {
        // Edit the raw object so existing parties keep their file order;
        // a new party is appended.
        let mut raw = if self.addresses_path.exists() {
            let content = fs::read_to_string(&self.addresses_path).with_context(|| {
                format!("Failed to read address book: {:?}", self.addresses_path)
            })?;
            serde_json::from_str::<Addresses>(&content).with_context(|| {
                format!("Failed to parse address book: {:?}", self.addresses_path)
            })?;
            serde_json::from_str::<Map<String, Value>>(&content).with_context(|| {
                format!("Failed to parse address book: {:?}", self.addresses_path)
            })?
        } else {
            Map::new()
        };
        let record = serde_json::to_value(PartyRecord::new(address, tin))
            .context("Failed to serialize party record")?;
        raw.insert(name.to_string(), record);

        let json = serde_json::to_string(&raw).context("Failed to serialize address book")?;
        write_atomic(&self.addresses_path, json.as_bytes())
            .with_context(|| format!("Failed to write address book: {:?}", self.addresses_path))?;

        tracing::info!(party = name, tin, "Saved party details");

        if let Some(mark) = mark {
            self.set_private_mark(name, mark)?;
        }
        Ok(())
    }

    /// Point `mark` at `name`.
    pub fn set_private_mark(&self, name: &str, mark: &str) -> Result<()> {
        let mut marks = if self.marks_path.exists() {
            self.private_marks()?
        } else {
            PrivateMarks::new()
        };
        marks.set(mark, name);

        write_atomic(&self.marks_path, marks.to_json()?.as_bytes())
            .with_context(|| format!("Failed to write private marks: {:?}", self.marks_path))?;

        tracing::info!(party = name, mark, "Saved private mark");
        Ok(())
    }

    pub fn name_by_mark(&self, mark: &str) -> Result<Option<String>> {
        Ok(self.private_marks()?.get(mark).map(str::to_string))
    }

    pub fn all_marks(&self) -> Result<Vec<String>> {
        Ok(self.private_marks()?.marks())
    }
}

// ============================================================================
// TESTS
// ============================================================================
