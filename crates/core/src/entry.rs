//! Journal entry model, normalization, and validation.
//!
//! An [`Entry`] can only be obtained through [`Entry::new`], which trims
//! every field before validating it, so a stored entry always satisfies the
//! field invariants. Updates go through [`Entry::apply_patch`] and are held
//! to the same rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{EntryId, Timestamp};

/// Maximum length of each text field, counted in characters after trimming.
pub const MAX_FIELD_CHARS: usize = 256;

/// Current version of the serialized entry shape.
pub const ENTRY_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// The three free-text fields of a journal entry, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryField {
    /// What the user worked on today.
    Work,
    /// One thing the user struggled with today.
    Struggle,
    /// What the user intends to work on tomorrow.
    Intention,
}

impl EntryField {
    /// All fields in canonical order.
    pub const ALL: [EntryField; 3] = [EntryField::Work, EntryField::Struggle, EntryField::Intention];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryField::Work => "work",
            EntryField::Struggle => "struggle",
            EntryField::Intention => "intention",
        }
    }

    /// Human-readable label used when composing analysis input.
    pub fn label(self) -> &'static str {
        match self {
            EntryField::Work => "Work",
            EntryField::Struggle => "Struggle",
            EntryField::Intention => "Intention",
        }
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons an entry (or a patch to one) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryValidationError {
    /// The field is empty or whitespace-only.
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: EntryField },

    /// The trimmed field is longer than [`MAX_FIELD_CHARS`].
    #[error("Field '{field}' is {length} characters long (maximum {max})")]
    FieldTooLong {
        field: EntryField,
        length: usize,
        max: usize,
    },
}

impl EntryValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> EntryField {
        match self {
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => *field,
        }
    }
}

/// Trim a raw field value and check it against the field rules.
///
/// Trimming happens first, so `"  hello  "` and `"hello"` normalize to the
/// same stored value.
pub fn normalize_field(field: EntryField, raw: &str) -> Result<String, EntryValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EntryValidationError::EmptyField { field });
    }
    let length = trimmed.chars().count();
    if length > MAX_FIELD_CHARS {
        return Err(EntryValidationError::FieldTooLong {
            field,
            length,
            max: MAX_FIELD_CHARS,
        });
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A validated journal entry.
///
/// Fields are private so the trimming and length invariants cannot be
/// bypassed; use the accessors to read them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    id: EntryId,
    work: String,
    struggle: String,
    intention: String,
    schema_version: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Entry {
    /// Validate and normalize raw input into a new entry.
    ///
    /// Fields are checked in canonical order (`work`, `struggle`,
    /// `intention`) and the first failure is returned. On success the entry
    /// receives a fresh id and identical `created_at`/`updated_at` stamps.
    pub fn new(work: &str, struggle: &str, intention: &str) -> Result<Self, EntryValidationError> {
        let work = normalize_field(EntryField::Work, work)?;
        let struggle = normalize_field(EntryField::Struggle, struggle)?;
        let intention = normalize_field(EntryField::Intention, intention)?;
        let now = chrono::Utc::now();

        Ok(Self {
            id: EntryId::new_v4(),
            work,
            struggle,
            intention,
            schema_version: ENTRY_SCHEMA_VERSION,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn work(&self) -> &str {
        &self.work
    }

    pub fn struggle(&self) -> &str {
        &self.struggle
    }

    pub fn intention(&self) -> &str {
        &self.intention
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Value of a field by name.
    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::Work => &self.work,
            EntryField::Struggle => &self.struggle,
            EntryField::Intention => &self.intention,
        }
    }

    /// Apply a partial update.
    ///
    /// Every present field is validated before anything is written, so a
    /// rejected patch leaves the entry untouched. Returns `true` when at
    /// least one value changed, in which case `updated_at` is advanced.
    pub fn apply_patch(&mut self, patch: &EntryPatch) -> Result<bool, EntryValidationError> {
        let mut staged = Vec::with_capacity(3);
        for field in EntryField::ALL {
            if let Some(raw) = patch.get(field) {
                staged.push((field, normalize_field(field, raw)?));
            }
        }

        let mut changed = false;
        for (field, value) in staged {
            let slot = match field {
                EntryField::Work => &mut self.work,
                EntryField::Struggle => &mut self.struggle,
                EntryField::Intention => &mut self.intention,
            };
            if *slot != value {
                *slot = value;
                changed = true;
            }
        }

        if changed {
            // Must strictly advance, even on a coarse clock.
            self.updated_at = chrono::Utc::now()
                .max(self.updated_at + chrono::Duration::microseconds(1));
        }
        Ok(changed)
    }
}

// ---------------------------------------------------------------------------
// Patch
// ---------------------------------------------------------------------------

/// Partial update to an entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EntryPatch {
    pub work: Option<String>,
    pub struggle: Option<String>,
    pub intention: Option<String>,
}

impl EntryPatch {
    pub fn get(&self, field: EntryField) -> Option<&str> {
        match field {
            EntryField::Work => self.work.as_deref(),
            EntryField::Struggle => self.struggle.as_deref(),
            EntryField::Intention => self.intention.as_deref(),
        }
    }

    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.work.is_none() && self.struggle.is_none() && self.intention.is_none()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
