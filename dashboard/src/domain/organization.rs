//! Department and designation lookups.
//!
//! Both are flat name lists used by form selects and as filter criteria for
//! the filtered user lookup. They share one record shape and differ only in
//! [`OrgUnitKind`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Which organisational list a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgUnitKind {
    /// Department list.
    Department,
    /// Designation list.
    Designation,
}

impl OrgUnitKind {
    /// Singular label used in notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Designation => "designation",
        }
    }
}

impl fmt::Display for OrgUnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Department or designation entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgUnit {
    /// Backend identifier.
    pub id: EntityId,
    /// Display name; also the value stored on users.
    pub name: String,
}

/// Raised when an organisational input is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgUnitValidationError {
    /// Name blank after trimming.
    EmptyName(OrgUnitKind),
    /// Import file had no content.
    EmptyFile,
    /// Import file name blank.
    MissingFileName,
}

impl fmt::Display for OrgUnitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName(kind) => write!(f, "Please enter {kind} name"),
            Self::EmptyFile => write!(f, "Please select a file to upload"),
            Self::MissingFileName => write!(f, "Upload file must have a name"),
        }
    }
}

impl std::error::Error for OrgUnitValidationError {}

/// Name for a new department or designation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrgUnit {
    kind: OrgUnitKind,
    name: String,
}

impl NewOrgUnit {
    /// Validate a name for the given list.
    pub fn try_new(kind: OrgUnitKind, name: &str) -> Result<Self, OrgUnitValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(OrgUnitValidationError::EmptyName(kind));
        }
        Ok(Self {
            kind,
            name: trimmed.to_owned(),
        })
    }

    /// Target list.
    pub fn kind(&self) -> OrgUnitKind {
        self.kind
    }

    /// Entry name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Spreadsheet forwarded unparsed to a bulk import endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ImportFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl ImportFile {
    /// Wrap file content for upload.
    pub fn try_new(file_name: &str, bytes: Vec<u8>) -> Result<Self, OrgUnitValidationError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(OrgUnitValidationError::MissingFileName);
        }
        if bytes.is_empty() {
            return Err(OrgUnitValidationError::EmptyFile);
        }
        Ok(Self {
            file_name: file_name.to_owned(),
            bytes,
        })
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for ImportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
