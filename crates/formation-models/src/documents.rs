//! Documents and their immutable version history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Version string used for the first version of every document.
pub const INITIAL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub document_type_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of a document's title and content.
///
/// Exactly one version per document carries `is_current = true`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DocumentVersion {
    pub id: Uuid,
    pub document_id: Uuid,
    pub version: String,
    pub title: String,
    pub content: String,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocumentDto {
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    pub content: String,
    pub document_type_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentDto {
    #[validate(length(min = 1, max = 250))]
    pub title: Option<String>,
    pub content: Option<String>,
    /// Bump the major version instead of the minor one.
    #[serde(default)]
    pub major: bool,
}

/// Which component of a `MAJOR.MINOR.PATCH` version string to bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
}

/// Bumps a `MAJOR.MINOR.PATCH` version string.
///
/// Returns `None` when `current` is not three dot-separated integers.
#[must_use]
pub fn bump_version(current: &str, bump: VersionBump) -> Option<String> {
    let mut parts = current.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next()?.parse().ok()?;
    let _patch: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    Some(match bump {
        VersionBump::Major => format!("{}.0.0", major + 1),
        VersionBump::Minor => format!("{}.{}.0", major, minor + 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_minor() {
        assert_eq!(bump_version("1.0.0", VersionBump::Minor), Some("1.1.0".into()));
        assert_eq!(bump_version("2.9.3", VersionBump::Minor), Some("2.10.0".into()));
    }

    #[test]
    fn test_bump_major() {
        assert_eq!(bump_version("1.4.2", VersionBump::Major), Some("2.0.0".into()));
    }

    #[test]
    fn test_bump_rejects_malformed() {
        assert_eq!(bump_version("1.0", VersionBump::Minor), None);
        assert_eq!(bump_version("1.0.0.0", VersionBump::Minor), None);
        assert_eq!(bump_version("a.b.c", VersionBump::Major), None);
        assert_eq!(bump_version("", VersionBump::Minor), None);
    }
}
