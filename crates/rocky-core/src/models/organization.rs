//! Organization domain model.
//!
//! Organizations are the root of Rocky's data model. Members,
//! indemnifications and jobs all point at an organization, and the
//! organization's `code` names its partitions in the Katalogus and in
//! Octopoes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RockyError, RockyResult};

/// Maximum length of an organization code.
pub const ORGANIZATION_CODE_LENGTH: usize = 32;

/// Maximum length of an organization name.
pub const ORGANIZATION_NAME_LENGTH: usize = 126;

/// A lower-case slug identifying an organization in URLs, paths and the
/// remote services.
///
/// Only unicode letters, digits, hyphens and underscores are accepted.
/// Upper-case input is folded to lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrganizationCode(String);

impl OrganizationCode {
    pub fn parse(raw: &str) -> RockyResult<Self> {
        let code = raw.trim().to_lowercase();

        if code.is_empty() {
            return Err(RockyError::validation("organization code must not be empty"));
        }
        if code.chars().count() > ORGANIZATION_CODE_LENGTH {
            return Err(RockyError::validation(format!(
                "organization code must be at most {ORGANIZATION_CODE_LENGTH} characters"
            )));
        }
        if let Some(c) = code
            .chars()
            .find(|c| !(c.is_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(RockyError::validation(format!(
                "organization code contains invalid character {c:?}: only letters, \
                 numbers, hyphens and underscores are allowed"
            )));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OrganizationCode {
    type Error = RockyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrganizationCode> for String {
    fn from(code: OrganizationCode) -> Self {
        code.0
    }
}

/// An organization whose assets are scanned and reported on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Unique human-readable name.
    pub name: String,
    /// Unique, immutable slug shared with the remote services.
    pub code: OrganizationCode,
    /// Lower-case tags.
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub code: OrganizationCode,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateOrganization {
    /// Check the name and normalize tags in place.
    pub fn validate(&mut self) -> RockyResult<()> {
        validate_name(&self.name)?;
        self.tags = normalize_tags(std::mem::take(&mut self.tags));
        Ok(())
    }
}

/// Fields that can be updated on an existing organization.
///
/// The code is immutable once the remote partitions exist.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateOrganization {
    pub fn validate(&mut self) -> RockyResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(tags) = self.tags.take() {
            self.tags = Some(normalize_tags(tags));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> RockyResult<()> {
    if name.trim().is_empty() {
        return Err(RockyError::validation("organization name must not be empty"));
    }
    if name.chars().count() > ORGANIZATION_NAME_LENGTH {
        return Err(RockyError::validation(format!(
            "organization name must be at most {ORGANIZATION_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Lower-case, trim and deduplicate tags, keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_lowercased() {
        let code = OrganizationCode::parse("Acme-Test").unwrap();
        assert_eq!(code.as_str(), "acme-test");
    }

    #[test]
    fn code_accepts_unicode_letters_and_underscores() {
        assert!(OrganizationCode::parse("gemeente_één").is_ok());
        assert!(OrganizationCode::parse("org_2024").is_ok());
    }

    #[test]
    fn code_rejects_invalid_input() {
        assert!(OrganizationCode::parse("").is_err());
        assert!(OrganizationCode::parse("has space").is_err());
        assert!(OrganizationCode::parse("slash/y").is_err());
        assert!(OrganizationCode::parse(&"a".repeat(33)).is_err());
        assert!(OrganizationCode::parse(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn code_deserialization_validates() {
        let ok: OrganizationCode = serde_json::from_str("\"ACME\"").unwrap();
        assert_eq!(ok.as_str(), "acme");
        assert!(serde_json::from_str::<OrganizationCode>("\"a b\"").is_err());
    }

    #[test]
    fn create_validation_normalizes_tags() {
        let mut input = CreateOrganization {
            name: "Acme".into(),
            code: OrganizationCode::parse("acme").unwrap(),
            tags: vec!["Prod".into(), " prod ".into(), "".into(), "Klant".into()],
        };
        input.validate().unwrap();
        assert_eq!(input.tags, vec!["prod".to_string(), "klant".to_string()]);
    }

    #[test]
    fn name_length_is_bounded() {
        let mut input = CreateOrganization {
            name: "x".repeat(127),
            code: OrganizationCode::parse("acme").unwrap(),
            tags: vec![],
        };
        assert!(matches!(
            input.validate(),
            Err(RockyError::Validation { .. })
        ));
    }
}
