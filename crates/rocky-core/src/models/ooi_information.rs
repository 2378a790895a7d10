//! OOI information domain model.
//!
//! Descriptions of OOI types and values, keyed by `"<type>|<value>"` and
//! filled in lazily from an external information source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RockyError, RockyResult};

/// Separator between the OOI type and its natural key.
pub const SEPARATOR: &str = "|";

/// Maximum length of an OOI information id.
pub const OOI_INFORMATION_ID_LENGTH: usize = 256;

pub const DESCRIPTION_KEY: &str = "description";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OoiInformation {
    /// Composite id: `<type>|<value>`.
    pub id: String,
    /// `None` until first saved.
    pub data: Option<Map<String, Value>>,
    /// When set, the next save fetches fresh data first and clears the
    /// flag.
    pub consult_api: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl OoiInformation {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: None,
            consult_api: false,
            last_updated: None,
        }
    }

    pub fn from_parts(ooi_type: &str, value: &str) -> Self {
        Self::new(format!("{ooi_type}{SEPARATOR}{value}"))
    }

    /// Text before the first separator.
    pub fn ooi_type(&self) -> &str {
        self.id.split(SEPARATOR).next().unwrap_or_default()
    }

    /// Everything after the first separator, separators included.
    pub fn value(&self) -> &str {
        self.id
            .split_once(SEPARATOR)
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    /// The stored description, empty when none has been fetched.
    pub fn description(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|data| data.get(DESCRIPTION_KEY))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// True while the description is absent or the empty string. Any
    /// other stored value, `null` included, counts as filled in.
    pub fn needs_description(&self) -> bool {
        match self.data.as_ref().and_then(|data| data.get(DESCRIPTION_KEY)) {
            None => true,
            Some(Value::String(description)) => description.is_empty(),
            Some(_) => false,
        }
    }

    /// Make sure there is a payload to fill in.
    pub fn ensure_data(&mut self) -> &mut Map<String, Value> {
        self.data.get_or_insert_with(|| {
            let mut data = Map::new();
            data.insert(DESCRIPTION_KEY.into(), Value::String(String::new()));
            data
        })
    }

    /// Copy fetched fields into the payload, replacing existing keys.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        let data = self.ensure_data();
        for (key, value) in fields {
            data.insert(key, value);
        }
    }

    pub fn validate(&self) -> RockyResult<()> {
        if self.id.is_empty() {
            return Err(RockyError::validation("OOI information id must not be empty"));
        }
        if self.id.chars().count() > OOI_INFORMATION_ID_LENGTH {
            return Err(RockyError::validation(format!(
                "OOI information id must be at most {OOI_INFORMATION_ID_LENGTH} characters"
            )));
        }
        match &self.data {
            Some(data) if data.contains_key(DESCRIPTION_KEY) => Ok(()),
            _ => Err(RockyError::validation("Description is missing in data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_type_and_value() {
        let info = OoiInformation::new("Network|internet");
        assert_eq!(info.ooi_type(), "Network");
        assert_eq!(info.value(), "internet");
    }

    #[test]
    fn value_keeps_later_separators() {
        let info = OoiInformation::new("IPPort|internet|1.1.1.1|tcp|80");
        assert_eq!(info.ooi_type(), "IPPort");
        assert_eq!(info.value(), "internet|1.1.1.1|tcp|80");
    }

    #[test]
    fn id_without_separator_has_empty_value() {
        let info = OoiInformation::new("Finding");
        assert_eq!(info.ooi_type(), "Finding");
        assert_eq!(info.value(), "");
    }

    #[test]
    fn merge_overwrites_and_defaults_description() {
        let mut info = OoiInformation::from_parts("Port", "443");
        let fields = json!({"description": "HTTPS", "source": "iana"});
        let Value::Object(fields) = fields else { unreachable!() };
        info.merge(fields);
        assert_eq!(info.description(), "HTTPS");
        assert_eq!(info.data.as_ref().unwrap()["source"], "iana");
    }

    #[test]
    fn only_empty_or_absent_description_needs_fetching() {
        let mut info = OoiInformation::new("Port|22");
        assert!(info.needs_description());
        info.ensure_data();
        assert!(info.needs_description());

        let data = info.ensure_data();
        data.insert(DESCRIPTION_KEY.into(), Value::Null);
        assert!(!info.needs_description());
        assert_eq!(info.description(), "");

        info.merge(Map::from_iter([(DESCRIPTION_KEY.to_string(), json!("SSH"))]));
        assert!(!info.needs_description());
    }

    #[test]
    fn validation_requires_description() {
        let mut info = OoiInformation::new("Port|22");
        assert!(info.validate().is_err());
        info.ensure_data();
        assert!(info.validate().is_ok());
        info.data.as_mut().unwrap().remove(DESCRIPTION_KEY);
        assert!(info.validate().is_err());
    }
}
