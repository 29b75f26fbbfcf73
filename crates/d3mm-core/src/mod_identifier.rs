//! Compact (name, version, version type) selection references.

use crate::compare::{eq_ignore_case, is_trimmed_non_empty};
use serde::{Deserialize, Serialize};

/// Identifies a (mod, version, version type) triple by display strings.
///
/// Used as the favourites key and as a compact selection reference.
/// `version`/`version_type` of `None` mean "any"; an explicit empty string
/// names the base version or unnamed type. Equality ignores ASCII case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModIdentifier {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(rename = "versionType", skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,
}

impl ModIdentifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            version_type: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_version_type(mut self, version_type: impl Into<String>) -> Self {
        self.version_type = Some(version_type.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        is_trimmed_non_empty(&self.name)
    }

    /// Display name: mod name, version, and type, where populated.
    pub fn full_name(&self) -> String {
        let mut full_name = self.name.clone();

        if let Some(version) = &self.version {
            if !version.is_empty() {
                full_name.push(' ');
                full_name.push_str(version);
            }
        }

        if let Some(version_type) = &self.version_type {
            if !version_type.is_empty() {
                full_name.push(' ');
                full_name.push_str(version_type);
            }
        }

        full_name
    }
}

impl PartialEq for ModIdentifier {
    fn eq(&self, other: &Self) -> bool {
        fn optional_eq(a: &Option<String>, b: &Option<String>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => eq_ignore_case(a, b),
                (None, None) => true,
                _ => false,
            }
        }

        eq_ignore_case(&self.name, &other.name)
            && optional_eq(&self.version, &other.version)
            && optional_eq(&self.version_type, &other.version_type)
    }
}

impl Eq for ModIdentifier {}

impl std::fmt::Display for ModIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
