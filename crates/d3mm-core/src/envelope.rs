//! Top-level document envelope validation.
//!
//! Every persisted JSON document carries `fileType` and
//! `fileFormatVersion`. The format version is a semver string; loaders
//! refuse any version other than the one they were built for, so a newer
//! manager never mangles an older file and vice versa.

use crate::compare::eq_ignore_case;
use crate::error::CatalogError;
use serde_json::{Map, Value};

/// Verify `fileType` and `fileFormatVersion`.
pub(crate) fn check(
    object: &Map<String, Value>,
    expected_file_type: &str,
    expected_format_version: &str,
    path: &str,
) -> Result<(), CatalogError> {
    let file_type = crate::json::require_non_empty_string(object, "fileType", path)?;

    if !eq_ignore_case(&file_type, expected_file_type) {
        return Err(CatalogError::schema(
            format!("{path}.fileType"),
            format!("expected '{expected_file_type}', found '{file_type}'"),
        ));
    }

    let format_version = crate::json::require_non_empty_string(object, "fileFormatVersion", path)?;

    let found = semver::Version::parse(&format_version).map_err(|error| {
        CatalogError::schema(
            format!("{path}.fileFormatVersion"),
            format!("bad semver '{format_version}': {error}"),
        )
    })?;

    // The expected string is a compile-time constant; a parse failure here
    // is a programming error.
    let expected = semver::Version::parse(expected_format_version).map_err(|error| {
        CatalogError::schema(
            format!("{path}.fileFormatVersion"),
            format!("bad expected semver '{expected_format_version}': {error}"),
        )
    })?;

    if found != expected {
        return Err(CatalogError::FormatVersionMismatch {
            found: format_version,
            expected: expected_format_version.to_string(),
        });
    }

    Ok(())
}
