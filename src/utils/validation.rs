use crate::domain::model::OutputTarget;
use crate::utils::error::{FeedError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> FeedError {
    FeedError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The psrcat query form is only reachable over http(s) and must name a host.
pub fn validate_catalogue_endpoint(field: &str, endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid(field, endpoint, format!("not a catalogue URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("catalogue must be queried over http(s), not {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, endpoint, "catalogue URL has no host"));
    }
    Ok(url)
}

/// Versions look like `2.6.1`.
pub fn validate_catalogue_version(field: &str, version: &str) -> Result<()> {
    let well_formed = !version.is_empty()
        && version
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));

    if !well_formed {
        return Err(invalid(field, version, "expected a dotted version such as 2.6.1"));
    }
    Ok(())
}

/// Catalogue parameter names are plain identifiers such as `P0`, `PSRJ` or `PEPOCH`.
pub fn validate_field_names(field: &str, names: &[String]) -> Result<()> {
    for name in names {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid(
                field,
                name,
                "catalogue field names may only contain letters, digits and '_'",
            ));
        }
    }
    Ok(())
}

pub fn validate_record_limit(field: &str, limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(invalid(field, limit, "at least one record must be written"));
    }
    Ok(())
}

pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(invalid(field, seconds, "a zero timeout would fail every request"));
    }
    Ok(())
}

/// `-` selects stdout; anything else must be a usable file path, not a directory.
pub fn validate_output_target(field: &str, path: &str) -> Result<()> {
    match OutputTarget::parse(path) {
        OutputTarget::Stdout => Ok(()),
        OutputTarget::File(file) => {
            if file.trim().is_empty() {
                Err(invalid(field, path, "output path cannot be empty"))
            } else if file.contains('\0') {
                Err(invalid(field, path, "output path contains null bytes"))
            } else if file.ends_with('/') || file.ends_with('\\') {
                Err(invalid(field, path, "output path names a directory, not a JSON file"))
            } else {
                Ok(())
            }
        }
    }
}
