use handle_errors::Error;
use uuid::Uuid;

/// Parses a path, query or body id. Malformed ids are rejected before the
/// store is touched.
pub fn parse_id(raw: &str, field: &'static str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::InvalidId(field))
}

/// Parses a list of ids, dropping duplicates while keeping first-seen order.
pub fn parse_ids(raw: &[String], field: &'static str) -> Result<Vec<Uuid>, Error> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(raw.len());
    for value in raw {
        let id = parse_id(value, field)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// A required text field must be present and not blank.
pub fn require(field: &'static str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingField(field)),
    }
}

/// Like `require`, but an absent field is allowed.
pub fn non_empty(field: &'static str, value: Option<String>) -> Result<Option<String>, Error> {
    value.map(|v| require(field, Some(v))).transpose()
}
