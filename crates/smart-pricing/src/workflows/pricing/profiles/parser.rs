use super::ProfileImportError;
use crate::workflows::pricing::domain::UserProfile;
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;

pub(crate) const SHAPE_MARKER_FIELD: &str = "mockTestsTaken";

/// Check the document shape before any element is deserialized.
///
/// Only the first element is sampled for the marker field; every element is
/// still fully deserialized afterwards.
pub(crate) fn validate_shape(payload: &Value) -> Result<&[Value], ProfileImportError> {
    let items = payload
        .as_array()
        .ok_or(ProfileImportError::NotAnArray)?;
    let first = items.first().ok_or(ProfileImportError::Empty)?;

    let has_marker = first
        .as_object()
        .and_then(|object| object.get(SHAPE_MARKER_FIELD))
        .map(Value::is_number)
        .unwrap_or(false);
    if !has_marker {
        return Err(ProfileImportError::MissingMockTests);
    }

    Ok(items.as_slice())
}

pub(crate) fn profiles_from_value(payload: Value) -> Result<Vec<UserProfile>, ProfileImportError> {
    let items = validate_shape(&payload)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            UserProfile::deserialize(item)
                .map_err(|source| ProfileImportError::InvalidProfile { index, source })
        })
        .collect()
}

pub(crate) fn profiles_from_csv<R: Read>(reader: R) -> Result<Vec<UserProfile>, ProfileImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if !headers.iter().any(|header| header == SHAPE_MARKER_FIELD) {
        return Err(ProfileImportError::MissingMockTests);
    }

    let mut profiles = Vec::new();
    for (index, record) in csv_reader.deserialize::<UserProfile>().enumerate() {
        let profile = record.map_err(|source| ProfileImportError::InvalidRow { index, source })?;
        profiles.push(profile);
    }

    if profiles.is_empty() {
        return Err(ProfileImportError::Empty);
    }

    Ok(profiles)
}
