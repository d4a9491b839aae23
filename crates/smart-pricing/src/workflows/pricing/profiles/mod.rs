mod generator;
mod parser;
mod template;

pub use generator::generate_profiles;
pub use template::{export_template_csv, export_template_json, template_profiles, ExportError};

use crate::workflows::pricing::domain::UserProfile;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Reasons a candidate profile collection is refused.
#[derive(Debug, thiserror::Error)]
pub enum ProfileImportError {
    #[error("import payload must be a JSON array of user profiles")]
    NotAnArray,
    #[error("import payload contains no user profiles")]
    Empty,
    #[error("first profile is missing a numeric `mockTestsTaken` field")]
    MissingMockTests,
    #[error("profile at index {index} is malformed: {source}")]
    InvalidProfile {
        index: usize,
        source: serde_json::Error,
    },
    #[error("csv row {index} is malformed: {source}")]
    InvalidRow { index: usize, source: csv::Error },
    #[error("import payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads serialized profile documents.
pub struct ProfileImporter;

impl ProfileImporter {
    pub fn from_json_str(payload: &str) -> Result<Vec<UserProfile>, ProfileImportError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(payload: Value) -> Result<Vec<UserProfile>, ProfileImportError> {
        parser::profiles_from_value(payload)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Vec<UserProfile>, ProfileImportError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<UserProfile>, ProfileImportError> {
        parser::profiles_from_csv(reader)
    }

    /// Load a `.csv` file as CSV and anything else as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<UserProfile>, ProfileImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            Self::from_csv_reader(file)
        } else {
            Self::from_json_reader(std::io::BufReader::new(file))
        }
    }
}

/// Currently loaded population. Replacement is all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSet {
    profiles: Vec<UserProfile>,
}

impl ProfileSet {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[UserProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn into_inner(self) -> Vec<UserProfile> {
        self.profiles
    }

    pub fn replace(&mut self, profiles: Vec<UserProfile>) -> usize {
        self.profiles = profiles;
        self.profiles.len()
    }

    /// Swap in an imported document; on error the current profiles stay loaded.
    pub fn replace_from_json(&mut self, payload: &str) -> Result<usize, ProfileImportError> {
        self.replace_with(ProfileImporter::from_json_str(payload))
    }

    pub fn replace_from_value(&mut self, payload: Value) -> Result<usize, ProfileImportError> {
        self.replace_with(ProfileImporter::from_value(payload))
    }

    pub fn replace_from_csv<R: Read>(&mut self, reader: R) -> Result<usize, ProfileImportError> {
        self.replace_with(ProfileImporter::from_csv_reader(reader))
    }

    fn replace_with(
        &mut self,
        imported: Result<Vec<UserProfile>, ProfileImportError>,
    ) -> Result<usize, ProfileImportError> {
        match imported {
            Ok(profiles) => {
                let count = self.replace(profiles);
                info!(count, "profile import accepted");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, retained = self.profiles.len(), "profile import rejected");
                Err(err)
            }
        }
    }
}
