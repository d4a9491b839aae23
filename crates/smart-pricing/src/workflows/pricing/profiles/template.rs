use crate::workflows::pricing::domain::{CityTier, DeviceType, InstallSource, UserProfile};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize template: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write template CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush template CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("template CSV is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Sample rows a caller can edit and feed back through the importer.
pub fn template_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            id: "U001".to_string(),
            name: Some("Engaged metro learner".to_string()),
            mock_tests_taken: 3,
            added_to_cart: true,
            page_visits: 4,
            device_type: DeviceType::Ios,
            city_tier: CityTier::Tier1,
            is_uninstalled: false,
            last_active_days: 0,
            competitor_signal: false,
            install_source: Some(InstallSource::Organic),
        },
        UserProfile {
            id: "U002".to_string(),
            name: Some("Lapsed comparison shopper".to_string()),
            mock_tests_taken: 3,
            added_to_cart: true,
            page_visits: 4,
            device_type: DeviceType::Android,
            city_tier: CityTier::Tier3,
            is_uninstalled: true,
            last_active_days: 45,
            competitor_signal: true,
            install_source: Some(InstallSource::Inorganic),
        },
        UserProfile {
            id: "U003".to_string(),
            name: Some("Casual browser".to_string()),
            mock_tests_taken: 0,
            added_to_cart: false,
            page_visits: 1,
            device_type: DeviceType::Web,
            city_tier: CityTier::Tier2,
            is_uninstalled: false,
            last_active_days: 3,
            competitor_signal: false,
            install_source: None,
        },
    ]
}

pub fn export_template_json() -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&template_profiles())?)
}

pub fn export_template_csv() -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for profile in template_profiles() {
            writer.serialize(profile)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8(buffer)?)
}
