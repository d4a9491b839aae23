use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform the user was last seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "iOS")]
    Ios,
    Android,
    Web,
}

impl DeviceType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Ios, Self::Android, Self::Web]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Web => "Web",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "web" => Ok(Self::Web),
            other => Err(format!(
                "unknown device type '{other}' (expected iOS, Android or Web)"
            )),
        }
    }
}

/// City income tier; tier 1 is the highest-income metro band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CityTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CityTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Tier1, Self::Tier2, Self::Tier3]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::Tier1 => 1,
            Self::Tier2 => 2,
            Self::Tier3 => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1 (Metro)",
            Self::Tier2 => "Tier 2",
            Self::Tier3 => "Tier 3 (Rural)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("city tier must be 1, 2 or 3 (got {0})")]
pub struct InvalidCityTier(pub u8);

impl TryFrom<u8> for CityTier {
    type Error = InvalidCityTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Tier1),
            2 => Ok(Self::Tier2),
            3 => Ok(Self::Tier3),
            other => Err(InvalidCityTier(other)),
        }
    }
}

impl From<CityTier> for u8 {
    fn from(tier: CityTier) -> Self {
        tier.number()
    }
}

/// Acquisition channel. Carried for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallSource {
    Organic,
    Inorganic,
}

/// Observable attributes of one user at scoring time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub mock_tests_taken: u32,
    pub added_to_cart: bool,
    pub page_visits: u32,
    pub device_type: DeviceType,
    pub city_tier: CityTier,
    pub is_uninstalled: bool,
    pub last_active_days: u32,
    pub competitor_signal: bool,
    #[serde(default)]
    pub install_source: Option<InstallSource>,
}

/// Normalized signals derived from a single profile, rounded to hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScores {
    pub intent_score: f64,
    pub affordability_score: f64,
    pub churn_score: f64,
}

/// Reason code for the policy rule that produced a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    WinBack,
    PriceSensitiveRetention,
    ConversionNudge,
    ClosingTheDeal,
    Standard,
}

impl DiscountTier {
    /// Tiers in policy evaluation order.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::WinBack,
            Self::PriceSensitiveRetention,
            Self::ConversionNudge,
            Self::ClosingTheDeal,
            Self::Standard,
        ]
    }

    pub const fn discount(self) -> u8 {
        match self {
            Self::WinBack => 75,
            Self::PriceSensitiveRetention => 70,
            Self::ConversionNudge => 65,
            Self::ClosingTheDeal => 45,
            Self::Standard => 0,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::WinBack => "High Churn Risk + High Intent (Win-back priority)",
            Self::PriceSensitiveRetention => {
                "High Churn Risk + Low Affordability (Price sensitive retention)"
            }
            Self::ConversionNudge => "High Intent + Low Affordability (Conversion nudge)",
            Self::ClosingTheDeal => "High Intent (Closing the deal)",
            Self::Standard => "Standard pricing applied.",
        }
    }
}

/// Discount decision for one profile along with the scores that drove it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDecision {
    pub discount: u8,
    pub tier: DiscountTier,
    pub reason: String,
    pub scores: UserScores,
}

impl PricingDecision {
    pub fn from_tier(tier: DiscountTier, scores: UserScores) -> Self {
        Self {
            discount: tier.discount(),
            tier,
            reason: tier.reason().to_string(),
            scores,
        }
    }
}

/// Simulated outcome for one profile in a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(flatten)]
    pub decision: PricingDecision,
    pub converted: bool,
}
