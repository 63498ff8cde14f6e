//! Operator profiles and the features each one may use.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    LotteryManagement,
    GasAndDiesel,
    MoneyManagement,
    SalesManagement,
    SalesTotals,
    InHandCalculations,
    ViewData,
    Download,
}

impl Feature {
    pub const ALL: [Feature; 8] = [
        Feature::LotteryManagement,
        Feature::GasAndDiesel,
        Feature::MoneyManagement,
        Feature::SalesManagement,
        Feature::SalesTotals,
        Feature::InHandCalculations,
        Feature::ViewData,
        Feature::Download,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Feature::LotteryManagement => "Lottery Management",
            Feature::GasAndDiesel => "Gas and Diesel",
            Feature::MoneyManagement => "Money Management",
            Feature::SalesManagement => "Sales Management",
            Feature::SalesTotals => "Sales Totals",
            Feature::InHandCalculations => "In Hand Calculations",
            Feature::ViewData => "View Data",
            Feature::Download => "Download",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who is running the shift. Selects the feature set, it is not a credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Manager,
    Clerk,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Manager, Profile::Clerk];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Manager => "manager",
            Profile::Clerk => "clerk",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "manager" => Some(Profile::Manager),
            "clerk" => Some(Profile::Clerk),
            _ => None,
        }
    }

    pub fn allows(self, feature: Feature) -> bool {
        match self {
            Profile::Manager => true,
            Profile::Clerk => !matches!(feature, Feature::LotteryManagement | Feature::GasAndDiesel),
        }
    }

    pub fn features(self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|feature| self.allows(*feature))
            .collect()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
