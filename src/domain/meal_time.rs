use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealTime{
    Day,
    Night,
    #[default]
    Both,
}

impl MealTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealTime::Day => "day",
            MealTime::Night => "night",
            MealTime::Both => "both"
        }
    }

    /// Number of meals this entry contributes to a member's meal count.
    pub fn weight(self) -> u32 {
        match self {
            MealTime::Both => 2,
            MealTime::Day | MealTime::Night => 1
        }
    }
}

impl FromStr for MealTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(MealTime::Day),
            "night" => Ok(MealTime::Night),
            "both" => Ok(MealTime::Both),
            other => Err(format!("{} is not a valid meal time", other))
        }
    }
}
