use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::pagination::Identified;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrailerType {
    Official,
    Teaser,
    #[serde(rename = "Behind the Scenes")]
    BehindTheScenes,
    #[serde(rename = "Fan Made")]
    FanMade,
}

impl Display for TrailerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrailerType::Official => "Official",
            TrailerType::Teaser => "Teaser",
            TrailerType::BehindTheScenes => "Behind the Scenes",
            TrailerType::FanMade => "Fan Made",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for TrailerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Official" => Ok(TrailerType::Official),
            "Teaser" => Ok(TrailerType::Teaser),
            "Behind the Scenes" => Ok(TrailerType::BehindTheScenes),
            "Fan Made" => Ok(TrailerType::FanMade),
            other => Err(format!("Unknown trailer type: {}", other)),
        }
    }
}

/// A promotional video, optionally linked to a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trailer {
    pub id: String,
    pub movie_id: Option<String>,
    pub trailer_name: String,
    pub trailer_url: String,
    pub trailer_type: TrailerType,
    pub release_date: NaiveDate,
    /// Length in seconds
    pub duration: i32,
    pub description: String,
    pub language: Option<String>,
    pub region_restrictions: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Trailer {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailer_type_labels() {
        for label in ["Official", "Teaser", "Behind the Scenes", "Fan Made"] {
            let parsed: TrailerType = label.parse().unwrap();
            assert_eq!(parsed.to_string(), label);
            assert_eq!(serde_json::to_value(parsed).unwrap(), label);
        }
        assert!("Clip".parse::<TrailerType>().is_err());
    }
}
