use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Where an animal currently is in the rescue/adoption process.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalStatus {
    /// Spotted on the street.
    #[default]
    OnStreet,
    /// Staying in a temporary home.
    TempHome,
    /// Taken in by an NGO.
    RescuedByOng,
    /// Ready to be adopted.
    AvailableForAdoption,
    /// Already adopted.
    Adopted,
}

impl AnimalStatus {
    /// Short label shown on cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnStreet => "On the street",
            Self::TempHome => "Temporary home",
            Self::RescuedByOng => "Rescued by NGO",
            Self::AvailableForAdoption => "For adoption",
            Self::Adopted => "Adopted",
        }
    }
}

/// Approximate size of an animal.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalSize {
    /// Small.
    Small,
    /// Medium.
    #[default]
    Medium,
    /// Large.
    Large,
}

/// Sex of an animal, when it can be told.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimalSex {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Not known.
    #[default]
    Unknown,
}

impl AnimalSex {
    /// Short label shown on cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}
