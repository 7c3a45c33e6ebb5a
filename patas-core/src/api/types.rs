//! Request and response bodies of the backend.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::animal::{AnimalSex, AnimalSize, AnimalStatus, GeoPoint};
use crate::UserType;

/// Placeholder age sent when the reporter does not know it.
pub const UNKNOWN_AGE: &str = "Unknown";

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "senha")]
    pub password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePhotoRequest {
    /// Base64 of the JPEG, despite the field name.
    pub profile_picture_url: String,
}

/// Body of `POST /user/register-new-user`.
#[derive(Clone, PartialEq, Eq, Serialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Plain password; the backend hashes it.
    #[serde(rename = "senha")]
    pub password: String,
    /// City.
    pub city: String,
    /// State (UF).
    pub state: String,
    /// Contact phone.
    pub phone: String,
    /// Role to register with.
    pub user_type: UserType,
    /// Optional profile picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_photo_url: Option<String>,
}

/// Public profile returned by `GET /user/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User id.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// City.
    #[serde(default)]
    pub city: Option<String>,
    /// State (UF).
    #[serde(default)]
    pub state: Option<String>,
    /// File name of the profile picture, if any.
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    /// Role of the user. Missing or unknown roles decode as `COMMON`.
    #[serde(default)]
    pub user_type: UserType,
}

/// An animal profile as returned by the backend.
///
/// Enum-like fields are kept as sent; use the typed accessors to read them.
#[derive(Debug, Clone, PartialEq, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRecord {
    /// Animal id.
    pub id: u64,
    /// User who reported the animal.
    pub created_by_user_id: u64,
    /// User currently responsible for the animal.
    #[serde(default)]
    pub managed_by_user_id: u64,
    /// Photo file names.
    #[serde(default)]
    pub photos: Option<Vec<String>>,
    /// Latitude where the animal was seen.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude where the animal was seen.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Raw [`AnimalStatus`].
    #[serde(default)]
    pub status: Option<String>,
    /// Creation time in milliseconds since the epoch.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Name given by the reporter.
    pub provisional_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Raw [`AnimalSize`].
    #[serde(default)]
    pub size: Option<String>,
    /// Raw [`AnimalSex`].
    #[serde(default)]
    pub sex: Option<String>,
    /// Free-text age estimate.
    #[serde(default)]
    pub approximate_age: Option<String>,
    /// Distance from the queried point in kilometres.
    #[serde(default)]
    pub approximate_distance: Option<f64>,
}

impl AnimalRecord {
    /// Parsed status, if present and known.
    #[must_use]
    pub fn status(&self) -> Option<AnimalStatus> {
        self.status.as_deref().and_then(|s| AnimalStatus::from_str(s).ok())
    }

    /// Parsed size, if present and known.
    #[must_use]
    pub fn size(&self) -> Option<AnimalSize> {
        self.size.as_deref().and_then(|s| AnimalSize::from_str(s).ok())
    }

    /// Parsed sex, if present and known.
    #[must_use]
    pub fn sex(&self) -> Option<AnimalSex> {
        self.sex.as_deref().and_then(|s| AnimalSex::from_str(s).ok())
    }

    /// Where the animal was seen, when both coordinates are present.
    #[must_use]
    pub fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }

    /// First photo file name, if any.
    #[must_use]
    pub fn first_photo(&self) -> Option<&str> {
        self.photos
            .as_ref()
            .and_then(|photos| photos.first())
            .map(String::as_str)
    }
}

/// Body used both to create and to update an animal profile.
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRequest {
    /// Name given by the reporter.
    pub provisional_name: String,
    /// Free-text description.
    pub description: String,
    /// Base64-encoded photos. `None` keeps the stored photos on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    /// Reporting user.
    pub created_by_user_id: u64,
    /// Latitude where the animal was seen.
    pub latitude: f64,
    /// Longitude where the animal was seen.
    pub longitude: f64,
    /// Current status.
    pub status: AnimalStatus,
    /// Approximate size.
    pub size: AnimalSize,
    /// Sex.
    pub sex: AnimalSex,
    /// Free-text age estimate.
    pub approximate_age: String,
    /// Creation time in milliseconds since the epoch.
    pub created_at: i64,
}

impl AnimalRequest {
    /// A new report with the backend's defaults for status, size, sex and age.
    #[must_use]
    pub fn new(
        provisional_name: &str,
        description: &str,
        photos: Option<Vec<String>>,
        created_by_user_id: u64,
        location: GeoPoint,
    ) -> Self {
        Self {
            provisional_name: provisional_name.to_string(),
            description: description.to_string(),
            photos,
            created_by_user_id,
            latitude: location.latitude,
            longitude: location.longitude,
            status: AnimalStatus::default(),
            size: AnimalSize::default(),
            sex: AnimalSex::default(),
            approximate_age: UNKNOWN_AGE.to_string(),
            created_at: now_millis(),
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
