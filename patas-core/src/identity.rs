use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// The role a user registered with.
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
    uniffi::Enum,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// Regular user.
    #[default]
    Common,
    /// Independent protector or animal-welfare NGO.
    ProtectorOng,
    /// User looking to adopt.
    Adopter,
}

impl UserType {
    /// Parses a wire or stored role, falling back to [`UserType::Common`]
    /// for values this client does not know.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        Self::from_str(raw.trim()).unwrap_or_else(|_| {
            log::warn!("unknown user type {raw:?}, defaulting to COMMON");
            Self::Common
        })
    }
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Common, Self::parse_lenient))
    }
}

/// Accepts an id sent either as a JSON string or as a number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// The authenticated user's profile together with the bearer token issued at login.
///
/// This is exactly what `POST /user/login` returns and what gets persisted in the
/// credential store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque bearer token presented on authenticated requests.
    pub token: String,
    /// Backend user id. Usually sent as a string; numbers are accepted too.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Role of the user. Missing or unknown roles decode as `COMMON`.
    #[serde(default)]
    pub user_type: UserType,
    /// File name of the profile picture on the backend, if any.
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl Identity {
    /// Whether this identity can back a logged-in session: it needs a
    /// non-blank token and id.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.token.trim().is_empty() && !self.id.trim().is_empty()
    }

    /// Numeric user id, when `id` parses as one.
    #[must_use]
    pub fn user_id(&self) -> Option<u64> {
        self.id.trim().parse().ok()
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("token", &"<redacted>")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("profile_picture_url", &self.profile_picture_url)
            .finish()
    }
}
