//! Catalogue of the backend's REST endpoints.

use reqwest::Method;

/// Default search radius for nearby animals, in kilometres.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 20.0;

/// One endpoint of the backend: method plus path (with ids filled in).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /user/login`
    Login,
    /// `POST /user/register-new-user`
    Register,
    /// `GET /user/check-email?email=`
    CheckEmail,
    /// `GET /user/{id}`
    GetUser {
        /// User id.
        id: u64,
    },
    /// `PATCH /user/{id}/update-photo`
    UpdateUserPhoto {
        /// User id.
        id: u64,
    },
    /// `DELETE /user/{id}/remove-photo`
    DeleteUserPhoto {
        /// User id.
        id: u64,
    },
    /// `POST /animalprofile/register-animal-profile`
    CreateAnimal,
    /// `GET /animalprofile/{id}?latitude=&longitude=`
    GetAnimal {
        /// Animal id.
        id: u64,
    },
    /// `GET /animalprofile/proximos?latitude=&longitude=&radius=`
    NearbyAnimals,
    /// `PATCH /animalprofile/alter-{id}`
    UpdateAnimal {
        /// Animal id.
        id: u64,
    },
    /// `DELETE /animalprofile/delete-{id}`
    DeleteAnimal {
        /// Animal id.
        id: u64,
    },
}

impl Endpoint {
    /// HTTP method of the endpoint.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::Login | Self::Register | Self::CreateAnimal => Method::POST,
            Self::CheckEmail
            | Self::GetUser { .. }
            | Self::GetAnimal { .. }
            | Self::NearbyAnimals => Method::GET,
            Self::UpdateUserPhoto { .. } | Self::UpdateAnimal { .. } => Method::PATCH,
            Self::DeleteUserPhoto { .. } | Self::DeleteAnimal { .. } => Method::DELETE,
        }
    }

    /// Path relative to the base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/user/login".to_string(),
            Self::Register => "/user/register-new-user".to_string(),
            Self::CheckEmail => "/user/check-email".to_string(),
            Self::GetUser { id } => format!("/user/{id}"),
            Self::UpdateUserPhoto { id } => format!("/user/{id}/update-photo"),
            Self::DeleteUserPhoto { id } => format!("/user/{id}/remove-photo"),
            Self::CreateAnimal => "/animalprofile/register-animal-profile".to_string(),
            Self::GetAnimal { id } => format!("/animalprofile/{id}"),
            Self::NearbyAnimals => "/animalprofile/proximos".to_string(),
            Self::UpdateAnimal { id } => format!("/animalprofile/alter-{id}"),
            Self::DeleteAnimal { id } => format!("/animalprofile/delete-{id}"),
        }
    }

    /// Whether the backend expects a bearer token on this endpoint.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register | Self::CheckEmail)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Endpoint::Login, "POST", "/user/login")]
    #[test_case(Endpoint::Register, "POST", "/user/register-new-user")]
    #[test_case(Endpoint::CheckEmail, "GET", "/user/check-email")]
    #[test_case(Endpoint::GetUser { id: 3 }, "GET", "/user/3")]
    #[test_case(Endpoint::UpdateUserPhoto { id: 3 }, "PATCH", "/user/3/update-photo")]
    #[test_case(Endpoint::DeleteUserPhoto { id: 3 }, "DELETE", "/user/3/remove-photo")]
    #[test_case(Endpoint::CreateAnimal, "POST", "/animalprofile/register-animal-profile")]
    #[test_case(Endpoint::GetAnimal { id: 9 }, "GET", "/animalprofile/9")]
    #[test_case(Endpoint::NearbyAnimals, "GET", "/animalprofile/proximos")]
    #[test_case(Endpoint::UpdateAnimal { id: 9 }, "PATCH", "/animalprofile/alter-9")]
    #[test_case(Endpoint::DeleteAnimal { id: 9 }, "DELETE", "/animalprofile/delete-9")]
    fn test_endpoint_contract(endpoint: Endpoint, method: &str, path: &str) {
        assert_eq!(endpoint.method().as_str(), method);
        assert_eq!(endpoint.path(), path);
    }

    #[test]
    fn test_public_endpoints() {
        assert!(!Endpoint::Login.requires_auth());
        assert!(!Endpoint::CheckEmail.requires_auth());
        assert!(Endpoint::NearbyAnimals.requires_auth());
        assert!(Endpoint::DeleteAnimal { id: 1 }.requires_auth());
    }
}
