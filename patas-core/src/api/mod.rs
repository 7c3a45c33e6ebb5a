//! Typed client for the Patas Unidas REST backend.
//!
//! Every call goes through [`Request`], which attaches the bearer token of the
//! shared [`Session`]. Calls are single request/response exchanges.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::animal::GeoPoint;
use crate::config::ClientConfig;
use crate::error::PatasError;
use crate::http_request::Request;
use crate::session::Session;
use crate::Identity;

mod endpoint;
mod types;

pub use endpoint::{Endpoint, DEFAULT_NEARBY_RADIUS_KM};
pub use types::{AnimalRecord, AnimalRequest, RegisterRequest, UserProfile, UNKNOWN_AGE};
use types::{LoginRequest, UpdatePhotoRequest};

/// Patas Unidas API client.
#[derive(uniffi::Object)]
pub struct PatasApi {
    request: Request,
}

impl std::fmt::Debug for PatasApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatasApi").finish()
    }
}

#[uniffi::export]
impl PatasApi {
    /// Creates a client for `config` that authenticates with `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    #[uniffi::constructor]
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, PatasError> {
        Ok(Self {
            request: Request::new(&config, session)?,
        })
    }

    /// Full URL of an animal photo, or `None` for a blank name.
    #[must_use]
    pub fn animal_image_url(&self, photo_name: Option<String>) -> Option<String> {
        self.image_url("/animalprofile/image/", photo_name.as_deref())
    }

    /// Full URL of a user's profile picture, or `None` for a blank name.
    #[must_use]
    pub fn user_image_url(&self, photo_name: Option<String>) -> Option<String> {
        self.image_url("/user/image/", photo_name.as_deref())
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl PatasApi {
    /// Exchanges credentials for an [`Identity`].
    ///
    /// This does not start a session; pass the result to [`Session::login`].
    ///
    /// # Errors
    ///
    /// Returns [`PatasError::HttpStatus`] with status 401 for wrong credentials,
    /// or a network/serialization error.
    pub async fn login(&self, email: String, password: String) -> Result<Identity, PatasError> {
        let builder = self.builder(Endpoint::Login).json(&LoginRequest {
            email: &email,
            password: &password,
        });
        self.send_json(Endpoint::Login, builder).await
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration (e.g. the
    /// e-mail is taken) or the request fails.
    pub async fn register(&self, request: RegisterRequest) -> Result<(), PatasError> {
        let builder = self.builder(Endpoint::Register).json(&request);
        self.send_empty(Endpoint::Register, builder).await
    }

    /// Whether `email` is still free to register. `false` means an account
    /// already uses it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn email_available(&self, email: String) -> Result<bool, PatasError> {
        let builder = self
            .builder(Endpoint::CheckEmail)
            .query(&[("email", email.as_str())]);
        self.send_json(Endpoint::CheckEmail, builder).await
    }

    /// Fetches a user's public profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the request fails.
    pub async fn get_user(&self, id: u64) -> Result<UserProfile, PatasError> {
        let endpoint = Endpoint::GetUser { id };
        self.send_json(endpoint, self.builder(endpoint)).await
    }

    /// Replaces a user's profile picture with a base64-encoded JPEG.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the upload or the request fails.
    pub async fn update_user_photo(
        &self,
        id: u64,
        photo_base64: String,
    ) -> Result<(), PatasError> {
        let endpoint = Endpoint::UpdateUserPhoto { id };
        let builder = self.builder(endpoint).json(&UpdatePhotoRequest {
            profile_picture_url: photo_base64,
        });
        self.send_empty(endpoint, builder).await
    }

    /// Removes a user's profile picture.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal or the request fails.
    pub async fn delete_user_photo(&self, id: u64) -> Result<(), PatasError> {
        let endpoint = Endpoint::DeleteUserPhoto { id };
        self.send_empty(endpoint, self.builder(endpoint)).await
    }

    /// Reports a new animal.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the report or the request fails.
    pub async fn create_animal(&self, request: AnimalRequest) -> Result<(), PatasError> {
        let builder = self.builder(Endpoint::CreateAnimal).json(&request);
        self.send_empty(Endpoint::CreateAnimal, builder).await
    }

    /// Fetches one animal. With `location` the backend fills in
    /// `approximate_distance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the animal does not exist or the request fails.
    pub async fn get_animal(
        &self,
        id: u64,
        location: Option<GeoPoint>,
    ) -> Result<AnimalRecord, PatasError> {
        let endpoint = Endpoint::GetAnimal { id };
        let mut builder = self.builder(endpoint);
        if let Some(location) = location {
            builder = builder.query(&[
                ("latitude", location.latitude),
                ("longitude", location.longitude),
            ]);
        }
        self.send_json(endpoint, builder).await
    }

    /// Lists animals within `radius_km` (default 20 km) of `location`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn nearby_animals(
        &self,
        location: GeoPoint,
        radius_km: Option<f64>,
    ) -> Result<Vec<AnimalRecord>, PatasError> {
        let builder = self.builder(Endpoint::NearbyAnimals).query(&[
            ("latitude", location.latitude),
            ("longitude", location.longitude),
            ("radius", radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM)),
        ]);
        self.send_json(Endpoint::NearbyAnimals, builder).await
    }

    /// Updates an animal profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    pub async fn update_animal(
        &self,
        id: u64,
        request: AnimalRequest,
    ) -> Result<(), PatasError> {
        let endpoint = Endpoint::UpdateAnimal { id };
        let builder = self.builder(endpoint).json(&request);
        self.send_empty(endpoint, builder).await
    }

    /// Deletes an animal profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion or the request fails.
    pub async fn delete_animal(&self, id: u64) -> Result<(), PatasError> {
        let endpoint = Endpoint::DeleteAnimal { id };
        self.send_empty(endpoint, self.builder(endpoint)).await
    }
}

impl PatasApi {
    fn image_url(&self, prefix: &str, photo_name: Option<&str>) -> Option<String> {
        photo_name
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.request.url(&format!("{prefix}{name}")))
    }

    fn builder(&self, endpoint: Endpoint) -> RequestBuilder {
        self.request.req(endpoint.method(), &endpoint.path())
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> Result<Response, PatasError> {
        if endpoint.requires_auth() && !self.request.has_token() {
            log::warn!("{endpoint:?} requires a session but none is active");
        }
        let response = self.request.handle(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let error = response.text().await.unwrap_or_default();
        log::warn!("{endpoint:?} rejected with status {}", status.as_u16());
        Err(PatasError::HttpStatus {
            url,
            status: status.as_u16(),
            error,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> Result<T, PatasError> {
        let response = self.send(endpoint, builder).await?;
        response
            .json()
            .await
            .map_err(|e| PatasError::SerializationError {
                error: format!("failed to parse {endpoint:?} response: {e}"),
            })
    }

    async fn send_empty(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> Result<(), PatasError> {
        self.send(endpoint, builder).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use crate::UserType;

    fn logged_in_session() -> Arc<Session> {
        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        session
            .login(Identity {
                token: "abc123".to_string(),
                id: "42".to_string(),
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                user_type: UserType::Common,
                profile_picture_url: None,
            })
            .unwrap();
        session
    }

    fn api(server: &Server, session: Arc<Session>) -> PatasApi {
        PatasApi::new(ClientConfig::with_base_url(&server.url()), session).unwrap()
    }

    #[tokio::test]
    async fn test_login_returns_identity() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/login")
            .match_body(Matcher::Json(json!({"email": "a@x.com", "senha": "pw"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token": "t1",
                    "id": "42",
                    "name": "Ana",
                    "email": "a@x.com",
                    "userType": "COMMON",
                    "profilePictureUrl": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        let identity = api(&server, session.clone())
            .login("a@x.com".to_string(), "pw".to_string())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(identity.token, "t1");
        assert_eq!(identity.user_id(), Some(42));
        // login alone does not start a session
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_tolerates_numeric_id_and_unknown_role() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/user/login")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "token": "t1",
                    "id": 42,
                    "name": "Ana",
                    "email": "a@x.com",
                    "userType": "ADMIN"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        let identity = api(&server, session)
            .login("a@x.com".to_string(), "pw".to_string())
            .await
            .unwrap();

        assert_eq!(identity.id, "42");
        assert_eq!(identity.user_id(), Some(42));
        assert_eq!(identity.user_type, UserType::Common);
    }

    #[tokio::test]
    async fn test_login_with_wrong_credentials() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/user/login")
            .with_status(401)
            .with_body("Bad credentials")
            .create_async()
            .await;

        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        let err = api(&server, session)
            .login("a@x.com".to_string(), "nope".to_string())
            .await
            .unwrap_err();

        match err {
            PatasError::HttpStatus { status, error, .. } => {
                assert_eq!(status, 401);
                assert_eq!(error, "Bad credentials");
            }
            other => panic!("Expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nearby_animals_sends_location_and_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/animalprofile/proximos")
            .match_header("authorization", "Bearer abc123")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("latitude".into(), "-19.747".into()),
                Matcher::UrlEncoded("longitude".into(), "-47.939".into()),
                Matcher::Regex("radius=20".into()),
            ]))
            .with_status(200)
            .with_body(
                json!([
                    {"id": 1, "createdByUserId": 42, "managedByUserId": 42,
                     "provisionalName": "Caramelo", "approximateDistance": 2.5}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let animals = api(&server, logged_in_session())
            .nearby_animals(
                GeoPoint {
                    latitude: -19.747,
                    longitude: -47.939,
                },
                None,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(animals.len(), 1);
        assert_eq!(animals[0].provisional_name, "Caramelo");
    }

    #[tokio::test]
    async fn test_get_animal_without_location_has_no_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/animalprofile/5")
            .match_query(Matcher::Missing)
            .with_status(200)
            .with_body(
                json!({"id": 5, "createdByUserId": 1, "managedByUserId": 1,
                       "provisionalName": "Belinha"})
                .to_string(),
            )
            .create_async()
            .await;

        let animal = api(&server, logged_in_session())
            .get_animal(5, None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(animal.id, 5);
    }

    #[tokio::test]
    async fn test_update_user_photo_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/user/42/update-photo")
            .match_body(Matcher::Json(json!({"profilePictureUrl": "aGVsbG8="})))
            .with_status(204)
            .create_async()
            .await;

        api(&server, logged_in_session())
            .update_user_photo(42, "aGVsbG8=".to_string())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_serialization_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/42")
            .with_status(200)
            .with_body("<html>waking up</html>")
            .create_async()
            .await;

        let err = api(&server, logged_in_session())
            .get_user(42)
            .await
            .unwrap_err();

        assert!(matches!(err, PatasError::SerializationError { .. }));
    }

    #[tokio::test]
    async fn test_email_available() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/user/check-email")
            .match_query(Matcher::UrlEncoded("email".into(), "a@x.com".into()))
            .with_status(200)
            .with_body("true")
            .create_async()
            .await;

        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        assert!(api(&server, session)
            .email_available("a@x.com".to_string())
            .await
            .unwrap());
    }

    #[test]
    fn test_image_urls() {
        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        let api = PatasApi::new(ClientConfig::default(), session).unwrap();

        assert_eq!(
            api.animal_image_url(Some("rex.jpg".to_string())).as_deref(),
            Some("https://patas-unidas-api.onrender.com/animalprofile/image/rex.jpg")
        );
        assert_eq!(
            api.user_image_url(Some("ana.jpg".to_string())).as_deref(),
            Some("https://patas-unidas-api.onrender.com/user/image/ana.jpg")
        );
        assert_eq!(api.user_image_url(Some("  ".to_string())), None);
        assert_eq!(api.animal_image_url(None), None);
    }
}
