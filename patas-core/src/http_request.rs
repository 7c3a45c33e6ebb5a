use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder, Response};

use crate::config::ClientConfig;
use crate::error::PatasError;
use crate::session::Session;

/// A thin wrapper on an HTTP client for talking to the backend. Sets timeouts and the
/// user-agent, and attaches the bearer token of the current [`Session`] to every request.
///
/// Requests are sent once; failures are never retried.
pub struct Request {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    session: Arc<Session>,
}

impl Request {
    /// Initializes a new `Request` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the config does not validate or the HTTP client
    /// cannot be built.
    pub(crate) fn new(
        config: &ClientConfig,
        session: Arc<Session>,
    ) -> Result<Self, PatasError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PatasError::Generic {
                error: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            timeout: config.timeout(),
            user_agent: config.user_agent(),
            session,
        })
    }

    /// Absolute URL for `path` on the backend.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Creates a request builder for `path` with defaults and authorization applied.
    pub(crate) fn req(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .timeout(self.timeout)
            .header(USER_AGENT, &self.user_agent);
        self.authorize(builder)
    }

    /// Whether requests built now would carry a bearer token.
    pub(crate) fn has_token(&self) -> bool {
        bearer_token(&self.session).is_some()
    }

    /// Attaches `Authorization: Bearer <token>` when the session holds a
    /// non-blank token. Without one the request goes out unauthenticated and
    /// the backend decides.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match bearer_token(&self.session) {
            Some(token) => {
                log::trace!("attaching bearer token");
                builder.header(AUTHORIZATION, format!("Bearer {token}"))
            }
            None => {
                log::debug!("no session token, sending request unauthenticated");
                builder
            }
        }
    }

    /// Sends a request built by `req`. Transport failures become
    /// [`PatasError::NetworkError`]; any HTTP status is returned unchanged.
    pub(crate) async fn handle(
        &self,
        request_builder: RequestBuilder,
    ) -> Result<Response, PatasError> {
        let (client, request) = request_builder.build_split();
        let request = request.map_err(|err| PatasError::NetworkError {
            url: err
                .url()
                .map_or_else(|| "<unknown>".to_string(), ToString::to_string),
            status: None,
            error: format!("request build failed: {err}"),
        })?;
        let url = request.url().to_string();
        let method = request.method().clone();

        match client.execute(request).await {
            Ok(resp) => {
                log::debug!("{method} {url} -> {}", resp.status().as_u16());
                Ok(resp)
            }
            Err(err) => {
                let error = if err.is_timeout() {
                    format!("request timed out after {}s: {err}", self.timeout.as_secs())
                } else if err.is_connect() {
                    format!("connection failed: {err}")
                } else {
                    format!("request failed: {err}")
                };
                log::warn!("{method} {url} failed: {error}");
                Err(PatasError::NetworkError {
                    url,
                    status: None,
                    error,
                })
            }
        }
    }
}

fn bearer_token(session: &Session) -> Option<String> {
    session.token().filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use crate::{Identity, UserType};

    fn session_with_token(token: Option<&str>) -> Arc<Session> {
        let session = Arc::new(Session::new(Arc::new(MemoryKeyValueStore::new())));
        if let Some(token) = token {
            session
                .login(Identity {
                    token: token.to_string(),
                    id: "42".to_string(),
                    name: "Ana".to_string(),
                    email: "a@x.com".to_string(),
                    user_type: UserType::Common,
                    profile_picture_url: None,
                })
                .unwrap();
        }
        session
    }

    fn build(request: &Request, path: &str) -> reqwest::Request {
        request.req(Method::GET, path).build().unwrap()
    }

    #[test]
    fn test_attaches_bearer_token() {
        let request =
            Request::new(&ClientConfig::default(), session_with_token(Some("abc123")))
                .unwrap();
        let built = build(&request, "/animalprofile/1");

        assert_eq!(
            built.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );
        assert_eq!(
            built.url().as_str(),
            "https://patas-unidas-api.onrender.com/animalprofile/1"
        );
    }

    #[test]
    fn test_no_session_means_no_authorization_header() {
        let request =
            Request::new(&ClientConfig::default(), session_with_token(None)).unwrap();
        let built = build(&request, "/user/login");

        assert!(built.headers().get(AUTHORIZATION).is_none());
        assert!(built
            .headers()
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("patas-core/"));
    }

    #[test]
    fn test_login_is_visible_to_next_request() {
        let session = session_with_token(None);
        let request = Request::new(&ClientConfig::default(), session.clone()).unwrap();
        assert!(build(&request, "/user/1").headers().get(AUTHORIZATION).is_none());

        session
            .login(Identity {
                token: "fresh".to_string(),
                id: "1".to_string(),
                name: "Ana".to_string(),
                email: String::new(),
                user_type: UserType::Common,
                profile_picture_url: None,
            })
            .unwrap();
        assert_eq!(
            build(&request, "/user/1").headers().get(AUTHORIZATION).unwrap(),
            "Bearer fresh"
        );

        session.logout().unwrap();
        assert!(build(&request, "/user/1").headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_rejects_insecure_base_url() {
        let config = ClientConfig::with_base_url("http://patas.example.org");
        assert!(matches!(
            Request::new(&config, session_with_token(None)),
            Err(PatasError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/user/1")
            .match_header("authorization", "Bearer abc123")
            .with_status(401)
            .create_async()
            .await;

        let request = Request::new(
            &ClientConfig::with_base_url(&server.url()),
            session_with_token(Some("abc123")),
        )
        .unwrap();
        let response = request
            .handle(request.req(Method::GET, "/user/1"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // nothing listens on port 9 on loopback
        let request = Request::new(
            &ClientConfig::with_base_url("http://127.0.0.1:9"),
            session_with_token(None),
        )
        .unwrap();
        let err = request
            .handle(request.req(Method::GET, "/user/1"))
            .await
            .unwrap_err();

        assert!(matches!(err, PatasError::NetworkError { status: None, .. }));
    }

    #[tokio::test]
    async fn test_silent_backend_times_out() {
        // accepts connections into the backlog but never answers
        let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ClientConfig {
            timeout_secs: 1,
            ..ClientConfig::with_base_url(&format!("http://{}", silent.local_addr().unwrap()))
        };
        let request = Request::new(&config, session_with_token(None)).unwrap();

        let started = std::time::Instant::now();
        let err = request
            .handle(request.req(Method::GET, "/user/1"))
            .await
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(10));
        match err {
            PatasError::NetworkError { status, error, .. } => {
                assert_eq!(status, None);
                assert!(error.contains("timed out after 1s"), "{error}");
            }
            other => panic!("expected a network error, got {other:?}"),
        }
    }
}
