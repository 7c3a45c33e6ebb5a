use std::future::Future;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::api::{PatasApi, UserProfile};
use crate::context::AppContext;
use crate::error::PatasError;
use crate::session::Route;

use super::{StateCell, TaskScope, UiState, ViewModel};

/// The logged-in user's profile, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    /// Profile as returned by the backend.
    pub profile: UserProfile,
    /// Absolute URL of the profile picture.
    pub photo_url: Option<String>,
}

/// Profile screen of the logged-in user.
#[derive(Debug)]
pub struct ProfileViewModel {
    ctx: AppContext,
    state: StateCell<ProfileView>,
    photo: StateCell<String>,
    scope: TaskScope,
}

impl ProfileViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: StateCell::new(),
            photo: StateCell::new(),
            scope: TaskScope::new(),
        }
    }

    /// The profile.
    #[must_use]
    pub const fn state(&self) -> &StateCell<ProfileView> {
        &self.state
    }

    /// Outcome of the last photo change; `Success` carries a confirmation.
    #[must_use]
    pub const fn photo_state(&self) -> &StateCell<String> {
        &self.photo
    }

    /// Fetches the logged-in user's profile.
    pub async fn load(&self) {
        self.state
            .reload(async {
                let id = self
                    .ctx
                    .session()
                    .current_user_id()
                    .ok_or(PatasError::NotLoggedIn)?;
                let profile = self.ctx.api().get_user(id).await?;
                let photo_url = self
                    .ctx
                    .api()
                    .user_image_url(profile.profile_picture_url.clone());
                Ok::<_, PatasError>(ProfileView { profile, photo_url })
            })
            .await;
    }

    /// Uploads `jpeg` as the new profile picture, then reloads the profile.
    pub async fn update_photo(&self, jpeg: &[u8]) {
        if jpeg.is_empty() {
            self.photo
                .fail(&PatasError::invalid_input("photo", "Choose a photo first."));
            return;
        }
        let encoded = STANDARD.encode(jpeg);
        self.change_photo("Photo updated.", |api, id| {
            api.update_user_photo(id, encoded)
        })
        .await;
    }

    /// Removes the profile picture, then reloads the profile.
    pub async fn delete_photo(&self) {
        self.change_photo("Photo removed.", |api, id| api.delete_user_photo(id))
            .await;
    }

    /// Ends the session. Returns the route to show next.
    pub fn logout(&self) -> Route {
        match self.ctx.session().logout() {
            Ok(()) => self.state.set(UiState::Idle),
            Err(err) => self.photo.fail(&err),
        }
        self.ctx.initial_route()
    }

    async fn change_photo<'a, F, Fut>(&'a self, confirmation: &str, call: F)
    where
        F: FnOnce(&'a PatasApi, u64) -> Fut,
        Fut: Future<Output = Result<(), PatasError>> + 'a,
    {
        let Some(id) = self.ctx.session().current_user_id() else {
            self.photo.fail(&PatasError::NotLoggedIn);
            return;
        };
        let Some(in_flight) = self.photo.begin() else {
            return;
        };
        match call(self.ctx.api(), id).await {
            Ok(()) => {
                in_flight.settle(UiState::Success(confirmation.to_string()));
                self.load().await;
            }
            Err(err) => in_flight.fail(&err),
        }
    }
}

impl ViewModel for ProfileViewModel {
    fn scope(&self) -> &TaskScope {
        &self.scope
    }
}
