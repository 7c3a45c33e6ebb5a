use crate::animal::{AnimalSex, AnimalStatus, GeoPoint};
use crate::api::{AnimalRecord, UserProfile};
use crate::context::AppContext;
use crate::error::PatasError;

use super::feed::{format_distance, label_or_raw};
use super::{StateCell, TaskScope, ViewModel};

/// Everything the details screen shows about one animal.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalDetails {
    /// The animal as returned by the backend.
    pub animal: AnimalRecord,
    /// Who reported it; `None` when the profile could not be fetched.
    pub creator: Option<UserProfile>,
    /// Absolute URLs of all photos.
    pub photo_urls: Vec<String>,
    /// Absolute URL of the reporter's picture.
    pub creator_photo_url: Option<String>,
    /// Distance with one decimal, or `"?"`.
    pub distance: String,
    /// Human label of the status.
    pub status: String,
    /// Human label of the sex.
    pub sex: String,
}

/// Details screen of one animal, with the owner-only delete action.
#[derive(Debug)]
pub struct AnimalDetailsViewModel {
    ctx: AppContext,
    state: StateCell<AnimalDetails>,
    delete: StateCell<()>,
    scope: TaskScope,
}

impl AnimalDetailsViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: StateCell::new(),
            delete: StateCell::new(),
            scope: TaskScope::new(),
        }
    }

    /// The loaded animal.
    #[must_use]
    pub const fn state(&self) -> &StateCell<AnimalDetails> {
        &self.state
    }

    /// Progress of [`Self::delete`]. `Success` means the screen should close.
    #[must_use]
    pub const fn delete_state(&self) -> &StateCell<()> {
        &self.delete
    }

    /// Fetches the animal, then its reporter. With `location` the distance
    /// is filled in.
    pub async fn load(&self, id: u64, location: Option<GeoPoint>) {
        self.state
            .reload(async {
                let animal = self.ctx.api().get_animal(id, location).await?;
                // a missing reporter profile does not fail the screen
                let creator = match self.ctx.api().get_user(animal.created_by_user_id).await {
                    Ok(creator) => Some(creator),
                    Err(err) => {
                        log::warn!(
                            "could not load reporter {} of animal {id}: {err}",
                            animal.created_by_user_id
                        );
                        None
                    }
                };
                Ok::<_, PatasError>(self.details(animal, creator))
            })
            .await;
    }

    /// Whether the logged-in user reported the loaded animal.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        let Some(user_id) = self.ctx.session().current_user_id() else {
            return false;
        };
        self.state
            .get()
            .success()
            .is_some_and(|details| details.animal.created_by_user_id == user_id)
    }

    /// Deletes the loaded animal. Only its reporter may do this.
    pub async fn delete(&self) {
        let Some(id) = self.state.get().success().map(|details| details.animal.id) else {
            self.delete.fail(&PatasError::invalid_input(
                "animal",
                "The animal is not loaded yet.",
            ));
            return;
        };
        if !self.is_owner() {
            self.delete.fail(&PatasError::invalid_input(
                "animal",
                "Only the person who reported this animal can delete it.",
            ));
            return;
        }
        let Some(in_flight) = self.delete.begin() else {
            return;
        };
        let result = self.ctx.api().delete_animal(id).await;
        if result.is_ok() {
            log::info!("deleted animal {id}");
        }
        in_flight.finish(result);
    }

    fn details(&self, animal: AnimalRecord, creator: Option<UserProfile>) -> AnimalDetails {
        let api = self.ctx.api();
        let photo_urls = animal
            .photos
            .iter()
            .flatten()
            .filter_map(|name| api.animal_image_url(Some(name.clone())))
            .collect();
        let creator_photo_url = creator
            .as_ref()
            .and_then(|creator| api.user_image_url(creator.profile_picture_url.clone()));
        AnimalDetails {
            photo_urls,
            creator_photo_url,
            distance: format_distance(animal.approximate_distance),
            status: label_or_raw(
                animal.status().map(AnimalStatus::label),
                animal.status.as_deref(),
            ),
            sex: label_or_raw(animal.sex().map(AnimalSex::label), animal.sex.as_deref()),
            animal,
            creator,
        }
    }
}

impl ViewModel for AnimalDetailsViewModel {
    fn scope(&self) -> &TaskScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    use super::*;
    use crate::viewmodel::test_support::context;
    use crate::viewmodel::UiState;

    async fn mock_animal(server: &mut ServerGuard, reporter: u64) -> mockito::Mock {
        server
            .mock("GET", "/animalprofile/5")
            .match_query(Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 5,
                    "createdByUserId": reporter,
                    "managedByUserId": reporter,
                    "photos": ["a.jpg", "b.jpg"],
                    "provisionalName": "Caramelo",
                    "status": "TEMP_HOME",
                    "sex": "FEMALE",
                    "approximateDistance": 1.04
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_load_with_creator() {
        let mut server = Server::new_async().await;
        mock_animal(&mut server, 42).await;
        server
            .mock("GET", "/user/42")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 42,
                    "name": "Ana",
                    "email": "ana@x.com",
                    "profilePictureUrl": "ana.jpg",
                    "userType": "COMMON"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let vm = AnimalDetailsViewModel::new(context(&server, true));

        vm.load(
            5,
            Some(GeoPoint {
                latitude: -19.747,
                longitude: -47.939,
            }),
        )
        .await;

        let details = vm.state().get().success().cloned().unwrap();
        assert_eq!(details.distance, "1.0 km");
        assert_eq!(details.status, "Temporary home");
        assert_eq!(details.sex, "Female");
        assert_eq!(details.photo_urls.len(), 2);
        assert_eq!(details.creator.as_ref().map(|c| c.name.as_str()), Some("Ana"));
        assert!(details
            .creator_photo_url
            .unwrap()
            .ends_with("/user/image/ana.jpg"));
        assert!(vm.is_owner());
    }

    #[tokio::test]
    async fn test_missing_creator_is_not_fatal() {
        let mut server = Server::new_async().await;
        mock_animal(&mut server, 7).await;
        server
            .mock("GET", "/user/7")
            .with_status(404)
            .create_async()
            .await;
        let vm = AnimalDetailsViewModel::new(context(&server, true));

        vm.load(5, None).await;

        let details = vm.state().get().success().cloned().unwrap();
        assert_eq!(details.creator, None);
        assert!(!vm.is_owner());
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_refused() {
        let mut server = Server::new_async().await;
        mock_animal(&mut server, 7).await;
        server
            .mock("GET", "/user/7")
            .with_status(404)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/animalprofile/delete-5")
            .expect(0)
            .create_async()
            .await;
        let vm = AnimalDetailsViewModel::new(context(&server, true));
        vm.load(5, None).await;

        vm.delete().await;

        delete.assert_async().await;
        assert!(vm.delete_state().get().error().is_some());
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let mut server = Server::new_async().await;
        mock_animal(&mut server, 42).await;
        server
            .mock("GET", "/user/42")
            .with_status(404)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/animalprofile/delete-5")
            .match_header("authorization", "Bearer abc123")
            .with_status(204)
            .create_async()
            .await;
        let vm = AnimalDetailsViewModel::new(context(&server, true));
        vm.load(5, None).await;

        vm.delete().await;

        delete.assert_async().await;
        assert_eq!(vm.delete_state().get(), UiState::Success(()));
    }

    #[tokio::test]
    async fn test_load_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/animalprofile/5")
            .with_status(404)
            .create_async()
            .await;
        let vm = AnimalDetailsViewModel::new(context(&server, true));

        vm.load(5, None).await;

        assert_eq!(vm.state().get().error(), Some("error 404"));
    }
}
