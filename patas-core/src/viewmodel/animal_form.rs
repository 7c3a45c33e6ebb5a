use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::animal::{AnimalSex, AnimalSize, AnimalStatus, GeoPoint};
use crate::api::{AnimalRecord, AnimalRequest, UNKNOWN_AGE};
use crate::context::AppContext;
use crate::error::PatasError;

use super::{StateCell, TaskScope, UiState, ViewModel};

/// What the reporter fills in on the "report an animal" screen.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnimalForm {
    /// Name to call the animal by.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// JPEG bytes of each photo; at least one is required.
    pub photos: Vec<Vec<u8>>,
    /// Where the animal was seen.
    pub location: GeoPoint,
}

/// Editable fields of an existing animal.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalForm {
    /// Animal id.
    pub id: u64,
    /// Name to call the animal by.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Free-text age estimate.
    pub approximate_age: String,
    /// Status.
    pub status: AnimalStatus,
    /// Size.
    pub size: AnimalSize,
    /// Sex.
    pub sex: AnimalSex,
    /// Absolute URL of the current first photo.
    pub current_photo_url: Option<String>,
    /// JPEG bytes of a replacement photo. `None` keeps the stored photos.
    pub new_photo: Option<Vec<u8>>,
    /// Where the animal was seen, kept as loaded.
    pub location: Option<GeoPoint>,
}

impl AnimalForm {
    fn from_record(record: AnimalRecord, current_photo_url: Option<String>) -> Self {
        Self {
            id: record.id,
            status: record.status().unwrap_or_default(),
            size: record.size().unwrap_or_default(),
            sex: record.sex().unwrap_or_default(),
            location: record.location(),
            name: record.provisional_name,
            description: record.description.unwrap_or_default(),
            approximate_age: record
                .approximate_age
                .filter(|age| !age.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_AGE.to_string()),
            current_photo_url,
            new_photo: None,
        }
    }
}

fn require_name(name: &str) -> Result<(), PatasError> {
    if name.trim().is_empty() {
        return Err(PatasError::invalid_input("name", "The name is required."));
    }
    Ok(())
}

fn encode_photo(jpeg: &[u8]) -> String {
    STANDARD.encode(jpeg)
}

/// "Report an animal" screen.
#[derive(Debug)]
pub struct CreateAnimalViewModel {
    ctx: AppContext,
    state: StateCell<()>,
    scope: TaskScope,
}

impl CreateAnimalViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: StateCell::new(),
            scope: TaskScope::new(),
        }
    }

    /// Progress of [`Self::create`]. `Success` means the screen should close.
    #[must_use]
    pub const fn state(&self) -> &StateCell<()> {
        &self.state
    }

    /// Validates the form and reports the animal as the logged-in user.
    pub async fn create(&self, form: NewAnimalForm) {
        let user_id = match self.validate(&form) {
            Ok(user_id) => user_id,
            Err(err) => {
                self.state.fail(&err);
                return;
            }
        };
        let Some(in_flight) = self.state.begin() else {
            return;
        };

        let photos = form.photos.iter().map(|jpeg| encode_photo(jpeg)).collect();
        let request = AnimalRequest::new(
            form.name.trim(),
            form.description.trim(),
            Some(photos),
            user_id,
            form.location,
        );
        let result = self.ctx.api().create_animal(request).await;
        if result.is_ok() {
            log::info!("reported animal {:?}", form.name.trim());
        }
        in_flight.finish(result);
    }

    fn validate(&self, form: &NewAnimalForm) -> Result<u64, PatasError> {
        require_name(&form.name)?;
        if form.photos.is_empty() {
            return Err(PatasError::invalid_input("photos", "Add at least one photo."));
        }
        self.ctx
            .session()
            .current_user_id()
            .ok_or(PatasError::NotLoggedIn)
    }
}

impl ViewModel for CreateAnimalViewModel {
    fn scope(&self) -> &TaskScope {
        &self.scope
    }
}

/// "Edit animal" screen.
#[derive(Debug)]
pub struct EditAnimalViewModel {
    ctx: AppContext,
    form: StateCell<AnimalForm>,
    save: StateCell<()>,
    scope: TaskScope,
}

impl EditAnimalViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: StateCell::new(),
            save: StateCell::new(),
            scope: TaskScope::new(),
        }
    }

    /// The form as loaded from the backend.
    #[must_use]
    pub const fn form_state(&self) -> &StateCell<AnimalForm> {
        &self.form
    }

    /// Progress of [`Self::save`].
    #[must_use]
    pub const fn save_state(&self) -> &StateCell<()> {
        &self.save
    }

    /// Fills the form from the stored animal. A load still in flight is
    /// dropped in favour of this one.
    pub async fn load(&self, id: u64) {
        let api = self.ctx.api();
        self.form
            .reload(async {
                let record = api.get_animal(id, None).await?;
                let photo = api.animal_image_url(record.first_photo().map(ToString::to_string));
                Ok::<_, PatasError>(AnimalForm::from_record(record, photo))
            })
            .await;
    }

    /// Sends the edited fields. Photos are only replaced when
    /// [`AnimalForm::new_photo`] is set.
    pub async fn save(&self, form: AnimalForm) {
        if let Err(err) = require_name(&form.name) {
            self.save.fail(&err);
            return;
        }
        let Some(user_id) = self.ctx.session().current_user_id() else {
            self.save.fail(&PatasError::NotLoggedIn);
            return;
        };
        let Some(in_flight) = self.save.begin() else {
            return;
        };

        let location = form.location.unwrap_or(GeoPoint {
            latitude: 0.0,
            longitude: 0.0,
        });
        let mut request = AnimalRequest::new(
            form.name.trim(),
            form.description.trim(),
            form.new_photo.as_deref().map(|jpeg| vec![encode_photo(jpeg)]),
            user_id,
            location,
        );
        request.status = form.status;
        request.size = form.size;
        request.sex = form.sex;
        request.approximate_age = form.approximate_age.trim().to_string();

        let result = self.ctx.api().update_animal(form.id, request).await;
        if result.is_ok() {
            log::info!("updated animal {}", form.id);
            self.form.set(UiState::Success(AnimalForm {
                new_photo: None,
                ..form
            }));
        }
        in_flight.finish(result);
    }
}

impl ViewModel for EditAnimalViewModel {
    fn scope(&self) -> &TaskScope {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::viewmodel::test_support::context;

    fn new_form(photos: Vec<Vec<u8>>) -> NewAnimalForm {
        NewAnimalForm {
            name: " Caramelo ".to_string(),
            description: "Friendly".to_string(),
            photos,
            location: GeoPoint {
                latitude: -19.747,
                longitude: -47.939,
            },
        }
    }

    #[tokio::test]
    async fn test_create_posts_base64_photos() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/animalprofile/register-animal-profile")
            .match_header("authorization", "Bearer abc123")
            .match_body(Matcher::PartialJson(json!({
                "provisionalName": "Caramelo",
                "photos": ["/9j/"],
                "createdByUserId": 42,
                "latitude": -19.747,
                "status": "ON_STREET",
                "approximateAge": "Unknown"
            })))
            .with_status(201)
            .create_async()
            .await;
        let vm = CreateAnimalViewModel::new(context(&server, true));

        vm.create(new_form(vec![vec![0xFF, 0xD8, 0xFF]])).await;

        mock.assert_async().await;
        assert_eq!(vm.state().get(), UiState::Success(()));
    }

    #[tokio::test]
    async fn test_create_requires_photo_and_session() {
        let server = Server::new_async().await;
        let vm = CreateAnimalViewModel::new(context(&server, true));
        vm.create(new_form(Vec::new())).await;
        assert_eq!(vm.state().get().error(), Some("Add at least one photo."));

        let vm = CreateAnimalViewModel::new(context(&server, false));
        vm.create(new_form(vec![vec![1]])).await;
        assert_eq!(
            vm.state().get().error(),
            Some(crate::viewmodel::SESSION_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let server = Server::new_async().await;
        let vm = CreateAnimalViewModel::new(context(&server, true));
        let mut form = new_form(vec![vec![1]]);
        form.name = "  ".to_string();

        vm.create(form).await;

        assert_eq!(vm.state().get().error(), Some("The name is required."));
    }

    #[tokio::test]
    async fn test_edit_load_and_save_without_new_photo() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/animalprofile/9")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 9,
                    "createdByUserId": 42,
                    "managedByUserId": 42,
                    "photos": ["rex.jpg"],
                    "latitude": -19.7,
                    "longitude": -47.9,
                    "provisionalName": "Rex",
                    "status": "ADOPTED",
                    "size": "LARGE"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let update = server
            .mock("PATCH", "/animalprofile/alter-9")
            .match_body(Matcher::PartialJson(json!({
                "provisionalName": "Rex II",
                "status": "ADOPTED",
                "size": "LARGE",
                "sex": "UNKNOWN",
                "latitude": -19.7
            })))
            .with_status(200)
            .create_async()
            .await;
        let vm = EditAnimalViewModel::new(context(&server, true));

        vm.load(9).await;
        let mut form = vm.form_state().get().success().cloned().unwrap();
        assert_eq!(form.approximate_age, UNKNOWN_AGE);
        assert!(form
            .current_photo_url
            .as_deref()
            .unwrap()
            .ends_with("/animalprofile/image/rex.jpg"));

        form.name = "Rex II".to_string();
        vm.save(form).await;

        update.assert_async().await;
        assert_eq!(vm.save_state().get(), UiState::Success(()));
        assert_eq!(
            vm.form_state().get().success().map(|f| f.name.as_str()),
            Some("Rex II")
        );
    }

    #[tokio::test]
    async fn test_edit_load_runs_again_after_abandoned_load() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/animalprofile/9")
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 9,
                    "createdByUserId": 42,
                    "managedByUserId": 42,
                    "provisionalName": "Rex"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let vm = EditAnimalViewModel::new(context(&server, true));
        let mut rx = vm.form_state().subscribe();

        {
            let load = vm.load(9);
            tokio::pin!(load);
            tokio::select! {
                biased;
                () = &mut load => panic!("load finished before it was dropped"),
                changed = rx.changed() => changed.unwrap(),
            }
            assert!(rx.borrow_and_update().is_loading());
        }
        assert_eq!(vm.form_state().get(), UiState::Idle);

        vm.load(9).await;
        assert_eq!(vm.form_state().get().success().map(|f| f.id), Some(9));
    }

    #[tokio::test]
    async fn test_edit_save_replaces_photo() {
        let mut server = Server::new_async().await;
        let update = server
            .mock("PATCH", "/animalprofile/alter-9")
            .match_body(Matcher::PartialJson(json!({"photos": ["AQID"]})))
            .with_status(200)
            .create_async()
            .await;
        let vm = EditAnimalViewModel::new(context(&server, true));
        let form = AnimalForm {
            id: 9,
            name: "Rex".to_string(),
            description: String::new(),
            approximate_age: "2 years".to_string(),
            status: AnimalStatus::TempHome,
            size: AnimalSize::Small,
            sex: AnimalSex::Male,
            current_photo_url: None,
            new_photo: Some(vec![1, 2, 3]),
            location: None,
        };

        vm.save(form).await;

        update.assert_async().await;
        assert_eq!(vm.save_state().get(), UiState::Success(()));
    }
}
