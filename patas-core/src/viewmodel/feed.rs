use crate::animal::{AnimalSex, AnimalStatus, GeoPoint};
use crate::api::AnimalRecord;
use crate::context::AppContext;
use crate::error::PatasError;

use super::{StateCell, TaskScope, ViewModel};

/// One entry of the nearby-animals feed, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalCard {
    /// Animal id, used to open the details screen.
    pub id: u64,
    /// Name given by the reporter.
    pub name: String,
    /// Description, empty when none was given.
    pub description: String,
    /// Distance with one decimal, e.g. `"2.5 km"`, or `"?"`.
    pub distance: String,
    /// Human label of the status.
    pub status: String,
    /// Human label of the sex.
    pub sex: String,
    /// Absolute URL of the first photo.
    pub photo_url: Option<String>,
}

/// Formats a backend distance for display.
#[must_use]
pub fn format_distance(km: Option<f64>) -> String {
    km.map_or_else(|| "?".to_string(), |km| format!("{km:.1} km"))
}

/// Human label for a raw enum value: the known label, else the raw text,
/// else `"Unknown"`.
pub(crate) fn label_or_raw(label: Option<&str>, raw: Option<&str>) -> String {
    label
        .or(raw.filter(|raw| !raw.trim().is_empty()))
        .unwrap_or("Unknown")
        .to_string()
}

/// Home screen: animals reported near the user.
#[derive(Debug)]
pub struct FeedViewModel {
    ctx: AppContext,
    state: StateCell<Vec<AnimalCard>>,
    scope: TaskScope,
}

impl FeedViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: StateCell::new(),
            scope: TaskScope::new(),
        }
    }

    /// The feed.
    #[must_use]
    pub const fn state(&self) -> &StateCell<Vec<AnimalCard>> {
        &self.state
    }

    /// Loads animals within the default radius of `(latitude, longitude)`.
    /// A fetch still in flight is dropped in favour of this one.
    pub async fn fetch_nearby(&self, latitude: f64, longitude: f64) {
        let location = GeoPoint {
            latitude,
            longitude,
        };
        self.state
            .reload(async {
                let records = self.ctx.api().nearby_animals(location, None).await?;
                log::debug!("feed loaded {} animal(s)", records.len());
                let cards = records.into_iter().map(|record| self.card(record));
                Ok::<_, PatasError>(cards.collect::<Vec<_>>())
            })
            .await;
    }

    fn card(&self, record: AnimalRecord) -> AnimalCard {
        let photo_url = self
            .ctx
            .api()
            .animal_image_url(record.first_photo().map(ToString::to_string));
        AnimalCard {
            id: record.id,
            distance: format_distance(record.approximate_distance),
            status: label_or_raw(
                record.status().map(AnimalStatus::label),
                record.status.as_deref(),
            ),
            sex: label_or_raw(record.sex().map(AnimalSex::label), record.sex.as_deref()),
            description: record.description.unwrap_or_default(),
            name: record.provisional_name,
            photo_url,
        }
    }
}

impl ViewModel for FeedViewModel {
    fn scope(&self) -> &TaskScope {
        &self.scope
    }
}
