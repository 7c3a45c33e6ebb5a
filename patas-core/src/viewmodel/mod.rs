//! Screen-facing state holders.
//!
//! Each view-model exposes one or more [`StateCell`]s that screens observe
//! and async intent methods that drive them. Intents never return errors;
//! failures end up as [`UiState::Error`] with a message meant for the user.
//!
//! ```ignore
//! let feed = Arc::new(FeedViewModel::new(ctx.clone()));
//! let mut rx = feed.state().subscribe();
//! let vm = Arc::clone(&feed);
//! feed.scope().launch(async move { vm.fetch_nearby(-19.747, -47.939).await });
//! while rx.changed().await.is_ok() {
//!     render(&rx.borrow_and_update());
//! }
//! ```

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::error::{ErrorKind, PatasError};

mod animal_details;
mod animal_form;
mod auth;
mod feed;
mod profile;

pub use animal_details::{AnimalDetails, AnimalDetailsViewModel};
pub use animal_form::{AnimalForm, CreateAnimalViewModel, EditAnimalViewModel, NewAnimalForm};
pub use auth::{AuthViewModel, RegisterForm};
pub use feed::{format_distance, AnimalCard, FeedViewModel};
pub use profile::{ProfileView, ProfileViewModel};

/// What a screen should render for one piece of async work.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    /// Nothing requested yet.
    Idle,
    /// Work in flight.
    Loading,
    /// Finished with a value.
    Success(T),
    /// Finished with a user-facing message.
    Error(String),
}

impl<T> Default for UiState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> UiState<T> {
    /// Whether work is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The value, if finished successfully.
    #[must_use]
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The message, if finished with an error.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Observable [`UiState`]. Screens read and subscribe; only the owning
/// view-model writes.
///
/// Submit intents go through [`StateCell::begin`], which drops a second
/// submit while the first is in flight. Load intents go through
/// [`StateCell::reload`], where the newest call wins.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<UiState<T>>,
    generation: watch::Sender<u64>,
}

impl<T: Clone> StateCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            tx: watch::Sender::new(UiState::Idle),
            generation: watch::Sender::new(0),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn get(&self) -> UiState<T> {
        self.tx.borrow().clone()
    }

    /// A receiver notified on every transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UiState<T>> {
        self.tx.subscribe()
    }

    pub(crate) fn set(&self, state: UiState<T>) {
        self.tx.send_replace(state);
    }

    /// Moves to `Loading` unless already there. Returns `None` when another
    /// intent is still running and this one should be dropped.
    pub(crate) fn begin(&self) -> Option<InFlight<'_, T>> {
        let started = self.tx.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = UiState::Loading;
                true
            }
        });
        started.then(|| InFlight {
            cell: self,
            generation: *self.generation.borrow(),
            settled: false,
        })
    }

    /// Runs `work` as the latest load of this cell. Calling `reload` again
    /// drops the earlier `work`, request included, so only the newest
    /// outcome is published.
    pub(crate) async fn reload<F>(&self, work: F)
    where
        F: Future<Output = Result<T, PatasError>>,
    {
        let mut generation = 0;
        self.generation.send_modify(|current| {
            *current += 1;
            generation = *current;
        });
        let mut newer = self.generation.subscribe();
        let in_flight = InFlight {
            cell: self,
            generation,
            settled: false,
        };
        self.set(UiState::Loading);

        tokio::select! {
            biased;
            () = superseded(&mut newer, generation) => {
                log::debug!("load superseded by a newer one");
            }
            result = work => in_flight.finish(result),
        }
    }

    pub(crate) fn fail(&self, err: &PatasError) {
        log::warn!("view-model intent failed: {err}");
        self.set(UiState::Error(user_message(err)));
    }

    fn is_current(&self, generation: u64) -> bool {
        *self.generation.borrow() == generation
    }
}

async fn superseded(newer: &mut watch::Receiver<u64>, generation: u64) {
    while *newer.borrow_and_update() == generation {
        if newer.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Holds a [`StateCell`] in `Loading` until an outcome is published.
///
/// Dropped without one, as when the task running the intent is aborted, it
/// puts the cell back to `Idle` so the next intent is not refused.
#[must_use]
pub(crate) struct InFlight<'a, T: Clone> {
    cell: &'a StateCell<T>,
    generation: u64,
    settled: bool,
}

impl<T: Clone> InFlight<'_, T> {
    pub(crate) fn finish(self, result: Result<T, PatasError>) {
        match result {
            Ok(value) => self.settle(UiState::Success(value)),
            Err(err) => self.fail(&err),
        }
    }

    pub(crate) fn fail(self, err: &PatasError) {
        log::warn!("view-model intent failed: {err}");
        self.settle(UiState::Error(user_message(err)));
    }

    /// Publishes `state` unless a newer load took over the cell.
    pub(crate) fn settle(mut self, state: UiState<T>) {
        self.settled = true;
        if self.cell.is_current(self.generation) {
            self.cell.set(state);
        }
    }
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.settled || !self.cell.is_current(self.generation) {
            return;
        }
        let reset = self.cell.tx.send_if_modified(|state| {
            if state.is_loading() {
                *state = UiState::Idle;
                true
            } else {
                false
            }
        });
        if reset {
            log::debug!("intent abandoned while loading, state back to idle");
        }
    }
}

/// Owns the tasks a view-model launched; aborting them on [`TaskScope::cancel`]
/// or drop.
#[derive(Debug, Default)]
pub struct TaskScope {
    tasks: Mutex<JoinSet<()>>,
}

impl TaskScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` on the current tokio runtime, tied to this scope.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn launch<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.lock();
        // reap finished tasks so the set does not grow unbounded
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    /// Aborts every task still running.
    pub fn cancel(&self) {
        let mut tasks = self.lock();
        if !tasks.is_empty() {
            log::debug!("cancelling {} view-model task(s)", tasks.len());
        }
        tasks.abort_all();
    }

    /// Number of tasks not yet reaped.
    #[must_use]
    pub fn active(&self) -> usize {
        let mut tasks = self.lock();
        while tasks.try_join_next().is_some() {}
        tasks.len()
    }

    fn lock(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Common lifecycle of view-models.
pub trait ViewModel {
    /// Scope that screens launch intents into.
    fn scope(&self) -> &TaskScope;

    /// Aborts in-flight intents. Called when the screen goes away. Cells
    /// left in `Loading` return to `Idle` once the aborted tasks unwind.
    fn teardown(&self) {
        self.scope().cancel();
    }
}

/// Generic message for failures that happen after the request went out.
pub(crate) const CONNECTION_MESSAGE: &str = "Connection failed. Check your internet and try again.";
/// Shown when an intent needs a session and there is none.
pub(crate) const SESSION_MESSAGE: &str = "Session error. Please log in again.";

/// Turns an error into text a user can act on.
#[must_use]
pub fn user_message(err: &PatasError) -> String {
    match err {
        PatasError::InvalidInput { reason, .. } => reason.clone(),
        PatasError::NotLoggedIn => SESSION_MESSAGE.to_string(),
        PatasError::HttpStatus {
            status: 401 | 403, ..
        } => "Your session has expired. Please log in again.".to_string(),
        PatasError::HttpStatus { status, .. } => format!("error {status}"),
        _ if err.kind() == ErrorKind::Transport => CONNECTION_MESSAGE.to_string(),
        _ => "Something went wrong. Please try again.".to_string(),
    }
}
