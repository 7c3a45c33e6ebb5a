use crate::api::RegisterRequest;
use crate::context::AppContext;
use crate::error::PatasError;
use crate::session::Route;
use crate::{Identity, UserType};

use super::{StateCell, TaskScope, UiState, ViewModel};

/// Fields of the sign-up screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,
    /// Login e-mail.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password typed again.
    pub confirm_password: String,
    /// City.
    pub city: String,
    /// State (UF).
    pub state: String,
    /// Contact phone.
    pub phone: String,
}

impl RegisterForm {
    fn validate(&self) -> Result<(), PatasError> {
        if self.password != self.confirm_password {
            return Err(PatasError::invalid_input(
                "confirm_password",
                "Passwords do not match.",
            ));
        }
        let required = [
            &self.name,
            &self.email,
            &self.password,
            &self.city,
            &self.state,
            &self.phone,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(PatasError::invalid_input("form", "Please fill in all fields."));
        }
        Ok(())
    }

    fn into_request(self) -> RegisterRequest {
        RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            phone: self.phone.trim().to_string(),
            user_type: UserType::Common,
            user_photo_url: None,
        }
    }
}

/// Login and sign-up screens.
#[derive(Debug)]
pub struct AuthViewModel {
    ctx: AppContext,
    login: StateCell<Identity>,
    register: StateCell<()>,
    scope: TaskScope,
}

impl AuthViewModel {
    /// Creates the view-model.
    #[must_use]
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            login: StateCell::new(),
            register: StateCell::new(),
            scope: TaskScope::new(),
        }
    }

    /// State of the login form. `Success` carries the new identity.
    #[must_use]
    pub const fn login_state(&self) -> &StateCell<Identity> {
        &self.login
    }

    /// State of the sign-up form.
    #[must_use]
    pub const fn register_state(&self) -> &StateCell<()> {
        &self.register
    }

    /// Exchanges credentials for a session and persists it.
    pub async fn login(&self, email: &str, password: &str) {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.login.fail(&PatasError::invalid_input(
                "credentials",
                "Enter your e-mail and password.",
            ));
            return;
        }
        let Some(in_flight) = self.login.begin() else {
            return;
        };

        match self
            .ctx
            .api()
            .login(email.to_string(), password.to_string())
            .await
        {
            Ok(identity) => {
                let result = self.ctx.session().login(identity.clone()).map(|()| identity);
                in_flight.finish(result);
            }
            Err(PatasError::HttpStatus {
                status: 401 | 403, ..
            }) => {
                in_flight.settle(UiState::Error("Invalid e-mail or password.".to_string()));
            }
            Err(err) => in_flight.fail(&err),
        }
    }

    /// Creates an account after local validation and an e-mail availability check.
    /// Does not log in.
    pub async fn register(&self, form: RegisterForm) {
        if let Err(err) = form.validate() {
            self.register.fail(&err);
            return;
        }
        let Some(in_flight) = self.register.begin() else {
            return;
        };

        let result = async {
            if !self.ctx.api().email_available(form.email.trim().to_string()).await? {
                return Err(PatasError::invalid_input(
                    "email",
                    "This e-mail is already registered.",
                ));
            }
            self.ctx.api().register(form.into_request()).await
        }
        .await;
        if result.is_ok() {
            log::info!("account registered");
        }
        in_flight.finish(result);
    }

    /// Ends the session and resets the login form. Returns the route to show
    /// next, which stays [`Route::Home`] if the stored credentials could not
    /// be removed.
    pub fn logout(&self) -> Route {
        match self.ctx.session().logout() {
            Ok(()) => self.login.set(UiState::Idle),
            Err(err) => self.login.fail(&err),
        }
        self.ctx.initial_route()
    }
}

impl ViewModel for AuthViewModel {
    fn scope(&self) -> &TaskScope {
        &self.scope
    }
}
