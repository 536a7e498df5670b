//! Session store implementation.

use chrono::{Datelike, Local};
use log::{info, warn};
use rand::Rng;
use std::sync::Arc;

use super::{
    errors::{SessionError, SessionResult},
    models::{RegistrationProfile, Role, Session, UserAccount},
};
use crate::{
    net::{ApiError, LoginRequest, RecordsApi, RegisterRequest},
    storage::{KeyValueStore, TOKEN_KEY},
    validation::{MIN_PASSWORD_LEN, ValidationError, require, validate_email},
};

/// Department given to registrations that leave it blank.
pub const DEFAULT_DEPARTMENT: &str = "Computer Science";

/// Matriculation number of the form `CS/<year>/<NNN>`.
pub fn generate_matric_number(year: i32) -> String {
    let serial: u16 = rand::rng().random_range(0..1000);
    format!("CS/{year}/{serial:03}")
}

/// Holds the signed-in account and its token.
///
/// The token lives in durable storage under [`TOKEN_KEY`] so a later run can
/// [`restore`](SessionStore::restore) it; the account is only ever in memory.
pub struct SessionStore {
    api: Arc<dyn RecordsApi>,
    storage: Arc<dyn KeyValueStore>,
    current: Option<Session>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn RecordsApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            current: None,
        }
    }

    /// Sign in and persist the token
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - malformed email or empty password; no request made
    /// * `SessionError::InvalidCredentials` - the server rejected the pair
    /// * `SessionError::Api` - network, timeout or server failure
    /// * `SessionError::Storage` - the token could not be persisted
    ///
    /// Any failure leaves the previous session in place.
    pub async fn login(&mut self, email: &str, password: &str) -> SessionResult<&Session> {
        let email = validate_email(email)?;
        require("password", password)?;

        let request = LoginRequest {
            email,
            password: password.to_string(),
        };
        let response = self.api.login(&request).await.map_err(|err| match err {
            ApiError::InvalidCredentials | ApiError::Unauthorized => {
                SessionError::InvalidCredentials
            }
            other => SessionError::Api(other),
        })?;

        self.storage.set(TOKEN_KEY, &response.token)?;
        info!(
            "Signed in as {} ({})",
            response.user.email, response.user.role
        );

        Ok(&*self.current.insert(Session {
            token: response.token,
            user: response.user,
        }))
    }

    /// Create an account. Does not sign in.
    ///
    /// Missing role and status default to student and active. A blank
    /// matriculation number, start date or department is filled in.
    pub async fn register(&self, registration: RegistrationProfile) -> SessionResult<()> {
        let request = build_registration(registration)?;
        self.api.register(&request).await?;
        info!("Registered account {}", request.email);
        Ok(())
    }

    /// Resolve a token persisted by an earlier run
    ///
    /// The outcome replaces any session already held. Without a persisted
    /// token the store ends signed out; any failure to read or resolve the
    /// token also clears it.
    pub async fn restore(&mut self) -> Option<&Session> {
        self.current = None;

        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return None,
            Err(err) => {
                warn!("Could not read persisted token: {err}");
                self.clear_token();
                return None;
            }
        };

        match self.api.current_user(&token).await {
            Ok(user) => {
                info!("Restored session for {}", user.email);
                Some(&*self.current.insert(Session { token, user }))
            }
            Err(err) => {
                warn!("Discarding persisted token: {err}");
                self.clear_token();
                None
            }
        }
    }

    /// Re-fetch the signed-in account
    ///
    /// A rejected token signs the user out.
    pub async fn refresh(&mut self) -> SessionResult<&Session> {
        let token = self
            .token()
            .map(str::to_string)
            .ok_or(SessionError::NotAuthenticated)?;

        match self.api.current_user(&token).await {
            Ok(user) => Ok(&*self.current.insert(Session { token, user })),
            Err(err) => {
                if err.invalidates_session() {
                    self.invalidate();
                }
                Err(err.into())
            }
        }
    }

    /// Sign out, forgetting the account and the persisted token.
    ///
    /// The in-memory session is cleared even when storage fails.
    pub fn logout(&mut self) -> SessionResult<()> {
        if let Some(session) = self.current.take() {
            info!("Signed out {}", session.user.email);
        }
        self.storage.remove(TOKEN_KEY)?;
        Ok(())
    }

    /// Forced sign-out after the server rejected the token
    pub fn invalidate(&mut self) {
        if let Some(session) = self.current.take() {
            warn!("Session for {} was rejected by the server", session.user.email);
        }
        self.clear_token();
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&UserAccount> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn role(&self) -> Option<Role> {
        self.current.as_ref().map(Session::role)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    fn clear_token(&self) {
        if let Err(err) = self.storage.remove(TOKEN_KEY) {
            warn!("Could not clear persisted token: {err}");
        }
    }
}

fn build_registration(registration: RegistrationProfile) -> SessionResult<RegisterRequest> {
    let first_name = registration.first_name.trim().to_string();
    let last_name = registration.last_name.trim().to_string();
    require("first name", &first_name)?;
    require("last name", &last_name)?;
    let email = validate_email(&registration.email)?;
    require("password", &registration.password)?;
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        }
        .into());
    }

    let today = Local::now().date_naive();
    let mut profile = registration.profile;
    if profile.student_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        profile.student_id = Some(generate_matric_number(today.year()));
    }
    if profile.department.as_deref().is_none_or(|d| d.trim().is_empty()) {
        profile.department = Some(DEFAULT_DEPARTMENT.to_string());
    }
    profile.date_started.get_or_insert(today);

    Ok(RegisterRequest {
        first_name,
        last_name,
        email,
        password: registration.password,
        role: registration.role.unwrap_or_default(),
        status: registration.status.unwrap_or_default(),
        profile,
    })
}
