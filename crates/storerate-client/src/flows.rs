//! # Login / Signup / Logout
//!
//! Each flow validates first, makes at most one request, and never retries.
//! Failures come back as [`Error`]; call [`Error::user_message`] with
//! [`LOGIN_FAILED`] or [`SIGNUP_FAILED`] to get the text for the operator.

use crate::Error;
use crate::api::ApiClient;
use storerate_core::{LoginForm, RoleGate, Route, SessionStore, SignupForm};
use tracing::{info, warn};

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const SIGNUP_SUCCEEDED: &str = "Signup successful! Redirecting...";

/// Result of a successful signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub message: &'static str,
    pub next: Route,
}

/// Log in and pick the view for the returned role.
///
/// On a known role the session record is saved and the role's route is
/// returned. On an unknown role the session store is cleared and
/// [`Error::UnknownRole`] is returned even if clearing fails; nothing is
/// routed.
pub async fn login<S: SessionStore>(
    api: &ApiClient,
    form: &LoginForm,
    sessions: &mut S,
) -> Result<Route, Error> {
    form.validate()?;

    let response = api.login(form).await?;
    let record = response.into_record();

    match RoleGate::route(&record.role) {
        Ok(route) => {
            sessions.save(&record)?;
            info!(user_id = %record.user_id, role = %record.role, %route, "logged in");
            Ok(route)
        }
        Err(gate) => {
            warn!(role = %record.role, "login returned an unknown role");
            if let Err(e) = sessions.clear() {
                warn!(error = %e, "failed to clear session after unknown role");
            }
            Err(gate.into())
        }
    }
}

/// Register a new account. On success the caller should move to the login view.
pub async fn signup(api: &ApiClient, form: &SignupForm) -> Result<SignupOutcome, Error> {
    form.validate()?;
    api.signup(form).await?;
    info!(email = %form.email, role = %form.role, "signed up");
    Ok(SignupOutcome {
        message: SIGNUP_SUCCEEDED,
        next: Route::Login,
    })
}

/// Drop the session record and return to the login view.
pub fn logout<S: SessionStore>(sessions: &mut S) -> Result<Route, Error> {
    sessions.clear()?;
    info!("logged out");
    Ok(Route::Login)
}
