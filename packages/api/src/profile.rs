//! Profile editing: form validation, dialog state and the submit flow.
//!
//! The dialog is modelled as a plain value ([`ProfileDialog`]) so the view only
//! forwards input events and the rules stay testable without rendering.

use store::{ProfileUpdate, TokenStore, User};

use crate::client::MarketplaceApi;
use crate::error::ApiError;
use crate::session::Session;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Username must be between 3 and 50 characters")]
    UsernameLength(usize),

    #[error("Department is required")]
    DepartmentRequired,

    #[error("A save is already in progress")]
    AlreadySubmitting,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Editable profile fields. `email` is shown but never submitted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub username: String,
    pub department: String,
    pub email: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            department: user.department.clone(),
            email: user.email.clone(),
        }
    }

    /// The update to send, or why the form cannot be submitted.
    pub fn validate(&self) -> Result<ProfileUpdate, ProfileError> {
        let username = self.username.trim();
        let len = username.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(ProfileError::UsernameLength(len));
        }
        let department = self.department.trim();
        if department.is_empty() {
            return Err(ProfileError::DepartmentRequired);
        }
        Ok(ProfileUpdate {
            username: username.to_string(),
            department: department.to_string(),
        })
    }
}

/// State of the edit profile dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileDialog {
    pub form: ProfileForm,
    pub open: bool,
    pub submitting: bool,
    /// Message from the last failed save, shown inline.
    pub error: Option<String>,
}

impl ProfileDialog {
    /// An open dialog pre-filled from `user`.
    pub fn open_for(user: &User) -> Self {
        Self {
            form: ProfileForm::from_user(user),
            open: true,
            submitting: false,
            error: None,
        }
    }

    /// Show the dialog again, keeping whatever was typed before it was closed.
    pub fn reopen(&mut self) {
        self.open = true;
    }

    pub fn set_username(&mut self, value: String) {
        self.form.username = value;
    }

    pub fn set_department(&mut self, value: String) {
        self.form.department = value;
    }

    /// Whether the save button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.form.validate().is_ok()
    }

    /// Validate and mark the dialog in flight. Fails while a save is running.
    pub fn begin_submit(&mut self) -> Result<ProfileUpdate, ProfileError> {
        if self.submitting {
            return Err(ProfileError::AlreadySubmitting);
        }
        let update = self.form.validate()?;
        self.submitting = true;
        self.error = None;
        Ok(update)
    }

    /// Apply the outcome of a save. Success closes the dialog; failure keeps it
    /// open with the entered values untouched.
    pub fn finish(&mut self, result: &Result<User, ProfileError>) {
        self.submitting = false;
        match result {
            Ok(user) => {
                self.form = ProfileForm::from_user(user);
                self.error = None;
                self.open = false;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    /// Close without saving. The form keeps its values until remount.
    pub fn cancel(&mut self) {
        if !self.submitting {
            self.open = false;
        }
    }
}

/// Send `update` and refresh the cached user.
///
/// Issues exactly one update request and, when it succeeds, exactly one user
/// refetch. A failed refetch is logged but does not fail the save.
pub async fn submit_profile<A, T>(
    session: &Session<A, T>,
    update: &ProfileUpdate,
) -> Result<User, ProfileError>
where
    A: MarketplaceApi,
    T: TokenStore,
{
    let saved = session.api().update_profile(update).await?;
    tracing::info!("Profile updated for {}", saved.id);
    match session.refetch_user().await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Ok(saved),
        Err(e) => {
            tracing::warn!("Profile saved but refresh failed: {}", e);
            Ok(saved)
        }
    }
}
