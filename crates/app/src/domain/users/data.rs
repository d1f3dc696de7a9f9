//! Users Data

use crate::domain::validation::ValidationErrors;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const FULL_NAME_MAX_LEN: usize = 255;

/// New User Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

impl NewUser {
    /// Check every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the rejected fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_username(&mut errors, &self.username);
        errors.check_email("email", &self.email);
        check_full_name(&mut errors, &self.full_name);

        errors.finish(())
    }
}

/// User Update Data
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl UserUpdate {
    /// Check the fields that are present. An empty string is a value, not an omission.
    ///
    /// # Errors
    ///
    /// Returns the rejected fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(username) = &self.username {
            check_username(&mut errors, username);
        }

        if let Some(email) = &self.email {
            errors.check_email("email", email);
        }

        if let Some(full_name) = &self.full_name {
            check_full_name(&mut errors, full_name);
        }

        errors.finish(())
    }
}

fn check_username(errors: &mut ValidationErrors, username: &str) {
    errors.check_length("username", username, USERNAME_MIN_LEN, USERNAME_MAX_LEN);
}

fn check_full_name(errors: &mut ValidationErrors, full_name: &str) {
    errors.check_length("full_name", full_name, 1, FULL_NAME_MAX_LEN);
}
