//! Session-wide context handed to the host explicitly: who is signed in and
//! which colour scheme is active.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::info;

use crate::core::{Result, ValidationError};

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Login gate. Any well-formed email is accepted; there is no password
/// check and no token.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Option<String>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Login resolves synchronously, so there is never a pending check.
    pub fn is_loading(&self) -> bool {
        false
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn login(&mut self, email: &str) -> Result<()> {
        let email = email.trim();
        if !EMAIL.is_match(email) {
            return Err(ValidationError::single("email", "Enter a valid email address.").into());
        }
        info!(user = email, "signed in");
        self.user = Some(email.to_string());
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user = %user, "signed out");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        };
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}
